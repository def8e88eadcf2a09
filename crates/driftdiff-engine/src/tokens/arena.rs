//! Token arena entries and the active-list invariant check.
//!
//! Tokens live in a contiguous arena (`Vec<Token>`) and are wired into a
//! doubly-linked active list through `Option<usize>` indices. Refinement
//! appends replacement tokens and rewires the neighbors; the refined token
//! stays in the arena, unreachable from the active list.

use crate::tokens::span::Span;

/// One arena entry.
#[derive(Debug, Clone)]
pub struct Token {
    /// Byte range of the token text within the revision.
    pub span: Span,
    /// Previous token in the active list.
    pub prev: Option<usize>,
    /// Next token in the active list.
    pub next: Option<usize>,
    /// Matched counterpart in the other revision's arena.
    pub link: Option<usize>,
    /// Positional ordinal, assigned once after all refinement.
    pub number: usize,
    /// Stable-anchor flag for block identity.
    pub unique: bool,
}

impl Token {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            prev: None,
            next: None,
            link: None,
            number: 0,
            unique: false,
        }
    }
}

/// Verify that the active list starting at `first` is a proper doubly-linked
/// chain: acyclic, `prev` inverse of `next`, ends consistent with `last`,
/// no empty spans. Used by tests and the debug dumps.
pub fn check_list(
    tokens: &[Token],
    first: Option<usize>,
    last: Option<usize>,
) -> Result<(), String> {
    let mut seen = 0usize;
    let mut prev: Option<usize> = None;
    let mut cur = first;
    while let Some(i) = cur {
        let token = tokens
            .get(i)
            .ok_or_else(|| format!("active list points at missing arena entry {i}"))?;
        if token.prev != prev {
            return Err(format!(
                "token {i} has prev {:?}, expected {:?}",
                token.prev, prev
            ));
        }
        if token.span.is_empty() {
            return Err(format!("token {i} has an empty span"));
        }
        seen += 1;
        if seen > tokens.len() {
            return Err("active list contains a cycle".to_string());
        }
        prev = cur;
        cur = token.next;
    }
    if prev != last {
        return Err(format!("list tail is {prev:?} but last is {last:?}"));
    }
    Ok(())
}
