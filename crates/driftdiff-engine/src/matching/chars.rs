//! Character-level refinement of same-shape gaps.
//!
//! A gap qualifies when both sides hold the same number of tokens and every
//! pair is plausibly the same word (internal edit, flanking edit, or ≥50%
//! identity at equal length), or when one token became three by a split at
//! whitespace or a dash. Identical paired tokens (typically the spaces) are
//! pre-linked so the character matcher stays within word interiors.

use std::collections::HashMap;

use crate::tokens::{Level, Patterns, Revision};

#[derive(Debug)]
struct GapPair {
    new_first: usize,
    new_count: usize,
    old_first: Option<usize>,
    old_count: usize,
}

/// Re-split the selected gaps of both revisions into characters.
pub fn split_refine_chars(new_rev: &mut Revision, old_rev: &mut Revision, patterns: &Patterns) {
    let mut gaps: Vec<GapPair> = Vec::new();
    // Key NEW gaps by the linked token directly above them.
    let mut by_prev: HashMap<Option<usize>, usize> = HashMap::new();

    let mut open: Option<usize> = None;
    let mut prev_linked: Option<usize> = None;
    let mut cur = new_rev.first();
    while let Some(i) = cur {
        if new_rev.token(i).link.is_none() {
            match open {
                None => {
                    by_prev.insert(prev_linked, gaps.len());
                    open = Some(gaps.len());
                    gaps.push(GapPair {
                        new_first: i,
                        new_count: 1,
                        old_first: None,
                        old_count: 0,
                    });
                }
                Some(g) => {
                    gaps[g].new_count += 1;
                }
            }
        } else {
            open = None;
            prev_linked = Some(i);
        }
        cur = new_rev.token(i).next;
    }

    // Attach OLD gaps to the NEW gap between the same linked anchors.
    let mut open: Option<Option<usize>> = None;
    let mut prev_linked_old: Option<usize> = None;
    let mut cur = old_rev.first();
    while let Some(j) = cur {
        if old_rev.token(j).link.is_none() {
            match open {
                None => {
                    let key = prev_linked_old.and_then(|p| old_rev.token(p).link);
                    let gap = by_prev.get(&key).copied();
                    if let Some(g) = gap {
                        gaps[g].old_first = Some(j);
                        gaps[g].old_count = 1;
                    }
                    open = Some(gap);
                }
                Some(Some(g)) => {
                    gaps[g].old_count += 1;
                }
                Some(None) => {}
            }
        } else {
            open = None;
            prev_linked_old = Some(j);
        }
        cur = old_rev.token(j).next;
    }

    for gap in &gaps {
        let Some(old_first) = gap.old_first else {
            continue;
        };
        if !gap_accepts_chars(new_rev, old_rev, gap, old_first) {
            continue;
        }

        let new_tokens = run_indices(new_rev, gap.new_first, gap.new_count);
        let old_tokens = run_indices(old_rev, old_first, gap.old_count);

        // Pre-link identical pairs so refinement stays word-local.
        if gap.new_count == gap.old_count {
            for (&a, &b) in new_tokens.iter().zip(&old_tokens) {
                if new_rev.token_text(a) == old_rev.token_text(b) {
                    new_rev.token_mut(a).link = Some(b);
                    old_rev.token_mut(b).link = Some(a);
                }
            }
        }

        for a in new_tokens {
            if new_rev.token(a).link.is_none() {
                new_rev.refine_token(Level::Character, a, patterns);
            }
        }
        for b in old_tokens {
            if old_rev.token(b).link.is_none() {
                old_rev.refine_token(Level::Character, b, patterns);
            }
        }
    }
}

fn run_indices(rev: &Revision, first: usize, count: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(count);
    let mut cur = Some(first);
    for _ in 0..count {
        let Some(i) = cur else { break };
        out.push(i);
        cur = rev.token(i).next;
    }
    out
}

fn gap_accepts_chars(
    new_rev: &Revision,
    old_rev: &Revision,
    gap: &GapPair,
    old_first: usize,
) -> bool {
    if gap.new_count == gap.old_count {
        let new_tokens = run_indices(new_rev, gap.new_first, gap.new_count);
        let old_tokens = run_indices(old_rev, old_first, gap.old_count);
        if new_tokens.len() != old_tokens.len() {
            return false;
        }
        new_tokens
            .iter()
            .zip(&old_tokens)
            .all(|(&a, &b)| pair_refinable(new_rev.token_text(a), old_rev.token_text(b)))
    } else if gap.new_count == 1 && gap.old_count == 3 {
        let triple = run_indices(old_rev, old_first, 3);
        single_covers_triple(
            new_rev.token_text(gap.new_first),
            old_rev.token_text(triple[0]),
            old_rev.token_text(triple[2]),
        )
    } else if gap.new_count == 3 && gap.old_count == 1 {
        let triple = run_indices(new_rev, gap.new_first, 3);
        single_covers_triple(
            old_rev.token_text(old_first),
            new_rev.token_text(triple[0]),
            new_rev.token_text(triple[2]),
        )
    } else {
        false
    }
}

/// One word split or merged at whitespace or a dash: the single token must
/// begin with the first and end with the last token of the triple side.
fn single_covers_triple(single: &str, first: &str, last: &str) -> bool {
    single.starts_with(first) && single.ends_with(last)
}

/// True when `a` and `b` plausibly refine to a useful character diff:
/// an internal insert/delete (equal prefix plus equal suffix covers the
/// shorter token), a flanking insert/delete (the shorter is a substring of
/// the longer), or at least 50% identity at equal length.
fn pair_refinable(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.len() == b_chars.len() {
        let same = a_chars
            .iter()
            .zip(&b_chars)
            .filter(|(x, y)| x == y)
            .count();
        return same * 2 >= a_chars.len();
    }
    let (shorter, longer, shorter_chars) = if a_chars.len() < b_chars.len() {
        (a, b, &a_chars)
    } else {
        (b, a, &b_chars)
    };
    let prefix = a_chars
        .iter()
        .zip(&b_chars)
        .take_while(|(x, y)| x == y)
        .count();
    let suffix = a_chars
        .iter()
        .rev()
        .zip(b_chars.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    if prefix + suffix >= shorter_chars.len() {
        return true;
    }
    longer.contains(shorter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("same", "same", true)]
    #[case("colour", "color", true)] // internal insert
    #[case("reading", "read", true)] // flanking insert
    #[case("unhappy", "happy", true)] // flanking insert
    #[case("house", "mouse", true)] // equal length, 80% identity
    #[case("abcd", "cdab", false)] // equal length, 0% aligned identity
    #[case("brown", "red", false)] // nothing shared
    #[case("north", "south", true)] // equal length, 3 of 5 match
    fn pair_refinement_matrix(#[case] a: &str, #[case] b: &str, #[case] expect: bool) {
        assert_eq!(pair_refinable(a, b), expect, "{a:?} vs {b:?}");
    }

    #[test]
    fn single_triple_rule_requires_shared_ends() {
        assert!(single_covers_triple("word", "w", "ord"));
        assert!(single_covers_triple("well-known", "well", "known"));
        assert!(!single_covers_triple("word", "w", "rd!"));
    }
}
