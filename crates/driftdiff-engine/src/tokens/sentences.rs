//! Procedural sentence segmentation.
//!
//! A sentence runs from a non-blank character up to and including a run of
//! terminator punctuation that is followed by breaking whitespace or the end
//! of the text; blank runs between sentences become separator tokens. The
//! one-character lookahead after the terminator run is why this level is
//! scanned procedurally instead of by a compiled pattern.

use crate::tokens::span::Span;
use crate::unicode;

/// Split `text` into sentence and blank-separator spans. `base` is the byte
/// offset of `text` within the revision, so spans index the full text.
pub fn split_sentences(text: &str, base: usize) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let Some(first) = rest.chars().next() else {
            break;
        };
        let end = if unicode::is_blank(first) {
            blank_run_end(rest)
        } else {
            sentence_end(rest)
        };
        spans.push(Span::new(base + pos, base + pos + end));
        pos += end;
    }
    spans
}

fn blank_run_end(rest: &str) -> usize {
    rest.char_indices()
        .find(|(_, c)| !unicode::is_blank(*c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len())
}

fn sentence_end(rest: &str) -> usize {
    let mut it = rest.char_indices().peekable();
    while let Some((i, c)) = it.next() {
        if !unicode::is_terminator(c) {
            continue;
        }
        // Absorb the whole terminator run ("?!", "...").
        let mut run_end = i + c.len_utf8();
        while let Some(&(j, d)) = it.peek() {
            if !unicode::is_terminator(d) {
                break;
            }
            run_end = j + d.len_utf8();
            it.next();
        }
        match it.peek() {
            None => return run_end,
            Some(&(_, d)) if unicode::is_blank(d) => return run_end,
            _ => {}
        }
    }
    rest.len()
}
