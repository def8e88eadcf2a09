//! Gap sliding: ambiguous unmatched runs move to the nearest natural text
//! boundary so diffs align with line and word structure.
//!
//! Each maximal unlinked run closed by a linked token first slides down to
//! absorb equal boundary tokens, then slides up to a stop point: the top of
//! the valid range when a line break sits directly above it, otherwise the
//! most distant word/blank transition inside the range. Sliding transfers
//! links only; the token lists themselves never change.

use crate::tokens::{Patterns, Revision};

/// Slide every gap of `text`, fixing up the counterpart links in `linked`.
/// Run once per direction after word-level and character-level matching.
pub fn slide_gaps(text: &mut Revision, linked: &mut Revision, patterns: &Patterns) {
    let mut gap_start: Option<usize> = None;
    let mut cur = text.first();
    while let Some(i) = cur {
        let next = text.token(i).next;
        if text.token(i).link.is_none() {
            gap_start.get_or_insert(i);
        } else if let Some(front) = gap_start.take() {
            if let Some(back) = text.token(i).prev {
                slide_gap(text, linked, patterns, front, back);
            }
        }
        cur = next;
    }
}

fn slide_gap(
    text: &mut Revision,
    linked: &mut Revision,
    patterns: &Patterns,
    gap_front: usize,
    gap_back: usize,
) {
    // Slide down as deep as possible: the gap's front token takes over the
    // link of an equal boundary token below the gap.
    let mut front = gap_front;
    let mut back_opt = text.token(gap_back).next;
    while let Some(back) = back_opt {
        let Some(other) = text.token(back).link else {
            break;
        };
        if text.token_text(front) != text.token_text(back) {
            break;
        }
        text.token_mut(front).link = Some(other);
        linked.token_mut(other).link = Some(front);
        text.token_mut(back).link = None;
        front = match text.token(front).next {
            Some(n) => n,
            None => return,
        };
        back_opt = text.token(back).next;
    }
    let gap_front = front;
    let gap_back = match back_opt {
        Some(b) => match text.token(b).prev {
            Some(p) => p,
            None => return,
        },
        None => match text.last() {
            Some(l) => l,
            None => return,
        },
    };

    // Walk the valid slide-up range, remembering the last valid position
    // and the most distant word/blank transition.
    let front_is_border = patterns.slide_border.is_match(text.token_text(gap_front));
    let mut last_valid: Option<usize> = None;
    let mut transition: Option<usize> = None;
    {
        let mut front_opt = text.token(gap_front).prev;
        let mut back = gap_back;
        while let Some(f) = front_opt {
            if text.token(f).link.is_none() || text.token(back).link.is_some() {
                break;
            }
            if text.token_text(f) != text.token_text(back) {
                break;
            }
            last_valid = Some(f);
            if patterns.slide_border.is_match(text.token_text(f)) != front_is_border {
                transition = Some(f);
            }
            front_opt = text.token(f).prev;
            back = match text.token(back).prev {
                Some(p) => p,
                None => break,
            };
        }
    }
    // The stop token stays above the gap: the line break directly above
    // the valid range, or failing that the most distant word/blank
    // transition inside it.
    let Some(lv) = last_valid else {
        return;
    };
    let above = text.token(lv).prev;
    let above_is_break =
        above.is_some_and(|a| patterns.slide_stop.is_match(text.token_text(a)));
    let stop = if above_is_break { above } else { transition };
    let Some(stop) = stop else {
        return;
    };

    // Slide up until the stop token would be pulled into the gap.
    let mut front_opt = text.token(gap_front).prev;
    let mut back = gap_back;
    while let Some(f) = front_opt {
        if f == stop {
            break;
        }
        let Some(other) = text.token(f).link else {
            break;
        };
        if text.token(back).link.is_some() || text.token_text(f) != text.token_text(back) {
            break;
        }
        text.token_mut(back).link = Some(other);
        linked.token_mut(other).link = Some(back);
        text.token_mut(f).link = None;
        front_opt = text.token(f).prev;
        back = match text.token(back).prev {
            Some(p) => p,
            None => break,
        };
    }
}
