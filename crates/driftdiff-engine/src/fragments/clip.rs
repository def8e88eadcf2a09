//! Clipping: long unchanged fragments lose their interior, keeping only
//! the context around adjacent changes, with omission markers where the cut
//! falls mid-text.
//!
//! Cut positions prefer natural boundaries in the order heading >
//! paragraph > line > blank > fixed character count, each searched within
//! its configured window, with a maximum-lines cap on top. Thresholds are
//! code-point counts; cuts are computed as byte offsets through a char
//! index, so multibyte text never splits inside a character.

use crate::fragments::types::{Fragment, FragmentKind};
use crate::options::DiffOptions;
use crate::tokens::Patterns;
use crate::unicode;

struct CharIndex {
    offsets: Vec<usize>,
    total: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        Self {
            offsets: text.char_indices().map(|(b, _)| b).collect(),
            total: text.len(),
        }
    }

    fn cp_len(&self) -> usize {
        self.offsets.len()
    }

    fn byte_at(&self, cp: usize) -> usize {
        if cp >= self.offsets.len() {
            self.total
        } else {
            self.offsets[cp]
        }
    }

    fn cp_at(&self, byte: usize) -> usize {
        self.offsets.partition_point(|&o| o < byte)
    }
}

#[derive(Clone, Copy)]
struct Cut {
    byte: usize,
    marker: Option<FragmentKind>,
}

/// Apply clipping to a wrapped fragment stream.
pub fn clip(stream: Vec<Fragment>, options: &DiffOptions, patterns: &Patterns) -> Vec<Fragment> {
    let min_clip = options.clip_chars_left.min(options.clip_chars_right);
    let structural = |kind: FragmentKind| {
        matches!(
            kind,
            FragmentKind::ContainerStart
                | FragmentKind::ContainerEnd
                | FragmentKind::FragmentStart
                | FragmentKind::FragmentEnd
                | FragmentKind::Separator
        )
    };
    let first_content = stream.iter().position(|f| !structural(f.kind));
    let last_content = stream.iter().rposition(|f| !structural(f.kind));

    let mut out = Vec::with_capacity(stream.len());
    for (i, fragment) in stream.into_iter().enumerate() {
        let clippable = fragment.kind == FragmentKind::Same
            && fragment.color.is_none()
            && fragment.text.chars().count() > min_clip;
        if !clippable {
            out.push(fragment);
            continue;
        }
        let index = CharIndex::new(&fragment.text);
        let left = if first_content == Some(i) {
            None
        } else {
            find_left(&fragment.text, &index, options, patterns)
        };
        let right = if last_content == Some(i) {
            None
        } else {
            find_right(&fragment.text, &index, options, patterns)
        };

        match (left, right) {
            (None, None) => out.push(fragment),
            (Some(l), Some(r)) => {
                if r.byte <= l.byte {
                    out.push(fragment);
                    continue;
                }
                let omitted = &fragment.text[l.byte..r.byte];
                let gap_chars = index.cp_at(r.byte) - index.cp_at(l.byte);
                let gap_lines = omitted.chars().filter(|&c| unicode::is_line_break(c)).count();
                if gap_chars < options.clip_skip_chars || gap_lines < options.clip_skip_lines {
                    out.push(fragment);
                    continue;
                }
                push_left(&mut out, &fragment.text, l);
                out.push(Fragment::bare(FragmentKind::FragmentEnd));
                out.push(Fragment::bare(FragmentKind::Separator));
                out.push(Fragment::bare(FragmentKind::FragmentStart));
                push_right(&mut out, &fragment.text, r);
            }
            (Some(l), None) => push_left(&mut out, &fragment.text, l),
            (None, Some(r)) => push_right(&mut out, &fragment.text, r),
        }
    }
    out
}

fn push_left(out: &mut Vec<Fragment>, text: &str, cut: Cut) {
    let mut kept = text[..cut.byte].trim_end_matches(unicode::is_line_break);
    if cut.marker.is_some() {
        kept = kept.trim_end_matches(|c| unicode::is_blank(c) || unicode::is_line_break(c));
    }
    out.push(Fragment::new(kept, FragmentKind::Same, None));
    if let Some(marker) = cut.marker {
        out.push(Fragment::bare(marker));
    }
}

fn push_right(out: &mut Vec<Fragment>, text: &str, cut: Cut) {
    let mut kept = text[cut.byte..].trim_start_matches(unicode::is_line_break);
    if cut.marker.is_some() {
        kept = kept.trim_start_matches(|c| unicode::is_blank(c) || unicode::is_line_break(c));
    }
    if let Some(marker) = cut.marker {
        out.push(Fragment::bare(marker));
    }
    out.push(Fragment::new(kept, FragmentKind::Same, None));
}

/// Where to cut the head of a fragment, keeping the context after a
/// preceding change.
fn find_left(
    text: &str,
    index: &CharIndex,
    options: &DiffOptions,
    patterns: &Patterns,
) -> Option<Cut> {
    let n = index.cp_len();
    let mut cut: Option<Cut> = None;

    // Heading: the first heading ending inside the search range.
    if let Some(m) = patterns.clip_heading.find(text) {
        if index.cp_at(m.end()) <= options.clip_heading_left {
            cut = Some(Cut {
                byte: m.end(),
                marker: None,
            });
        }
    }
    if cut.is_none() {
        cut = window_left(
            text,
            index,
            &patterns.clip_paragraph,
            options.clip_paragraph_left_min,
            options.clip_paragraph_left_max,
            None,
        );
    }
    if cut.is_none() {
        cut = window_left(
            text,
            index,
            &patterns.clip_line,
            options.clip_line_left_min,
            options.clip_line_left_max,
            None,
        );
    }
    if cut.is_none() {
        cut = window_left(
            text,
            index,
            &patterns.clip_blank,
            options.clip_blank_left_min,
            options.clip_blank_left_max,
            Some(FragmentKind::OmissionBlankLeft),
        );
    }
    if cut.is_none() && n > options.clip_chars_left {
        cut = Some(Cut {
            byte: index.byte_at(options.clip_chars_left),
            marker: Some(FragmentKind::OmissionChars),
        });
    }

    // Cap the kept head at the configured number of lines.
    if let Some(cap) = lines_cap_left(text, options.clip_lines_left_max) {
        if cut.is_none_or(|c| cap < c.byte) {
            cut = Some(Cut {
                byte: cap,
                marker: None,
            });
        }
    }
    cut
}

/// Where to cut the tail of a fragment, keeping the context before a
/// following change.
fn find_right(
    text: &str,
    index: &CharIndex,
    options: &DiffOptions,
    patterns: &Patterns,
) -> Option<Cut> {
    let n = index.cp_len();
    let mut cut: Option<Cut> = None;

    if n >= options.clip_heading_right {
        let window_start = n - options.clip_heading_right;
        for m in patterns.clip_heading.find_iter(text) {
            if index.cp_at(m.start()) >= window_start {
                cut = Some(Cut {
                    byte: m.start(),
                    marker: None,
                });
            }
        }
    } else if let Some(m) = patterns.clip_heading.find_iter(text).last() {
        cut = Some(Cut {
            byte: m.start(),
            marker: None,
        });
    }
    if cut.is_none() {
        cut = window_right(
            text,
            index,
            &patterns.clip_paragraph,
            options.clip_paragraph_right_min,
            options.clip_paragraph_right_max,
            None,
        );
    }
    if cut.is_none() {
        cut = window_right(
            text,
            index,
            &patterns.clip_line,
            options.clip_line_right_min,
            options.clip_line_right_max,
            None,
        );
    }
    if cut.is_none() {
        cut = window_right(
            text,
            index,
            &patterns.clip_blank,
            options.clip_blank_right_min,
            options.clip_blank_right_max,
            Some(FragmentKind::OmissionBlankRight),
        );
    }
    if cut.is_none() && n > options.clip_chars_right {
        cut = Some(Cut {
            byte: index.byte_at(n - options.clip_chars_right),
            marker: Some(FragmentKind::OmissionChars),
        });
    }

    if let Some(cap) = lines_cap_right(text, options.clip_lines_right_max) {
        if cut.is_none_or(|c| cap > c.byte) {
            cut = Some(Cut {
                byte: cap,
                marker: None,
            });
        }
    }
    cut
}

/// First boundary match whose end falls inside `[min, max]` code points
/// from the start.
fn window_left(
    text: &str,
    index: &CharIndex,
    pattern: &regex::Regex,
    min: usize,
    max: usize,
    marker: Option<FragmentKind>,
) -> Option<Cut> {
    for m in pattern.find_iter(text) {
        let end_cp = index.cp_at(m.end());
        if end_cp > max {
            break;
        }
        if end_cp >= min {
            return Some(Cut {
                byte: m.end(),
                marker,
            });
        }
    }
    None
}

/// Last boundary match whose start falls inside `[len-max, len-min]` code
/// points.
fn window_right(
    text: &str,
    index: &CharIndex,
    pattern: &regex::Regex,
    min: usize,
    max: usize,
    marker: Option<FragmentKind>,
) -> Option<Cut> {
    let n = index.cp_len();
    if n < min {
        return None;
    }
    let low = n.saturating_sub(max);
    let high = n - min;
    let mut cut = None;
    for m in pattern.find_iter(text) {
        let start_cp = index.cp_at(m.start());
        if start_cp > high {
            break;
        }
        if start_cp >= low {
            cut = Some(Cut {
                byte: m.start(),
                marker,
            });
        }
    }
    cut
}

/// Byte position right after the `max_lines`-th line break from the start.
fn lines_cap_left(text: &str, max_lines: usize) -> Option<usize> {
    let mut count = 0;
    for (i, c) in text.char_indices() {
        if unicode::is_line_break(c) {
            count += 1;
            if count == max_lines {
                return Some(i + c.len_utf8());
            }
        }
    }
    None
}

/// Byte position right after the `max_lines`-th line break from the end.
fn lines_cap_right(text: &str, max_lines: usize) -> Option<usize> {
    let mut count = 0;
    for (i, c) in text.char_indices().rev() {
        if unicode::is_line_break(c) {
            count += 1;
            if count == max_lines {
                return Some(i + c.len_utf8());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(content: Vec<Fragment>) -> Vec<Fragment> {
        let mut stream = vec![
            Fragment::bare(FragmentKind::ContainerStart),
            Fragment::bare(FragmentKind::FragmentStart),
        ];
        stream.extend(content);
        stream.push(Fragment::bare(FragmentKind::FragmentEnd));
        stream.push(Fragment::bare(FragmentKind::ContainerEnd));
        stream
    }

    fn tight_options() -> DiffOptions {
        DiffOptions {
            clip_heading_left: 8,
            clip_heading_right: 8,
            clip_paragraph_left_min: 2,
            clip_paragraph_left_max: 8,
            clip_paragraph_right_min: 2,
            clip_paragraph_right_max: 8,
            clip_line_left_min: 2,
            clip_line_left_max: 8,
            clip_line_right_min: 2,
            clip_line_right_max: 8,
            clip_blank_left_min: 2,
            clip_blank_left_max: 8,
            clip_blank_right_min: 2,
            clip_blank_right_max: 8,
            clip_chars_left: 5,
            clip_chars_right: 5,
            clip_lines_left_max: 100,
            clip_lines_right_max: 100,
            clip_skip_chars: 4,
            clip_skip_lines: 0,
            ..DiffOptions::default()
        }
    }

    fn kinds(stream: &[Fragment]) -> Vec<FragmentKind> {
        stream.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn chars_clip_cuts_both_sides_with_markers() {
        let patterns = Patterns::new();
        let options = tight_options();
        let stream = wrap(vec![
            Fragment::new("x", FragmentKind::Delete, None),
            Fragment::new("aaaaabbbbbbbbbbccccc", FragmentKind::Same, None),
            Fragment::new("y", FragmentKind::Insert, None),
        ]);
        let clipped = clip(stream, &options, &patterns);
        use FragmentKind::*;
        assert_eq!(
            kinds(&clipped),
            vec![
                ContainerStart,
                FragmentStart,
                Delete,
                Same,
                OmissionChars,
                FragmentEnd,
                Separator,
                FragmentStart,
                OmissionChars,
                Same,
                Insert,
                FragmentEnd,
                ContainerEnd
            ]
        );
        assert_eq!(clipped[3].text, "aaaaa");
        assert_eq!(clipped[9].text, "ccccc");
    }

    #[test]
    fn multibyte_text_cuts_on_char_boundaries() {
        let patterns = Patterns::new();
        let options = tight_options();
        let text = format!("{}{}{}", "é".repeat(5), "x".repeat(10), "汉".repeat(5));
        let stream = wrap(vec![
            Fragment::new("d", FragmentKind::Delete, None),
            Fragment::new(text.as_str(), FragmentKind::Same, None),
            Fragment::new("i", FragmentKind::Insert, None),
        ]);
        let clipped = clip(stream, &options, &patterns);
        let same: Vec<&Fragment> = clipped
            .iter()
            .filter(|f| f.kind == FragmentKind::Same)
            .collect();
        assert_eq!(same[0].text, "é".repeat(5));
        assert_eq!(same[1].text, "汉".repeat(5));
    }

    #[test]
    fn blank_boundary_beats_chars_and_trims() {
        let patterns = Patterns::new();
        let options = tight_options();
        let stream = wrap(vec![
            Fragment::new("x", FragmentKind::Delete, None),
            Fragment::new("abcd efghijklmnopqr stuv", FragmentKind::Same, None),
            Fragment::new("y", FragmentKind::Insert, None),
        ]);
        let clipped = clip(stream, &options, &patterns);
        let left = clipped
            .iter()
            .position(|f| f.kind == FragmentKind::OmissionBlankLeft)
            .expect("left blank marker");
        assert_eq!(clipped[left - 1].text, "abcd");
        let right = clipped
            .iter()
            .position(|f| f.kind == FragmentKind::OmissionBlankRight)
            .expect("right blank marker");
        assert_eq!(clipped[right + 1].text, "stuv");
    }

    #[test]
    fn first_fragment_clips_only_from_the_right() {
        let patterns = Patterns::new();
        let options = tight_options();
        let stream = wrap(vec![
            Fragment::new("aaaaabbbbbbbbbbccccc", FragmentKind::Same, None),
            Fragment::new("y", FragmentKind::Insert, None),
        ]);
        let clipped = clip(stream, &options, &patterns);
        use FragmentKind::*;
        assert_eq!(
            kinds(&clipped),
            vec![
                ContainerStart,
                FragmentStart,
                OmissionChars,
                Same,
                Insert,
                FragmentEnd,
                ContainerEnd
            ]
        );
        assert_eq!(clipped[3].text, "ccccc");
    }

    #[test]
    fn short_gap_is_not_clipped() {
        let patterns = Patterns::new();
        let options = DiffOptions {
            clip_skip_chars: 1000,
            ..tight_options()
        };
        let stream = wrap(vec![
            Fragment::new("x", FragmentKind::Delete, None),
            Fragment::new("aaaaabbbbbbbbbbccccc", FragmentKind::Same, None),
            Fragment::new("y", FragmentKind::Insert, None),
        ]);
        let clipped = clip(stream.clone(), &options, &patterns);
        assert_eq!(clipped, stream);
    }

    #[test]
    fn moved_fragments_are_never_clipped() {
        let patterns = Patterns::new();
        let options = tight_options();
        let stream = wrap(vec![
            Fragment::new("x", FragmentKind::Delete, None),
            Fragment::new("aaaaabbbbbbbbbbccccc", FragmentKind::Same, Some(1)),
            Fragment::new("y", FragmentKind::Insert, None),
        ]);
        let clipped = clip(stream.clone(), &options, &patterns);
        assert_eq!(clipped, stream);
    }
}
