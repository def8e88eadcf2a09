//! Canonical character sets used throughout the engine.
//!
//! Splitting, sliding, and clipping all agree on what counts as a newline, a
//! paragraph mark, a blank, or a sentence terminator. The sets live here as
//! both `char` predicates (for procedural scanning) and regex class fragments
//! (for the compiled split patterns), so the two representations cannot
//! drift apart.

/// Line-break characters beyond `\n` and `\r`.
pub const NEW_LINES_EXTRA: &str = "\\x{0085}\\x{2028}";

/// All line-break characters.
pub const NEW_LINES_ALL: &str = "\\n\\r\\x{0085}\\x{2028}";

/// Explicit paragraph-mark characters (form feed, paragraph separator).
pub const NEW_PARAGRAPHS: &str = "\\x{0C}\\x{2029}";

/// Breaking whitespace without line breaks.
pub const BLANKS: &str = " \\t\\x{0B}\\x{2000}-\\x{200B}\\x{202F}\\x{205F}\\x{3000}";

/// Full stops beyond `.`.
pub const FULL_STOPS: &str = "\\x{0589}\\x{06D4}\\x{0701}\\x{0702}\\x{0964}\\x{0DF4}\
\\x{1362}\\x{166E}\\x{1803}\\x{1809}\\x{2CF9}\\x{2CFE}\\x{2E3C}\\x{3002}\\x{A4FF}\
\\x{A60E}\\x{A6F3}\\x{FE52}\\x{FF0E}\\x{FF61}";

/// Exclamation marks beyond `!`.
pub const EXCLAMATIONS: &str = "\\x{01C3}\\x{2762}\\x{2763}\\x{A71D}\\x{A71E}\\x{A71F}\
\\x{FE57}\\x{FF01}";

/// Question marks beyond `?`.
pub const QUESTIONS: &str = "\\x{037E}\\x{055E}\\x{061F}\\x{1367}\\x{2CFA}\\x{2CFB}\
\\x{2E2E}\\x{A60F}\\x{A6F7}\\x{FE56}\\x{FF1F}";

/// True for breaking whitespace that is not a line break.
pub fn is_blank(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\u{0B}' | '\u{2000}'..='\u{200B}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

/// True for any line-break character.
pub fn is_new_line(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}')
}

/// True for explicit paragraph marks.
pub fn is_new_paragraph(c: char) -> bool {
    matches!(c, '\u{0C}' | '\u{2029}')
}

/// True for line breaks and paragraph marks alike; the clipper counts
/// "lines" with this predicate.
pub fn is_line_break(c: char) -> bool {
    is_new_line(c) || is_new_paragraph(c)
}

/// True for sentence-terminating punctuation.
pub fn is_terminator(c: char) -> bool {
    matches!(
        c,
        '.' | '!' | '?' | ';' | ':'
            | '\u{0589}' | '\u{06D4}' | '\u{0701}' | '\u{0702}' | '\u{0964}' | '\u{0DF4}'
            | '\u{1362}' | '\u{166E}' | '\u{1803}' | '\u{1809}' | '\u{2CF9}' | '\u{2CFE}'
            | '\u{2E3C}' | '\u{3002}' | '\u{A4FF}' | '\u{A60E}' | '\u{A6F3}' | '\u{FE52}'
            | '\u{FF0E}' | '\u{FF61}'
            | '\u{01C3}' | '\u{2762}' | '\u{2763}' | '\u{A71D}' | '\u{A71E}' | '\u{A71F}'
            | '\u{FE57}' | '\u{FF01}'
            | '\u{037E}' | '\u{055E}' | '\u{061F}' | '\u{1367}' | '\u{2CFA}' | '\u{2CFB}'
            | '\u{2E2E}' | '\u{A60F}' | '\u{A6F7}' | '\u{FE56}' | '\u{FF1F}'
    )
}

/// Normalize `\r\n` and bare `\r` to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanks_exclude_line_breaks() {
        assert!(is_blank(' '));
        assert!(is_blank('\u{3000}'));
        assert!(!is_blank('\n'));
        assert!(!is_blank('\u{2028}'));
    }

    #[test]
    fn terminators_cover_unicode_stops() {
        for c in ['.', '!', '?', ';', ':', '\u{3002}', '\u{FF01}', '\u{061F}'] {
            assert!(is_terminator(c), "{c:?} should terminate a sentence");
        }
        assert!(!is_terminator(','));
    }

    #[test]
    fn normalization_maps_all_endings_to_lf() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(normalize_line_endings("plain"), "plain");
    }
}
