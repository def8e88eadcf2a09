//! Plain-text rendering of the fragment stream, the engine's convenience
//! output. The stream itself stays the stable API; anything beyond this
//! marker notation (ANSI colors, HTML) belongs to the embedding host.
//!
//! Notation: insertions `{+…+}`, deletions `[-…-]`, moved blocks wrapped
//! in `(<n:…:n)` / `(>n:…:n)`, move marks `◀n[…]` / `▶n[…]`, omissions
//! `…`. With `no_unicode_symbols` the marks fall back to `<n[…]`, `>n[…]`
//! and `...`.

use crate::engine::DiffResult;
use crate::fragments::FragmentKind;
use crate::options::DiffOptions;

/// Render `result` as marked-up plain text.
pub fn render_text(result: &DiffResult, options: &DiffOptions) -> String {
    let mut out = String::new();
    for fragment in &result.fragments {
        let color = fragment.color.unwrap_or(0);
        match fragment.kind {
            FragmentKind::ContainerStart
            | FragmentKind::ContainerEnd
            | FragmentKind::FragmentStart
            | FragmentKind::FragmentEnd => {}
            FragmentKind::Separator => out.push('\n'),
            FragmentKind::Same => out.push_str(&fragment.text),
            FragmentKind::Insert => {
                out.push_str("{+");
                out.push_str(&fragment.text);
                out.push_str("+}");
            }
            FragmentKind::Delete => {
                out.push_str("[-");
                out.push_str(&fragment.text);
                out.push_str("-]");
            }
            FragmentKind::MarkLeft | FragmentKind::MarkRight => {
                if options.show_block_moves {
                    let symbol = match (fragment.kind, options.no_unicode_symbols) {
                        (FragmentKind::MarkLeft, false) => "◀",
                        (FragmentKind::MarkRight, false) => "▶",
                        (FragmentKind::MarkLeft, true) => "<",
                        _ => ">",
                    };
                    out.push_str(&format!("{symbol}{color}[{}]", fragment.text));
                } else {
                    // Moves off: the mark becomes a deletion in place.
                    out.push_str("[-");
                    out.push_str(&fragment.text);
                    out.push_str("-]");
                }
            }
            FragmentKind::BlockStartLeft | FragmentKind::BlockStartRight => {
                if options.show_block_moves {
                    let arrow = if fragment.kind == FragmentKind::BlockStartLeft {
                        "<"
                    } else {
                        ">"
                    };
                    out.push_str(&format!("({arrow}{color}:"));
                }
            }
            FragmentKind::BlockEnd => {
                if options.show_block_moves {
                    out.push_str(&format!(":{color})"));
                }
            }
            FragmentKind::OmissionChars => {
                out.push_str(if options.no_unicode_symbols { "..." } else { "…" });
            }
            FragmentKind::OmissionBlankLeft => {
                out.push_str(if options.no_unicode_symbols { " ..." } else { " …" });
            }
            FragmentKind::OmissionBlankRight => {
                out.push_str(if options.no_unicode_symbols { "... " } else { "… " });
            }
        }
    }
    if result.error {
        return format!("!!! diff self-check failed !!!\n{out}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DiffEngine;

    #[test]
    fn renders_word_replacement() {
        let engine = DiffEngine::with_defaults();
        let result = engine
            .diff("the quick brown fox", "the quick red fox")
            .unwrap();
        let text = render_text(&result, engine.options());
        assert_eq!(text, "the quick [-brown-]{+red+} fox");
    }

    #[test]
    fn moves_render_as_deletions_when_disabled() {
        let options = DiffOptions {
            show_block_moves: false,
            ..DiffOptions::default()
        };
        let engine = DiffEngine::new(options).unwrap();
        let result = engine.diff("A B C D", "C D A B").unwrap();
        let text = render_text(&result, engine.options());
        assert!(text.contains("[-A B-]"), "unexpected rendering: {text}");
        assert!(!text.contains('('), "wrappers should be hidden: {text}");
    }
}
