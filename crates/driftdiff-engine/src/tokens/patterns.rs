//! Compiled pattern set for tokenization, sliding, and clipping.
//!
//! Wiki grammatical atoms (`[[…]]`, `{{…}}`, `[…]`, HTML-like tags, URLs)
//! are matched as indivisible chunks so later refinement never fragments
//! markup. The chunk and word alternations are parameters of the tokenizer:
//! a host embedding the engine for a different markup can swap them via
//! [`Patterns::with_split`].

use regex::Regex;

use crate::unicode;

/// Refinement granularity, coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Paragraph,
    Line,
    Sentence,
    Chunk,
    Word,
    Character,
}

impl Level {
    pub fn name(self) -> &'static str {
        match self {
            Level::Paragraph => "paragraph",
            Level::Line => "line",
            Level::Sentence => "sentence",
            Level::Chunk => "chunk",
            Level::Word => "word",
            Level::Character => "character",
        }
    }
}

/// Wiki atom alternation shared by the chunk splitter and the chunk counter.
const CHUNK_PATTERN: &str = concat!(
    r"\[\[[^\[\]\n]+\]\]",     // [[wiki link]]
    r"|\{\{[^{}\n]+\}\}",      // {{template}}
    r"|\[[^\[\]\n]+\]",        // [external link]
    r"|</?[^<>\[\]{}\n]+>",    // <html tag>
    r"|\[\[[^\[\]|\n]+\|",     // [[wiki link|
    r"|\{\{[^{}|\n]+\|",       // {{template|
    "|\\b(?:(?:https?:)?//)[^\\x00-\\x20\\s\"\\[\\]\\x7F]+", // bare or schemed URL
);

/// Word atom: letters/digits/underscore runs with apostrophe joins.
const WORD_ATOM: &str = r"\w+(?:['’]\w*)*";

#[derive(Debug)]
pub struct Patterns {
    pub split_paragraph: Regex,
    pub split_line: Regex,
    pub split_chunk: Regex,
    pub split_word: Regex,
    pub split_character: Regex,
    pub count_words: Regex,
    pub count_chunks: Regex,
    pub slide_border: Regex,
    pub slide_stop: Regex,
    pub clip_heading: Regex,
    pub clip_paragraph: Regex,
    pub clip_line: Regex,
    pub clip_blank: Regex,
}

impl Patterns {
    /// Compile the standard pattern set. The patterns are static and known
    /// to be valid; a failure here is a build defect, not an input error.
    pub fn new() -> Self {
        let compile = |name: &str, pattern: &str| {
            Regex::new(pattern)
                .unwrap_or_else(|e| panic!("built-in pattern {name} failed to compile: {e}"))
        };
        let blanks = unicode::BLANKS;
        let new_lines_all = unicode::NEW_LINES_ALL;
        let new_paragraphs = unicode::NEW_PARAGRAPHS;
        Self {
            split_paragraph: compile(
                "split_paragraph",
                &format!(r"(?:\r\n|\n|\r){{2,}}|[{new_paragraphs}]"),
            ),
            split_line: compile(
                "split_line",
                &format!(r"\r\n|\n|\r|[{}{new_paragraphs}]", unicode::NEW_LINES_EXTRA),
            ),
            split_chunk: compile("split_chunk", CHUNK_PATTERN),
            split_word: compile(
                "split_word",
                &format!(
                    r"{WORD_ATOM}|\[\[|\]\]|\{{\{{|\}}\}}|&\w+;|'''|''|==+|\{{\||\|\}}|\|-|."
                ),
            ),
            split_character: compile("split_character", "."),
            count_words: compile("count_words", WORD_ATOM),
            count_chunks: compile("count_chunks", CHUNK_PATTERN),
            slide_border: compile("slide_border", &format!("[{blanks}]")),
            slide_stop: compile(
                "slide_stop",
                &format!("[{new_lines_all}{new_paragraphs}]"),
            ),
            clip_heading: compile(
                "clip_heading",
                r"(?:^|\n)(?:==+[^\n]+==+|\{\||\|\})[^\n]*",
            ),
            clip_paragraph: compile(
                "clip_paragraph",
                &format!(r"(?:(?:\r\n|\n|\r){{2,}}|[{new_paragraphs}])+"),
            ),
            clip_line: compile(
                "clip_line",
                &format!("[{new_lines_all}{new_paragraphs}]+"),
            ),
            clip_blank: compile("clip_blank", &format!("[{blanks}]+")),
        }
    }

    /// Replace the chunk and word splitters, e.g. for a non-wiki markup.
    pub fn with_split(mut self, chunk: Regex, word: Regex) -> Self {
        self.count_chunks = chunk.clone();
        self.split_chunk = chunk;
        self.split_word = word;
        self
    }

    /// Number of words in `text`.
    pub fn word_count(&self, text: &str) -> usize {
        self.count_words.find_iter(text).count()
    }

    /// Word and chunk matches of `text`, in match order.
    pub fn words_and_chunks<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.count_words
            .find_iter(text)
            .map(|m| m.as_str())
            .chain(self.count_chunks.find_iter(text).map(|m| m.as_str()))
            .collect()
    }

    /// The splitter for `level`, or `None` for the procedural sentence level.
    pub fn splitter(&self, level: Level) -> Option<&Regex> {
        match level {
            Level::Paragraph => Some(&self.split_paragraph),
            Level::Line => Some(&self.split_line),
            Level::Sentence => None,
            Level::Chunk => Some(&self.split_chunk),
            Level::Word => Some(&self.split_word),
            Level::Character => Some(&self.split_character),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        let _ = Patterns::new();
    }

    #[test]
    fn chunk_pattern_matches_wiki_atoms() {
        let p = Patterns::new();
        for atom in [
            "[[Main Page]]",
            "{{cite web}}",
            "[http://example.org ref]",
            "<div class=\"x\">",
            "</div>",
            "https://example.org/a?b=c",
        ] {
            let m = p.split_chunk.find(atom).expect("atom should match");
            assert_eq!(m.as_str(), atom);
        }
    }

    #[test]
    fn word_pattern_prefers_words_then_markup() {
        let p = Patterns::new();
        let tokens: Vec<&str> = p.split_word.find_iter("l'été [[x]]").map(|m| m.as_str()).collect();
        assert_eq!(tokens, vec!["l'été", " ", "[[", "x", "]]"]);
    }

    #[test]
    fn heading_pattern_spans_whole_line() {
        let p = Patterns::new();
        let text = "intro\n== Title == rest\nafter";
        let m = p.clip_heading.find(text).expect("heading");
        assert_eq!(m.as_str(), "\n== Title == rest");
    }
}
