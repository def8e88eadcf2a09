//! Per-revision token state: the text, the arena, the active list, and the
//! word-occurrence counts used by the uniqueness heuristics.

use std::collections::HashMap;

use crate::tokens::arena::Token;
use crate::tokens::patterns::{Level, Patterns};
use crate::tokens::sentences;
use crate::tokens::span::Span;

/// One revision of the text under comparison.
pub struct Revision {
    text: String,
    tokens: Vec<Token>,
    first: Option<usize>,
    last: Option<usize>,
    word_counts: HashMap<String, u32>,
}

impl Revision {
    /// Ingest a (normalized) text: tallies word and chunk occurrences over
    /// the whole string. The token list starts empty; call
    /// [`Revision::split_initial`] to populate it.
    pub fn new(text: String, patterns: &Patterns) -> Self {
        let mut word_counts = HashMap::new();
        for m in patterns.count_words.find_iter(&text) {
            *word_counts.entry(m.as_str().to_string()).or_insert(0u32) += 1;
        }
        for m in patterns.count_chunks.find_iter(&text) {
            *word_counts.entry(m.as_str().to_string()).or_insert(0u32) += 1;
        }
        Self {
            text,
            tokens: Vec::new(),
            first: None,
            last: None,
            word_counts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn first(&self) -> Option<usize> {
        self.first
    }

    pub fn last(&self) -> Option<usize> {
        self.last
    }

    pub fn arena(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    pub fn token_mut(&mut self, i: usize) -> &mut Token {
        &mut self.tokens[i]
    }

    pub fn token_text(&self, i: usize) -> &str {
        self.tokens[i].span.slice(&self.text)
    }

    /// Occurrences of `word` in this revision's full text.
    pub fn word_occurrences(&self, word: &str) -> u32 {
        self.word_counts.get(word).copied().unwrap_or(0)
    }

    /// Iterate the active list front to back.
    pub fn active(&self) -> ActiveIter<'_> {
        ActiveIter {
            tokens: &self.tokens,
            cur: self.first,
        }
    }

    /// Initial split of the full text at `level`, replacing any existing
    /// list.
    pub fn split_initial(&mut self, level: Level, patterns: &Patterns) {
        self.tokens.clear();
        self.first = None;
        self.last = None;
        let spans = split_level(patterns, level, &self.text, 0);
        for span in spans {
            let idx = self.tokens.len();
            self.tokens.push(Token::new(span));
            self.tokens[idx].prev = self.last;
            match self.last {
                Some(p) => self.tokens[p].next = Some(idx),
                None => self.first = Some(idx),
            }
            self.last = Some(idx);
        }
    }

    /// Re-tokenize every still-unlinked token at the next finer `level`.
    pub fn split_refine(&mut self, level: Level, patterns: &Patterns) {
        let targets: Vec<usize> = self
            .active()
            .filter(|&i| self.tokens[i].link.is_none())
            .collect();
        for idx in targets {
            self.refine_token(level, idx, patterns);
        }
    }

    /// Replace the single token `idx` with its split at `level`. A split
    /// that yields the token unchanged leaves the list alone.
    pub fn refine_token(&mut self, level: Level, idx: usize, patterns: &Patterns) {
        let span = self.tokens[idx].span;
        let spans = split_level(patterns, level, span.slice(&self.text), span.start);
        if spans.len() <= 1 {
            return;
        }
        self.replace_with_chain(idx, &spans);
    }

    /// Assign final positional ordinals along the active list.
    pub fn enumerate(&mut self) {
        let mut number = 0;
        let mut cur = self.first;
        while let Some(i) = cur {
            self.tokens[i].number = number;
            number += 1;
            cur = self.tokens[i].next;
        }
    }

    /// Wire a freshly appended chain of sub-tokens in place of `target`,
    /// leaving `target` tombstoned in the arena.
    fn replace_with_chain(&mut self, target: usize, spans: &[Span]) {
        let prev = self.tokens[target].prev;
        let next = self.tokens[target].next;
        let chain_first = self.tokens.len();
        for (k, span) in spans.iter().enumerate() {
            let mut token = Token::new(*span);
            token.prev = if k == 0 {
                prev
            } else {
                Some(chain_first + k - 1)
            };
            token.next = if k + 1 == spans.len() {
                next
            } else {
                Some(chain_first + k + 1)
            };
            self.tokens.push(token);
        }
        let chain_last = self.tokens.len() - 1;
        match prev {
            Some(p) => self.tokens[p].next = Some(chain_first),
            None => self.first = Some(chain_first),
        }
        match next {
            Some(n) => self.tokens[n].prev = Some(chain_last),
            None => self.last = Some(chain_last),
        }
    }
}

pub struct ActiveIter<'a> {
    tokens: &'a [Token],
    cur: Option<usize>,
}

impl Iterator for ActiveIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let i = self.cur?;
        self.cur = self.tokens[i].next;
        Some(i)
    }
}

/// Split `text` (at byte offset `base` of the revision) into spans at
/// `level`. Matches of the level pattern become tokens, and so does the
/// unmatched text between them — separators are tokens of their own.
fn split_level(patterns: &Patterns, level: Level, text: &str, base: usize) -> Vec<Span> {
    if text.is_empty() {
        return Vec::new();
    }
    let Some(re) = patterns.splitter(level) else {
        return sentences::split_sentences(text, base);
    };
    let mut spans = Vec::new();
    let mut tail = 0;
    for m in re.find_iter(text) {
        if m.start() > tail {
            spans.push(Span::new(base + tail, base + m.start()));
        }
        if m.end() > m.start() {
            spans.push(Span::new(base + m.start(), base + m.end()));
        }
        tail = m.end();
    }
    if tail < text.len() {
        spans.push(Span::new(base + tail, base + text.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::arena::check_list;

    fn active_texts(rev: &Revision) -> Vec<&str> {
        rev.active().map(|i| rev.token_text(i)).collect()
    }

    fn rev(text: &str, patterns: &Patterns) -> Revision {
        Revision::new(text.to_string(), patterns)
    }

    #[test]
    fn paragraph_split_keeps_separators() {
        let patterns = Patterns::new();
        let mut r = rev("one\n\ntwo\n\n\nthree", &patterns);
        r.split_initial(Level::Paragraph, &patterns);
        assert_eq!(
            active_texts(&r),
            vec!["one", "\n\n", "two", "\n\n\n", "three"]
        );
        check_list(r.arena(), r.first(), r.last()).unwrap();
    }

    #[test]
    fn word_split_covers_text_losslessly() {
        let patterns = Patterns::new();
        let mut r = rev("see [[Main Page]] now", &patterns);
        r.split_initial(Level::Word, &patterns);
        let joined: String = r.active().map(|i| r.token_text(i)).collect();
        assert_eq!(joined, "see [[Main Page]] now");
    }

    #[test]
    fn refine_tombstones_original_token() {
        let patterns = Patterns::new();
        let mut r = rev("alpha beta", &patterns);
        r.split_initial(Level::Paragraph, &patterns);
        assert_eq!(active_texts(&r), vec!["alpha beta"]);
        let arena_before = r.arena().len();
        r.split_refine(Level::Word, &patterns);
        assert_eq!(active_texts(&r), vec!["alpha", " ", "beta"]);
        // Original token still in the arena, unreachable from the list.
        assert_eq!(r.arena().len(), arena_before + 3);
        check_list(r.arena(), r.first(), r.last()).unwrap();
    }

    #[test]
    fn refine_skips_tokens_that_split_to_themselves() {
        let patterns = Patterns::new();
        let mut r = rev("word", &patterns);
        r.split_initial(Level::Paragraph, &patterns);
        let arena_before = r.arena().len();
        r.split_refine(Level::Line, &patterns);
        r.split_refine(Level::Sentence, &patterns);
        assert_eq!(r.arena().len(), arena_before);
        assert_eq!(active_texts(&r), vec!["word"]);
    }

    #[test]
    fn linked_tokens_are_not_refined() {
        let patterns = Patterns::new();
        let mut r = rev("keep this\n\nsplit this", &patterns);
        r.split_initial(Level::Paragraph, &patterns);
        let first = r.first().unwrap();
        r.token_mut(first).link = Some(0);
        r.split_refine(Level::Word, &patterns);
        assert_eq!(r.token_text(r.first().unwrap()), "keep this");
    }

    #[test]
    fn enumerate_assigns_list_order() {
        let patterns = Patterns::new();
        let mut r = rev("a b c", &patterns);
        r.split_initial(Level::Word, &patterns);
        r.enumerate();
        let numbers: Vec<usize> = r.active().map(|i| r.token(i).number).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn word_counts_tally_words_and_chunks() {
        let patterns = Patterns::new();
        let r = rev("the cat saw the [[cat]]", &patterns);
        assert_eq!(r.word_occurrences("the"), 2);
        assert_eq!(r.word_occurrences("cat"), 2);
        assert_eq!(r.word_occurrences("[[cat]]"), 1);
        assert_eq!(r.word_occurrences("dog"), 0);
    }
}
