//! The symbol-table matcher: five passes, an empty-table repeat to recover
//! cross-over duplicates, and bounded recursion into unresolved sub-gaps.
//!
//! Each invocation links as many NEW↔OLD token pairs as possible within the
//! current gap without touching previously linked pairs:
//!
//! 1. walk NEW and count unlinked tokens into the symbol table;
//! 2. walk OLD the same way;
//! 3. link every token string occurring exactly once on both sides, unless
//!    it is whitespace-only;
//! 4. extend each linked border downward over equal neighbors;
//! 5. extend upward.
//!
//! Tokens adjacent to the text boundaries are treated as implicitly matched
//! at the root call, so common prefixes and suffixes link without symbol
//! table entries.

use log::trace;

use crate::matching::symbols::SymbolTable;
use crate::options::DiffOptions;
use crate::tokens::{Level, Patterns, Revision};

pub struct Matcher<'a> {
    new_rev: &'a mut Revision,
    old_rev: &'a mut Revision,
    patterns: &'a Patterns,
    options: &'a DiffOptions,
}

#[derive(Clone, Copy)]
struct Call {
    repeating: bool,
    new_start: Option<usize>,
    old_start: Option<usize>,
    up: bool,
    depth: usize,
}

impl<'a> Matcher<'a> {
    pub fn new(
        new_rev: &'a mut Revision,
        old_rev: &'a mut Revision,
        patterns: &'a Patterns,
        options: &'a DiffOptions,
    ) -> Self {
        Self {
            new_rev,
            old_rev,
            patterns,
            options,
        }
    }

    /// Match all still-unlinked tokens at `level` across the full lists.
    pub fn run(&mut self, level: Level) {
        let call = Call {
            repeating: false,
            new_start: self.new_rev.first(),
            old_start: self.old_rev.first(),
            up: false,
            depth: 0,
        };
        self.calculate(level, call);
    }

    fn calculate(&mut self, level: Level, call: Call) {
        let mut symbols = SymbolTable::new();
        let mut borders_down: Vec<(usize, usize)> = Vec::new();
        let mut borders_up: Vec<(usize, usize)> = Vec::new();

        // Boundary-as-connected: at the root, leading and trailing runs of
        // equal tokens link without symbol-table entries.
        if call.depth == 0 && !call.repeating {
            if let Some(border) =
                self.link_common_run(self.new_rev.first(), self.old_rev.first(), false)
            {
                borders_down.push(border);
            }
            if let Some(border) =
                self.link_common_run(self.new_rev.last(), self.old_rev.last(), true)
            {
                borders_up.push(border);
            }
        }

        // Pass 1: populate the symbol table from NEW.
        let mut cur = call.new_start;
        while let Some(i) = cur {
            if self.new_rev.token(i).link.is_none() {
                let text = self.new_rev.token_text(i).to_string();
                symbols.register_new(&text, i);
            } else if call.depth > 0 {
                // Recursive calls stay within their gap.
                break;
            }
            cur = step(self.new_rev, i, call.up);
        }

        // Pass 2: populate from OLD.
        let mut cur = call.old_start;
        while let Some(j) = cur {
            if self.old_rev.token(j).link.is_none() {
                let text = self.old_rev.token_text(j).to_string();
                symbols.register_old(&text, j);
            } else if call.depth > 0 {
                break;
            }
            cur = step(self.old_rev, j, call.up);
        }

        // Pass 3: link unique pairs.
        for s in 0..symbols.len() {
            let symbol = symbols.get(s);
            if symbol.new_count != 1 || symbol.old_count != 1 {
                continue;
            }
            let (Some(ni), Some(oi)) = (symbol.new_token, symbol.old_token) else {
                continue;
            };
            if self.new_rev.token(ni).link.is_some() || self.old_rev.token(oi).link.is_some() {
                continue;
            }
            let unique = {
                let text = self.new_rev.token_text(ni);
                // Whitespace cannot serve as a unique anchor.
                if text.chars().all(char::is_whitespace) {
                    continue;
                }
                call.depth == 0 && self.is_anchor(level, text)
            };
            self.new_rev.token_mut(ni).link = Some(oi);
            self.old_rev.token_mut(oi).link = Some(ni);
            if unique {
                self.new_rev.token_mut(ni).unique = true;
                self.old_rev.token_mut(oi).unique = true;
            }
            symbols.linked = true;
            borders_down.push((ni, oi));
            borders_up.push((ni, oi));
        }
        trace!(
            "matcher {} depth {} repeat {}: {} symbols, {} down / {} up borders",
            level.name(),
            call.depth,
            call.repeating,
            symbols.len(),
            borders_down.len(),
            borders_up.len()
        );

        // Pass 4: extend borders downward; the last matching pair of each
        // border becomes the frontier for recursion.
        let mut frontier_down = Vec::with_capacity(borders_down.len());
        for &(start_new, start_old) in &borders_down {
            let (mut ni, mut oi) = (start_new, start_old);
            loop {
                let (Some(a), Some(b)) =
                    (self.new_rev.token(ni).next, self.old_rev.token(oi).next)
                else {
                    break;
                };
                if !self.linkable_pair(a, b) {
                    break;
                }
                self.new_rev.token_mut(a).link = Some(b);
                self.old_rev.token_mut(b).link = Some(a);
                ni = a;
                oi = b;
            }
            frontier_down.push((ni, oi));
        }

        // Pass 5: extend upward.
        let mut frontier_up = Vec::with_capacity(borders_up.len());
        for &(start_new, start_old) in &borders_up {
            let (mut ni, mut oi) = (start_new, start_old);
            loop {
                let (Some(a), Some(b)) =
                    (self.new_rev.token(ni).prev, self.old_rev.token(oi).prev)
                else {
                    break;
                };
                if !self.linkable_pair(a, b) {
                    break;
                }
                self.new_rev.token_mut(a).link = Some(b);
                self.old_rev.token_mut(b).link = Some(a);
                ni = a;
                oi = b;
            }
            frontier_up.push((ni, oi));
        }

        // Re-run once with a fresh symbol table over the same range: tokens
        // occurring twice may have become unique within an unresolved
        // sub-range now that earlier pairs are linked.
        if !call.repeating && self.options.repeated_diff {
            self.calculate(
                level,
                Call {
                    repeating: true,
                    ..call
                },
            );
        }

        // Recurse into the unresolved gaps just past each frontier border.
        if self.options.recursive_diff && call.depth < self.options.recursion_max {
            for &(ni, oi) in &frontier_down {
                let (Some(a), Some(b)) =
                    (self.new_rev.token(ni).next, self.old_rev.token(oi).next)
                else {
                    continue;
                };
                if self.new_rev.token(a).link.is_none() && self.old_rev.token(b).link.is_none() {
                    self.calculate(
                        level,
                        Call {
                            repeating: false,
                            new_start: Some(a),
                            old_start: Some(b),
                            up: false,
                            depth: call.depth + 1,
                        },
                    );
                }
            }
            for &(ni, oi) in &frontier_up {
                let (Some(a), Some(b)) =
                    (self.new_rev.token(ni).prev, self.old_rev.token(oi).prev)
                else {
                    continue;
                };
                if self.new_rev.token(a).link.is_none() && self.old_rev.token(b).link.is_none() {
                    self.calculate(
                        level,
                        Call {
                            repeating: false,
                            new_start: Some(a),
                            old_start: Some(b),
                            up: true,
                            depth: call.depth + 1,
                        },
                    );
                }
            }
        }
    }

    /// Link equal unlinked tokens pairwise starting from a text boundary;
    /// returns the last linked pair as a border for recursion.
    fn link_common_run(
        &mut self,
        new_from: Option<usize>,
        old_from: Option<usize>,
        up: bool,
    ) -> Option<(usize, usize)> {
        let mut last = None;
        let (mut i, mut j) = (new_from, old_from);
        while let (Some(a), Some(b)) = (i, j) {
            if !self.linkable_pair(a, b) {
                break;
            }
            self.new_rev.token_mut(a).link = Some(b);
            self.old_rev.token_mut(b).link = Some(a);
            last = Some((a, b));
            i = step(self.new_rev, a, up);
            j = step(self.old_rev, b, up);
        }
        last
    }

    fn linkable_pair(&self, a: usize, b: usize) -> bool {
        self.new_rev.token(a).link.is_none()
            && self.old_rev.token(b).link.is_none()
            && self.new_rev.token_text(a) == self.old_rev.token_text(b)
    }

    /// The `unique` attribute of a linked pair: a stable anchor for block
    /// identity. Character-level links always qualify; otherwise the token
    /// must carry enough words or a word occurring exactly once in both
    /// revisions.
    fn is_anchor(&self, level: Level, text: &str) -> bool {
        if level == Level::Character {
            return true;
        }
        let words = self.patterns.words_and_chunks(text);
        if words.len() >= self.options.block_min_length {
            return true;
        }
        words
            .iter()
            .any(|w| self.new_rev.word_occurrences(w) == 1 && self.old_rev.word_occurrences(w) == 1)
    }
}

fn step(rev: &Revision, i: usize, up: bool) -> Option<usize> {
    if up {
        rev.token(i).prev
    } else {
        rev.token(i).next
    }
}
