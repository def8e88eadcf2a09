//! Block detection: collect `=` runs from the linked token lists, find
//! crossing-closed sections and OLD-contiguous groups, choose fixed groups,
//! optionally unlink weak groups, then place deletions, insertions, and
//! move marks.

use log::debug;

use crate::blocks::types::{Block, BlockKind, Group, Section};
use crate::matching::slider::slide_gaps;
use crate::options::DiffOptions;
use crate::tokens::{Patterns, Revision};

pub struct BlockModel {
    pub blocks: Vec<Block>,
    pub sections: Vec<Section>,
    pub groups: Vec<Group>,
    /// Longest `=` block in words, gating the unlink phase.
    pub(crate) max_words: usize,
}

impl BlockModel {
    /// Run the whole extraction phase over enumerated, fully matched token
    /// lists.
    pub fn detect(
        new_rev: &mut Revision,
        old_rev: &mut Revision,
        options: &DiffOptions,
        patterns: &Patterns,
    ) -> Self {
        let mut model = Self {
            blocks: Vec::new(),
            sections: Vec::new(),
            groups: Vec::new(),
            max_words: 0,
        };
        model.detect_same(new_rev, old_rev, patterns);

        // Convert weak groups back to insertions and deletions, as long as
        // at least one block is strong enough to anchor the text.
        if options.unlink_blocks && model.max_words >= options.block_min_length {
            let mut cycles = 0;
            while cycles < options.unlink_max
                && model.unlink_blocks(new_rev, old_rev, options)
            {
                cycles += 1;
                slide_gaps(new_rev, old_rev, patterns);
                slide_gaps(old_rev, new_rev, patterns);
                model.detect_same(new_rev, old_rev, patterns);
            }
            if cycles > 0 {
                debug!("unlinked weak groups in {cycles} cycle(s)");
            }
        }

        model.get_del_blocks(old_rev, patterns);
        model.position_del_blocks();
        model.get_ins_blocks(new_rev, patterns);
        model.set_ins_groups();
        model.insert_marks();
        model
    }

    /// The `=`-block / section / group / fixed pipeline, re-run from
    /// scratch after every unlink cycle.
    fn detect_same(&mut self, new_rev: &Revision, old_rev: &Revision, patterns: &Patterns) {
        self.get_same_blocks(new_rev, old_rev, patterns);
        self.get_sections();
        self.get_groups();
        self.set_fixed();
    }

    /// Collect maximal lockstep-linked runs from OLD as `=` blocks, then
    /// order them by NEW position.
    fn get_same_blocks(&mut self, new_rev: &Revision, old_rev: &Revision, patterns: &Patterns) {
        self.blocks.clear();
        self.sections.clear();
        self.groups.clear();
        self.max_words = 0;

        let mut j_opt = old_rev.first();
        loop {
            // Skip deletion runs.
            while let Some(j) = j_opt {
                if old_rev.token(j).link.is_some() {
                    break;
                }
                j_opt = old_rev.token(j).next;
            }
            let Some(j_start) = j_opt else { break };
            let Some(i_start) = old_rev.token(j_start).link else {
                break;
            };

            // Extend while the link chain moves in lockstep through NEW.
            let mut text = String::new();
            let mut count = 0;
            let mut unique = false;
            let mut expected = Some(i_start);
            while let (Some(j), Some(i)) = (j_opt, expected) {
                if old_rev.token(j).link != Some(i) {
                    break;
                }
                text.push_str(old_rev.token_text(j));
                count += 1;
                if new_rev.token(i).unique {
                    unique = true;
                }
                expected = new_rev.token(i).next;
                j_opt = old_rev.token(j).next;
            }

            let words = patterns.word_count(&text);
            if words > self.max_words {
                self.max_words = words;
            }
            self.blocks.push(Block {
                kind: BlockKind::Same,
                old_block: Some(self.blocks.len()),
                new_block: None,
                old_number: Some(old_rev.token(j_start).number as i64),
                new_number: new_rev.token(i_start).number as i64,
                old_start: Some(j_start),
                count,
                unique,
                words,
                chars: text.chars().count(),
                section: None,
                group: None,
                fixed: false,
                moved: None,
                text,
            });
        }

        self.blocks.sort_by_key(|b| b.new_number);
        for (ordinal, block) in self.blocks.iter_mut().enumerate() {
            block.new_block = Some(ordinal);
        }
    }

    /// Sections: ranges of blocks closed under NEW-to-OLD crossings. Blocks
    /// outside every section never move.
    fn get_sections(&mut self) {
        let mut block = 0;
        while block < self.blocks.len() {
            let section_start = block;
            let mut section_end = block;
            let mut old_max = self.blocks[section_start].old_number.unwrap_or(0);
            let mut section_old_max = old_max;
            for j in section_start + 1..self.blocks.len() {
                let old_number = self.blocks[j].old_number.unwrap_or(0);
                if old_number > old_max {
                    old_max = old_number;
                } else if old_number < section_old_max {
                    // Crossing over to the left: the section must reach j.
                    section_end = j;
                    section_old_max = old_max;
                }
            }
            if section_end > section_start {
                let section = self.sections.len();
                for b in section_start..=section_end {
                    self.blocks[b].section = Some(section);
                }
                self.sections.push(Section {
                    block_start: section_start,
                    block_end: section_end,
                });
                block = section_end + 1;
            } else {
                block += 1;
            }
        }
    }

    /// Groups: maximal runs of blocks with consecutive OLD-order ordinals.
    fn get_groups(&mut self) {
        let mut block = 0;
        while block < self.blocks.len() {
            let group_start = block;
            let mut group_end = block;
            let Some(mut old_block) = self.blocks[group_start].old_block else {
                block += 1;
                continue;
            };
            let mut words = self.blocks[group_start].words;
            let mut max_words = words;
            let mut unique = self.blocks[group_start].unique;
            let mut chars = self.blocks[group_start].chars;
            for i in group_start + 1..self.blocks.len() {
                if self.blocks[i].old_block != Some(old_block + 1) {
                    break;
                }
                old_block += 1;
                if self.blocks[i].words > max_words {
                    max_words = self.blocks[i].words;
                }
                if self.blocks[i].unique {
                    unique = true;
                }
                words += self.blocks[i].words;
                chars += self.blocks[i].chars;
                group_end = i;
            }

            // Groups outside sections cannot cross anything: fixed.
            let fixed = self.blocks[group_start].section.is_none();
            let group = self.groups.len();
            for b in group_start..=group_end {
                self.blocks[b].group = Some(group);
                self.blocks[b].fixed = fixed;
            }
            self.groups.push(Group {
                old_number: self.blocks[group_start].old_number,
                block_start: group_start,
                block_end: group_end,
                unique,
                max_words,
                words,
                chars,
                fixed,
                moved_from: None,
                color: None,
            });
            block = group_end + 1;
        }
    }

    /// Re-sort blocks by `(new_number, old_number)` and reseat every
    /// group's block range.
    pub(crate) fn sort_blocks(&mut self) {
        self.blocks.sort_by_key(|b| (b.new_number, b.old_number.unwrap_or(0)));
        let mut seen = vec![false; self.groups.len()];
        for idx in 0..self.blocks.len() {
            if let Some(g) = self.blocks[idx].group {
                if !seen[g] {
                    self.groups[g].block_start = idx;
                    seen[g] = true;
                }
                self.groups[g].block_end = idx;
            }
        }
    }
}
