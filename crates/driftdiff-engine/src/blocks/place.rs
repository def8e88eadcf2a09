//! Placement of deletions, insertions, and move marks against fixed
//! reference blocks.
//!
//! Deletions and marks carry the `new_number` of a fixed reference block
//! and sort around it by OLD order; `-1` places a block before everything.

use crate::blocks::model::BlockModel;
use crate::blocks::types::{Block, BlockKind, Group};
use crate::tokens::{Patterns, Revision};

impl BlockModel {
    /// Collect `-` blocks from the remaining unlinked runs in OLD.
    pub(crate) fn get_del_blocks(&mut self, old_rev: &Revision, patterns: &Patterns) {
        let mut j_opt = old_rev.first();
        while let Some(j) = j_opt {
            if old_rev.token(j).link.is_some() {
                j_opt = old_rev.token(j).next;
                continue;
            }
            let j_start = j;
            let mut text = String::new();
            let mut count = 0;
            let mut cur = Some(j);
            while let Some(k) = cur {
                if old_rev.token(k).link.is_some() {
                    break;
                }
                text.push_str(old_rev.token_text(k));
                count += 1;
                cur = old_rev.token(k).next;
            }
            self.blocks.push(Block {
                kind: BlockKind::Delete,
                old_block: None,
                new_block: None,
                old_number: Some(old_rev.token(j_start).number as i64),
                new_number: 0, // set by position_del_blocks
                old_start: Some(j_start),
                count,
                unique: false,
                words: patterns.word_count(&text),
                chars: text.chars().count(),
                section: None,
                group: None,
                fixed: false,
                moved: None,
                text,
            });
            j_opt = cur;
        }
    }

    /// Position every `-` block against a fixed reference in NEW order.
    pub(crate) fn position_del_blocks(&mut self) {
        let view = self.old_order_view();
        for pos in 0..view.len() {
            let b = view[pos];
            if self.blocks[b].kind != BlockKind::Delete {
                continue;
            }
            let prev = pos.checked_sub(1).map(|p| view[p]);
            let next = view.get(pos + 1).copied();
            let reference = self.find_reference(prev, next, &view, pos);
            self.blocks[b].new_number = match reference {
                Some(r) => self.blocks[r].new_number,
                None => -1,
            };
        }
        self.sort_blocks();
    }

    /// Collect `+` blocks from every maximal unlinked run in NEW.
    pub(crate) fn get_ins_blocks(&mut self, new_rev: &Revision, patterns: &Patterns) {
        let mut i_opt = new_rev.first();
        while let Some(i) = i_opt {
            if new_rev.token(i).link.is_some() {
                i_opt = new_rev.token(i).next;
                continue;
            }
            let i_start = i;
            let mut text = String::new();
            let mut count = 0;
            let mut cur = Some(i);
            while let Some(k) = cur {
                if new_rev.token(k).link.is_some() {
                    break;
                }
                text.push_str(new_rev.token_text(k));
                count += 1;
                cur = new_rev.token(k).next;
            }
            self.blocks.push(Block {
                kind: BlockKind::Insert,
                old_block: None,
                new_block: None,
                old_number: None,
                new_number: new_rev.token(i_start).number as i64,
                old_start: None,
                count,
                unique: false,
                words: patterns.word_count(&text),
                chars: text.chars().count(),
                section: None,
                group: None,
                fixed: false,
                moved: None,
                text,
            });
            i_opt = cur;
        }
        self.sort_blocks();
    }

    /// Insertions and deletions inside an existing group's range join that
    /// group; remaining insertions become fixed singleton groups.
    pub(crate) fn set_ins_groups(&mut self) {
        for g in 0..self.groups.len() {
            let (block_start, block_end, fixed) = {
                let group = &self.groups[g];
                (group.block_start, group.block_end, group.fixed)
            };
            for b in block_start..=block_end {
                if self.blocks[b].group.is_none() {
                    self.blocks[b].group = Some(g);
                    self.blocks[b].fixed = fixed;
                }
            }
        }
        for b in 0..self.blocks.len() {
            if self.blocks[b].kind == BlockKind::Insert && self.blocks[b].group.is_none() {
                let g = self.groups.len();
                self.blocks[b].group = Some(g);
                // Only `=` groups can move; standalone insertions stay put.
                self.blocks[b].fixed = true;
                self.groups.push(Group {
                    old_number: None,
                    block_start: b,
                    block_end: b,
                    unique: false,
                    max_words: self.blocks[b].words,
                    words: self.blocks[b].words,
                    chars: self.blocks[b].chars,
                    fixed: true,
                    moved_from: None,
                    color: None,
                });
            }
        }
    }

    /// Create a `|` mark block at the original position of every moved
    /// group and assign move colors.
    pub(crate) fn insert_marks(&mut self) {
        let view = self.old_order_view();
        let mut color = 0;
        for g in 0..self.groups.len() {
            if self.groups[g].fixed {
                continue;
            }
            // OLD-number span of the group's own members.
            let mut min_old: Option<i64> = None;
            let mut max_old: Option<i64> = None;
            for b in self.groups[g].block_start..=self.groups[g].block_end {
                if self.blocks[b].group != Some(g) {
                    continue;
                }
                if let Some(o) = self.blocks[b].old_number {
                    min_old = Some(min_old.map_or(o, |m: i64| m.min(o)));
                    max_old = Some(max_old.map_or(o, |m: i64| m.max(o)));
                }
            }
            let (Some(min_old), Some(max_old)) = (min_old, max_old) else {
                continue;
            };

            let prev_pos =
                view.partition_point(|&b| self.blocks[b].old_number.unwrap_or(0) < min_old);
            let prev = prev_pos.checked_sub(1).map(|p| view[p]);
            let next_pos =
                view.partition_point(|&b| self.blocks[b].old_number.unwrap_or(0) <= max_old);
            let next = view.get(next_pos).copied();
            let reference = self.find_reference(prev, next, &view, prev_pos);

            color += 1;
            self.groups[g].color = Some(color);
            match reference {
                Some(r) => {
                    let ref_group = self.blocks[r].group;
                    let ref_new_number = self.blocks[r].new_number;
                    self.groups[g].moved_from = ref_group;
                    self.blocks.push(Block {
                        kind: BlockKind::Mark,
                        old_block: None,
                        new_block: None,
                        old_number: self.groups[g].old_number,
                        new_number: ref_new_number,
                        old_start: None,
                        count: 0,
                        unique: false,
                        words: 0,
                        chars: 0,
                        section: None,
                        group: ref_group,
                        fixed: true,
                        moved: Some(g),
                        text: String::new(),
                    });
                }
                None => {
                    // No fixed reference anywhere: a synthetic single-block
                    // group placed before block 0 carries the mark.
                    let synthetic = self.groups.len();
                    let mark_index = self.blocks.len();
                    let group_old_number = self.groups[g].old_number;
                    self.groups[g].moved_from = Some(synthetic);
                    self.blocks.push(Block {
                        kind: BlockKind::Mark,
                        old_block: None,
                        new_block: None,
                        old_number: group_old_number,
                        new_number: -1,
                        old_start: None,
                        count: 0,
                        unique: false,
                        words: 0,
                        chars: 0,
                        section: None,
                        group: Some(synthetic),
                        fixed: true,
                        moved: Some(g),
                        text: String::new(),
                    });
                    self.groups.push(Group {
                        old_number: group_old_number,
                        block_start: mark_index,
                        block_end: mark_index,
                        unique: false,
                        max_words: 0,
                        words: 0,
                        chars: 0,
                        fixed: true,
                        moved_from: None,
                        color: None,
                    });
                }
            }
        }
        self.sort_blocks();
    }

    /// Indices of blocks with an OLD position, sorted by it.
    fn old_order_view(&self) -> Vec<usize> {
        let mut view: Vec<usize> = (0..self.blocks.len())
            .filter(|&b| self.blocks[b].old_number.is_some())
            .collect();
        view.sort_by_key(|&b| self.blocks[b].old_number.unwrap_or(0));
        view
    }

    /// The fixed-reference cascade shared by deletion placement and mark
    /// insertion: prefer the adjacent fixed `=` block, then an adjacent
    /// group-interior `=` block, then the nearest previous fixed `=` block.
    fn find_reference(
        &self,
        prev: Option<usize>,
        next: Option<usize>,
        view: &[usize],
        scan_before: usize,
    ) -> Option<usize> {
        if let Some(p) = prev {
            if self.blocks[p].kind == BlockKind::Same && self.blocks[p].fixed {
                return Some(p);
            }
        }
        if let Some(n) = next {
            if self.blocks[n].kind == BlockKind::Same && self.blocks[n].fixed {
                return Some(n);
            }
        }
        if let Some(p) = prev {
            if self.blocks[p].kind == BlockKind::Same {
                if let Some(g) = self.blocks[p].group {
                    if p != self.groups[g].block_end {
                        return Some(p);
                    }
                }
            }
        }
        if let Some(n) = next {
            if self.blocks[n].kind == BlockKind::Same {
                if let Some(g) = self.blocks[n].group {
                    if n != self.groups[g].block_start {
                        return Some(n);
                    }
                }
            }
        }
        for pos in (0..scan_before.min(view.len())).rev() {
            let c = view[pos];
            if self.blocks[c].kind == BlockKind::Same && self.blocks[c].fixed {
                return Some(c);
            }
        }
        None
    }
}
