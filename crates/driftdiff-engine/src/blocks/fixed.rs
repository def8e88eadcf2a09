//! Fixed-group selection: per section, the increasing-OLD-order path of
//! groups with the greatest total character length stays in place; every
//! other group moves.

use crate::blocks::model::BlockModel;
use crate::blocks::types::Group;

impl BlockModel {
    pub(crate) fn set_fixed(&mut self) {
        for s in 0..self.sections.len() {
            let block_start = self.sections[s].block_start;
            let block_end = self.sections[s].block_end;
            let Some(group_start) = self.blocks[block_start].group else {
                continue;
            };
            let Some(group_end) = self.blocks[block_end].group else {
                continue;
            };
            for g in find_max_path(&self.groups, group_start, group_end) {
                self.groups[g].fixed = true;
                for b in self.groups[g].block_start..=self.groups[g].block_end {
                    self.blocks[b].fixed = true;
                }
            }
        }
    }
}

/// Best path of groups in `[group_start, group_end]` with non-decreasing
/// OLD order, maximized by total character length. Ties keep the first
/// candidate in block order.
fn find_max_path(groups: &[Group], group_start: usize, group_end: usize) -> Vec<usize> {
    if group_end < group_start {
        return Vec::new();
    }
    let n = group_end - group_start + 1;
    let mut best_chars = vec![0usize; n];
    let mut onward: Vec<Option<usize>> = vec![None; n];
    for idx in (0..n).rev() {
        let old_number = groups[group_start + idx].old_number.unwrap_or(0);
        let mut max_chars = 0;
        let mut max_next = None;
        for next in idx + 1..n {
            if groups[group_start + next].old_number.unwrap_or(0) < old_number {
                continue;
            }
            if best_chars[next] > max_chars {
                max_chars = best_chars[next];
                max_next = Some(next);
            }
        }
        best_chars[idx] = max_chars + groups[group_start + idx].chars;
        onward[idx] = max_next;
    }

    let mut start = 0;
    let mut start_chars = 0;
    for (idx, &chars) in best_chars.iter().enumerate() {
        if chars > start_chars {
            start_chars = chars;
            start = idx;
        }
    }
    let mut path = Vec::new();
    let mut cur = Some(start);
    while let Some(idx) = cur {
        path.push(group_start + idx);
        cur = onward[idx];
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(old_number: i64, chars: usize) -> Group {
        Group {
            old_number: Some(old_number),
            block_start: 0,
            block_end: 0,
            unique: false,
            max_words: 0,
            words: 0,
            chars,
            fixed: false,
            moved_from: None,
            color: None,
        }
    }

    #[test]
    fn longest_chars_beats_longest_count() {
        // Two short in-order groups (3+3 chars) against one long
        // out-of-order group (10 chars): the long one wins.
        let groups = vec![group(2, 3), group(5, 10), group(3, 3)];
        assert_eq!(find_max_path(&groups, 0, 2), vec![0, 1]);
        let groups = vec![group(2, 3), group(5, 100), group(3, 3)];
        assert_eq!(find_max_path(&groups, 0, 2), vec![0, 1]);
        let groups = vec![group(5, 3), group(2, 10), group(6, 3)];
        // The heavy middle group chains with the in-order tail.
        assert_eq!(find_max_path(&groups, 0, 2), vec![1, 2]);
    }

    #[test]
    fn equal_weight_tie_keeps_first_in_block_order() {
        let groups = vec![group(5, 4), group(1, 4)];
        assert_eq!(find_max_path(&groups, 0, 1), vec![0]);
    }

    #[test]
    fn increasing_run_is_taken_whole() {
        let groups = vec![group(1, 2), group(2, 2), group(3, 2)];
        assert_eq!(find_max_path(&groups, 0, 2), vec![0, 1, 2]);
    }
}
