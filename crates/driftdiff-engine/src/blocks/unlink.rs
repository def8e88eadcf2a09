//! Unlinking: groups too weak to anchor block identity are converted back
//! into plain insertions and deletions, which prevents pathological
//! fragmentation between highly different texts.

use crate::blocks::model::BlockModel;
use crate::blocks::types::BlockKind;
use crate::options::DiffOptions;
use crate::tokens::Revision;

impl BlockModel {
    /// Unlink weak groups, or the single-word non-unique flanks of strong
    /// ones. Returns whether anything was unlinked; the caller then
    /// re-slides gaps and re-runs block detection.
    pub(crate) fn unlink_blocks(
        &mut self,
        new_rev: &mut Revision,
        old_rev: &mut Revision,
        options: &DiffOptions,
    ) -> bool {
        let mut unlinked = false;
        for g in 0..self.groups.len() {
            let block_start = self.groups[g].block_start;
            let block_end = self.groups[g].block_end;
            if self.groups[g].max_words < options.block_min_length && !self.groups[g].unique {
                for b in block_start..=block_end {
                    if self.blocks[b].kind == BlockKind::Same {
                        self.unlink_single_block(b, new_rev, old_rev);
                        unlinked = true;
                    }
                }
                continue;
            }

            // Strong group: shave single-word non-unique blocks off the
            // flanks only.
            let mut start_stop = block_end + 1;
            for b in block_start..=block_end {
                if self.blocks[b].kind != BlockKind::Same {
                    continue;
                }
                if self.blocks[b].words > 1 || self.blocks[b].unique {
                    start_stop = b;
                    break;
                }
                self.unlink_single_block(b, new_rev, old_rev);
                unlinked = true;
            }
            let mut b = block_end;
            while b > start_stop {
                if self.blocks[b].kind == BlockKind::Same {
                    if self.blocks[b].words > 1 || self.blocks[b].unique {
                        break;
                    }
                    self.unlink_single_block(b, new_rev, old_rev);
                    unlinked = true;
                }
                b -= 1;
            }
        }
        unlinked
    }

    /// Clear the links of every token in one `=` block, on both sides.
    fn unlink_single_block(&self, block: usize, new_rev: &mut Revision, old_rev: &mut Revision) {
        let Some(mut j) = self.blocks[block].old_start else {
            return;
        };
        for _ in 0..self.blocks[block].count {
            if let Some(i) = old_rev.token(j).link {
                new_rev.token_mut(i).link = None;
            }
            old_rev.token_mut(j).link = None;
            match old_rev.token(j).next {
                Some(n) => j = n,
                None => break,
            }
        }
    }
}
