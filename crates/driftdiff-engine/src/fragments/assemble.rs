//! Fragment assembly: linearize the block/group model into the typed
//! stream, wrapping moved groups and emitting move marks at original
//! positions.

use crate::blocks::{BlockKind, BlockModel};
use crate::fragments::types::{Fragment, FragmentKind};

/// Convert the block model into a wrapped `{ [ … ] }` fragment stream.
pub fn assemble(model: &BlockModel) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut order: Vec<usize> = (0..model.groups.len()).collect();
    order.sort_by_key(|&g| model.groups[g].block_start);

    let mut cursor = 0;
    for g in order {
        let group = &model.groups[g];

        // Blocks between group ranges (deletions placed past a group edge)
        // are emitted in place, uncolored.
        while cursor < group.block_start {
            push_block(&mut fragments, model, cursor, None);
            cursor += 1;
        }

        if !group.fixed {
            let opener = match group.moved_from {
                Some(from) if model.groups[from].block_start < group.block_start => {
                    FragmentKind::BlockStartLeft
                }
                _ => FragmentKind::BlockStartRight,
            };
            fragments.push(Fragment::new("", opener, group.color));
        }
        for b in group.block_start.max(cursor)..=group.block_end {
            push_block(&mut fragments, model, b, group.color);
        }
        cursor = cursor.max(group.block_end + 1);
        if !group.fixed {
            fragments.push(Fragment::new("", FragmentKind::BlockEnd, group.color));
        }
    }
    while cursor < model.blocks.len() {
        push_block(&mut fragments, model, cursor, None);
        cursor += 1;
    }

    merge_adjacent(&mut fragments);

    let mut wrapped = Vec::with_capacity(fragments.len() + 4);
    wrapped.push(Fragment::bare(FragmentKind::ContainerStart));
    wrapped.push(Fragment::bare(FragmentKind::FragmentStart));
    wrapped.extend(fragments);
    wrapped.push(Fragment::bare(FragmentKind::FragmentEnd));
    wrapped.push(Fragment::bare(FragmentKind::ContainerEnd));
    wrapped
}

fn push_block(
    fragments: &mut Vec<Fragment>,
    model: &BlockModel,
    block: usize,
    color: Option<usize>,
) {
    let b = &model.blocks[block];
    match b.kind {
        BlockKind::Same => fragments.push(Fragment::new(b.text.clone(), FragmentKind::Same, color)),
        BlockKind::Delete => {
            fragments.push(Fragment::new(b.text.clone(), FragmentKind::Delete, color))
        }
        BlockKind::Insert => {
            fragments.push(Fragment::new(b.text.clone(), FragmentKind::Insert, color))
        }
        BlockKind::Mark => {
            let Some(moved) = b.moved else { return };
            let moved_group = &model.groups[moved];
            // The mark shows the moved group's OLD-side content.
            let mut text = String::new();
            for mb in moved_group.block_start..=moved_group.block_end {
                if matches!(
                    model.blocks[mb].kind,
                    BlockKind::Same | BlockKind::Delete
                ) {
                    text.push_str(&model.blocks[mb].text);
                }
            }
            let kind = if moved_group.block_start > block {
                FragmentKind::MarkRight
            } else {
                FragmentKind::MarkLeft
            };
            fragments.push(Fragment::new(text, kind, moved_group.color));
        }
    }
}

/// Join adjacent text fragments of the same type and color.
fn merge_adjacent(fragments: &mut Vec<Fragment>) {
    let mut merged: Vec<Fragment> = Vec::with_capacity(fragments.len());
    for fragment in fragments.drain(..) {
        if let Some(last) = merged.last_mut() {
            if last.kind == fragment.kind
                && last.color == fragment.color
                && fragment.kind.is_text()
            {
                last.text.push_str(&fragment.text);
                continue;
            }
        }
        merged.push(fragment);
    }
    *fragments = merged;
}
