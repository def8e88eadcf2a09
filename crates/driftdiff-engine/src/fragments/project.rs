//! Projections of the (unclipped) fragment stream back onto the input
//! texts, used by the self-check and the test suite.

use crate::fragments::types::{Fragment, FragmentKind};

/// Reconstruct the NEW text: every `=` and `+` fragment in stream order,
/// including those inside moved-block wrappers.
pub fn project_new(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for f in fragments {
        if matches!(f.kind, FragmentKind::Same | FragmentKind::Insert) {
            out.push_str(&f.text);
        }
    }
    out
}

/// Reconstruct the OLD text: `=` and `-` fragments outside moved-block
/// wrappers, plus the move marks, which carry each moved group's OLD-side
/// content at its original position.
pub fn project_old(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for f in fragments {
        match f.kind {
            FragmentKind::BlockStartLeft | FragmentKind::BlockStartRight => depth += 1,
            FragmentKind::BlockEnd => depth = depth.saturating_sub(1),
            FragmentKind::Same | FragmentKind::Delete if depth == 0 => out.push_str(&f.text),
            FragmentKind::MarkLeft | FragmentKind::MarkRight => out.push_str(&f.text),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(kind: FragmentKind, text: &str, color: Option<usize>) -> Fragment {
        Fragment::new(text, kind, color)
    }

    #[test]
    fn projections_of_a_moved_block_stream() {
        use FragmentKind::*;
        // { [ >"A B"  -" "  ="C D"  +" "  (< ="A B" ) ] } for
        // old "A B C D" → new "C D A B".
        let stream = vec![
            f(ContainerStart, "", None),
            f(FragmentStart, "", None),
            f(MarkRight, "A B", Some(1)),
            f(Delete, " ", None),
            f(Same, "C D", None),
            f(Insert, " ", None),
            f(BlockStartLeft, "", Some(1)),
            f(Same, "A B", Some(1)),
            f(BlockEnd, "", Some(1)),
            f(FragmentEnd, "", None),
            f(ContainerEnd, "", None),
        ];
        assert_eq!(project_new(&stream), "C D A B");
        assert_eq!(project_old(&stream), "A B C D");
    }
}
