//! The post-matching block model: blocks, sections, and groups.

/// Block type: unchanged run, deletion, insertion, or move mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Same,
    Delete,
    Insert,
    Mark,
}

/// A maximal run of like-typed tokens.
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    /// Ordinal among `=` blocks in OLD order.
    pub old_block: Option<usize>,
    /// Ordinal among `=` blocks in NEW order.
    pub new_block: Option<usize>,
    /// Token ordinal of the first OLD-side token.
    pub old_number: Option<i64>,
    /// Token ordinal of the first NEW-side token; `-1` places a block
    /// before everything.
    pub new_number: i64,
    /// Arena index of the first OLD-side token (`=` and `-` blocks).
    pub old_start: Option<usize>,
    pub count: usize,
    /// Whether any member token is a unique anchor.
    pub unique: bool,
    pub words: usize,
    /// Text length in code points.
    pub chars: usize,
    pub section: Option<usize>,
    pub group: Option<usize>,
    pub fixed: bool,
    /// For `Mark` blocks: the moved group whose original position this is.
    pub moved: Option<usize>,
    pub text: String,
}

/// A range of blocks closed under NEW-to-OLD crossings; no move crosses a
/// section boundary.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub block_start: usize,
    pub block_end: usize,
}

/// A maximal run of `=` blocks contiguous in OLD order.
#[derive(Debug, Clone)]
pub struct Group {
    /// Token ordinal of the group's first OLD-side token.
    pub old_number: Option<i64>,
    pub block_start: usize,
    pub block_end: usize,
    pub unique: bool,
    pub max_words: usize,
    pub words: usize,
    pub chars: usize,
    pub fixed: bool,
    /// The group at whose position this group's move mark was placed.
    pub moved_from: Option<usize>,
    /// Move index, 1-based in move order.
    pub color: Option<usize>,
}
