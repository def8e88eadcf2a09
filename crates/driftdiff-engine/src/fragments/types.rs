//! The fragment stream: the engine's stable output model.

use serde::{Deserialize, Serialize};

/// Fragment marker types.
///
/// A stream is shaped `{ [ … ] }`, with `,` separating fragment blocks
/// introduced by clipping. Consumers must tolerate empty-text units and
/// honor the container/fragment nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    /// `{` container start.
    ContainerStart,
    /// `}` container end.
    ContainerEnd,
    /// `[` fragment block start.
    FragmentStart,
    /// `]` fragment block end.
    FragmentEnd,
    /// `,` fragment block separator.
    Separator,
    /// `=` unchanged text.
    Same,
    /// `-` deleted text.
    Delete,
    /// `+` inserted text.
    Insert,
    /// `<` move mark pointing left.
    MarkLeft,
    /// `>` move mark pointing right.
    MarkRight,
    /// `(<` moved-block start, original position to the left.
    BlockStartLeft,
    /// `(>` moved-block start, original position to the right.
    BlockStartRight,
    /// `)` moved-block end.
    BlockEnd,
    /// `~` omission after a fixed-character clip.
    OmissionChars,
    /// ` ~` omission after a blank clip on the left side.
    OmissionBlankLeft,
    /// `~ ` omission before a blank clip on the right side.
    OmissionBlankRight,
}

impl FragmentKind {
    /// The literal marker from the stream grammar.
    pub fn marker(self) -> &'static str {
        match self {
            FragmentKind::ContainerStart => "{",
            FragmentKind::ContainerEnd => "}",
            FragmentKind::FragmentStart => "[",
            FragmentKind::FragmentEnd => "]",
            FragmentKind::Separator => ",",
            FragmentKind::Same => "=",
            FragmentKind::Delete => "-",
            FragmentKind::Insert => "+",
            FragmentKind::MarkLeft => "<",
            FragmentKind::MarkRight => ">",
            FragmentKind::BlockStartLeft => "(<",
            FragmentKind::BlockStartRight => "(>",
            FragmentKind::BlockEnd => ")",
            FragmentKind::OmissionChars => "~",
            FragmentKind::OmissionBlankLeft => " ~",
            FragmentKind::OmissionBlankRight => "~ ",
        }
    }

    /// Whether this kind carries diffed text (`=`, `-`, `+`).
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FragmentKind::Same | FragmentKind::Delete | FragmentKind::Insert
        )
    }
}

/// One typed unit of the output stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub kind: FragmentKind,
    /// Move index for moved blocks and marks, `None` elsewhere.
    pub color: Option<usize>,
}

impl Fragment {
    pub fn new(text: impl Into<String>, kind: FragmentKind, color: Option<usize>) -> Self {
        Self {
            text: text.into(),
            kind,
            color,
        }
    }

    pub fn bare(kind: FragmentKind) -> Self {
        Self::new("", kind, None)
    }
}
