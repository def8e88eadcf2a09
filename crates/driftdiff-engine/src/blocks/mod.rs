//! Block extraction: the `=`/`-`/`+`/`|` block model with sections,
//! groups, fixed-group selection, unlinking, and move-mark placement.

mod fixed;
mod model;
mod place;
mod types;
mod unlink;

pub use model::BlockModel;
pub use types::{Block, BlockKind, Group, Section};
