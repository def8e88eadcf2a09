//! driftdiff-engine: a visual inline text-difference engine with
//! block-move detection.
//!
//! Given two revisions of a text (typically wiki markup), the engine
//! links matching tokens through stepwise refinement (paragraph → line →
//! sentence → chunk → word → character), slides ambiguous gaps to natural
//! boundaries, separates fixed from moved blocks, and emits a typed
//! [`Fragment`] stream that presentation layers render as an inline diff.
//!
//! ```
//! use driftdiff_engine::{diff, FragmentKind};
//!
//! let result = diff("the quick brown fox", "the quick red fox").unwrap();
//! let kinds: Vec<FragmentKind> = result
//!     .fragments
//!     .iter()
//!     .filter(|f| f.kind.is_text())
//!     .map(|f| f.kind)
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         FragmentKind::Same,
//!         FragmentKind::Delete,
//!         FragmentKind::Insert,
//!         FragmentKind::Same
//!     ]
//! );
//! ```

pub mod blocks;
pub mod engine;
pub mod error;
pub mod fragments;
pub mod matching;
pub mod options;
pub mod render;
pub mod tokens;
pub mod unicode;

pub use engine::{DiffEngine, DiffResult, StageTiming};
pub use error::DiffError;
pub use fragments::{project_new, project_old, Fragment, FragmentKind};
pub use options::DiffOptions;
pub use render::render_text;

/// Diff two texts with default options.
pub fn diff(old_text: &str, new_text: &str) -> Result<DiffResult, DiffError> {
    DiffEngine::with_defaults().diff(old_text, new_text)
}
