//! Matching: the symbol-table matcher, gap sliding, and character-level
//! gap refinement.

pub mod chars;
pub mod matcher;
pub mod slider;
pub mod symbols;

pub use chars::split_refine_chars;
pub use matcher::Matcher;
pub use slider::slide_gaps;
