//! Tokenization: regex-driven splitting into a doubly-linked token list over
//! a shared arena, with stepwise refinement from paragraphs down to
//! characters.

pub mod arena;
pub mod patterns;
pub mod sentences;
pub mod span;
pub mod version;

pub use arena::Token;
pub use patterns::{Level, Patterns};
pub use span::Span;
pub use version::Revision;
