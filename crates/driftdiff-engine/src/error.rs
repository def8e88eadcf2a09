use thiserror::Error;

/// Errors surfaced by the engine. No error is retried and no partial work
/// is salvaged: callers get either a valid fragment stream or one of these.
#[derive(Debug, Error)]
pub enum DiffError {
    /// A configuration value outside its declared domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Token arena or linked-list invariants failed. Not expected under
    /// valid input; indicates a bug in the engine.
    #[error("tokenizer invariant violated: {0}")]
    Tokenizer(String),

    /// Matcher link-symmetry invariants failed. Not expected under valid
    /// input; indicates a bug in the engine.
    #[error("matcher invariant violated: {0}")]
    Matcher(String),
}
