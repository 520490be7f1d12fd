/// Failures surfaced to the embedding host rather than to script code.
///
/// Language-level exceptions never appear here while they are still catchable;
/// they travel as `Completion::Throw` and only become an `EngineError` once a
/// completion reaches the host boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// A throw completion reached the host.
    #[error("Uncaught {0}")]
    Uncaught(String),

    /// A `return`, `break` or `continue` completion reached the host.
    #[error("{0} completion escaped to the host")]
    EscapedControlTransfer(&'static str),

    /// A command-line probe value that names no known value shape.
    #[error("invalid probe value `{0}`")]
    InvalidProbe(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
