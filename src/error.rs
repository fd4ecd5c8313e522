use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("Unknown merge strategy: {0:?} (expected inline, separate or contextual)")]
    UnknownStrategy(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure raised by the wrapped splitter, passed through untouched
    #[error(transparent)]
    Delegate(#[from] anyhow::Error),
}
