/// Errors raised while building or restoring a [`Worth`](crate::Worth).
///
/// Arithmetic and comparison never fail; only construction from untrusted
/// input does.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A raw mapping did not map denomination names to integer counts.
    #[error("Worth maps denomination names to integer counts: {0}")]
    InvalidWorthSpec(String),

    /// A persisted document did not have the expected layout.
    #[error("malformed worth document: {0}")]
    MalformedDocument(String),

    /// The persisted bytes were not valid CBOR.
    #[error("CBOR error: {0}")]
    Cbor(#[from] dcbor::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
