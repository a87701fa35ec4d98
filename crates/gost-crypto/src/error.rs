/// An error returned by a crypto object.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An argument was invalid.
    ///
    /// It describes why the argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The object does not implement the requested operation.
    #[error("operation not supported")]
    NotSupported,
    /// The requested algorithm does not exist.
    #[error("algorithm not found")]
    NotFound,
    /// An allocation failed.
    #[error("out of memory")]
    OutOfMemory,
}

/// Shorthand for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;
