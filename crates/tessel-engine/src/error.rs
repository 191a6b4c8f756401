use std::fmt;

/// Error category, for callers that branch on the kind of failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// A constructor or calculation received arguments that can never be valid.
    InvalidArgument,
    /// The caller broke an API contract (draw outside a batch scope, null texture).
    Usage,
    /// A handle or key did not resolve to a live object.
    NotFound,
    /// The request exceeds what the engine supports (16-bit index range).
    NotSupported,
    /// GPU resource creation or submission failed.
    Gpu,
}

/// Engine error.
///
/// Each variant carries a human readable message describing the offending input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
    InvalidArgument(String),
    Usage(String),
    NotFound(String),
    NotSupported(String),
    Gpu(String),
}

impl Error {
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    #[inline]
    pub fn usage(msg: impl Into<String>) -> Self {
        Error::Usage(msg.into())
    }

    #[inline]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    #[inline]
    pub fn not_supported(msg: impl Into<String>) -> Self {
        Error::NotSupported(msg.into())
    }

    #[inline]
    pub fn gpu(msg: impl Into<String>) -> Self {
        Error::Gpu(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Usage(_) => ErrorKind::Usage,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::NotSupported(_) => ErrorKind::NotSupported,
            Error::Gpu(_) => ErrorKind::Gpu,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::InvalidArgument(m)
            | Error::Usage(m)
            | Error::NotFound(m)
            | Error::NotSupported(m)
            | Error::Gpu(m) => m,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind() {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::Usage => "usage error",
            ErrorKind::NotFound => "not found",
            ErrorKind::NotSupported => "not supported",
            ErrorKind::Gpu => "gpu error",
        };
        write!(f, "{prefix}: {}", self.message())
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
