pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("wrong magic {found:?} (wanted {expected:?})")]
    WrongMagic { expected: Vec<u8>, found: Vec<u8> },

    #[error("malformed {context}: {message}")]
    Malformed {
        context: &'static str,
        message: String,
    },

    #[error("{op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{op}: {source}")]
    StorageAccess {
        op: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("reading index: {0}")]
    ReadingIndex(#[source] Box<Error>),

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Coarse classification of an [`Error`], used by callers to map failures to
/// client-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Io,
    NotFound,
    StorageAccess,
    Cancelled,
    InvalidInput,
    Unsupported,
}

impl Error {
    pub fn io(op: &'static str, source: std::io::Error) -> Self {
        Error::Io { op, source }
    }

    pub fn malformed(context: &'static str, message: impl Into<String>) -> Self {
        Error::Malformed {
            context,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::WrongMagic { .. } | Error::Malformed { .. } => ErrorKind::Format,
            Error::Io { .. } => ErrorKind::Io,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::StorageAccess { .. } => ErrorKind::StorageAccess,
            Error::ReadingIndex(inner) => inner.kind(),
            Error::Cancelled => ErrorKind::Cancelled,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::UnsupportedFormat(_) => ErrorKind::Unsupported,
        }
    }

    /// Name used for this error in structured output, following the htsget
    /// error vocabulary.
    pub fn error_type(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::Unsupported => "UnsupportedFormat",
            ErrorKind::Format
            | ErrorKind::Io
            | ErrorKind::StorageAccess
            | ErrorKind::Cancelled => "InternalError",
        }
    }
}
