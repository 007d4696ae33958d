use thiserror::Error;

use crate::value::ValueKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedEncoding,
    UnterminatedBracket,
    MalformedKey,
    DepthExceeded,
    TypeConflict,
    Deserialize,
    Io,
}

/// Everything that can abort a parse. Offsets are byte positions in the input
/// handed to the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("malformed percent escape at byte {offset}")]
    MalformedEncoding { offset: usize },

    #[error("decoded text at byte {offset} is not valid utf-8")]
    InvalidUtf8 { offset: usize },

    #[error("unterminated bracket in `{path}` at byte {offset}")]
    UnterminatedBracket { path: String, offset: usize },

    #[error("unexpected byte after `{path}` at byte {offset}")]
    MalformedKey { path: String, offset: usize },

    #[error("params too deep: `{path}` exceeds {max_depth} bracket segments")]
    DepthExceeded { path: String, max_depth: usize },

    #[error("type conflict at `{path}`: expected {expected}, found {found}")]
    TypeConflict {
        path: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("deserialize failed: {0}")]
    Deserialize(String),

    #[error("read failed: {0}")]
    Io(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedEncoding { .. } | Error::InvalidUtf8 { .. } => {
                ErrorKind::MalformedEncoding
            }
            Error::UnterminatedBracket { .. } => ErrorKind::UnterminatedBracket,
            Error::MalformedKey { .. } => ErrorKind::MalformedKey,
            Error::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            Error::TypeConflict { .. } => ErrorKind::TypeConflict,
            Error::Deserialize(_) => ErrorKind::Deserialize,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn unterminated(path: &[u8], offset: usize) -> Self {
        Error::UnterminatedBracket {
            path: lossy(path),
            offset,
        }
    }

    pub(crate) fn malformed_key(path: &[u8], offset: usize) -> Self {
        Error::MalformedKey {
            path: lossy(path),
            offset,
        }
    }

    pub(crate) fn too_deep(path: &[u8], max_depth: usize) -> Self {
        Error::DepthExceeded {
            path: lossy(path),
            max_depth,
        }
    }

    pub(crate) fn conflict(path: &[u8], expected: ValueKind, found: ValueKind) -> Self {
        Error::TypeConflict {
            path: lossy(path),
            expected,
            found,
        }
    }

    /// Shifts a decoder offset, which is relative to the decoded span, onto the
    /// coordinates of the whole input.
    pub(crate) fn offset_by(self, base: usize) -> Self {
        match self {
            Error::MalformedEncoding { offset } => Error::MalformedEncoding {
                offset: offset + base,
            },
            Error::InvalidUtf8 { offset } => Error::InvalidUtf8 {
                offset: offset + base,
            },
            other => other,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Deserialize(msg.to_string())
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
