use thiserror::Error;

/// The four outcomes a caller has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoCredential,
    Validation,
    Network,
    Application,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MoltbookError {
    #[error("{message}")]
    NoCredential { message: String },

    #[error("{message}")]
    Validation {
        message: String,
        usage: Option<String>,
    },

    #[error("unknown command: {name}")]
    UnknownVerb { name: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("refusing to use http:// without --insecure: {addr}")]
    InsecureAddr { addr: String },

    #[error("malformed response (status {status}): parse failure")]
    MalformedResponse { status: u16 },

    #[error("{message}")]
    Application { status: u16, message: String },
}

impl MoltbookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoCredential { .. } => ErrorKind::NoCredential,
            Self::Validation { .. } | Self::UnknownVerb { .. } => ErrorKind::Validation,
            Self::Network { .. } | Self::InsecureAddr { .. } | Self::MalformedResponse { .. } => {
                ErrorKind::Network
            }
            Self::Application { .. } => ErrorKind::Application,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            usage: None,
        }
    }

    /// Usage line attached to a validation failure, if any.
    pub fn usage(&self) -> Option<&str> {
        match self {
            Self::Validation { usage, .. } => usage.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MoltbookError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = MoltbookError> = std::result::Result<T, E>;
