use super::types::AgunblockError;

/// Where a failure originated, mirroring how it is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable response: connection failure, non-2xx status, broken body.
    Transport,
    /// The backend answered and reported an error itself.
    Backend,
    /// Rejected before any request was made.
    Input,
    Local,
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub kind: ErrorKind,
}

impl AgunblockError {
    /// Classify this error by origin. Nothing here is retried automatically;
    /// the classification only drives presentation and exit codes.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            AgunblockError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                kind: ErrorKind::Transport,
            },
            AgunblockError::Http { .. } => ErrorClassification {
                error_type: "HttpError",
                kind: ErrorKind::Transport,
            },
            AgunblockError::Stream(_) => ErrorClassification {
                error_type: "StreamError",
                kind: ErrorKind::Transport,
            },
            AgunblockError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                kind: ErrorKind::Transport,
            },
            AgunblockError::Backend(_) => ErrorClassification {
                error_type: "BackendError",
                kind: ErrorKind::Backend,
            },
            AgunblockError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                kind: ErrorKind::Input,
            },
            AgunblockError::InvalidInput(_) => ErrorClassification {
                error_type: "InvalidInputError",
                kind: ErrorKind::Input,
            },
            AgunblockError::Cancelled => ErrorClassification {
                error_type: "CancelledError",
                kind: ErrorKind::Local,
            },
            AgunblockError::Io(_) => ErrorClassification {
                error_type: "IoError",
                kind: ErrorKind::Local,
            },
            AgunblockError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                kind: ErrorKind::Local,
            },
            AgunblockError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                kind: ErrorKind::Local,
            },
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            AgunblockError::Config(_) => 2,
            AgunblockError::InvalidInput(_) => 3,
            _ => match self.classify().kind {
                ErrorKind::Transport => 4,
                ErrorKind::Backend => 5,
                _ => 1,
            },
        }
    }
}
