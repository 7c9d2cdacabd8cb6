use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Network,
    Decode,
}

/// Failure of one listing fetch. Kept by the query cache and surfaced as a
/// non-fatal error signal, so it must be cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("listing request failed with HTTP {0}")]
    Status(u16),
    #[error("listing request failed: {0}")]
    Transport(String),
    #[error("malformed listing payload: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Status(_) | FetchError::Transport(_) => FetchErrorKind::Network,
            FetchError::Decode(_) => FetchErrorKind::Decode,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
