//! Network error types

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// How the UI should treat a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No valid session; treated as logged out
    Authentication,
    /// The backend refused the request and said why
    Rejected,
    /// Transport or decoding failure
    Network,
}

/// Network errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not authenticated ({status})")]
    Unauthorized { status: u16 },

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request timed out")]
    Timeout,
}

impl Error {
    /// Classify a transport failure, separating timeouts from other errors
    pub(crate) fn transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else {
            Error::Http(e)
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Unauthorized { .. } => FailureKind::Authentication,
            Error::Rejected { .. } => FailureKind::Rejected,
            Error::Http(_) | Error::Decode(_) | Error::Timeout => FailureKind::Network,
        }
    }

    /// Text suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            Error::Rejected { message, .. } => message.clone(),
            Error::Unauthorized { .. } => "Please log in again".to_string(),
            _ => "Connection error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let rejected = Error::Rejected {
            status: 409,
            message: "Slot already booked".to_string(),
        };
        assert_eq!(rejected.kind(), FailureKind::Rejected);
        assert_eq!(rejected.user_message(), "Slot already booked");

        let unauthorized = Error::Unauthorized { status: 401 };
        assert_eq!(unauthorized.kind(), FailureKind::Authentication);

        let decode = Error::Decode(serde_json::from_str::<u8>("x").unwrap_err());
        assert_eq!(decode.kind(), FailureKind::Network);
        assert_eq!(decode.user_message(), "Connection error");

        assert_eq!(Error::Timeout.kind(), FailureKind::Network);
        assert_eq!(Error::Timeout.user_message(), "Connection error");
    }
}
