//! Backend error types

use thiserror::Error;

use crate::models::DatasetKind;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No {kind} record with id '{id}'")]
    NotFound { kind: DatasetKind, id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BackendError::NotFound {
            kind: DatasetKind::Frameworks,
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "No frameworks record with id '42'");

        let err = BackendError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_decode_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = BackendError::from(parse_err);
        assert!(matches!(err, BackendError::Decode(_)));
        assert!(err.to_string().starts_with("Failed to decode backend response"));
    }
}
