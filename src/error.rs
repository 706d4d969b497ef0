use thiserror::Error;

/// HTTP statuses worth another attempt against the upstream source.
pub const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Failure to obtain or decode the raw snapshot bytes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataLoadError {
    #[error("Connection error fetching {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Timed out fetching {url} after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("Upstream {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Connection lost after the response headers arrived
    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("Payload is not a readable Arrow IPC file or stream: {0}")]
    Decode(String),
}

impl DataLoadError {
    /// Whether the same request may succeed if repeated.
    pub fn is_transient(&self) -> bool {
        match self {
            DataLoadError::Connection { .. }
            | DataLoadError::Timeout { .. }
            | DataLoadError::Body { .. } => true,
            DataLoadError::Status { status, .. } => TRANSIENT_STATUSES.contains(status),
            DataLoadError::Decode(_) => false,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SalesError {
    #[error("Data load error: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("Missing required columns: {}", .missing.join(", "))]
    DataValidation { missing: Vec<String> },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ServiceUnavailable,
    DataContract,
    ClientError,
    Internal,
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::ServiceUnavailable => 503,
            ErrorKind::DataContract => 500,
            ErrorKind::ClientError => 400,
            ErrorKind::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::DataContract => "data_contract",
            ErrorKind::ClientError => "invalid_request",
            ErrorKind::Internal => "internal",
        }
    }
}

impl SalesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SalesError::DataLoad(_) => ErrorKind::ServiceUnavailable,
            SalesError::DataValidation { .. } => ErrorKind::DataContract,
            SalesError::InvalidRequest(_) => ErrorKind::ClientError,
            SalesError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to hand back to a caller. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            SalesError::DataLoad(_) => "Sales data source is currently unavailable".to_string(),
            SalesError::DataValidation { .. } => {
                "Sales data source does not match the expected schema".to_string()
            }
            SalesError::InvalidRequest(msg) => msg.clone(),
            SalesError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for SalesError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        SalesError::Internal(format!("Polars error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let url = "http://example.test/data.arrow".to_string();
        for status in TRANSIENT_STATUSES {
            assert!(DataLoadError::Status { url: url.clone(), status }.is_transient());
        }
        assert!(!DataLoadError::Status { url: url.clone(), status: 404 }.is_transient());
        assert!(!DataLoadError::Status { url: url.clone(), status: 403 }.is_transient());
        assert!(DataLoadError::Timeout { url: url.clone(), timeout_secs: 30 }.is_transient());
        assert!(DataLoadError::Connection { url: url.clone(), message: "refused".into() }.is_transient());
        assert!(DataLoadError::Body { url, message: "connection reset".into() }.is_transient());
        assert!(!DataLoadError::Decode("bad magic".into()).is_transient());
    }

    #[test]
    fn test_validation_message_names_columns() {
        let err = SalesError::DataValidation {
            missing: vec!["Profit".to_string(), "Sales".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required columns: Profit, Sales");
        assert_eq!(err.kind(), ErrorKind::DataContract);
    }

    #[test]
    fn test_kinds_map_to_statuses() {
        let load: SalesError = DataLoadError::Decode("x".into()).into();
        assert_eq!(load.kind().status_code(), 503);
        assert_eq!(SalesError::InvalidRequest("bad date".into()).kind().status_code(), 400);
        assert_eq!(SalesError::Internal("boom".into()).kind().status_code(), 500);
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = SalesError::Internal("secret path /var/lib".into());
        assert!(!err.public_message().contains("/var/lib"));
    }
}
