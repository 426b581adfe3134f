//! Error types for the UPR CLI
//!
//! All errors are user-facing with clear messages and, where it helps, a
//! suggestion for what to try next. Transient failures (network, timeout)
//! are retried inside the API client and only surface here once retries are
//! exhausted.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Comprehensive error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Network request failed after retries were exhausted
    #[error("Network error: {0}. Check your internet connection, then retry; UniProt may also be briefly unavailable.")]
    Network(String),

    /// Request exceeded its timeout after retries were exhausted
    #[error("Request timed out: {0}. UniProt may be under load; retry later or lower --limit.")]
    Timeout(String),

    /// The queried entry does not exist (HTTP 404, never retried)
    #[error("Not found: {0}. Verify the identifier on https://www.uniprot.org.")]
    NotFound(String),

    /// The API returned data we could not parse
    #[error("Malformed response: {0}. The UniProt API may have changed; try --format fasta as a workaround.")]
    MalformedResponse(String),

    /// Request descriptor failed validation before any network call
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Problem reading an accession list file
    #[error("Input file error: {0}. Expected one accession per line; '#' starts a comment.")]
    InputFile(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON handling failed
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create an invalid-request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an input-file error
    pub fn input_file(msg: impl Into<String>) -> Self {
        Self::InputFile(msg.into())
    }

    /// Whether this error kind is transient (worth retrying)
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

impl From<reqwest::Error> for CliError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(CliError::network("connection reset").is_transient());
        assert!(CliError::timeout("30s elapsed").is_transient());
        assert!(!CliError::not_found("P00000").is_transient());
        assert!(!CliError::invalid_request("no mode").is_transient());
        assert!(!CliError::malformed("bad json").is_transient());
    }

    #[test]
    fn test_messages_are_actionable() {
        let err = CliError::not_found("entry P00000");
        assert!(err.to_string().contains("uniprot.org"));

        let err = CliError::invalid_request("limit must be greater than zero");
        assert!(err.to_string().contains("limit must be greater than zero"));
    }
}
