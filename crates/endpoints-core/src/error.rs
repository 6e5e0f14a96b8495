//! Error types for endpoint cache operations.
//!
//! The aggregation path itself never fails: malformed records are skipped
//! and reported. [`EndpointsError`] covers the edges around it, such as
//! parsing configuration values and delivering diagnostic events.

/// Error type for the fallible edges of the endpoint cache.
///
/// # Example
///
/// ```rust
/// use endpoints_core::{EndpointsError, ServiceKey};
///
/// let err = "no-slash".parse::<ServiceKey>().unwrap_err();
/// assert!(matches!(err, EndpointsError::InvalidServiceKey { .. }));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EndpointsError {
    /// A `namespace/name` service key could not be parsed.
    #[error("invalid service key {input:?}: {reason}")]
    InvalidServiceKey {
        /// The rejected input.
        input: String,
        /// Reason why the input was rejected.
        reason: String,
    },

    /// Unknown IP family name.
    #[error("invalid IP family {0:?}: expected one of any, ipv4, ipv6")]
    InvalidIpFamily(String),

    /// The receiving side of an event recorder has gone away.
    #[error("event recorder closed")]
    RecorderClosed,
}

impl EndpointsError {
    /// Create an invalid service key error.
    pub fn invalid_service_key(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidServiceKey {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
