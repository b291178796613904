//! Geocoding Errors
//!
//! Transport and service failures raised by geocoding clients.
//! "Zero results" is not an error; it is an empty document.

use std::time::Duration;

/// Failure to obtain an answer from the geocoding service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// A transport failure happened recently; the request was not attempted.
    #[error("skipping due to recent web service timeout ({}ms of back-off left)", remaining.as_millis())]
    RecentFailureBackoff { remaining: Duration },

    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    TransportTimeout(String),

    /// The request failed at the network layer.
    #[error("transport error: {0}")]
    TransportError(String),

    /// The service answered with a non-success status.
    #[error("HTTP error code {0}")]
    HttpStatus(u16),

    /// The service answered with a success status and an empty body.
    #[error("empty HTTP body in response")]
    EmptyResponse,

    /// The body could not be parsed as the expected document.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The document carries an error element.
    #[error("location service returned an error: {0}")]
    ServiceReported(String),
}

impl GeocodeError {
    /// Failures that open the back-off window.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportTimeout(_) | Self::TransportError(_))
    }
}
