//! Freebox client error types.
//!
//! Every negotiation step has its own error kind so callers can tell the
//! remediation paths apart: a revoked token means re-authorizing from
//! scratch, a poll timeout means asking the user to try again, a transport
//! failure means checking the network. The client performs no internal
//! retries besides the intentional `pending` poll loop; everything else is
//! surfaced and left to the caller.

use thiserror::Error;

/// Freebox client errors.
#[derive(Error, Debug)]
pub enum FreeboxError {
    /// A required application identity field was empty.
    #[error("invalid application identity: {field} must not be empty")]
    Construction {
        /// Name of the offending identity field.
        field: &'static str,
    },

    /// The api_version discovery call failed or its payload was malformed.
    #[error("endpoint resolution failed: {0}")]
    EndpointResolution(String),

    /// The initial authorization request failed or was refused by the device.
    #[error("authorization request failed: {0}")]
    AuthorizationRequest(String),

    /// The user denied the authorization request on the device.
    #[error("the user denied the authorization request")]
    AuthorizationDenied,

    /// The user did not confirm the authorization within the given time.
    #[error("the user did not confirm the authorization within the given time")]
    AuthorizationTimeout,

    /// The app_token is invalid or has been revoked.
    #[error("the app_token is invalid or has been revoked")]
    AuthorizationRevoked,

    /// Challenge retrieval or session opening failed.
    #[error("session establishment failed: {0}")]
    SessionEstablishment(String),

    /// The device refused or failed to revoke the session on logout.
    /// Local credentials are already cleared when this is returned; it is
    /// a report, not a reason to keep using the session.
    #[error("logout failed: {0}")]
    LogoutFailure(String),

    /// Operation requires an established session.
    #[error("not authenticated: no session is established")]
    NotAuthenticated,

    /// A login is already in flight on this negotiator.
    #[error("a login is already in progress")]
    LoginInProgress,

    /// The caller cancelled the login while polling for authorization.
    #[error("login cancelled by caller")]
    Cancelled,

    /// Transport-level failure, passed through from the transport collaborator.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors produced by [`Transport`](crate::transport::Transport)
/// implementations.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be performed (connect failure, timeout, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// The response body was not the JSON the device is expected to send.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

/// Result type alias for Freebox client operations.
pub type Result<T> = std::result::Result<T, FreeboxError>;
