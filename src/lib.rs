//! # Freebox Client - Device Authorization & RRD Statistics
//!
//! Client library for the Freebox OS local HTTP API: the multi-step
//! application authorization/session handshake, plus retrieval of the
//! device's round-robin-database (RRD) statistics.
//!
//! ## Features
//!
//! - **Session negotiation**: authorize → poll for user approval →
//!   challenge/response → session token, as one cancellable pipeline
//! - **Pluggable collaborators**: HTTP transport and keyed-hash signer
//!   are traits, so tests can script the device end-to-end
//! - **Endpoint discovery**: resolves the HTTPS base URL from the fixed
//!   `api_version` discovery endpoint when none is configured
//! - **Opaque statistics**: the RRD payload is returned unmodified;
//!   query-side types describe what to ask for, never the response
//!
//! ## Handshake Overview
//!
//! ```text
//! Application                              Freebox
//!      |                                      |
//!      |--- POST /login/authorize/ ---------->|  identity
//!      |<-- {app_token, track_id} ------------|
//!      |                                      |   user approves on the
//!      |--- GET /login/authorize/{id} ------->|   device front panel
//!      |<-- pending / granted / denied -------|
//!      |                                      |
//!      |--- GET /login/ --------------------->|
//!      |<-- {challenge} ----------------------|
//!      |--- POST /login/session ------------->|  hmac_sha1(app_token,
//!      |<-- {session_token, permissions} -----|            challenge)
//!      |                                      |
//!      |=== GET /rrd/ ========================|  statistics
//!      |--- POST /login/logout/ ------------->|  revoke
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use freebox::{AppIdentity, ClientConfig, SessionNegotiator};
//!
//! let identity = AppIdentity::new("fr.example.monitor", "Example Monitor", "1.0.0", "laptop")?;
//! let negotiator = SessionNegotiator::new(identity, ClientConfig::default())?;
//!
//! // Blocks (asynchronously) until the user approves the request on the
//! // device front panel, then opens the session.
//! negotiator.login().await?;
//!
//! let stats = negotiator.fetch_stats().await?;
//! println!("{stats}");
//!
//! negotiator.logout().await?;
//! ```
//!
//! ### Aborting a pending login
//!
//! ```rust,ignore
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let handle = cancel.clone();
//! tokio::spawn(async move {
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     handle.cancel();
//! });
//! negotiator.login_with_cancellation(cancel).await?;
//! ```
//!
//! ## Modules
//!
//! - [`login`]: authorization handshake and session negotiation (the core)
//! - [`transport`]: HTTP transport trait and reqwest-backed default
//! - [`signer`]: HMAC-SHA1 session password derivation
//! - [`rrd`]: statistics query types (the response stays opaque)
//! - [`config`]: client configuration
//! - [`error`]: error types and result alias

pub mod config;
pub mod error;
pub mod login;
pub mod rrd;
pub mod signer;
pub mod transport;

// Re-exports for convenience
pub use config::ClientConfig;
pub use error::{FreeboxError, Result, TransportError};
pub use login::{
    AppCredentials, AppIdentity, AuthorizationStatus, NegotiatorState, SessionNegotiator,
};
pub use rrd::{RrdDatabase, RrdQuery};
pub use signer::{HmacSha1Signer, Signer};
pub use transport::{HttpTransport, Method, Transport, TransportFuture};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
