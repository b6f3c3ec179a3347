//! Application identity and negotiated credentials.

use serde_json::{Map, Value};

use crate::error::{FreeboxError, Result};

/// Immutable identity of the calling application.
///
/// Shown to the user on the device front panel when they approve the
/// authorization request. Every field must be non-empty; violations are
/// rejected at construction time, before any network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    /// Application identifier, e.g. `fr.example.monitor`.
    pub app_id: String,
    /// Application display name.
    pub app_name: String,
    /// Application version.
    pub app_version: String,
    /// Name of the device running the application.
    pub device_name: String,
}

impl AppIdentity {
    /// Validate and build an identity.
    pub fn new(
        app_id: impl Into<String>,
        app_name: impl Into<String>,
        app_version: impl Into<String>,
        device_name: impl Into<String>,
    ) -> Result<Self> {
        let identity = Self {
            app_id: app_id.into(),
            app_name: app_name.into(),
            app_version: app_version.into(),
            device_name: device_name.into(),
        };
        identity.validate()?;
        Ok(identity)
    }

    /// Check that every field is non-empty.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("app_id", &self.app_id),
            ("app_name", &self.app_name),
            ("app_version", &self.app_version),
            ("device_name", &self.device_name),
        ] {
            if value.is_empty() {
                return Err(FreeboxError::Construction { field });
            }
        }
        Ok(())
    }
}

impl Default for AppIdentity {
    /// Stock identity for tooling that does not care about branding.
    fn default() -> Self {
        Self {
            app_id: "freebox-client".to_string(),
            app_name: "Freebox Client".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            device_name: "rust".to_string(),
        }
    }
}

/// Mutable state accumulated while negotiating a session.
///
/// Starts empty; each field is set exactly once per negotiation and the
/// whole set is cleared on logout or when `login` is re-run. The
/// `session_token` is only valid for the lifetime of the negotiated
/// session; the `app_token` is long-lived and worth persisting on the
/// caller's side.
#[derive(Debug, Clone, Default)]
pub struct AppCredentials {
    /// Long-lived credential identifying the application.
    pub app_token: Option<String>,
    /// Handle used to poll the authorization status.
    pub track_id: Option<String>,
    /// Server nonce consumed while deriving the session password.
    pub challenge: Option<String>,
    /// Hex-encoded HMAC-SHA1 of the challenge keyed with the app_token.
    pub derived_password: Option<String>,
    /// Short-lived credential scoped to the current session.
    pub session_token: Option<String>,
    /// Permissions granted to the session; opaque to the client.
    pub permissions: Map<String, Value>,
}

impl AppCredentials {
    /// Whether a session token is currently held.
    pub fn has_session(&self) -> bool {
        self.session_token.is_some()
    }

    /// Drop everything accumulated during negotiation.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
