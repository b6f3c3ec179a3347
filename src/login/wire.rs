//! Wire-level payloads for the login endpoints.
//!
//! Device responses share a common envelope `{success, result, msg}`; the
//! payload under `result` varies per endpoint. The device is loose with
//! numeric types (the same field may arrive as a JSON number or a string
//! depending on firmware), so identifier-like fields are deserialized
//! tolerantly and kept as strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Common response envelope wrapping every login payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    /// Whether the device accepted the call.
    #[serde(default)]
    pub success: bool,
    /// Endpoint-specific payload, present on success (and, for the
    /// challenge endpoint, on auth-required responses too).
    #[serde(default)]
    pub result: Option<T>,
    /// Device-supplied error message, present on failure.
    #[serde(default)]
    pub msg: Option<String>,
}

/// Result of `POST /login/authorize/`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationResult {
    /// Long-lived credential identifying the application.
    pub app_token: String,
    /// Handle used to poll the authorization status.
    #[serde(deserialize_with = "string_or_number")]
    pub track_id: String,
}

/// Result of `GET /login/authorize/{track_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingResult {
    /// Raw status value; see
    /// [`AuthorizationStatus::from_wire`](crate::AuthorizationStatus::from_wire).
    pub status: String,
    /// Challenge the device may already advertise while tracking.
    #[serde(default)]
    pub challenge: Option<String>,
}

/// Result of `GET /login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginChallenge {
    /// Single-use nonce consumed in deriving the session password.
    pub challenge: String,
}

/// Result of `POST /login/session`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionGrant {
    /// Short-lived credential scoped to this session.
    pub session_token: String,
    /// Granted permissions; an opaque mapping the client does not
    /// interpret.
    #[serde(default)]
    pub permissions: Map<String, Value>,
}

/// Discovery payload: the JSON-encoded object inside the `data` field of
/// the api_version response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiVersion {
    /// Public domain of the device's HTTPS endpoint.
    pub api_domain: String,
    /// HTTPS port of the API.
    pub https_port: u16,
    /// Major API version, e.g. `"8"`.
    #[serde(deserialize_with = "string_or_number")]
    pub api_version: String,
    /// Friendly device name, when advertised.
    #[serde(default)]
    pub device_name: Option<String>,
}

impl ApiVersion {
    /// Synthesize the API base URL from the discovery payload.
    pub fn base_url(&self) -> String {
        // The device advertises "8" or "8.0"; only the major part goes
        // into the path.
        let major = self
            .api_version
            .split('.')
            .next()
            .unwrap_or(&self.api_version);
        format!("https://{}:{}/api/v{}", self.api_domain, self.https_port, major)
    }
}

/// Body of `POST /login/authorize/`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest<'a> {
    /// Application identifier.
    pub app_id: &'a str,
    /// Application display name, shown on the device front panel.
    pub app_name: &'a str,
    /// Application version.
    pub app_version: &'a str,
    /// Name of the device running the application.
    pub device_name: &'a str,
}

/// Body of `POST /login/session`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOpenRequest<'a> {
    /// Application identifier.
    pub app_id: &'a str,
    /// Hex-encoded HMAC-SHA1 of the challenge keyed with the app_token.
    pub password: &'a str,
}

/// Body of `POST /login/logout/`.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest<'a> {
    /// Application identifier.
    pub app_id: &'a str,
    /// Session token being revoked.
    pub session_token: &'a str,
}

/// Accept a JSON string or number and normalize to `String`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
