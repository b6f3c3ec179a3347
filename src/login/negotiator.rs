//! Session negotiation state machine.
//!
//! [`SessionNegotiator`] drives the authorization handshake end-to-end:
//! resolve the API base URL (once, if not configured), submit the
//! authorization request, poll until the user approves it on the device,
//! derive the session password from the challenge, and open the session.
//! It owns all protocol-level state transitions and timing; the network
//! and the keyed hash are pluggable collaborators.

use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::{FreeboxError, Result};
use crate::rrd::RrdQuery;
use crate::signer::{HmacSha1Signer, Signer};
use crate::transport::{HttpTransport, Method, Transport};

use super::identity::{AppCredentials, AppIdentity};
use super::status::AuthorizationStatus;
use super::wire::{
    ApiVersion, AuthorizationResult, AuthorizeRequest, Envelope, LoginChallenge, LogoutRequest,
    SessionGrant, SessionOpenRequest, TrackingResult,
};

/// Negotiator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiatorState {
    /// Nothing negotiated yet, or the previous session was discarded.
    Idle,
    /// Resolving the API base URL.
    AwaitingEndpoint,
    /// Authorization submitted, waiting for the user to approve it on the
    /// device front panel.
    AwaitingAuthorization,
    /// Authorization granted, answering the challenge.
    AwaitingSession,
    /// Session established; statistics and logout are available.
    Ready,
    /// Negotiation aborted; the returned error names the failed step.
    Failed,
}

/// Drives the device authorization handshake.
///
/// One logical flow per instance: [`login`](Self::login) is a sequential
/// pipeline of suspending network calls with no internal parallelism. A
/// second `login` while one is in flight fails fast with
/// [`FreeboxError::LoginInProgress`]. Once `Ready`,
/// [`fetch_stats`](Self::fetch_stats) and [`logout`](Self::logout) may be
/// called concurrently with each other, but not with an in-flight login.
pub struct SessionNegotiator {
    identity: AppIdentity,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    signer: Arc<dyn Signer>,
    state: RwLock<NegotiatorState>,
    credentials: Mutex<AppCredentials>,
    base_url: Mutex<Option<String>>,
    login_gate: tokio::sync::Mutex<()>,
    status_tx: watch::Sender<Option<AuthorizationStatus>>,
}

impl std::fmt::Debug for SessionNegotiator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionNegotiator")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl SessionNegotiator {
    /// Create a negotiator with the default HTTP transport and signer.
    pub fn new(identity: AppIdentity, config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.request_timeout())?);
        Self::with_collaborators(identity, config, transport, Arc::new(HmacSha1Signer))
    }

    /// Create a negotiator with explicit transport and signer
    /// collaborators.
    pub fn with_collaborators(
        identity: AppIdentity,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        signer: Arc<dyn Signer>,
    ) -> Result<Self> {
        identity.validate()?;
        let (status_tx, _) = watch::channel(None);
        Ok(Self {
            identity,
            base_url: Mutex::new(config.base_url.clone()),
            config,
            transport,
            signer,
            state: RwLock::new(NegotiatorState::Idle),
            credentials: Mutex::new(AppCredentials::default()),
            login_gate: tokio::sync::Mutex::new(()),
            status_tx,
        })
    }

    /// Get the current state.
    pub fn state(&self) -> NegotiatorState {
        *self.state.read().expect("state lock poisoned")
    }

    /// Whether a session is established.
    pub fn is_ready(&self) -> bool {
        self.state() == NegotiatorState::Ready
    }

    /// Snapshot of the accumulated credentials.
    ///
    /// The `app_token` in here is long-lived; callers that want to skip
    /// re-approval on the next run should persist it themselves.
    pub fn credentials(&self) -> AppCredentials {
        self.credentials.lock().expect("credentials lock poisoned").clone()
    }

    /// The resolved API base URL, if known.
    pub fn base_url(&self) -> Option<String> {
        self.base_url.lock().expect("base_url lock poisoned").clone()
    }

    /// Subscribe to authorization status updates published while
    /// [`login`](Self::login) polls the device.
    ///
    /// Holds `None` until the first poll reports something.
    pub fn subscribe_status(&self) -> watch::Receiver<Option<AuthorizationStatus>> {
        self.status_tx.subscribe()
    }

    /// Run the full authorization handshake.
    ///
    /// Polls indefinitely while the device reports `pending`; use
    /// [`login_with_cancellation`](Self::login_with_cancellation) to be
    /// able to abort the wait.
    pub async fn login(&self) -> Result<()> {
        self.login_with_cancellation(CancellationToken::new()).await
    }

    /// Run the full authorization handshake, aborting the poll loop when
    /// `cancel` fires.
    ///
    /// Cancellation takes effect between poll iterations and surfaces as
    /// [`FreeboxError::Cancelled`].
    pub async fn login_with_cancellation(&self, cancel: CancellationToken) -> Result<()> {
        let _gate = self
            .login_gate
            .try_lock()
            .map_err(|_| FreeboxError::LoginInProgress)?;

        match self.run_login(&cancel).await {
            Ok(()) => {
                self.set_state(NegotiatorState::Ready);
                tracing::info!("session established");
                Ok(())
            }
            Err(err) => {
                self.set_state(NegotiatorState::Failed);
                Err(err)
            }
        }
    }

    /// Revoke the session on the device and clear local credentials.
    ///
    /// Local state is invalidated even when the remote revoke fails: the
    /// session is dead from the caller's perspective regardless, and the
    /// returned error is for reporting only.
    pub async fn logout(&self) -> Result<()> {
        self.require_ready()?;
        let base_url = self.require_base_url()?;
        let session_token = self
            .credentials
            .lock()
            .expect("credentials lock poisoned")
            .session_token
            .clone()
            .ok_or(FreeboxError::NotAuthenticated)?;

        // Invalidate locally first; the remote call is a best-effort
        // revoke notification.
        self.credentials
            .lock()
            .expect("credentials lock poisoned")
            .clear();
        self.set_state(NegotiatorState::Idle);

        let body = serde_json::to_value(LogoutRequest {
            app_id: &self.identity.app_id,
            session_token: &session_token,
        })
        .expect("logout body serializes to JSON");

        let url = format!("{base_url}/login/logout/");
        match self.transport.request(Method::Post, &url, Some(body)).await {
            Ok(raw) => {
                let envelope: Envelope<Value> = serde_json::from_value(raw).map_err(|e| {
                    FreeboxError::LogoutFailure(format!("malformed logout response: {e}"))
                })?;
                if envelope.success {
                    tracing::debug!("session revoked on device");
                    Ok(())
                } else {
                    let msg = envelope
                        .msg
                        .unwrap_or_else(|| "device refused to revoke the session".to_string());
                    tracing::warn!("logout refused ({msg}); session already invalidated locally");
                    Err(FreeboxError::LogoutFailure(msg))
                }
            }
            Err(err) => {
                tracing::warn!("logout request failed ({err}); session already invalidated locally");
                Err(FreeboxError::Transport(err))
            }
        }
    }

    /// Retrieve the raw RRD statistics payload.
    ///
    /// Valid only once a session is established; otherwise fails with
    /// [`FreeboxError::NotAuthenticated`] without touching the network.
    /// The payload is returned unmodified.
    pub async fn fetch_stats(&self) -> Result<Value> {
        self.require_ready()?;
        let base_url = self.require_base_url()?;
        let url = format!("{base_url}/rrd/");
        Ok(self.transport.request(Method::Get, &url, None).await?)
    }

    /// Retrieve RRD statistics scoped by a query (database, time window,
    /// precision, field list).
    pub async fn fetch_stats_query(&self, query: &RrdQuery) -> Result<Value> {
        self.require_ready()?;
        let base_url = self.require_base_url()?;
        let body = serde_json::to_value(query).expect("RRD query serializes to JSON");
        let url = format!("{base_url}/rrd/");
        Ok(self.transport.request(Method::Get, &url, Some(body)).await?)
    }

    async fn run_login(&self, cancel: &CancellationToken) -> Result<()> {
        self.credentials
            .lock()
            .expect("credentials lock poisoned")
            .clear();

        self.set_state(NegotiatorState::AwaitingEndpoint);
        let base_url = self.resolve_endpoint().await?;

        self.set_state(NegotiatorState::AwaitingAuthorization);
        let authorization = self.request_authorization(&base_url).await?;
        tracing::info!(
            "accept the authorization request on the device front panel (app token {})",
            authorization.app_token
        );
        self.poll_authorization(&base_url, &authorization.track_id, cancel)
            .await?;

        self.set_state(NegotiatorState::AwaitingSession);
        self.establish_session(&base_url).await
    }

    /// Resolve the API base URL, discovering it if not configured.
    async fn resolve_endpoint(&self) -> Result<String> {
        if let Some(base_url) = self.base_url() {
            return Ok(base_url);
        }

        let raw = self
            .transport
            .request(Method::Get, &self.config.discovery_url, None)
            .await
            .map_err(|e| FreeboxError::EndpointResolution(e.to_string()))?;

        // The discovery payload is double-encoded: the `data` field holds
        // a JSON-encoded object, not an object.
        let data = raw.get("data").and_then(Value::as_str).ok_or_else(|| {
            FreeboxError::EndpointResolution("discovery response missing data field".to_string())
        })?;
        let api: ApiVersion = serde_json::from_str(data).map_err(|e| {
            FreeboxError::EndpointResolution(format!("malformed discovery payload: {e}"))
        })?;

        let base_url = api.base_url();
        tracing::debug!(
            "API base URL for {}: {}",
            api.device_name.as_deref().unwrap_or("device"),
            base_url
        );
        *self.base_url.lock().expect("base_url lock poisoned") = Some(base_url.clone());
        Ok(base_url)
    }

    /// Submit the authorization request. Attempted exactly once.
    async fn request_authorization(&self, base_url: &str) -> Result<AuthorizationResult> {
        let body = serde_json::to_value(AuthorizeRequest {
            app_id: &self.identity.app_id,
            app_name: &self.identity.app_name,
            app_version: &self.identity.app_version,
            device_name: &self.identity.device_name,
        })
        .expect("authorize body serializes to JSON");

        let url = format!("{base_url}/login/authorize/");
        let raw = self
            .transport
            .request(Method::Post, &url, Some(body))
            .await
            .map_err(|e| FreeboxError::AuthorizationRequest(e.to_string()))?;

        let envelope: Envelope<AuthorizationResult> = serde_json::from_value(raw)
            .map_err(|e| {
                FreeboxError::AuthorizationRequest(format!("malformed authorize response: {e}"))
            })?;
        if !envelope.success {
            return Err(FreeboxError::AuthorizationRequest(
                envelope
                    .msg
                    .unwrap_or_else(|| "device refused the authorization request".to_string()),
            ));
        }
        let result = envelope.result.ok_or_else(|| {
            FreeboxError::AuthorizationRequest("authorize response missing result".to_string())
        })?;

        let mut credentials = self.credentials.lock().expect("credentials lock poisoned");
        credentials.app_token = Some(result.app_token.clone());
        credentials.track_id = Some(result.track_id.clone());
        Ok(result)
    }

    /// Poll the authorization status until it is terminal.
    ///
    /// Only `pending` keeps the loop going, with a cancellable delay
    /// between iterations; every other status ends it, as does `cancel`.
    async fn poll_authorization(
        &self,
        base_url: &str,
        track_id: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let url = format!("{base_url}/login/authorize/{track_id}");
        loop {
            if cancel.is_cancelled() {
                return Err(FreeboxError::Cancelled);
            }

            let raw = self
                .transport
                .request(Method::Get, &url, None)
                .await
                .map_err(|e| FreeboxError::AuthorizationRequest(e.to_string()))?;
            let envelope: Envelope<TrackingResult> = serde_json::from_value(raw).map_err(|e| {
                FreeboxError::AuthorizationRequest(format!("malformed tracking response: {e}"))
            })?;
            let tracking = envelope.result.ok_or_else(|| {
                FreeboxError::AuthorizationRequest("tracking response missing result".to_string())
            })?;

            let status = AuthorizationStatus::from_wire(&tracking.status);
            self.status_tx.send_replace(Some(status));

            match status {
                AuthorizationStatus::Pending => {
                    tracing::info!("{}", status.explanation());
                    tokio::select! {
                        () = cancel.cancelled() => return Err(FreeboxError::Cancelled),
                        () = tokio::time::sleep(self.config.poll_interval()) => {}
                    }
                }
                AuthorizationStatus::Granted => {
                    tracing::info!("{}", status.explanation());
                    return Ok(());
                }
                AuthorizationStatus::Denied => return Err(FreeboxError::AuthorizationDenied),
                AuthorizationStatus::Timeout => return Err(FreeboxError::AuthorizationTimeout),
                AuthorizationStatus::Unknown => return Err(FreeboxError::AuthorizationRevoked),
            }
        }
    }

    /// Fetch a fresh challenge and open the session.
    async fn establish_session(&self, base_url: &str) -> Result<()> {
        let url = format!("{base_url}/login/");
        let raw = self
            .transport
            .request(Method::Get, &url, None)
            .await
            .map_err(|e| FreeboxError::SessionEstablishment(e.to_string()))?;
        let envelope: Envelope<LoginChallenge> = serde_json::from_value(raw).map_err(|e| {
            FreeboxError::SessionEstablishment(format!("malformed login response: {e}"))
        })?;
        let challenge = envelope
            .result
            .map(|r| r.challenge)
            .ok_or_else(|| {
                FreeboxError::SessionEstablishment("login response missing challenge".to_string())
            })?;

        let app_token = self
            .credentials
            .lock()
            .expect("credentials lock poisoned")
            .app_token
            .clone()
            .ok_or_else(|| {
                FreeboxError::SessionEstablishment("no app_token to derive password from".to_string())
            })?;
        let password = self.signer.hmac_sha1_hex(&app_token, &challenge);

        {
            let mut credentials = self.credentials.lock().expect("credentials lock poisoned");
            credentials.challenge = Some(challenge);
            credentials.derived_password = Some(password.clone());
        }

        let body = serde_json::to_value(SessionOpenRequest {
            app_id: &self.identity.app_id,
            password: &password,
        })
        .expect("session body serializes to JSON");

        let url = format!("{base_url}/login/session");
        let raw = self
            .transport
            .request(Method::Post, &url, Some(body))
            .await
            .map_err(|e| FreeboxError::SessionEstablishment(e.to_string()))?;
        let envelope: Envelope<SessionGrant> = serde_json::from_value(raw).map_err(|e| {
            FreeboxError::SessionEstablishment(format!("malformed session response: {e}"))
        })?;
        if !envelope.success {
            return Err(FreeboxError::SessionEstablishment(
                envelope
                    .msg
                    .unwrap_or_else(|| "device refused to open the session".to_string()),
            ));
        }
        let grant = envelope.result.ok_or_else(|| {
            FreeboxError::SessionEstablishment("session response missing result".to_string())
        })?;

        let mut credentials = self.credentials.lock().expect("credentials lock poisoned");
        credentials.session_token = Some(grant.session_token);
        credentials.permissions = grant.permissions;
        Ok(())
    }

    fn require_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(FreeboxError::NotAuthenticated)
        }
    }

    fn require_base_url(&self) -> Result<String> {
        self.base_url().ok_or(FreeboxError::NotAuthenticated)
    }

    fn set_state(&self, state: NegotiatorState) {
        *self.state.write().expect("state lock poisoned") = state;
    }
}
