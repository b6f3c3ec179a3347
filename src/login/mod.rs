//! Device authorization and session negotiation.
//!
//! Implements the Freebox OS login handshake: an application registers
//! itself once (authorization), the user approves it on the device front
//! panel, and the application then opens short-lived sessions by answering
//! a challenge with an HMAC-SHA1 keyed on its app_token.
//!
//! # Handshake Flow
//!
//! ```text
//! Client                                  Device
//!    |                                       |
//!    |-- POST /login/authorize/ ------------>|  app identity
//!    |<-- {app_token, track_id} -------------|
//!    |                                       |
//!    |-- GET /login/authorize/{track_id} --->|  poll until the user
//!    |<-- {status: pending} -----------------|  approves on the front
//!    |            ... 1 s delay ...          |  panel
//!    |-- GET /login/authorize/{track_id} --->|
//!    |<-- {status: granted} -----------------|
//!    |                                       |
//!    |-- GET /login/ ----------------------->|
//!    |<-- {challenge} -----------------------|
//!    |-- POST /login/session --------------->|  {app_id, password =
//!    |<-- {session_token, permissions} ------|   hmac_sha1(token, challenge)}
//!    |                                       |
//!    |-- POST /login/logout/ --------------->|  revoke the session
//! ```
//!
//! # State Machine
//!
//! One `login` call walks the negotiator through these states:
//!
//! | State                   | Description                              | Valid Transitions          |
//! |-------------------------|------------------------------------------|----------------------------|
//! | `Idle`                  | Nothing negotiated yet                   | → AwaitingEndpoint         |
//! | `AwaitingEndpoint`      | Resolving the API base URL               | → AwaitingAuthorization, Failed |
//! | `AwaitingAuthorization` | Waiting for user approval (pending loop) | → AwaitingSession, Failed  |
//! | `AwaitingSession`       | Answering the challenge                  | → Ready, Failed            |
//! | `Ready`                 | Session open; stats and logout valid     | → Idle (logout)            |
//! | `Failed`                | Negotiation aborted; see returned error  | → AwaitingEndpoint (retry) |

mod identity;
mod negotiator;
mod status;
pub mod wire;

pub use identity::{AppCredentials, AppIdentity};
pub use negotiator::{NegotiatorState, SessionNegotiator};
pub use status::AuthorizationStatus;
