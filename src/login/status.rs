//! Authorization tracking status.

/// Status reported by `GET /login/authorize/{track_id}` while an
/// authorization request waits for the user.
///
/// Only `pending` keeps the poll loop going; every other value is
/// terminal. Status values this client does not recognize are collapsed
/// to [`Unknown`](Self::Unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// The app_token is invalid or has been revoked.
    Unknown,
    /// The user has not confirmed the authorization request yet.
    Pending,
    /// The user did not confirm the authorization within the given time.
    Timeout,
    /// The app_token is valid and can be used to open a session.
    Granted,
    /// The user denied the authorization request.
    Denied,
}

impl AuthorizationStatus {
    /// Parse the wire value; anything unrecognized maps to `Unknown`.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "timeout" => Self::Timeout,
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            _ => Self::Unknown,
        }
    }

    /// Get the wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Pending => "pending",
            Self::Timeout => "timeout",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    /// Fixed human-readable explanation of this status.
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::Unknown => "the app_token is invalid or has been revoked",
            Self::Pending => "the user has not confirmed the authorization request yet",
            Self::Timeout => "the user did not confirm the authorization within the given time",
            Self::Granted => "the app_token is valid and can be used to open a session",
            Self::Denied => "the user denied the authorization request",
        }
    }

    /// Whether this status ends the poll loop.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire() {
        assert_eq!(
            AuthorizationStatus::from_wire("pending"),
            AuthorizationStatus::Pending
        );
        assert_eq!(
            AuthorizationStatus::from_wire("granted"),
            AuthorizationStatus::Granted
        );
        assert_eq!(
            AuthorizationStatus::from_wire("denied"),
            AuthorizationStatus::Denied
        );
        assert_eq!(
            AuthorizationStatus::from_wire("timeout"),
            AuthorizationStatus::Timeout
        );
        assert_eq!(
            AuthorizationStatus::from_wire("unknown"),
            AuthorizationStatus::Unknown
        );
    }

    #[test]
    fn test_unrecognized_maps_to_unknown() {
        assert_eq!(
            AuthorizationStatus::from_wire("some-future-status"),
            AuthorizationStatus::Unknown
        );
        assert_eq!(
            AuthorizationStatus::from_wire(""),
            AuthorizationStatus::Unknown
        );
    }

    #[test]
    fn test_only_pending_continues() {
        assert!(!AuthorizationStatus::Pending.is_terminal());
        for status in [
            AuthorizationStatus::Unknown,
            AuthorizationStatus::Timeout,
            AuthorizationStatus::Granted,
            AuthorizationStatus::Denied,
        ] {
            assert!(status.is_terminal(), "{status} should be terminal");
        }
    }

    #[test]
    fn test_wire_name_round_trip() {
        for status in [
            AuthorizationStatus::Unknown,
            AuthorizationStatus::Pending,
            AuthorizationStatus::Timeout,
            AuthorizationStatus::Granted,
            AuthorizationStatus::Denied,
        ] {
            assert_eq!(AuthorizationStatus::from_wire(status.name()), status);
        }
    }
}
