//! Session password derivation.
//!
//! Opening a session requires answering a server challenge: the password
//! is the hex-encoded HMAC-SHA1 of the challenge, keyed with the
//! long-lived app_token. The [`Signer`] trait keeps the keyed hash
//! pluggable for tests; [`HmacSha1Signer`] is the RustCrypto-backed
//! default.

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Keyed-hash collaborator used to derive the session password.
pub trait Signer: Send + Sync {
    /// Compute the hex-encoded HMAC-SHA1 of `message` keyed with `key`.
    fn hmac_sha1_hex(&self, key: &str, message: &str) -> String;
}

/// Default [`Signer`] over the RustCrypto `hmac`/`sha1` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacSha1Signer;

impl Signer for HmacSha1Signer {
    fn hmac_sha1_hex(&self, key: &str, message: &str) -> String {
        use std::fmt::Write;

        let mut mac =
            HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts any key size");
        mac.update(message.as_bytes());
        let tag = mac.finalize().into_bytes();

        let mut hex = String::with_capacity(tag.len() * 2);
        for byte in tag {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 2202 test case 2.
    #[test]
    fn test_rfc2202_vector() {
        let signer = HmacSha1Signer;
        assert_eq!(
            signer.hmac_sha1_hex("Jefe", "what do ya want for nothing?"),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn test_known_vector() {
        let signer = HmacSha1Signer;
        assert_eq!(
            signer.hmac_sha1_hex("key", "The quick brown fox jumps over the lazy dog"),
            "de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9"
        );
    }

    #[test]
    fn test_deterministic() {
        let signer = HmacSha1Signer;
        let a = signer.hmac_sha1_hex("dyNYgfK0Ya6FWGqq83sBHa7TwzWo+pg4fDFUJHShcjVYzTfaRrZzm93p7OTAfH/0", "Bj6xMqoe+DCHD44KqBljJ579seOXNWr2");
        let b = signer.hmac_sha1_hex("dyNYgfK0Ya6FWGqq83sBHa7TwzWo+pg4fDFUJHShcjVYzTfaRrZzm93p7OTAfH/0", "Bj6xMqoe+DCHD44KqBljJ579seOXNWr2");
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
