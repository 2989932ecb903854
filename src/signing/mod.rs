//! Request body signing for the probe harness.
//!
//! The probed executors authenticate order intents with a symmetric HMAC:
//! the client computes HMAC-SHA256 over the raw request body under a shared
//! secret and transmits the lowercase hex digest in the `X-Signature`
//! header. Guarded deployments additionally accept a timestamped scheme,
//! HMAC over `"{ts}.{body}"`, carried in `X-Signature-V2` / `X-Signature-Ts`.
//!
//! The digest must cover the exact bytes that go on the wire. Callers build
//! the body once as a literal string and pass the same string to the signer
//! and to the request builder; nothing here re-serializes it.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Compute the lowercase hex HMAC-SHA256 digest of `message` under `secret`.
///
/// An empty secret is rejected: a request signed with an empty key would be
/// sent and rejected server-side, which the harness must never do.
pub fn signature_hex(secret: &str, message: &[u8]) -> Result<String> {
    if secret.is_empty() {
        return Err(Error::config("signing secret must not be empty"));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::config(format!("Invalid signing secret: {}", e)))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Compute the v2 timestamped digest: HMAC-SHA256 over `"{ts}.{body}"`.
///
/// `ts` is a unix timestamp in seconds; verifiers reject signatures outside
/// their clock-skew window, so callers stamp at send time.
pub fn timestamped_signature_hex(secret: &str, ts: i64, message: &str) -> Result<String> {
    signature_hex(secret, format!("{}.{}", ts, message).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rfc4231_known_answer() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?"
        let digest = signature_hex("Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            digest,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_digest_shape() {
        let digest = signature_hex("testsecret", br#"{"symbol":"AAPL"}"#).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let err = signature_hex("", b"body").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_v2_covers_timestamp_and_body() {
        let direct = signature_hex("s3cret", b"1700000000.{\"dry_run\":true}").unwrap();
        let v2 = timestamped_signature_hex("s3cret", 1_700_000_000, "{\"dry_run\":true}").unwrap();
        assert_eq!(direct, v2);

        // A different timestamp must change the digest even for the same body
        let other = timestamped_signature_hex("s3cret", 1_700_000_001, "{\"dry_run\":true}").unwrap();
        assert_ne!(v2, other);
    }

    proptest! {
        #[test]
        fn prop_deterministic(secret in "[a-zA-Z0-9]{1,32}", body in ".{0,256}") {
            let a = signature_hex(&secret, body.as_bytes()).unwrap();
            let b = signature_hex(&secret, body.as_bytes()).unwrap();
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.len(), 64);
        }

        #[test]
        fn prop_byte_flip_changes_digest(
            secret in "[a-zA-Z0-9]{1,32}",
            mut body in proptest::collection::vec(any::<u8>(), 1..128),
            idx in any::<prop::sample::Index>(),
        ) {
            let original = signature_hex(&secret, &body).unwrap();
            let i = idx.index(body.len());
            body[i] ^= 0x01;
            let flipped = signature_hex(&secret, &body).unwrap();
            prop_assert_ne!(original, flipped);
        }

        #[test]
        fn prop_secret_change_changes_digest(
            secret in "[a-zA-Z0-9]{1,32}",
            body in ".{0,128}",
        ) {
            let a = signature_hex(&secret, body.as_bytes()).unwrap();
            let b = signature_hex(&format!("{}x", secret), body.as_bytes()).unwrap();
            prop_assert_ne!(a, b);
        }
    }
}
