//! Telex webhook signature verification.
//!
//! Telex signs the raw request body with HMAC-SHA256, keyed by the channel's
//! `Webhook Secret` setting, and sends the lowercase hex digest in
//! `X-Telex-Signature`. Verification must run on the exact bytes that are
//! later parsed as the payload.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

use crate::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded body signature.
pub const SIGNATURE_HEADER: &str = "X-Telex-Signature";

/// Why a signature check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature header missing")]
    Missing,
    #[error("signature does not match body digest")]
    Mismatch,
}

impl From<SignatureError> for WebhookError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::Missing => WebhookError::MissingSignature,
            SignatureError::Mismatch => WebhookError::InvalidSignature,
        }
    }
}

/// HMAC-SHA256 keyed by `secret`, already fed with `body`.
fn keyed_mac(secret: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("telex_signature_invalid_key");
            return None;
        }
    };
    mac.update(body);
    Some(mac)
}

/// Compute the lowercase hex HMAC-SHA256 of `body` keyed by `secret`.
pub fn compute_signature(secret: &str, body: &[u8]) -> Option<String> {
    keyed_mac(secret, body).map(|mac| hex::encode(mac.finalize().into_bytes()))
}

/// Verify a Telex webhook signature.
///
/// # Arguments
///
/// * `body` - Raw request body, exactly as received
/// * `provided` - Raw bytes of the `X-Telex-Signature` header, if present
/// * `secret` - The `Webhook Secret` setting value
///
/// # Returns
///
/// `Ok(())` if the header is the lowercase hex digest of the body. An absent
/// or empty header is `Missing`; anything else that fails to match, including
/// non-hex or non-ASCII header bytes, is `Mismatch`.
pub fn verify_signature(
    body: &[u8],
    provided: Option<&[u8]>,
    secret: &str,
) -> Result<(), SignatureError> {
    let provided = match provided {
        Some(sig) if !sig.is_empty() => sig,
        _ => {
            warn!(body_length = body.len(), "telex_signature_missing");
            return Err(SignatureError::Missing);
        }
    };

    // Digests are sent as lowercase hex; hex::decode alone would also take uppercase.
    if provided.iter().any(u8::is_ascii_uppercase) {
        warn!(actual_length = provided.len(), "telex_signature_not_lowercase");
        return Err(SignatureError::Mismatch);
    }

    let decoded = match hex::decode(provided) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(actual_length = provided.len(), error = %e, "telex_signature_not_hex");
            return Err(SignatureError::Mismatch);
        }
    };

    let mac = keyed_mac(secret, body).ok_or(SignatureError::Mismatch)?;

    // verify_slice compares in constant time
    if mac.verify_slice(&decoded).is_err() {
        warn!(
            decoded_length = decoded.len(),
            "telex_signature_mismatch"
        );
        return Err(SignatureError::Mismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"channel_id":"c1","message":{"text":"hi"}}"#;

    fn sign(secret: &str, body: &[u8]) -> String {
        compute_signature(secret, body).unwrap()
    }

    #[test]
    fn test_compute_signature_known_vector() {
        // RFC 4231 test case 2
        let sig = sign("Jefe", b"what do ya want for nothing?");
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_signature_valid() {
        let sig = sign("s3cr3t", BODY);
        assert_eq!(verify_signature(BODY, Some(sig.as_bytes()), "s3cr3t"), Ok(()));
    }

    #[test]
    fn test_verify_signature_missing() {
        assert_eq!(
            verify_signature(BODY, None, "s3cr3t"),
            Err(SignatureError::Missing)
        );
        assert_eq!(
            verify_signature(BODY, Some(b"".as_slice()), "s3cr3t"),
            Err(SignatureError::Missing)
        );
    }

    #[test]
    fn test_verify_signature_body_bit_flip() {
        let sig = sign("s3cr3t", BODY);
        for i in 0..BODY.len() {
            for bit in 0..8 {
                let mut mutated = BODY.to_vec();
                mutated[i] ^= 1 << bit;
                assert_eq!(
                    verify_signature(&mutated, Some(sig.as_bytes()), "s3cr3t"),
                    Err(SignatureError::Mismatch),
                    "flip of bit {} in byte {} went undetected",
                    bit,
                    i
                );
            }
        }
    }

    #[test]
    fn test_verify_signature_secret_bit_flip() {
        let secret = "s3cr3t";
        let sig = sign(secret, BODY);
        for i in 0..secret.len() {
            // Flip the lowest bit to stay within ASCII
            let mut mutated = secret.as_bytes().to_vec();
            mutated[i] ^= 1;
            let mutated = String::from_utf8(mutated).unwrap();
            assert_eq!(
                verify_signature(BODY, Some(sig.as_bytes()), &mutated),
                Err(SignatureError::Mismatch)
            );
        }
    }

    #[test]
    fn test_verify_signature_uppercase_hex_rejected() {
        let sig = sign("s3cr3t", BODY).to_uppercase();
        assert_eq!(
            verify_signature(BODY, Some(sig.as_bytes()), "s3cr3t"),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_empty_secret_still_signs() {
        let sig = sign("", BODY);
        assert_eq!(sig.len(), 64);
        assert_eq!(verify_signature(BODY, Some(sig.as_bytes()), ""), Ok(()));
    }

    #[test]
    fn test_verify_signature_malformed_header_is_mismatch() {
        // Odd length, non-hex, truncated digest, non-ASCII bytes
        let sig = sign("s3cr3t", BODY);
        for provided in [
            b"abc".as_slice(),
            b"zz".as_slice(),
            &sig.as_bytes()[..32],
            b"caf\xe9".as_slice(),
        ] {
            assert_eq!(
                verify_signature(BODY, Some(provided), "s3cr3t"),
                Err(SignatureError::Mismatch)
            );
        }
    }

    #[test]
    fn test_signature_error_maps_to_webhook_error() {
        assert!(matches!(
            WebhookError::from(SignatureError::Missing),
            WebhookError::MissingSignature
        ));
        assert!(matches!(
            WebhookError::from(SignatureError::Mismatch),
            WebhookError::InvalidSignature
        ));
    }
}
