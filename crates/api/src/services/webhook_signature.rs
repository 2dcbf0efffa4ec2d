//! Payment webhook signature verification.
//!
//! The `Stripe-Signature` header looks like `t=1700000000,v1=<hex>,v1=<hex>`.
//! The expected signature is the hex HMAC-SHA256 of `"<t>.<raw body>"` keyed
//! with the endpoint secret. Any matching `v1` entry is accepted.

use thiserror::Error;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Signature scheme accepted by this endpoint.
const SCHEME: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("No signature header found")]
    MissingHeader,

    #[error("Unable to extract timestamp and signatures from header")]
    MalformedHeader,

    #[error("Timestamp outside the tolerance zone")]
    TimestampOutOfTolerance,

    #[error("No signatures found matching the expected signature for payload")]
    NoMatchingSignature,

    #[error("Webhook secret is not configured")]
    MissingSecret,
}

#[derive(Debug, PartialEq, Eq)]
struct ParsedHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

fn parse_header(header: &str) -> Result<ParsedHeader<'_>, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| SignatureError::MalformedHeader)?,
                )
            }
            SCHEME => signatures.push(value),
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok(ParsedHeader {
            timestamp,
            signatures,
        }),
        _ => Err(SignatureError::MalformedHeader),
    }
}

/// Verifies a webhook payload against its signature header.
///
/// `now` is unix seconds. Returns the signed timestamp on success.
pub fn verify(
    payload: &[u8],
    header: Option<&str>,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<i64, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }
    let header = header.ok_or(SignatureError::MissingHeader)?;
    let parsed = parse_header(header)?;

    let mut signed_payload = Vec::with_capacity(payload.len() + 12);
    signed_payload.extend_from_slice(parsed.timestamp.to_string().as_bytes());
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(payload);

    let matched = parsed.signatures.iter().any(|signature| {
        shared::crypto::verify_hmac_sha256_hex(secret.as_bytes(), &signed_payload, signature)
    });
    if !matched {
        return Err(SignatureError::NoMatchingSignature);
    }

    if now.abs_diff(parsed.timestamp) > tolerance_secs.unsigned_abs() {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    Ok(parsed.timestamp)
}

/// Builds a valid header for `payload`. Used by tests and local tooling.
pub fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut signed_payload = format!("{}.", timestamp).into_bytes();
    signed_payload.extend_from_slice(payload);
    let signature = shared::crypto::hmac_sha256_hex(secret.as_bytes(), &signed_payload)
        .unwrap_or_default();
    format!("t={},{}={}", timestamp, SCHEME, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const NOW: i64 = 1_700_000_000;
    const BODY: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;

    #[test]
    fn test_accepts_valid_signature() {
        let header = sign(BODY, SECRET, NOW);
        assert_eq!(verify(BODY, Some(&header), SECRET, 300, NOW), Ok(NOW));
    }

    #[test]
    fn test_accepts_any_matching_v1() {
        let valid = sign(BODY, SECRET, NOW);
        let signature = valid.split("v1=").nth(1).unwrap();
        let header = format!("t={},v1=deadbeef,v0=abc,v1={}", NOW, signature);
        assert!(verify(BODY, Some(&header), SECRET, 300, NOW).is_ok());
    }

    #[test]
    fn test_rejects_tampered_body() {
        let header = sign(BODY, SECRET, NOW);
        let tampered = br#"{"id":"evt_1","type":"checkout.session.expired"}"#;
        assert_eq!(
            verify(tampered, Some(&header), SECRET, 300, NOW),
            Err(SignatureError::NoMatchingSignature)
        );
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let header = sign(BODY, "whsec_other", NOW);
        assert_eq!(
            verify(BODY, Some(&header), SECRET, 300, NOW),
            Err(SignatureError::NoMatchingSignature)
        );
    }

    #[test]
    fn test_rejects_stale_timestamp() {
        let header = sign(BODY, SECRET, NOW - 301);
        assert_eq!(
            verify(BODY, Some(&header), SECRET, 300, NOW),
            Err(SignatureError::TimestampOutOfTolerance)
        );
        let header = sign(BODY, SECRET, NOW - 300);
        assert!(verify(BODY, Some(&header), SECRET, 300, NOW).is_ok());
    }

    #[test]
    fn test_rejects_malformed_headers() {
        for header in ["", "garbage", "t=abc,v1=00", "t=1700000000", "v1=abcd"] {
            assert_eq!(
                verify(BODY, Some(header), SECRET, 300, NOW),
                Err(SignatureError::MalformedHeader),
                "{}",
                header
            );
        }
    }

    #[test]
    fn test_missing_header_and_secret() {
        assert_eq!(
            verify(BODY, None, SECRET, 300, NOW),
            Err(SignatureError::MissingHeader)
        );
        let header = sign(BODY, SECRET, NOW);
        assert_eq!(
            verify(BODY, Some(&header), "", 300, NOW),
            Err(SignatureError::MissingSecret)
        );
    }

    #[test]
    fn test_extreme_timestamp_is_out_of_tolerance() {
        let header = sign(BODY, SECRET, i64::MIN);
        assert_eq!(
            verify(BODY, Some(&header), SECRET, 300, NOW),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn test_parse_header() {
        let parsed = parse_header("t=12,v1=aa, v1=bb").unwrap();
        assert_eq!(
            parsed,
            ParsedHeader {
                timestamp: 12,
                signatures: vec!["aa", "bb"]
            }
        );
    }
}
