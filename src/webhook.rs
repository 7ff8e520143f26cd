//! webhook verification
//!
//! validates inbound webhook deliveries against a shared secret, either
//! by comparing the token header or by checking the timestamped
//! hmac-sha256 signature header.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// header carrying the event name
pub const EVENT_HEADER: &str = "X-Buildkite-Event";
/// header carrying the cleartext shared token
pub const TOKEN_HEADER: &str = "X-Buildkite-Token";
/// header carrying the timestamped signature
pub const SIGNATURE_HEADER: &str = "X-Buildkite-Signature";

type HmacSha256 = Hmac<Sha256>;

/// webhook validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("token header does not match the shared secret")]
    TokenRefused,

    #[error("signature header is not `timestamp=...,signature=...`")]
    SignatureFormatInvalid,

    #[error("timestamp or signature value failed to parse")]
    SignatureCorrupted,

    #[error("payload is not valid utf-8")]
    PayloadCorrupted,

    #[error("signature does not match the payload")]
    SignatureRefused,

    #[error("timestamp is outside the replay window")]
    TimestampRefused,
}

/// validates webhook deliveries against a shared secret
///
/// the token strategy compares `X-Buildkite-Token` directly and is the
/// cheaper but weaker option (the secret travels in cleartext). the
/// signature strategy verifies `X-Buildkite-Signature` and can also
/// bound the age of a delivery via [`WebhookVerifier::with_replay_limit`].
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Vec<u8>,
    replay_limit: Option<Duration>,
}

impl WebhookVerifier {
    /// create a verifier for a shared secret
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            replay_limit: None,
        }
    }

    /// reject signatures whose timestamp is more than `seconds` old
    ///
    /// without a limit, no replay check is performed.
    pub fn with_replay_limit(mut self, seconds: i64) -> Self {
        self.replay_limit = Some(Duration::seconds(seconds));
        self
    }

    /// token strategy: the header must equal the secret byte-for-byte
    pub fn verify_token(&self, header: &str) -> Result<(), WebhookError> {
        if bool::from(header.as_bytes().ct_eq(&self.secret)) {
            Ok(())
        } else {
            Err(WebhookError::TokenRefused)
        }
    }

    /// signature strategy: verify `timestamp=<secs>,signature=<hex>`
    /// against the raw request body
    pub fn verify_signature(&self, header: &str, body: &[u8]) -> Result<(), WebhookError> {
        self.verify_signature_at(header, body, Utc::now())
    }

    fn verify_signature_at(
        &self,
        header: &str,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), WebhookError> {
        let (timestamp, signature) = parse_signature_header(header)?;

        let body = std::str::from_utf8(body).map_err(|_| WebhookError::PayloadCorrupted)?;
        let payload = format!("{timestamp}.{body}");

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("hmac accepts keys of any length");
        mac.update(payload.as_bytes());
        let computed = mac.finalize().into_bytes();

        if !bool::from(computed.as_slice().ct_eq(&signature)) {
            return Err(WebhookError::SignatureRefused);
        }

        if let Some(limit) = self.replay_limit {
            let sent = DateTime::from_timestamp(timestamp, 0)
                .ok_or(WebhookError::SignatureCorrupted)?;
            if now - sent > limit {
                return Err(WebhookError::TimestampRefused);
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"<redacted>")
            .field("replay_limit", &self.replay_limit)
            .finish()
    }
}

/// parse the signature header into its timestamp and signature bytes
///
/// the two key-value pairs may appear in either order, comma-separated,
/// with optional whitespace around each segment.
fn parse_signature_header(header: &str) -> Result<(i64, Vec<u8>), WebhookError> {
    let mut timestamp = None;
    let mut signature = None;
    let mut pairs = 0usize;

    for segment in header.split(',') {
        let Some((key, value)) = segment.split_once('=') else {
            return Err(WebhookError::SignatureFormatInvalid);
        };
        pairs += 1;
        match key.trim() {
            "timestamp" => timestamp = Some(value.trim()),
            "signature" => signature = Some(value.trim()),
            _ => return Err(WebhookError::SignatureFormatInvalid),
        }
    }

    let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
        return Err(WebhookError::SignatureFormatInvalid);
    };
    if pairs != 2 {
        return Err(WebhookError::SignatureFormatInvalid);
    }

    let timestamp = timestamp
        .parse::<i64>()
        .map_err(|_| WebhookError::SignatureCorrupted)?;
    let signature = hex::decode(signature).map_err(|_| WebhookError::SignatureCorrupted)?;

    Ok((timestamp, signature))
}
