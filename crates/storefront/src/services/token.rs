//! Signed email-verification tokens.
//!
//! A token carries the customer's email and an issue timestamp, both
//! base64url-encoded, followed by an HMAC-SHA256 signature computed with a
//! key derived from the application secret and a constant salt:
//!
//! ```text
//! b64(email) . b64(unix_seconds_be) . b64(hmac(key, email_part "." ts_part))
//! ```
//!
//! Verification recomputes the MAC in constant time and then checks the
//! token age against the caller's limit.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use farmacia_core::Email;

type HmacSha256 = Hmac<Sha256>;

/// Salt mixed into the signing key; scopes tokens to email confirmation.
const TOKEN_SALT: &[u8] = b"email-confirm";

/// How long a verification token stays valid, in seconds.
pub const TOKEN_MAX_AGE_SECS: i64 = 3600;

/// Errors from token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is older than the allowed age.
    #[error("verification token has expired")]
    Expired,

    /// The token is malformed or its signature does not check out.
    #[error("verification token is invalid")]
    Invalid,
}

/// Issues and verifies signed verification tokens.
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    /// Derive a signing key from the application secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(TOKEN_SALT);
        let key = mac.finalize().into_bytes().to_vec();

        Self { key }
    }

    /// Sign a token for `email`, stamped with the current time.
    #[must_use]
    pub fn sign(&self, email: &Email) -> String {
        self.sign_at(email, chrono::Utc::now().timestamp())
    }

    /// Verify a token and return the email it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` if the token is older than
    /// `max_age_secs`, `TokenError::Invalid` on any format or signature
    /// failure.
    pub fn verify(&self, token: &str, max_age_secs: i64) -> Result<Email, TokenError> {
        self.verify_at(token, max_age_secs, chrono::Utc::now().timestamp())
    }

    fn sign_at(&self, email: &Email, issued_at: i64) -> String {
        let email_part = URL_SAFE_NO_PAD.encode(email.as_str().as_bytes());
        let ts_part = URL_SAFE_NO_PAD.encode(issued_at.to_be_bytes());
        let signature = self.mac_over(&email_part, &ts_part);

        format!(
            "{email_part}.{ts_part}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        )
    }

    fn verify_at(&self, token: &str, max_age_secs: i64, now: i64) -> Result<Email, TokenError> {
        let mut parts = token.split('.');
        let (Some(email_part), Some(ts_part), Some(sig_part), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Invalid);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(sig_part)
            .map_err(|_| TokenError::Invalid)?;

        // Constant-time comparison via the Mac trait.
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(email_part.as_bytes());
        mac.update(b".");
        mac.update(ts_part.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::Invalid)?;

        let ts_bytes: [u8; 8] = URL_SAFE_NO_PAD
            .decode(ts_part)
            .map_err(|_| TokenError::Invalid)?
            .try_into()
            .map_err(|_| TokenError::Invalid)?;
        let issued_at = i64::from_be_bytes(ts_bytes);

        if now.saturating_sub(issued_at) > max_age_secs {
            return Err(TokenError::Expired);
        }

        let email_bytes = URL_SAFE_NO_PAD
            .decode(email_part)
            .map_err(|_| TokenError::Invalid)?;
        let email_str = String::from_utf8(email_bytes).map_err(|_| TokenError::Invalid)?;

        Email::parse(&email_str).map_err(|_| TokenError::Invalid)
    }

    fn mac_over(&self, email_part: &str, ts_part: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(email_part.as_bytes());
        mac.update(b".");
        mac.update(ts_part.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from(
            "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6j".to_string(),
        ))
    }

    fn email() -> Email {
        Email::parse("cliente@example.com").unwrap()
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let signer = signer();
        let token = signer.sign(&email());
        let verified = signer.verify(&token, TOKEN_MAX_AGE_SECS).unwrap();
        assert_eq!(verified, email());
    }

    #[test]
    fn test_expired_token() {
        let signer = signer();
        let now = chrono::Utc::now().timestamp();
        let token = signer.sign_at(&email(), now - TOKEN_MAX_AGE_SECS - 1);
        assert_eq!(
            signer.verify_at(&token, TOKEN_MAX_AGE_SECS, now),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_valid_just_under_limit() {
        let signer = signer();
        let now = chrono::Utc::now().timestamp();
        let token = signer.sign_at(&email(), now - TOKEN_MAX_AGE_SECS);
        assert!(signer.verify_at(&token, TOKEN_MAX_AGE_SECS, now).is_ok());
    }

    #[test]
    fn test_tampered_signature() {
        let signer = signer();
        let token = signer.sign(&email());
        let tampered = format!("{}x", token);
        assert_eq!(
            signer.verify(&tampered, TOKEN_MAX_AGE_SECS),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_tampered_email_part() {
        let signer = signer();
        let token = signer.sign(&email());
        let other = URL_SAFE_NO_PAD.encode(b"otro@example.com");
        let mut parts = token.split('.');
        let (_, ts, sig) = (
            parts.next().unwrap(),
            parts.next().unwrap(),
            parts.next().unwrap(),
        );
        let forged = format!("{other}.{ts}.{sig}");
        assert_eq!(
            signer.verify(&forged, TOKEN_MAX_AGE_SECS),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = signer();
        let other = TokenSigner::new(&SecretString::from(
            "zC6j!mK2@nL5#pQ7&rT0*uW4^aB3$xY9".to_string(),
        ));
        let token = signer.sign(&email());
        assert_eq!(
            other.verify(&token, TOKEN_MAX_AGE_SECS),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        let signer = signer();
        for garbage in ["", "abc", "a.b", "a.b.c.d", "ñ.ñ.ñ"] {
            assert_eq!(
                signer.verify(garbage, TOKEN_MAX_AGE_SECS),
                Err(TokenError::Invalid),
                "expected Invalid for {garbage:?}"
            );
        }
    }
}
