//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. Verification
//! is a pure function of the token and the process-wide signing secret: there
//! is no storage lookup and no revocation list, so a token stays valid for its
//! whole un-expired lifetime.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the username.
    pub sub: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp). Absent when expiry is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Token verification failures. Internal to the issuer: the authentication
/// gate collapses both into a single unauthenticated outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token signature or payload is invalid")]
    Invalid,

    #[error("Token has expired")]
    Expired,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Upper bound for `TOKEN_EXPIRY_SECS`: ten years.
pub const MAX_TOKEN_EXPIRY_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Configuration for token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in seconds. `None` disables expiry.
    pub token_expiry_secs: Option<i64>,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry_secs", &self.token_expiry_secs)
            .finish()
    }
}

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var             | Required | Default                  |
    /// |---------------------|----------|--------------------------|
    /// | `SIGNING_SECRET`    | **yes**  | --                       |
    /// | `TOKEN_EXPIRY_SECS` | no       | unset (tokens never expire) |
    ///
    /// A `TOKEN_EXPIRY_SECS` of `0` also disables expiry.
    ///
    /// # Panics
    ///
    /// Panics if `SIGNING_SECRET` is not set or is empty, or if
    /// `TOKEN_EXPIRY_SECS` is not an integer in `0..=MAX_TOKEN_EXPIRY_SECS`.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("SIGNING_SECRET").expect("SIGNING_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SIGNING_SECRET must not be empty");

        let token_expiry_secs = std::env::var("TOKEN_EXPIRY_SECS")
            .ok()
            .and_then(|raw| parse_token_expiry(&raw));

        Self {
            secret,
            token_expiry_secs,
        }
    }
}

/// Parse a `TOKEN_EXPIRY_SECS` value. `0` means no expiry.
fn parse_token_expiry(raw: &str) -> Option<i64> {
    let secs: i64 = raw
        .trim()
        .parse()
        .expect("TOKEN_EXPIRY_SECS must be a valid i64");
    assert!(secs >= 0, "TOKEN_EXPIRY_SECS must not be negative");
    assert!(
        secs <= MAX_TOKEN_EXPIRY_SECS,
        "TOKEN_EXPIRY_SECS must not exceed {MAX_TOKEN_EXPIRY_SECS}"
    );
    (secs > 0).then_some(secs)
}

/// Signs and verifies bearer tokens with a single symmetric secret.
///
/// Built once at startup from [`JwtConfig`] and shared read-only.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_secs: Option<i64>,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is optional in our payload but still enforced when present.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            expiry_secs: config.token_expiry_secs,
        }
    }

    /// Token lifetime in seconds, if expiry is enabled.
    pub fn expiry_secs(&self) -> Option<i64> {
        self.expiry_secs
    }

    /// Issue a token for `username`, valid from now.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_at(username, chrono::Utc::now().timestamp())
    }

    fn issue_at(&self, username: &str, now: i64) -> Result<String, TokenError> {
        let exp = match self.expiry_secs {
            Some(secs) => Some(now.checked_add(secs).ok_or_else(|| {
                TokenError::Signing(format!("Token expiry of {secs}s overflows the timestamp"))
            })?),
            None => None,
        };
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token's signature and expiry, returning its [`Claims`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Helper to build a test config with a known secret.
    fn test_config(expiry: Option<i64>) -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            token_expiry_secs: expiry,
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let issuer = TokenIssuer::new(&test_config(Some(900)));
        for subject in ["alice", "bob", "user.with.dots", "ünïcödé"] {
            let token = issuer.issue(subject).expect("issue should succeed");
            let claims = issuer.verify(&token).expect("verify should succeed");
            assert_eq!(claims.sub, subject);
            assert_eq!(claims.exp, Some(claims.iat + 900));
        }
    }

    #[test]
    fn test_no_expiry_omits_exp_claim() {
        let issuer = TokenIssuer::new(&test_config(None));
        let token = issuer.issue("alice").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_expired_token_fails() {
        let issuer = TokenIssuer::new(&test_config(Some(60)));
        let now = chrono::Utc::now().timestamp();
        // Issued ten minutes ago with a one-minute lifetime.
        let token = issuer.issue_at("alice", now - 600).unwrap();

        assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_one_second_expiry_elapses() {
        let issuer = TokenIssuer::new(&test_config(Some(1)));
        let token = issuer.issue("alice").unwrap();
        std::thread::sleep(std::time::Duration::from_secs(2));

        assert_eq!(issuer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_different_secrets_fail() {
        let issuer_a = TokenIssuer::new(&JwtConfig {
            secret: "secret-alpha".to_string(),
            token_expiry_secs: None,
        });
        let issuer_b = TokenIssuer::new(&JwtConfig {
            secret: "secret-bravo".to_string(),
            token_expiry_secs: None,
        });

        let token = issuer_a.issue("alice").unwrap();
        assert_eq!(issuer_b.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_every_character_is_tamper_sensitive() {
        let issuer = TokenIssuer::new(&test_config(Some(900)));
        let token = issuer.issue("alice").unwrap();

        for (i, c) in token.char_indices() {
            if c == '.' {
                continue;
            }
            let replacement = if c == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(i..i + 1, &replacement.to_string());

            assert_matches!(
                issuer.verify(&tampered),
                Err(TokenError::Invalid),
                "flipping position {i} must invalidate the token"
            );
        }
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let issuer = TokenIssuer::new(&test_config(None));
        for garbage in ["", "abc", "a.b.c", "Bearer x", "...."] {
            assert_eq!(issuer.verify(garbage), Err(TokenError::Invalid));
        }
    }

    #[test]
    fn test_overflowing_expiry_is_a_signing_error() {
        let issuer = TokenIssuer::new(&test_config(Some(i64::MAX)));
        assert_matches!(issuer.issue("alice"), Err(TokenError::Signing(_)));
    }

    #[test]
    fn test_parse_token_expiry() {
        assert_eq!(parse_token_expiry("0"), None);
        assert_eq!(parse_token_expiry(" 3600 "), Some(3600));
        assert_eq!(
            parse_token_expiry(&MAX_TOKEN_EXPIRY_SECS.to_string()),
            Some(MAX_TOKEN_EXPIRY_SECS)
        );
    }

    #[test]
    #[should_panic(expected = "must not exceed")]
    fn test_parse_token_expiry_rejects_huge_values() {
        parse_token_expiry(&i64::MAX.to_string());
    }

    #[test]
    #[should_panic(expected = "must not be negative")]
    fn test_parse_token_expiry_rejects_negative_values() {
        parse_token_expiry("-5");
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let rendered = format!("{:?}", test_config(None));
        assert!(!rendered.contains("test-secret"));
    }
}
