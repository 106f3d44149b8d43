use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::AccessTokenClaims;
use super::claims::ACCESS_TOKEN_TYPE;
use super::errors::TokenError;

/// Minimum derived key length for HS256, in bytes.
const MIN_KEY_BYTES: usize = 32;

/// Static settings for issuing and verifying access tokens.
///
/// The secret may be a base64-encoded key or raw bytes; see
/// [`TokenCodec::new`] for how it is interpreted.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_token_ttl_secs: i64,
    /// Allowed clock discrepancy when checking timestamps
    pub clock_skew_secs: u64,
}

/// Identity proven by a successfully verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub user_id: i64,
    pub username: String,
}

/// Signs and verifies compact access tokens.
///
/// Uses HS256 (HMAC with SHA-256). Stateless aside from the derived signing
/// key; a single instance is shared across all request workers.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    access_token_ttl_secs: i64,
    clock_skew_secs: u64,
}

impl TokenCodec {
    /// Build a codec from settings, deriving and checking the signing key.
    ///
    /// Base64 decoding of the secret is attempted first; a secret that is
    /// not valid base64 is used as raw UTF-8 bytes. Keys that derive to
    /// fewer than 32 bytes are rejected here.
    ///
    /// # Errors
    /// * `WeakKey` - Derived key is below the HS256 minimum
    pub fn new(settings: TokenSettings) -> Result<Self, TokenError> {
        let key_bytes = derive_key_bytes(&settings.secret);
        if key_bytes.len() < MIN_KEY_BYTES {
            return Err(TokenError::WeakKey {
                min: MIN_KEY_BYTES,
                actual: key_bytes.len(),
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&key_bytes),
            decoding_key: DecodingKey::from_secret(&key_bytes),
            issuer: settings.issuer,
            audience: settings.audience,
            access_token_ttl_secs: settings.access_token_ttl_secs,
            clock_skew_secs: settings.clock_skew_secs,
        })
    }

    /// Access-token lifetime in seconds, as reported in auth responses.
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_ttl_secs
    }

    /// Mint a signed access token for a user.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token serialization or signing failed
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_ttl_secs)).timestamp(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            username: username.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and extract the identity it proves.
    ///
    /// Signature, issuer, audience, expiry (with leeway), the `access` type
    /// marker, a numeric subject and a non-blank username are all required;
    /// any single failure rejects the token as a whole.
    ///
    /// # Errors
    /// * `Expired` - Expiry has passed beyond the configured leeway
    /// * `Invalid` - Any other verification failure
    pub fn verify(&self, token: &str) -> Result<VerifiedAccessToken, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.clock_skew_secs;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            },
        )?;
        let claims = data.claims;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(TokenError::Invalid(format!(
                "unexpected token type '{}'",
                claims.token_type
            )));
        }

        if claims.username.trim().is_empty() {
            return Err(TokenError::Invalid(
                "username claim is missing or blank".to_string(),
            ));
        }

        let user_id = claims
            .sub
            .trim()
            .parse::<i64>()
            .map_err(|_| TokenError::Invalid(format!("subject '{}' is not a user id", claims.sub)))?;

        Ok(VerifiedAccessToken {
            user_id,
            username: claims.username,
        })
    }
}

/// Interpret the configured secret as key bytes: base64 first, raw fallback.
fn derive_key_bytes(secret: &str) -> Vec<u8> {
    BASE64
        .decode(secret)
        .unwrap_or_else(|_| secret.as_bytes().to_vec())
}
