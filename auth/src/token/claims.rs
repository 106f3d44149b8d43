use serde::Deserialize;
use serde::Serialize;

/// Value of the type-marker claim on access tokens.
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// Claims carried by a signed access token.
///
/// The subject is the stringified numeric user id; the username rides along
/// so downstream services can attribute requests without a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// Unique token identifier
    pub jti: String,

    /// Issuer
    pub iss: String,

    /// Audience (single value)
    pub aud: String,

    /// Subject: stringified numeric user id
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Type marker, always [`ACCESS_TOKEN_TYPE`] for tokens minted here
    pub token_type: String,

    /// Username of the subject
    pub username: String,
}
