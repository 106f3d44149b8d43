//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for platform services:
//! - Password hashing (Argon2id)
//! - Signed access-token issuance and verification
//!
//! Services keep their own domain traits and adapt these implementations.
//! The codec is stateless aside from its signing key, so a single instance
//! can be shared across all request workers.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{TokenCodec, TokenSettings};
//!
//! let codec = TokenCodec::new(TokenSettings {
//!     secret: "secret_key_at_least_32_bytes_long!!".to_string(),
//!     issuer: "community-platform".to_string(),
//!     audience: "community-platform-api".to_string(),
//!     access_token_ttl_secs: 900,
//!     clock_skew_secs: 30,
//! })
//! .unwrap();
//!
//! let token = codec.issue(42, "alice").unwrap();
//! let verified = codec.verify(&token).unwrap();
//! assert_eq!(verified.user_id, 42);
//! assert_eq!(verified.username, "alice");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::AccessTokenClaims;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenSettings;
pub use token::VerifiedAccessToken;
