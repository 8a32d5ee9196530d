//! Token and password infrastructure for the identity service.
//!
//! Provides:
//! - Password hashing (Argon2id)
//! - Signed, expiring access/refresh tokens (HS256 JWT)
//! - An injectable clock so token expiry can be driven in tests
//!
//! Account storage and session policy live in the service; this crate only knows
//! about a [`Principal`], the minimal view of an account a token is minted for.
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
//! ## Tokens
//! ```
//! use auth::{Principal, TokenCodec, TokenLifetimes, TokenType};
//!
//! struct Kiosk;
//!
//! impl Principal for Kiosk {
//!     fn subject(&self) -> &str { "kiosk01" }
//!     fn principal_id(&self) -> String { "42".to_string() }
//!     fn role(&self) -> &str { "KITCHEN" }
//!     fn is_active(&self) -> bool { true }
//! }
//!
//! let codec = TokenCodec::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     TokenLifetimes::from_secs(900, 86_400),
//! )
//! .unwrap();
//!
//! let token = codec.issue_access(&Kiosk).unwrap();
//! let claims = codec.parse(&token).unwrap();
//! assert_eq!(claims.sub, "kiosk01");
//! assert_eq!(claims.token_type, TokenType::Access);
//! assert!(codec.validate_against(&token, &Kiosk));
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Clock;
pub use token::ManualClock;
pub use token::Principal;
pub use token::SystemClock;
pub use token::TokenClaims;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenLifetimes;
pub use token::TokenType;
