//! Admin authentication.
//!
//! A single administrator password, stored only as an Argon2id hash, is
//! exchanged for a random session token. The token travels in an
//! `HttpOnly` cookie; the database keeps its SHA-256 digest and an expiry.

mod error;
mod password;
mod session;

pub use error::{AuthError, AuthResult};
pub use password::{WorkFactor, hash_password, hash_password_with_salt, verify_password};
pub use session::{
    DEFAULT_SESSION_TTL, SESSION_COOKIE, clear_session_cookie, digest_token, mint_token,
    session_cookie, token_from_headers,
};
