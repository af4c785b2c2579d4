//! Authentication error types.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum AuthError {
    #[error("Malformed password hash: {reason}")]
    #[diagnostic(
        code(gyanrich::auth::malformed_hash),
        help("Generate a new hash with: gyanrich admin hash-password")
    )]
    MalformedHash { reason: String },

    #[error("Password hashing failed: {message}")]
    #[diagnostic(code(gyanrich::auth::hashing))]
    Hashing { message: String },

    #[error("System random number generator unavailable: {message}")]
    #[diagnostic(code(gyanrich::auth::entropy))]
    Entropy { message: String },
}

pub type AuthResult<T> = Result<T, AuthError>;
