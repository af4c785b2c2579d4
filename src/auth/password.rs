//! Argon2id password hashes in PHC string format
//! (`$argon2id$v=19$m=…,t=…,p=1$<salt>$<hash>`).

use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use super::error::{AuthError, AuthResult};

const SALT_LEN: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub passes: u32,
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            passes: Params::DEFAULT_T_COST,
        }
    }
}

/// Hash a password with a fresh random salt and the default work factor.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::fill(&mut salt).map_err(|e| AuthError::Entropy {
        message: e.to_string(),
    })?;
    hash_password_with_salt(password, &salt, WorkFactor::default())
}

/// Hash a password with an explicit salt (at least 8 bytes) and work factor.
pub fn hash_password_with_salt(
    password: &str,
    salt: &[u8],
    work: WorkFactor,
) -> AuthResult<String> {
    let hashing = |e: &dyn std::fmt::Display| AuthError::Hashing {
        message: e.to_string(),
    };

    let params = Params::new(work.memory_kib, work.passes, 1, None).map_err(|e| hashing(&e))?;
    let salt = SaltString::encode_b64(salt).map_err(|e| hashing(&e))?;

    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| hashing(&e))
}

/// Check `password` against a PHC-encoded hash.
///
/// Cost parameters are read from the hash itself. A mismatch is `Ok(false)`;
/// an unparseable or non-Argon2 hash is an error.
pub fn verify_password(password: &str, encoded: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(encoded.trim()).map_err(|e| AuthError::MalformedHash {
        reason: e.to_string(),
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(AuthError::MalformedHash {
            reason: e.to_string(),
        }),
    }
}
