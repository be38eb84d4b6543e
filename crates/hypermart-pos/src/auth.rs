//! # Credential Handling
//!
//! Password hashing and sign-in for admin and cashier accounts.
//!
//! ## Credential Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Credential Handling                        │
//! │                                                                  │
//! │  Account creation                Sign-in                         │
//! │  ─────────────────               ────────                        │
//! │  plaintext (transient)           email + plaintext (transient)   │
//! │       │                               │                          │
//! │       ▼                               ▼                          │
//! │  hash_password()                 find_by_email()                 │
//! │       │                               │                          │
//! │       ▼                               ▼                          │
//! │  PHC string ──▶ users table ──▶ verify_password() ──▶ User       │
//! │                                                                  │
//! │  Plaintext is never persisted, logged, or serialized.            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hashes are Argon2id in PHC string format (`$argon2id$v=19$...`), salt
//! generated per password. Default parameters of the `argon2` crate are
//! fine for an on-premise POS terminal.

use hypermart_core::User;
use hypermart_db::{Database, UserRepository};
use tracing::{info, warn};

use crate::error::{PosError, PosResult};

// =============================================================================
// Hashing Helpers
// =============================================================================

/// Hashes a password for storage.
///
/// Returns the full PHC string (algorithm, parameters, salt, hash), which
/// is everything `verify_password` needs later.
pub fn hash_password(password: &str) -> PosResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2.hash_password(password.as_bytes(), &salt).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        PosError::internal()
    })?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
///
/// Fails closed: an unparseable hash verifies as false rather than
/// erroring, so a corrupted row can never let someone in.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Sign-In
// =============================================================================

/// Sign-in service backed by the user repository.
pub struct AuthService {
    users: UserRepository,
}

impl AuthService {
    /// Creates the service from a database handle.
    pub fn new(db: &Database) -> Self {
        AuthService { users: db.users() }
    }

    /// Authenticates an email/password pair and returns the account.
    ///
    /// Unknown email and wrong password both map to the same
    /// `AUTH_ERROR`, so the response does not reveal which accounts
    /// exist. The distinction is still logged for the operator.
    pub async fn sign_in(&self, email: &str, password: &str) -> PosResult<User> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!(email = %email, "sign-in attempt for unknown email");
                return Err(PosError::auth());
            }
        };

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = %user.id, "sign-in attempt with wrong password");
            return Err(PosError::auth());
        }

        info!(user_id = %user.id, role = ?user.role, "user signed in");
        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
