//! In-memory account store with argon2id credential hashing.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use rand::rngs::OsRng;
use tracing::error;

use crate::domain::account::Username;
use crate::domain::ports::AccountStore;

/// Mutex-guarded map from username to argon2id PHC hash string.
///
/// Hashing is CPU-expensive by design (tunable cost) and runs on the
/// blocking pool so it never stalls the reactor. The uniqueness invariant
/// is enforced by re-checking the map under the lock immediately before
/// insert, so two concurrent registrations of the same name cannot both
/// succeed.
pub struct InMemoryAccounts {
    params: Params,
    inner: Mutex<HashMap<Username, String>>,
}

impl InMemoryAccounts {
    /// Build an empty store hashing with the given argon2 cost parameters.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Number of registered accounts.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Username, String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountStore for InMemoryAccounts {
    async fn exists(&self, username: &Username) -> bool {
        self.lock().contains_key(username)
    }

    async fn create(&self, username: &Username, password: &str) -> bool {
        // Hash outside the lock; the expensive step must not serialise
        // unrelated requests.
        if self.lock().contains_key(username) {
            return false;
        }
        let params = self.params.clone();
        let password = password.to_owned();
        let hashed = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        })
        .await;

        let hash = match hashed {
            Ok(Ok(hash)) => hash,
            Ok(Err(err)) => {
                error!(%username, error = %err, "credential hashing failed");
                return false;
            }
            Err(err) => {
                error!(%username, error = %err, "credential hashing task failed");
                return false;
            }
        };

        match self.lock().entry(username.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(hash);
                true
            }
        }
    }

    async fn authenticate(&self, username: &Username, password: &str) -> bool {
        let Some(stored) = self.lock().get(username).cloned() else {
            return false;
        };
        let password = password.to_owned();
        let verified = tokio::task::spawn_blocking(move || {
            // Cost parameters are read back from the PHC string, so hashes
            // minted under older settings keep verifying.
            PasswordHash::new(&stored).and_then(|parsed| {
                Argon2::default().verify_password(password.as_bytes(), &parsed)
            })
        })
        .await;

        match verified {
            Ok(Ok(())) => true,
            Ok(Err(_)) => false,
            Err(err) => {
                error!(%username, error = %err, "credential verification task failed");
                false
            }
        }
    }
}
