use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Bcrypt work factor used when hashing new passwords.
const HASH_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("password generation failed: {source}")]
    GeneratePassword {
        #[from]
        source: bcrypt::BcryptError,
    },
}

/// A Customer is the main user of the application. The password is only
/// ever held as a bcrypt hash.
#[derive(Debug, Clone)]
pub struct Customer {
    id: Uuid,
    username: String,
    password_hash: String,
}

impl Customer {
    /// Creates a new `Customer` with a fresh id, hashing the given plain
    /// text password. Hashing is CPU bound; async callers should move this
    /// off the runtime worker (see `CustomerService::create`).
    pub fn new(username: &str, password: &str) -> Result<Self, CustomerError> {
        let password_hash = bcrypt::hash(password, HASH_COST)?;

        Ok(Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
        })
    }

    /// Rebuilds a `Customer` from stored credentials. The password hash is
    /// taken as-is and an existing id is required.
    pub fn restore(id: Uuid, username: String, password_hash: String) -> Self {
        Self {
            id,
            username,
            password_hash,
        }
    }

    /// Uniquely identifies the customer within the application.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The email address the customer signed up with.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The bcrypt hash of the customer's password.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns true if the stored hash matches the given plain text
    /// password.
    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

/// The request body accepted by `POST /customers`. Missing fields decode
/// as empty strings so they fail validation rather than JSON decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
