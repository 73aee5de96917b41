use std::sync::Arc;

use tracing::{info, instrument};

use crate::models::{Customer, ServiceResult};
use crate::repositories::CustomerRepository;

/// Business logic for customer sign-up.
#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    /// Creates and persists a new customer.
    ///
    /// Password hashing is CPU bound (bcrypt at the default work factor
    /// takes hundreds of milliseconds), so it runs on the blocking pool
    /// instead of stalling a runtime worker.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn create(&self, username: &str, password: &str) -> ServiceResult<Customer> {
        let username = username.to_string();
        let password = password.to_string();

        let customer =
            tokio::task::spawn_blocking(move || Customer::new(&username, &password)).await??;

        self.repository.add(&customer).await?;

        info!(customer_id = %customer.id(), "Customer created");

        Ok(customer)
    }

    /// Returns true if a customer already exists with the given username.
    pub async fn username_taken(&self, username: &str) -> ServiceResult<bool> {
        let existing = self.repository.find_by_username(username).await?;

        Ok(existing.is_some())
    }
}
