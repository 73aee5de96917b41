use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Customer, RepositoryError, RepositoryResult};

/// In-memory implementation of [`CustomerRepository`] keyed by username.
/// Used by the integration tests and handy for local experimentation;
/// nothing survives a restart.
///
/// [`CustomerRepository`]: super::CustomerRepository
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<String, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    pub async fn len(&self) -> usize {
        self.customers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.customers.read().await.is_empty()
    }
}

#[async_trait]
impl super::CustomerRepository for InMemoryCustomerRepository {
    async fn add(&self, customer: &Customer) -> RepositoryResult<()> {
        let mut customers = self.customers.write().await;

        if customers.contains_key(customer.username()) {
            return Err(RepositoryError::ConstraintViolation {
                message: format!("duplicate username: {}", customer.username()),
            });
        }

        customers.insert(customer.username().to_string(), customer.clone());

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<Customer>> {
        Ok(self.customers.read().await.get(username).cloned())
    }
}
