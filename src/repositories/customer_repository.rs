use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Customer, RepositoryError, RepositoryResult};

/// Storage abstraction for customers. Implementations must enforce
/// username uniqueness at the storage layer; the service layer treats
/// [`RepositoryError::ConstraintViolation`] as "username taken".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Persists a new customer.
    async fn add(&self, customer: &Customer) -> RepositoryResult<()>;

    /// Looks up a customer by their username.
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<Customer>>;
}

/// Postgres-backed implementation of [`CustomerRepository`].
#[derive(Debug, Clone)]
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_customer(row: &PgRow) -> Result<Customer, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let username: String = row.try_get("username")?;
    let password_hash: String = row.try_get("password_hash")?;

    Ok(Customer::restore(id, username, password_hash))
}

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

fn map_insert_error(error: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_error) = error {
        if db_error.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return RepositoryError::ConstraintViolation {
                message: db_error.message().to_string(),
            };
        }
    }

    RepositoryError::from(error)
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn add(&self, customer: &Customer) -> RepositoryResult<()> {
        sqlx::query(
            "INSERT INTO customers (id, username, password_hash) VALUES ($1, $2, $3)",
        )
        .bind(customer.id())
        .bind(customer.username())
        .bind(customer.password_hash())
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        debug!(customer_id = %customer.id(), "Customer persisted");

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<Customer>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash FROM customers WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_customer(&row)?)),
            None => Ok(None),
        }
    }
}
