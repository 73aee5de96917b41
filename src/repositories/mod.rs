pub mod customer_repository;
pub mod memory;

pub use customer_repository::{CustomerRepository, PostgresCustomerRepository};
pub use memory::InMemoryCustomerRepository;

#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
