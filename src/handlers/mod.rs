pub mod customers;
pub mod health;
pub mod middleware;
pub mod response;

pub use customers::ApiState;
