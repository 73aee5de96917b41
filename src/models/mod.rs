// Re-export all model types
pub use self::customer::*;
pub use self::errors::*;
pub use self::validation::*;

// Namespaced so call sites read as `money::max(a, b)`; the value type
// itself is re-exported for convenience.
pub mod money;
pub use self::money::Amount;

mod customer;
mod errors;
mod validation;
