// Domain Layer - Pure business logic and entities

pub mod error;
pub mod invocation;
pub mod user;

// Re-exports
pub use error::DomainError;
pub use invocation::InvocationRequest;
pub use user::{UserDetails, Username};
