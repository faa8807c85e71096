// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod model_runner;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use model_runner::{InvocationError, ModelRunner};
pub use time_provider::TimeProvider;
