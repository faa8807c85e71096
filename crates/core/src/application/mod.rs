// Application Layer - Use Cases and Business Logic

pub mod predict;
pub mod user_registry;

// Re-exports
pub use predict::{ModelCommand, PredictionService};
pub use user_registry::UserRegistry;
