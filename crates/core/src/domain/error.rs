// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Empty program path")]
    EmptyProgram,

    #[error("Empty argument list")]
    EmptyArguments,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
