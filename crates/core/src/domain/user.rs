// User Domain Model
//
// The username registry is a process-wide collaborator of the gateway,
// not part of the invocation bridge. Entries live only for the daemon's
// lifetime.

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};

const MAX_USERNAME_LEN: usize = 64;

/// Validated username (non-empty, bounded length, no whitespace)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(DomainError::InvalidUsername("must not be empty".to_string()));
        }
        if s.len() > MAX_USERNAME_LEN {
            return Err(DomainError::InvalidUsername(format!(
                "must be at most {} bytes",
                MAX_USERNAME_LEN
            )));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidUsername(
                "must not contain whitespace".to_string(),
            ));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque per-user details blob (JSON serializable)
pub type UserDetails = serde_json::Value;
