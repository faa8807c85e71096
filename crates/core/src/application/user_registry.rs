// In-Memory User Registry
//
// Process-wide state with an explicit lifecycle: created at startup,
// cleared at shutdown. Kept strictly outside the invocation bridge;
// writes go through a single RwLock (single-writer discipline).

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{UserDetails, Username};
use crate::error::{AppError, Result};

/// In-memory username registry (no persistence beyond process lifetime)
#[derive(Default)]
pub struct UserRegistry {
    users: RwLock<HashMap<Username, UserDetails>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new user; duplicate usernames conflict.
    pub async fn create(&self, username: Username, details: UserDetails) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&username) {
            return Err(AppError::Conflict(format!(
                "User {} already exists",
                username
            )));
        }
        info!(username = %username, "User created");
        users.insert(username, details);
        Ok(())
    }

    pub async fn get(&self, username: &Username) -> Option<UserDetails> {
        self.users.read().await.get(username).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Drop all entries (shutdown lifecycle hook).
    pub async fn clear(&self) {
        let mut users = self.users.write().await;
        let count = users.len();
        users.clear();
        info!(dropped_users = count, "User registry cleared");
    }
}
