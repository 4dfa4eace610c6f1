//! Email recipients.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid user: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Request to register a new user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub group: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), UserError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(UserError::InvalidArgument(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: usize,
}

/// In-memory user registry, insertion ordered
#[derive(Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<User, UserError> {
        request.validate()?;

        let user = User {
            id: Uuid::new_v4(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email.trim().to_string(),
            group: request.group,
        };

        self.users.write().await.push(user.clone());
        tracing::info!(user_id = %user.id, "User created");

        Ok(user)
    }
}
