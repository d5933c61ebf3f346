use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("user id cannot be empty")]
    EmptyId,

    #[error("user name cannot be empty")]
    EmptyName,

    #[error("user email cannot be empty")]
    EmptyEmail,
}

/// The signed-in user.
///
/// Only presence is validated; there is no uniqueness or format check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
}

impl User {
    /// Build a user, trimming every field.
    ///
    /// # Errors
    ///
    /// Returns `UserError` if any field is blank.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserError> {
        let id = id.into().trim().to_owned();
        let name = name.into().trim().to_owned();
        let email = email.into().trim().to_owned();

        if id.is_empty() {
            return Err(UserError::EmptyId);
        }
        if name.is_empty() {
            return Err(UserError::EmptyName);
        }
        if email.is_empty() {
            return Err(UserError::EmptyEmail);
        }

        Ok(Self {
            id: UserId::new(id),
            name,
            email,
        })
    }

    /// The account every simulated login and signup resolves to.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            id: UserId::new("1"),
            name: "Demo User".to_owned(),
            email: "demo@example.com".to_owned(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}
