use crate::error::AppError;
use cattle_api::LoginResponse;
use serde::{Deserialize, Serialize};

/// Language used when nothing (or nothing valid) is stored
pub const DEFAULT_LANGUAGE: &str = "en";

/// Display name used when nobody is logged in
pub const GUEST_NAME: &str = "Guest";

/// Languages the backend can answer in
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "hi", "or"];

/// Identity fields written together on login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionFields {
    pub user_id: String,
    pub user_name: String,
    pub phone_number: String,
    pub location: String,
}

impl SessionFields {
    /// The user id is the only field that must be present
    pub fn validate(&self) -> Result<(), AppError> {
        if self.user_id.trim().is_empty() {
            return Err(AppError::Validation(
                "user id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&LoginResponse> for SessionFields {
    fn from(response: &LoginResponse) -> Self {
        Self {
            user_id: response.user_id.clone(),
            user_name: response.name.clone(),
            phone_number: response.phone_number.clone(),
            location: response.location.clone(),
        }
    }
}

/// The authenticated user as currently persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub user_name: String,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub language: String,
}
