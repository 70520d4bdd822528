use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Envelope wrapped around every payload the backend returns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status_code: i32,
    #[serde(default)]
    pub message: Option<String>,
    pub body: Option<T>,
}

/// An envelope whose payload is known to be present
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status_code: i32,
    pub message: String,
    pub body: T,
}

impl<T> ApiEnvelope<T> {
    /// Returns `None` when the server sent the envelope without a payload
    pub fn into_response(self) -> Option<ApiResponse<T>> {
        let body = self.body?;
        Some(ApiResponse {
            status_code: self.status_code,
            message: self.message.unwrap_or_default(),
            body,
        })
    }
}

/// A request field that failed boundary validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

fn require_date(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    if let Some(value) = value {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            ValidationError::new(field, format!("'{}' is not a YYYY-MM-DD date", value))
        })?;
    }
    Ok(())
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("user_id", &self.user_id)?;
        require("password", &self.password)
    }
}

// Keeps passwords out of request logs
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("user_id", &self.user_id)
            .field("password", &"***")
            .finish()
    }
}

/// Identity returned by a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub user_id: String,
    pub name: String,
    pub phone_number: String,
    pub location: String,
}

/// A new cattle record to register
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CattleRequest {
    pub user_id: String,
    pub tag_number: String,
    pub species: String,
    pub breed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_entry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagging_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
}

impl CattleRequest {
    pub fn new(
        user_id: impl Into<String>,
        tag_number: impl Into<String>,
        species: impl Into<String>,
        breed: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            tag_number: tag_number.into(),
            species: species.into(),
            breed: breed.into(),
            name: None,
            data_entry_date: None,
            tagging_date: None,
            sex: None,
            dob: None,
        }
    }

    /// Stamps the record with today's local date
    pub fn with_entry_date_today(mut self) -> Self {
        let today = chrono::Local::now().date_naive();
        self.data_entry_date = Some(today.format("%Y-%m-%d").to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("userId", &self.user_id)?;
        require("tagNumber", &self.tag_number)?;
        require("species", &self.species)?;
        require("breed", &self.breed)?;
        require_date("dataEntryDate", self.data_entry_date.as_deref())?;
        require_date("taggingDate", self.tagging_date.as_deref())?;
        require_date("dob", self.dob.as_deref())?;

        if let Some(sex) = &self.sex {
            let sex = sex.trim();
            if !sex.eq_ignore_ascii_case("male") && !sex.eq_ignore_ascii_case("female") {
                return Err(ValidationError::new(
                    "sex",
                    format!("'{}' is neither Male nor Female", sex),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreedIdObject {
    #[serde(rename = "$oid")]
    pub oid: Option<String>,
}

/// Acknowledgement of a stored record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CattleResponse {
    pub user_id: Option<String>,
    pub tag_number: Option<String>,
    pub breed_id: Option<BreedIdObject>,
    pub breed_name: Option<String>,
}

/// One past record as listed by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cattle {
    pub name: Option<String>,
    pub tag_number: String,
    pub data_entry_date: Option<String>,
    pub tagging_date: Option<String>,
    pub species: String,
    pub sex: Option<String>,
    pub dob: Option<String>,
    pub breed_id: String,
    pub breed_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct BreedDetails {
    pub breed_id: String,
    pub breed_name: String,
    pub breeding_tract: String,
    #[serde(default)]
    pub location: Vec<String>,
    pub main_uses: String,
    pub physical_desc: String,
    pub species: String,
}

/// One ranked guess from the classification service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub breed_id: Option<String>,
    pub breed: Option<String>,
    pub accuracy: Option<f32>,
    #[serde(default)]
    pub location: Vec<String>,
}

impl Prediction {
    /// Predictions without a breed id are not yet catalogued on the server
    pub fn is_catalogued(&self) -> bool {
        self.breed_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

/// Ranked prediction batch, in the order the server returned it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PredictionBody {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// Image part of the prediction upload plus its optional text parts
#[derive(Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
            name: None,
            description: None,
        }
    }

    /// Reads an image from disk, rejecting empty files
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is empty", path.display()),
            ));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();

        Ok(Self::new(file_name, content_type_for(path), bytes))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
