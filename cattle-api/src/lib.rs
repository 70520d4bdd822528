//! # Cattle API
//!
//! Client-side plumbing for the cattle registry backend.
//!
//! This crate provides:
//! - Wire models for every endpoint (login, records, breed lookup, prediction)
//! - Boundary validation for outgoing requests
//! - The [`Transport`] seam and its reqwest implementation, [`CattleApiService`]
//!
//! ## Separation of Concerns
//!
//! This crate only moves bytes. It does **not**:
//! - Classify responses into application states (handled by the application)
//! - Persist the session or language preference (handled by the application)
//! - Retry failed calls (retry is a caller-level command)
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use cattle_api::{ApiRequest, CattleApiService, LoginRequest, Transport, TransportConfig};
//!
//! let service = CattleApiService::new(TransportConfig::new("https://api.example.com/"))?;
//! let request = ApiRequest::Login(LoginRequest::new("farmer-7", "secret"));
//! let raw = service.send(&request, "en").await?;
//! println!("{} {}", raw.status, raw.reason);
//! ```

pub mod models;
pub mod service;
pub mod transport;

pub use models::{
    ApiEnvelope, ApiResponse, BreedDetails, BreedIdObject, Cattle, CattleRequest, CattleResponse,
    ImageUpload, LoginRequest, LoginResponse, Prediction, PredictionBody, ValidationError,
};
pub use service::{parse_base_url, CattleApiService, TransportConfig};
pub use transport::{ApiRequest, RawResponse, Transport, TransportError, TransportErrorKind};
