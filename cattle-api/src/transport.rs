use crate::models::{CattleRequest, ImageUpload, LoginRequest};
use async_trait::async_trait;

/// The remote operations the backend exposes
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    Login(LoginRequest),
    AddCattle(CattleRequest),
    GetCattle { user_id: String },
    GetBreed { breed_id: String },
    UploadAndPredict(ImageUpload),
}

impl ApiRequest {
    /// Endpoint name, used for routing and logging
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApiRequest::Login(_) => "login",
            ApiRequest::AddCattle(_) => "push-cattle",
            ApiRequest::GetCattle { .. } => "get-cattle",
            ApiRequest::GetBreed { .. } => "get-breed",
            ApiRequest::UploadAndPredict(_) => "upload-and-predict",
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            ApiRequest::GetCattle { .. } | ApiRequest::GetBreed { .. } => "GET",
            _ => "POST",
        }
    }
}

/// Whatever the server sent back, before any classification
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// HTTP reason phrase, empty when the status has none
    pub reason: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Host could not be resolved or the connection was refused
    Connect,
    /// Connect, read or write deadline elapsed
    Timeout,
    /// Failure while sending the request or reading the response
    Io,
    /// The request could not be built at all
    Other,
}

/// Error type for transport operations
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True when the server was never reached
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::Connect | TransportErrorKind::Timeout | TransportErrorKind::Io
        )
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TransportErrorKind::Connect => write!(f, "Connection error: {}", self.message),
            TransportErrorKind::Timeout => write!(f, "Timeout: {}", self.message),
            TransportErrorKind::Io => write!(f, "I/O error: {}", self.message),
            TransportErrorKind::Other => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TransportError {}

/// One HTTP round trip per call. This is the only place the core suspends.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &ApiRequest,
        language: &str,
    ) -> Result<RawResponse, TransportError>;
}
