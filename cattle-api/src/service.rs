use crate::models::ImageUpload;
use crate::transport::{ApiRequest, RawResponse, Transport, TransportError, TransportErrorKind};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;

/// Connection settings for the backend
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub user_agent: String,
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(60),
            read_timeout: Duration::from_secs(90),
            write_timeout: Duration::from_secs(90),
            user_agent: format!("CattleRegistry/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Parses an absolute http(s) URL that endpoint paths can be appended to
pub fn parse_base_url(base_url: &str) -> Result<Url, TransportError> {
    let url = Url::parse(base_url.trim()).map_err(|e| {
        TransportError::new(
            TransportErrorKind::Other,
            format!("Invalid base URL '{}': {}", base_url, e),
        )
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::new(
            TransportErrorKind::Other,
            format!("Base URL '{}' must be an http(s) URL", base_url),
        ));
    }
    Ok(url)
}

/// reqwest-backed [`Transport`] for the cattle registry backend
pub struct CattleApiService {
    client: reqwest::Client,
    base_url: Url,
}

impl CattleApiService {
    /// Create a new service; fails only on an unusable base URL or TLS setup
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let base_url = parse_base_url(&config.base_url)?;

        // reqwest has no write deadline of its own; the overall deadline bounds uploads
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.read_timeout + config.write_timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                TransportError::new(
                    TransportErrorKind::Other,
                    format!("Client build failed: {}", e),
                )
            })?;

        Ok(Self { client, base_url })
    }

    /// Full URL the request will be sent to
    pub fn endpoint_url(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                TransportError::new(
                    TransportErrorKind::Other,
                    format!("Base URL '{}' cannot carry a path", self.base_url),
                )
            })?;
            segments.pop_if_empty().push(request.endpoint());
            if let ApiRequest::GetBreed { breed_id } = request {
                segments.push(breed_id);
            }
        }

        if let ApiRequest::GetCattle { user_id } = request {
            url.query_pairs_mut().append_pair("userId", user_id);
        }

        Ok(url)
    }

    fn build(
        &self,
        request: &ApiRequest,
        language: &str,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = self.endpoint_url(request)?;

        let builder = match request {
            ApiRequest::Login(body) => self.client.post(url).json(body),
            ApiRequest::AddCattle(body) => self.client.post(url).json(body),
            ApiRequest::GetCattle { .. } | ApiRequest::GetBreed { .. } => self.client.get(url),
            ApiRequest::UploadAndPredict(upload) => {
                self.client.post(url).multipart(multipart_form(upload)?)
            }
        };

        Ok(builder
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, language))
    }
}

#[async_trait]
impl Transport for CattleApiService {
    async fn send(
        &self,
        request: &ApiRequest,
        language: &str,
    ) -> Result<RawResponse, TransportError> {
        let builder = self.build(request, language)?;

        log::debug!(
            "--> {} {} (Accept-Language: {})",
            request.method(),
            request.endpoint(),
            language
        );

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        log::debug!(
            "<-- {} {} ({} bytes)",
            status.as_u16(),
            request.endpoint(),
            body.len()
        );

        Ok(RawResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            body.to_vec(),
        ))
    }
}

/// Image part named `image`, plus the optional `name` and `description` text parts
fn multipart_form(upload: &ImageUpload) -> Result<Form, TransportError> {
    let image = Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.content_type)
        .map_err(|e| {
            TransportError::new(
                TransportErrorKind::Other,
                format!("Invalid content type '{}': {}", upload.content_type, e),
            )
        })?;

    let mut form = Form::new().part("image", image);
    if let Some(name) = &upload.name {
        form = form.text("name", name.clone());
    }
    if let Some(description) = &upload.description {
        form = form.text("description", description.clone());
    }
    Ok(form)
}

fn transport_error(e: reqwest::Error) -> TransportError {
    // Timeout first: a connect timeout also reports is_connect()
    let kind = if e.is_timeout() {
        TransportErrorKind::Timeout
    } else if e.is_connect() {
        TransportErrorKind::Connect
    } else if e.is_builder() {
        TransportErrorKind::Other
    } else {
        TransportErrorKind::Io
    };
    TransportError::new(kind, e.to_string())
}
