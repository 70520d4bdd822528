use super::{classify, log_outcome, request_language};
use crate::error::AppError;
use crate::models::{Session, SessionFields};
use crate::services::SessionStore;
use crate::state::ResultState;
use cattle_api::{ApiRequest, ApiResponse, LoginRequest, LoginResponse, Transport};
use std::sync::Arc;

/// Authentication and everything that touches the stored session
pub struct AuthRepo {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl AuthRepo {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    /// Logs in and, on success only, stores the returned identity.
    ///
    /// If the identity cannot be stored the login settles as `Failed`, so a
    /// `Success` always means the session is persisted.
    pub async fn login(&self, request: LoginRequest) -> ResultState<ApiResponse<LoginResponse>> {
        let language = request_language(&self.session);
        let request = ApiRequest::Login(request);
        let outcome = self.transport.send(&request, &language).await;

        let state = match classify::<LoginResponse>(outcome) {
            ResultState::Success(response) => {
                match self.session.save(&SessionFields::from(&response.body)) {
                    Ok(()) => ResultState::Success(response),
                    Err(e) => {
                        log::error!("Login succeeded but the session could not be stored: {}", e);
                        ResultState::Failed(format!(
                            "Could not store session: {}",
                            e.user_message()
                        ))
                    }
                }
            }
            other => other,
        };

        log_outcome(request.endpoint(), &state);
        state
    }

    pub fn save_language(&self, code: &str) -> Result<String, AppError> {
        self.session.save_language(code)
    }

    pub fn language(&self) -> Result<String, AppError> {
        self.session.language()
    }

    pub fn current_user_id(&self) -> Result<Option<String>, AppError> {
        self.session.user_id()
    }

    pub fn session(&self) -> Result<Option<Session>, AppError> {
        self.session.session()
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.session.clear()
    }
}
