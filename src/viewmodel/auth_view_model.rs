use super::operation::{Operation, TriggerPolicy};
use crate::error::AppError;
use crate::models::{DEFAULT_LANGUAGE, GUEST_NAME};
use crate::repo::AuthRepo;
use crate::state::ResultState;
use cattle_api::{LoginRequest, LoginResponse};
use tokio::sync::watch;

pub struct AuthViewModel {
    repo: AuthRepo,
    login: Operation<LoginResponse>,
}

impl AuthViewModel {
    pub fn new(repo: AuthRepo, policy: TriggerPolicy) -> Self {
        Self {
            repo,
            login: Operation::new("login", policy),
        }
    }

    /// Validates the credentials, then logs in. The session is stored by the
    /// repository before `Success` is published.
    pub async fn login(&self, user_id: &str, password: &str) -> Option<ResultState<LoginResponse>> {
        let request = LoginRequest::new(user_id.trim(), password);

        self.login
            .run(async move {
                if let Err(e) = request.validate() {
                    return ResultState::Failed(AppError::from(e).user_message());
                }
                self.repo.login(request).await.map(|response| response.body)
            })
            .await
    }

    pub fn login_state(&self) -> ResultState<LoginResponse> {
        self.login.state()
    }

    pub fn subscribe_login(&self) -> watch::Receiver<ResultState<LoginResponse>> {
        self.login.subscribe()
    }

    pub fn reset_login_state(&self) {
        self.login.reset();
    }

    /// Clears the stored session and puts the login slot back to `Idle`
    pub fn logout(&self) -> Result<(), AppError> {
        self.repo.logout()?;
        self.login.reset();
        Ok(())
    }

    pub fn save_language_preference(&self, code: &str) -> Result<String, AppError> {
        self.repo.save_language(code)
    }

    pub fn is_logged_in(&self) -> bool {
        match self.repo.current_user_id() {
            Ok(user_id) => user_id.is_some(),
            Err(e) => {
                log::warn!("Could not read session: {}", e);
                false
            }
        }
    }

    pub fn user_name(&self) -> String {
        self.read_session(|s| s.user_name, GUEST_NAME.to_string())
    }

    pub fn location(&self) -> Option<String> {
        self.read_session(|s| s.location, None)
    }

    pub fn language(&self) -> String {
        self.repo.language().unwrap_or_else(|e| {
            log::warn!("Could not read language preference: {}", e);
            DEFAULT_LANGUAGE.to_string()
        })
    }

    fn read_session<R>(&self, field: impl FnOnce(crate::models::Session) -> R, default: R) -> R {
        match self.repo.session() {
            Ok(Some(session)) => field(session),
            Ok(None) => default,
            Err(e) => {
                log::warn!("Could not read session: {}", e);
                default
            }
        }
    }
}
