use crate::config::AppConfig;
use crate::error::AppError;
use crate::repo::{AuthRepo, CattleRepo};
use crate::services::SessionStore;
use crate::viewmodel::{AuthViewModel, CattleViewModel};
use cattle_api::{CattleApiService, Transport};
use std::sync::Arc;

/// The wired client: one session store and one transport shared by both view models
pub struct App {
    pub config: AppConfig,
    pub session: Arc<SessionStore>,
    pub auth: AuthViewModel,
    pub cattle: CattleViewModel,
}

impl App {
    /// Opens the session database and connects the HTTP transport
    pub fn build(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;

        let session = Arc::new(SessionStore::open(&config.storage.database_path)?);
        let transport = CattleApiService::new(config.transport_config())
            .map_err(|e| AppError::Config(e.to_string()))?;

        log::info!(
            "Cattle registry client ready ({}, session at {})",
            config.api.base_url,
            config.storage.database_path.display()
        );
        Ok(Self::with_transport(config, session, Arc::new(transport)))
    }

    pub fn with_transport(
        config: AppConfig,
        session: Arc<SessionStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let policy = config.orchestrator.trigger_policy;
        let auth = AuthViewModel::new(AuthRepo::new(transport.clone(), session.clone()), policy);
        let cattle = CattleViewModel::new(
            CattleRepo::new(transport, session.clone()),
            session.clone(),
            policy,
        );

        Self {
            config,
            session,
            auth,
            cattle,
        }
    }
}
