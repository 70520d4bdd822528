//! Repositories: one per resource family. Each method performs exactly one
//! network call and classifies its outcome; none of them retries.

pub mod auth_repo;
pub mod cattle_repo;
pub mod classify;

pub use auth_repo::AuthRepo;
pub use cattle_repo::CattleRepo;
pub use classify::classify;

use crate::models::DEFAULT_LANGUAGE;
use crate::services::SessionStore;
use crate::state::ResultState;

/// Language sent as `Accept-Language`; a broken store must not block the call
fn request_language(session: &SessionStore) -> String {
    session.language().unwrap_or_else(|e| {
        log::warn!("Could not read language preference, using {}: {}", DEFAULT_LANGUAGE, e);
        DEFAULT_LANGUAGE.to_string()
    })
}

fn log_outcome<T>(endpoint: &str, state: &ResultState<T>) {
    match state {
        ResultState::Success(_) => log::info!("{} settled: {}", endpoint, state),
        ResultState::Idle | ResultState::Loading => {
            log::debug!("{} in unexpected state: {}", endpoint, state)
        }
        _ => log::warn!("{} settled: {}", endpoint, state),
    }
}
