//! # Cattle Registry
//!
//! Client core of a cattle breed registration app. Every network operation is
//! observed through a [`ResultState`]: `Idle`, then `Loading`, then exactly one
//! terminal outcome, so a screen never has to inspect a raw response.
//!
//! ## Layers
//!
//! - [`cattle_api`]: wire models and the HTTP transport
//! - [`repo`]: one call per method, classified into a [`ResultState`]
//! - [`services::SessionStore`]: the logged-in identity and language, in SQLite
//! - [`viewmodel`]: one observable slot per operation, plus the location filter
//!
//! ```rust,ignore
//! cattle_registry::logging::init_logging("info");
//! let app = App::build(AppConfig::load(Path::new("cattle.toml"))?)?;
//! app.auth.login("farmer-7", "secret").await;
//! app.cattle.get_cattle().await;
//! ```

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod repo;
pub mod services;
pub mod state;
pub mod viewmodel;

#[cfg(test)]
mod test_support;

pub use app::App;
pub use config::AppConfig;
pub use error::AppError;
pub use state::ResultState;
pub use viewmodel::{AuthViewModel, CattleViewModel, TriggerPolicy};
