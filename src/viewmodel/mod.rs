//! Orchestrators: each view model owns one observable slot per operation and
//! drives it through `Idle → Loading → terminal`.

pub mod auth_view_model;
pub mod cattle_view_model;
pub mod operation;

pub use auth_view_model::AuthViewModel;
pub use cattle_view_model::{CattleViewModel, NOT_LOGGED_IN};
pub use operation::{Operation, TriggerPolicy};
