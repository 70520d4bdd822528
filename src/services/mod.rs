pub mod prediction_filter;
pub mod session_store;

pub use prediction_filter::filter_by_location;
pub use session_store::SessionStore;
