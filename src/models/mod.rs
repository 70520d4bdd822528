pub mod session;

pub use session::{Session, SessionFields, DEFAULT_LANGUAGE, GUEST_NAME, SUPPORTED_LANGUAGES};
