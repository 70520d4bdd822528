//! Durable session persistence
//!
//! The authenticated user's identity and language preference live in a flat
//! key/value table. One store instance is opened at startup and shared as
//! `Arc<SessionStore>` with every repository and view model that needs it.

use crate::database;
use crate::error::AppError;
use crate::models::{Session, SessionFields, DEFAULT_LANGUAGE, GUEST_NAME, SUPPORTED_LANGUAGES};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use unic_langid::LanguageIdentifier;

const KEY_USER_ID: &str = "user_id";
const KEY_USER_NAME: &str = "user_name";
const KEY_PHONE_NUMBER: &str = "phone_number";
const KEY_LOCATION: &str = "location";
const KEY_LANGUAGE: &str = "language";

const UPSERT: &str = "INSERT INTO session (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

pub struct SessionStore {
    conn: Mutex<Connection>,
}

impl SessionStore {
    /// Opens the store at `path`, creating the file and schema if needed
    pub fn open(path: &Path) -> Result<Self, AppError> {
        Ok(Self::from_connection(database::open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        Ok(Self::from_connection(database::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    // A panic while holding the lock cannot leave a half-written session:
    // every write is a single statement or a committed transaction.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        let value = self
            .lock()
            .query_row("SELECT value FROM session WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Persists all identity fields in one transaction
    pub fn save(&self, fields: &SessionFields) -> Result<(), AppError> {
        fields.validate()?;

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let now = Utc::now();
        for (key, value) in [
            (KEY_USER_ID, &fields.user_id),
            (KEY_USER_NAME, &fields.user_name),
            (KEY_PHONE_NUMBER, &fields.phone_number),
            (KEY_LOCATION, &fields.location),
        ] {
            tx.execute(UPSERT, (key, value, now))?;
        }
        tx.commit()?;

        log::info!("Session saved for user {}", fields.user_id);
        Ok(())
    }

    /// Stores the preferred language, normalized to its primary subtag
    pub fn save_language(&self, code: &str) -> Result<String, AppError> {
        let language = normalize_language(code)?;
        self.lock()
            .execute(UPSERT, (KEY_LANGUAGE, &language, Utc::now()))?;

        log::info!("Language preference set to {}", language);
        Ok(language)
    }

    /// Removes every stored key, the language preference included
    pub fn clear(&self) -> Result<(), AppError> {
        let removed = self.lock().execute("DELETE FROM session", [])?;
        log::info!("Session cleared ({} keys removed)", removed);
        Ok(())
    }

    pub fn user_id(&self) -> Result<Option<String>, AppError> {
        Ok(self
            .read(KEY_USER_ID)?
            .filter(|id| !id.trim().is_empty()))
    }

    pub fn is_logged_in(&self) -> Result<bool, AppError> {
        Ok(self.user_id()?.is_some())
    }

    pub fn user_name(&self) -> Result<String, AppError> {
        Ok(self
            .read(KEY_USER_NAME)?
            .unwrap_or_else(|| GUEST_NAME.to_string()))
    }

    pub fn phone_number(&self) -> Result<Option<String>, AppError> {
        self.read(KEY_PHONE_NUMBER)
    }

    pub fn location(&self) -> Result<Option<String>, AppError> {
        self.read(KEY_LOCATION)
    }

    pub fn language(&self) -> Result<String, AppError> {
        Ok(self
            .read(KEY_LANGUAGE)?
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()))
    }

    /// When the current session was written, `None` when logged out
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        let saved_at = self
            .lock()
            .query_row(
                "SELECT updated_at FROM session WHERE key = ?1",
                [KEY_USER_ID],
                |row| row.get(0),
            )
            .optional()?;
        Ok(saved_at)
    }

    /// The whole session, `None` when nobody is logged in
    pub fn session(&self) -> Result<Option<Session>, AppError> {
        let Some(user_id) = self.user_id()? else {
            return Ok(None);
        };

        Ok(Some(Session {
            user_id,
            user_name: self.user_name()?,
            phone_number: self.phone_number()?,
            location: self.location()?,
            language: self.language()?,
        }))
    }
}

fn normalize_language(code: &str) -> Result<String, AppError> {
    let langid: LanguageIdentifier = code.trim().parse().map_err(|e| {
        AppError::Validation(format!("'{}' is not a language code: {}", code, e))
    })?;

    let language = langid.language.as_str();
    if !SUPPORTED_LANGUAGES.contains(&language) {
        return Err(AppError::Validation(format!(
            "Language '{}' is not supported (expected one of {})",
            code,
            SUPPORTED_LANGUAGES.join(", ")
        )));
    }

    Ok(language.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> SessionFields {
        SessionFields {
            user_id: "farmer-7".to_string(),
            user_name: "Asha Patra".to_string(),
            phone_number: "+91 98765 43210".to_string(),
            location: "Odisha".to_string(),
        }
    }

    #[test]
    fn test_save_and_read_round_trip() {
        let store = SessionStore::open_in_memory().unwrap();
        store.save(&fields()).unwrap();

        assert_eq!(store.user_id().unwrap().as_deref(), Some("farmer-7"));
        assert_eq!(store.user_name().unwrap(), "Asha Patra");
        assert_eq!(store.phone_number().unwrap().as_deref(), Some("+91 98765 43210"));
        assert_eq!(store.location().unwrap().as_deref(), Some("Odisha"));
        assert!(store.is_logged_in().unwrap());
        assert!(store.saved_at().unwrap().is_some());
    }

    #[test]
    fn test_defaults_when_empty() {
        let store = SessionStore::open_in_memory().unwrap();

        assert!(store.user_id().unwrap().is_none());
        assert_eq!(store.user_name().unwrap(), GUEST_NAME);
        assert!(store.phone_number().unwrap().is_none());
        assert!(store.location().unwrap().is_none());
        assert_eq!(store.language().unwrap(), DEFAULT_LANGUAGE);
        assert!(store.session().unwrap().is_none());
        assert!(!store.is_logged_in().unwrap());
    }

    #[test]
    fn test_clear_restores_defaults() {
        let store = SessionStore::open_in_memory().unwrap();
        store.save(&fields()).unwrap();
        store.save_language("hi").unwrap();

        store.clear().unwrap();

        assert!(!store.is_logged_in().unwrap());
        assert_eq!(store.user_name().unwrap(), GUEST_NAME);
        assert!(store.location().unwrap().is_none());
        assert_eq!(store.language().unwrap(), DEFAULT_LANGUAGE);
        assert!(store.saved_at().unwrap().is_none());
    }

    #[test]
    fn test_rejected_save_leaves_previous_session() {
        let store = SessionStore::open_in_memory().unwrap();
        store.save(&fields()).unwrap();

        let mut blank = fields();
        blank.user_id = String::new();
        blank.user_name = "Someone Else".to_string();
        assert!(matches!(store.save(&blank), Err(AppError::Validation(_))));

        assert_eq!(store.user_name().unwrap(), "Asha Patra");
    }

    #[test]
    fn test_save_overwrites_previous_session() {
        let store = SessionStore::open_in_memory().unwrap();
        store.save(&fields()).unwrap();

        let mut other = fields();
        other.user_id = "farmer-8".to_string();
        other.location = "Punjab".to_string();
        store.save(&other).unwrap();

        let session = store.session().unwrap().unwrap();
        assert_eq!(session.user_id, "farmer-8");
        assert_eq!(session.location.as_deref(), Some("Punjab"));
    }

    #[test]
    fn test_missing_keys_fall_back() {
        let store = SessionStore::open_in_memory().unwrap();
        store
            .lock()
            .execute(UPSERT, (KEY_USER_ID, "farmer-7", Utc::now()))
            .unwrap();

        let session = store.session().unwrap().unwrap();
        assert_eq!(session.user_name, GUEST_NAME);
        assert!(session.phone_number.is_none());
        assert_eq!(session.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_language_preference() {
        let store = SessionStore::open_in_memory().unwrap();

        assert_eq!(store.save_language("or").unwrap(), "or");
        assert_eq!(store.language().unwrap(), "or");

        assert_eq!(store.save_language("hi-IN").unwrap(), "hi");
        assert_eq!(store.language().unwrap(), "hi");

        assert!(store.save_language("fr").is_err());
        assert!(store.save_language("not a language").is_err());
        assert_eq!(store.language().unwrap(), "hi");
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.db");

        {
            let store = SessionStore::open(&path).unwrap();
            store.save(&fields()).unwrap();
            store.save_language("hi").unwrap();
        }

        let reopened = SessionStore::open(&path).unwrap();
        let session = reopened.session().unwrap().unwrap();
        assert_eq!(session.user_id, "farmer-7");
        assert_eq!(session.language, "hi");
    }
}
