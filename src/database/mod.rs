pub mod schema;

use crate::error::AppError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Default location of the session database.
///
/// On Android this is the app's private files directory; `/data/local/tmp`
/// is only used when the Java context cannot be reached.
pub fn default_database_path() -> PathBuf {
    #[cfg(target_os = "android")]
    {
        android_files_dir()
            .unwrap_or_else(|e| {
                log::warn!("Could not resolve app files directory: {}", e);
                PathBuf::from("/data/local/tmp/cattle-registry")
            })
            .join("cattle_registry.db")
    }

    #[cfg(not(target_os = "android"))]
    {
        PathBuf::from("./data/cattle_registry.db")
    }
}

/// `Context.getFilesDir()` of the running app, via JNI
#[cfg(target_os = "android")]
fn android_files_dir() -> Result<PathBuf, AppError> {
    use jni::objects::{JObject, JString};
    use jni::JavaVM;

    let context = ndk_context::android_context();
    let vm = unsafe { JavaVM::from_raw(context.vm() as *mut jni::sys::JavaVM) }
        .map_err(|e| AppError::Other(format!("JavaVM unavailable: {}", e)))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| AppError::Other(format!("Could not attach thread: {}", e)))?;
    let activity = unsafe { JObject::from_raw(context.context() as jni::sys::jobject) };

    let files_dir = env
        .call_method(&activity, "getFilesDir", "()Ljava/io/File;", &[])
        .and_then(|dir| dir.l())
        .map_err(|e| AppError::Other(format!("getFilesDir failed: {}", e)))?;
    let path = env
        .call_method(&files_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
        .and_then(|path| path.l())
        .map_err(|e| AppError::Other(format!("getAbsolutePath failed: {}", e)))?;
    let path: String = env
        .get_string(&JString::from(path))
        .map_err(|e| AppError::Other(format!("Could not read path: {}", e)))?
        .into();

    Ok(PathBuf::from(path))
}

/// Opens (and if needed creates) the database with its full schema
pub fn open_database(path: &Path) -> Result<Connection, AppError> {
    // Make sure the directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    schema::init_schema(&conn)?;

    log::debug!("Opened database at {}", path.display());
    Ok(conn)
}

/// In-memory database, gone when the connection drops
pub fn open_in_memory() -> Result<Connection, AppError> {
    let conn = Connection::open_in_memory()?;
    schema::init_schema(&conn)?;
    Ok(conn)
}
