//! Durable session storage
//!
//! The access token, its expiry and the cached user are kept as one record
//! and always written together, so a crash between fields cannot leave a
//! token without its expiry.

use crate::config::AuthConfig;
use crate::error::{Result as AuthResult, StorageError};
use raiser_http::PublicRaiserClient;
use raiser_http::client::auth::REFRESH_PATH;
use raiser_http::types::User;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Client-held authentication state
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Unix seconds, persisted as a decimal string
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub access_token_expiry: Option<i64>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    pub const fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.access_token_expiry.is_none() && self.user.is_none()
    }

    /// Non-empty access token, if any
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Durable key-value home of the session record
///
/// Writes are last-write-wins; there is no compare-and-swap.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, StorageError>;
    fn save(&self, session: &Session) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Process-local store, used by tests and short-lived tools
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// JSON file store replaced atomically on every write
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the record as `<dir>/raiser_session.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(
            dir.as_ref()
                .join(format!("{}.json", AuthConfig::SESSION_KEY)),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        write_private(&self.path, &self.temp_path(), &serde_json::to_vec_pretty(session)?)?;
        debug!(path = %self.path.display(), "Session record written");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if remove_if_present(&self.path)? {
            debug!(path = %self.path.display(), "Session record removed");
        }
        Ok(())
    }
}

/// Replace `path` atomically with an owner-only file
fn write_private(path: &Path, temp_path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(temp_path, contents)?;

    // Owner read/write only; both files hold credentials
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(temp_path, path)?;
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<bool, StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Refresh cookie carried over between processes
///
/// The client's cookie jar lives in memory. A long-lived process keeps it
/// for free; a command-line tool saves it after each run and seeds the next
/// run's jar from it, so a stored access token can still be refreshed.
#[derive(Debug, Clone)]
pub struct RefreshCookieFile {
    path: PathBuf,
}

impl RefreshCookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the cookie as `<dir>/raiser_session.cookie`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(
            dir.as_ref()
                .join(format!("{}.cookie", AuthConfig::SESSION_KEY)),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed `client`'s jar from the saved cookie; `false` when none is saved
    pub fn restore(&self, client: &PublicRaiserClient) -> AuthResult<bool> {
        let header = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(StorageError::from(err).into()),
        };

        let header = header.trim();
        if header.is_empty() {
            return Ok(false);
        }
        client.restore_cookies(REFRESH_PATH, header)?;
        debug!(path = %self.path.display(), "Refresh cookie restored");
        Ok(true)
    }

    /// Save the cookie `client` would send to the refresh endpoint
    ///
    /// Removes the file once the jar holds no such cookie, e.g. after the
    /// server expired it on logout.
    pub fn persist(&self, client: &PublicRaiserClient) -> AuthResult<()> {
        match client.cookie_header(REFRESH_PATH)? {
            Some(header) => {
                write_private(
                    &self.path,
                    &self.path.with_extension("cookie.tmp"),
                    header.as_bytes(),
                )?;
                debug!(path = %self.path.display(), "Refresh cookie saved");
            }
            None => {
                if remove_if_present(&self.path)? {
                    debug!(path = %self.path.display(), "Refresh cookie removed");
                }
            }
        }
        Ok(())
    }
}
