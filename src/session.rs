//! Session credential and its storage.
//!
//! The bearer token is a signed, self-describing credential whose payload
//! carries an `exp` claim. Expiry is checked locally and optimistically; the
//! directory service remains the authority on every request.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Fixed storage key for the persisted token.
pub const TOKEN_KEY: &str = "token";

/// Lifetime of the mirrored session cookie, in seconds.
pub const COOKIE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

#[derive(Deserialize)]
struct Claims {
    exp: i64,
}

impl Token {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expiry embedded in the token payload, if it can be decoded.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.0.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: Claims = serde_json::from_slice(&bytes).ok()?;
        DateTime::from_timestamp(claims.exp, 0)
    }

    /// A token is valid while its expiry lies strictly in the future.
    /// Undecodable tokens are never valid.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp > now)
    }

    /// `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Render the cookie that mirrors the session for server-side route checks.
pub fn session_cookie(token: &Token) -> String {
    format!(
        "{TOKEN_KEY}={}; path=/; max-age={COOKIE_MAX_AGE_SECS}",
        token.as_str()
    )
}

/// Cookie that expires the mirrored session cookie.
pub fn expired_session_cookie() -> String {
    format!("{TOKEN_KEY}=; path=/; max-age=0")
}

/// Storage for the current session token.
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<Token>;
    fn set_token(&self, token: Token);
    fn clear(&self);
}

/// Whether the store holds a token that has not yet expired.
pub fn is_authenticated(store: &dyn SessionStore, now: DateTime<Utc>) -> bool {
    store.token().is_some_and(|t| t.is_valid_at(now))
}

/// In-process session store. Nothing survives a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<Token>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<Token> {
        self.token.lock().ok()?.clone()
    }

    fn set_token(&self, token: Token) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token);
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
    }
}

/// Session store persisted as a single file named [`TOKEN_KEY`].
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store the token inside `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(TOKEN_KEY),
        }
    }

    /// Per-user data directory for this application.
    pub fn default_dir() -> Result<PathBuf> {
        directories::ProjectDirs::from("", "", "dept-console")
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .ok_or_else(|| AppError::session("No home directory available for session storage"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = create_owner_only(&self.path)?;
        file.write_all(token.as_str().as_bytes())?;
        Ok(())
    }
}

/// Token files are readable by their owner only.
#[cfg(unix)]
fn create_owner_only(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies to newly created files.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_owner_only(path: &Path) -> std::io::Result<File> {
    File::create(path)
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<Token> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let token = Token::new(raw);
        if token.as_str().is_empty() { None } else { Some(token) }
    }

    fn set_token(&self, token: Token) {
        if let Err(e) = self.write(&token) {
            tracing::error!("Failed to persist session token to {:?}: {}", self.path, e);
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!("Failed to clear session token at {:?}: {}", self.path, e),
        }
    }
}

/// Shared handle passed to the directory client and the UI.
pub type SharedSession = Arc<dyn SessionStore>;
