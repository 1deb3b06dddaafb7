use super::error::TokenStoreError;
use super::token::AuthToken;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Where the auth token lives between requests.
pub trait TokenStore: Send + Sync {
    /// Name the token is stored under.
    fn name(&self) -> &str;

    /// The stored token, expired or not.
    fn load(&self) -> Result<Option<AuthToken>, TokenStoreError>;

    fn set(&self, token: AuthToken) -> Result<(), TokenStoreError>;

    fn remove(&self) -> Result<(), TokenStoreError>;

    /// The stored token if it has not expired.
    fn get(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        Ok(self.load()?.filter(|token| !token.is_expired()))
    }
}

/// Keeps the token in memory for the life of the process.
#[derive(Debug)]
pub struct MemoryTokenStore {
    name: String,
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: Mutex::new(None),
        }
    }

    pub fn with_token(name: impl Into<String>, token: AuthToken) -> Self {
        Self {
            name: name.into(),
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        let token = self.token.lock().map_err(|_| TokenStoreError::Poisoned)?;
        Ok(token.clone())
    }

    fn set(&self, token: AuthToken) -> Result<(), TokenStoreError> {
        *self.token.lock().map_err(|_| TokenStoreError::Poisoned)? = Some(token);
        Ok(())
    }

    fn remove(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().map_err(|_| TokenStoreError::Poisoned)? = None;
        Ok(())
    }
}

/// Keeps the token in `<dir>/<name>.json`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash never leaves a half-written token behind.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    name: String,
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = dir.as_ref().join(format!("{name}.json"));
        Self { name, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&contents) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                // An unreadable file is no session; sign-in must still work.
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable token file");
                if let Err(e) = fs::remove_file(&self.path) {
                    warn!(error = %e, "Failed to remove token file");
                }
                Ok(None)
            }
        }
    }

    fn set(&self, token: AuthToken) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&token)
            .map_err(|e| TokenStoreError::Encode(e.to_string()))?;
        let temp_path = self.path.with_extension("json.tmp");
        write_private(&temp_path, json.as_bytes())?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), "Token saved");
        Ok(())
    }

    fn remove(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Writes a file only the owner can read. Any stale file at `path` is replaced.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new("todo_admin_token");
        assert!(store.get().unwrap().is_none());

        store.set(AuthToken::issue("abc", false)).unwrap();
        assert_eq!(store.get().unwrap().unwrap().value(), "abc");

        store.remove().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_expired_token_is_absent() {
        let expired = AuthToken::new("old", Utc::now() - Duration::minutes(1));
        let store = MemoryTokenStore::with_token("t", expired);

        assert!(store.load().unwrap().is_some());
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path(), "todo_admin_token");
        store.set(AuthToken::issue("abc", true)).unwrap();

        assert!(dir.path().join("todo_admin_token.json").exists());
        assert!(!dir.path().join("todo_admin_token.json.tmp").exists());

        let reopened = FileTokenStore::new(dir.path(), "todo_admin_token");
        assert_eq!(reopened.get().unwrap().unwrap().value(), "abc");
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path(), "token");
        std::fs::write(dir.path().join("token.json.tmp"), "stale").unwrap();

        store.set(AuthToken::issue("abc", false)).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_missing_and_remove_are_quiet() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested"), "token");

        assert!(store.get().unwrap().is_none());
        store.remove().unwrap();
    }

    #[test]
    fn test_corrupt_file_counts_as_no_session() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path(), "token");
        std::fs::write(store.path(), "not json").unwrap();

        assert!(store.get().unwrap().is_none());
        assert!(!store.path().exists());

        store.set(AuthToken::issue("fresh", false)).unwrap();
        assert_eq!(store.get().unwrap().unwrap().value(), "fresh");
    }
}
