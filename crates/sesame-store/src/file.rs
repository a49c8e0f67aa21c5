//! File-backed credential store.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use sesame_core::error::StorageError;
use sesame_core::{CredentialStore, Result, User};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk session document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: User,
    pub saved_at: DateTime<Utc>,
}

/// Persists the signed-in user as `session.json` in a directory.
///
/// Writes go to a temporary file that is renamed into place while an
/// exclusive lock on `session.lock` is held, so a reader never sees a
/// half-written document.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

fn io(err: std::io::Error) -> sesame_core::Error {
    StorageError::Io(err).into()
}

impl FileCredentialStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the session document.
    pub fn path(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join("session.lock")
    }

    /// Run `f` while holding the store's exclusive lock.
    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        fs::create_dir_all(&self.dir).map_err(io)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(io)?;

        lock_file.lock_exclusive().map_err(io)?;
        let result = f();
        if let Err(e) = lock_file.unlock() {
            warn!(error = %e, "Failed to release session lock");
        }
        result
    }

    /// Read the full stored document, including when it was written.
    pub fn load_stored(&self) -> Result<Option<StoredSession>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(io)?;
        let stored: StoredSession =
            serde_json::from_str(&json).map_err(StorageError::Serde)?;
        Ok(Some(stored))
    }

    fn write(&self, user: &User) -> Result<()> {
        let stored = StoredSession {
            user: user.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(StorageError::Serde)?;

        let path = self.path();
        let tmp = self.dir.join(format!(".session-{}.tmp", Uuid::new_v4()));

        let mut file = fs::File::create(&tmp).map_err(io)?;

        // Restrict permissions before any secret is written (Unix only)
        #[cfg(unix)]
        {
            let mut perms = file.metadata().map_err(io)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp, perms).map_err(io)?;
        }

        file.write_all(json.as_bytes()).map_err(io)?;
        file.sync_data().map_err(io)?;
        drop(file);

        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io(e));
        }

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn load(&self) -> Result<Option<User>> {
        let stored = self.with_lock(|| self.load_stored())?;
        debug!(found = stored.is_some(), "Loaded session");
        Ok(stored.map(|s| s.user))
    }

    #[instrument(skip(self, user), fields(dir = %self.dir.display(), user_id = %user.id))]
    async fn save(&self, user: &User) -> Result<()> {
        self.with_lock(|| self.write(user))?;
        debug!("Saved session");
        Ok(())
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn clear(&self) -> Result<()> {
        self.with_lock(|| {
            let path = self.path();
            if path.exists() {
                fs::remove_file(&path).map_err(io)?;
            }
            Ok(())
        })?;
        debug!("Cleared session");
        Ok(())
    }
}
