//! Credential persistence on the local filesystem.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use econ_admin_core::error::StorageError;
use econ_admin_core::{AccessToken, CredentialStore, RefreshToken, Result, StoredCredentials};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Name of the credentials document inside the store directory.
pub const CREDENTIALS_FILE: &str = "credentials.json";

const LOCK_FILE: &str = "credentials.lock";

fn io(err: std::io::Error) -> econ_admin_core::Error {
    StorageError::Io(err).into()
}

/// On-disk shape. Key names match the browser storage keys of the web client.
#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    auth_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    saved_at: DateTime<Utc>,
}

/// Stores the token pair as a JSON document in a directory.
///
/// Writes go to a temporary file that is renamed into place, under an
/// exclusive lock, so readers never see a half-written pair. On Unix the
/// document is readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    /// Create a store rooted at `dir`. Nothing is touched until first use.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the credentials document.
    pub fn path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    fn open_lock(&self) -> Result<File> {
        fs::create_dir_all(&self.dir).map_err(io)?;
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(io)
    }

    fn write_document(&self, document: &StoredDocument) -> Result<()> {
        let path = self.path();
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(document).map_err(StorageError::Format)?;

        let mut file = File::create(&tmp).map_err(io)?;
        #[cfg(unix)]
        {
            let mut perms = file.metadata().map_err(io)?.permissions();
            perms.set_mode(0o600);
            file.set_permissions(perms).map_err(io)?;
        }
        file.write_all(json.as_bytes()).map_err(io)?;
        file.sync_data().map_err(io)?;

        fs::rename(&tmp, &path).map_err(io)
    }
}

impl CredentialStore for FileCredentialStore {
    #[instrument(skip(self), fields(path = %self.path().display()))]
    fn load(&self) -> Result<Option<StoredCredentials>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let lock_file = self.open_lock()?;
        lock_file.lock_shared().map_err(io)?;
        let content = fs::read_to_string(&path);
        lock_file.unlock().map_err(io)?;

        let content = match content {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io(e)),
        };

        let document: StoredDocument =
            serde_json::from_str(&content).map_err(StorageError::Format)?;
        debug!(saved_at = %document.saved_at, "Loaded stored credentials");

        Ok(Some(StoredCredentials {
            access_token: AccessToken::new(document.auth_token),
            refresh_token: document.refresh_token.map(RefreshToken::new),
        }))
    }

    #[instrument(skip(self, credentials), fields(path = %self.path().display()))]
    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        let document = StoredDocument {
            auth_token: credentials.access_token.as_str().to_string(),
            refresh_token: credentials
                .refresh_token
                .as_ref()
                .map(|t| t.as_str().to_string()),
            saved_at: Utc::now(),
        };

        let lock_file = self.open_lock()?;
        lock_file.lock_exclusive().map_err(io)?;
        let written = self.write_document(&document);
        lock_file.unlock().map_err(io)?;
        written?;

        debug!("Saved credentials");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path().display()))]
    fn clear(&self) -> Result<()> {
        let path = self.path();
        if !path.exists() {
            return Ok(());
        }

        let lock_file = self.open_lock()?;
        lock_file.lock_exclusive().map_err(io)?;
        let removed = match fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(io(e)),
            _ => Ok(()),
        };
        lock_file.unlock().map_err(io)?;
        removed?;

        debug!("Cleared credentials");
        Ok(())
    }
}
