//! Persistence for the identity service's access token.
//!
//! The HTTP adapter keeps the bearer token here between calls so a restarted
//! dashboard can resume the previous session.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use zeroize::Zeroizing;

/// Failure reading or writing a persisted token.
#[derive(Debug, Error)]
#[error("session token file {path} unavailable: {source}")]
pub struct TokenStoreError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl TokenStoreError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    /// File the failing operation targeted.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Where the current access token lives between requests.
pub trait SessionTokenStore: Send + Sync {
    /// Stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be read.
    fn load(&self) -> Result<Option<Zeroizing<String>>, TokenStoreError>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Forget the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be modified.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Token store that forgets everything when the process exits.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Zeroizing<String>>>,
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTokenStore").finish_non_exhaustive()
    }
}

impl SessionTokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Zeroizing<String>>, TokenStoreError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Zeroizing::new(token.to_owned()));
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

/// Token store backed by a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token at `path`. Parent directories are created on save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn file_name(&self) -> Result<&Path, TokenStoreError> {
        self.path.file_name().map(Path::new).ok_or_else(|| {
            TokenStoreError::io(
                &self.path,
                io::Error::new(io::ErrorKind::InvalidInput, "token path has no file name"),
            )
        })
    }

    fn open_parent(&self) -> Result<Option<Dir>, TokenStoreError> {
        match Dir::open_ambient_dir(self.parent(), ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(TokenStoreError::io(self.parent(), error)),
        }
    }
}

impl SessionTokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Zeroizing<String>>, TokenStoreError> {
        let Some(dir) = self.open_parent()? else {
            return Ok(None);
        };
        match dir.read_to_string(self.file_name()?) {
            Ok(contents) => {
                let raw = Zeroizing::new(contents);
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| Zeroizing::new(token.to_owned())))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(TokenStoreError::io(&self.path, error)),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let parent = self.parent();
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|error| TokenStoreError::io(parent, error))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|error| TokenStoreError::io(parent, error))?;
        dir.write(self.file_name()?, token.as_bytes())
            .map_err(|error| TokenStoreError::io(&self.path, error))
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let Some(dir) = self.open_parent()? else {
            return Ok(());
        };
        match dir.remove_file(self.file_name()?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(TokenStoreError::io(&self.path, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for token persistence.

    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        tempfile::tempdir().expect("temporary directory")
    }

    fn token(store: &dyn SessionTokenStore) -> Option<String> {
        store
            .load()
            .expect("load succeeds")
            .map(|token| token.as_str().to_owned())
    }

    #[rstest]
    fn memory_store_round_trips_and_clears() {
        let store = MemoryTokenStore::default();
        assert_eq!(token(&store), None);
        store.save("abc").expect("save");
        assert_eq!(token(&store).as_deref(), Some("abc"));
        store.clear().expect("clear");
        assert_eq!(token(&store), None);
    }

    #[rstest]
    fn file_store_creates_missing_directories(temp_dir: TempDir) {
        let store = FileTokenStore::new(temp_dir.path().join("state/session/token"));
        assert_eq!(token(&store), None, "missing directory reads as empty");

        store.save("abc.def").expect("save");
        assert_eq!(token(&store).as_deref(), Some("abc.def"));

        let reopened = FileTokenStore::new(store.path());
        assert_eq!(token(&reopened).as_deref(), Some("abc.def"));
    }

    #[rstest]
    fn file_store_clear_is_idempotent(temp_dir: TempDir) {
        let store = FileTokenStore::new(temp_dir.path().join("token"));
        store.clear().expect("clearing an absent file succeeds");
        store.save("abc").expect("save");
        store.clear().expect("clear");
        store.clear().expect("second clear");
        assert_eq!(token(&store), None);
    }

    #[rstest]
    fn blank_file_reads_as_empty(temp_dir: TempDir) {
        let store = FileTokenStore::new(temp_dir.path().join("token"));
        store.save("  \n").expect("save");
        assert_eq!(token(&store), None);
    }
}
