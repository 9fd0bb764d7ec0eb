//! Durable storage of the viewer's session across restarts.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::core::Session;
use crate::errors::{AuthError, Result};

/// Where a [`Session`] survives restarts.
///
/// Browser renderers back this with local storage; native ones with a file.
/// Implementations are synchronous: a session is a few hundred bytes.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// The persisted session, if any.
    fn load(&self) -> Result<Option<Session>>;
    /// Persist `session`, replacing any previous one.
    fn save(&self, session: &Session) -> Result<()>;
    /// Forget the persisted session. Clearing an empty store succeeds.
    fn clear(&self) -> Result<()>;
}

/// Session kept as JSON in a file.
///
/// The file holds a **bearer secret**. On Unix, permissions are set to 600.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at `path`. Parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let session = serde_json::from_str(&raw).map_err(|e| {
            AuthError::Store(format!(
                "failed to parse session file {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(session)
            .map_err(|e| AuthError::Store(format!("failed to encode session: {e}")))?;
        std::fs::write(&self.path, raw)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Session kept in memory only. Clones share the slot.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStore {
    /// A store already holding `session`, as if persisted by an earlier run.
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
