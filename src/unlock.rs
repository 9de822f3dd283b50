use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "unlock-snake";
const UNLOCK_FILE_NAME: &str = "unlock.json";

/// Failure reading or writing the persisted unlock flag.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unlock file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("unlock file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable boolean "contact unlocked" flag.
pub trait UnlockStorage {
    fn is_unlocked(&self) -> Result<bool, StorageError>;
    fn set_unlocked(&mut self, unlocked: bool) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct UnlockFile {
    contact_unlocked: bool,
}

/// Returns the platform-correct unlock file path.
#[must_use]
pub fn unlock_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(UNLOCK_FILE_NAME);
    base
}

/// Unlock flag stored as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileUnlockStorage {
    path: PathBuf,
}

impl FileUnlockStorage {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage at the default per-user data location.
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(unlock_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UnlockStorage for FileUnlockStorage {
    /// A missing file means the contact section was never unlocked.
    fn is_unlocked(&self) -> Result<bool, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let file: UnlockFile = serde_json::from_str(&raw)?;
        Ok(file.contact_unlocked)
    }

    fn set_unlocked(&mut self, unlocked: bool) -> Result<(), StorageError> {
        if !unlocked {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = UnlockFile {
            contact_unlocked: true,
        };
        fs::write(&self.path, serde_json::to_string_pretty(&payload)?)?;
        Ok(())
    }
}

/// In-process flag, for tests and `--no-persist` runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryUnlockStorage {
    unlocked: bool,
}

impl UnlockStorage for MemoryUnlockStorage {
    fn is_unlocked(&self) -> Result<bool, StorageError> {
        Ok(self.unlocked)
    }

    fn set_unlocked(&mut self, unlocked: bool) -> Result<(), StorageError> {
        self.unlocked = unlocked;
        Ok(())
    }
}

/// Broadcast to listeners when the contact section becomes available.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UnlockEvent {
    /// Unlocked by winning in this session.
    Unlocked,
    /// Flag already present at startup.
    Restored,
}

type Listener = Box<dyn FnMut(UnlockEvent)>;

/// Persists the unlock flag and tells independent UI regions about it.
pub struct UnlockNotifier<S> {
    storage: S,
    listeners: Vec<Listener>,
    unlocked: bool,
}

impl<S: UnlockStorage> UnlockNotifier<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            listeners: Vec::new(),
            unlocked: false,
        }
    }

    /// Registers a listener called on every unlock notification.
    pub fn subscribe(&mut self, listener: impl FnMut(UnlockEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Reads the persisted flag and replays it to listeners when set.
    ///
    /// An unreadable flag is logged and treated as locked.
    pub fn restore(&mut self) -> bool {
        match self.storage.is_unlocked() {
            Ok(true) => {
                self.unlocked = true;
                info!("contact section already unlocked");
                self.broadcast(UnlockEvent::Restored);
            }
            Ok(false) => {}
            Err(error) => warn!("could not read unlock flag: {error}"),
        }

        self.unlocked
    }

    /// Persists the flag and notifies listeners after a won session.
    ///
    /// A storage failure is logged; listeners are notified either way so
    /// the current session still sees the unlock.
    pub fn notify_win(&mut self) {
        if let Err(error) = self.storage.set_unlocked(true) {
            warn!("could not persist unlock flag: {error}");
        }

        self.unlocked = true;
        info!("contact section unlocked");
        self.broadcast(UnlockEvent::Unlocked);
    }

    /// Removes the persisted flag.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.set_unlocked(false)?;
        self.unlocked = false;
        Ok(())
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn broadcast(&mut self, event: UnlockEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for UnlockNotifier<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlockNotifier")
            .field("storage", &self.storage)
            .field("listeners", &self.listeners.len())
            .field("unlocked", &self.unlocked)
            .finish()
    }
}
