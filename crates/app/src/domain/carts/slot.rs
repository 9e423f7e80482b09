//! Durable key-value slot holding the serialized cart.

use std::{
    fmt::Debug,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use tempfile::NamedTempFile;

use crate::domain::carts::errors::SlotError;

/// Slot name used when none is configured.
pub const DEFAULT_SLOT_NAME: &str = "fast_dantic_cart";

/// A single named slot of persisted cart state.
///
/// Reads and writes always move the whole snapshot. There is no versioning:
/// callers treat anything they cannot parse as an empty cart.
pub trait CartSlot: Debug + Send + Sync {
    /// Name of the slot, for diagnostics.
    fn name(&self) -> &str;

    /// Read the raw snapshot, or `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be read.
    fn read(&self) -> Result<Option<String>, SlotError>;

    /// Replace the raw snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be written.
    fn write(&self, snapshot: &str) -> Result<(), SlotError>;
}

/// Slot stored as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct FileCartSlot {
    name: String,
    path: PathBuf,
}

impl FileCartSlot {
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: dir.as_ref().join(format!("{name}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartSlot for FileCartSlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<Option<String>, SlotError> {
        match fs::read_to_string(&self.path) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, snapshot: &str) -> Result<(), SlotError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(dir)?;

        // Readers must only ever see a complete snapshot, and concurrent
        // writers each stage into their own file.
        let mut staging = NamedTempFile::new_in(dir)?;

        staging.write_all(snapshot.as_bytes())?;
        staging.persist(&self.path).map_err(|error| error.error)?;

        Ok(())
    }
}

/// In-process slot. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct MemoryCartSlot {
    name: String,
    snapshot: Arc<Mutex<Option<String>>>,
}

impl MemoryCartSlot {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            snapshot: Arc::default(),
        }
    }
}

impl Default for MemoryCartSlot {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_NAME)
    }
}

impl CartSlot for MemoryCartSlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<Option<String>, SlotError> {
        Ok(self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn write(&self, snapshot: &str) -> Result<(), SlotError> {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.to_string());

        Ok(())
    }
}
