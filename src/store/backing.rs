// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

//! Durable backing adapters for the single storage slot.
//!
//! The store only ever needs `load`/`save` of one string value. Both are
//! infallible at the trait boundary: an adapter that cannot reach its medium
//! behaves as always-absent/no-op and the store keeps running in memory.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

pub trait BackingStore: Send + Sync {
    /// The current persisted text, or `None` when nothing has been stored
    /// (or the medium is unavailable).
    fn load(&self) -> Option<String>;

    /// Replaces the persisted text. Best-effort; failures are not surfaced.
    fn save(&self, text: &str);
}

impl fmt::Debug for dyn BackingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BackingStore")
    }
}

#[derive(Debug)]
pub enum BackingError {
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for BackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for BackingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable
    /// storage where possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// One JSON file standing in for the browser's key-value slot.
#[derive(Debug, Clone)]
pub struct FileBacking {
    path: PathBuf,
    durability: WriteDurability,
}

impl FileBacking {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fallible read, for callers that want to distinguish "absent" from
    /// "broken medium". The trait's `load` collapses both to `None`.
    pub fn read(&self) -> Result<Option<String>, BackingError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BackingError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Fallible atomic write: temp file in the same directory, then rename
    /// into place.
    pub fn write(&self, text: &str) -> Result<(), BackingError> {
        let Some(parent) = self.path.parent() else {
            return Err(BackingError::Io {
                path: self.path.clone(),
                source: io::Error::other("path has no parent"),
            });
        };
        let Some(file_name) = self.path.file_name() else {
            return Err(BackingError::Io {
                path: self.path.clone(),
                source: io::Error::other("path has no file name"),
            });
        };

        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| BackingError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let tmp_path = parent.join(format!(
            ".piste.tmp.{}.{}",
            file_name.to_string_lossy(),
            nanos
        ));

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .map_err(|source| BackingError::Io {
                path: tmp_path.clone(),
                source,
            })?;

        file.write_all(text.as_bytes())
            .map_err(|source| BackingError::Io {
                path: tmp_path.clone(),
                source,
            })?;

        if self.durability == WriteDurability::Durable {
            file.sync_all().map_err(|source| BackingError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        }
        drop(file);

        if let Err(source) = rename_overwrite(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(BackingError::Io {
                path: self.path.clone(),
                source,
            });
        }

        if self.durability == WriteDurability::Durable {
            #[cfg(unix)]
            {
                let dir = fs::File::open(parent).map_err(|source| BackingError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
                dir.sync_all().map_err(|source| BackingError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        Ok(())
    }
}

impl BackingStore for FileBacking {
    fn load(&self) -> Option<String> {
        self.read().unwrap_or(None)
    }

    fn save(&self, text: &str) {
        let _ = self.write(text);
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

/// Shared in-memory slot. Clones share the same cell, so a test can hand one
/// clone to the store and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryBacking {
    cell: Arc<Mutex<Option<String>>>,
}

impl MemoryBacking {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently persisted text, if any.
    pub fn persisted(&self) -> Option<String> {
        self.cell.lock().expect("memory backing lock poisoned").clone()
    }
}

impl BackingStore for MemoryBacking {
    fn load(&self) -> Option<String> {
        self.persisted()
    }

    fn save(&self, text: &str) {
        *self.cell.lock().expect("memory backing lock poisoned") = Some(text.to_owned());
    }
}

/// The "no storage mechanism available" environment: loads are always absent,
/// saves are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBacking;

impl BackingStore for NoopBacking {
    fn load(&self) -> Option<String> {
        None
    }

    fn save(&self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{BackingStore, FileBacking, MemoryBacking, NoopBacking};

    static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    struct TempDir {
        path: std::path::PathBuf,
    }

    impl TempDir {
        fn new(prefix: &str) -> Self {
            let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
            let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
            let mut path = env::temp_dir();
            path.push(format!("piste-{prefix}-{}-{nanos}-{counter}", std::process::id()));
            std::fs::create_dir_all(&path).unwrap();
            Self { path }
        }

        fn path(&self) -> &std::path::Path {
            &self.path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn file_backing_round_trips_and_overwrites() {
        let tmp = TempDir::new("backing");
        let backing = FileBacking::new(tmp.path().join("slot.json"));

        assert_eq!(backing.load(), None);
        backing.save("first");
        assert_eq!(backing.load(), Some("first".to_owned()));
        backing.save("second");
        assert_eq!(backing.load(), Some("second".to_owned()));
    }

    #[test]
    fn file_backing_leaves_no_temp_files_behind() {
        let tmp = TempDir::new("backing-tmp");
        let backing = FileBacking::new(tmp.path().join("slot.json"));
        backing.save("payload");

        let names: Vec<String> = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["slot.json"]);
    }

    #[test]
    fn memory_backing_clones_share_the_slot() {
        let backing = MemoryBacking::new();
        let observer = backing.clone();
        backing.save("shared");
        assert_eq!(observer.persisted(), Some("shared".to_owned()));
    }

    #[test]
    fn noop_backing_discards_everything() {
        let backing = NoopBacking;
        backing.save("gone");
        assert_eq!(backing.load(), None);
    }
}
