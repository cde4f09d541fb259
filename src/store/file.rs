//! File-backed database
//!
//! A single database file replaced atomically on every commit.
//!
//! ## Files
//! ```text
//!   counts.db        committed image (see format.rs)
//!   counts.db.tmp    image being written by a commit, renamed over counts.db
//!   counts.db.lock   locked (fs2) by the writer for the lifetime of the handle
//! ```

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config::Config;
use crate::error::{CountDbError, Result};

use super::{format, Namespaces, Store};

/// How a database file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Existing file, reads only, no lock taken
    ReadOnly,

    /// Exclusive writer starting from an empty database; the first commit
    /// replaces whatever the file held before
    Create,

    /// Exclusive writer starting from the current contents (if any)
    ReadWrite,
}

impl OpenMode {
    fn is_writable(self) -> bool {
        !matches!(self, OpenMode::ReadOnly)
    }
}

/// A durable database stored in one file
pub struct Database {
    /// Path of the committed image
    path: PathBuf,

    /// Mode the handle was opened with
    mode: OpenMode,

    /// Last committed contents (loaded at open, replaced on commit)
    committed: Namespaces,

    /// Writer lock, released on close or drop
    lock: Option<LockFile>,

    /// fsync image and directory on commit
    sync_on_commit: bool,
}

impl Database {
    /// Open a database with default settings
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        Self::open_with(path, mode, &Config::default())
    }

    /// Open a database
    ///
    /// Steps:
    /// 1. Writers take the lock file (fails with `Locked` if already held)
    /// 2. `ReadOnly` and `ReadWrite` load and verify the existing image
    /// 3. `Create` starts empty without reading the old file
    pub fn open_with(path: impl AsRef<Path>, mode: OpenMode, config: &Config) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let lock = if mode.is_writable() {
            Some(LockFile::acquire(&path)?)
        } else {
            None
        };

        let committed = match mode {
            OpenMode::Create => Namespaces::new(),
            OpenMode::ReadOnly => Self::load(&path)?,
            OpenMode::ReadWrite => {
                if path.exists() {
                    Self::load(&path)?
                } else {
                    Namespaces::new()
                }
            }
        };

        tracing::debug!(
            path = %path.display(),
            ?mode,
            namespaces = committed.len(),
            "database opened"
        );

        Ok(Self {
            path,
            mode,
            committed,
            lock,
            sync_on_commit: config.sync_on_commit,
        })
    }

    /// Close the handle, releasing the writer lock
    pub fn close(mut self) -> Result<()> {
        if let Some(lock) = self.lock.take() {
            lock.release()?;
        }
        tracing::debug!(path = %self.path.display(), "database closed");
        Ok(())
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode the handle was opened with
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Read and verify the image at `path`
    fn load(path: &Path) -> Result<Namespaces> {
        let image = fs::read(path).map_err(|e| CountDbError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        format::decode(&image).map_err(|reason| CountDbError::Corrupt {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Write `image` to the temp file and rename it over the database file
    fn write_image(&self, image: &[u8]) -> io::Result<()> {
        let tmp = sibling(&self.path, ".tmp");

        let result = (|| -> io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(image)?;
            if self.sync_on_commit {
                file.sync_all()?;
            }
            drop(file);

            fs::rename(&tmp, &self.path)?;

            if self.sync_on_commit {
                sync_parent_dir(&self.path)?;
            }
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

impl Store for Database {
    fn committed(&self) -> &Namespaces {
        &self.committed
    }

    fn persist(&mut self, namespaces: Namespaces) -> Result<()> {
        if !self.mode.is_writable() {
            return Err(CountDbError::ReadOnly);
        }

        let image = format::encode(&namespaces)?;
        self.write_image(&image).map_err(|e| {
            CountDbError::Transaction(format!("commit to {} failed: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = image.len(),
            "database image written"
        );

        self.committed = namespaces;
        Ok(())
    }

    fn is_writable(&self) -> bool {
        self.mode.is_writable()
    }
}

// =============================================================================
// Writer Lock
// =============================================================================

/// Exclusive writer lock: an OS file lock on `<db>.lock`
///
/// The lock belongs to the open file handle, so the OS drops it when the
/// holder exits for any reason. The lock file itself is left in place.
struct LockFile {
    file: File,
}

impl LockFile {
    fn acquire(db_path: &Path) -> Result<Self> {
        let path = sibling(db_path, ".lock");

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| CountDbError::Open {
                path: db_path.to_path_buf(),
                source: e,
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { file }),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(CountDbError::Locked {
                    path: db_path.to_path_buf(),
                })
            }
            Err(e) => Err(CountDbError::Open {
                path: db_path.to_path_buf(),
                source: e,
            }),
        }
    }

    fn release(self) -> Result<()> {
        FileExt::unlock(&self.file)?;
        Ok(())
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

/// "counts.db" + ".lock" → "counts.db.lock"
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
