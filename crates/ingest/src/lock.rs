//! Advisory file lock that serializes runs on one host.
//!
//! Two overlapping runs against the same collection can interleave their
//! delete/insert steps. Holding this lock for the whole run prevents that
//! when cron fires a new run before the previous one finished.
//!
//! The lock lives on the open file handle, not on the file's existence: the
//! kernel drops it when the holder exits, however it exits. A lock file left
//! behind by a killed run is simply re-locked by the next one.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Seek, Write};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use roster_core::RosterError;
use tracing::debug;

/// Held for the duration of a run; released when dropped.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    file: File,
}

impl RunLock {
    /// Lock `path` exclusively, creating it if needed.
    ///
    /// Fails with [`RosterError::Locked`] while another live process holds it.
    /// The holder's pid is written into the file for operators.
    pub fn acquire(path: &Path) -> Result<Self, RosterError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        if let Err(e) = file.try_lock_exclusive() {
            return Err(if e.kind() == ErrorKind::WouldBlock {
                RosterError::Locked(path.display().to_string())
            } else {
                RosterError::Io(e)
            });
        }

        file.set_len(0)?;
        file.rewind()?;
        writeln!(file, "{}", std::process::id())?;
        debug!(path = %path.display(), "run lock acquired");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        // Closing the handle would release it too; unlock explicitly so the
        // release is logged at the point it happens.
        if FileExt::unlock(&self.file).is_ok() {
            debug!(path = %self.path.display(), "run lock released");
        }
    }
}
