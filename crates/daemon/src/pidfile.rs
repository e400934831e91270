// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory single-instance lock on `<data_dir>/daemon.pid` (spec §6).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

/// Holds the lock for the process lifetime; the file is unlocked and left
/// on disk when dropped (its contents are only meaningful while locked).
pub struct PidFile {
    file: File,
    path: PathBuf,
}

impl PidFile {
    /// Acquires the lock at `<data_dir>/daemon.pid`, failing immediately if
    /// another process already holds it.
    pub fn acquire(data_dir: &Path) -> std::io::Result<Self> {
        let path = data_dir.join("daemon.pid");
        let file = OpenOptions::new().create(true).read(true).write(true).open(&path)?;
        file.try_lock_exclusive()?;
        file.set_len(0)?;
        (&file).write_all(std::process::id().to_string().as_bytes())?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
#[path = "pidfile_tests.rs"]
mod tests;
