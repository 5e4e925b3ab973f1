//! Lifecycle of the on-disk rotation script.
//!
//! The script lives in the system temp directory under a unique `scatter_`
//! name, so concurrent plots never share one. It is removed explicitly once
//! the engine session is closed. On some platforms the engine can hold the
//! file for a moment after exiting, so removal is retried while the OS reports
//! the file as in use, up to the budget in [`RetryPolicy`].

use crate::errors::{FileAction, PlotError};
use crate::log::{debug, trace, warn};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

const CONTEXT: &str = "scatter::rotation_script";

/// Prefix of every rotation script file name.
pub const FILE_PREFIX: &str = "scatter_";

/// How hard to try removing a file that is still held by another process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total removal attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5000,
            delay: Duration::from_millis(1),
        }
    }
}

/// Whether an I/O error means "another process still has this file open".
pub fn is_in_use(err: &io::Error) -> bool {
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    #[cfg(windows)]
    if matches!(err.raw_os_error(), Some(32) | Some(33)) {
        return true;
    }
    err.kind() == io::ErrorKind::ResourceBusy
}

/// Remove `path` with `remove`, retrying while the file is in use.
///
/// Any other error ends the loop immediately. Running out of attempts yields
/// [`PlotError::CleanupExhausted`].
pub fn remove_with_retry<F>(path: &Utf8Path, policy: &RetryPolicy, mut remove: F) -> Result<(), PlotError>
where
    F: FnMut(&Utf8Path) -> io::Result<()>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match remove(path) {
            Ok(()) => return Ok(()),
            Err(e) if is_in_use(&e) => {
                if attempt >= max_attempts {
                    warn!(%path, attempts = attempt, "rotation script still in use, giving up");
                    return Err(PlotError::CleanupExhausted {
                        context: CONTEXT,
                        path: path.to_owned(),
                        attempts: attempt,
                    });
                }
                trace!(%path, attempt, "rotation script in use, retrying removal");
                thread::sleep(policy.delay);
                attempt += 1;
            }
            Err(source) => {
                return Err(PlotError::RotationScript {
                    context: CONTEXT,
                    action: FileAction::Remove,
                    source,
                });
            }
        }
    }
}

/// A rotation script written to a uniquely named temporary file.
///
/// Call [`RotationScript::remove`] once the engine is done with it. If the
/// value is dropped without that (an earlier step failed), a single
/// best-effort removal is attempted.
#[derive(Debug)]
pub struct RotationScript {
    path: Utf8PathBuf,
    removed: bool,
}

impl RotationScript {
    /// Write `contents` to a fresh temporary file, synced and closed.
    ///
    /// Write-back failures surface from the sync; the handle is closed before
    /// this returns so the engine can open the file on any platform.
    pub fn create(contents: &str) -> Result<Self, PlotError> {
        Self::create_in(&std::env::temp_dir(), contents)
    }

    /// Like [`RotationScript::create`], but inside `dir`.
    pub fn create_in(dir: &std::path::Path, contents: &str) -> Result<Self, PlotError> {
        let fs_err = |action| {
            move |source: io::Error| PlotError::RotationScript {
                context: CONTEXT,
                action,
                source,
            }
        };

        let file = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .tempfile_in(dir)
            .map_err(fs_err(FileAction::Create))?;
        // From here on the file is ours to delete, not tempfile's.
        let (mut file, path) = file.keep().map_err(|e| fs_err(FileAction::Create)(e.error))?;

        let path = match Utf8PathBuf::from_path_buf(path) {
            Ok(path) => path,
            Err(path) => {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(PlotError::NonUtf8TempPath {
                    context: CONTEXT,
                    path,
                });
            }
        };
        let script = Self {
            path,
            removed: false,
        };

        file.write_all(contents.as_bytes())
            .map_err(fs_err(FileAction::Write))?;
        file.sync_all().map_err(fs_err(FileAction::Sync))?;
        drop(file);

        debug!(path = %script.path, "wrote rotation script");
        Ok(script)
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Delete the script, retrying while another process holds it.
    pub fn remove(self, policy: &RetryPolicy) -> Result<(), PlotError> {
        self.remove_using(policy, |path| fs::remove_file(path))
    }

    /// Delete the script through a caller-supplied remove function.
    pub fn remove_using<F>(mut self, policy: &RetryPolicy, remove: F) -> Result<(), PlotError>
    where
        F: FnMut(&Utf8Path) -> io::Result<()>,
    {
        // Whatever happens, don't try again on drop.
        self.removed = true;
        remove_with_retry(&self.path, policy, remove)?;
        debug!(path = %self.path, "removed rotation script");
        Ok(())
    }
}

impl Drop for RotationScript {
    fn drop(&mut self) {
        if !self.removed {
            let _ = fs::remove_file(&self.path);
        }
    }
}
