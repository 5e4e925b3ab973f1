//! Error types with diagnostic codes using miette
//!
//! Every error carries the component and operation it was raised from, so the
//! caller can report it without any call-stack inspection.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classes of failure, in the order they can occur during a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller passed something unusable.
    Input,
    /// The rotation script could not be created, written, or removed.
    Filesystem,
    /// The plotting engine session could not be driven.
    Session,
}

/// Filesystem step that failed while handling the rotation script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Create,
    Write,
    Sync,
    Remove,
}

impl std::fmt::Display for FileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FileAction::Create => "create",
            FileAction::Write => "write",
            FileAction::Sync => "sync",
            FileAction::Remove => "remove",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Plot Errors
// ============================================================================

/// Errors that can occur while rendering a rotating scatter plot
#[derive(Error, Diagnostic, Debug)]
pub enum PlotError {
    #[error("{context}: the data file was not specified")]
    #[diagnostic(code(scatter_gif::input::missing_data_file))]
    MissingDataFile { context: &'static str },

    #[error("{context}: the GIF file was not specified")]
    #[diagnostic(code(scatter_gif::input::missing_gif_file))]
    MissingGifFile { context: &'static str },

    #[error("{context}: rotation step must be non-zero")]
    #[diagnostic(
        code(scatter_gif::input::invalid_rotation_step),
        help("the frame count is 360 divided by the rotation step; pick a step that divides 360")
    )]
    InvalidRotationStep { context: &'static str },

    #[error("{context}: failed to {action} rotation script")]
    #[diagnostic(code(scatter_gif::fs::rotation_script))]
    RotationScript {
        context: &'static str,
        action: FileAction,
        #[source]
        source: io::Error,
    },

    #[error("{context}: temporary path is not valid UTF-8: {path:?}")]
    #[diagnostic(code(scatter_gif::fs::non_utf8_path))]
    NonUtf8TempPath {
        context: &'static str,
        path: PathBuf,
    },

    #[error("{context}: rotation script {path} still in use after {attempts} removal attempts")]
    #[diagnostic(
        code(scatter_gif::fs::cleanup_exhausted),
        help("the plotting engine may still hold the file open; raise the retry budget")
    )]
    CleanupExhausted {
        context: &'static str,
        path: Utf8PathBuf,
        attempts: u32,
    },

    #[error("{context}: failed to start plotting engine `{program}`")]
    #[diagnostic(
        code(scatter_gif::session::start),
        help("make sure gnuplot is installed, or set SCATTER_GIF_GNUPLOT to its path")
    )]
    SessionStart {
        context: &'static str,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{context}: failed to send command to plotting engine: {command}")]
    #[diagnostic(code(scatter_gif::session::command))]
    SessionCommand {
        context: &'static str,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{context}: failed to close plotting engine session")]
    #[diagnostic(code(scatter_gif::session::close))]
    SessionClose {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl PlotError {
    /// Component and operation that raised this error, e.g. `scatter::plot`.
    pub fn context(&self) -> &'static str {
        match self {
            PlotError::MissingDataFile { context }
            | PlotError::MissingGifFile { context }
            | PlotError::InvalidRotationStep { context }
            | PlotError::RotationScript { context, .. }
            | PlotError::NonUtf8TempPath { context, .. }
            | PlotError::CleanupExhausted { context, .. }
            | PlotError::SessionStart { context, .. }
            | PlotError::SessionCommand { context, .. }
            | PlotError::SessionClose { context, .. } => *context,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PlotError::MissingDataFile { .. }
            | PlotError::MissingGifFile { .. }
            | PlotError::InvalidRotationStep { .. } => ErrorCategory::Input,
            PlotError::RotationScript { .. }
            | PlotError::NonUtf8TempPath { .. }
            | PlotError::CleanupExhausted { .. } => ErrorCategory::Filesystem,
            PlotError::SessionStart { .. }
            | PlotError::SessionCommand { .. }
            | PlotError::SessionClose { .. } => ErrorCategory::Session,
        }
    }
}
