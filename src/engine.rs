//! Plotting engine sessions.
//!
//! An [`Engine`] opens a [`CommandSink`] session, which takes commands one
//! line at a time and is closed explicitly. Only issuance is reported:
//! whether gnuplot accepted a command is not observable through this layer.

use crate::errors::PlotError;
use crate::log::{debug, trace, warn};
use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Environment variable overriding the gnuplot executable.
pub const GNUPLOT_ENV: &str = "SCATTER_GIF_GNUPLOT";

const CONTEXT: &str = "scatter::engine";

/// An open session with a plotting engine.
pub trait CommandSink {
    /// Submit a single command line.
    fn submit(&mut self, command: &str) -> io::Result<()>;

    /// End the session, waiting until the engine has released its inputs.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

/// Something that can start plotting engine sessions.
pub trait Engine {
    type Session: CommandSink;

    /// Start a new session.
    fn open(&mut self) -> Result<Self::Session, PlotError>;
}

/// Configuration for the gnuplot engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GnuplotConfig {
    /// Executable name or path.
    pub program: String,
    /// Log every command as it is sent.
    pub debug: bool,
}

impl Default for GnuplotConfig {
    fn default() -> Self {
        Self {
            program: "gnuplot".to_string(),
            debug: false,
        }
    }
}

impl GnuplotConfig {
    /// Defaults, with the program taken from `SCATTER_GIF_GNUPLOT` if set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(program) = std::env::var(GNUPLOT_ENV).ok().filter(|p| !p.is_empty()) {
            config.program = program;
        }
        config
    }
}

/// Drives a `gnuplot` child process through its stdin.
#[derive(Debug, Clone, Default)]
pub struct Gnuplot {
    config: GnuplotConfig,
}

impl Gnuplot {
    pub fn new(config: GnuplotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GnuplotConfig {
        &self.config
    }
}

impl Engine for Gnuplot {
    type Session = GnuplotSession;

    fn open(&mut self) -> Result<GnuplotSession, PlotError> {
        let program = &self.config.program;
        // stdout/stderr stay inherited so gnuplot's own diagnostics are visible.
        let mut child = Command::new(program)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| PlotError::SessionStart {
                context: CONTEXT,
                program: program.clone(),
                source,
            })?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(PlotError::SessionStart {
                context: CONTEXT,
                program: program.clone(),
                source: io::Error::other("child stdin was not captured"),
            });
        };

        debug!(program = %program, pid = child.id(), "started gnuplot");
        Ok(GnuplotSession {
            child,
            stdin,
            debug: self.config.debug,
        })
    }
}

/// A running gnuplot process.
#[derive(Debug)]
pub struct GnuplotSession {
    child: Child,
    stdin: ChildStdin,
    debug: bool,
}

impl CommandSink for GnuplotSession {
    fn submit(&mut self, command: &str) -> io::Result<()> {
        if self.debug {
            debug!(command, "gnuplot <");
        } else {
            trace!(command, "gnuplot <");
        }
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()
    }

    fn close(self) -> io::Result<()> {
        let GnuplotSession {
            mut child, stdin, ..
        } = self;
        // EOF on stdin ends the session even if `quit` never made it through.
        drop(stdin);
        let status = child.wait()?;
        if status.success() {
            debug!("gnuplot exited");
        } else {
            warn!(%status, "gnuplot exited unsuccessfully");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_fails_to_start() {
        let mut engine = Gnuplot::new(GnuplotConfig {
            program: "scatter-gif-no-such-gnuplot".to_string(),
            debug: false,
        });
        match engine.open() {
            Err(PlotError::SessionStart { program, source, .. }) => {
                assert_eq!(program, "scatter-gif-no-such-gnuplot");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("a session started without an executable"),
        }
    }

    #[test]
    fn default_program_is_gnuplot() {
        assert_eq!(GnuplotConfig::default().program, "gnuplot");
    }

    #[cfg(unix)]
    #[test]
    fn session_pipes_commands_to_the_child() {
        // `cat` stands in for gnuplot: it consumes stdin and exits on EOF.
        let mut engine = Gnuplot::new(GnuplotConfig {
            program: "cat".to_string(),
            debug: true,
        });
        let mut session = engine.open().unwrap();
        session.submit("set terminal unknown").unwrap();
        session.submit("quit").unwrap();
        session.close().unwrap();
    }
}
