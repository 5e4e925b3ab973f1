//! Rendering a rotating scatter plot.

use crate::engine::{CommandSink, Engine, Gnuplot, GnuplotConfig};
use crate::errors::PlotError;
use crate::log::debug;
use crate::options::PlotOptions;
use crate::rotation::{RetryPolicy, RotationScript};
use crate::script::{plot_commands, rotation_script};
use camino::Utf8Path;

const CONTEXT: &str = "scatter::plot";

/// Render `data_file` as a rotating scatter plot into `gif_file`, using the
/// gnuplot found via [`GnuplotConfig::from_env`].
///
/// The GIF has `floor(360 / rotation_step)` frames, each rotated a further
/// `rotation_step` degrees about the z axis.
pub fn plot(options: &PlotOptions, data_file: &Utf8Path, gif_file: &Utf8Path) -> Result<(), PlotError> {
    Plotter::new(Gnuplot::new(GnuplotConfig::from_env())).plot(options, data_file, gif_file)
}

/// Render one plot through `engine`, with the default [`RetryPolicy`].
pub fn plot_with<E: Engine>(
    engine: E,
    options: &PlotOptions,
    data_file: &Utf8Path,
    gif_file: &Utf8Path,
) -> Result<(), PlotError> {
    Plotter::new(engine).plot(options, data_file, gif_file)
}

/// Renders rotating scatter plots through a pluggable [`Engine`].
#[derive(Debug)]
pub struct Plotter<E> {
    engine: E,
    retry: RetryPolicy,
    temp_dir: Option<std::path::PathBuf>,
}

impl<E: Engine> Plotter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            retry: RetryPolicy::default(),
            temp_dir: None,
        }
    }

    /// How long to keep retrying removal of a rotation script that is in use.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Write rotation scripts to `dir` instead of the system temp directory.
    pub fn temp_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Render one plot.
    ///
    /// Nothing is created when either path is empty or the rotation step is
    /// zero. On success the rotation script is gone by the time this returns.
    pub fn plot(
        &mut self,
        options: &PlotOptions,
        data_file: &Utf8Path,
        gif_file: &Utf8Path,
    ) -> Result<(), PlotError> {
        if data_file.as_str().is_empty() {
            return Err(PlotError::MissingDataFile { context: CONTEXT });
        }
        if gif_file.as_str().is_empty() {
            return Err(PlotError::MissingGifFile { context: CONTEXT });
        }

        let contents = rotation_script(options)?;
        let script = match &self.temp_dir {
            Some(dir) => RotationScript::create_in(dir, &contents)?,
            None => RotationScript::create(&contents)?,
        };

        let commands = plot_commands(options, data_file, gif_file, script.path());
        debug!(%data_file, %gif_file, commands = commands.len(), "plotting");

        let mut session = self.engine.open()?;
        for command in &commands {
            session
                .submit(command)
                .map_err(|source| PlotError::SessionCommand {
                    context: CONTEXT,
                    command: command.clone(),
                    source,
                })?;
        }
        session
            .close()
            .map_err(|source| PlotError::SessionClose {
                context: CONTEXT,
                source,
            })?;

        script.remove(&self.retry)
    }
}
