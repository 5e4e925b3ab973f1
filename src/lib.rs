//! Render rotating 3D scatter plots as animated GIFs.
//!
//! The drawing itself is done by gnuplot. This crate writes the command
//! script that makes gnuplot spin the plot through a full revolution, one
//! frame per rotation step, and manages the temporary file that script
//! lives in.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use scatter_gif::{PlotOptions, plot};
//!
//! let options = PlotOptions {
//!     title: "Iris".to_string(),
//!     rotation_step: 10,
//!     ..Default::default()
//! };
//! plot(&options, Utf8Path::new("iris.dat"), Utf8Path::new("iris.gif"))?;
//! # Ok::<(), scatter_gif::PlotError>(())
//! ```
//!
//! To drive something other than a local gnuplot (or to test without one),
//! implement [`Engine`] and use a [`Plotter`].

pub mod engine;
pub mod errors;
pub mod log;
pub mod options;
pub mod plot;
pub mod rotation;
pub mod script;

pub use engine::{CommandSink, Engine, GNUPLOT_ENV, Gnuplot, GnuplotConfig, GnuplotSession};
pub use errors::{ErrorCategory, FileAction, PlotError};
pub use options::PlotOptions;
pub use plot::{Plotter, plot, plot_with};
pub use rotation::RetryPolicy;
