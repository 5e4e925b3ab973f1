//! Command line arguments and how they combine with an options file.

use camino::Utf8PathBuf;
use miette::{IntoDiagnostic, WrapErr};
use scatter_gif::{GNUPLOT_ENV, GnuplotConfig, PlotOptions, RetryPolicy};
use std::time::Duration;

/// Render a rotating 3D scatter plot as an animated GIF using gnuplot.
#[derive(Debug, clap::Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Whitespace-separated data file, one point per row.
    pub data: Utf8PathBuf,

    /// Where to write the animated GIF.
    pub gif: Utf8PathBuf,

    /// TOML file with plot options. Flags below override it.
    #[clap(long, short = 'o')]
    pub options: Option<Utf8PathBuf>,

    /// gnuplot executable.
    #[clap(long, env = GNUPLOT_ENV, default_value = "gnuplot")]
    pub gnuplot: String,

    /// Log every command sent to gnuplot.
    #[clap(long)]
    pub debug: bool,

    /// Attempts at removing the rotation script while gnuplot still holds it.
    #[clap(long)]
    pub max_retries: Option<u32>,

    /// Pause between removal attempts, in milliseconds.
    #[clap(long)]
    pub retry_delay_ms: Option<u64>,

    #[command(flatten)]
    pub overrides: Overrides,
}

/// Per-field overrides of the plot options.
#[derive(Debug, Default, clap::Args)]
pub struct Overrides {
    #[clap(long)]
    pub title: Option<String>,
    #[clap(long)]
    pub x_label: Option<String>,
    #[clap(long)]
    pub y_label: Option<String>,
    #[clap(long)]
    pub z_label: Option<String>,
    /// gnuplot range, e.g. `[-1:1]`.
    #[clap(long, allow_hyphen_values = true)]
    pub x_range: Option<String>,
    #[clap(long, allow_hyphen_values = true)]
    pub y_range: Option<String>,
    #[clap(long, allow_hyphen_values = true)]
    pub z_range: Option<String>,
    #[clap(long, allow_hyphen_values = true)]
    pub xy_plane: Option<f64>,
    /// gnuplot `using` selector, e.g. `1:2:3`.
    #[clap(long)]
    pub columns: Option<String>,
    /// Background as `x` followed by hex, e.g. `xffffff`.
    #[clap(long)]
    pub bg_color: Option<String>,
    #[clap(long)]
    pub point_color: Option<String>,
    /// Delay between frames, in hundredths of a second.
    #[clap(long)]
    pub delay: Option<u32>,
    /// Degrees of rotation between frames.
    #[clap(long, allow_hyphen_values = true)]
    pub rotation: Option<i32>,
    #[clap(long)]
    pub width: Option<u32>,
    #[clap(long)]
    pub height: Option<u32>,
    /// Font name with optional size, e.g. `arial,10`.
    #[clap(long)]
    pub font: Option<String>,
}

impl Overrides {
    pub fn apply(self, options: &mut PlotOptions) {
        let Overrides {
            title,
            x_label,
            y_label,
            z_label,
            x_range,
            y_range,
            z_range,
            xy_plane,
            columns,
            bg_color,
            point_color,
            delay,
            rotation,
            width,
            height,
            font,
        } = self;

        macro_rules! set {
            ($($field:ident <- $value:expr),* $(,)?) => {
                $(if let Some(value) = $value { options.$field = value; })*
            };
        }
        set! {
            title <- title,
            x_label <- x_label,
            y_label <- y_label,
            z_label <- z_label,
            x_range <- x_range,
            y_range <- y_range,
            z_range <- z_range,
            xy_plane <- xy_plane,
            columns <- columns,
            bg_color <- bg_color,
            point_color <- point_color,
            delay <- delay,
            rotation_step <- rotation,
            width <- width,
            height <- height,
            font <- font,
        }
    }
}

impl Args {
    /// Defaults, then the options file, then flags.
    pub fn plot_options(&mut self) -> miette::Result<PlotOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("reading options file {path}"))?;
                parse_options(&text).wrap_err_with(|| format!("parsing options file {path}"))?
            }
            None => PlotOptions::default(),
        };
        std::mem::take(&mut self.overrides).apply(&mut options);
        Ok(options)
    }

    pub fn gnuplot_config(&self) -> GnuplotConfig {
        GnuplotConfig {
            program: self.gnuplot.clone(),
            debug: self.debug,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_retries.unwrap_or(defaults.max_attempts),
            delay: self
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.delay),
        }
    }
}

pub fn parse_options(text: &str) -> miette::Result<PlotOptions> {
    toml::from_str(text).into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn options_file_fills_in_over_defaults() {
        let options = parse_options(
            r#"
            title = "Iris"
            rotation_step = 45
            x_range = "[4:8]"
            xy_plane = -1.5
            "#,
        )
        .unwrap();
        assert_eq!(options.title, "Iris");
        assert_eq!(options.rotation_step, 45);
        assert_eq!(options.x_range, "[4:8]");
        assert_eq!(options.xy_plane, -1.5);
        assert_eq!(options.columns, PlotOptions::default().columns);
    }

    #[test]
    fn unknown_option_keys_are_rejected() {
        assert!(parse_options("rotaton_step = 45").is_err());
    }

    #[test]
    fn flags_override_the_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("opts.toml");
        std::fs::write(&file, "title = \"From file\"\nrotation_step = 45\nwidth = 800\n").unwrap();

        let mut args = Args::parse_from([
            "scatter-gif",
            "--options",
            file.to_str().unwrap(),
            "--rotation",
            "90",
            "--x-range",
            "[-2:2]",
            "points.dat",
            "out.gif",
        ]);
        let options = args.plot_options().unwrap();

        assert_eq!(options.title, "From file");
        assert_eq!(options.rotation_step, 90);
        assert_eq!(options.width, 800);
        assert_eq!(options.x_range, "[-2:2]");
        assert_eq!(args.data.as_str(), "points.dat");
    }

    #[test]
    fn retry_flags_build_a_policy() {
        let args = Args::parse_from([
            "scatter-gif",
            "--max-retries",
            "7",
            "--retry-delay-ms",
            "3",
            "d.dat",
            "o.gif",
        ]);
        assert_eq!(
            args.retry_policy(),
            RetryPolicy {
                max_attempts: 7,
                delay: Duration::from_millis(3),
            }
        );
    }
}
