mod args;

use args::Args;
use clap::Parser;
use scatter_gif::{Gnuplot, PlotError, Plotter};
use std::error::Error as _;

fn main() {
    let mut args = Args::parse();

    // Initialize tracing to stderr
    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = match args.plot_options() {
        Ok(options) => options,
        Err(report) => {
            let message: Vec<String> = report.chain().map(|cause| cause.to_string()).collect();
            halt(Some("scatter::options"), &message.join(": "))
        }
    };

    let mut plotter =
        Plotter::new(Gnuplot::new(args.gnuplot_config())).retry_policy(args.retry_policy());

    match plotter.plot(&options, &args.data, &args.gif) {
        Ok(()) => tracing::info!(gif = %args.gif, "wrote animation"),
        Err(e) => halt_on(e),
    }
}

fn halt_on(error: PlotError) -> ! {
    let context = error.context();
    halt(Some(context).filter(|c| !c.is_empty()), &error_detail(&error))
}

/// The error message without its leading context, followed by its causes.
fn error_detail(error: &PlotError) -> String {
    let message = error.to_string();
    let mut detail = message
        .strip_prefix(error.context())
        .and_then(|rest| rest.strip_prefix(": "))
        .unwrap_or(&message)
        .to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        detail.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    detail
}

/// Log a fatal, bell-prefixed diagnostic and exit.
fn halt(context: Option<&str>, message: &str) -> ! {
    tracing::error!(context = context.unwrap_or_default(), "{message}");
    // Written directly: the fmt subscriber escapes the bell.
    eprintln!("{}", fatal_line(context, message));
    std::process::exit(1)
}

fn fatal_line(context: Option<&str>, message: &str) -> String {
    match context {
        Some(context) => format!("\x07{context}: {message}"),
        None => "\x07scatter: FATAL ERROR!".to_string(),
    }
}
