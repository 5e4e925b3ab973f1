//! gnuplot command generation
//!
//! Two pieces of text are produced per plot:
//! - the rotation script, a small file that gnuplot `load`s and that keeps
//!   `reread`ing itself until every frame is drawn
//! - the ordered command sequence sent over the engine session
//!
//! The order of the sequence matters: axes are configured before the data is
//! loaded, the data is probed with the `unknown` terminal, and only then is the
//! gif terminal and output declared before the rotation script is loaded.

use crate::errors::PlotError;
use crate::options::{FULL_TURN, PlotOptions, VIEW_ELEVATION};
use camino::Utf8Path;
use std::fmt::Write;

/// Build the self-rereading rotation script.
///
/// The script uses two engine variables, `frame_count` and `zrot`, which the
/// command sequence seeds before loading it. Each pass relabels the title with
/// the current angle, sets the view, redraws (capturing one gif frame), and
/// advances `zrot` modulo 360.
pub fn rotation_script(options: &PlotOptions) -> Result<String, PlotError> {
    let frames = options.frame_count()?;
    let mut script = String::new();

    writeln!(script, "frame_count = frame_count + 1").unwrap();
    writeln!(
        script,
        "frame_title = sprintf( \"{}\\n( Rotation Angle = %i%c )\", zrot, 176 )",
        options.title
    )
    .unwrap();
    writeln!(
        script,
        "set title frame_title offset 0,1,0 font \"{}\"",
        options.font
    )
    .unwrap();
    writeln!(script, "set view xrot,zrot").unwrap();
    writeln!(script, "replot").unwrap();
    writeln!(
        script,
        "zrot = ( zrot + {} ) % {FULL_TURN}",
        options.rotation_step
    )
    .unwrap();
    writeln!(script, "if( frame_count < {frames} ) reread").unwrap();

    Ok(script)
}

/// Build the ordered command sequence for one plot.
///
/// `rotation_script` is the on-disk location of the script produced by
/// [`rotation_script`].
pub fn plot_commands(
    options: &PlotOptions,
    data_file: &Utf8Path,
    gif_file: &Utf8Path,
    rotation_script: &Utf8Path,
) -> Vec<String> {
    let font = &options.font;
    vec![
        "unset key".to_string(),
        "set hidden3d".to_string(),
        r#"set border 4095 back lt 0 lc rgb "gray40""#.to_string(),
        "set grid x y z back".to_string(),
        format!("set xyplane at {:.6}", options.xy_plane),
        format!("set xrange {} noreverse nowriteback", options.x_range),
        format!("set yrange {} noreverse nowriteback", options.y_range),
        format!("set zrange {} noreverse nowriteback", options.z_range),
        "set lmargin 7".to_string(),
        format!(r#"set xlabel "{}" font "{font}""#, options.x_label),
        format!(r#"set ylabel "{}" font "{font}""#, options.y_label),
        format!(
            r#"set zlabel "{}" font "{font}" offset -4,0,0 rotate by 90"#,
            options.z_label
        ),
        format!(r#"set tics font "{font}""#),
        format!("xrot = {VIEW_ELEVATION}"),
        format!("zrot = {}", options.rotation_step),
        "set terminal unknown".to_string(),
        format!(
            r#"splot "{data_file}" using {} with points lc rgb "{}""#,
            options.columns, options.point_color
        ),
        format!(
            "set terminal gif size {},{} animate delay {} loop 0 nooptimize {}",
            options.width, options.height, options.delay, options.bg_color
        ),
        format!(r#"set output "{gif_file}""#),
        "frame_count = 0".to_string(),
        format!(r#"load "{}""#, to_slash(rotation_script)),
        "quit".to_string(),
    ]
}

/// gnuplot wants forward slashes even on Windows.
fn to_slash(path: &Utf8Path) -> String {
    if cfg!(windows) {
        path.as_str().replace('\\', "/")
    } else {
        path.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_options() -> PlotOptions {
        PlotOptions {
            title: "Iris".to_string(),
            x_label: "Sepal length".to_string(),
            y_label: "Sepal width".to_string(),
            z_label: "Petal length".to_string(),
            x_range: "[4:8]".to_string(),
            y_range: "[2:4.5]".to_string(),
            z_range: "[1:7]".to_string(),
            xy_plane: 1.0,
            columns: "1:2:3".to_string(),
            bg_color: "xf0f0f0".to_string(),
            point_color: "dark-red".to_string(),
            delay: 10,
            rotation_step: 60,
            height: 400,
            width: 500,
            font: "arial,9".to_string(),
        }
    }

    #[test]
    fn rotation_script_loops_until_full_turn() {
        let script = rotation_script(&demo_options()).unwrap();
        insta::assert_snapshot!(script.trim_end(), @r#"
        frame_count = frame_count + 1
        frame_title = sprintf( "Iris\n( Rotation Angle = %i%c )", zrot, 176 )
        set title frame_title offset 0,1,0 font "arial,9"
        set view xrot,zrot
        replot
        zrot = ( zrot + 60 ) % 360
        if( frame_count < 6 ) reread
        "#);
    }

    #[test]
    fn reread_guard_follows_rotation_step() {
        let options = PlotOptions {
            rotation_step: 90,
            ..demo_options()
        };
        let script = rotation_script(&options).unwrap();
        assert!(script.ends_with("if( frame_count < 4 ) reread\n"));
    }

    #[test]
    fn rotation_script_rejects_zero_step() {
        let options = PlotOptions {
            rotation_step: 0,
            ..demo_options()
        };
        assert!(matches!(
            rotation_script(&options),
            Err(PlotError::InvalidRotationStep { .. })
        ));
    }

    #[test]
    fn command_sequence() {
        let commands = plot_commands(
            &demo_options(),
            Utf8Path::new("iris.dat"),
            Utf8Path::new("out/iris.gif"),
            Utf8Path::new("/tmp/scatter_abc123"),
        );
        insta::assert_snapshot!(commands.join("\n"), @r#"
        unset key
        set hidden3d
        set border 4095 back lt 0 lc rgb "gray40"
        set grid x y z back
        set xyplane at 1.000000
        set xrange [4:8] noreverse nowriteback
        set yrange [2:4.5] noreverse nowriteback
        set zrange [1:7] noreverse nowriteback
        set lmargin 7
        set xlabel "Sepal length" font "arial,9"
        set ylabel "Sepal width" font "arial,9"
        set zlabel "Petal length" font "arial,9" offset -4,0,0 rotate by 90
        set tics font "arial,9"
        xrot = 60
        zrot = 60
        set terminal unknown
        splot "iris.dat" using 1:2:3 with points lc rgb "dark-red"
        set terminal gif size 500,400 animate delay 10 loop 0 nooptimize xf0f0f0
        set output "out/iris.gif"
        frame_count = 0
        load "/tmp/scatter_abc123"
        quit
        "#);
    }

    #[test]
    fn output_is_declared_between_probe_and_load() {
        let commands = plot_commands(
            &demo_options(),
            Utf8Path::new("d.dat"),
            Utf8Path::new("o.gif"),
            Utf8Path::new("rot"),
        );
        let position = |prefix: &str| {
            commands
                .iter()
                .position(|c| c.starts_with(prefix))
                .unwrap_or_else(|| panic!("missing `{prefix}`"))
        };

        let probe = position("set terminal unknown");
        let splot = position("splot");
        let gif = position("set terminal gif");
        let output = position("set output");
        let load = position("load");

        assert!(probe < splot);
        assert!(splot < gif);
        assert!(gif < output);
        assert!(output < load);
        assert_eq!(commands.last().map(String::as_str), Some("quit"));
    }

    #[test]
    fn malformed_fields_pass_through_untouched() {
        let options = PlotOptions {
            columns: "1:2:".to_string(),
            x_range: "[0:".to_string(),
            ..demo_options()
        };
        let commands = plot_commands(
            &options,
            Utf8Path::new("d.dat"),
            Utf8Path::new("o.gif"),
            Utf8Path::new("rot"),
        );
        assert!(commands.contains(&"set xrange [0: noreverse nowriteback".to_string()));
        assert!(commands.contains(&r#"splot "d.dat" using 1:2: with points lc rgb "dark-red""#.to_string()));
    }

    #[test]
    fn negative_plane_keeps_six_decimals() {
        let options = PlotOptions {
            xy_plane: -0.25,
            ..demo_options()
        };
        let commands = plot_commands(
            &options,
            Utf8Path::new("d.dat"),
            Utf8Path::new("o.gif"),
            Utf8Path::new("rot"),
        );
        assert_eq!(commands[4], "set xyplane at -0.250000");
    }
}
