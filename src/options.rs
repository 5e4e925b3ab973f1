//! Plot options for a rotating scatter animation.
//!
//! Every string field is interpolated verbatim into gnuplot commands. Nothing
//! here is validated or escaped: a range like `[0:` or a column selector like
//! `1:2:` reaches gnuplot unchanged, and gnuplot decides what to do with it.

use crate::errors::PlotError;

/// One full revolution, in degrees.
pub const FULL_TURN: i32 = 360;

/// Elevation of the camera above the xy plane, in degrees.
pub const VIEW_ELEVATION: i32 = 60;

/// Parameters for one rotating scatter plot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PlotOptions {
    /// Centered plot title. The rotation angle is appended on a second line.
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Rotated 90 degrees alongside the z axis.
    pub z_label: String,
    /// gnuplot range expression, e.g. `[-1:1]` or `[*:*]`.
    pub x_range: String,
    pub y_range: String,
    pub z_range: String,
    /// Height at which the xy plane intersects the z axis.
    pub xy_plane: f64,
    /// gnuplot `using` selector, e.g. `1:2:3`.
    pub columns: String,
    /// Background color as a hex string prefixed with `x`, e.g. `xffffff`.
    pub bg_color: String,
    pub point_color: String,
    /// Delay between frames, in hundredths of a second.
    pub delay: u32,
    /// Rotation between frames, in degrees. Must be non-zero.
    pub rotation_step: i32,
    /// Output height in pixels.
    pub height: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Font name with an optional comma-separated size, e.g. `arial,10`.
    pub font: String,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            z_label: "z".to_string(),
            x_range: "[*:*]".to_string(),
            y_range: "[*:*]".to_string(),
            z_range: "[*:*]".to_string(),
            xy_plane: 0.0,
            columns: "1:2:3".to_string(),
            bg_color: "xffffff".to_string(),
            point_color: "blue".to_string(),
            delay: 10,
            rotation_step: 10,
            height: 480,
            width: 640,
            font: "arial,10".to_string(),
        }
    }
}

impl PlotOptions {
    /// Number of frames in the animation: `floor(360 / rotation_step)`.
    ///
    /// Negative steps truncate toward zero, which leaves a guard of zero or
    /// less, so the rotation loop draws a single frame.
    pub fn frame_count(&self) -> Result<i32, PlotError> {
        if self.rotation_step == 0 {
            return Err(PlotError::InvalidRotationStep {
                context: "scatter::frame_count",
            });
        }
        Ok(FULL_TURN / self.rotation_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_step(rotation_step: i32) -> PlotOptions {
        PlotOptions {
            rotation_step,
            ..Default::default()
        }
    }

    #[test]
    fn frame_count_divides_a_full_turn() {
        assert_eq!(with_step(60).frame_count().unwrap(), 6);
        assert_eq!(with_step(90).frame_count().unwrap(), 4);
        assert_eq!(with_step(120).frame_count().unwrap(), 3);
    }

    #[test]
    fn frame_count_floors_uneven_steps() {
        assert_eq!(with_step(7).frame_count().unwrap(), 51);
        assert_eq!(with_step(500).frame_count().unwrap(), 0);
    }

    #[test]
    fn negative_step_truncates_toward_zero() {
        assert_eq!(with_step(-90).frame_count().unwrap(), -4);
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = with_step(0).frame_count().unwrap_err();
        assert!(matches!(err, PlotError::InvalidRotationStep { .. }));
    }
}
