//! Text sparklines for the trend column.
//!
//! Series are resampled to the available width, normalized against the
//! metric's shared min/max and drawn with block characters.

use super::format::format_value;
use super::metrics::{SparklineData, ValueFormat};

/// Sparkline characters (8 levels of height).
pub const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Level used when the range is flat.
const FLAT_LEVEL: u8 = 3;

/// Average evenly sized buckets so a series fits `width` columns.
///
/// Series already narrower than `width` are returned unchanged.
pub fn resample(values: &[f64], width: usize) -> Vec<f64> {
    if width == 0 || values.is_empty() {
        return Vec::new();
    }
    if values.len() <= width {
        return values.to_vec();
    }

    (0..width)
        .map(|bucket| {
            let start = bucket * values.len() / width;
            let end = ((bucket + 1) * values.len() / width).max(start + 1);
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Normalize values to the 0-7 range for sparkline display.
pub fn normalize(values: &[f64], min: f64, max: f64) -> Vec<u8> {
    let range = max - min;
    values
        .iter()
        .map(|&v| {
            if !range.is_finite() || range <= 0.0 || !v.is_finite() {
                return FLAT_LEVEL;
            }
            let normalized = ((v - min) / range * 7.0).round();
            normalized.clamp(0.0, 7.0) as u8
        })
        .collect()
}

/// Render normalized levels as block characters.
pub fn render_levels(levels: &[u8]) -> String {
    levels
        .iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}

/// The two rendered lines of a trend cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparklineText {
    pub current: String,
    pub comparison: String,
    /// Y-axis label for the top of the range.
    pub max_label: String,
    /// Y-axis label for the bottom of the range.
    pub min_label: String,
}

impl SparklineText {
    /// Render a sparkline into `width` columns.
    pub fn render(data: &SparklineData, format: ValueFormat, width: usize) -> Self {
        let draw = |values: Vec<f64>| {
            let resampled = resample(&values, width);
            render_levels(&normalize(&resampled, data.min, data.max))
        };

        Self {
            current: draw(data.values()),
            comparison: draw(data.comparisons()),
            max_label: format_value(data.max, format),
            min_label: format_value(data.min, format),
        }
    }
}
