//! Metric value formatting and delta computation.
//!
//! Every function here is total: any `f64` and any format produce a string.
//! Non-finite values render as [`PLACEHOLDER`].

use super::metrics::{DeltaMode, ValueFormat};

/// Rendered in place of NaN and infinite values.
pub const PLACEHOLDER: &str = "-";

/// Format a value for display according to its format.
pub fn format_value(value: f64, format: ValueFormat) -> String {
    match format {
        ValueFormat::Currency => format_currency(value),
        ValueFormat::Percent => format_percent(value),
        ValueFormat::Milliseconds => format_milliseconds(value),
        ValueFormat::Number => format_number(value),
    }
}

/// Format a plain number (e.g., 1500 -> "1.50K", 42 -> "42", 42.5 -> "42.50").
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return PLACEHOLDER.to_string();
    }

    if n.abs() >= 1_000_000.0 {
        format!("{}M", to_fixed(n / 1_000_000.0, 2))
    } else if n.abs() >= 1_000.0 {
        format!("{}K", to_fixed(n / 1_000.0, 2))
    } else if n.fract() == 0.0 {
        to_fixed(n, 0)
    } else {
        to_fixed(n, 2)
    }
}

/// Format a dollar amount (e.g., 1500000 -> "$1.50M", -50 -> "-$50.00").
pub fn format_currency(n: f64) -> String {
    if !n.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let abs = n.abs();
    let amount = if abs >= 1_000_000.0 {
        format!("{}M", to_fixed(abs / 1_000_000.0, 2))
    } else if abs >= 1_000.0 {
        format!("{}K", to_fixed(abs / 1_000.0, 2))
    } else {
        to_fixed(abs, 2)
    };

    format!("{sign}${amount}")
}

/// Format a percentage with one decimal (e.g., 8.43 -> "8.4%").
pub fn format_percent(n: f64) -> String {
    if !n.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{}%", to_fixed(n, 1))
}

/// Format a latency (e.g., 245 -> "245ms", 1450 -> "1.45s").
pub fn format_milliseconds(n: f64) -> String {
    if !n.is_finite() {
        return PLACEHOLDER.to_string();
    }

    if n.abs() >= 1_000.0 {
        format!("{}s", to_fixed(n / 1_000.0, 2))
    } else {
        format!("{}ms", to_fixed(n, 0))
    }
}

/// Change between two readings.
///
/// In `Pct` mode a zero baseline yields exactly 100, -100 or 0 by the sign
/// of `value`. Results are not clamped.
pub fn calculate_delta(value: f64, previous_value: f64, mode: DeltaMode) -> f64 {
    match mode {
        DeltaMode::Abs => value - previous_value,
        DeltaMode::Pct => {
            if previous_value == 0.0 {
                if value > 0.0 {
                    100.0
                } else if value < 0.0 {
                    -100.0
                } else {
                    0.0
                }
            } else {
                ((value - previous_value) / previous_value.abs()) * 100.0
            }
        }
    }
}

/// Format a delta with an explicit `+` for non-negative values.
///
/// Absolute deltas use the metric's format; percentage deltas always render
/// as a percentage, whatever the metric's format.
pub fn format_delta(delta: f64, mode: DeltaMode, format: ValueFormat) -> String {
    if !delta.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let sign = if delta >= 0.0 { "+" } else { "" };
    match mode {
        DeltaMode::Abs => format!("{sign}{}", format_value(delta, format)),
        DeltaMode::Pct => format!("{sign}{}%", to_fixed(delta, 1)),
    }
}

/// Fixed-point rendering of the exact binary value with `digits` decimals.
///
/// Exact halfway cases round away from zero. Negative zero prints as zero.
pub(crate) fn to_fixed(value: f64, digits: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };

    let Some(scaled) = rounded_tie(value, digits) else {
        return format!("{:.*}", digits, value);
    };

    let sign = if value < 0.0 { "-" } else { "" };
    if digits == 0 {
        return format!("{sign}{scaled}");
    }

    let divisor = 10u128.pow(digits as u32);
    format!(
        "{sign}{}.{:0width$}",
        scaled / divisor,
        scaled % divisor,
        width = digits
    )
}

/// When `value` lies exactly halfway between two `digits`-decimal outputs,
/// returns its magnitude rounded away from zero and scaled by `10^digits`.
fn rounded_tie(value: f64, digits: usize) -> Option<u128> {
    if value.fract() == 0.0 {
        return None;
    }

    // A tie needs |value| * 10^(digits+1) to be an integer ending in 5,
    // which requires at most digits+1 fractional bits.
    let k = digits as u32 + 1;
    let binary = value.abs() * f64::from(1u32 << k);
    if binary.fract() != 0.0 {
        return None;
    }

    let decimal = (binary as u128) * 5u128.pow(k);
    if decimal % 10 != 5 {
        return None;
    }
    Some(decimal / 10 + 1)
}
