//! Raw user input normalisation
//!
//! Inputs are never rejected: they are clamped into range.

/// Parse `raw` as a number and clamp it into `[min, max]`.
///
/// - surrounding whitespace is ignored, empty text counts as `0`
/// - text that is not a number yields `min`
/// - fractions truncate toward zero, infinities clamp to the nearest bound
pub fn clamp_raw(raw: &str, min: u32, max: u32) -> u32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return clamp(0, min, max);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_nan() => clamp_float(value, min, max),
        _ => min,
    }
}

/// Clamp an integer into `[min, max]`.
pub fn clamp(value: i64, min: u32, max: u32) -> u32 {
    value.clamp(i64::from(min), i64::from(max)) as u32
}

fn clamp_float(value: f64, min: u32, max: u32) -> u32 {
    let value = value.trunc();
    if value <= f64::from(min) {
        min
    } else if value >= f64::from(max) {
        max
    } else {
        value as u32
    }
}
