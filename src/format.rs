//! Rounding and text helpers shared by the forecast and current-weather views.

/// Round to the nearest integer, halves toward positive infinity
/// (-2.5 becomes -2, 2.5 becomes 3).
pub fn round_half_up(value: f64) -> i64 {
    let nearest = value.round();
    // `round` sends halves away from zero; negative halves go up instead
    if (nearest - value).abs() == 0.5 {
        value.ceil() as i64
    } else {
        nearest as i64
    }
}

/// Round to one decimal place
pub fn round_1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Uppercase the first character only; the rest is left untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
