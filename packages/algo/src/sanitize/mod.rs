//! Input Sanitization
//!
//! Telemetry from a live session is noisy: zero response times, stale mastery
//! slightly out of range, NaN from a bad division upstream. Every algorithm
//! routes its inputs through these helpers so it can always return a usable
//! result instead of failing the session.

/// Clamp into `[min, max]`. NaN maps to `min`, infinities to the nearer bound.
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Clamp into `[0, 1]`.
pub fn clamp_unit(value: f64) -> f64 {
    clamp_finite(value, 0.0, 1.0)
}

/// Clamp a 0-100 score.
pub fn clamp_score(value: f64) -> f64 {
    clamp_finite(value, 0.0, 100.0)
}

/// Non-negative quantity (durations, times). NaN and -inf become 0.
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Replace a non-finite value with `fallback`.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Round half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `numerator / denominator` capped at 1.0.
///
/// A non-positive denominator means "no time spent", which is treated as
/// full efficiency. A non-positive numerator yields 0.
pub fn capped_ratio(numerator: f64, denominator: f64) -> f64 {
    let numerator = non_negative(numerator);
    let denominator = non_negative(denominator);
    if numerator <= 0.0 {
        return 0.0;
    }
    if denominator <= 0.0 || (denominator.is_infinite() && numerator.is_infinite()) {
        return 1.0;
    }
    (numerator / denominator).min(1.0)
}
