//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Whole-number percentage of `part` in `whole`, 0 when `whole` is zero.
#[must_use]
pub fn percent_u32(part: u32, whole: u32) -> i32 {
    if whole == 0 {
        return 0;
    }
    round_f64_to_i32(f64::from(part) / f64::from(whole) * 100.0)
}
