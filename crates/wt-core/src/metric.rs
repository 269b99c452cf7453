//! Helpers for metrics that may be undefined.
//!
//! A metric that was never observed, or whose denominator is zero, is carried
//! as `None` and rendered as [`NAN_MARKER`] in flat files.  It is never
//! substituted with zero: a zero queue delay and an unknown one mean very
//! different things downstream.

/// Marker written in place of an undefined metric.
pub const NAN_MARKER: &str = "nan";

/// `num / den`, or `None` when `den` is zero.
#[inline]
pub fn ratio(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 { None } else { Some(num / den) }
}

/// Render a metric for a CSV cell.  `None` and NaN both become `"nan"`.
pub fn fmt_metric(v: Option<f64>) -> String {
    match v {
        Some(x) if !x.is_nan() => x.to_string(),
        _ => NAN_MARKER.to_owned(),
    }
}
