use std::f64::consts::PI;

// All of these round up. A reported violation (crash speed, distance to the defense area, ...)
// must never look smaller on the board than what was actually measured.

/// Rounds `value` up to `digits` decimal places
fn ceil_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    // Adding zero turns -0.0 into 0.0, otherwise tiny negative values would print as "-0.0"
    (value * scale).ceil() / scale + 0.0
}

/// Radians to whole degrees, e.g. `90°`
pub fn rad_to_deg(rad: impl Into<f64>) -> String {
    format!("{}°", ceil_to(rad.into() * 180.0 / PI, 0))
}

/// e.g. `2.1m/s`
pub fn velocity(v: impl Into<f64>) -> String {
    format!("{:.1}m/s", ceil_to(v.into(), 1))
}

/// e.g. `1.01m`
pub fn distance(v: impl Into<f64>) -> String {
    format!("{:.2}m", ceil_to(v.into(), 2))
}

/// e.g. `0.1s`
pub fn seconds(v: impl Into<f64>) -> String {
    format!("{:.1}s", ceil_to(v.into(), 1))
}
