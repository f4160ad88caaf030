/// Power-to-speed calibration as `(upper bound in watts, m/s per watt)`.
///
/// Bounds are inclusive and checked in order. The table was fitted against a
/// Stages SC3 indoor bike and is intentionally discontinuous at the
/// breakpoints.
const CALIBRATION: [(f64, f64); 5] = [
    (20.0, 0.19),
    (50.0, 0.13),
    (100.0, 0.085),
    (180.0, 0.0614),
    (250.0, 0.0429),
];

/// Coefficient for power above the last breakpoint.
const ABOVE_CALIBRATION: f64 = 0.0359;

/// Speed in m/s for an instantaneous power sample, rounded to 3 decimals.
pub fn speed_from_power(power: f64) -> f64 {
    let coefficient = CALIBRATION
        .iter()
        .find(|(upper, _)| power <= *upper)
        .map(|(_, coefficient)| *coefficient)
        .unwrap_or(ABOVE_CALIBRATION);

    round3(power * coefficient)
}

/// Round half away from zero to 3 decimals.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Round half away from zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
