use tracing::warn;

use crate::processing::speed::round2;

/// One record reduced to what the integrator needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSample {
    /// Seconds since the FIT epoch.
    pub timestamp: i64,
    /// Speed in m/s, already rounded to 3 decimals.
    pub speed: f64,
}

/// State threaded through the fold.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    last_timestamp: Option<i64>,
    total_distance: f64,
    max_speed: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Integration {
    /// Cumulative distance at each sample, rounded to 2 decimals.
    pub distances: Vec<f64>,
    pub total_distance: f64,
    /// Highest sample speed, 0 when there are no samples.
    pub max_speed: f64,
}

/// Integrate speed over wall-clock time in sample order.
///
/// The first sample counts for one second. Later samples use the gap to the
/// previous timestamp as-is, so repeated or out-of-order timestamps add
/// nothing or subtract distance.
pub fn integrate(samples: &[SpeedSample]) -> Integration {
    let (accumulator, distances) = samples.iter().fold(
        (Accumulator::default(), Vec::with_capacity(samples.len())),
        |(accumulator, mut distances), sample| {
            let delta_time = match accumulator.last_timestamp {
                Some(last) => sample.timestamp - last,
                None => 1,
            };
            if delta_time < 0 {
                warn!(
                    timestamp = sample.timestamp,
                    delta_time, "record timestamp goes backwards"
                );
            }

            let total_distance = accumulator.total_distance + sample.speed * delta_time as f64;
            distances.push(round2(total_distance));

            let next = Accumulator {
                last_timestamp: Some(sample.timestamp),
                total_distance,
                max_speed: accumulator.max_speed.max(sample.speed),
            };
            (next, distances)
        },
    );

    Integration {
        distances,
        total_distance: accumulator.total_distance,
        max_speed: accumulator.max_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp: i64, speed: f64) -> SpeedSample {
        SpeedSample { timestamp, speed }
    }

    #[test]
    fn empty_input_yields_zero_totals() {
        let integration = integrate(&[]);
        assert!(integration.distances.is_empty());
        assert_eq!(integration.total_distance, 0.0);
        assert_eq!(integration.max_speed, 0.0);
    }

    #[test]
    fn first_sample_counts_one_second() {
        let integration = integrate(&[sample(1_000, 3.9)]);
        assert_eq!(integration.distances, vec![3.9]);
        assert_eq!(integration.max_speed, 3.9);
    }

    #[test]
    fn later_samples_use_elapsed_time() {
        let integration = integrate(&[sample(1_000, 1.9), sample(1_002, 1.9)]);
        assert_eq!(integration.distances, vec![1.9, 5.7]);
        assert!((integration.total_distance - 5.7).abs() < 1e-9);
    }

    #[test]
    fn repeated_timestamps_add_nothing() {
        let integration = integrate(&[sample(50, 2.0), sample(50, 8.0)]);
        assert_eq!(integration.distances, vec![2.0, 2.0]);
        assert_eq!(integration.max_speed, 8.0);
    }

    #[test]
    fn backwards_timestamps_subtract_distance() {
        let integration = integrate(&[sample(10, 2.0), sample(13, 2.0), sample(12, 2.0)]);
        assert_eq!(integration.distances, vec![2.0, 8.0, 6.0]);
    }

    #[test]
    fn accumulates_unrounded_total() {
        let samples: Vec<_> = (0..3).map(|i| sample(i, 0.333)).collect();
        let integration = integrate(&samples);
        assert_eq!(integration.distances, vec![0.33, 0.67, 1.0]);
        assert!((integration.total_distance - 0.999).abs() < 1e-9);
    }
}
