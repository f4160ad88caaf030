use tracing::{debug, warn};

use crate::processing::codec::{Field, Message, scaled_u16, scaled_u32};
use crate::processing::distance::{Integration, SpeedSample};
use crate::processing::speed::speed_from_power;
use crate::processing::types::FitProcessError;

pub const TIMESTAMP_FIELD: u8 = 253;
pub const DISTANCE_FIELD: u8 = 5;
pub const SPEED_FIELD: u8 = 6;
pub const POWER_FIELD: u8 = 7;
pub const ENHANCED_SPEED_FIELD: u8 = 73;

const DISTANCE_SCALE: f64 = 100.0;
const SPEED_SCALE: f64 = 1000.0;

/// Derived values written back onto one record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecordOverrides {
    pub speed: f64,
    pub distance: f64,
}

/// Read timestamp and power from each record and convert power to speed.
///
/// Records without a power reading count as 0 W; records without a
/// timestamp cannot be placed in time and abort the run.
pub fn speed_samples(records: &[Message]) -> Result<Vec<SpeedSample>, FitProcessError> {
    let mut missing_power = 0usize;
    let mut samples = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let timestamp = record.uint(TIMESTAMP_FIELD).ok_or_else(|| {
            FitProcessError::malformed(format!("record {index} has no timestamp"))
        })?;
        let power = match record.uint(POWER_FIELD) {
            Some(power) => power as f64,
            None => {
                missing_power += 1;
                0.0
            }
        };

        samples.push(SpeedSample {
            timestamp: timestamp as i64,
            speed: speed_from_power(power),
        });
    }

    if missing_power > 0 {
        warn!(
            records = missing_power,
            "records without power were treated as 0 W"
        );
    }
    debug!(records = samples.len(), "derived speed from power");

    Ok(samples)
}

pub fn record_overrides(samples: &[SpeedSample], integration: &Integration) -> Vec<RecordOverrides> {
    samples
        .iter()
        .zip(&integration.distances)
        .map(|(sample, distance)| RecordOverrides {
            speed: sample.speed,
            distance: *distance,
        })
        .collect()
}

/// Copy the records with speed and distance populated. `enhanced_speed` is
/// only rewritten when the record already carries it.
pub fn apply_overrides(records: &[Message], overrides: &[RecordOverrides]) -> Vec<Message> {
    records
        .iter()
        .zip(overrides)
        .map(|(record, overrides)| {
            let mut annotated = record.clone();
            annotated.set_field(Field::uint16(
                SPEED_FIELD,
                scaled_u16(overrides.speed, SPEED_SCALE),
            ));
            annotated.set_field(Field::uint32(
                DISTANCE_FIELD,
                scaled_u32(overrides.distance, DISTANCE_SCALE),
            ));
            if record.has_field(ENHANCED_SPEED_FIELD) {
                annotated.set_field(Field::uint32(
                    ENHANCED_SPEED_FIELD,
                    scaled_u32(overrides.speed, SPEED_SCALE),
                ));
            }
            annotated
        })
        .collect()
}
