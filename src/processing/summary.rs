use crate::processing::codec::{Field, Message, scaled_u16, scaled_u32};
use crate::processing::speed::round2;
use crate::processing::types::{DerivedTotals, FitProcessError};

/// Field numbers of a summary message. Lap and session share the semantics
/// but not the numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLayout {
    pub name: &'static str,
    pub total_elapsed_time: u8,
    pub total_distance: u8,
    pub avg_speed: u8,
    pub max_speed: u8,
    pub enhanced_avg_speed: u8,
    pub enhanced_max_speed: u8,
}

pub const LAP_LAYOUT: SummaryLayout = SummaryLayout {
    name: "lap",
    total_elapsed_time: 7,
    total_distance: 9,
    avg_speed: 13,
    max_speed: 14,
    enhanced_avg_speed: 110,
    enhanced_max_speed: 111,
};

pub const SESSION_LAYOUT: SummaryLayout = SummaryLayout {
    name: "session",
    total_elapsed_time: 7,
    total_distance: 9,
    avg_speed: 14,
    max_speed: 15,
    enhanced_avg_speed: 124,
    enhanced_max_speed: 125,
};

const TIME_SCALE: f64 = 1000.0;
const DISTANCE_SCALE: f64 = 100.0;
const SPEED_SCALE: f64 = 1000.0;

/// Return a copy of `message` with distance and speed totals replaced.
///
/// Average speed divides the unrounded total by the message's own elapsed time; a missing or
/// zero elapsed time is reported instead of writing a non-finite value.
pub fn reconcile(
    message: &Message,
    layout: SummaryLayout,
    totals: &DerivedTotals,
) -> Result<Message, FitProcessError> {
    let elapsed_seconds = message
        .uint(layout.total_elapsed_time)
        .map(|raw| raw as f64 / TIME_SCALE)
        .ok_or_else(|| {
            FitProcessError::Data(format!("{} has no total elapsed time", layout.name))
        })?;

    let total_distance = round2(totals.total_distance);
    let avg_speed = round2(totals.total_distance / elapsed_seconds);
    let max_speed = round2(totals.max_speed);

    if !avg_speed.is_finite() || !total_distance.is_finite() || !max_speed.is_finite() {
        return Err(FitProcessError::Data(format!(
            "{} elapsed time of {elapsed_seconds}s gives a non-finite average speed",
            layout.name
        )));
    }

    let mut reconciled = message.clone();
    reconciled.set_field(Field::uint32(
        layout.total_distance,
        scaled_u32(total_distance, DISTANCE_SCALE),
    ));
    reconciled.set_field(Field::uint16(
        layout.avg_speed,
        scaled_u16(avg_speed, SPEED_SCALE),
    ));
    reconciled.set_field(Field::uint16(
        layout.max_speed,
        scaled_u16(max_speed, SPEED_SCALE),
    ));

    if message.has_field(layout.enhanced_avg_speed) {
        reconciled.set_field(Field::uint32(
            layout.enhanced_avg_speed,
            scaled_u32(avg_speed, SPEED_SCALE),
        ));
    }
    if message.has_field(layout.enhanced_max_speed) {
        reconciled.set_field(Field::uint32(
            layout.enhanced_max_speed,
            scaled_u32(max_speed, SPEED_SCALE),
        ));
    }

    Ok(reconciled)
}
