pub mod codec;
pub mod dispatch;
pub mod distance;
pub mod kind;
pub mod records;
pub mod speed;
pub mod summary;
pub mod types;

use codec::Decoder;
use dispatch::{DerivedMessages, reencode};
use distance::integrate;
use kind::MessageKind;
use records::{apply_overrides, record_overrides, speed_samples};
use summary::{LAP_LAYOUT, SESSION_LAYOUT, reconcile};
use tracing::debug;

pub use types::{DerivedTotals, FitProcessError, ProcessedFit};

/// Derive speed and distance from power and write them back into the file.
///
/// The stages run in order and any failure aborts the run:
/// 1. [`Decoder::is_fit`] and [`Decoder::check_integrity`] reject foreign or
///    corrupted buffers before anything is decoded.
/// 2. [`Decoder::read`] groups the data messages by kind.
/// 3. [`records::speed_samples`] converts each record's power to speed and
///    [`distance::integrate`] folds them into cumulative distances.
/// 4. [`summary::reconcile`] patches the first lap and the first session.
/// 5. [`dispatch::reencode`] writes every collection back out.
pub fn process_fit_bytes(bytes: &[u8]) -> Result<ProcessedFit, FitProcessError> {
    let decoder = Decoder::new(bytes);
    if !decoder.is_fit() {
        return Err(FitProcessError::Format(
            "missing FIT header or signature".into(),
        ));
    }
    decoder.check_integrity()?;

    let header = decoder.header()?;
    let decoded = decoder.read()?;

    let records = decoded.messages(MessageKind::Record);
    let samples = speed_samples(records)?;
    let integration = integrate(&samples);
    let totals = DerivedTotals {
        total_distance: integration.total_distance,
        max_speed: integration.max_speed,
        record_count: records.len(),
    };
    debug!(
        records = totals.record_count,
        total_distance = totals.total_distance,
        max_speed = totals.max_speed,
        "integrated distance"
    );

    let lap = decoded
        .first(MessageKind::Lap)
        .map(|lap| reconcile(lap, LAP_LAYOUT, &totals))
        .transpose()?;
    let session = decoded
        .first(MessageKind::Session)
        .map(|session| reconcile(session, SESSION_LAYOUT, &totals))
        .transpose()?;

    let derived = DerivedMessages {
        records: apply_overrides(records, &record_overrides(&samples, &integration)),
        lap,
        session,
    };
    let processed_bytes = reencode(&header, &decoded, &derived)?;

    Ok(ProcessedFit {
        processed_bytes,
        totals,
    })
}

/// Download name for a processed upload: `activity.fit` becomes
/// `activity-edited.fit`.
pub fn edited_file_name(original: &str) -> String {
    let stem = match original.len().checked_sub(4) {
        Some(split)
            if original.is_char_boundary(split)
                && original[split..].eq_ignore_ascii_case(".fit") =>
        {
            &original[..split]
        }
        _ => original,
    };
    format!("{stem}-edited.fit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::codec::{Encoder, Field, Message};
    use crate::processing::records::tests::record;
    use crate::processing::records::{DISTANCE_FIELD, SPEED_FIELD};
    use crate::processing::summary::tests::summary;

    fn encode(messages: &[Message]) -> Vec<u8> {
        let mut encoder = Encoder::new(0x20, 2132);
        for message in messages {
            encoder.on_mesg(message).expect("encodes");
        }
        encoder.close().expect("closes")
    }

    fn decode(bytes: &[u8]) -> codec::MessageSet {
        Decoder::new(bytes).read().expect("decodes")
    }

    #[test]
    fn single_record_counts_one_second() {
        let bytes = encode(&[record(1_000, 30)]);
        let processed = process_fit_bytes(&bytes).expect("processes");
        let output = decode(&processed.processed_bytes);

        let record = output.first(MessageKind::Record).expect("record");
        assert_eq!(record.uint(SPEED_FIELD), Some(3_900));
        assert_eq!(record.uint(DISTANCE_FIELD), Some(390));
        assert_eq!(processed.totals.max_speed, 3.9);
    }

    #[test]
    fn lap_and_session_are_reconciled_separately() {
        let bytes = encode(&[
            record(1_000, 10),
            record(1_002, 10),
            summary(MessageKind::Lap, 3_000),
            summary(MessageKind::Session, 6_000),
        ]);
        let processed = process_fit_bytes(&bytes).expect("processes");
        let output = decode(&processed.processed_bytes);

        let lap = output.first(MessageKind::Lap).expect("lap");
        assert_eq!(lap.uint(9), Some(570));
        assert_eq!(lap.uint(13), Some(1_900));
        assert_eq!(lap.uint(14), Some(1_900));

        let session = output.first(MessageKind::Session).expect("session");
        assert_eq!(session.uint(9), Some(570));
        assert_eq!(session.uint(14), Some(950));
        assert_eq!(session.uint(15), Some(1_900));
    }

    #[test]
    fn zero_elapsed_lap_fails_with_data_error() {
        let bytes = encode(&[record(1_000, 10), summary(MessageKind::Lap, 0)]);
        assert!(matches!(
            process_fit_bytes(&bytes),
            Err(FitProcessError::Data(_))
        ));
    }

    #[test]
    fn foreign_bytes_fail_with_format_error() {
        assert!(matches!(
            process_fit_bytes(b"PK\x03\x04 definitely a zip archive"),
            Err(FitProcessError::Format(_))
        ));
    }

    #[test]
    fn corrupted_crc_fails_with_integrity_error() {
        let mut bytes = encode(&[record(1_000, 10)]);
        if let Some(last) = bytes.last_mut() {
            *last ^= 0xFF;
        }
        assert!(matches!(
            process_fit_bytes(&bytes),
            Err(FitProcessError::Integrity(_))
        ));
    }

    #[test]
    fn file_without_records_keeps_other_messages() {
        let file_id = Message::new(MessageKind::FileId).with_field(Field::uint32(3, 99));
        let bytes = encode(&[file_id.clone()]);
        let processed = process_fit_bytes(&bytes).expect("processes");

        assert_eq!(processed.totals, DerivedTotals::default());
        let output = decode(&processed.processed_bytes);
        assert_eq!(output.first(MessageKind::FileId), Some(&file_id));
    }

    #[test]
    fn edited_names_keep_the_fit_extension() {
        assert_eq!(edited_file_name("activity.fit"), "activity-edited.fit");
        assert_eq!(edited_file_name("Morning Ride.FIT"), "Morning Ride-edited.fit");
        assert_eq!(edited_file_name("ride"), "ride-edited.fit");
        assert_eq!(edited_file_name("a.fit.gz"), "a.fit.gz-edited.fit");
        assert_eq!(edited_file_name(""), "-edited.fit");
    }
}
