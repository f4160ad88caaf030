use tracing::debug;

use crate::processing::codec::{Encoder, FitHeader, Message, MessageSet};
use crate::processing::kind::{MessageKind, canonical_name};
use crate::processing::types::FitProcessError;

/// Messages produced by the derivation pass that replace their originals.
#[derive(Debug, Clone, Default)]
pub struct DerivedMessages {
    pub records: Vec<Message>,
    pub lap: Option<Message>,
    pub session: Option<Message>,
}

/// Re-emit every collection of the decoded file, substituting derived
/// records and summaries, and return the finished FIT bytes.
///
/// Collections are written in the order their kind first appeared. Only the
/// first lap and session survive, since those are the ones reconciled.
/// Other messages pass through unchanged unless they carry no values.
pub fn reencode(
    header: &FitHeader,
    decoded: &MessageSet,
    derived: &DerivedMessages,
) -> Result<Vec<u8>, FitProcessError> {
    let mut encoder = Encoder::new(header.protocol_version, header.profile_version);

    for (kind, messages) in decoded.collections() {
        let collection = kind.collection_name();
        let resolved = MessageKind::from_collection_name(&collection).unwrap_or(kind);
        let written = match resolved {
            MessageKind::Session => write_all(&mut encoder, derived.session.iter())?,
            MessageKind::Lap => write_all(&mut encoder, derived.lap.iter())?,
            MessageKind::Record => write_all(&mut encoder, derived.records.iter())?,
            _ => write_all(
                &mut encoder,
                messages.iter().filter(|message| !message.is_empty()),
            )?,
        };
        debug!(
            %collection,
            message_type = %canonical_name(&collection),
            decoded = messages.len(),
            written,
            "re-encoded collection"
        );
    }

    encoder.close()
}

fn write_all<'a>(
    encoder: &mut Encoder,
    messages: impl Iterator<Item = &'a Message>,
) -> Result<usize, FitProcessError> {
    let mut written = 0;
    for message in messages {
        encoder.on_mesg(message)?;
        written += 1;
    }
    Ok(written)
}
