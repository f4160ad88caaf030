//! Reader for the FIT container.
//!
//! A FIT file is laid out as:
//!
//! * A header whose first byte declares its own size (12 or 14 bytes), a
//!   4-byte data length at offset 4, the `.FIT` signature at offset 8 and,
//!   for 14-byte headers, a CRC over the first 12 bytes.
//! * A data section alternating definition messages, which describe the
//!   layout bound to a local message number, and data messages that follow
//!   the latest definition for their local number.
//! * A trailing CRC covering the header and the data section.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::processing::codec::base_type::BaseType;
use crate::processing::codec::crc::calculate_crc;
use crate::processing::codec::message::{DeveloperField, Field, Message, MessageSet};
use crate::processing::kind::MessageKind;
use crate::processing::types::FitProcessError;

const SIGNATURE: &[u8; 4] = b".FIT";

/// The parts of the input header carried over to the re-encoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitHeader {
    pub header_size: usize,
    pub protocol_version: u8,
    pub profile_version: u16,
    pub data_size: usize,
}

#[derive(Clone, Debug)]
struct FieldDefinition {
    number: u8,
    size: u8,
    base_type: u8,
}

#[derive(Clone, Debug)]
struct DeveloperFieldDefinition {
    number: u8,
    size: u8,
    developer_index: u8,
}

#[derive(Clone, Debug)]
struct MessageDefinition {
    kind: MessageKind,
    big_endian: bool,
    fields: Vec<FieldDefinition>,
    developer_fields: Vec<DeveloperFieldDefinition>,
}

pub struct Decoder<'a> {
    bytes: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Check the header size byte and the `.FIT` signature.
    pub fn is_fit(&self) -> bool {
        let Some(&header_size) = self.bytes.first() else {
            return false;
        };
        matches!(header_size, 12 | 14)
            && self.bytes.len() >= header_size as usize
            && &self.bytes[8..12] == SIGNATURE
    }

    pub fn header(&self) -> Result<FitHeader, FitProcessError> {
        if !self.is_fit() {
            return Err(FitProcessError::Format(
                "missing FIT header or signature".into(),
            ));
        }

        Ok(FitHeader {
            header_size: self.bytes[0] as usize,
            protocol_version: self.bytes[1],
            profile_version: u16::from_le_bytes([self.bytes[2], self.bytes[3]]),
            data_size: u32::from_le_bytes([
                self.bytes[4],
                self.bytes[5],
                self.bytes[6],
                self.bytes[7],
            ]) as usize,
        })
    }

    /// Validate declared sizes, the header CRC (when present and non-zero)
    /// and the trailing file CRC.
    pub fn check_integrity(&self) -> Result<(), FitProcessError> {
        let header = self.header()?;
        let file_end = header.header_size + header.data_size + 2;

        if self.bytes.len() < file_end {
            return Err(FitProcessError::Integrity(format!(
                "file is {} bytes but the header declares {file_end}",
                self.bytes.len()
            )));
        }

        if header.header_size == 14 {
            let stored = u16::from_le_bytes([self.bytes[12], self.bytes[13]]);
            if stored != 0 && stored != calculate_crc(&self.bytes[..12]) {
                return Err(FitProcessError::Integrity("header CRC mismatch".into()));
            }
        }

        let crc_offset = file_end - 2;
        let stored = u16::from_le_bytes([self.bytes[crc_offset], self.bytes[crc_offset + 1]]);
        if stored != calculate_crc(&self.bytes[..crc_offset]) {
            return Err(FitProcessError::Integrity("file CRC mismatch".into()));
        }

        if self.bytes.len() > file_end {
            warn!(
                trailing_bytes = self.bytes.len() - file_end,
                "ignoring data after the first FIT file"
            );
        }

        Ok(())
    }

    /// Decode every data message of the first FIT file in the buffer.
    pub fn read(&self) -> Result<MessageSet, FitProcessError> {
        let header = self.header()?;
        let data_end = header.header_size + header.data_size;
        let data_section = self
            .bytes
            .get(header.header_size..data_end)
            .ok_or_else(|| FitProcessError::Integrity("data section truncated".into()))?;

        let messages = decode_data_section(data_section)?;
        debug!(
            messages = messages.len(),
            kinds = messages.kinds().count(),
            "decoded FIT data section"
        );
        Ok(messages)
    }
}

const TIMESTAMP_FIELD: u8 = 253;
const TIME_OFFSET_MASK: u32 = 0x1F;

fn decode_data_section(data_section: &[u8]) -> Result<MessageSet, FitProcessError> {
    let mut offset = 0usize;
    let mut definitions: HashMap<u8, MessageDefinition> = HashMap::new();
    let mut messages = MessageSet::default();
    let mut last_timestamp: Option<u32> = None;

    while offset < data_section.len() {
        let header = data_section[offset];
        offset += 1;

        // Compressed timestamp header: local number in bits 5-6, time offset
        // in bits 0-4.
        let (local_message_num, time_offset) = if header & 0x80 != 0 {
            ((header >> 5) & 0x03, Some(u32::from(header) & TIME_OFFSET_MASK))
        } else {
            (header & 0x0F, None)
        };

        if time_offset.is_none() && header & 0x40 != 0 {
            let has_developer_data = header & 0x20 != 0;
            let (definition, consumed) =
                read_definition(&data_section[offset..], has_developer_data)?;
            offset += consumed;
            definitions.insert(local_message_num, definition);
            continue;
        }

        let definition = definitions.get(&local_message_num).ok_or_else(|| {
            FitProcessError::malformed(format!(
                "data message for local number {local_message_num} has no definition"
            ))
        })?;
        let (mut message, consumed) = read_data_message(&data_section[offset..], definition)?;
        offset += consumed;

        if let Some(time_offset) = time_offset {
            let reference = last_timestamp.unwrap_or_else(|| {
                warn!("compressed timestamp before any full timestamp");
                0
            });
            message.set_field(Field::uint32(
                TIMESTAMP_FIELD,
                expand_timestamp(reference, time_offset),
            ));
        }
        if let Some(timestamp) = message.uint(TIMESTAMP_FIELD) {
            last_timestamp = u32::try_from(timestamp).ok();
        }
        messages.push(message);
    }

    Ok(messages)
}

/// Rebuild a full timestamp from the low five bits carried by a compressed
/// header, rolling over when the offset is below the reference's low bits.
fn expand_timestamp(reference: u32, time_offset: u32) -> u32 {
    let delta = time_offset.wrapping_sub(reference & TIME_OFFSET_MASK) & TIME_OFFSET_MASK;
    reference.wrapping_add(delta)
}

fn read_definition(
    bytes: &[u8],
    has_developer_data: bool,
) -> Result<(MessageDefinition, usize), FitProcessError> {
    let fixed = bytes
        .get(..5)
        .ok_or_else(|| FitProcessError::malformed("definition message truncated"))?;
    let big_endian = fixed[1] != 0;
    let global_mesg_num_bytes = [fixed[2], fixed[3]];
    let global_mesg_num = if big_endian {
        u16::from_be_bytes(global_mesg_num_bytes)
    } else {
        u16::from_le_bytes(global_mesg_num_bytes)
    };
    let num_fields = fixed[4] as usize;
    let mut offset = 5;

    let mut fields = Vec::with_capacity(num_fields);
    for _ in 0..num_fields {
        let raw = bytes
            .get(offset..offset + 3)
            .ok_or_else(|| FitProcessError::malformed("field definition truncated"))?;
        fields.push(FieldDefinition {
            number: raw[0],
            size: raw[1],
            base_type: raw[2],
        });
        offset += 3;
    }

    let mut developer_fields = Vec::new();
    if has_developer_data {
        let dev_count = *bytes
            .get(offset)
            .ok_or_else(|| FitProcessError::malformed("missing developer field count"))?
            as usize;
        offset += 1;

        developer_fields.reserve(dev_count);
        for _ in 0..dev_count {
            let raw = bytes
                .get(offset..offset + 3)
                .ok_or_else(|| FitProcessError::malformed("developer field truncated"))?;
            developer_fields.push(DeveloperFieldDefinition {
                number: raw[0],
                size: raw[1],
                developer_index: raw[2],
            });
            offset += 3;
        }
    }

    Ok((
        MessageDefinition {
            kind: MessageKind::from_mesg_num(global_mesg_num),
            big_endian,
            fields,
            developer_fields,
        },
        offset,
    ))
}

fn read_data_message(
    bytes: &[u8],
    definition: &MessageDefinition,
) -> Result<(Message, usize), FitProcessError> {
    let mut offset = 0usize;
    let mut message = Message::new(definition.kind);

    for field in &definition.fields {
        let size = field.size as usize;
        let raw = bytes
            .get(offset..offset + size)
            .ok_or_else(|| FitProcessError::malformed("data message truncated"))?;
        offset += size;

        // Unknown base types are kept as opaque bytes.
        let base_type = BaseType::from_raw(field.base_type).unwrap_or(BaseType::Byte);
        let value = if definition.big_endian {
            to_little_endian(raw, base_type.size())
        } else {
            raw.to_vec()
        };
        message.fields.push(Field::new(field.number, base_type, value));
    }

    for dev_field in &definition.developer_fields {
        let size = dev_field.size as usize;
        let raw = bytes
            .get(offset..offset + size)
            .ok_or_else(|| FitProcessError::malformed("developer data message truncated"))?;
        offset += size;
        message.developer_fields.push(DeveloperField {
            number: dev_field.number,
            developer_index: dev_field.developer_index,
            bytes: raw.to_vec(),
        });
    }

    Ok((message, offset))
}

/// Swap every element of a big-endian field. Fields whose size is not a
/// multiple of the element size are left as they are.
fn to_little_endian(raw: &[u8], element_size: usize) -> Vec<u8> {
    if element_size <= 1 || raw.len() % element_size != 0 {
        return raw.to_vec();
    }
    raw.chunks(element_size)
        .flat_map(|element| element.iter().rev().copied())
        .collect()
}
