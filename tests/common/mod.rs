#![allow(dead_code)]

use fitdistance::processing::codec::crc::calculate_crc;
use fitdistance::processing::codec::{BaseType, Encoder, Field, Message};
use fitdistance::processing::kind::MessageKind;

pub const START: u32 = 1_000_000_000;

pub fn file_id() -> Message {
    Message::new(MessageKind::FileId)
        .with_field(Field::new(0, BaseType::Enum, vec![4]))
        .with_field(Field::uint16(1, 1))
        .with_field(Field::uint32(4, START))
}

pub fn record(offset: u32, power: u16) -> Message {
    Message::new(MessageKind::Record)
        .with_field(Field::uint32(253, START + offset))
        .with_field(Field::uint16(7, power))
}

pub fn event(offset: u32) -> Message {
    Message::new(MessageKind::Event)
        .with_field(Field::uint32(253, START + offset))
        .with_field(Field::new(0, BaseType::Enum, vec![0]))
        .with_field(Field::new(1, BaseType::Enum, vec![0]))
}

pub fn lap(elapsed_ms: u32) -> Message {
    Message::new(MessageKind::Lap)
        .with_field(Field::uint32(253, START))
        .with_field(Field::uint32(7, elapsed_ms))
        .with_field(Field::uint32(8, elapsed_ms))
}

pub fn session(elapsed_ms: u32) -> Message {
    Message::new(MessageKind::Session)
        .with_field(Field::uint32(253, START))
        .with_field(Field::uint32(7, elapsed_ms))
        .with_field(Field::uint32(8, elapsed_ms))
        .with_field(Field::new(5, BaseType::Enum, vec![2]))
}

pub fn encode(messages: &[Message]) -> Vec<u8> {
    let mut encoder = Encoder::new(0x20, 2132);
    for message in messages {
        encoder.on_mesg(message).expect("fixture message encodes");
    }
    encoder.close().expect("fixture closes")
}

/// Wrap a hand-written data section in a 14-byte header and both CRCs.
pub fn frame(data_section: &[u8]) -> Vec<u8> {
    let mut bytes = vec![14, 0x20, 0x54, 0x08];
    bytes.extend_from_slice(&(data_section.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b".FIT");
    let header_crc = calculate_crc(&bytes);
    bytes.extend_from_slice(&header_crc.to_le_bytes());
    bytes.extend_from_slice(data_section);
    let crc = calculate_crc(&bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes
}

/// A short indoor ride: file id, start event, four power samples, lap and
/// session summaries.
pub fn indoor_ride() -> Vec<u8> {
    encode(&[
        file_id(),
        event(0),
        record(0, 10),
        record(2, 10),
        record(3, 120),
        record(5, 300),
        lap(5_000),
        session(5_000),
    ])
}

/// Look up a decoded field by name. Speed fields may surface under their
/// enhanced name once fitparser expands components.
pub fn field_value(record: &fitparser::FitDataRecord, name: &str) -> Option<f64> {
    let enhanced = format!("enhanced_{name}");
    record
        .fields()
        .iter()
        .find(|field| field.name() == name)
        .or_else(|| record.fields().iter().find(|field| field.name() == enhanced))
        .and_then(|field| fit_value_to_f64(field.value()))
}

fn fit_value_to_f64(value: &fitparser::Value) -> Option<f64> {
    match value {
        fitparser::Value::Float32(v) => Some(*v as f64),
        fitparser::Value::Float64(v) => Some(*v),
        fitparser::Value::UInt16(v) => Some(*v as f64),
        fitparser::Value::UInt32(v) => Some(*v as f64),
        fitparser::Value::UInt8(v) => Some(*v as f64),
        fitparser::Value::SInt16(v) => Some(*v as f64),
        fitparser::Value::SInt32(v) => Some(*v as f64),
        _ => None,
    }
}
