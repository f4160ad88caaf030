//! Minimal FIT container codec: header and CRC validation, definition/data
//! message decoding into a [`MessageSet`], and a writer that emits
//! definitions on demand.

pub mod base_type;
pub mod crc;
pub mod decode;
pub mod encode;
pub mod message;

pub use base_type::BaseType;
pub use decode::{Decoder, FitHeader};
pub use encode::{Encoder, scaled_u16, scaled_u32};
pub use message::{DeveloperField, Field, Message, MessageSet};
