use crate::processing::codec::crc::calculate_crc;
use crate::processing::codec::message::Message;
use crate::processing::types::FitProcessError;

const HEADER_SIZE: u8 = 14;
const LOCAL_MESSAGE_SLOTS: usize = 16;

/// Layout of a data message as written into a definition message.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Layout {
    global_mesg_num: u16,
    fields: Vec<(u8, u8, u8)>,
    developer_fields: Vec<(u8, u8, u8)>,
}

impl Layout {
    fn of(message: &Message) -> Result<Self, FitProcessError> {
        let mut fields = Vec::with_capacity(message.fields.len());
        for field in &message.fields {
            fields.push((
                field.number,
                field_size(field.bytes.len())?,
                field.base_type.as_raw(),
            ));
        }

        let mut developer_fields = Vec::with_capacity(message.developer_fields.len());
        for field in &message.developer_fields {
            developer_fields.push((
                field.number,
                field_size(field.bytes.len())?,
                field.developer_index,
            ));
        }

        Ok(Self {
            global_mesg_num: message.kind.mesg_num(),
            fields,
            developer_fields,
        })
    }
}

fn field_size(len: usize) -> Result<u8, FitProcessError> {
    len.try_into()
        .map_err(|_| FitProcessError::malformed(format!("field of {len} bytes is too large")))
}

/// Writes messages into a fresh little-endian FIT file.
///
/// Definitions are only emitted when a message's layout is not already bound
/// to one of the sixteen local message numbers.
pub struct Encoder {
    protocol_version: u8,
    profile_version: u16,
    data: Vec<u8>,
    slots: Vec<Layout>,
    next_slot: usize,
}

impl Encoder {
    pub fn new(protocol_version: u8, profile_version: u16) -> Self {
        Self {
            protocol_version,
            profile_version,
            data: Vec::new(),
            slots: Vec::with_capacity(LOCAL_MESSAGE_SLOTS),
            next_slot: 0,
        }
    }

    pub fn on_mesg(&mut self, message: &Message) -> Result<(), FitProcessError> {
        let layout = Layout::of(message)?;
        let local_message_num = match self.slots.iter().position(|slot| *slot == layout) {
            Some(slot) => slot,
            None => self.bind(layout),
        };

        self.data.push(local_message_num as u8);
        for field in &message.fields {
            self.data.extend_from_slice(&field.bytes);
        }
        for field in &message.developer_fields {
            self.data.extend_from_slice(&field.bytes);
        }
        Ok(())
    }

    fn bind(&mut self, layout: Layout) -> usize {
        let slot = self.next_slot;
        self.next_slot = (self.next_slot + 1) % LOCAL_MESSAGE_SLOTS;

        let has_developer_data = !layout.developer_fields.is_empty();
        let mut header = 0x40 | slot as u8;
        if has_developer_data {
            header |= 0x20;
        }

        self.data.push(header);
        self.data.push(0); // reserved
        self.data.push(0); // little-endian
        self.data.extend_from_slice(&layout.global_mesg_num.to_le_bytes());
        self.data.push(layout.fields.len() as u8);
        for (number, size, base_type) in &layout.fields {
            self.data.extend_from_slice(&[*number, *size, *base_type]);
        }
        if has_developer_data {
            self.data.push(layout.developer_fields.len() as u8);
            for (number, size, developer_index) in &layout.developer_fields {
                self.data
                    .extend_from_slice(&[*number, *size, *developer_index]);
            }
        }

        if slot < self.slots.len() {
            self.slots[slot] = layout;
        } else {
            self.slots.push(layout);
        }
        slot
    }

    /// Frame the data section with a header and both CRCs.
    pub fn close(self) -> Result<Vec<u8>, FitProcessError> {
        let data_len: u32 = self
            .data
            .len()
            .try_into()
            .map_err(|_| FitProcessError::malformed("data section too large"))?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE as usize + self.data.len() + 2);
        bytes.push(HEADER_SIZE);
        bytes.push(self.protocol_version);
        bytes.extend_from_slice(&self.profile_version.to_le_bytes());
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.extend_from_slice(b".FIT");
        let header_crc = calculate_crc(&bytes);
        bytes.extend_from_slice(&header_crc.to_le_bytes());

        bytes.extend_from_slice(&self.data);
        let data_crc = calculate_crc(&bytes);
        bytes.extend_from_slice(&data_crc.to_le_bytes());

        Ok(bytes)
    }
}

/// Scale a physical value into an unsigned 16-bit field, saturating below
/// the invalid sentinel.
pub fn scaled_u16(value: f64, scale: f64) -> u16 {
    let scaled = (value * scale).round();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, (u16::MAX - 1) as f64) as u16
}

/// Scale a physical value into an unsigned 32-bit field, saturating below
/// the invalid sentinel.
pub fn scaled_u32(value: f64, scale: f64) -> u32 {
    let scaled = (value * scale).round();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, (u32::MAX - 1) as f64) as u32
}
