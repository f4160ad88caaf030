use crate::processing::codec::base_type::BaseType;
use crate::processing::kind::MessageKind;

/// One regular field of a data message. Values are stored little-endian
/// regardless of the architecture of the definition they were read with.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub number: u8,
    pub base_type: BaseType,
    pub bytes: Vec<u8>,
}

impl Field {
    pub fn new(number: u8, base_type: BaseType, bytes: Vec<u8>) -> Self {
        Self {
            number,
            base_type,
            bytes,
        }
    }

    pub fn uint16(number: u8, value: u16) -> Self {
        Self::new(number, BaseType::UInt16, value.to_le_bytes().to_vec())
    }

    pub fn uint32(number: u8, value: u32) -> Self {
        Self::new(number, BaseType::UInt32, value.to_le_bytes().to_vec())
    }

    /// A field counts as populated when at least one element is not the
    /// invalid sentinel of its base type.
    pub fn is_populated(&self) -> bool {
        match self.base_type {
            BaseType::String => self.bytes.first().is_some_and(|byte| *byte != 0),
            base_type => self
                .bytes
                .chunks(base_type.size())
                .any(|element| element.len() == base_type.size() && base_type.is_valid_element(element)),
        }
    }

    /// Read the first element as an unsigned integer, ignoring invalid values.
    pub fn as_u64(&self) -> Option<u64> {
        let size = match self.base_type {
            BaseType::Enum
            | BaseType::UInt8
            | BaseType::UInt8z
            | BaseType::Byte
            | BaseType::UInt16
            | BaseType::UInt16z
            | BaseType::UInt32
            | BaseType::UInt32z
            | BaseType::UInt64
            | BaseType::UInt64z => self.base_type.size(),
            _ => return None,
        };
        let element = self.bytes.get(..size)?;
        if !self.base_type.is_valid_element(element) {
            return None;
        }
        let mut buffer = [0u8; 8];
        buffer[..size].copy_from_slice(element);
        Some(u64::from_le_bytes(buffer))
    }
}

/// Developer data is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct DeveloperField {
    pub number: u8,
    pub developer_index: u8,
    pub bytes: Vec<u8>,
}

/// A decoded data message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub fields: Vec<Field>,
    pub developer_fields: Vec<DeveloperField>,
}

impl Message {
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            developer_fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.set_field(field);
        self
    }

    pub fn field(&self, number: u8) -> Option<&Field> {
        self.fields.iter().find(|field| field.number == number)
    }

    pub fn has_field(&self, number: u8) -> bool {
        self.field(number).is_some()
    }

    /// Unsigned value of a field, `None` when absent or invalid.
    pub fn uint(&self, number: u8) -> Option<u64> {
        self.field(number).and_then(Field::as_u64)
    }

    /// Replace the field with the same number, or append it.
    pub fn set_field(&mut self, field: Field) {
        match self
            .fields
            .iter_mut()
            .find(|existing| existing.number == field.number)
        {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.developer_fields.is_empty() && !self.fields.iter().any(Field::is_populated)
    }
}

/// Decoded messages grouped by kind. Collections keep the order in which
/// their kind first appeared in the file; messages inside a collection keep
/// file order.
#[derive(Debug, Clone, Default)]
pub struct MessageSet {
    collections: Vec<(MessageKind, Vec<Message>)>,
}

impl MessageSet {
    pub fn push(&mut self, message: Message) {
        match self
            .collections
            .iter_mut()
            .find(|(kind, _)| *kind == message.kind)
        {
            Some((_, messages)) => messages.push(message),
            None => self.collections.push((message.kind, vec![message])),
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = MessageKind> + '_ {
        self.collections.iter().map(|(kind, _)| *kind)
    }

    pub fn collections(&self) -> impl Iterator<Item = (MessageKind, &[Message])> + '_ {
        self.collections
            .iter()
            .map(|(kind, messages)| (*kind, messages.as_slice()))
    }

    pub fn messages(&self, kind: MessageKind) -> &[Message] {
        self.collections
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn first(&self, kind: MessageKind) -> Option<&Message> {
        self.messages(kind).first()
    }

    pub fn len(&self) -> usize {
        self.collections
            .iter()
            .map(|(_, messages)| messages.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
