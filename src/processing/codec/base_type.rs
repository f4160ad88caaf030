/// FIT base types as they appear in the low five bits of a field definition.
///
/// The high bit of the raw base type byte flags multi-byte values and is not
/// part of the identity of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Enum,
    SInt8,
    UInt8,
    SInt16,
    UInt16,
    SInt32,
    UInt32,
    String,
    Float32,
    Float64,
    UInt8z,
    UInt16z,
    UInt32z,
    Byte,
    SInt64,
    UInt64,
    UInt64z,
}

impl BaseType {
    pub fn from_raw(raw: u8) -> Option<Self> {
        let base_type = match raw & 0x1F {
            0x00 => BaseType::Enum,
            0x01 => BaseType::SInt8,
            0x02 => BaseType::UInt8,
            0x03 => BaseType::SInt16,
            0x04 => BaseType::UInt16,
            0x05 => BaseType::SInt32,
            0x06 => BaseType::UInt32,
            0x07 => BaseType::String,
            0x08 => BaseType::Float32,
            0x09 => BaseType::Float64,
            0x0A => BaseType::UInt8z,
            0x0B => BaseType::UInt16z,
            0x0C => BaseType::UInt32z,
            0x0D => BaseType::Byte,
            0x0E => BaseType::SInt64,
            0x0F => BaseType::UInt64,
            0x10 => BaseType::UInt64z,
            _ => return None,
        };
        Some(base_type)
    }

    /// Raw byte written into definition messages, including the endian flag.
    pub fn as_raw(self) -> u8 {
        match self {
            BaseType::Enum => 0x00,
            BaseType::SInt8 => 0x01,
            BaseType::UInt8 => 0x02,
            BaseType::SInt16 => 0x83,
            BaseType::UInt16 => 0x84,
            BaseType::SInt32 => 0x85,
            BaseType::UInt32 => 0x86,
            BaseType::String => 0x07,
            BaseType::Float32 => 0x88,
            BaseType::Float64 => 0x89,
            BaseType::UInt8z => 0x0A,
            BaseType::UInt16z => 0x8B,
            BaseType::UInt32z => 0x8C,
            BaseType::Byte => 0x0D,
            BaseType::SInt64 => 0x8E,
            BaseType::UInt64 => 0x8F,
            BaseType::UInt64z => 0x90,
        }
    }

    /// Size in bytes of a single element.
    pub fn size(self) -> usize {
        match self {
            BaseType::Enum
            | BaseType::SInt8
            | BaseType::UInt8
            | BaseType::String
            | BaseType::UInt8z
            | BaseType::Byte => 1,
            BaseType::SInt16 | BaseType::UInt16 | BaseType::UInt16z => 2,
            BaseType::SInt32 | BaseType::UInt32 | BaseType::Float32 | BaseType::UInt32z => 4,
            BaseType::Float64 | BaseType::SInt64 | BaseType::UInt64 | BaseType::UInt64z => 8,
        }
    }

    /// Little-endian bytes of the "no value" sentinel for one element.
    pub fn invalid_bytes(self) -> Vec<u8> {
        let invalid: u64 = match self {
            BaseType::Enum | BaseType::UInt8 | BaseType::Byte => 0xFF,
            BaseType::SInt8 => 0x7F,
            BaseType::SInt16 => 0x7FFF,
            BaseType::UInt16 => 0xFFFF,
            BaseType::SInt32 => 0x7FFF_FFFF,
            BaseType::UInt32 | BaseType::Float32 => 0xFFFF_FFFF,
            BaseType::Float64 | BaseType::UInt64 => u64::MAX,
            BaseType::SInt64 => 0x7FFF_FFFF_FFFF_FFFF,
            BaseType::String | BaseType::UInt8z | BaseType::UInt16z | BaseType::UInt32z => 0,
            BaseType::UInt64z => 0,
        };
        invalid.to_le_bytes()[..self.size()].to_vec()
    }

    /// Whether a little-endian element holds a real value.
    pub fn is_valid_element(self, element: &[u8]) -> bool {
        element != self.invalid_bytes().as_slice()
    }
}
