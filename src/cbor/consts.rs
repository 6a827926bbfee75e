/// The eight CBOR major types, taken from the top three bits of an item's
/// initial byte.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Major {
    Unsigned = 0,
    Negative = 1,
    Bytes = 2,
    Text = 3,
    Array = 4,
    Map = 5,
    Tag = 6,
    Simple = 7,
}

impl Major {
    #[inline]
    pub const fn from_initial_byte(byte: u8) -> Self {
        match byte >> 5 {
            0 => Self::Unsigned,
            1 => Self::Negative,
            2 => Self::Bytes,
            3 => Self::Text,
            4 => Self::Array,
            5 => Self::Map,
            6 => Self::Tag,
            _ => Self::Simple,
        }
    }

    /// Returns `true` for byte and text strings, whose header is followed
    /// by raw payload bytes.
    #[inline]
    pub const fn is_string(self) -> bool {
        matches!(self, Self::Bytes | Self::Text)
    }

    #[inline]
    pub const fn initial_byte(self, minor: u8) -> u8 {
        ((self as u8) << 5) | (minor & 0x1f)
    }
}

pub const SIMPLE_FALSE: u8 = 20;
pub const SIMPLE_TRUE: u8 = 21;
pub const SIMPLE_NULL: u8 = 22;
pub const SIMPLE_UNDEFINED: u8 = 23;
pub const MINOR_ONE_BYTE: u8 = 24;
pub const MINOR_TWO_BYTES: u8 = 25;
pub const MINOR_FOUR_BYTES: u8 = 26;
pub const MINOR_EIGHT_BYTES: u8 = 27;

/// A sequence of elements sharing one wire type (RFC 8746).
pub const TAG_HOMOGENEOUS_ARRAY: u64 = 41;
/// Extended time (RFC 9581), used for timestamps.
pub const TAG_TIMESTAMP: u64 = 1001;
/// Duration (RFC 9581).
pub const TAG_DURATION: u64 = 1002;

/// Key of the whole-seconds entry in a time map.
pub const TIME_KEY_SECONDS: i64 = 1;
/// Key of the nanosecond entry in a time map.
pub const TIME_KEY_NANOS: i64 = -9;

pub const TAG_UINT8_ARRAY: u64 = 64;
pub const TAG_UINT16LE_ARRAY: u64 = 69;
pub const TAG_UINT32LE_ARRAY: u64 = 70;
pub const TAG_UINT64LE_ARRAY: u64 = 71;
pub const TAG_SINT8_ARRAY: u64 = 72;
pub const TAG_SINT16LE_ARRAY: u64 = 77;
pub const TAG_SINT32LE_ARRAY: u64 = 78;
pub const TAG_SINT64LE_ARRAY: u64 = 79;
pub const TAG_FLOAT32LE_ARRAY: u64 = 85;
pub const TAG_FLOAT64LE_ARRAY: u64 = 86;
