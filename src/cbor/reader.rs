use crate::{
    Error, Result,
    cbor::{
        MAX_DEPTH, MINOR_EIGHT_BYTES, MINOR_FOUR_BYTES, MINOR_ONE_BYTE, MINOR_TWO_BYTES, Major,
        SIMPLE_FALSE, SIMPLE_TRUE,
    },
    util::cold_path,
};

/// The header of one wire item, as returned by [`Reader::next_field`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub major: Major,
    /// Low five bits of the initial byte.
    pub minor: u8,
    /// The innermost tag in front of the item, if any.
    pub tag: Option<u64>,
    /// Integer value, string length, element or pair count, or the raw bits
    /// of a simple value or float.
    pub arg: u64,
    /// Length of the item's own header, tags excluded. For integers this
    /// tells the width the writer chose: 1 or 2 for 8-bit, 3 for 16-bit,
    /// 5 for 32-bit and 9 for 64-bit values.
    pub header_len: usize,
    /// Offset of the first byte after the header.
    pub offset: usize,
}

impl Field {
    /// The simple value number for major type 7 items that are not floats.
    pub fn simple(&self) -> Option<u8> {
        match (self.major, self.minor) {
            (Major::Simple, minor @ 0..MINOR_ONE_BYTE) => Some(minor),
            (Major::Simple, MINOR_ONE_BYTE) => Some(self.arg as u8),
            _ => None,
        }
    }
}

/// Values that can be read straight out of a [`Field`] header.
pub trait FieldValue: Sized {
    fn from_field(field: &Field) -> Option<Self>;
}

impl FieldValue for u64 {
    fn from_field(field: &Field) -> Option<Self> {
        (field.major == Major::Unsigned).then_some(field.arg)
    }
}

impl FieldValue for i128 {
    fn from_field(field: &Field) -> Option<Self> {
        match field.major {
            Major::Unsigned => Some(field.arg.into()),
            Major::Negative => Some(-1 - i128::from(field.arg)),
            _ => None,
        }
    }
}

impl FieldValue for i64 {
    fn from_field(field: &Field) -> Option<Self> {
        i128::from_field(field).and_then(|v| i64::try_from(v).ok())
    }
}

impl FieldValue for bool {
    fn from_field(field: &Field) -> Option<Self> {
        match field.simple()? {
            SIMPLE_FALSE => Some(false),
            SIMPLE_TRUE => Some(true),
            _ => None,
        }
    }
}

impl FieldValue for f32 {
    fn from_field(field: &Field) -> Option<Self> {
        match (field.major, field.minor) {
            (Major::Simple, MINOR_TWO_BYTES) => Some(half_to_f32(field.arg as u16)),
            (Major::Simple, MINOR_FOUR_BYTES) => Some(f32::from_bits(field.arg as u32)),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    fn from_field(field: &Field) -> Option<Self> {
        match (field.major, field.minor) {
            (Major::Simple, MINOR_EIGHT_BYTES) => Some(f64::from_bits(field.arg)),
            _ => f32::from_field(field).map(f64::from),
        }
    }
}

fn half_to_f32(bits: u16) -> f32 {
    let exponent = (bits >> 10) & 0x1f;
    let mantissa = u32::from(bits & 0x3ff);
    let magnitude = match exponent {
        0 => mantissa as f32 * f32::powi(2.0, -24),
        0x1f if mantissa == 0 => f32::INFINITY,
        0x1f => f32::NAN,
        _ => f32::from_bits(((u32::from(exponent) + 112) << 23) | (mantissa << 13)),
    };
    if bits & 0x8000 != 0 { -magnitude } else { magnitude }
}

/// Reads CBOR items out of a borrowed buffer.
///
/// Definite lengths only: an indefinite-length item or a reserved
/// additional-info value is reported as [`Error::InvalidHeader`].
///
/// # Example
///
/// ```
/// use argmap::cbor::{Major, Reader};
///
/// let data = [0xa1, 0x61, b'n', 0x19, 0x04, 0xd2];
/// let mut reader = Reader::new(&data);
///
/// let map = reader.next_field().unwrap();
/// assert_eq!((map.major, map.arg), (Major::Map, 1));
///
/// let key = reader.next_field().unwrap();
/// assert_eq!(reader.payload(&key).unwrap(), b"n");
///
/// let value = reader.next_field().unwrap();
/// assert_eq!(reader.field_value::<u64>(&value), Some(1234));
/// assert_eq!(value.header_len, 3);
/// assert!(reader.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn init_buffer(&mut self, data: &'a [u8]) {
        self.data = data;
        self.restart();
    }

    pub fn restart(&mut self) {
        self.pos = 0;
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            cold_path();
            return Err(Error::EndOfFile);
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_header(&mut self) -> Result<(Major, u8, u64, usize)> {
        let initial = self.take(1)?[0];
        let major = Major::from_initial_byte(initial);
        let minor = initial & 0x1f;
        let width = match minor {
            0..MINOR_ONE_BYTE => return Ok((major, minor, minor.into(), 1)),
            MINOR_ONE_BYTE => 1,
            MINOR_TWO_BYTES => 2,
            MINOR_FOUR_BYTES => 4,
            MINOR_EIGHT_BYTES => 8,
            _ => {
                cold_path();
                return Err(Error::InvalidHeader(initial));
            }
        };
        let arg = self
            .take(width)?
            .iter()
            .fold(0u64, |arg, &byte| (arg << 8) | u64::from(byte));
        Ok((major, minor, arg, 1 + width))
    }

    /// Consumes any tags and the header of the next item. String payloads
    /// and container contents are left for [`Reader::payload`],
    /// [`Reader::skip_field`] or further `next_field` calls.
    pub fn next_field(&mut self) -> Result<Field> {
        let mut tag = None;
        loop {
            let (major, minor, arg, header_len) = self.read_header()?;
            if major == Major::Tag {
                tag = Some(arg);
                continue;
            }
            return Ok(Field {
                major,
                minor,
                tag,
                arg,
                header_len,
                offset: self.pos,
            });
        }
    }

    /// Returns the next field without consuming anything.
    pub fn peek_field(&self) -> Result<Field> {
        self.clone().next_field()
    }

    /// Consumes the payload of a byte or text string.
    pub fn payload(&mut self, field: &Field) -> Result<&'a [u8]> {
        debug_assert!(field.major.is_string());
        let len = usize::try_from(field.arg).map_err(|_| Error::EndOfFile)?;
        self.take(len)
    }

    /// Reads an integer, boolean or float out of the header.
    #[inline]
    pub fn field_value<T: FieldValue>(&self, field: &Field) -> Option<T> {
        T::from_field(field)
    }

    /// Consumes whatever follows the header of `field`: string payloads and
    /// every nested item of arrays and maps.
    pub fn skip_field(&mut self, field: &Field) -> Result<()> {
        self.skip_nested(field, 0)
    }

    fn skip_nested(&mut self, field: &Field, depth: usize) -> Result<()> {
        match field.major {
            Major::Bytes | Major::Text => self.payload(field).map(drop),
            Major::Array | Major::Map => {
                if depth >= MAX_DEPTH {
                    cold_path();
                    return Err(Error::NestingTooDeep(MAX_DEPTH));
                }
                let items = if field.major == Major::Map {
                    field.arg.saturating_mul(2)
                } else {
                    field.arg
                };
                for _ in 0..items {
                    let child = self.next_field()?;
                    self.skip_nested(&child, depth + 1)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::half_to_f32;

    #[test]
    fn half_precision() {
        assert_eq!(half_to_f32(0x3c00), 1.0);
        assert_eq!(half_to_f32(0xc000), -2.0);
        assert_eq!(half_to_f32(0x7bff), 65504.0);
        assert_eq!(half_to_f32(0x0001), 5.960_464_5e-8);
        assert_eq!(half_to_f32(0x7c00), f32::INFINITY);
        assert!(half_to_f32(0x7e00).is_nan());
    }
}
