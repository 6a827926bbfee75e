use crate::{
    Error, Result,
    cbor::{
        MINOR_EIGHT_BYTES, MINOR_FOUR_BYTES, MINOR_ONE_BYTE, MINOR_TWO_BYTES, Major,
        SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE,
    },
    util::cold_path,
};

/// Writes CBOR items into a caller-owned, fixed-size buffer.
///
/// The writer never grows the buffer. When an item does not fit it stops
/// writing and keeps counting, so after the walk [`Writer::bytes_needed`]
/// reports the full size while [`Writer::bytes_serialized`] reports what was
/// actually written before space ran out.
///
/// # Example
///
/// ```
/// use argmap::cbor::Writer;
///
/// let mut buf = [0u8; 16];
/// let mut writer = Writer::new(&mut buf);
/// writer.start_map(1);
/// writer.encode_map_key("n");
/// writer.add_u16(1234);
/// writer.end_map();
/// assert!(writer.result().is_ok());
/// assert_eq!(writer.as_bytes(), &[0xa1, 0x61, b'n', 0x19, 0x04, 0xd2]);
/// ```
pub struct Writer<'b> {
    buf: &'b mut [u8],
    needed: usize,
    written: usize,
    overflow: bool,
    depth: usize,
    null_terminate: bool,
}

impl<'b> Writer<'b> {
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self {
            buf,
            needed: 0,
            written: 0,
            overflow: false,
            depth: 0,
            null_terminate: false,
        }
    }

    /// Appends a NUL byte to every text string, for C readers.
    pub fn set_null_terminate(&mut self, null_terminate: bool) {
        self.null_terminate = null_terminate;
    }

    /// Switches to a new buffer and resets the counters.
    pub fn init_buffer(&mut self, buf: &'b mut [u8]) {
        self.buf = buf;
        self.restart();
    }

    pub fn restart(&mut self) {
        self.needed = 0;
        self.written = 0;
        self.overflow = false;
        self.depth = 0;
    }

    /// `Ok` unless some item did not fit the buffer.
    pub fn result(&self) -> Result<()> {
        if self.overflow {
            Err(Error::BufferTooSmall {
                needed: self.needed,
                capacity: self.buf.len(),
            })
        } else {
            Ok(())
        }
    }

    #[inline]
    pub fn bytes_serialized(&self) -> usize {
        self.written
    }

    #[inline]
    pub fn bytes_needed(&self) -> usize {
        self.needed
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.written]
    }

    fn write(&mut self, bytes: &[u8]) {
        if !self.overflow {
            let end = self.written + bytes.len();
            if end <= self.buf.len() {
                self.buf[self.written..end].copy_from_slice(bytes);
                self.written = end;
            } else {
                cold_path();
                self.overflow = true;
                #[cfg(feature = "logging")]
                log::debug!(
                    "encode buffer of {} bytes exhausted, measuring only",
                    self.buf.len()
                );
            }
        }
        self.needed += bytes.len();
    }

    /// Checks that `len` more bytes fit; when they do not, the writer
    /// switches to measurement-only mode. Follow with [`Writer::store_byte`].
    pub fn reserve_bytes(&mut self, len: usize) -> bool {
        if !self.overflow && self.written + len > self.buf.len() {
            cold_path();
            self.overflow = true;
        }
        !self.overflow
    }

    #[inline]
    pub fn store_byte(&mut self, byte: u8) {
        self.write(&[byte]);
    }

    /// Writes a header with the shortest argument encoding.
    pub fn encode_header(&mut self, major: Major, arg: u64) {
        if arg < u64::from(MINOR_ONE_BYTE) {
            self.store_byte(major.initial_byte(arg as u8));
        } else if let Ok(arg) = u8::try_from(arg) {
            self.write(&[major.initial_byte(MINOR_ONE_BYTE), arg]);
        } else if let Ok(arg) = u16::try_from(arg) {
            self.encode_sized(major, arg.into(), 2);
        } else if let Ok(arg) = u32::try_from(arg) {
            self.encode_sized(major, arg.into(), 4);
        } else {
            self.encode_sized(major, arg, 8);
        }
    }

    /// Writes a header whose argument occupies exactly `width` bytes
    /// (2, 4 or 8). Width 1 falls back to the shortest one-byte form.
    pub fn encode_sized(&mut self, major: Major, arg: u64, width: usize) {
        let be = arg.to_be_bytes();
        let (minor, bytes) = match width {
            2 => (MINOR_TWO_BYTES, &be[6..]),
            4 => (MINOR_FOUR_BYTES, &be[4..]),
            8 => (MINOR_EIGHT_BYTES, &be[..]),
            _ => return self.encode_header(major, arg.min(u8::MAX.into())),
        };
        let mut header = [0u8; 9];
        header[0] = major.initial_byte(minor);
        header[1..=bytes.len()].copy_from_slice(bytes);
        self.write(&header[..=bytes.len()]);
    }

    #[inline]
    pub fn encode_tag(&mut self, tag: u64) {
        self.encode_header(Major::Tag, tag);
    }

    #[inline]
    pub fn encode_map_key(&mut self, key: &str) {
        self.add_text(key);
    }

    /// Opens a map of `len` pairs; pair it with [`Writer::end_map`].
    pub fn start_map(&mut self, len: usize) {
        self.encode_header(Major::Map, len as u64);
        self.depth += 1;
    }

    pub fn end_map(&mut self) {
        debug_assert!(self.depth > 0, "end_map without start_map");
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn add_null(&mut self) {
        self.store_byte(Major::Simple.initial_byte(SIMPLE_NULL));
    }

    pub fn add_bool(&mut self, value: bool) {
        let simple = if value { SIMPLE_TRUE } else { SIMPLE_FALSE };
        self.store_byte(Major::Simple.initial_byte(simple));
    }

    pub fn add_f32(&mut self, value: f32) {
        self.encode_sized(Major::Simple, value.to_bits().into(), 4);
    }

    pub fn add_f64(&mut self, value: f64) {
        self.encode_sized(Major::Simple, value.to_bits(), 8);
    }

    pub fn add_text(&mut self, text: &str) {
        if self.null_terminate {
            self.encode_header(Major::Text, text.len() as u64 + 1);
            self.write(text.as_bytes());
            self.store_byte(0);
        } else {
            self.encode_header(Major::Text, text.len() as u64);
            self.write(text.as_bytes());
        }
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) {
        self.encode_header(Major::Bytes, bytes.len() as u64);
        self.write(bytes);
    }
}

macro_rules! add_unsigned {
    ($($name:ident: $ty:ty => $width:expr),* $(,)?) => {
        impl Writer<'_> {
            $(
                /// Writes the value with the argument width of its type, so
                /// the reader can restore the type.
                #[inline]
                pub fn $name(&mut self, value: $ty) {
                    self.encode_sized(Major::Unsigned, value.into(), $width);
                }
            )*
        }
    };
}

macro_rules! add_signed {
    ($($name:ident: $ty:ty => $width:expr),* $(,)?) => {
        impl Writer<'_> {
            $(
                /// Non-negative values use the unsigned major type; negative
                /// ones store `-1 - value` under the negative major type.
                #[inline]
                pub fn $name(&mut self, value: $ty) {
                    if value >= 0 {
                        self.encode_sized(Major::Unsigned, value as u64, $width);
                    } else {
                        self.encode_sized(Major::Negative, (!value) as u64, $width);
                    }
                }
            )*
        }
    };
}

add_unsigned! {
    add_u8: u8 => 1,
    add_u16: u16 => 2,
    add_u32: u32 => 4,
    add_u64: u64 => 8,
}

add_signed! {
    add_i8: i8 => 1,
    add_i16: i16 => 2,
    add_i32: i32 => 4,
    add_i64: i64 => 8,
}
