use std::io::Write;

use crate::{
    ArgList, ArgMap, Result, Variant, Vector,
    cbor::{
        MAX_DEPTH, Major, SIMPLE_FALSE, SIMPLE_TRUE, TAG_DURATION, TAG_HOMOGENEOUS_ARRAY,
        TAG_TIMESTAMP, TIME_KEY_NANOS, TIME_KEY_SECONDS, Writer, typed,
    },
    registry::registry,
    util::cold_path,
};

/// Text written in place of values that have no wire form.
const PLACEHOLDER: &str = "Error";

/// Options shared by encoding helpers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodecConfig {
    /// Write every text string with a trailing NUL byte. Decoding strips
    /// trailing NULs either way.
    pub null_terminate: bool,
}

/// Encodes an [`ArgMap`] tree into a caller-owned buffer.
///
/// Null entries of maps are left out. Scalars map onto native CBOR items,
/// numeric vectors onto little-endian typed arrays, other vectors onto
/// homogeneous arrays, and timestamps and durations onto extended time
/// maps. Custom values are converted to maps through the
/// [registry](crate::registry). Complex numbers have no wire form and are
/// written as the text `"Error"`.
///
/// # Example
///
/// ```
/// use argmap::{ArgMap, Encoder};
///
/// let map = ArgMap::new();
/// map.set("count", 1234u16);
///
/// let mut buf = [0u8; 64];
/// let mut encoder = Encoder::new(&mut buf);
/// let len = encoder.encode(&map).unwrap();
/// assert_eq!(len, 10);
/// assert_eq!(encoder.bytes_needed(), 10);
/// ```
pub struct Encoder<'b> {
    writer: Writer<'b>,
}

impl<'b> Encoder<'b> {
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self::with_config(buf, CodecConfig::default())
    }

    pub fn with_config(buf: &'b mut [u8], config: CodecConfig) -> Self {
        let mut writer = Writer::new(buf);
        writer.set_null_terminate(config.null_terminate);
        Self { writer }
    }

    /// Appends the encoding of `map` and returns the total bytes written.
    ///
    /// When the buffer is too small the walk still completes in
    /// measurement-only mode and [`Error::BufferTooSmall`] carries the size
    /// a retry needs.
    ///
    /// [`Error::BufferTooSmall`]: crate::Error::BufferTooSmall
    pub fn encode(&mut self, map: &ArgMap) -> Result<usize> {
        self.write_map(map, 0);
        self.writer.result().map(|()| self.writer.bytes_serialized())
    }

    pub fn result(&self) -> Result<()> {
        self.writer.result()
    }

    pub fn bytes_serialized(&self) -> usize {
        self.writer.bytes_serialized()
    }

    pub fn bytes_needed(&self) -> usize {
        self.writer.bytes_needed()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.writer.as_bytes()
    }

    /// Switches to a new buffer and resets the counters.
    pub fn init_buffer(&mut self, buf: &'b mut [u8]) {
        self.writer.init_buffer(buf);
    }

    pub fn restart(&mut self) {
        self.writer.restart();
    }

    fn write_map(&mut self, map: &ArgMap, depth: usize) {
        let mut len = 0;
        map.for_each_entry(|_, value| len += usize::from(!value.is_null()));

        self.writer.start_map(len);
        map.for_each_entry(|key, value| {
            if !value.is_null() {
                self.writer.encode_map_key(key);
                self.write_variant(value, depth + 1);
            }
        });
        self.writer.end_map();
    }

    fn write_list(&mut self, list: &ArgList, depth: usize) {
        self.writer.encode_header(Major::Array, list.len() as u64);
        list.for_each_item(|item| self.write_variant(item, depth + 1));
    }

    fn write_variant(&mut self, value: &Variant, depth: usize) {
        if depth > MAX_DEPTH {
            cold_path();
            #[cfg(feature = "logging")]
            log::warn!("value nested deeper than {MAX_DEPTH} levels written as null");
            self.writer.add_null();
            return;
        }

        match value {
            Variant::Null => self.writer.add_null(),
            Variant::Bool(v) => self.writer.add_bool(*v),
            Variant::Int8(v) => self.writer.add_i8(*v),
            Variant::Int16(v) => self.writer.add_i16(*v),
            Variant::Int32(v) => self.writer.add_i32(*v),
            Variant::Int64(v) => self.writer.add_i64(*v),
            Variant::UInt8(v) => self.writer.add_u8(*v),
            Variant::UInt16(v) => self.writer.add_u16(*v),
            Variant::UInt32(v) => self.writer.add_u32(*v),
            Variant::UInt64(v) => self.writer.add_u64(*v),
            Variant::Float32(v) => self.writer.add_f32(*v),
            Variant::Float64(v) => self.writer.add_f64(*v),
            Variant::Complex32(_) | Variant::Complex64(_) => self.write_placeholder(value),
            Variant::String(v) => self.writer.add_text(v),
            Variant::Map(map) => self.write_map(map, depth),
            Variant::List(list) => self.write_list(list, depth),
            Variant::Timestamp(t) => self.write_time(TAG_TIMESTAMP, t.split()),
            Variant::Duration(d) => self.write_time(TAG_DURATION, d.split()),
            Variant::Custom(custom) => {
                let map = registry().to_arg_map(custom);
                self.write_map(&map, depth);
            }
            Variant::Vector(vector) => self.write_vector(vector, value),
        }
    }

    fn write_int(&mut self, value: i64) {
        if value >= 0 {
            self.writer.encode_header(Major::Unsigned, value as u64);
        } else {
            self.writer.encode_header(Major::Negative, !value as u64);
        }
    }

    fn write_time(&mut self, tag: u64, (secs, nanos): (i64, u32)) {
        self.writer.encode_tag(tag);
        self.writer.start_map(2);
        self.write_int(TIME_KEY_SECONDS);
        self.write_int(secs);
        self.write_int(TIME_KEY_NANOS);
        self.write_int(nanos.into());
        self.writer.end_map();
    }

    fn write_vector(&mut self, vector: &Vector, value: &Variant) {
        match vector {
            Vector::Bool(items) => {
                let items = items.borrow();
                self.writer.encode_tag(TAG_HOMOGENEOUS_ARRAY);
                self.writer.encode_header(Major::Array, items.len() as u64);
                self.writer.reserve_bytes(items.len());
                for &item in items.iter() {
                    let simple = if item { SIMPLE_TRUE } else { SIMPLE_FALSE };
                    self.writer.store_byte(Major::Simple.initial_byte(simple));
                }
            }
            Vector::String(items) => {
                let items = items.borrow();
                self.writer.encode_tag(TAG_HOMOGENEOUS_ARRAY);
                self.writer.encode_header(Major::Array, items.len() as u64);
                for item in items.iter() {
                    self.writer.add_text(item);
                }
            }
            Vector::Timestamp(items) => {
                let items = items.borrow();
                self.writer.encode_tag(TAG_HOMOGENEOUS_ARRAY);
                self.writer.encode_header(Major::Array, items.len() as u64);
                for item in items.iter() {
                    self.write_time(TAG_TIMESTAMP, item.split());
                }
            }
            Vector::Duration(items) => {
                let items = items.borrow();
                self.writer.encode_tag(TAG_HOMOGENEOUS_ARRAY);
                self.writer.encode_header(Major::Array, items.len() as u64);
                for item in items.iter() {
                    self.write_time(TAG_DURATION, item.split());
                }
            }
            Vector::Complex32(_) | Vector::Complex64(_) => self.write_placeholder(value),
            numeric => {
                let written = typed::write_vector(&mut self.writer, numeric);
                debug_assert!(written, "every numeric vector has a typed-array form");
            }
        }
    }

    fn write_placeholder(&mut self, value: &Variant) {
        #[cfg(feature = "logging")]
        log::warn!(
            "{} value has no wire form, writing a placeholder",
            value.type_tag().name()
        );
        #[cfg(not(feature = "logging"))]
        let _ = value;
        self.writer.add_text(PLACEHOLDER);
    }
}

impl ArgMap {
    /// Size in bytes of this map's encoding.
    pub fn encoded_len(&self) -> usize {
        self.encoded_len_with(CodecConfig::default())
    }

    pub fn encoded_len_with(&self, config: CodecConfig) -> usize {
        let mut empty = [0u8; 0];
        let mut encoder = Encoder::with_config(&mut empty, config);
        let _ = encoder.encode(self);
        encoder.bytes_needed()
    }

    /// Encodes into a vector sized from a measuring pass.
    ///
    /// # Example
    ///
    /// ```
    /// use argmap::ArgMap;
    ///
    /// let map = ArgMap::from([("name", "Glenn")]);
    /// assert_eq!(map.to_vec(), [0xa1, 0x64, b'n', b'a', b'm', b'e', 0x65, b'G', b'l', b'e', b'n', b'n']);
    /// ```
    pub fn to_vec(&self) -> Vec<u8> {
        self.to_vec_with(CodecConfig::default())
    }

    pub fn to_vec_with(&self, config: CodecConfig) -> Vec<u8> {
        let mut buf = vec![0u8; self.encoded_len_with(config)];
        let mut encoder = Encoder::with_config(&mut buf, config);
        let written = match encoder.encode(self) {
            Ok(written) => written,
            Err(_) => encoder.bytes_serialized(),
        };
        buf.truncate(written);
        buf
    }

    /// Encodes and writes the bytes to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_vec())?;
        Ok(())
    }

    /// Encodes into a [`bytes::Bytes`] buffer.
    #[cfg(feature = "shared")]
    pub fn to_bytes(&self) -> bytes::Bytes {
        bytes::Bytes::from(self.to_vec())
    }
}
