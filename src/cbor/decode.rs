use crate::{
    ArgList, ArgMap, Duration, Error, Result, SharedVec, Timestamp, Variant, VectorElement,
    cbor::{
        Field, MAX_DEPTH, MINOR_EIGHT_BYTES, MINOR_FOUR_BYTES, MINOR_ONE_BYTE, MINOR_TWO_BYTES,
        Major, Reader, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED,
        TAG_DURATION, TAG_HOMOGENEOUS_ARRAY, TAG_TIMESTAMP, TIME_KEY_NANOS, TIME_KEY_SECONDS,
        typed,
    },
    registry::registry,
    util::cold_path,
};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Value substituted for wire items that have no counterpart.
const PLACEHOLDER: &str = "Error";

/// Rebuilds an [`ArgMap`] tree from encoded bytes.
///
/// Decoding is permissive. A root item that is not a map yields an empty
/// map, unknown items become the text `"Error"`, and a truncated or
/// malformed item ends every open container while keeping what was read
/// before it. [`Decoder::error`] reports what stopped the walk.
///
/// Integers keep their width but not always their signedness: a signed
/// value that is not negative travels as a CBOR unsigned integer and comes
/// back as the unsigned type of the same width (`Int32(5)` decodes as
/// `UInt32(5)`). Typed reads coerce either way.
///
/// # Example
///
/// ```
/// use argmap::{ArgMap, Decoder};
///
/// let bytes = [0xa1, 0x65, b'c', b'o', b'u', b'n', b't', 0x19, 0x04, 0xd2];
/// let mut decoder = Decoder::new(&bytes);
/// let map = decoder.decode();
/// assert_eq!(map.get("count", 0u16), 1234);
/// assert!(decoder.error().is_none());
///
/// let truncated = ArgMap::from_slice(&bytes[..8]);
/// assert!(truncated.is_empty());
/// ```
pub struct Decoder<'a> {
    reader: Reader<'a>,
    failure: Option<Error>,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
            failure: None,
        }
    }

    pub fn init_buffer(&mut self, data: &'a [u8]) {
        self.reader.init_buffer(data);
        self.failure = None;
    }

    pub fn restart(&mut self) {
        self.reader.restart();
        self.failure = None;
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// What ended the last [`Decoder::decode`] early, if anything did.
    pub fn error(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// Decodes the next item as a map.
    pub fn decode(&mut self) -> ArgMap {
        self.failure = None;
        let field = match self.reader.next_field() {
            Ok(field) => field,
            Err(error) => {
                self.fail(error);
                return ArgMap::new();
            }
        };
        if field.major != Major::Map {
            #[cfg(feature = "logging")]
            log::debug!("root item is {:?}, not a map", field.major);
            if let Err(error) = self.reader.skip_field(&field) {
                self.fail(error);
            }
            return ArgMap::new();
        }
        self.read_map(&field, 0)
    }

    fn fail(&mut self, error: Error) {
        cold_path();
        #[cfg(feature = "logging")]
        log::debug!("decode stopped at byte {}: {error}", self.reader.position());
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    /// Reads the next item, or `None` once the walk has failed.
    fn next_item(&mut self, depth: usize) -> Option<Variant> {
        if self.failure.is_some() {
            return None;
        }
        let item = match self.reader.next_field() {
            Ok(field) => self.read_item(&field, depth),
            Err(error) => Err(error),
        };
        match item {
            Ok(item) => Some(item),
            Err(error) => {
                self.fail(error);
                None
            }
        }
    }

    fn skip_next(&mut self) -> Result<()> {
        let field = self.reader.next_field()?;
        self.reader.skip_field(&field)
    }

    fn read_key(&mut self) -> Result<Option<String>> {
        let field = self.reader.next_field()?;
        if field.major.is_string() {
            return Ok(Some(text(self.reader.payload(&field)?)));
        }
        #[cfg(feature = "logging")]
        log::warn!("skipping map entry with a {:?} key", field.major);
        self.reader.skip_field(&field)?;
        Ok(None)
    }

    fn read_map(&mut self, field: &Field, depth: usize) -> ArgMap {
        let map = ArgMap::new();
        for _ in 0..field.arg {
            if self.failure.is_some() {
                break;
            }
            match self.read_key() {
                Ok(Some(key)) => {
                    if let Some(value) = self.next_item(depth + 1) {
                        if !value.is_null() {
                            map.insert(&key, value);
                        }
                    }
                }
                Ok(None) => {
                    if let Err(error) = self.skip_next() {
                        self.fail(error);
                    }
                }
                Err(error) => self.fail(error),
            }
        }
        map
    }

    fn read_list(&mut self, field: &Field, depth: usize) -> ArgList {
        let list = ArgList::new();
        for _ in 0..field.arg {
            match self.next_item(depth + 1) {
                Some(item) => list.push(item),
                None => break,
            }
        }
        list
    }

    fn read_item(&mut self, field: &Field, depth: usize) -> Result<Variant> {
        if depth > MAX_DEPTH && matches!(field.major, Major::Array | Major::Map) {
            cold_path();
            return Err(Error::NestingTooDeep(MAX_DEPTH));
        }

        let value = match field.major {
            Major::Unsigned => unsigned(field),
            Major::Negative => negative(field),
            Major::Bytes => {
                let bytes = self.reader.payload(field)?;
                match field.tag.and_then(|tag| typed::read_vector(tag, bytes)) {
                    Some(vector) => Variant::Vector(vector),
                    None => Variant::String(String::from_utf8_lossy(bytes).into_owned()),
                }
            }
            Major::Text => Variant::String(text(self.reader.payload(field)?)),
            Major::Array if field.tag == Some(TAG_HOMOGENEOUS_ARRAY) => {
                self.read_homogeneous(field)?
            }
            Major::Array => Variant::List(self.read_list(field, depth)),
            Major::Map => match field.tag {
                Some(TAG_TIMESTAMP) => {
                    Variant::Timestamp(Timestamp::from_nanos(self.read_time(field)?))
                }
                Some(TAG_DURATION) => {
                    Variant::Duration(Duration::from_nanos(self.read_time(field)?))
                }
                _ => registry().from_arg_map(&self.read_map(field, depth)),
            },
            Major::Simple => self.simple(field),
            Major::Tag => {
                cold_path();
                self.placeholder(field)?
            }
        };
        Ok(value)
    }

    fn simple(&self, field: &Field) -> Variant {
        match field.minor {
            SIMPLE_FALSE => Variant::Bool(false),
            SIMPLE_TRUE => Variant::Bool(true),
            SIMPLE_NULL | SIMPLE_UNDEFINED => Variant::Null,
            MINOR_ONE_BYTE => Variant::UInt8(field.arg as u8),
            MINOR_TWO_BYTES | MINOR_FOUR_BYTES => self
                .reader
                .field_value::<f32>(field)
                .map_or(Variant::Null, Variant::Float32),
            MINOR_EIGHT_BYTES => self
                .reader
                .field_value::<f64>(field)
                .map_or(Variant::Null, Variant::Float64),
            _ => {
                #[cfg(feature = "logging")]
                log::warn!("unassigned simple value {} decoded as a placeholder", field.minor);
                Variant::from(PLACEHOLDER)
            }
        }
    }

    fn placeholder(&mut self, field: &Field) -> Result<Variant> {
        #[cfg(feature = "logging")]
        log::warn!("skipping unsupported {:?} item", field.major);
        self.reader.skip_field(field)?;
        Ok(Variant::from(PLACEHOLDER))
    }

    /// Reads the body of an extended time map as nanoseconds. Unknown keys
    /// are skipped and missing parts count as zero.
    fn read_time(&mut self, field: &Field) -> Result<i64> {
        let mut secs = 0i64;
        let mut nanos = 0i64;
        for _ in 0..field.arg {
            let key = self.reader.next_field()?;
            self.reader.skip_field(&key)?;
            let value = self.reader.next_field()?;
            let number = self.reader.field_value::<i64>(&value);
            match (self.reader.field_value::<i64>(&key), number) {
                (Some(TIME_KEY_SECONDS), Some(number)) => secs = number,
                (Some(TIME_KEY_NANOS), Some(number)) => nanos = number,
                _ => self.reader.skip_field(&value)?,
            }
        }
        let total = i128::from(secs) * i128::from(NANOS_PER_SEC) + i128::from(nanos);
        Ok(total.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    /// Reads an array under the homogeneous-array tag. The first element
    /// decides the vector type; an empty array has none and decodes as null.
    fn read_homogeneous(&mut self, field: &Field) -> Result<Variant> {
        let count = field.arg;
        if count == 0 {
            return Ok(Variant::Null);
        }

        let first = self.reader.peek_field()?;
        let vector = match (first.major, first.tag) {
            (Major::Simple, _) if matches!(first.simple(), Some(SIMPLE_FALSE | SIMPLE_TRUE)) => {
                self.read_elements(count, |decoder, field| {
                    Ok(decoder.reader.field_value::<bool>(field))
                })
            }
            (Major::Map, Some(TAG_TIMESTAMP)) => self.read_elements(count, |decoder, field| {
                decoder.read_time_element(field, TAG_TIMESTAMP, Timestamp::from_nanos)
            }),
            (Major::Map, Some(TAG_DURATION)) => self.read_elements(count, |decoder, field| {
                decoder.read_time_element(field, TAG_DURATION, Duration::from_nanos)
            }),
            (Major::Text, _) => self.read_elements(count, |decoder, field| {
                if field.major == Major::Text {
                    Ok(Some(text(decoder.reader.payload(field)?)))
                } else {
                    Ok(None)
                }
            }),
            (major, _) => {
                #[cfg(feature = "logging")]
                log::warn!("homogeneous array of {major:?} items is not supported, skipping");
                let _ = major;
                for _ in 0..count {
                    self.skip_next()?;
                }
                Variant::Null
            }
        };
        Ok(vector)
    }

    fn read_time_element<T>(
        &mut self,
        field: &Field,
        tag: u64,
        from_nanos: fn(i64) -> T,
    ) -> Result<Option<T>> {
        if field.major == Major::Map && field.tag == Some(tag) {
            self.read_time(field).map(|nanos| Some(from_nanos(nanos)))
        } else {
            Ok(None)
        }
    }

    /// Reads `count` elements of one vector type. An element of another
    /// kind is skipped and stored as the type's default.
    fn read_elements<T: VectorElement + Default>(
        &mut self,
        count: u64,
        mut read: impl FnMut(&mut Self, &Field) -> Result<Option<T>>,
    ) -> Variant {
        let mut items = Vec::with_capacity(capacity(count, self.reader.remaining()));
        for _ in 0..count {
            let item = match self.reader.next_field() {
                Ok(field) => read(self, &field).and_then(|item| match item {
                    Some(item) => Ok(item),
                    None => self.reader.skip_field(&field).map(|()| T::default()),
                }),
                Err(error) => Err(error),
            };
            match item {
                Ok(item) => items.push(item),
                Err(error) => {
                    self.fail(error);
                    break;
                }
            }
        }
        Variant::from(SharedVec::new(items))
    }
}

/// Every element takes at least one byte, so the input bounds the count.
fn capacity(count: u64, remaining: usize) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX).min(remaining)
}

/// Text payloads lose trailing NULs written for C readers.
fn text(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&byte| byte != 0).map_or(0, |last| last + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// The header length tells the width the writer chose.
fn unsigned(field: &Field) -> Variant {
    let value = field.arg;
    match field.header_len {
        1 | 2 => Variant::UInt8(value as u8),
        3 => Variant::UInt16(value as u16),
        5 => Variant::UInt32(value as u32),
        _ => Variant::UInt64(value),
    }
}

/// Negative integers keep the writer's width when the value fits and widen
/// otherwise, past `i64` to a float.
fn negative(field: &Field) -> Variant {
    let value = -1 - i128::from(field.arg);
    let narrowest = match field.header_len {
        1 | 2 => 0,
        3 => 1,
        5 => 2,
        _ => 3,
    };
    let widths: [fn(i128) -> Option<Variant>; 4] = [
        |v| i8::try_from(v).ok().map(Variant::Int8),
        |v| i16::try_from(v).ok().map(Variant::Int16),
        |v| i32::try_from(v).ok().map(Variant::Int32),
        |v| i64::try_from(v).ok().map(Variant::Int64),
    ];
    widths[narrowest..]
        .iter()
        .find_map(|width| width(value))
        .unwrap_or(Variant::Float64(value as f64))
}

impl ArgMap {
    /// Decodes a map from `bytes`, see [`Decoder`].
    pub fn from_slice(bytes: &[u8]) -> ArgMap {
        Decoder::new(bytes).decode()
    }
}
