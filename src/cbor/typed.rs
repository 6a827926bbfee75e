use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, LittleEndian, Unaligned, byteorder,
};

use crate::{
    SharedVec, Vector, VectorElement,
    cbor::{
        TAG_FLOAT32LE_ARRAY, TAG_FLOAT64LE_ARRAY, TAG_SINT8_ARRAY, TAG_SINT16LE_ARRAY,
        TAG_SINT32LE_ARRAY, TAG_SINT64LE_ARRAY, TAG_UINT8_ARRAY, TAG_UINT16LE_ARRAY,
        TAG_UINT32LE_ARRAY, TAG_UINT64LE_ARRAY, Writer,
    },
};

/// A numeric element carried in an RFC 8746 typed-array byte string.
trait TypedElement: VectorElement + Copy {
    const TAG: u64;

    /// Little-endian, alignment-free wire representation.
    type Wire: FromBytes + IntoBytes + Immutable + KnownLayout + Unaligned + Copy;

    fn to_wire(self) -> Self::Wire;

    fn from_wire(wire: Self::Wire) -> Self;
}

macro_rules! impl_byte_element {
    ($($ty:ty => $tag:ident),*) => {
        $(
            impl TypedElement for $ty {
                const TAG: u64 = $tag;
                type Wire = $ty;

                #[inline]
                fn to_wire(self) -> Self::Wire {
                    self
                }

                #[inline]
                fn from_wire(wire: Self::Wire) -> Self {
                    wire
                }
            }
        )*
    };
}

macro_rules! impl_wide_element {
    ($($ty:ty => $wire:ident, $tag:ident),*) => {
        $(
            impl TypedElement for $ty {
                const TAG: u64 = $tag;
                type Wire = byteorder::$wire<LittleEndian>;

                #[inline]
                fn to_wire(self) -> Self::Wire {
                    byteorder::$wire::new(self)
                }

                #[inline]
                fn from_wire(wire: Self::Wire) -> Self {
                    wire.get()
                }
            }
        )*
    };
}

impl_byte_element!(u8 => TAG_UINT8_ARRAY, i8 => TAG_SINT8_ARRAY);

impl_wide_element!(
    u16 => U16, TAG_UINT16LE_ARRAY,
    u32 => U32, TAG_UINT32LE_ARRAY,
    u64 => U64, TAG_UINT64LE_ARRAY,
    i16 => I16, TAG_SINT16LE_ARRAY,
    i32 => I32, TAG_SINT32LE_ARRAY,
    i64 => I64, TAG_SINT64LE_ARRAY,
    f32 => F32, TAG_FLOAT32LE_ARRAY,
    f64 => F64, TAG_FLOAT64LE_ARRAY
);

fn write_typed<T: TypedElement>(writer: &mut Writer<'_>, items: &SharedVec<T>) {
    let wire: Vec<T::Wire> = items.borrow().iter().map(|&item| item.to_wire()).collect();
    writer.encode_tag(T::TAG);
    writer.add_bytes(wire.as_bytes());
}

fn read_typed<T: TypedElement>(bytes: &[u8]) -> Vector {
    let whole = bytes.len() - bytes.len() % size_of::<T::Wire>();
    if whole != bytes.len() {
        #[cfg(feature = "logging")]
        log::warn!(
            "typed array of {} bytes is not a multiple of {}, dropping the tail",
            bytes.len(),
            size_of::<T::Wire>()
        );
    }
    let items = match <[T::Wire]>::ref_from_bytes(&bytes[..whole]) {
        Ok(wire) => wire.iter().map(|&item| T::from_wire(item)).collect(),
        Err(_) => Vec::new(),
    };
    SharedVec::new(items).into_vector()
}

/// Writes a numeric vector as a typed array. Returns `false` for vectors
/// that have no typed-array form.
pub(crate) fn write_vector(writer: &mut Writer<'_>, vector: &Vector) -> bool {
    match vector {
        Vector::UInt8(items) => write_typed(writer, items),
        Vector::UInt16(items) => write_typed(writer, items),
        Vector::UInt32(items) => write_typed(writer, items),
        Vector::UInt64(items) => write_typed(writer, items),
        Vector::Int8(items) => write_typed(writer, items),
        Vector::Int16(items) => write_typed(writer, items),
        Vector::Int32(items) => write_typed(writer, items),
        Vector::Int64(items) => write_typed(writer, items),
        Vector::Float32(items) => write_typed(writer, items),
        Vector::Float64(items) => write_typed(writer, items),
        _ => return false,
    }
    true
}

/// Rebuilds a numeric vector from a typed-array payload, or `None` when
/// `tag` is not a supported typed-array tag.
pub(crate) fn read_vector(tag: u64, bytes: &[u8]) -> Option<Vector> {
    let vector = match tag {
        TAG_UINT8_ARRAY => read_typed::<u8>(bytes),
        TAG_UINT16LE_ARRAY => read_typed::<u16>(bytes),
        TAG_UINT32LE_ARRAY => read_typed::<u32>(bytes),
        TAG_UINT64LE_ARRAY => read_typed::<u64>(bytes),
        TAG_SINT8_ARRAY => read_typed::<i8>(bytes),
        TAG_SINT16LE_ARRAY => read_typed::<i16>(bytes),
        TAG_SINT32LE_ARRAY => read_typed::<i32>(bytes),
        TAG_SINT64LE_ARRAY => read_typed::<i64>(bytes),
        TAG_FLOAT32LE_ARRAY => read_typed::<f32>(bytes),
        TAG_FLOAT64LE_ARRAY => read_typed::<f64>(bytes),
        _ => return None,
    };
    Some(vector)
}
