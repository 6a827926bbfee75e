use crate::{Complex32, Complex64, Duration, SharedVec, Timestamp, Variant, VariantType};

/// A homogeneous sequence of one scalar kind, held by a shared handle.
#[derive(Clone, Debug, PartialEq)]
pub enum Vector {
    Bool(SharedVec<bool>),
    Int8(SharedVec<i8>),
    Int16(SharedVec<i16>),
    Int32(SharedVec<i32>),
    Int64(SharedVec<i64>),
    UInt8(SharedVec<u8>),
    UInt16(SharedVec<u16>),
    UInt32(SharedVec<u32>),
    UInt64(SharedVec<u64>),
    Float32(SharedVec<f32>),
    Float64(SharedVec<f64>),
    Complex32(SharedVec<Complex32>),
    Complex64(SharedVec<Complex64>),
    String(SharedVec<String>),
    Timestamp(SharedVec<Timestamp>),
    Duration(SharedVec<Duration>),
}

macro_rules! for_each_vector {
    ($vector:expr, $items:ident => $body:expr) => {
        match $vector {
            Vector::Bool($items) => $body,
            Vector::Int8($items) => $body,
            Vector::Int16($items) => $body,
            Vector::Int32($items) => $body,
            Vector::Int64($items) => $body,
            Vector::UInt8($items) => $body,
            Vector::UInt16($items) => $body,
            Vector::UInt32($items) => $body,
            Vector::UInt64($items) => $body,
            Vector::Float32($items) => $body,
            Vector::Float64($items) => $body,
            Vector::Complex32($items) => $body,
            Vector::Complex64($items) => $body,
            Vector::String($items) => $body,
            Vector::Timestamp($items) => $body,
            Vector::Duration($items) => $body,
        }
    };
}

impl Vector {
    pub fn element_type(&self) -> VariantType {
        match self {
            Vector::Bool(_) => VariantType::Bool,
            Vector::Int8(_) => VariantType::Int8,
            Vector::Int16(_) => VariantType::Int16,
            Vector::Int32(_) => VariantType::Int32,
            Vector::Int64(_) => VariantType::Int64,
            Vector::UInt8(_) => VariantType::UInt8,
            Vector::UInt16(_) => VariantType::UInt16,
            Vector::UInt32(_) => VariantType::UInt32,
            Vector::UInt64(_) => VariantType::UInt64,
            Vector::Float32(_) => VariantType::Float32,
            Vector::Float64(_) => VariantType::Float64,
            Vector::Complex32(_) => VariantType::Complex32,
            Vector::Complex64(_) => VariantType::Complex64,
            Vector::String(_) => VariantType::String,
            Vector::Timestamp(_) => VariantType::Timestamp,
            Vector::Duration(_) => VariantType::Duration,
        }
    }

    pub fn len(&self) -> usize {
        for_each_vector!(self, items => items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn use_count(&self) -> usize {
        for_each_vector!(self, items => items.use_count())
    }

    /// Element `index` as a standalone value.
    pub fn get(&self, index: usize) -> Option<Variant> {
        for_each_vector!(self, items => items.borrow().get(index).cloned().map(Variant::from))
    }

    /// Copies the elements out as standalone values.
    pub fn to_variants(&self) -> Vec<Variant> {
        for_each_vector!(self, items => items.borrow().iter().cloned().map(Variant::from).collect())
    }

    pub fn deep_clone(&self) -> Vector {
        for_each_vector!(self, items => items.deep_clone().into_vector())
    }
}

/// Element types that can form a [`Vector`].
pub trait VectorElement: Clone + Sized + 'static {
    #[doc(hidden)]
    fn wrap(items: SharedVec<Self>) -> Vector;

    #[doc(hidden)]
    fn unwrap(vector: &Vector) -> Option<&SharedVec<Self>>;
}

macro_rules! impl_vector_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl VectorElement for $ty {
                #[inline]
                fn wrap(items: SharedVec<Self>) -> Vector {
                    Vector::$variant(items)
                }

                #[inline]
                fn unwrap(vector: &Vector) -> Option<&SharedVec<Self>> {
                    match vector {
                        Vector::$variant(items) => Some(items),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_vector_element! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Complex32 => Complex32,
    Complex64 => Complex64,
    String => String,
    Timestamp => Timestamp,
    Duration => Duration,
}

impl<T: VectorElement> SharedVec<T> {
    #[inline]
    pub fn into_vector(self) -> Vector {
        T::wrap(self)
    }
}
