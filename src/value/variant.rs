use std::rc::Rc;

use crate::{
    ArgList, ArgMap, Complex32, Complex64, CustomValue, Duration, FromVariant, Index,
    SharedVec, Timestamp, VariantType, Vector, VectorElement, convert, registry,
};

/// A dynamically typed value.
///
/// Scalars and strings are held by value. Maps, lists, vectors and custom
/// values are held by reference-counted handles, so cloning a `Variant` that
/// holds one of them shares the underlying container; use
/// [`Variant::deep_clone`] for an independent tree.
///
/// # Example
///
/// ```
/// use argmap::{Variant, VariantType};
///
/// let value = Variant::from(1000000i32);
/// assert_eq!(value.type_tag(), VariantType::Int32);
/// assert_eq!(value.get::<i32>(), Some(1000000));
/// assert_eq!(value.get::<i16>(), None);
/// assert_eq!(value.get_or(7i8), 7);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Variant {
    #[default]
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Complex32(Complex32),
    Complex64(Complex64),
    String(String),
    Map(ArgMap),
    List(ArgList),
    Timestamp(Timestamp),
    Duration(Duration),
    Custom(CustomValue),
    Vector(Vector),
}

impl Variant {
    /// The kind of value held; for vectors, the element kind.
    pub fn type_tag(&self) -> VariantType {
        match self {
            Variant::Null => VariantType::Null,
            Variant::Bool(_) => VariantType::Bool,
            Variant::Int8(_) => VariantType::Int8,
            Variant::Int16(_) => VariantType::Int16,
            Variant::Int32(_) => VariantType::Int32,
            Variant::Int64(_) => VariantType::Int64,
            Variant::UInt8(_) => VariantType::UInt8,
            Variant::UInt16(_) => VariantType::UInt16,
            Variant::UInt32(_) => VariantType::UInt32,
            Variant::UInt64(_) => VariantType::UInt64,
            Variant::Float32(_) => VariantType::Float32,
            Variant::Float64(_) => VariantType::Float64,
            Variant::Complex32(_) => VariantType::Complex32,
            Variant::Complex64(_) => VariantType::Complex64,
            Variant::String(_) => VariantType::String,
            Variant::Map(_) => VariantType::Map,
            Variant::List(_) => VariantType::List,
            Variant::Timestamp(_) => VariantType::Timestamp,
            Variant::Duration(_) => VariantType::Duration,
            Variant::Custom(_) => VariantType::Custom,
            Variant::Vector(vector) => vector.element_type(),
        }
    }

    #[inline]
    pub fn is_vector(&self) -> bool {
        matches!(self, Variant::Vector(_))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    /// Releases the payload and leaves the value null.
    #[inline]
    pub fn reset(&mut self) {
        *self = Variant::Null;
    }

    /// Stores `value` and returns the previous payload.
    ///
    /// The new value is fully built before the old payload is released, so
    /// replacing a value with a copy of itself is safe.
    #[inline]
    pub fn replace(&mut self, value: impl Into<Variant>) -> Variant {
        std::mem::replace(self, value.into())
    }

    /// Copies this value into an independent tree: maps, lists and vectors
    /// are rebuilt recursively. Custom values stay shared.
    pub fn deep_clone(&self) -> Variant {
        match self {
            Variant::Map(map) => Variant::Map(map.deep_clone()),
            Variant::List(list) => Variant::List(list.deep_clone()),
            Variant::Vector(vector) => Variant::Vector(vector.deep_clone()),
            other => other.clone(),
        }
    }

    /// Reads this value as `T`, applying the coercion rules.
    ///
    /// Returns `None` for null and for values that cannot be converted.
    #[inline]
    pub fn get<T: FromVariant>(&self) -> Option<T> {
        convert::extract(self)
    }

    #[inline]
    pub fn get_or<T: FromVariant>(&self, default: T) -> T {
        self.get().unwrap_or(default)
    }

    /// Reads this value as the native type `T`: a custom value holding a
    /// `T`, or a map the registry converts to one.
    pub fn get_custom<T: 'static>(&self) -> Option<Rc<T>> {
        registry::custom_from_variant::<T>(self)
    }

    /// Returns a child of a list (by `usize`) or of a map (by key).
    ///
    /// # Example
    ///
    /// ```
    /// use argmap::{ArgList, ArgMap, Variant};
    ///
    /// let list = ArgList::new();
    /// list.push(10u8);
    /// let map = ArgMap::new();
    /// map.set("items", list);
    ///
    /// let root = Variant::from(map);
    /// let items = root.at("items").unwrap();
    /// assert_eq!(items.at(0_usize).and_then(|v| v.get::<u8>()), Some(10));
    /// assert!(items.at("items").is_none());
    /// ```
    pub fn at<I: Index>(&self, index: I) -> Option<Variant> {
        index.index_dispatch(
            self,
            |value, i| match value {
                Variant::List(list) => list.get_variant(i),
                _ => None,
            },
            |value, key| match value {
                Variant::Map(map) => map.get_exact(key),
                _ => None,
            },
        )
    }

    /// Number of handles sharing this value's container, or `None` for
    /// values held by value.
    pub fn use_count(&self) -> Option<usize> {
        match self {
            Variant::Map(map) => Some(map.use_count()),
            Variant::List(list) => Some(list.use_count()),
            Variant::Vector(vector) => Some(vector.use_count()),
            Variant::Custom(custom) => Some(custom.use_count()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ArgMap> {
        match self {
            Variant::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ArgList> {
        match self {
            Variant::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(text) => Some(text),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                #[inline]
                fn from(value: $ty) -> Self {
                    Variant::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
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
    ArgMap => Map,
    ArgList => List,
    Timestamp => Timestamp,
    Duration => Duration,
    CustomValue => Custom,
    Vector => Vector,
}

impl From<&str> for Variant {
    #[inline]
    fn from(value: &str) -> Self {
        Variant::String(value.to_owned())
    }
}

impl From<&String> for Variant {
    #[inline]
    fn from(value: &String) -> Self {
        Variant::String(value.clone())
    }
}

impl From<&ArgMap> for Variant {
    #[inline]
    fn from(value: &ArgMap) -> Self {
        Variant::Map(value.clone())
    }
}

impl From<&ArgList> for Variant {
    #[inline]
    fn from(value: &ArgList) -> Self {
        Variant::List(value.clone())
    }
}

impl<T: VectorElement> From<SharedVec<T>> for Variant {
    #[inline]
    fn from(value: SharedVec<T>) -> Self {
        Variant::Vector(value.into_vector())
    }
}

impl<T: VectorElement> From<Vec<T>> for Variant {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Variant::Vector(SharedVec::new(value).into_vector())
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Variant::Null, Into::into)
    }
}
