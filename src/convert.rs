//! The coercion rules applied by every typed read.
//!
//! Numbers convert across widths and signedness only when the value fits
//! the destination; floats narrow to integers by truncation. Strings are
//! parsed without locale, with `true`/`yes`/`false`/`no` accepted for
//! integer and boolean destinations. Times read as numbers give seconds,
//! and numbers read as times are taken as seconds.

use crate::{
    ArgList, ArgMap, Complex32, Complex64, Duration, SharedVec, Timestamp, VALUE_KEY, Variant,
    VectorElement, util::format_g,
};

/// Types a [`Variant`] can be read as.
///
/// Implemented for every scalar, `String`, the time types, [`ArgMap`],
/// [`ArgList`], [`Variant`] itself, and vectors (`SharedVec<T>` shares the
/// stored vector, `Vec<T>` copies it).
pub trait FromVariant: Sized {
    /// `true` when a stored map should be returned as is rather than
    /// answering with its `"value"` entry.
    #[doc(hidden)]
    const ACCEPTS_MAP: bool = false;

    fn from_variant(value: &Variant) -> Option<Self>;
}

/// Reads `value` as `T`. Null is absent, and a map read as anything but a
/// map descends into its `"value"` entry.
pub(crate) fn extract<T: FromVariant>(value: &Variant) -> Option<T> {
    match value {
        Variant::Null => None,
        Variant::Map(map) if !T::ACCEPTS_MAP => map
            .get_exact(VALUE_KEY)
            .and_then(|inner| extract(&inner)),
        other => T::from_variant(other),
    }
}

#[derive(Clone, Copy, Debug)]
enum Number {
    Int(i128),
    Float(f64),
}

fn number_of(value: &Variant) -> Option<Number> {
    let number = match *value {
        Variant::Bool(v) => Number::Int(v.into()),
        Variant::Int8(v) => Number::Int(v.into()),
        Variant::Int16(v) => Number::Int(v.into()),
        Variant::Int32(v) => Number::Int(v.into()),
        Variant::Int64(v) => Number::Int(v.into()),
        Variant::UInt8(v) => Number::Int(v.into()),
        Variant::UInt16(v) => Number::Int(v.into()),
        Variant::UInt32(v) => Number::Int(v.into()),
        Variant::UInt64(v) => Number::Int(v.into()),
        Variant::Float32(v) => Number::Float(v.into()),
        Variant::Float64(v) => Number::Float(v),
        Variant::Timestamp(t) => Number::Float(t.as_secs_f64()),
        Variant::Duration(d) => Number::Float(d.as_secs_f64()),
        _ => return None,
    };
    Some(number)
}

trait Numeric: Sized {
    const INTEGRAL: bool;

    fn from_number(number: Number) -> Option<Self>;
}

fn truncate_in_range(value: f64, min: f64, max: f64) -> Option<f64> {
    if value.is_nan() || value < min || value > max {
        None
    } else {
        Some(value.trunc())
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Numeric for $ty {
                const INTEGRAL: bool = true;

                #[inline]
                fn from_number(number: Number) -> Option<Self> {
                    match number {
                        Number::Int(v) => <$ty>::try_from(v).ok(),
                        Number::Float(v) => truncate_in_range(v, <$ty>::MIN as f64, <$ty>::MAX as f64)
                            .map(|v| v as $ty),
                    }
                }
            }

            impl FromVariant for $ty {
                #[inline]
                fn from_variant(value: &Variant) -> Option<Self> {
                    match value {
                        Variant::$variant(v) => Some(*v),
                        other => coerce(other),
                    }
                }
            }
        )*
    };
}

impl_integer! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
}

impl Numeric for bool {
    const INTEGRAL: bool = true;

    #[inline]
    fn from_number(number: Number) -> Option<Self> {
        Some(match number {
            Number::Int(v) => v != 0,
            Number::Float(v) => v != 0.0,
        })
    }
}

impl FromVariant for bool {
    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Bool(v) => Some(*v),
            other => coerce(other),
        }
    }
}

impl Numeric for f32 {
    const INTEGRAL: bool = false;

    #[inline]
    fn from_number(number: Number) -> Option<Self> {
        match number {
            Number::Int(v) => Some(v as f32),
            Number::Float(v) if v.is_finite() && (v < f32::MIN as f64 || v > f32::MAX as f64) => {
                None
            }
            Number::Float(v) => Some(v as f32),
        }
    }
}

impl FromVariant for f32 {
    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Float32(v) => Some(*v),
            other => coerce(other),
        }
    }
}

impl Numeric for f64 {
    const INTEGRAL: bool = false;

    #[inline]
    fn from_number(number: Number) -> Option<Self> {
        Some(match number {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        })
    }
}

impl FromVariant for f64 {
    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Float64(v) => Some(*v),
            other => coerce(other),
        }
    }
}

fn coerce<T: Numeric>(value: &Variant) -> Option<T> {
    match value {
        Variant::String(text) => parse::<T>(text),
        other => number_of(other).and_then(T::from_number),
    }
}

fn parse_bool_word(text: &str) -> Option<bool> {
    ["true", "yes"]
        .iter()
        .any(|word| text.eq_ignore_ascii_case(word))
        .then_some(true)
        .or_else(|| {
            ["false", "no"]
                .iter()
                .any(|word| text.eq_ignore_ascii_case(word))
                .then_some(false)
        })
}

fn parse<T: Numeric>(text: &str) -> Option<T> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let float = || text.parse::<f64>().ok().map(Number::Float);
    if !T::INTEGRAL {
        return float().and_then(T::from_number);
    }

    let integer = if text.starts_with('-') {
        text.parse::<i64>().ok().map(|v| Number::Int(v.into()))
    } else if text.starts_with(['f', 'F', 't', 'T', 'y', 'Y', 'n', 'N']) {
        parse_bool_word(text).map(|v| Number::Int(v.into()))
    } else {
        text.parse::<u64>().ok().map(|v| Number::Int(v.into()))
    };
    integer.or_else(float).and_then(T::from_number)
}

impl FromVariant for Complex32 {
    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Complex32(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromVariant for Complex64 {
    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Complex64(v) => Some(*v),
            _ => None,
        }
    }
}

/// Renders a scalar as text, or `None` for kinds without a text form.
pub(crate) fn scalar_to_string(value: &Variant) -> Option<String> {
    let text = match value {
        Variant::Bool(v) => v.to_string(),
        Variant::Int8(v) => v.to_string(),
        Variant::Int16(v) => v.to_string(),
        Variant::Int32(v) => v.to_string(),
        Variant::Int64(v) => v.to_string(),
        Variant::UInt8(v) => v.to_string(),
        Variant::UInt16(v) => v.to_string(),
        Variant::UInt32(v) => v.to_string(),
        Variant::UInt64(v) => v.to_string(),
        Variant::Float32(v) => format_g((*v).into(), 8),
        Variant::Float64(v) => format_g(*v, 15),
        Variant::Complex32(v) => {
            format!("({},{})", format_g(v.re.into(), 8), format_g(v.im.into(), 8))
        }
        Variant::Complex64(v) => format!("({},{})", format_g(v.re, 15), format_g(v.im, 15)),
        Variant::String(v) => v.clone(),
        Variant::Timestamp(t) => format_g(t.as_secs_f64(), 15),
        Variant::Duration(d) => format_g(d.as_secs_f64(), 15),
        _ => return None,
    };
    Some(text)
}

impl FromVariant for String {
    fn from_variant(value: &Variant) -> Option<Self> {
        scalar_to_string(value)
    }
}

macro_rules! impl_time {
    ($ty:ident, $other:ident) => {
        impl FromVariant for $ty {
            fn from_variant(value: &Variant) -> Option<Self> {
                match value {
                    Variant::$ty(v) => Some(*v),
                    Variant::$other(v) => Some($ty::from_nanos(v.as_nanos())),
                    other => f64::from_variant(other).map($ty::from_secs_f64),
                }
            }
        }
    };
}

impl_time!(Timestamp, Duration);
impl_time!(Duration, Timestamp);

impl FromVariant for ArgMap {
    const ACCEPTS_MAP: bool = true;

    fn from_variant(value: &Variant) -> Option<Self> {
        value.as_map().cloned()
    }
}

impl FromVariant for ArgList {
    fn from_variant(value: &Variant) -> Option<Self> {
        value.as_list().cloned()
    }
}

impl FromVariant for Variant {
    const ACCEPTS_MAP: bool = true;

    fn from_variant(value: &Variant) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: VectorElement> FromVariant for SharedVec<T> {
    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Vector(vector) => T::unwrap(vector).cloned(),
            _ => None,
        }
    }
}

impl<T: VectorElement> FromVariant for Vec<T> {
    fn from_variant(value: &Variant) -> Option<Self> {
        SharedVec::<T>::from_variant(value).map(|items| items.to_vec())
    }
}
