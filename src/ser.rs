//! Serde support for the value model.
//!
//! Any serde format can carry an [`ArgMap`] tree. Maps serialize with sorted
//! keys and without null entries, vectors and lists as sequences, times as
//! seconds in an `f64`, complex numbers as `(re, im)` tuples, and custom
//! values as the map the [registry](crate::registry) produces for them.
//!
//! Deserializing a [`Variant`] keeps only what a self-describing format can
//! tell: signed integers become `Int64`, unsigned ones `UInt64`, floats
//! `Float64`, sequences lists and maps maps.
//!
//! ```
//! use argmap::ArgMap;
//!
//! let map = ArgMap::new();
//! map.set("count", 1234u16);
//! map.set("name", "Glenn");
//!
//! let json = serde_json::to_string(&map).unwrap();
//! assert_eq!(json, r#"{"count":1234,"name":"Glenn"}"#);
//!
//! let back: ArgMap = serde_json::from_str(&json).unwrap();
//! assert_eq!(back.get("count", 0u16), 1234);
//! ```

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, SeqAccess, Visitor},
    ser::SerializeMap,
};

use crate::{
    ArgList, ArgMap, Complex, Duration, SharedVec, Timestamp, Variant, Vector, registry::registry,
};

impl Serialize for Variant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Variant::Null => serializer.serialize_unit(),
            Variant::Bool(v) => serializer.serialize_bool(*v),
            Variant::Int8(v) => serializer.serialize_i8(*v),
            Variant::Int16(v) => serializer.serialize_i16(*v),
            Variant::Int32(v) => serializer.serialize_i32(*v),
            Variant::Int64(v) => serializer.serialize_i64(*v),
            Variant::UInt8(v) => serializer.serialize_u8(*v),
            Variant::UInt16(v) => serializer.serialize_u16(*v),
            Variant::UInt32(v) => serializer.serialize_u32(*v),
            Variant::UInt64(v) => serializer.serialize_u64(*v),
            Variant::Float32(v) => serializer.serialize_f32(*v),
            Variant::Float64(v) => serializer.serialize_f64(*v),
            Variant::Complex32(v) => v.serialize(serializer),
            Variant::Complex64(v) => v.serialize(serializer),
            Variant::String(v) => serializer.serialize_str(v),
            Variant::Map(map) => map.serialize(serializer),
            Variant::List(list) => list.serialize(serializer),
            Variant::Timestamp(t) => t.serialize(serializer),
            Variant::Duration(d) => d.serialize(serializer),
            Variant::Custom(custom) => registry().to_arg_map(custom).serialize(serializer),
            Variant::Vector(vector) => vector.serialize(serializer),
        }
    }
}

impl Serialize for ArgMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entries: Vec<_> = self.iter().filter(|(_, value)| !value.is_null()).collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for ArgList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl Serialize for Vector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        macro_rules! collect {
            ($vector:expr, $serializer:expr; $($variant:ident),*) => {
                match $vector {
                    $(Vector::$variant(items) => $serializer.collect_seq(items.borrow().iter()),)*
                }
            };
        }
        collect!(
            self, serializer;
            Bool, Int8, Int16, Int32, Int64, UInt8, UInt16, UInt32, UInt64, Float32, Float64,
            Complex32, Complex64, String, Timestamp, Duration
        )
    }
}

impl<T: Serialize> Serialize for Complex<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.re, &self.im).serialize(serializer)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

struct VariantVisitor;

impl<'de> Visitor<'de> for VariantVisitor {
    type Value = Variant;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any self-describing value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Variant::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Variant::Int64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Variant::UInt64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Variant::Float64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Variant::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Variant::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(Variant::from(SharedVec::new(v.to_vec())))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(Variant::from(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Variant::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Variant::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Variant::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let list = ArgList::new();
        while let Some(item) = seq.next_element::<Variant>()? {
            list.push(item);
        }
        Ok(Variant::List(list))
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        ArgMapVisitor.visit_map(map).map(Variant::Map)
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(VariantVisitor)
    }
}

struct ArgMapVisitor;

impl<'de> Visitor<'de> for ArgMapVisitor {
    type Value = ArgMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let map = ArgMap::new();
        while let Some((key, value)) = access.next_entry::<String, Variant>()? {
            if !value.is_null() {
                map.insert(&key, value);
            }
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for ArgMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ArgMapVisitor)
    }
}
