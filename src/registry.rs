//! Process-wide bindings between native Rust types and map representations.
//!
//! A custom value is stored in a [`Variant`] as an opaque [`CustomValue`].
//! To encode it, or to rebuild it from a decoded [`ArgMap`], its type must be
//! registered once with a pair of converters. The map produced for a custom
//! value carries the registered name under [`TYPE_KEY`].
//!
//! Registration belongs in program start-up, before values are encoded or
//! decoded. The tables are guarded by a lock so a late registration is not
//! undefined behavior, but nothing re-reads values that were decoded before
//! their type was known.
//!
//! # Example
//!
//! ```
//! use argmap::{ArgMap, registry::{self, CustomType}};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl CustomType for Point {
//!     const TYPE_NAME: &'static str = "Doc:Point";
//!
//!     fn to_arg_map(&self) -> ArgMap {
//!         ArgMap::from([("x", self.x), ("y", self.y)])
//!     }
//!
//!     fn from_arg_map(map: &ArgMap) -> Self {
//!         Point { x: map.get("x", 0), y: map.get("y", 0) }
//!     }
//! }
//!
//! registry::register_custom_type::<Point>();
//!
//! let map = ArgMap::new();
//! map.set_custom("p", Point { x: 1, y: 2 });
//!
//! let bytes = map.to_vec();
//! let decoded = ArgMap::from_slice(&bytes);
//! assert_eq!(decoded.get_custom("p", Point { x: 0, y: 0 }), Point { x: 1, y: 2 });
//! ```

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    rc::Rc,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

use crate::{ArgMap, CustomValue, Variant};

/// Reserved key holding the registered type name in a custom value's map.
pub const TYPE_KEY: &str = "{{type}}";

type ToMap = Box<dyn Fn(&dyn Any) -> Option<ArgMap> + Send + Sync>;
type FromMap = Box<dyn Fn(&ArgMap) -> CustomValue + Send + Sync>;

struct Converter {
    name: String,
    type_id: TypeId,
    to_map: ToMap,
    from_map: FromMap,
}

#[derive(Default)]
struct Tables {
    by_name: HashMap<String, Arc<Converter>>,
    by_type: HashMap<TypeId, Arc<Converter>>,
}

/// The table of registered custom types. See [`registry()`].
pub struct Registry {
    tables: RwLock<Tables>,
}

/// Proof of a registration, returned by [`Registry::register`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    name: String,
    newly_registered: bool,
}

impl Registration {
    /// The name the native type is bound to. For a repeated registration
    /// this is the name from the first one.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_new(&self) -> bool {
        self.newly_registered
    }
}

/// A native type with a map representation.
pub trait CustomType: Sized + 'static {
    /// Name written under [`TYPE_KEY`]; must be unique across the program.
    const TYPE_NAME: &'static str;

    fn to_arg_map(&self) -> ArgMap;

    fn from_arg_map(map: &ArgMap) -> Self;
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| Registry {
    tables: RwLock::new(Tables::default()),
});

/// The process-wide registry, created on first use.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Registers `T` through its [`CustomType`] implementation.
pub fn register_custom_type<T: CustomType>() -> Registration {
    registry().register::<T>(T::TYPE_NAME, T::to_arg_map, T::from_arg_map)
}

impl Registry {
    /// Binds `name` to the native type `T`.
    ///
    /// Registering a type again is a no-op that reports the existing
    /// binding. A name already bound to another type keeps its first
    /// binding for decoding.
    pub fn register<T: 'static>(
        &self,
        name: &str,
        to_map: impl Fn(&T) -> ArgMap + Send + Sync + 'static,
        from_map: impl Fn(&ArgMap) -> T + Send + Sync + 'static,
    ) -> Registration {
        let type_id = TypeId::of::<T>();
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = tables.by_type.get(&type_id) {
            return Registration {
                name: existing.name.clone(),
                newly_registered: false,
            };
        }

        let converter = Arc::new(Converter {
            name: name.to_owned(),
            type_id,
            to_map: Box::new(move |value: &dyn Any| value.downcast_ref::<T>().map(&to_map)),
            from_map: Box::new(move |map: &ArgMap| CustomValue::new(from_map(map))),
        });
        if tables.by_name.contains_key(name) {
            #[cfg(feature = "logging")]
            log::warn!("custom type name `{name}` is already registered to another type");
        } else {
            tables.by_name.insert(name.to_owned(), Arc::clone(&converter));
        }
        tables.by_type.insert(type_id, converter);

        Registration {
            name: name.to_owned(),
            newly_registered: true,
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    /// The name `T` is registered under.
    pub fn name_of<T: 'static>(&self) -> Option<String> {
        self.by_type(TypeId::of::<T>())
            .map(|converter| converter.name.clone())
    }

    /// Converts a custom value to its map form, including the type marker.
    ///
    /// An unregistered type produces an empty map.
    pub fn to_arg_map(&self, value: &CustomValue) -> ArgMap {
        let Some(converter) = self.by_type(value.type_id()) else {
            #[cfg(feature = "logging")]
            log::warn!("custom type `{}` is not registered", value.type_name());
            return ArgMap::new();
        };
        match (converter.to_map)(value.as_any()) {
            Some(map) => {
                map.set(TYPE_KEY, converter.name.as_str());
                map
            }
            None => ArgMap::new(),
        }
    }

    /// Rebuilds a custom value from a map carrying a registered type marker.
    ///
    /// Any other map is returned unchanged as [`Variant::Map`].
    pub fn from_arg_map(&self, map: &ArgMap) -> Variant {
        map.get_exact(TYPE_KEY)
            .and_then(|name| name.as_str().and_then(|name| self.by_name(name)))
            .map(|converter| Variant::Custom((converter.from_map)(map)))
            .unwrap_or_else(|| Variant::Map(map.clone()))
    }

    /// Converts `map` to `T`. The marker selects the converter when
    /// present, `T`'s own registration otherwise; a converter producing a
    /// different type yields `None`.
    fn custom_from_map<T: 'static>(&self, map: &ArgMap) -> Option<Rc<T>> {
        let converter = match map.get_exact(TYPE_KEY) {
            Some(Variant::String(name)) => self.by_name(&name)?,
            _ => self.by_type(TypeId::of::<T>())?,
        };
        if converter.type_id != TypeId::of::<T>() {
            return None;
        }
        (converter.from_map)(map).downcast_rc::<T>()
    }

    fn by_name(&self, name: &str) -> Option<Arc<Converter>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.by_name.get(name).cloned()
    }

    fn by_type(&self, type_id: TypeId) -> Option<Arc<Converter>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.by_type.get(&type_id).cloned()
    }
}

/// Reads a stored value as the native type `T`, converting maps through the
/// registry.
pub(crate) fn custom_from_variant<T: 'static>(value: &Variant) -> Option<Rc<T>> {
    match value {
        Variant::Custom(custom) => custom.downcast_rc::<T>(),
        Variant::Map(map) => registry().custom_from_map::<T>(map),
        _ => None,
    }
}
