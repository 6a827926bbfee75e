use std::{cell::RefCell, collections::HashMap, fmt, mem, rc::Rc, vec};

use crate::{CustomValue, FromVariant, PATH_DELIMITER, Variant, convert, path, registry};

/// A shared map from string keys to [`Variant`] values.
///
/// `ArgMap` is a handle: cloning it shares the same entries, and mutation
/// through any clone is visible to all of them, which is why the mutating
/// methods take `&self`. The entries are released with the last handle.
/// The handle uses non-atomic reference counting and is neither `Send` nor
/// `Sync`; trees shared between threads need external synchronization.
///
/// Keys containing [`PATH_DELIMITER`] address nested maps and lists, see
/// [`ArgMap::set`] and [`ArgMap::get`].
///
/// Inserting a map into itself (directly or through a child) creates a
/// reference cycle that is never released.
///
/// # Example
///
/// ```
/// use argmap::ArgMap;
///
/// let map = ArgMap::new();
/// map.set("count", 1234u16);
/// map.set("name", "Glenn");
///
/// assert_eq!(map.get("count", -1), 1234);
/// assert_eq!(map.get_str("name", ""), "Glenn");
/// assert_eq!(map.get("missing", 2.5), 2.5);
/// ```
#[derive(Clone, Default)]
pub struct ArgMap {
    inner: Rc<RefCell<HashMap<String, Variant>>>,
}

impl ArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Checks for an exact key; paths are not resolved.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().contains_key(key)
    }

    /// Removes an exact key, returning `true` if it was present.
    pub fn erase(&self, key: &str) -> bool {
        self.remove(key).is_some()
    }

    pub fn remove(&self, key: &str) -> Option<Variant> {
        self.inner.borrow_mut().remove(key)
    }

    pub fn clear(&self) {
        let entries = mem::take(&mut *self.inner.borrow_mut());
        drop(entries);
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Returns a snapshot of the entries in unspecified order.
    ///
    /// The snapshot shares containers with the map but does not hold a
    /// borrow, so the map may be modified while iterating.
    pub fn iter(&self) -> vec::IntoIter<(String, Variant)> {
        let entries: Vec<_> = self
            .inner
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        entries.into_iter()
    }

    /// Reads `key` as the type of `default`.
    ///
    /// The key is looked up exactly first; when absent and it contains
    /// [`PATH_DELIMITER`] it is resolved as a path. A stored map read as a
    /// non-map type answers with its `"value"` entry. Absent, null and
    /// unconvertible values yield `default`.
    ///
    /// # Example
    ///
    /// ```
    /// use argmap::ArgMap;
    ///
    /// let map = ArgMap::new();
    /// map.set("range", 100);
    /// map.set("range|units", "dBm");
    ///
    /// assert_eq!(map.get("range", 0), 100);
    /// assert_eq!(map.get_str("range|units", "V"), "dBm");
    /// assert_eq!(map.get_str("range|", "V"), "V");
    /// ```
    pub fn get<T: FromVariant>(&self, key: &str, default: T) -> T {
        self.lookup(key)
            .and_then(|value| convert::extract(&value))
            .unwrap_or(default)
    }

    /// Reads `key` as a string, see [`ArgMap::get`].
    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.lookup(key)
            .and_then(|value| convert::extract(&value))
            .unwrap_or_else(|| default.to_owned())
    }

    /// Returns the stored value itself, resolving paths. Null entries are
    /// reported as absent.
    pub fn get_variant(&self, key: &str) -> Option<Variant> {
        self.lookup(key).filter(|value| !value.is_null())
    }

    /// Stores `value` under `key`, replacing whatever was there.
    ///
    /// An existing exact key is always replaced in place. Otherwise a key
    /// containing [`PATH_DELIMITER`] is treated as a path: missing maps and
    /// lists are created, lists are padded with nulls, and a scalar standing
    /// where a map is needed is moved under a `"value"` key of a new map.
    ///
    /// # Example
    ///
    /// ```
    /// use argmap::ArgMap;
    ///
    /// let map = ArgMap::new();
    /// map.set("abc|2|x", 12345);
    /// assert_eq!(map.get("abc|2|x", -1), 12345);
    /// assert!(map.get_variant("abc|0").is_none());
    /// ```
    pub fn set(&self, key: &str, value: impl Into<Variant>) {
        let value = value.into();
        let mut entries = self.inner.borrow_mut();
        if let Some(slot) = entries.get_mut(key) {
            let previous = mem::replace(slot, value);
            drop(entries);
            drop(previous);
            return;
        }
        if key.contains(PATH_DELIMITER) {
            drop(entries);
            path::assign(self, key, value);
            return;
        }
        entries.insert(key.to_owned(), value);
    }

    /// Stores a native value as a custom entry.
    pub fn set_custom<T: 'static>(&self, key: &str, value: T) {
        self.set(key, CustomValue::new(value));
    }

    /// Stores an already shared native value without copying it.
    pub fn set_custom_shared<T: 'static>(&self, key: &str, value: Rc<T>) {
        self.set(key, CustomValue::from_rc(value));
    }

    /// Reads a custom entry as `T`.
    ///
    /// A map entry is converted through the registry: its type marker picks
    /// the converter, or `T`'s registration when the marker is missing.
    pub fn get_custom<T: Clone + 'static>(&self, key: &str, default: T) -> T {
        self.get_custom_shared::<T>(key)
            .map(|value| T::clone(&value))
            .unwrap_or(default)
    }

    pub fn get_custom_shared<T: 'static>(&self, key: &str) -> Option<Rc<T>> {
        self.lookup(key)
            .and_then(|value| registry::custom_from_variant::<T>(&value))
    }

    /// Copies the whole tree into new containers.
    pub fn deep_clone(&self) -> ArgMap {
        self.inner
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.deep_clone()))
            .collect()
    }

    /// Number of handles sharing this map.
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    pub fn ptr_eq(&self, other: &ArgMap) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn get_exact(&self, key: &str) -> Option<Variant> {
        self.inner.borrow().get(key).cloned()
    }

    pub(crate) fn insert(&self, key: &str, value: Variant) -> Option<Variant> {
        self.inner.borrow_mut().insert(key.to_owned(), value)
    }

    /// Runs `f` on the entry for `key`, creating a null entry first.
    pub(crate) fn with_slot<R>(&self, key: &str, f: impl FnOnce(&mut Variant) -> R) -> R {
        let mut entries = self.inner.borrow_mut();
        f(entries.entry(key.to_owned()).or_default())
    }

    /// Calls `f` with the live entries, in unspecified order.
    pub(crate) fn for_each_entry(&self, mut f: impl FnMut(&str, &Variant)) {
        for (key, value) in self.inner.borrow().iter() {
            f(key, value);
        }
    }

    fn lookup(&self, key: &str) -> Option<Variant> {
        match self.get_exact(key) {
            Some(value) => Some(value),
            None if key.contains(PATH_DELIMITER) => path::resolve(self, key),
            None => None,
        }
    }
}

impl PartialEq for ArgMap {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner.borrow() == *other.inner.borrow()
    }
}

impl fmt::Debug for ArgMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.borrow().iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Variant>> FromIterator<(K, V)> for ArgMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            inner: Rc::new(RefCell::new(entries)),
        }
    }
}

impl<K: Into<String>, V: Into<Variant>, const N: usize> From<[(K, V); N]> for ArgMap {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for &ArgMap {
    type Item = (String, Variant);
    type IntoIter = vec::IntoIter<(String, Variant)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
