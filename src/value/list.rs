use std::{cell::RefCell, fmt, mem, rc::Rc, vec};

use crate::{CustomValue, FromVariant, Variant, convert, registry};

/// A shared, ordered sequence of [`Variant`] values.
///
/// Elements may be of mixed kinds. Like [`ArgMap`](crate::ArgMap), an
/// `ArgList` is a non-atomic reference-counted handle: clones share the
/// elements and the mutating methods take `&self`.
///
/// # Example
///
/// ```
/// use argmap::ArgList;
///
/// let list = ArgList::new();
/// list.push(1);
/// list.push("two");
/// list.set(4, 5.0);
///
/// assert_eq!(list.len(), 5);
/// assert_eq!(list.get(0, 0u8), 1);
/// assert_eq!(list.get_str(1, ""), "two");
/// assert!(list.get_variant(2).is_none());
/// assert_eq!(list.get(4, 0), 5);
/// ```
#[derive(Clone, Default)]
pub struct ArgList {
    inner: Rc<RefCell<Vec<Variant>>>,
}

impl ArgList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list of `len` null elements.
    pub fn with_len(len: usize) -> Self {
        let list = Self::new();
        list.resize(len);
        list
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn push(&self, value: impl Into<Variant>) {
        let value = value.into();
        self.inner.borrow_mut().push(value);
    }

    pub fn extend<V: Into<Variant>>(&self, values: impl IntoIterator<Item = V>) {
        let values: Vec<Variant> = values.into_iter().map(Into::into).collect();
        self.inner.borrow_mut().extend(values);
    }

    /// Removes the element at `index`, shifting later elements down.
    pub fn remove_at(&self, index: usize) -> Option<Variant> {
        let mut items = self.inner.borrow_mut();
        (index < items.len()).then(|| items.remove(index))
    }

    pub fn clear(&self) {
        let items = mem::take(&mut *self.inner.borrow_mut());
        drop(items);
    }

    /// Truncates or pads with nulls to exactly `len` elements.
    pub fn resize(&self, len: usize) {
        let removed = {
            let mut items = self.inner.borrow_mut();
            if len < items.len() {
                items.split_off(len)
            } else {
                items.resize_with(len, Variant::default);
                Vec::new()
            }
        };
        drop(removed);
    }

    /// Reads element `index` as the type of `default`, with the same
    /// coercion rules as [`ArgMap::get`](crate::ArgMap::get).
    pub fn get<T: FromVariant>(&self, index: usize, default: T) -> T {
        self.get_raw(index)
            .and_then(|value| convert::extract(&value))
            .unwrap_or(default)
    }

    pub fn get_str(&self, index: usize, default: &str) -> String {
        self.get_raw(index)
            .and_then(|value| convert::extract(&value))
            .unwrap_or_else(|| default.to_owned())
    }

    /// Returns the element itself; null elements are reported as absent.
    pub fn get_variant(&self, index: usize) -> Option<Variant> {
        self.get_raw(index).filter(|value| !value.is_null())
    }

    /// Stores `value` at `index`, padding with nulls when the list is
    /// shorter. `usize::MAX` is never a valid position and is ignored.
    pub fn set(&self, index: usize, value: impl Into<Variant>) {
        let value = value.into();
        let previous = self.with_slot(index, |slot| mem::replace(slot, value));
        drop(previous);
    }

    pub fn set_custom<T: 'static>(&self, index: usize, value: T) {
        self.set(index, CustomValue::new(value));
    }

    pub fn get_custom<T: Clone + 'static>(&self, index: usize, default: T) -> T {
        self.get_custom_shared::<T>(index)
            .map(|value| T::clone(&value))
            .unwrap_or(default)
    }

    pub fn get_custom_shared<T: 'static>(&self, index: usize) -> Option<Rc<T>> {
        self.get_raw(index)
            .and_then(|value| registry::custom_from_variant::<T>(&value))
    }

    /// Returns a snapshot of the elements.
    pub fn iter(&self) -> vec::IntoIter<Variant> {
        self.inner.borrow().clone().into_iter()
    }

    pub fn deep_clone(&self) -> ArgList {
        self.inner.borrow().iter().map(Variant::deep_clone).collect()
    }

    /// Number of handles sharing this list.
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    pub fn ptr_eq(&self, other: &ArgList) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Runs `f` on element `index`, padding with nulls first. `None` when
    /// the list cannot grow to `index`.
    pub(crate) fn with_slot<R>(
        &self,
        index: usize,
        f: impl FnOnce(&mut Variant) -> R,
    ) -> Option<R> {
        let mut items = self.inner.borrow_mut();
        if index >= items.len() {
            let len = index.checked_add(1)?;
            let cur = items.len();
            items.try_reserve(len - cur).ok()?;
            items.resize_with(len, Variant::default);
        }
        items.get_mut(index).map(f)
    }

    pub(crate) fn for_each_item(&self, mut f: impl FnMut(&Variant)) {
        for item in self.inner.borrow().iter() {
            f(item);
        }
    }

    fn get_raw(&self, index: usize) -> Option<Variant> {
        self.inner.borrow().get(index).cloned()
    }
}

impl PartialEq for ArgList {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner.borrow() == *other.inner.borrow()
    }
}

impl fmt::Debug for ArgList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.borrow().iter()).finish()
    }
}

impl<V: Into<Variant>> FromIterator<V> for ArgList {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            inner: Rc::new(RefCell::new(iter.into_iter().map(Into::into).collect())),
        }
    }
}

impl IntoIterator for &ArgList {
    type Item = Variant;
    type IntoIter = vec::IntoIter<Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
