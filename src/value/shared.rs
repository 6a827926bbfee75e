use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::Rc,
};

/// A reference-counted, interiorly mutable vector.
///
/// Cloning a `SharedVec` clones the handle, not the elements: every clone
/// observes mutations made through any other. Use [`SharedVec::deep_clone`]
/// for an independent copy.
///
/// Like [`ArgMap`](crate::ArgMap) and [`ArgList`](crate::ArgList) this type
/// is not thread-safe. Callers that share a tree across threads must
/// synchronize externally.
pub struct SharedVec<T>(Rc<RefCell<Vec<T>>>);

impl<T> SharedVec<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// # Panics
    ///
    /// Panics if the vector is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Vec<T>> {
        self.0.borrow()
    }

    /// # Panics
    ///
    /// Panics if the vector is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Vec<T>> {
        self.0.borrow_mut()
    }

    /// Number of handles sharing this vector.
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> SharedVec<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.0.borrow().clone()
    }

    pub fn deep_clone(&self) -> Self {
        Self::new(self.to_vec())
    }
}

impl<T> Clone for SharedVec<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> Default for SharedVec<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> From<Vec<T>> for SharedVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: PartialEq> PartialEq for SharedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}
