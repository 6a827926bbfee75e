use std::{
    any::{Any, TypeId},
    fmt,
    rc::Rc,
};

/// An opaque, shared native value stored in a [`Variant`](crate::Variant).
///
/// The value is kept behind an `Rc<dyn Any>`; it can be read back only as
/// the exact native type it was stored with, or converted to and from an
/// [`ArgMap`](crate::ArgMap) through the [registry](crate::registry).
#[derive(Clone)]
pub struct CustomValue {
    type_id: TypeId,
    type_name: &'static str,
    value: Rc<dyn Any>,
}

impl CustomValue {
    pub fn new<T: 'static>(value: T) -> Self {
        Self::from_rc(Rc::new(value))
    }

    /// Wraps an existing shared value without copying it.
    pub fn from_rc<T: 'static>(value: Rc<T>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The native Rust type name of the stored value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn downcast_rc<T: 'static>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.value).downcast::<T>().ok()
    }

    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.value)
    }

    pub(crate) fn as_any(&self) -> &dyn Any {
        &*self.value
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.value), Rc::as_ptr(&other.value))
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
