//! Pointer types used to hand out component instances. By default they are reference counted with
//! [Rc](std::rc::Rc); the `threadsafe` feature switches to [Arc](std::sync::Arc), so resolved
//! instances can be moved to other threads. Containers themselves are never shared between threads.

#[cfg(not(feature = "threadsafe"))]
use std::rc::{Rc, Weak};
#[cfg(feature = "threadsafe")]
use std::sync::{Arc, Weak};

use std::error::Error;

/// Shared pointer to a resolved component instance.
#[cfg(not(feature = "threadsafe"))]
pub type ComponentInstancePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type ComponentInstancePtr<T> = Arc<T>;

/// Non-owning counterpart of [ComponentInstancePtr], used for instances shared with child
/// containers.
pub type ComponentInstanceWeakPtr<T> = Weak<T>;

/// Shared error pointer returned by fallible constructors.
#[cfg(not(feature = "threadsafe"))]
pub type ErrorPtr = Rc<dyn Error + 'static>;
#[cfg(feature = "threadsafe")]
pub type ErrorPtr = Arc<dyn Error + Send + Sync + 'static>;

/// Wraps an error in an [ErrorPtr].
#[cfg(not(feature = "threadsafe"))]
pub fn error_ptr<E: Error + 'static>(error: E) -> ErrorPtr {
    Rc::new(error) as ErrorPtr
}

/// Wraps an error in an [ErrorPtr].
#[cfg(feature = "threadsafe")]
pub fn error_ptr<E: Error + Send + Sync + 'static>(error: E) -> ErrorPtr {
    Arc::new(error) as ErrorPtr
}

/// Storage slot for an instance cached in a container. A value is owned by exactly one slot - the
/// one in the container which built it - while descendants only hold aliases.
pub(crate) enum InstanceSlot<T: ?Sized> {
    Owned(ComponentInstancePtr<T>),
    Alias(ComponentInstanceWeakPtr<T>),
}

impl<T: ?Sized> InstanceSlot<T> {
    /// Returns the instance, unless this is an alias which outlived its value.
    pub(crate) fn get(&self) -> Option<ComponentInstancePtr<T>> {
        match self {
            InstanceSlot::Owned(instance) => Some(instance.clone()),
            InstanceSlot::Alias(instance) => instance.upgrade(),
        }
    }

    /// Creates a non-owning alias pointing at the same value.
    pub(crate) fn alias(&self) -> Self {
        match self {
            InstanceSlot::Owned(instance) => {
                InstanceSlot::Alias(ComponentInstancePtr::downgrade(instance))
            }
            InstanceSlot::Alias(instance) => InstanceSlot::Alias(instance.clone()),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_owned(&self) -> bool {
        matches!(self, InstanceSlot::Owned(_))
    }
}
