use crate::instance::ErrorPtr;
use crate::type_key::TypeKey;
use std::any::type_name;
use thiserror::Error;

/// Errors related to registering and resolving components.
#[derive(Error, Clone, Debug)]
pub enum ContainerError {
    #[error("{0} is not constructible and not provided within the current container.")]
    NotResolvable(TypeKey),
    #[error("Detected dependency cycle: {0}")]
    DependencyCycle(String),
    #[error("Exceeded maximum resolution depth of {depth} when constructing: {type_name}")]
    ResolutionTooDeep {
        type_name: &'static str,
        depth: usize,
    },
    #[error("Attempted to re-register a component type: {0}")]
    DuplicateComponentType(TypeKey),
    #[error("Singleton {0} shared from a parent container is no longer alive.")]
    ExpiredSingleton(TypeKey),
    #[error("Tried to downcast component to incompatible type: {0}")]
    IncompatibleComponent(TypeKey),
    #[error("Error constructing {type_name}: {cause}")]
    ConstructionFailed {
        type_name: &'static str,
        cause: ErrorPtr,
    },
}

impl ContainerError {
    /// Creates a [ContainerError::ConstructionFailed] for given component type.
    pub fn construction<T: ?Sized>(cause: ErrorPtr) -> Self {
        Self::ConstructionFailed {
            type_name: type_name::<T>(),
            cause,
        }
    }
}
