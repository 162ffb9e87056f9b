use derivative::Derivative;
use std::any::{type_name, TypeId};
use std::fmt::{Display, Formatter};

/// Identity of a type used as a registry key. Two keys are equal if and only if they were created
/// for the same type; the type name is carried along for diagnostics only.
#[derive(Derivative, Clone, Copy, Debug)]
#[derivative(PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    id: TypeId,
    #[derivative(PartialEq = "ignore", Hash = "ignore", PartialOrd = "ignore", Ord = "ignore")]
    name: &'static str,
}

impl TypeKey {
    /// Creates the key for `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Underlying [TypeId].
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable name of the type.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}
