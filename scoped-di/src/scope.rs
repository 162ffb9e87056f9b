//! Every registered builder and every cached instance is tagged with a [Scope], which decides how
//! it travels from a [Container](crate::container::Container) to the child containers created with
//! [create_scope](crate::container::Container::create_scope):
//!
//! * [Scope::Local] - the builder is copied to the child, but the instance is not. The child builds
//! its own instance the first time it is requested there.
//! * [Scope::Singleton] - the builder is not copied, but the instance is shared with the child as a
//! non-owning alias. The whole subtree of containers sees the same value, which stays owned by the
//! container that built it.
//!
//! Note: scope resolution happens at construction time, so mixing scopes can lead to surprising
//! results, e.g. a [singleton](Scope::Singleton) component depending on a [local](Scope::Local)
//! one keeps the local instance it was built with for as long as it lives.

/// Lifecycle policy of a registered component.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Scope {
    /// Instances are rebuilt independently in every container.
    #[default]
    Local,
    /// One instance is shared by a container and all its descendants.
    Singleton,
}

impl Scope {
    /// Checks if builders with this scope are copied to child containers.
    #[inline]
    pub fn inherits_builder(self) -> bool {
        self == Scope::Local
    }

    /// Checks if instances with this scope are shared with child containers.
    #[inline]
    pub fn inherits_instance(self) -> bool {
        self == Scope::Singleton
    }
}
