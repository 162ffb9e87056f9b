//! Core functionality for registering and resolving [Component] instances.
//!
//! A [Container] stores builders and already built instances. Components are registered with
//! [Container::provide], which deduces how to construct them, or [Container::provide_with], which
//! accepts an explicit builder. Both build one instance immediately. Instances are then requested
//! with [Container::require] or [Container::require_option], which construct missing components on
//! demand, resolving their dependencies recursively.
//!
//! Child containers created with [Container::create_scope] inherit registrations according to
//! their [Scope].
//!
//! Abstract types cannot be registered without an explicit builder:
//!
//! ```compile_fail
//! use scoped_di::container::Container;
//! use scoped_di::injectable;
//! use scoped_di::scope::Scope;
//!
//! #[injectable]
//! trait TestTrait {}
//!
//! let mut container = Container::new();
//! container.provide::<dyn TestTrait>(Scope::Local).unwrap();
//! ```
//!
//! Neither can types without a deduced constructor:
//!
//! ```compile_fail
//! use scoped_di::container::Container;
//! use scoped_di::injectable;
//! use scoped_di::scope::Scope;
//!
//! #[injectable]
//! struct TestConfig;
//!
//! let mut container = Container::new();
//! container.provide::<TestConfig>(Scope::Local).unwrap();
//! ```
//!
//! Explicit builders work for both:
//!
//! ```
//! use scoped_di::container::Container;
//! use scoped_di::injectable;
//! use scoped_di::scope::Scope;
//!
//! #[injectable]
//! trait TestTrait {}
//!
//! struct TestImplementation;
//!
//! impl TestTrait for TestImplementation {}
//!
//! let mut container = Container::new();
//! container
//!     .provide_with::<dyn TestTrait, _>(
//!         |_| Ok(Box::new(TestImplementation) as Box<dyn TestTrait>),
//!         Scope::Local,
//!     )
//!     .unwrap();
//!
//! assert!(container.require::<dyn TestTrait>().is_ok());
//! ```

use crate::component::{Component, Injectable};
use crate::component_registry::{BuilderEntry, BuilderPtr, ComponentRegistry, InstanceEntry};
use crate::config::ContainerConfig;
use crate::error::ContainerError;
use crate::instance::ComponentInstancePtr;
use crate::scope::Scope;
use crate::type_key::TypeKey;
use config::ConfigError;
use itertools::Itertools;
use std::rc::Rc;
use tracing::{debug, trace};

/// Builder for [Container] with sensible defaults, for easy construction.
#[derive(Clone, Debug, Default)]
pub struct ContainerBuilder {
    config: ContainerConfig,
}

impl ContainerBuilder {
    /// Creates a new builder with a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder with given configuration.
    pub fn from_config(config: ContainerConfig) -> Self {
        Self { config }
    }

    /// Creates a new builder with configuration read from the environment. See
    /// [config](crate::config) for details.
    pub fn from_environment() -> Result<Self, ConfigError> {
        ContainerConfig::init_from_environment().map(Self::from_config)
    }

    /// Sets if registering an already registered type should replace it, rather than fail.
    pub fn with_definition_overriding(mut self, allow_definition_overriding: bool) -> Self {
        self.config.allow_definition_overriding = allow_definition_overriding;
        self
    }

    /// Sets how many constructions can be nested while resolving dependencies.
    pub fn with_max_resolution_depth(mut self, max_resolution_depth: usize) -> Self {
        self.config.max_resolution_depth = max_resolution_depth;
        self
    }

    /// Builds resulting [Container].
    pub fn build(self) -> Container {
        Container::with_config(self.config)
    }
}

/// Dependency injection container - a registry of builders and instances, which resolves
/// requested types by recursively constructing their dependencies.
///
/// Containers are not thread-safe and should be used by a single thread at a time.
pub struct Container {
    registry: ComponentRegistry,
    types_under_construction: Vec<TypeKey>,
    config: ContainerConfig,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates an empty container with given configuration.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registry: Default::default(),
            types_under_construction: Default::default(),
            config,
        }
    }

    /// Configuration this container was created with. Child scopes share it.
    #[inline]
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Registers `T` for automatic construction, using its deduced constructor. One instance is
    /// built immediately and stored along with the builder.
    pub fn provide<T: Component>(&mut self, scope: Scope) -> Result<(), ContainerError> {
        self.provide_with::<T, _>(|container| T::create(container).map(Box::new), scope)
    }

    /// Registers `T` with an explicit builder. One instance is built immediately and stored along
    /// with the builder. This is the only way to register abstract types, like `dyn Trait`.
    pub fn provide_with<T, F>(&mut self, builder: F, scope: Scope) -> Result<(), ContainerError>
    where
        T: Injectable + ?Sized,
        F: Fn(&mut Container) -> Result<Box<T>, ContainerError> + 'static,
    {
        let key = TypeKey::of::<T>();
        if !self.config.allow_definition_overriding && self.registry.contains_builder(&key) {
            return Err(ContainerError::DuplicateComponentType(key));
        }

        let builder: BuilderPtr<T> = Rc::new(builder);
        let instance = self.construct(&builder)?;

        self.registry
            .insert_instance(InstanceEntry::owned(instance, scope));
        if self
            .registry
            .insert_builder(BuilderEntry { builder, scope })
        {
            debug!(component = %key, ?scope, "Replaced component registration.");
        } else {
            debug!(component = %key, ?scope, "Registered component.");
        }

        Ok(())
    }

    /// Returns an instance of `T`, constructing it if needed. Fails with
    /// [ContainerError::NotResolvable] if `T` is neither registered nor constructible.
    pub fn require<T: Injectable + ?Sized>(
        &mut self,
    ) -> Result<ComponentInstancePtr<T>, ContainerError> {
        self.require_option::<T>()?
            .ok_or_else(|| ContainerError::NotResolvable(TypeKey::of::<T>()))
    }

    /// Returns an instance of `T`, constructing it if needed, or `None` if `T` is neither
    /// registered nor constructible. Errors are only returned when construction was attempted and
    /// failed.
    pub fn require_option<T: Injectable + ?Sized>(
        &mut self,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError> {
        if let Some(instance) = self.resolve_registered::<T>()? {
            return Ok(Some(instance));
        }

        if T::auto_provide(self)? {
            trace!(component = %TypeKey::of::<T>(), "Automatically registered component.");
            return self.resolve_registered::<T>();
        }

        Ok(None)
    }

    /// Creates a child container. Local builders are copied, so the child builds its own local
    /// instances. Singleton instances are shared with the child, but remain owned by this
    /// container, which needs to outlive their use in descendants.
    pub fn create_scope(&self) -> Container {
        let registry = self.registry.inherit();

        debug!(
            builders = registry.builder_count(),
            instances = registry.instance_count(),
            "Created child scope."
        );

        Self {
            registry,
            types_under_construction: Default::default(),
            config: self.config.clone(),
        }
    }

    /// Checks if there's a builder for `T` in this container.
    #[inline]
    pub fn is_provided<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains_builder(&TypeKey::of::<T>())
    }

    /// Checks if there's a cached instance of `T` in this container.
    #[inline]
    pub fn is_instantiated<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains_instance(&TypeKey::of::<T>())
    }

    /// Returns the scope `T` is registered with in this container.
    #[inline]
    pub fn scope_of<T: ?Sized + 'static>(&self) -> Option<Scope> {
        self.registry.scope(&TypeKey::of::<T>())
    }

    /// Returns all types with a builder or an instance in this container, sorted by name.
    #[inline]
    pub fn provided_types(&self) -> Vec<TypeKey> {
        self.registry.types()
    }

    fn resolve_registered<T: ?Sized + 'static>(
        &mut self,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError> {
        let key = TypeKey::of::<T>();
        if let Some(entry) = self.registry.instance::<T>()? {
            return entry
                .slot
                .get()
                .map(Some)
                .ok_or(ContainerError::ExpiredSingleton(key));
        }

        let (builder, scope) = match self.registry.builder::<T>()? {
            Some(entry) => (entry.builder.clone(), entry.scope),
            None => return Ok(None),
        };

        let instance = self.construct(&builder)?;
        self.registry
            .insert_instance(InstanceEntry::owned(instance.clone(), scope));

        trace!(component = %key, ?scope, "Constructed component on demand.");

        Ok(Some(instance))
    }

    fn construct<T: ?Sized + 'static>(
        &mut self,
        builder: &BuilderPtr<T>,
    ) -> Result<ComponentInstancePtr<T>, ContainerError> {
        let key = TypeKey::of::<T>();
        if self.types_under_construction.contains(&key) {
            return Err(ContainerError::DependencyCycle(
                self.types_under_construction
                    .iter()
                    .chain([&key])
                    .map(TypeKey::name)
                    .join(" -> "),
            ));
        }

        if self.types_under_construction.len() >= self.config.max_resolution_depth {
            return Err(ContainerError::ResolutionTooDeep {
                type_name: key.name(),
                depth: self.config.max_resolution_depth,
            });
        }

        self.types_under_construction.push(key);
        let instance = builder(self);
        self.types_under_construction.pop();

        instance.map(ComponentInstancePtr::from)
    }
}
