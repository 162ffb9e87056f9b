//! Type-indexed storage of builders and cached instances, owned by a
//! [Container](crate::container::Container).
//!
//! Entries for different types are stored behind a common [ErasedEntry] interface. The key under
//! which an entry is stored is always derived from the entry type by the generic accessors of
//! [ComponentRegistry], so downcasting a stored entry back to its concrete type cannot fail.

use crate::container::Container;
use crate::error::ContainerError;
use crate::instance::{ComponentInstancePtr, InstanceSlot};
use crate::scope::Scope;
use crate::type_key::TypeKey;
use derivative::Derivative;
use fxhash::FxHashMap;
use itertools::Itertools;
use std::any::Any;
use std::rc::Rc;

/// Builder function producing an owned instance, resolving dependencies from given container.
pub type BuilderPtr<T> = Rc<dyn Fn(&mut Container) -> Result<Box<T>, ContainerError>>;

/// Common interface of stored entries.
pub(crate) trait ErasedEntry {
    fn scope(&self) -> Scope;

    /// Creates the entry which should be stored in a child container, if any.
    fn inherit(&self) -> Option<Box<dyn ErasedEntry>>;

    fn as_any(&self) -> &dyn Any;
}

/// Entry stored under the key of its target type.
pub(crate) trait TypedEntry: ErasedEntry + 'static {
    type Target: ?Sized + 'static;
}

/// Recipe for manufacturing instances of `T`.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub(crate) struct BuilderEntry<T: ?Sized> {
    #[derivative(Debug = "ignore")]
    pub(crate) builder: BuilderPtr<T>,
    pub(crate) scope: Scope,
}

impl<T: ?Sized + 'static> TypedEntry for BuilderEntry<T> {
    type Target = T;
}

impl<T: ?Sized + 'static> ErasedEntry for BuilderEntry<T> {
    #[inline]
    fn scope(&self) -> Scope {
        self.scope
    }

    fn inherit(&self) -> Option<Box<dyn ErasedEntry>> {
        if self.scope.inherits_builder() {
            Some(Box::new(BuilderEntry {
                builder: self.builder.clone(),
                scope: self.scope,
            }))
        } else {
            None
        }
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Already built instance of `T`.
pub(crate) struct InstanceEntry<T: ?Sized> {
    pub(crate) slot: InstanceSlot<T>,
    pub(crate) scope: Scope,
}

impl<T: ?Sized> InstanceEntry<T> {
    pub(crate) fn owned(instance: ComponentInstancePtr<T>, scope: Scope) -> Self {
        Self {
            slot: InstanceSlot::Owned(instance),
            scope,
        }
    }
}

impl<T: ?Sized + 'static> TypedEntry for InstanceEntry<T> {
    type Target = T;
}

impl<T: ?Sized + 'static> ErasedEntry for InstanceEntry<T> {
    #[inline]
    fn scope(&self) -> Scope {
        self.scope
    }

    fn inherit(&self) -> Option<Box<dyn ErasedEntry>> {
        if self.scope.inherits_instance() {
            Some(Box::new(InstanceEntry {
                slot: self.slot.alias(),
                scope: self.scope,
            }))
        } else {
            None
        }
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

type EntryMap = FxHashMap<TypeKey, Box<dyn ErasedEntry>>;

/// Registry of builders and instances for a single container. Holds at most one builder and one
/// instance per type.
#[derive(Default)]
pub(crate) struct ComponentRegistry {
    builders: EntryMap,
    instances: EntryMap,
}

impl ComponentRegistry {
    pub(crate) fn builder<T: ?Sized + 'static>(
        &self,
    ) -> Result<Option<&BuilderEntry<T>>, ContainerError> {
        Self::typed_entry::<BuilderEntry<T>>(&self.builders)
    }

    pub(crate) fn instance<T: ?Sized + 'static>(
        &self,
    ) -> Result<Option<&InstanceEntry<T>>, ContainerError> {
        Self::typed_entry::<InstanceEntry<T>>(&self.instances)
    }

    /// Stores a builder, returning `true` if it replaced an existing one.
    pub(crate) fn insert_builder<T: ?Sized + 'static>(&mut self, entry: BuilderEntry<T>) -> bool {
        Self::insert_entry(&mut self.builders, entry)
    }

    /// Stores an instance, returning `true` if it replaced an existing one.
    pub(crate) fn insert_instance<T: ?Sized + 'static>(
        &mut self,
        entry: InstanceEntry<T>,
    ) -> bool {
        Self::insert_entry(&mut self.instances, entry)
    }

    #[inline]
    pub(crate) fn contains_builder(&self, key: &TypeKey) -> bool {
        self.builders.contains_key(key)
    }

    #[inline]
    pub(crate) fn contains_instance(&self, key: &TypeKey) -> bool {
        self.instances.contains_key(key)
    }

    /// Scope of the builder or, if there's none, the instance registered for given type.
    pub(crate) fn scope(&self, key: &TypeKey) -> Option<Scope> {
        self.builders
            .get(key)
            .or_else(|| self.instances.get(key))
            .map(|entry| entry.scope())
    }

    /// Types with either a builder or an instance, sorted by name.
    pub(crate) fn types(&self) -> Vec<TypeKey> {
        self.builders
            .keys()
            .chain(self.instances.keys())
            .unique()
            .copied()
            .sorted_by_key(|key| key.name())
            .collect()
    }

    pub(crate) fn builder_count(&self) -> usize {
        self.builders.len()
    }

    pub(crate) fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Creates the registry of a child container: local builders are copied, singleton instances
    /// are aliased.
    pub(crate) fn inherit(&self) -> Self {
        Self {
            builders: Self::inherit_entries(&self.builders),
            instances: Self::inherit_entries(&self.instances),
        }
    }

    fn inherit_entries(entries: &EntryMap) -> EntryMap {
        entries
            .iter()
            .filter_map(|(key, entry)| entry.inherit().map(|entry| (*key, entry)))
            .collect()
    }

    fn insert_entry<E: TypedEntry>(entries: &mut EntryMap, entry: E) -> bool {
        entries
            .insert(TypeKey::of::<E::Target>(), Box::new(entry))
            .is_some()
    }

    fn typed_entry<E: TypedEntry>(entries: &EntryMap) -> Result<Option<&E>, ContainerError> {
        let key = TypeKey::of::<E::Target>();
        entries
            .get(&key)
            .map(|entry| {
                entry
                    .as_any()
                    .downcast_ref::<E>()
                    .ok_or(ContainerError::IncompatibleComponent(key))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use crate::component_registry::{BuilderEntry, BuilderPtr, ComponentRegistry, InstanceEntry};
    use crate::container::Container;
    use crate::error::ContainerError;
    use crate::instance::ComponentInstancePtr;
    use crate::scope::Scope;
    use crate::type_key::TypeKey;
    use std::rc::Rc;

    trait TestTrait {}

    struct TestComponent;

    impl TestTrait for TestComponent {}

    struct UnregisteredComponent;

    fn builder<T: Default + 'static>() -> BuilderPtr<T> {
        Rc::new(|_: &mut Container| -> Result<Box<T>, ContainerError> {
            Ok(Box::<T>::default())
        })
    }

    fn failing_builder<T: ?Sized + 'static>() -> BuilderPtr<T> {
        Rc::new(|_: &mut Container| -> Result<Box<T>, ContainerError> {
            Err(ContainerError::NotResolvable(TypeKey::of::<T>()))
        })
    }

    macro_rules! assert_consistent_keys {
        ($($ty:ty),* $(,)?) => {
            $({
                let mut registry = ComponentRegistry::default();
                registry.insert_builder(BuilderEntry::<$ty> {
                    builder: failing_builder::<$ty>(),
                    scope: Scope::Local,
                });

                assert!(registry.builder::<$ty>().unwrap().is_some());
                assert!(registry.builder::<UnregisteredComponent>().unwrap().is_none());
                assert!(registry.instance::<$ty>().unwrap().is_none());
                assert!(registry.contains_builder(&TypeKey::of::<$ty>()));
                assert_eq!(registry.types(), vec![TypeKey::of::<$ty>()]);
            })*
        };
    }

    #[test]
    fn should_derive_keys_consistently() {
        assert_consistent_keys!(
            u8,
            String,
            str,
            [u8],
            dyn TestTrait,
            dyn TestTrait + Send + Sync,
            TestComponent,
            Option<TestComponent>,
            Box<dyn TestTrait>,
        );
    }

    #[test]
    fn should_keep_single_entry_per_type() {
        let mut registry = ComponentRegistry::default();

        assert!(!registry.insert_builder(BuilderEntry {
            builder: builder::<u8>(),
            scope: Scope::Local,
        }));
        assert!(registry.insert_builder(BuilderEntry {
            builder: builder::<u8>(),
            scope: Scope::Singleton,
        }));
        assert!(!registry.insert_instance(InstanceEntry::owned(
            ComponentInstancePtr::new(1u8),
            Scope::Local
        )));
        assert!(registry.insert_instance(InstanceEntry::owned(
            ComponentInstancePtr::new(2u8),
            Scope::Local
        )));

        assert_eq!(registry.builder_count(), 1);
        assert_eq!(registry.instance_count(), 1);
        assert_eq!(
            *registry
                .instance::<u8>()
                .unwrap()
                .unwrap()
                .slot
                .get()
                .unwrap(),
            2
        );
        assert_eq!(
            registry.scope(&TypeKey::of::<u8>()),
            Some(Scope::Singleton)
        );
    }

    #[test]
    fn should_inherit_local_builders() {
        let mut registry = ComponentRegistry::default();
        registry.insert_builder(BuilderEntry {
            builder: builder::<u8>(),
            scope: Scope::Local,
        });
        registry.insert_builder(BuilderEntry {
            builder: builder::<u16>(),
            scope: Scope::Singleton,
        });

        let child = registry.inherit();

        assert!(child.contains_builder(&TypeKey::of::<u8>()));
        assert!(!child.contains_builder(&TypeKey::of::<u16>()));
    }

    #[test]
    fn should_alias_singleton_instances() {
        let local = ComponentInstancePtr::new(1u8);
        let singleton = ComponentInstancePtr::new(2u16);

        let mut registry = ComponentRegistry::default();
        registry.insert_instance(InstanceEntry::owned(local, Scope::Local));
        registry.insert_instance(InstanceEntry::owned(singleton.clone(), Scope::Singleton));

        let child = registry.inherit();

        assert!(!child.contains_instance(&TypeKey::of::<u8>()));

        let aliased = child.instance::<u16>().unwrap().unwrap();
        assert!(!aliased.slot.is_owned());
        assert_eq!(aliased.scope, Scope::Singleton);
        assert!(ComponentInstancePtr::ptr_eq(
            &aliased.slot.get().unwrap(),
            &singleton
        ));
    }

    #[test]
    fn should_alias_through_multiple_generations() {
        let singleton = ComponentInstancePtr::new(2u16);

        let mut registry = ComponentRegistry::default();
        registry.insert_instance(InstanceEntry::owned(singleton.clone(), Scope::Singleton));

        let grandchild = registry.inherit().inherit();

        assert!(ComponentInstancePtr::ptr_eq(
            &grandchild
                .instance::<u16>()
                .unwrap()
                .unwrap()
                .slot
                .get()
                .unwrap(),
            &singleton
        ));
    }

    #[test]
    fn should_store_unsized_instances() {
        let mut registry = ComponentRegistry::default();
        registry.insert_instance(InstanceEntry::<dyn TestTrait>::owned(
            ComponentInstancePtr::new(TestComponent) as ComponentInstancePtr<dyn TestTrait>,
            Scope::Local,
        ));

        assert!(registry.instance::<dyn TestTrait>().unwrap().is_some());
        assert!(registry.instance::<TestComponent>().unwrap().is_none());
    }

    #[test]
    fn should_look_up_entries_by_their_target_type() {
        let mut registry = ComponentRegistry::default();
        registry.insert_builder(BuilderEntry {
            builder: builder::<u8>(),
            scope: Scope::Local,
        });

        assert!(
            ComponentRegistry::typed_entry::<BuilderEntry<u8>>(&registry.builders)
                .unwrap()
                .is_some()
        );
        assert!(
            ComponentRegistry::typed_entry::<BuilderEntry<u16>>(&registry.builders)
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            ComponentRegistry::typed_entry::<InstanceEntry<u8>>(&registry.builders),
            Err(ContainerError::IncompatibleComponent(key)) if key == TypeKey::of::<u8>()
        ));
    }
}
