//! One of the basic blocks of dependency injection is a [Component]. Components are injectable
//! types which know how to construct themselves from other components, resolved from a
//! [Container].
//!
//! ## Deriving components
//!
//! With the `derive` feature enabled, the struct literal of a type can serve as its constructor.
//! Every field is a dependency, resolved in declaration order:
//!
//! ```
//! use scoped_di::container::Container;
//! use scoped_di::instance::ComponentInstancePtr;
//! use scoped_di::{injectable, Component};
//!
//! #[injectable]
//! trait Greeter {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Component)]
//! struct Database;
//!
//! #[derive(Component)]
//! struct Repository {
//!     // required dependency - construction fails if it cannot be resolved
//!     database: ComponentInstancePtr<Database>,
//!     // optional dependency - `None` if it cannot be resolved
//!     greeter: Option<ComponentInstancePtr<dyn Greeter>>,
//!     #[component(default)]
//!     retries: u8,
//!     #[component(default = "default_name")]
//!     name: String,
//! }
//!
//! fn default_name() -> String {
//!     "repository".to_string()
//! }
//!
//! let mut container = Container::new();
//! let repository = container.require::<Repository>().unwrap();
//! assert!(repository.greeter.is_none());
//! ```
//!
//! ### Supported `#[component]` struct configuration
//!
//! * `default` - construct with `Default::default()` instead of the struct literal
//!
//! ### Supported `#[component]` field configuration
//!
//! * `default` - use `Default::default()` initialization
//! * `default = "expr"` - call `expr()` for initialization
//!
//! ## Deducing constructors
//!
//! When a type has dedicated constructor functions, put `#[component_constructors]` on the impl
//! block declaring them. Every associated function without a receiver, which returns `Self` or
//! `Result<Self, ErrorPtr>`, is a candidate. The candidate with the fewest parameters wins, as long
//! as no other candidate has the same number of parameters - ambiguous arities are skipped. A
//! function can be excluded with `#[component(ignore)]`.
//!
//! ```
//! use scoped_di::component::Component;
//! use scoped_di::component_constructors;
//! use scoped_di::instance::ComponentInstancePtr;
//!
//! #[scoped_di::injectable]
//! struct Config;
//!
//! struct Service;
//!
//! #[component_constructors]
//! impl Service {
//!     fn with_config(_config: ComponentInstancePtr<Config>) -> Self {
//!         Self
//!     }
//!
//!     fn with_optional_config(_config: Option<ComponentInstancePtr<Config>>) -> Self {
//!         Self
//!     }
//!
//!     fn with_both(
//!         _first: ComponentInstancePtr<Config>,
//!         _second: Option<ComponentInstancePtr<Config>>,
//!     ) -> Self {
//!         Self
//!     }
//! }
//!
//! // the one-parameter candidates are ambiguous, so the two-parameter one is selected
//! assert_eq!(Service::signature().arity(), 2);
//! ```
//!
//! Types which cannot be constructed that way, e.g. `dyn Trait`, need an explicit builder - see
//! [Container::provide_with].

use crate::container::Container;
use crate::error::ContainerError;
use crate::instance::ComponentInstancePtr;
use crate::scope::Scope;
use crate::type_key::TypeKey;

/// Marker trait for types which can be requested from a [Container]. Use the `#[injectable]`
/// attribute to implement it for traits (as `dyn Trait`), structs and enums, which can then be
/// registered with explicit builders. Deriving [Component] implements it automatically.
pub trait Injectable: 'static {
    /// Registers this type in the given container, if it can be constructed automatically. Returns
    /// `false` for types which need an explicit builder.
    fn auto_provide(_container: &mut Container) -> Result<bool, ContainerError> {
        Ok(false)
    }
}

/// Types which can be constructed automatically, by resolving the parameters of their deduced
/// constructor. Typically implemented by `#[derive(Component)]` or `#[component_constructors]`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be constructed automatically",
    label = "not a component",
    note = "use `Container::provide_with` with an explicit builder for abstract or complex types"
)]
pub trait Component: Injectable + Sized {
    /// Ordered parameter list of the constructor used for automatic construction.
    fn signature() -> Signature;

    /// Creates an instance, resolving constructor parameters left-to-right from given container.
    fn create(container: &mut Container) -> Result<Self, ContainerError>;
}

/// A constructor parameter which can be resolved from a [Container].
pub trait Dependency: Sized {
    /// Describes this parameter for the constructor [Signature].
    fn parameter() -> Parameter;

    fn resolve(container: &mut Container) -> Result<Self, ContainerError>;
}

impl<T: Injectable + ?Sized> Dependency for ComponentInstancePtr<T> {
    #[inline]
    fn parameter() -> Parameter {
        Parameter {
            target: TypeKey::of::<T>(),
            is_required: true,
        }
    }

    #[inline]
    fn resolve(container: &mut Container) -> Result<Self, ContainerError> {
        container.require::<T>()
    }
}

impl<T: Injectable + ?Sized> Dependency for Option<ComponentInstancePtr<T>> {
    #[inline]
    fn parameter() -> Parameter {
        Parameter {
            target: TypeKey::of::<T>(),
            is_required: false,
        }
    }

    #[inline]
    fn resolve(container: &mut Container) -> Result<Self, ContainerError> {
        container.require_option::<T>()
    }
}

/// Single constructor parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Parameter {
    /// Type of the component injected as this parameter.
    pub target: TypeKey,
    /// Optional parameters receive `None` instead of failing construction.
    pub is_required: bool,
}

/// Ordered parameter list of a constructor.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    #[inline]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

/// Registers given component in the container with the [Scope::Local] scope. Used by derived
/// [Injectable::auto_provide] implementations.
#[doc(hidden)]
pub fn provide_local<T: Component>(container: &mut Container) -> Result<bool, ContainerError> {
    container.provide::<T>(Scope::Local).map(|_| true)
}

macro_rules! injectable_types {
    ($($ty:ty),* $(,)?) => {
        $(impl Injectable for $ty {})*
    };
}

injectable_types!(
    String, str, bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32,
    f64,
);

#[cfg(test)]
mod tests {
    use crate::component::{Component, Dependency, Injectable, Parameter, Signature};
    use crate::container::Container;
    use crate::error::ContainerError;
    use crate::instance::ComponentInstancePtr;
    use crate::type_key::TypeKey;

    struct TestDependency;

    impl Injectable for TestDependency {}

    struct TestComponent {
        dependency: Option<ComponentInstancePtr<TestDependency>>,
    }

    impl Injectable for TestComponent {}

    impl Component for TestComponent {
        fn signature() -> Signature {
            Signature::new(vec![
                <Option<ComponentInstancePtr<TestDependency>> as Dependency>::parameter(),
            ])
        }

        fn create(container: &mut Container) -> Result<Self, ContainerError> {
            Ok(Self {
                dependency: Dependency::resolve(container)?,
            })
        }
    }

    #[test]
    fn should_describe_parameters() {
        assert_eq!(
            <ComponentInstancePtr<TestDependency> as Dependency>::parameter(),
            Parameter {
                target: TypeKey::of::<TestDependency>(),
                is_required: true,
            }
        );
        assert_eq!(
            TestComponent::signature().parameters(),
            &[Parameter {
                target: TypeKey::of::<TestDependency>(),
                is_required: false,
            }]
        );
        assert_eq!(TestComponent::signature().arity(), 1);
    }

    #[test]
    fn should_not_auto_provide_plain_injectables() {
        let mut container = Container::new();

        assert!(!TestDependency::auto_provide(&mut container).unwrap());
        assert!(!String::auto_provide(&mut container).unwrap());
    }

    #[test]
    fn should_resolve_missing_optional_dependency() {
        let mut container = Container::new();

        let component = TestComponent::create(&mut container).unwrap();
        assert!(component.dependency.is_none());
    }

    #[test]
    fn should_fail_missing_required_dependency() {
        let mut container = Container::new();

        assert!(matches!(
            <ComponentInstancePtr<TestDependency> as Dependency>::resolve(&mut container)
                .err()
                .unwrap(),
            ContainerError::NotResolvable(key) if key == TypeKey::of::<TestDependency>()
        ));
    }
}
