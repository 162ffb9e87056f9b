//! A dependency injection container with compile-time constructor deduction. Components declare
//! how they are constructed (by deriving [Component](component::Component) or annotating their
//! constructors), and a [Container](container::Container) resolves and builds them recursively,
//! caching instances and sharing them between parent and child scopes according to their
//! [Scope](scope::Scope).
//!
//! ```
//! use scoped_di::container::Container;
//! use scoped_di::instance::ComponentInstancePtr;
//! use scoped_di::scope::Scope;
//! use scoped_di::Component;
//!
//! #[derive(Component)]
//! struct Database;
//!
//! #[derive(Component)]
//! struct Repository {
//!     database: ComponentInstancePtr<Database>,
//! }
//!
//! let mut container = Container::new();
//! container.provide::<Database>(Scope::Singleton).unwrap();
//!
//! let repository = container.require::<Repository>().unwrap();
//! let database = container.require::<Database>().unwrap();
//! assert!(ComponentInstancePtr::ptr_eq(&repository.database, &database));
//! ```

pub mod component;
mod component_registry;
pub mod config;
pub mod container;
mod error;
pub mod instance;
pub mod scope;
pub mod type_key;

pub use error::ContainerError;

#[cfg(feature = "derive")]
pub use scoped_di_derive::{component_constructors, injectable, Component};
