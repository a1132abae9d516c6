//! Object runtime for the pyhost hosted language.
//!
//! This crate owns the identity-carrying parts of the runtime:
//! - [`ClassRegistry`]: one class object per registered name, linked to its parent.
//! - [`BoundMethod`]: a receiver paired with a callable, invoked with the receiver as first argument.
//! - the exception taxonomy ([`exceptions`]): built once from the declarative forest in `pyhost_core`.
//! - module loading ([`modules`]): a factory registry, an at-most-once cache, and the three-tier import resolver.
//!
//! [`Runtime`] wires these together as explicitly constructed, injected state; there is no ambient global.
//!
//! ## Notes
//!
//! - Execution is single-threaded and synchronous, so shared state uses `Rc` / `RefCell` rather than locks.
//! - No `RefCell` borrow is held while a module factory or a native function runs, so factories may import
//!   other modules (including, hazardously, themselves).

#![deny(clippy::unwrap_used)]

pub mod builtins;
pub mod class;
pub mod config;
pub mod errors;
pub mod exceptions;
pub mod method;
pub mod modules;
pub mod object;
pub mod runtime;
pub mod value;

pub use builtins::Builtins;
pub use class::{ClassObject, ClassRef, ClassRegistry};
pub use config::{CyclicImportPolicy, RuntimeConfig};
pub use errors::{HostFailure, Raised, RuntimeError};
pub use exceptions::{ClassNode, ExceptionObject, ExceptionRef, Exceptions, build_taxonomy};
pub use method::BoundMethod;
pub use modules::{ExecutionContext, ModuleCache, ModuleObject, ModuleRef, ModuleRegistry, Resolution, Tier};
pub use object::{Instance, InstanceRef};
pub use runtime::Runtime;
pub use value::{Function, RuntimeClass, Value};
