//! Module loading.
//!
//! ```text
//! Runtime::import(requested, caller)
//!   ├── resolver   three-tier name resolution (absolute, sibling, child)
//!   ├── ModuleCache  at-most-once instantiation per fully-qualified name
//!   └── ModuleRegistry  fully-qualified name → factory
//! Runtime::run_module(target)  → factory directly, bypassing the cache
//! ```
//!
//! Factories receive an [`ExecutionContext`], through which they can read the builtin namespace, define
//! classes and import further modules.

pub mod cache;
pub mod context;
pub mod object;
pub mod registry;
pub mod resolver;

pub use cache::ModuleCache;
pub use context::ExecutionContext;
pub use object::{ModuleObject, ModuleRef};
pub use registry::{ModuleFactory, ModuleRegistry};
pub use resolver::{Resolution, Tier, resolve_name};
