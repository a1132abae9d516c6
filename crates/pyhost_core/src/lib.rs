//! Provide the shared, pure vocabulary of the pyhost object runtime.
//!
//! This crate is intentionally small and dependency-free. It holds the data the runtime is built *from*,
//! never the runtime state itself:
//! - the declarative builtin exception forest and the names of the core classes ([`lang`]), and
//! - dotted module-name helpers used by the import resolver ([`names`]).
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, no runtime object types.
//! - Everything here is deterministic so two runtimes bootstrapped from the same tables end up with the same
//!   class identities and ancestry.

pub mod lang;
pub mod names;
