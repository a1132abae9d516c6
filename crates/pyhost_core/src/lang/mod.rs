//! Language-level vocabulary for the pyhost runtime.
//!
//! ## Notes
//! - Tables here are `const` and pure; the runtime crate turns them into live class objects.
//!
//! ## Examples
//! ```rust
//! use pyhost_core::lang::exceptions;
//!
//! assert!(exceptions::contains("ImportError"));
//! assert_eq!(exceptions::parent_of("ZeroDivisionError"), Some("ArithmeticError"));
//! ```

pub mod conventions;
pub mod exceptions;
