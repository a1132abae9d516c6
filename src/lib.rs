#![forbid(unsafe_code)]
//! pyhost: the object runtime of a hosted, Python-like language
//!
//! The runtime itself lives in `pyhost_runtime` (classes, bound methods, the exception taxonomy and module
//! loading) on top of the shared vocabulary in `pyhost_core`. This crate adds the `pyhost` inspection CLI.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module and the
//!   runtime crate enforce `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;

pub use pyhost_runtime::{Raised, Runtime, RuntimeConfig, Value};
