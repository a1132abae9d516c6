//! Error types for the pyhost runtime.
//!
//! Two families are kept apart:
//! - [`RuntimeError`]: failures of the runtime's own bookkeeping (registry corruption, malformed receivers).
//!   These are host-side diagnostics and carry `miette` codes.
//! - [`Raised`]: whatever propagates through managed code. It is either a managed exception instance, which
//!   managed code can catch by class, or a [`HostFailure`] that has not been normalized yet.
//!
//! Host failures must pass through [`Exceptions::exceptionify`](crate::Exceptions::exceptionify) before managed
//! catch logic looks at them.

use miette::Diagnostic;
use thiserror::Error;

use crate::class::ClassObject;
use crate::exceptions::ExceptionRef;

/// Failure of the runtime's own registries.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RuntimeError {
    #[error("class `{name}` is already defined")]
    #[diagnostic(
        code(pyhost::duplicate_definition),
        help("every class name is registered exactly once; look for a repeated name in the taxonomy or registration code")
    )]
    DuplicateDefinition { name: String },

    #[error("class `{name}` is not registered")]
    #[diagnostic(code(pyhost::unknown_class))]
    UnknownClass { name: String },

    #[error("'{value}' value carries no class object")]
    #[diagnostic(code(pyhost::missing_class))]
    MissingClass { value: String },

    #[error("class `{name}` does not derive from BaseException")]
    #[diagnostic(code(pyhost::not_an_exception))]
    NotAnException { name: String },
}

/// A failure that originates below the managed object system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostFailure {
    /// Name resolution failed in host code.
    #[error("ReferenceError: {message}")]
    Reference { message: String },

    /// A native function was called with the wrong number of arguments.
    #[error("{function}() takes exactly {expected} arguments ({got} given)")]
    Arity { function: String, expected: usize, got: usize },

    #[error("{0}")]
    Other(String),
}

/// Anything propagating out of managed code.
#[derive(Debug, Clone, Error)]
pub enum Raised {
    #[error("{0}")]
    Exception(ExceptionRef),

    #[error(transparent)]
    Host(#[from] HostFailure),
}

impl Raised {
    /// The managed exception instance, if this has one.
    pub fn exception(&self) -> Option<&ExceptionRef> {
        match self {
            Raised::Exception(exc) => Some(exc),
            Raised::Host(_) => None,
        }
    }

    /// Whether this is a managed exception whose class is `class` or one of its descendants.
    pub fn is_instance_of(&self, class: &ClassObject) -> bool {
        self.exception().is_some_and(|exc| exc.is_instance_of(class))
    }

    /// Name of the managed exception class, if any.
    pub fn class_name(&self) -> Option<&str> {
        self.exception().map(|exc| exc.class().name())
    }
}

impl From<ExceptionRef> for Raised {
    fn from(exc: ExceptionRef) -> Self {
        Raised::Exception(exc)
    }
}
