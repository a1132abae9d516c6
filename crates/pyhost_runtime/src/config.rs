//! Runtime configuration.

use pyhost_core::lang::conventions::DEFAULT_QUALIFIER;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Prefix of an exception's full textual form (`qualifier: Class: message`)
    pub qualifier: String,
    /// What happens when a module is imported while its own factory is still running
    pub cyclic_imports: CyclicImportPolicy,
}

/// Handling of a re-entrant (cyclic) import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclicImportPolicy {
    /// Invoke the factory again. The nested run observes no cached instance; the outermost run's instance
    /// replaces it in the cache and is what the outer importer gets back.
    #[default]
    Reenter,
    /// Raise `ImportError` instead of re-invoking the factory.
    FailFast,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            qualifier: DEFAULT_QUALIFIER.to_string(),
            cyclic_imports: CyclicImportPolicy::default(),
        }
    }
}

impl RuntimeConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exception qualifier
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Set the cyclic import policy
    pub fn with_cyclic_imports(mut self, policy: CyclicImportPolicy) -> Self {
        self.cyclic_imports = policy;
        self
    }
}
