//! Case Registry
//!
//! An ordered, duplicate-free collection of [`BenchmarkCase`]s. Cases are
//! appended by explicit calls before the run; the run consumes the registry,
//! so the set of cases is frozen once the first case starts.

use crate::case::BenchmarkCase;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building a registry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A case with the same (suite, name) is already registered
    #[error("duplicate benchmark '{suite}.{name}' (first registered at {first}, again at {second})")]
    Duplicate {
        /// Suite name
        suite: String,
        /// Case name
        name: String,
        /// `file:line` of the first registration
        first: String,
        /// `file:line` of the rejected registration
        second: String,
    },

    /// Suite or case name is empty
    #[error("benchmark registered at {location} has an empty {field} name")]
    InvalidName {
        /// Which part was empty, `suite` or `case`
        field: &'static str,
        /// `file:line` of the registration
        location: String,
    },
}

/// Ordered set of benchmark cases, unique per (suite, name)
#[derive(Debug, Default)]
pub struct Registry {
    cases: Vec<BenchmarkCase>,
    index: HashMap<(String, String), usize>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every case of `cases` in order, stopping at the first error
    pub fn from_cases<I>(cases: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = BenchmarkCase>,
    {
        let mut registry = Self::new();
        for case in cases {
            registry.register(case)?;
        }
        Ok(registry)
    }

    /// Append a case. Rejects duplicates and empty names.
    pub fn register(&mut self, case: BenchmarkCase) -> Result<(), RegistryError> {
        let location = format!("{}:{}", case.file(), case.line());
        if case.suite().is_empty() {
            return Err(RegistryError::InvalidName {
                field: "suite",
                location,
            });
        }
        if case.name().is_empty() {
            return Err(RegistryError::InvalidName {
                field: "case",
                location,
            });
        }

        let key = (case.suite().to_string(), case.name().to_string());
        if let Some(&existing) = self.index.get(&key) {
            let first = &self.cases[existing];
            return Err(RegistryError::Duplicate {
                suite: key.0,
                name: key.1,
                first: format!("{}:{}", first.file(), first.line()),
                second: location,
            });
        }

        tracing::trace!(suite = %key.0, name = %key.1, "registered benchmark");
        self.index.insert(key, self.cases.len());
        self.cases.push(case);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, case: BenchmarkCase) -> Result<Self, RegistryError> {
        self.register(case)?;
        Ok(self)
    }

    /// All cases in registration order
    pub fn all(&self) -> &[BenchmarkCase] {
        &self.cases
    }

    /// Look up a case by suite and name
    pub fn get(&self, suite: &str, name: &str) -> Option<&BenchmarkCase> {
        self.index
            .get(&(suite.to_string(), name.to_string()))
            .map(|&i| &self.cases[i])
    }

    /// Number of registered cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// No case registered
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Consume the registry, yielding cases in registration order
    pub fn into_cases(self) -> Vec<BenchmarkCase> {
        self.cases
    }
}
