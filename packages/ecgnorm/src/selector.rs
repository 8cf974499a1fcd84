//! Strategies for choosing the data variable inside a `.mat` container.
//!
//! Candidates arrive already stripped of reserved `__` names, in the order the
//! container stores them.

use crate::error::{NormalizeError, Result};
use glob::Pattern;

pub trait VariableSelector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Index into `candidates` of the chosen variable.
    fn select(&self, candidates: &[&str]) -> Result<usize>;
}

/// First variable in container order. Containers holding several real
/// variables silently resolve to the first one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstVariable;

impl VariableSelector for FirstVariable {
    fn name(&self) -> &'static str {
        "first"
    }

    fn select(&self, candidates: &[&str]) -> Result<usize> {
        if candidates.is_empty() {
            return Err(NormalizeError::NoData);
        }
        if candidates.len() > 1 {
            log::warn!(
                "{} candidate variables {:?}; using '{}'",
                candidates.len(),
                candidates,
                candidates[0]
            );
        }
        Ok(0)
    }
}

/// Variable with an exact name
#[derive(Debug, Clone)]
pub struct NamedVariable(pub String);

impl VariableSelector for NamedVariable {
    fn name(&self) -> &'static str {
        "named"
    }

    fn select(&self, candidates: &[&str]) -> Result<usize> {
        if candidates.is_empty() {
            return Err(NormalizeError::NoData);
        }
        candidates
            .iter()
            .position(|c| *c == self.0)
            .ok_or_else(|| not_found(format!("name '{}'", self.0), candidates))
    }
}

/// First variable whose name matches a glob pattern (e.g. `ecg*`)
#[derive(Debug, Clone)]
pub struct PatternVariable(Pattern);

impl PatternVariable {
    pub fn new(pattern: &str) -> std::result::Result<Self, glob::PatternError> {
        Ok(Self(Pattern::new(pattern)?))
    }
}

impl VariableSelector for PatternVariable {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn select(&self, candidates: &[&str]) -> Result<usize> {
        if candidates.is_empty() {
            return Err(NormalizeError::NoData);
        }
        candidates
            .iter()
            .position(|c| self.0.matches(c))
            .ok_or_else(|| not_found(format!("pattern '{}'", self.0), candidates))
    }
}

/// Refuses to guess: exactly one candidate is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueVariable;

impl VariableSelector for UniqueVariable {
    fn name(&self) -> &'static str {
        "unique"
    }

    fn select(&self, candidates: &[&str]) -> Result<usize> {
        match candidates.len() {
            0 => Err(NormalizeError::NoData),
            1 => Ok(0),
            _ => Err(NormalizeError::AmbiguousVariable {
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }
}

fn not_found(selector: String, candidates: &[&str]) -> NormalizeError {
    NormalizeError::VariableNotFound {
        selector,
        candidates: candidates.iter().map(|c| c.to_string()).collect(),
    }
}
