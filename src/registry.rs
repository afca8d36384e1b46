//! Named catalogue of mutators.
//!
//! One registry exists per engine run, populated exactly once at
//! construction. Registration is additive only; registering a name twice is
//! a programmer error and panics.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::ast::{NodeRef, Tree};
use crate::mutation::Mutation;
use crate::types::TypeInfo;

/// A rewrite rule. May allocate replacement nodes in the tree while building
/// its mutations, but edits slots only through the returned [`Mutation`]s.
/// The type-info bundle is read-only.
pub type MutatorFn = fn(&mut Tree, &TypeInfo, NodeRef) -> Vec<Mutation>;

#[derive(Debug, Error)]
#[error("unknown mutator {0:?}")]
pub struct UnknownMutator(pub String);

#[derive(Default)]
pub struct Registry {
    mutators: BTreeMap<String, MutatorFn>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Registry with the full built-in catalogue.
    pub fn with_defaults() -> Registry {
        let mut reg = Registry::new();
        crate::mutators::register_all(&mut reg);
        reg
    }

    /// Registers a mutator under a unique name. Panics if the name is taken.
    pub fn register(&mut self, name: &str, mutator: MutatorFn) {
        if self.mutators.contains_key(name) {
            panic!("mutator {:?} is already registered", name);
        }
        self.mutators.insert(name.to_string(), mutator);
    }

    /// All registered names, sorted.
    pub fn list(&self) -> Vec<&str> {
        self.mutators.keys().map(|s| s.as_str()).collect()
    }

    pub fn lookup(&self, name: &str) -> Result<MutatorFn, UnknownMutator> {
        self.mutators
            .get(name)
            .copied()
            .ok_or_else(|| UnknownMutator(name.to_string()))
    }

    /// Registered mutators minus those matching a disable pattern
    /// (glob syntax, `*` suffix allowed). Invalid patterns match nothing.
    pub fn enabled(&self, disable: &[String]) -> Vec<(String, MutatorFn)> {
        let patterns: Vec<glob::Pattern> = disable
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();
        self.mutators
            .iter()
            .filter(|(name, _)| !patterns.iter().any(|p| p.matches(name)))
            .map(|(name, f)| (name.clone(), *f))
            .collect()
    }
}
