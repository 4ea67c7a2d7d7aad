//! Symbolic environments for the substitution walk.
//!
//! A [`SymbolicEnv`] maps a [`BindingKey`] to the expression currently
//! standing in for that binding. Scoping is clone-per-block: entering a
//! function body or branch takes a shallow copy, so rebindings inside a
//! nested block never leak into the enclosing scope.

use std::collections::{HashMap, HashSet};

use crate::ast::{Expr, Lit};

/// Identity of one symbolic binding.
///
/// Element keys are a two-part type rather than a pasted-together
/// `"a[0]"` string, so an identifier that happens to contain brackets can
/// never collide with an element write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingKey {
    Name(String),
    Element { object: String, index: String },
}

impl BindingKey {
    pub fn name(name: &str) -> Self {
        BindingKey::Name(name.to_string())
    }

    /// Key for a write or read of `object[index]`. The index is stored in
    /// its printed form so `a[0]` re-parses to the same key.
    pub fn element(object: &str, index: &Lit) -> Self {
        BindingKey::Element {
            object: object.to_string(),
            index: index.raw(),
        }
    }
}

/// Mapping from binding identity to the expression that represents it.
#[derive(Debug, Clone, Default)]
pub struct SymbolicEnv {
    bindings: HashMap<BindingKey, Expr>,
}

impl SymbolicEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: BindingKey, value: Expr) {
        self.bindings.insert(key, value);
    }

    pub fn lookup(&self, key: &BindingKey) -> Option<&Expr> {
        self.bindings.get(key)
    }

    /// Fresh scope for a nested block: a shallow copy of this environment.
    pub fn child(&self) -> SymbolicEnv {
        self.clone()
    }
}

/// Names that substitution must keep visible in the output: function
/// parameters and top-level (global) declarations. Declarations of and
/// assignments to any other name are folded away.
#[derive(Debug, Default)]
pub struct PreservedNames {
    names: HashSet<String>,
}

impl PreservedNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
