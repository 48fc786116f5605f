//! The immutable compilation context.
//!
//! Resolved state is threaded between passes as a value: every `with_*`
//! call consumes a context and returns a new one, so a pass can never
//! observe another pass's half-built state. Descriptors are `Arc`-shared
//! and never mutated after publication.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::{ConstantDescription, FunctionDescription, TypeDescription};

/// Feature gate for external-message receivers.
pub const FEATURE_EXTERNALS: &str = "externals";

/// The compilation context: published descriptors plus configuration.
#[derive(Clone, Debug, Default)]
pub struct CompilerContext {
    types: BTreeMap<String, Arc<TypeDescription>>,
    static_functions: BTreeMap<String, Arc<FunctionDescription>>,
    static_constants: BTreeMap<String, Arc<ConstantDescription>>,
    features: FxHashSet<String>,
}

impl CompilerContext {
    /// Create an empty context with no features enabled.
    pub fn new() -> Self {
        Self::default()
    }

    // === Configuration ===

    /// Enable a named feature.
    #[must_use]
    pub fn with_feature(mut self, name: impl Into<String>) -> Self {
        self.features.insert(name.into());
        self
    }

    /// Check whether a named feature is enabled.
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.contains(name)
    }

    /// Whether external-message receivers may be resolved.
    pub fn externals_enabled(&self) -> bool {
        self.feature_enabled(FEATURE_EXTERNALS)
    }

    // === Publication (each returns a new context) ===

    /// Publish a type descriptor.
    #[must_use]
    pub fn with_type(mut self, ty: TypeDescription) -> Self {
        self.types.insert(ty.name.clone(), Arc::new(ty));
        self
    }

    /// Publish a free (static) function descriptor.
    #[must_use]
    pub fn with_static_function(mut self, function: FunctionDescription) -> Self {
        self.static_functions
            .insert(function.name.clone(), Arc::new(function));
        self
    }

    /// Publish a free (static) constant descriptor.
    #[must_use]
    pub fn with_static_constant(mut self, constant: ConstantDescription) -> Self {
        self.static_constants
            .insert(constant.name.clone(), Arc::new(constant));
        self
    }

    // === Lookup ===

    /// Look up a published type by name.
    pub fn get_type(&self, name: &str) -> Option<&Arc<TypeDescription>> {
        self.types.get(name)
    }

    /// All published types, in name order.
    pub fn all_types(&self) -> impl Iterator<Item = &Arc<TypeDescription>> {
        self.types.values()
    }

    /// Names of all published contract-kind types, in name order.
    pub fn contracts(&self) -> Vec<&str> {
        self.types
            .values()
            .filter(|t| t.kind.is_contract())
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Look up a free function by name.
    pub fn static_function(&self, name: &str) -> Option<&Arc<FunctionDescription>> {
        self.static_functions.get(name)
    }

    /// Check whether a free function exists.
    pub fn has_static_function(&self, name: &str) -> bool {
        self.static_functions.contains_key(name)
    }

    /// All free functions, in name order.
    pub fn all_static_functions(&self) -> impl Iterator<Item = &Arc<FunctionDescription>> {
        self.static_functions.values()
    }

    /// Look up a free constant by name.
    pub fn static_constant(&self, name: &str) -> Option<&Arc<ConstantDescription>> {
        self.static_constants.get(name)
    }

    /// Check whether a free constant exists.
    pub fn has_static_constant(&self, name: &str) -> bool {
        self.static_constants.contains_key(name)
    }

    /// All free constants, in name order.
    pub fn all_static_constants(&self) -> impl Iterator<Item = &Arc<ConstantDescription>> {
        self.static_constants.values()
    }
}
