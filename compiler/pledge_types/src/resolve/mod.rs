//! The semantic-resolution pipeline.
//!
//! [`resolve_descriptors`] runs the stages in a fixed order over
//! pipeline-local working maps and publishes the finished descriptors
//! into a new [`CompilerContext`] at the very end:
//!
//! 1. type registration (uids, interface tags)
//! 2. fields and constants
//! 3. functions, init and receivers
//! 4. missing-init and empty-struct checks
//! 5. trait flattening, field verification and member copy-down
//! 6. dependency graph and transitive closure
//! 7. free functions and free constants
//! 8. partial bounce layouts
//!
//! Every stage reads only descriptors finalized by earlier stages, and
//! the first violation aborts the whole pipeline.

mod dependencies;
mod fields;
mod functions;
mod partial;
mod receivers;
mod registry;
mod traits;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use pledge_diagnostic::{Diagnostic, ErrorCode};
use pledge_ir::{ast, ParsedType};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::{
    CompilerContext, ConstantDescription, FunctionDescription, TypeDescription, TypeRef,
};

pub use partial::resolve_partial_fields;

/// Working map of descriptors under construction, keyed by type name.
pub(crate) type TypeMap = BTreeMap<String, TypeDescription>;

/// Suffix-mangled name of the generated truncated view of a message
/// struct, used by downstream bounced-struct generation.
pub fn to_bounced(name: &str) -> String {
    format!("{name}%%BOUNCED%%")
}

/// Resolve a parsed type reference against the published context.
///
/// Returns a reference carrying the canonical type name and the original
/// optionality flag. `bounced<>` references are produced internally by
/// bounce-receiver resolution and cannot be resolved here.
pub fn resolve_type_ref(ctx: &CompilerContext, src: &ParsedType) -> Result<TypeRef, Diagnostic> {
    match src {
        ParsedType::Simple { name, optional, span } => {
            let Some(t) = ctx.get_type(name) else {
                return Err(not_found(name, *span));
            };
            Ok(TypeRef::Ref {
                name: t.name.clone(),
                optional: *optional,
            })
        }
        ParsedType::Map { key, value, span } => {
            let Some(k) = ctx.get_type(key) else {
                return Err(not_found(key, *span));
            };
            let Some(v) = ctx.get_type(value) else {
                return Err(not_found(value, *span));
            };
            Ok(TypeRef::Map {
                key: k.name.clone(),
                value: v.name.clone(),
            })
        }
        ParsedType::Bounced { name, span } => Err(Diagnostic::error(
            ErrorCode::E2014,
            format!("bounced<{name}> cannot be resolved in this position"),
            *span,
        )),
    }
}

/// Resolve a parsed type reference against the working map.
///
/// Same rules as [`resolve_type_ref`], used by the pipeline stages
/// before anything is published.
pub(crate) fn build_type_ref(types: &TypeMap, src: &ParsedType) -> Result<TypeRef, Diagnostic> {
    match src {
        ParsedType::Simple { name, optional, span } => {
            if !types.contains_key(name) {
                return Err(not_found(name, *span));
            }
            Ok(TypeRef::Ref {
                name: name.clone(),
                optional: *optional,
            })
        }
        ParsedType::Map { key, value, span } => {
            if !types.contains_key(key) {
                return Err(not_found(key, *span));
            }
            if !types.contains_key(value) {
                return Err(not_found(value, *span));
            }
            Ok(TypeRef::Map {
                key: key.clone(),
                value: value.clone(),
            })
        }
        ParsedType::Bounced { name, span } => Err(Diagnostic::error(
            ErrorCode::E2014,
            format!("bounced<{name}> is only allowed as a bounce receiver argument"),
            *span,
        )),
    }
}

pub(crate) fn not_found(name: &str, span: pledge_ir::Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E2002, format!("Type {name} not found"), span)
}

/// Pipeline-local resolution state.
///
/// All mutable state lives here for the duration of one
/// [`resolve_descriptors`] call and is discarded after publication.
pub(crate) struct Resolver<'a> {
    pub(crate) ctx: &'a CompilerContext,
    pub(crate) module: &'a ast::Module,
    pub(crate) types: TypeMap,
    pub(crate) static_functions: BTreeMap<String, FunctionDescription>,
    pub(crate) static_constants: BTreeMap<String, ConstantDescription>,
    pub(crate) used_uids: FxHashSet<u16>,
}

/// Resolve every declaration of `module` into descriptors and publish
/// them into a new context.
pub fn resolve_descriptors(
    ctx: &CompilerContext,
    module: &ast::Module,
) -> Result<CompilerContext, Diagnostic> {
    let mut resolver = Resolver {
        ctx,
        module,
        types: BTreeMap::new(),
        static_functions: BTreeMap::new(),
        static_constants: BTreeMap::new(),
        used_uids: FxHashSet::default(),
    };

    resolver.register_types()?;
    debug!(types = resolver.types.len(), "registered type declarations");

    resolver.resolve_fields_and_constants()?;
    resolver.resolve_items()?;
    resolver.check_contract_inits()?;
    resolver.check_struct_fields()?;

    resolver.flatten_traits()?;
    resolver.verify_trait_fields()?;
    resolver.copy_trait_members()?;
    debug!("flattened traits and copied members");

    resolver.register_dependencies()?;
    resolver.register_transient_dependencies();

    resolver.resolve_static_functions()?;
    resolver.resolve_static_constants()?;
    debug!(
        functions = resolver.static_functions.len(),
        constants = resolver.static_constants.len(),
        "resolved free declarations"
    );

    resolver.resolve_partial_layouts();

    Ok(resolver.publish())
}

impl Resolver<'_> {
    /// Fail any contract that never declared an `init`.
    fn check_contract_inits(&self) -> Result<(), Diagnostic> {
        for t in self.types.values() {
            if t.kind.is_contract() && t.init.is_none() {
                return Err(Diagnostic::error(
                    ErrorCode::E2017,
                    format!("Contract {} does not have an init function", t.name),
                    t.ast.span(),
                ));
            }
        }
        Ok(())
    }

    /// Fail any struct with no fields.
    fn check_struct_fields(&self) -> Result<(), Diagnostic> {
        for t in self.types.values() {
            if t.kind.is_struct() && t.fields.is_empty() {
                return Err(Diagnostic::error(
                    ErrorCode::E2018,
                    format!("Struct {} does not have any fields", t.name),
                    t.ast.span(),
                ));
            }
        }
        Ok(())
    }

    /// Publish all finished descriptors into a new context.
    fn publish(self) -> CompilerContext {
        let mut ctx = self.ctx.clone();
        for t in self.types.into_values() {
            ctx = ctx.with_type(t);
        }
        for f in self.static_functions.into_values() {
            ctx = ctx.with_static_function(f);
        }
        for c in self.static_constants.into_values() {
            ctx = ctx.with_static_constant(c);
        }
        ctx
    }
}
