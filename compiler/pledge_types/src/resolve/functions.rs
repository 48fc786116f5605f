//! Function, init and free-declaration resolution (stages 3 and 7).
//!
//! `resolve_function_descriptor` enforces the whole modifier rule
//! table; it is shared by the type-bound pass and the free-function
//! pass (where an `extends` receiver re-binds the function to a type).

use std::sync::Arc;

use pledge_diagnostic::{Diagnostic, ErrorCode};
use pledge_ir::ast::{self, FunctionAttributeKind, Item, TypeDecl, TypeOrigin};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::{build_type_ref, fields::build_constant_description, Resolver, TypeMap};
use crate::{
    FunctionArg, FunctionDescription, FunctionFlags, InitDescription, TypeRef,
};

/// Resolve one function declaration into a descriptor.
///
/// `owner` is the type the declaration is lexically bound to, or `None`
/// for a free function. An `extends` function must be free at
/// declaration; its first `self` argument names the effective owner and
/// is dropped from the argument list.
pub(crate) fn resolve_function_descriptor(
    types: &TypeMap,
    owner: Option<&str>,
    decl: &ast::FunctionDecl,
    origin: TypeOrigin,
) -> Result<FunctionDescription, Diagnostic> {
    let returns = match &decl.returns {
        Some(r) => build_type_ref(types, r)?,
        None => TypeRef::Void,
    };

    let mut args: SmallVec<[FunctionArg; 4]> = SmallVec::new();
    for p in &decl.args {
        args.push(FunctionArg {
            name: p.name.clone(),
            ty: build_type_ref(types, &p.ty)?,
            span: p.span,
        });
    }

    let is_public = decl.attribute(FunctionAttributeKind::Public);
    let is_getter = decl.attribute(FunctionAttributeKind::Getter);
    let is_mutating = decl.attribute(FunctionAttributeKind::Mutating);
    let is_extends = decl.attribute(FunctionAttributeKind::Extends);
    let is_virtual = decl.attribute(FunctionAttributeKind::Virtual);
    let is_overrides = decl.attribute(FunctionAttributeKind::Overrides);
    let is_inline = decl.attribute(FunctionAttributeKind::Inline);

    if decl.is_native() {
        if let Some(a) = is_public {
            return Err(illegal(ErrorCode::E2006, "Native functions cannot be public", a.span));
        }
        if let Some(a) = is_getter {
            return Err(illegal(ErrorCode::E2006, "Native functions cannot be getters", a.span));
        }
        if owner.is_some() {
            return Err(illegal(
                ErrorCode::E2006,
                "Native functions cannot be declared within a contract",
                decl.span,
            ));
        }
        if let Some(a) = is_virtual {
            return Err(illegal(ErrorCode::E2006, "Native functions cannot be virtual", a.span));
        }
        if let Some(a) = is_overrides {
            return Err(illegal(
                ErrorCode::E2006,
                "Native functions cannot be overrides",
                a.span,
            ));
        }
    }

    if let (Some(a), Some(_)) = (is_virtual, is_extends) {
        return Err(illegal(ErrorCode::E2007, "Extend functions cannot be virtual", a.span));
    }
    if let (Some(a), Some(_)) = (is_overrides, is_extends) {
        return Err(illegal(ErrorCode::E2007, "Extend functions cannot be overrides", a.span));
    }
    if let (Some(a), None) = (is_virtual, owner) {
        return Err(illegal(
            ErrorCode::E2008,
            "Virtual functions must be defined within a contract or a trait",
            a.span,
        ));
    }
    if let (Some(a), None) = (is_overrides, owner) {
        return Err(illegal(
            ErrorCode::E2008,
            "Override functions must be defined within a contract or a trait",
            a.span,
        ));
    }

    if let (Some(a), Some(owner_name)) = (is_virtual, owner) {
        if !types[owner_name].kind.is_trait() {
            return Err(illegal(
                ErrorCode::E2009,
                "Virtual functions must be defined within a trait",
                a.span,
            ));
        }
    }
    if let (Some(a), Some(owner_name)) = (is_overrides, owner) {
        if !types[owner_name].kind.is_contract() {
            return Err(illegal(
                ErrorCode::E2010,
                "Override functions must be defined within a contract",
                a.span,
            ));
        }
    }

    if !decl.is_native() {
        if let (Some(a), None) = (is_public, owner) {
            return Err(illegal(
                ErrorCode::E2008,
                "Public functions must be defined within a contract",
                a.span,
            ));
        }
        if let (Some(a), None) = (is_getter, owner) {
            return Err(illegal(
                ErrorCode::E2008,
                "Getters must be defined within a contract",
                a.span,
            ));
        }
    }

    if let (Some(a), Some(_)) = (is_public, is_getter) {
        return Err(illegal(
            ErrorCode::E2007,
            "Functions cannot be both public and getters",
            a.span,
        ));
    }
    if let (Some(a), Some(_)) = (is_inline, is_getter) {
        return Err(illegal(ErrorCode::E2007, "Getters cannot be inline", a.span));
    }

    let mut effective_owner = owner.map(str::to_string);
    if let Some(a) = is_extends {
        if owner.is_some() {
            return Err(illegal(
                ErrorCode::E2011,
                "Extend functions cannot be defined within a contract",
                a.span,
            ));
        }
        if args.is_empty() {
            return Err(illegal(
                ErrorCode::E2011,
                "Extend functions must have at least one argument",
                a.span,
            ));
        }

        let first = &args[0];
        if first.name != "self" {
            return Err(illegal(
                ErrorCode::E2011,
                "Extend function must have first argument named \"self\"",
                first.span,
            ));
        }
        match &first.ty {
            TypeRef::Ref { name, optional } => {
                if *optional {
                    return Err(illegal(
                        ErrorCode::E2011,
                        "Extend functions must have a non-optional type as the first argument",
                        first.span,
                    ));
                }
                effective_owner = Some(name.clone());
            }
            _ => {
                return Err(illegal(
                    ErrorCode::E2011,
                    "Extend functions must have a reference type as the first argument",
                    first.span,
                ));
            }
        }
        args.remove(0);
    }

    if let (Some(a), None) = (is_mutating, is_extends) {
        return Err(illegal(
            ErrorCode::E2012,
            "Mutating functions must be extend functions",
            a.span,
        ));
    }

    let mut seen = FxHashSet::default();
    for arg in &args {
        if arg.name == "self" {
            return Err(illegal(
                ErrorCode::E2013,
                "Argument name \"self\" is reserved",
                arg.span,
            ));
        }
        if !seen.insert(arg.name.clone()) {
            return Err(illegal(
                ErrorCode::E2013,
                format!("Argument name \"{}\" is already used", arg.name),
                arg.span,
            ));
        }
    }

    let mut flags = FunctionFlags::empty();
    flags.set(FunctionFlags::PUBLIC, is_public.is_some());
    flags.set(FunctionFlags::GETTER, is_getter.is_some());
    // Any type-bound function may change contract state as a side
    // effect of the call, getters included.
    flags.set(FunctionFlags::MUTATING, is_mutating.is_some() || owner.is_some());
    flags.set(FunctionFlags::VIRTUAL, is_virtual.is_some());
    flags.set(FunctionFlags::OVERRIDES, is_overrides.is_some());
    flags.set(FunctionFlags::INLINE, is_inline.is_some());

    Ok(FunctionDescription {
        name: decl.name.clone(),
        owner: effective_owner,
        origin,
        args,
        returns,
        flags,
        ast: Arc::new(decl.clone()),
    })
}

fn illegal(code: ErrorCode, message: impl Into<String>, span: pledge_ir::Span) -> Diagnostic {
    Diagnostic::error(code, message, span)
}

/// Resolve an `init` declaration.
fn resolve_init_function(
    types: &TypeMap,
    decl: &ast::InitDecl,
) -> Result<InitDescription, Diagnostic> {
    let mut args: SmallVec<[FunctionArg; 4]> = SmallVec::new();
    for p in &decl.args {
        args.push(FunctionArg {
            name: p.name.clone(),
            ty: build_type_ref(types, &p.ty)?,
            span: p.span,
        });
    }
    Ok(InitDescription {
        args,
        ast: Arc::new(decl.clone()),
    })
}

impl Resolver<'_> {
    /// Resolve functions, init and receivers for every contract and
    /// trait (stage 3).
    pub(crate) fn resolve_items(&mut self) -> Result<(), Diagnostic> {
        let module = self.module;
        for decl in &module.types {
            let (name, items, origin) = match decl {
                TypeDecl::Contract(c) => (&c.name, &c.declarations, c.origin),
                TypeDecl::Trait(t) => (&t.name, &t.declarations, t.origin),
                _ => continue,
            };

            for item in items {
                match item {
                    Item::Function(d) => {
                        let f = resolve_function_descriptor(&self.types, Some(name), d, origin)?;
                        debug_assert_eq!(f.owner.as_deref(), Some(name.as_str()));
                        if self.types[name].functions.contains_key(&f.name) {
                            return Err(Diagnostic::error(
                                ErrorCode::E2015,
                                format!("Function {} already exists in type {name}", f.name),
                                d.span,
                            ));
                        }
                        if let Some(t) = self.types.get_mut(name) {
                            t.functions.insert(f.name.clone(), f);
                        }
                    }
                    Item::Init(d) => {
                        if self.types[name].init.is_some() {
                            return Err(Diagnostic::error(
                                ErrorCode::E2016,
                                "Init function already exists",
                                d.span,
                            ));
                        }
                        let init = resolve_init_function(&self.types, d)?;
                        if let Some(t) = self.types.get_mut(name) {
                            t.init = Some(init);
                        }
                    }
                    Item::Receiver(d) => self.resolve_receiver(name, d)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Resolve free functions (stage 7).
    ///
    /// An `extends` function attaches to its receiver type; everything
    /// else lands in the static function map.
    pub(crate) fn resolve_static_functions(&mut self) -> Result<(), Diagnostic> {
        let module = self.module;
        for decl in &module.functions {
            let f = resolve_function_descriptor(&self.types, None, decl, decl.origin)?;
            if let Some(owner) = f.owner.clone() {
                if self.types[&owner].functions.contains_key(&f.name) {
                    return Err(Diagnostic::error(
                        ErrorCode::E2015,
                        format!("Function {} already exists in type {owner}", f.name),
                        decl.span,
                    ));
                }
                if let Some(t) = self.types.get_mut(&owner) {
                    t.functions.insert(f.name.clone(), f);
                }
            } else {
                if self.static_functions.contains_key(&f.name) {
                    return Err(Diagnostic::error(
                        ErrorCode::E2027,
                        format!("Static function {} already exists", f.name),
                        decl.span,
                    ));
                }
                if self.static_constants.contains_key(&f.name) {
                    return Err(Diagnostic::error(
                        ErrorCode::E2027,
                        format!("Static constant {} already exists", f.name),
                        decl.span,
                    ));
                }
                self.static_functions.insert(f.name.clone(), f);
            }
        }
        Ok(())
    }

    /// Resolve free constants (stage 7).
    pub(crate) fn resolve_static_constants(&mut self) -> Result<(), Diagnostic> {
        let module = self.module;
        for decl in &module.constants {
            if self.static_constants.contains_key(&decl.name) {
                return Err(Diagnostic::error(
                    ErrorCode::E2027,
                    format!("Static constant {} already exists", decl.name),
                    decl.span,
                ));
            }
            if self.static_functions.contains_key(&decl.name) {
                return Err(Diagnostic::error(
                    ErrorCode::E2027,
                    format!("Static function {} already exists", decl.name),
                    decl.span,
                ));
            }
            let c = build_constant_description(&self.types, self.ctx, decl)?;
            self.static_constants.insert(c.name.clone(), c);
        }
        Ok(())
    }
}
