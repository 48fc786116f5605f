//! Field and constant resolution (stage 2).
//!
//! Walks declarations in source order, so the first declaration of a
//! colliding name is the one the diagnostic points away from.

use pledge_diagnostic::{Diagnostic, ErrorCode};
use pledge_ir::ast::{ConstDecl, FieldDecl, Item, TypeDecl};

use super::{build_type_ref, Resolver, TypeMap};
use crate::{
    resolve_abi_type, resolve_constant_value, CompilerContext, ConstantDescription,
    FieldDescription,
};

/// Build a field descriptor: resolve its type, default value and ABI
/// shape.
pub(crate) fn build_field_description(
    types: &TypeMap,
    ctx: &CompilerContext,
    decl: &FieldDecl,
    index: usize,
) -> Result<FieldDescription, Diagnostic> {
    let ty = build_type_ref(types, &decl.ty)?;

    let default = match &decl.init {
        Some(expr) => Some(resolve_constant_value(&ty, expr, ctx)?),
        None => None,
    };

    let abi = resolve_abi_type(decl)?;

    Ok(FieldDescription {
        name: decl.name.clone(),
        ty,
        index,
        default,
        serialization: decl.serialization.clone(),
        abi,
        span: decl.span,
    })
}

/// Build a constant descriptor: resolve its type and literal value.
pub(crate) fn build_constant_description(
    types: &TypeMap,
    ctx: &CompilerContext,
    decl: &ConstDecl,
) -> Result<ConstantDescription, Diagnostic> {
    let ty = build_type_ref(types, &decl.ty)?;
    let value = resolve_constant_value(&ty, &decl.value, ctx)?;
    Ok(ConstantDescription {
        name: decl.name.clone(),
        ty,
        value,
        span: decl.span,
    })
}

impl Resolver<'_> {
    /// Resolve fields and constants for every registered type.
    pub(crate) fn resolve_fields_and_constants(&mut self) -> Result<(), Diagnostic> {
        let module = self.module;
        for decl in &module.types {
            match decl {
                TypeDecl::Contract(c) => {
                    for item in &c.declarations {
                        match item {
                            Item::Field(f) => self.add_field(&c.name, f, true)?,
                            Item::Constant(k) => self.add_constant(&c.name, k)?,
                            _ => {}
                        }
                    }
                }
                TypeDecl::Struct(s) => {
                    for f in &s.fields {
                        self.add_field(&s.name, f, true)?;
                    }
                }
                TypeDecl::Trait(t) => {
                    for item in &t.declarations {
                        if let Item::Field(f) = item {
                            self.add_field(&t.name, f, false)?;
                        }
                    }
                }
                TypeDecl::Primitive(_) => {}
            }
        }
        Ok(())
    }

    /// Check collisions, then build and attach one field.
    ///
    /// Traits describe shape, not wire layout, so their fields may not
    /// carry a serialization hint (`hint_allowed` is false there).
    fn add_field(
        &mut self,
        owner: &str,
        decl: &FieldDecl,
        hint_allowed: bool,
    ) -> Result<(), Diagnostic> {
        let index = {
            let t = &self.types[owner];
            if t.field(&decl.name).is_some() {
                return Err(Diagnostic::error(
                    ErrorCode::E2003,
                    format!("Field {} already exists", decl.name),
                    decl.span,
                ));
            }
            if t.constant(&decl.name).is_some() {
                return Err(Diagnostic::error(
                    ErrorCode::E2004,
                    format!("Constant {} already exists", decl.name),
                    decl.span,
                ));
            }
            t.fields.len()
        };

        if !hint_allowed && decl.serialization.is_some() {
            return Err(Diagnostic::error(
                ErrorCode::E2005,
                "Trait field cannot have a serialization hint",
                decl.span,
            ));
        }

        let field = build_field_description(&self.types, self.ctx, decl, index)?;
        if let Some(t) = self.types.get_mut(owner) {
            t.fields.push(field);
        }
        Ok(())
    }

    /// Check collisions, then build and attach one constant.
    fn add_constant(&mut self, owner: &str, decl: &ConstDecl) -> Result<(), Diagnostic> {
        {
            let t = &self.types[owner];
            if t.field(&decl.name).is_some() {
                return Err(Diagnostic::error(
                    ErrorCode::E2003,
                    format!("Field {} already exists", decl.name),
                    decl.span,
                ));
            }
            if t.constant(&decl.name).is_some() {
                return Err(Diagnostic::error(
                    ErrorCode::E2004,
                    format!("Constant {} already exists", decl.name),
                    decl.span,
                ));
            }
        }

        let constant = build_constant_description(&self.types, self.ctx, decl)?;
        if let Some(t) = self.types.get_mut(owner) {
            t.constants.push(constant);
        }
        Ok(())
    }
}
