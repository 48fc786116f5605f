//! Trait flattening and member copy-down (stage 5).
//!
//! A type's trait graph may be diamond-shaped; flattening produces each
//! trait exactly once. Copy-down then makes the type self-contained:
//! every trait function, receiver and interface tag is cloned onto it,
//! with `overrides` declarations allowed to shadow a trait original of
//! identical signature.

use pledge_diagnostic::{Diagnostic, ErrorCode};
use pledge_ir::ast::TypeDecl;
use pledge_ir::Span;
use rustc_hash::FxHashSet;

use super::Resolver;

impl Resolver<'_> {
    /// Flatten every contract's and trait's trait graph.
    ///
    /// Depth-first over declared traits and already-flattened trait
    /// lists; the visited set is seeded with the type itself, so any
    /// path back to it is a cycle.
    pub(crate) fn flatten_traits(&mut self) -> Result<(), Diagnostic> {
        let names: Vec<String> = self.types.keys().cloned().collect();
        for name in names {
            let declared: Vec<String> = match &*self.types[&name].ast {
                TypeDecl::Contract(c) => c.traits.iter().map(|i| i.name.clone()).collect(),
                TypeDecl::Trait(t) => t.traits.iter().map(|i| i.name.clone()).collect(),
                _ => continue,
            };
            let span = self.types[&name].ast.span();

            let mut visited = FxHashSet::default();
            visited.insert(name.clone());
            let mut flattened = Vec::new();
            for t in &declared {
                self.visit_trait(&name, span, t, &mut visited, &mut flattened)?;
            }

            if let Some(t) = self.types.get_mut(&name) {
                t.traits = flattened;
            }
        }
        Ok(())
    }

    fn visit_trait(
        &self,
        root: &str,
        span: Span,
        name: &str,
        visited: &mut FxHashSet<String>,
        out: &mut Vec<String>,
    ) -> Result<(), Diagnostic> {
        if name == root {
            return Err(Diagnostic::error(
                ErrorCode::E2024,
                format!("Circular trait dependency detected for type {root}"),
                span,
            ));
        }
        if visited.contains(name) {
            return Ok(());
        }
        let Some(tt) = self.types.get(name) else {
            return Err(Diagnostic::error(
                ErrorCode::E2023,
                format!("Trait {name} not found"),
                span,
            ));
        };
        let TypeDecl::Trait(decl) = &*tt.ast else {
            return Err(Diagnostic::error(
                ErrorCode::E2023,
                format!("Type {name} is not a trait"),
                span,
            ));
        };

        visited.insert(name.to_string());
        out.push(name.to_string());

        for s in &decl.traits {
            self.visit_trait(root, span, &s.name, visited, out)?;
        }
        for s in &tt.traits {
            self.visit_trait(root, span, s, visited, out)?;
        }
        Ok(())
    }

    /// Verify every field a trait requires exists on the deriving type
    /// with an identical type.
    pub(crate) fn verify_trait_fields(&self) -> Result<(), Diagnostic> {
        for t in self.types.values() {
            for tr_name in &t.traits {
                let Some(tr) = self.types.get(tr_name) else {
                    return Err(Diagnostic::error(
                        ErrorCode::E2023,
                        format!("Trait {tr_name} not found"),
                        t.ast.span(),
                    ));
                };
                if !tr.kind.is_trait() {
                    return Err(Diagnostic::error(
                        ErrorCode::E2023,
                        format!("Type {tr_name} is not a trait"),
                        t.ast.span(),
                    ));
                }

                for f in &tr.fields {
                    let Some(ex) = t.field(&f.name) else {
                        return Err(Diagnostic::error(
                            ErrorCode::E2025,
                            format!("Trait {tr_name} requires field {}", f.name),
                            t.ast.span(),
                        ));
                    };
                    if ex.ty != f.ty {
                        return Err(Diagnostic::error(
                            ErrorCode::E2025,
                            format!("Trait {tr_name} requires field {} of type {}", f.name, f.ty),
                            t.ast.span(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Copy trait members down onto every deriving type.
    ///
    /// A type is processed only after every type that names it as a
    /// trait, so traits receive their own parents' copies last and
    /// derivers never see them twice.
    pub(crate) fn copy_trait_members(&mut self) -> Result<(), Diagnostic> {
        let mut processed = FxHashSet::default();
        let mut processing = FxHashSet::default();
        let names: Vec<String> = self.types.keys().cloned().collect();
        for name in names {
            self.process_type(&name, &mut processed, &mut processing)?;
        }
        Ok(())
    }

    fn process_type(
        &mut self,
        name: &str,
        processed: &mut FxHashSet<String>,
        processing: &mut FxHashSet<String>,
    ) -> Result<(), Diagnostic> {
        if processed.contains(name) {
            return Ok(());
        }
        if processing.contains(name) {
            return Err(Diagnostic::error(
                ErrorCode::E2024,
                format!("Circular trait dependency detected for type {name}"),
                self.types[name].ast.span(),
            ));
        }
        processing.insert(name.to_string());

        let dependents: Vec<String> = self
            .types
            .values()
            .filter(|v| v.traits.iter().any(|t| t == name))
            .map(|v| v.name.clone())
            .collect();
        for d in dependents {
            self.process_type(&d, processed, processing)?;
        }

        self.copy_traits_into(name)?;

        processed.insert(name.to_string());
        processing.remove(name);
        Ok(())
    }

    fn copy_traits_into(&mut self, name: &str) -> Result<(), Diagnostic> {
        let trait_names = self.types[name].traits.clone();
        for tr_name in trait_names {
            let (tr_functions, tr_receivers, tr_interfaces) = {
                let tr = &self.types[&tr_name];
                (
                    tr.functions.clone(),
                    tr.receivers.clone(),
                    tr.interfaces.clone(),
                )
            };

            for (fname, f) in tr_functions {
                let t = &self.types[name];
                if let Some(ex) = t.functions.get(&fname) {
                    if ex.is_overrides() {
                        if f.is_getter() {
                            return Err(Diagnostic::error(
                                ErrorCode::E2026,
                                format!("Overridden function {fname} cannot be a getter"),
                                ex.ast.span,
                            ));
                        }
                        if f.is_mutating() != ex.is_mutating() {
                            return Err(Diagnostic::error(
                                ErrorCode::E2026,
                                format!("Overridden function {fname} should have the same mutability"),
                                ex.ast.span,
                            ));
                        }
                        if f.returns != ex.returns {
                            return Err(Diagnostic::error(
                                ErrorCode::E2026,
                                format!("Overridden function {fname} should have the same return type"),
                                ex.ast.span,
                            ));
                        }
                        if f.args.len() != ex.args.len() {
                            return Err(Diagnostic::error(
                                ErrorCode::E2026,
                                format!(
                                    "Overridden function {fname} should have the same number of arguments"
                                ),
                                ex.ast.span,
                            ));
                        }
                        for (a, b) in ex.args.iter().zip(f.args.iter()) {
                            if a.ty != b.ty {
                                return Err(Diagnostic::error(
                                    ErrorCode::E2026,
                                    format!(
                                        "Overridden function {fname} should have the same argument types"
                                    ),
                                    ex.ast.span,
                                ));
                            }
                        }
                        // The type's own version wins.
                        continue;
                    }
                    return Err(Diagnostic::error(
                        ErrorCode::E2015,
                        format!("Function {fname} already exists in type {name}"),
                        t.ast.span(),
                    ));
                }

                let mut copied = f;
                copied.owner = Some(name.to_string());
                if let Some(t) = self.types.get_mut(name) {
                    t.functions.insert(fname, copied);
                }
            }

            for r in tr_receivers {
                let t = &self.types[name];
                if t.receivers
                    .iter()
                    .any(|v| v.selector.same_dispatch(&r.selector))
                {
                    return Err(Diagnostic::error(
                        ErrorCode::E2020,
                        format!("Receive function for {} already exists", r.selector),
                        t.ast.span(),
                    ));
                }
                if let Some(t) = self.types.get_mut(name) {
                    t.receivers.push(r);
                }
            }

            if let Some(t) = self.types.get_mut(name) {
                for i in tr_interfaces {
                    if !t.interfaces.contains(&i) {
                        t.interfaces.push(i);
                    }
                }
            }
        }
        Ok(())
    }
}
