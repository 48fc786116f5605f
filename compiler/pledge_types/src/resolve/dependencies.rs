//! Dependency graph construction (stage 6).
//!
//! A type depends on every contract it may instantiate. Direct edges
//! come from `initOf` expressions in function and receiver bodies; the
//! closure makes the set transitive so codegen can order contract
//! emission.

use pledge_diagnostic::Diagnostic;
use pledge_ir::ast::Expr;
use pledge_ir::visitor::{self, Visitor};
use pledge_ir::Span;

use super::{not_found, Resolver, TypeMap};

/// Collects `initOf` targets in traversal order.
#[derive(Default)]
struct InitOfCollector {
    found: Vec<(String, Span)>,
}

impl Visitor for InitOfCollector {
    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::InitOf { name, span, .. } = expr {
            self.found.push((name.clone(), *span));
        }
        visitor::walk_expr(self, expr);
    }
}

fn collect_transitive(types: &TypeMap, name: &str, to: &mut Vec<String>) {
    let Some(t) = types.get(name) else { return };
    for d in &t.depends_on {
        if to.contains(d) {
            continue;
        }
        to.push(d.clone());
        collect_transitive(types, d, to);
    }
}

impl Resolver<'_> {
    /// Record each type's direct dependencies from its own function and
    /// receiver bodies, self-references excluded.
    pub(crate) fn register_dependencies(&mut self) -> Result<(), Diagnostic> {
        let names: Vec<String> = self.types.keys().cloned().collect();
        for name in names {
            let mut collector = InitOfCollector::default();
            {
                let t = &self.types[&name];
                for f in t.functions.values() {
                    visitor::walk_function(&mut collector, &f.ast);
                }
                for r in &t.receivers {
                    visitor::walk_receiver(&mut collector, &r.ast);
                }
            }

            let mut direct: Vec<String> = Vec::new();
            for (target, span) in collector.found {
                if !self.types.contains_key(&target) {
                    return Err(not_found(&target, span));
                }
                if target != name && !direct.contains(&target) {
                    direct.push(target);
                }
            }

            if let Some(t) = self.types.get_mut(&name) {
                t.depends_on = direct;
            }
        }
        Ok(())
    }

    /// Close every dependency list transitively.
    pub(crate) fn register_transient_dependencies(&mut self) {
        let names: Vec<String> = self.types.keys().cloned().collect();
        for name in &names {
            let mut closure: Vec<String> = vec![name.clone()];
            collect_transitive(&self.types, name, &mut closure);

            if let Some(t) = self.types.get_mut(name) {
                for s in closure {
                    if s != *name && !t.depends_on.contains(&s) {
                        t.depends_on.push(s);
                    }
                }
            }
        }
    }
}
