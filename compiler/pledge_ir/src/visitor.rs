//! AST Visitor
//!
//! Generic traversal over statements and expressions. Default
//! implementations call `walk_*` functions that visit children; override
//! `visit_*` methods to add behavior at specific nodes.
//!
//! The visitor can mutate its own state during traversal; the AST itself
//! stays immutable.

use crate::ast::{Expr, FunctionBody, FunctionDecl, InitDecl, ReceiverDecl, Stmt};

/// AST visitor trait.
///
/// Override `visit_expr`/`visit_stmt` and call the matching `walk_*`
/// function to continue into children.
pub trait Visitor {
    /// Visit a statement.
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    /// Visit an expression.
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
}

/// Visit every statement in a body in order.
pub fn walk_body<V: Visitor + ?Sized>(v: &mut V, body: &[Stmt]) {
    for stmt in body {
        v.visit_stmt(stmt);
    }
}

/// Visit the children of a statement.
pub fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Let { value, .. } => v.visit_expr(value),
        Stmt::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Stmt::Expression { expr, .. } => v.visit_expr(expr),
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        Stmt::Condition {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            v.visit_expr(condition);
            walk_body(v, then_branch);
            if let Some(else_branch) = else_branch {
                walk_body(v, else_branch);
            }
        }
        Stmt::While {
            condition, body, ..
        } => {
            v.visit_expr(condition);
            walk_body(v, body);
        }
    }
}

/// Visit the children of an expression.
pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::Number { .. }
        | Expr::Bool { .. }
        | Expr::Str { .. }
        | Expr::Null { .. }
        | Expr::Id { .. } => {}
        Expr::Unary { operand, .. } => v.visit_expr(operand),
        Expr::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Field { base, .. } => v.visit_expr(base),
        Expr::StaticCall { args, .. } | Expr::InitOf { args, .. } => {
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::MethodCall { base, args, .. } => {
            v.visit_expr(base);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::StructInit { fields, .. } => {
            for field in fields {
                v.visit_expr(&field.value);
            }
        }
    }
}

/// Visit every expression in a function body.
///
/// Native functions have no body and produce no visits.
pub fn walk_function<V: Visitor + ?Sized>(v: &mut V, decl: &FunctionDecl) {
    if let FunctionBody::Block(body) = &decl.body {
        walk_body(v, body);
    }
}

/// Visit every expression in a receiver body.
pub fn walk_receiver<V: Visitor + ?Sized>(v: &mut V, decl: &ReceiverDecl) {
    walk_body(v, &decl.body);
}

/// Visit every expression in an init body.
pub fn walk_init<V: Visitor + ?Sized>(v: &mut V, decl: &InitDecl) {
    walk_body(v, &decl.body);
}
