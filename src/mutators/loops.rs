//! Loop mutators.

use crate::ast::{Expr, NodeRef, Stmt, Tree};
use crate::mutation::Mutation;
use crate::types::TypeInfo;

/// Injects an unconditional `break` at the head of a `for` body.
pub fn break_loop(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Stmt(id) = node else { return Vec::new() };
    let Stmt::For { body, .. } = tree.stmt(id).clone() else {
        return Vec::new();
    };
    let brk = tree.add_stmt(Stmt::Break, tree.stmt_line(id));
    vec![Mutation::insert_head(body, brk)]
}

/// Negates a `for` condition: `for cond` → `for !(cond)`.
pub fn condition(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Stmt(id) = node else { return Vec::new() };
    let Stmt::For { init, cond, post, body } = tree.stmt(id).clone() else {
        return Vec::new();
    };
    let Some(cond) = cond else { return Vec::new() };
    let line = tree.stmt_line(id);
    let paren = tree.add_expr(Expr::Paren(cond), line);
    let negated = tree.add_expr(Expr::Unary { op: "!".to_string(), expr: paren }, line);
    vec![Mutation::stmt(
        id,
        Stmt::For { init, cond: Some(cond), post, body },
        Stmt::For { init, cond: Some(negated), post, body },
    )]
}

/// Injects an unconditional `break` at the head of a `for … range` body.
pub fn range_break(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Stmt(id) = node else { return Vec::new() };
    let Stmt::Range { body, .. } = tree.stmt(id).clone() else {
        return Vec::new();
    };
    let brk = tree.add_stmt(Stmt::Break, tree.stmt_line(id));
    vec![Mutation::insert_head(body, brk)]
}
