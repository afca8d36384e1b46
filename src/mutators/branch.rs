//! Branch mutators.

use crate::ast::{Expr, NodeRef, Stmt, Tree};
use crate::mutation::Mutation;
use crate::types::TypeInfo;

/// Negates an `if` condition: `if cond` → `if !(cond)`.
pub fn mutate_if(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Stmt(id) = node else { return Vec::new() };
    let Stmt::If { init, cond, then, els } = tree.stmt(id).clone() else {
        return Vec::new();
    };
    let line = tree.stmt_line(id);
    let paren = tree.add_expr(Expr::Paren(cond), line);
    let negated = tree.add_expr(Expr::Unary { op: "!".to_string(), expr: paren }, line);
    vec![Mutation::stmt(
        id,
        Stmt::If { init, cond, then, els },
        Stmt::If { init, cond: negated, then, els },
    )]
}

/// Deletes a plain `else` block. Else-if chains are left alone; deleting the
/// middle of a chain would drop its tail too.
pub fn mutate_else(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Stmt(id) = node else { return Vec::new() };
    let Stmt::If { init, cond, then, els } = tree.stmt(id).clone() else {
        return Vec::new();
    };
    let Some(alt) = els else { return Vec::new() };
    if !matches!(tree.stmt(alt), Stmt::Block(_)) {
        return Vec::new();
    }
    vec![Mutation::stmt(
        id,
        Stmt::If { init, cond, then, els },
        Stmt::If { init, cond, then, els: None },
    )]
}
