//! Logical-connective term removal.

use crate::ast::{BinOp, Expr, NodeRef, Tree};
use crate::mutation::Mutation;
use crate::types::TypeInfo;

/// On `a && b` / `a || b`, yields one mutation keeping only the left operand
/// and one keeping only the right. Both operands are boolean, so either
/// replacement type-checks.
pub fn remove_term(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Expr(id) = node else { return Vec::new() };
    let Expr::Binary { left, op, right } = tree.expr(id).clone() else {
        return Vec::new();
    };
    if op != BinOp::LAnd && op != BinOp::LOr {
        return Vec::new();
    }
    let from = Expr::Binary { left, op, right };
    vec![
        Mutation::expr(id, from.clone(), tree.expr(left).clone()),
        Mutation::expr(id, from, tree.expr(right).clone()),
    ]
}
