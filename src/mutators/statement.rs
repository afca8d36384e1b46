//! Statement removal.

use crate::ast::{AssignOp, Expr, ExprId, NodeRef, Stmt, StmtId, Tree};
use crate::mutation::Mutation;
use crate::types::{reads_of_stmt, TypeInfo};

/// Replaces removable statements in a block or case body with a no-op
/// assignment that keeps every identifier the statement read referenced, so
/// the unused-variable rule does not reject the mutant.
pub fn remove(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Stmt(id) = node else { return Vec::new() };
    let list = match tree.stmt(id).clone() {
        Stmt::Block(list) => list,
        Stmt::Case { body, .. } => body,
        _ => return Vec::new(),
    };

    let mut mutations = Vec::new();
    for sid in list {
        if !removable(tree, sid) {
            continue;
        }
        let from = tree.stmt(sid).clone();
        let to = noop_of(tree, sid);
        mutations.push(Mutation::stmt(sid, from, to));
    }
    mutations
}

fn removable(tree: &Tree, id: StmtId) -> bool {
    match tree.stmt(id) {
        Stmt::Expr(_) | Stmt::IncDec { .. } => true,
        Stmt::Assign { lhs, op, .. } => *op != AssignOp::Define && !all_blank(tree, lhs),
        _ => false,
    }
}

fn all_blank(tree: &Tree, lhs: &[ExprId]) -> bool {
    lhs.iter().all(|e| matches!(tree.expr(*e), Expr::Ident(name) if name == "_"))
}

fn noop_of(tree: &mut Tree, id: StmtId) -> Stmt {
    let reads = reads_of_stmt(tree, id);
    if reads.is_empty() {
        return Stmt::Empty;
    }
    let line = tree.stmt_line(id);
    let blanks: Vec<_> = reads
        .iter()
        .map(|_| tree.add_expr(Expr::Ident("_".to_string()), line))
        .collect();
    Stmt::Assign { lhs: blanks, op: AssignOp::Assign, rhs: reads }
}
