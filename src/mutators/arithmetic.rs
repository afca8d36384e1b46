//! Arithmetic and bitwise operator mutators.

use crate::ast::{AssignOp, BinOp, Expr, NodeRef, Stmt, Tree};
use crate::mutation::Mutation;
use crate::types::TypeInfo;

fn arithmetic_swap(op: BinOp) -> Option<BinOp> {
    Some(match op {
        BinOp::Add => BinOp::Sub,
        BinOp::Sub => BinOp::Add,
        BinOp::Mul => BinOp::Div,
        BinOp::Div => BinOp::Mul,
        BinOp::Rem => BinOp::Mul,
        _ => return None,
    })
}

fn bitwise_swap(op: BinOp) -> Option<BinOp> {
    Some(match op {
        BinOp::And => BinOp::Or,
        BinOp::Or => BinOp::And,
        BinOp::Xor => BinOp::And,
        BinOp::Shl => BinOp::Shr,
        BinOp::Shr => BinOp::Shl,
        BinOp::AndNot => BinOp::And,
        _ => return None,
    })
}

fn assign_swap(op: AssignOp) -> Option<AssignOp> {
    Some(match op {
        AssignOp::Add => AssignOp::Sub,
        AssignOp::Sub => AssignOp::Add,
        AssignOp::Mul => AssignOp::Div,
        AssignOp::Div => AssignOp::Mul,
        AssignOp::Rem => AssignOp::Mul,
        _ => return None,
    })
}

/// Swaps base arithmetic operators. Skips string concatenation, where the
/// swapped operator would not type-check.
pub fn base(tree: &mut Tree, info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Expr(id) = node else { return Vec::new() };
    let Expr::Binary { left, op, right } = tree.expr(id).clone() else {
        return Vec::new();
    };
    if info.is_string(id) {
        return Vec::new();
    }
    let Some(mutated) = arithmetic_swap(op) else { return Vec::new() };
    vec![Mutation::expr(
        id,
        Expr::Binary { left, op, right },
        Expr::Binary { left, op: mutated, right },
    )]
}

/// Swaps bitwise operators. Bitwise operands are integers in Go, so no type
/// guard is needed.
pub fn bitwise(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Expr(id) = node else { return Vec::new() };
    let Expr::Binary { left, op, right } = tree.expr(id).clone() else {
        return Vec::new();
    };
    let Some(mutated) = bitwise_swap(op) else { return Vec::new() };
    vec![Mutation::expr(
        id,
        Expr::Binary { left, op, right },
        Expr::Binary { left, op: mutated, right },
    )]
}

/// Turns a compound assignment into a plain assignment (`a += b` → `a = b`).
pub fn assignment(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Stmt(id) = node else { return Vec::new() };
    let Stmt::Assign { lhs, op, rhs } = tree.stmt(id).clone() else {
        return Vec::new();
    };
    if !op.is_compound() {
        return Vec::new();
    }
    vec![Mutation::stmt(
        id,
        Stmt::Assign { lhs: lhs.clone(), op, rhs: rhs.clone() },
        Stmt::Assign { lhs, op: AssignOp::Assign, rhs },
    )]
}

/// Swaps compound assignment operators (`+=` ↔ `-=`). Skips string
/// concatenation assignments.
pub fn assign_invert(tree: &mut Tree, info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    let NodeRef::Stmt(id) = node else { return Vec::new() };
    let Stmt::Assign { lhs, op, rhs } = tree.stmt(id).clone() else {
        return Vec::new();
    };
    if let Some(first) = lhs.first() {
        if info.is_string(*first) {
            return Vec::new();
        }
    }
    let Some(mutated) = assign_swap(op) else { return Vec::new() };
    vec![Mutation::stmt(
        id,
        Stmt::Assign { lhs: lhs.clone(), op, rhs: rhs.clone() },
        Stmt::Assign { lhs, op: mutated, rhs },
    )]
}
