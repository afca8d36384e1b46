//! Integer literal mutators.

use crate::ast::{Expr, NodeRef, Tree};
use crate::mutation::Mutation;
use crate::types::TypeInfo;

fn shift(tree: &mut Tree, node: NodeRef, delta: i128) -> Vec<Mutation> {
    let NodeRef::Expr(id) = node else { return Vec::new() };
    let Expr::IntLit(text) = tree.expr(id).clone() else {
        return Vec::new();
    };
    // Hex, octal and binary literals are left alone.
    let Ok(value) = text.parse::<i128>() else { return Vec::new() };
    vec![Mutation::expr(
        id,
        Expr::IntLit(text),
        Expr::IntLit((value + delta).to_string()),
    )]
}

/// Replaces an integer literal with its value plus one.
pub fn incrementer(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    shift(tree, node, 1)
}

/// Replaces an integer literal with its value minus one.
pub fn decrementer(tree: &mut Tree, _info: &TypeInfo, node: NodeRef) -> Vec<Mutation> {
    shift(tree, node, -1)
}
