//! Reversible tree edits.
//!
//! A mutation captures the prior value of the single slot it overwrites and
//! writes it back on revert, so apply and revert are O(1) and the identity of
//! every surrounding node is preserved.

use crate::ast::{Expr, ExprId, Stmt, StmtId, Tree};

#[derive(Debug, Clone)]
pub struct Mutation {
    pub edit: Edit,
}

#[derive(Debug, Clone)]
pub enum Edit {
    /// Replace the kind stored at an expression slot.
    Expr { id: ExprId, from: Expr, to: Expr },
    /// Replace the kind stored at a statement slot.
    Stmt { id: StmtId, from: Stmt, to: Stmt },
    /// Insert a statement at the head of a block.
    InsertHead { block: StmtId, stmt: StmtId },
}

impl Mutation {
    pub fn expr(id: ExprId, from: Expr, to: Expr) -> Mutation {
        Mutation { edit: Edit::Expr { id, from, to } }
    }

    pub fn stmt(id: StmtId, from: Stmt, to: Stmt) -> Mutation {
        Mutation { edit: Edit::Stmt { id, from, to } }
    }

    pub fn insert_head(block: StmtId, stmt: StmtId) -> Mutation {
        Mutation { edit: Edit::InsertHead { block, stmt } }
    }

    pub fn apply(&self, tree: &mut Tree) {
        match &self.edit {
            Edit::Expr { id, to, .. } => tree.set_expr(*id, to.clone()),
            Edit::Stmt { id, to, .. } => tree.set_stmt(*id, to.clone()),
            Edit::InsertHead { block, stmt } => {
                let mut kind = tree.stmt(*block).clone();
                if let Stmt::Block(list) = &mut kind {
                    list.insert(0, *stmt);
                }
                tree.set_stmt(*block, kind);
            }
        }
    }

    pub fn revert(&self, tree: &mut Tree) {
        match &self.edit {
            Edit::Expr { id, from, .. } => tree.set_expr(*id, from.clone()),
            Edit::Stmt { id, from, .. } => tree.set_stmt(*id, from.clone()),
            Edit::InsertHead { block, .. } => {
                let mut kind = tree.stmt(*block).clone();
                if let Stmt::Block(list) = &mut kind {
                    list.remove(0);
                }
                tree.set_stmt(*block, kind);
            }
        }
    }
}
