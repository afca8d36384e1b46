//! Mutation walker.
//!
//! Traverses the tree in pre-order and, for every mutation a mutator yields,
//! applies it, hands control to the driver, reverts it, and hands control
//! back. Between any two `on_mutant` calls the tree is pristine, and the
//! traversal order is that of the original tree: mutators never see their
//! own edits.

use crate::ast::{NodeRef, Tree};
use crate::registry::MutatorFn;
use crate::skip::SkipMap;
use crate::types::TypeInfo;

/// Walks `root`, invoking `on_mutant` with the mutated tree and `on_reset`
/// with the restored tree for every mutation produced. Nodes starting on a
/// skipped line contribute no mutations; their subtrees are still visited.
pub fn mutate_walk(
    tree: &mut Tree,
    info: &TypeInfo,
    root: NodeRef,
    mutator: MutatorFn,
    skip: &SkipMap,
    on_mutant: &mut dyn FnMut(&Tree),
    on_reset: &mut dyn FnMut(&Tree),
) {
    let nodes = tree.preorder(root);
    for node in nodes {
        if skip.contains(tree.node_line(node)) {
            continue;
        }
        for mutation in mutator(tree, info, node) {
            mutation.apply(tree);
            on_mutant(tree);
            mutation.revert(tree);
            on_reset(tree);
        }
    }
}

/// Number of mutations the mutator would produce over `root`.
pub fn count_mutations(
    tree: &mut Tree,
    info: &TypeInfo,
    root: NodeRef,
    mutator: MutatorFn,
    skip: &SkipMap,
) -> usize {
    let mut count = 0;
    for node in tree.preorder(root) {
        if skip.contains(tree.node_line(node)) {
            continue;
        }
        count += mutator(tree, info, node).len();
    }
    count
}
