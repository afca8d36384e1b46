//! `nomutesting` skip directives.

use std::collections::HashSet;

use crate::ast::Tree;

/// Lines on which no mutation may be produced.
#[derive(Debug, Default)]
pub struct SkipMap {
    lines: HashSet<u32>,
}

impl SkipMap {
    pub fn contains(&self, line: u32) -> bool {
        self.lines.contains(&line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Scans the file's comments for `nomutesting` directives. The directive
/// applies to the line the comment starts on.
pub fn skips(tree: &Tree) -> SkipMap {
    let mut map = SkipMap::default();
    for comment in &tree.comments {
        let text = comment.text.trim_start_matches(['/', ' ']);
        if text.starts_with("nomutesting") {
            map.lines.insert(comment.line);
        }
    }
    map
}
