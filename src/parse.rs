//! Go front-end: parses a file with tree-sitter-go and lowers the CST into
//! the owned [`Tree`](crate::ast::Tree).
//!
//! Only constructs with a mutation surface are lowered structurally;
//! everything else (imports, type declarations, composite literals, selects,
//! …) is captured as a verbatim `Raw` span and printed back unchanged.

use std::path::Path;

use thiserror::Error;
use tree_sitter::{Node, Parser};

use crate::ast::{AssignOp, BinOp, Comment, Expr, ExprId, FuncDecl, Item, Param, Stmt, StmtId, Tree};

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

/// Statement-position node kinds that are plain expressions in the grammar.
const EXPR_STMT_KINDS: &[&str] = &[
    "call_expression",
    "unary_expression",
    "binary_expression",
    "selector_expression",
    "index_expression",
    "parenthesized_expression",
    "identifier",
];

pub fn parse_file(path: &Path) -> Result<Tree, ParseError> {
    let source = std::fs::read_to_string(path).map_err(|e| ParseError {
        message: format!("read {}: {}", path.display(), e),
    })?;
    parse_source(&source)
}

pub fn parse_source(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    let language = tree_sitter_go::LANGUAGE;
    parser
        .set_language(&language.into())
        .expect("Failed to set Go grammar");

    let cst = parser.parse(source, None).ok_or_else(|| ParseError {
        message: "parser returned no tree".to_string(),
    })?;
    let root = cst.root_node();
    if root.has_error() {
        return Err(ParseError {
            message: format!("syntax error near line {}", first_error_line(root)),
        });
    }

    let mut lower = Lower {
        src: source,
        tree: Tree::new(String::new()),
    };
    lower.lower_file(root);
    lower.collect_comments(root);
    Ok(lower.tree)
}

fn first_error_line(node: Node) -> u32 {
    if node.is_error() || node.is_missing() {
        return node.start_position().row as u32 + 1;
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.has_error() {
                return first_error_line(child);
            }
        }
    }
    node.start_position().row as u32 + 1
}

struct Lower<'a> {
    src: &'a str,
    tree: Tree,
}

impl<'a> Lower<'a> {
    fn text(&self, node: Node) -> &'a str {
        &self.src[node.start_byte()..node.end_byte()]
    }

    fn line(&self, node: Node) -> u32 {
        node.start_position().row as u32 + 1
    }

    fn lower_file(&mut self, root: Node) {
        for i in 0..root.named_child_count() {
            let Some(child) = root.named_child(i) else { continue };
            match child.kind() {
                "package_clause" => {
                    if let Some(name) = child.named_child(0) {
                        self.tree.package_name = self.text(name).to_string();
                    }
                    let raw = Item::Raw(self.text(child).to_string());
                    let line = self.line(child);
                    let id = self.tree.add_item(raw, line);
                    self.tree.root_items.push(id);
                }
                "function_declaration" | "method_declaration" => {
                    let item = self.lower_func(child);
                    let line = self.line(child);
                    let id = self.tree.add_item(item, line);
                    self.tree.root_items.push(id);
                }
                _ => {
                    let raw = Item::Raw(self.text(child).to_string());
                    let line = self.line(child);
                    let id = self.tree.add_item(raw, line);
                    self.tree.root_items.push(id);
                }
            }
        }
    }

    fn lower_func(&mut self, node: Node) -> Item {
        let Some(body) = node.child_by_field_name("body") else {
            // Declaration without a body (assembly stub); nothing to mutate.
            return Item::Raw(self.text(node).to_string());
        };
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let signature = self.src[node.start_byte()..body.start_byte()]
            .trim_end()
            .to_string();

        let mut params = Vec::new();
        if let Some(recv) = node.child_by_field_name("receiver") {
            self.lower_params(recv, &mut params);
        }
        if let Some(list) = node.child_by_field_name("parameters") {
            self.lower_params(list, &mut params);
        }

        let body = self.lower_block(body);
        Item::Func(FuncDecl { name, signature, params, body })
    }

    fn lower_params(&mut self, list: Node, out: &mut Vec<Param>) {
        for i in 0..list.named_child_count() {
            let Some(decl) = list.named_child(i) else { continue };
            match decl.kind() {
                "parameter_declaration" => {
                    let mut names = Vec::new();
                    let mut cursor = decl.walk();
                    for name in decl.children_by_field_name("name", &mut cursor) {
                        names.push(self.text(name).to_string());
                    }
                    let type_text = decl
                        .child_by_field_name("type")
                        .map(|t| self.text(t).to_string())
                        .unwrap_or_default();
                    if !names.is_empty() {
                        out.push(Param { names, type_text });
                    }
                }
                "variadic_parameter_declaration" => {
                    let names: Vec<String> = decl
                        .child_by_field_name("name")
                        .map(|n| vec![self.text(n).to_string()])
                        .unwrap_or_default();
                    let type_text = decl
                        .child_by_field_name("type")
                        .map(|t| format!("...{}", self.text(t)))
                        .unwrap_or_default();
                    if !names.is_empty() {
                        out.push(Param { names, type_text });
                    }
                }
                _ => {}
            }
        }
    }

    fn lower_block(&mut self, node: Node) -> StmtId {
        let line = self.line(node);
        let mut stmts = Vec::new();
        for i in 0..node.named_child_count() {
            if let Some(child) = node.named_child(i) {
                stmts.push(self.lower_stmt(child));
            }
        }
        self.tree.add_stmt(Stmt::Block(stmts), line)
    }

    fn lower_stmt(&mut self, node: Node) -> StmtId {
        let line = self.line(node);
        let kind = match node.kind() {
            "block" => return self.lower_block(node),
            "expression_statement" => match self.first_named(node) {
                Some(expr) => Stmt::Expr(self.lower_expr(expr)),
                None => Stmt::Raw(self.text(node).to_string()),
            },
            k if EXPR_STMT_KINDS.contains(&k) => Stmt::Expr(self.lower_expr(node)),
            "inc_statement" | "dec_statement" => match self.first_named(node) {
                Some(expr) => Stmt::IncDec {
                    expr: self.lower_expr(expr),
                    dec: node.kind() == "dec_statement",
                },
                None => Stmt::Raw(self.text(node).to_string()),
            },
            "assignment_statement" => {
                let op = node
                    .child_by_field_name("operator")
                    .and_then(|o| AssignOp::parse(self.text(o)));
                match op {
                    Some(op) => Stmt::Assign {
                        lhs: self.lower_expr_list(node.child_by_field_name("left")),
                        op,
                        rhs: self.lower_expr_list(node.child_by_field_name("right")),
                    },
                    None => Stmt::Raw(self.text(node).to_string()),
                }
            }
            "short_var_declaration" => Stmt::Assign {
                lhs: self.lower_expr_list(node.child_by_field_name("left")),
                op: AssignOp::Define,
                rhs: self.lower_expr_list(node.child_by_field_name("right")),
            },
            "return_statement" => Stmt::Return(self.lower_expr_list(node.named_child(0))),
            "if_statement" => {
                let init = node
                    .child_by_field_name("initializer")
                    .map(|n| self.lower_stmt(n));
                let cond = match node.child_by_field_name("condition") {
                    Some(c) => self.lower_expr(c),
                    None => {
                        let raw = Stmt::Raw(self.text(node).to_string());
                        return self.tree.add_stmt(raw, line);
                    }
                };
                let then = match node.child_by_field_name("consequence") {
                    Some(b) => self.lower_block(b),
                    None => {
                        let raw = Stmt::Raw(self.text(node).to_string());
                        return self.tree.add_stmt(raw, line);
                    }
                };
                let els = node
                    .child_by_field_name("alternative")
                    .map(|n| self.lower_stmt(n));
                Stmt::If { init, cond, then, els }
            }
            "for_statement" => return self.lower_for(node),
            "expression_switch_statement" | "type_switch_statement" => {
                return self.lower_switch(node)
            }
            "expression_case" | "type_case" | "default_case" => return self.lower_case(node),
            "go_statement" | "defer_statement" => match self.first_named(node) {
                Some(call) => Stmt::GoDefer {
                    go: node.kind() == "go_statement",
                    call: self.lower_expr(call),
                },
                None => Stmt::Raw(self.text(node).to_string()),
            },
            "send_statement" => {
                match (
                    node.child_by_field_name("channel"),
                    node.child_by_field_name("value"),
                ) {
                    (Some(ch), Some(value)) => Stmt::Send {
                        chan: self.lower_expr(ch),
                        value: self.lower_expr(value),
                    },
                    _ => Stmt::Raw(self.text(node).to_string()),
                }
            }
            "var_declaration" | "const_declaration" => Stmt::VarDecl {
                text: self.text(node).to_string(),
                specs: self.lower_decl_specs(node),
            },
            _ => Stmt::Raw(self.text(node).to_string()),
        };
        self.tree.add_stmt(kind, line)
    }

    fn lower_for(&mut self, node: Node) -> StmtId {
        let line = self.line(node);
        let body = match node.child_by_field_name("body") {
            Some(b) => self.lower_block(b),
            None => {
                let raw = Stmt::Raw(self.text(node).to_string());
                return self.tree.add_stmt(raw, line);
            }
        };

        let mut header = None;
        for i in 0..node.named_child_count() {
            let Some(child) = node.named_child(i) else { continue };
            if child.kind() == "block" || child.kind() == "comment" {
                continue;
            }
            header = Some(child);
            break;
        }

        let kind = match header {
            None => Stmt::For { init: None, cond: None, post: None, body },
            Some(h) if h.kind() == "for_clause" => Stmt::For {
                init: h
                    .child_by_field_name("initializer")
                    .map(|n| self.lower_stmt(n)),
                cond: h.child_by_field_name("condition").map(|n| self.lower_expr(n)),
                post: h.child_by_field_name("update").map(|n| self.lower_stmt(n)),
                body,
            },
            Some(h) if h.kind() == "range_clause" => {
                let lhs = self.lower_expr_list(h.child_by_field_name("left"));
                let mut define = false;
                let mut cursor = h.walk();
                for child in h.children(&mut cursor) {
                    if child.kind() == ":=" {
                        define = true;
                    }
                }
                let expr = match h.child_by_field_name("right") {
                    Some(r) => self.lower_expr(r),
                    None => self.tree.add_expr(Expr::Raw(String::new()), line),
                };
                Stmt::Range { lhs, define, expr, body }
            }
            Some(h) => Stmt::For {
                init: None,
                cond: Some(self.lower_expr(h)),
                post: None,
                body,
            },
        };
        self.tree.add_stmt(kind, line)
    }

    fn lower_switch(&mut self, node: Node) -> StmtId {
        let line = self.line(node);
        let mut brace_end = None;
        {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "{" {
                    brace_end = Some(child.end_byte());
                    break;
                }
            }
        }
        let Some(brace_end) = brace_end else {
            let raw = Stmt::Raw(self.text(node).to_string());
            return self.tree.add_stmt(raw, line);
        };
        let header = self.src[node.start_byte()..brace_end].to_string();

        let mut cases = Vec::new();
        for i in 0..node.named_child_count() {
            let Some(child) = node.named_child(i) else { continue };
            if child.start_byte() < brace_end {
                continue;
            }
            cases.push(self.lower_stmt(child));
        }
        self.tree.add_stmt(Stmt::Switch { header, cases }, line)
    }

    fn lower_case(&mut self, node: Node) -> StmtId {
        let line = self.line(node);
        let mut colon_end = None;
        {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == ":" {
                    colon_end = Some(child.end_byte());
                    break;
                }
            }
        }
        let Some(colon_end) = colon_end else {
            let raw = Stmt::Raw(self.text(node).to_string());
            return self.tree.add_stmt(raw, line);
        };
        let header = self.src[node.start_byte()..colon_end].to_string();

        let mut body = Vec::new();
        for i in 0..node.named_child_count() {
            let Some(child) = node.named_child(i) else { continue };
            if child.start_byte() < colon_end {
                continue;
            }
            body.push(self.lower_stmt(child));
        }
        self.tree.add_stmt(Stmt::Case { header, body }, line)
    }

    fn lower_decl_specs(&mut self, node: Node) -> Vec<(Vec<String>, Option<String>)> {
        let mut specs = Vec::new();
        for i in 0..node.named_child_count() {
            let Some(spec) = node.named_child(i) else { continue };
            if spec.kind() != "var_spec" && spec.kind() != "const_spec" {
                continue;
            }
            let mut names = Vec::new();
            let mut cursor = spec.walk();
            for name in spec.children_by_field_name("name", &mut cursor) {
                names.push(self.text(name).to_string());
            }
            let mut type_text = spec
                .child_by_field_name("type")
                .map(|t| self.text(t).to_string());
            if type_text.is_none() {
                // Untyped spec: a quoted initializer pins the string kind.
                if let Some(value) = spec.child_by_field_name("value") {
                    let text = self.text(value).trim_start();
                    if text.starts_with('"') || text.starts_with('`') {
                        type_text = Some("string".to_string());
                    }
                }
            }
            if !names.is_empty() {
                specs.push((names, type_text));
            }
        }
        specs
    }

    fn lower_expr_list(&mut self, node: Option<Node>) -> Vec<ExprId> {
        let Some(node) = node else { return Vec::new() };
        if node.kind() != "expression_list" {
            return vec![self.lower_expr(node)];
        }
        let mut out = Vec::new();
        for i in 0..node.named_child_count() {
            let Some(child) = node.named_child(i) else { continue };
            if child.kind() == "comment" {
                continue;
            }
            out.push(self.lower_expr(child));
        }
        out
    }

    fn lower_expr(&mut self, node: Node) -> ExprId {
        let line = self.line(node);
        let kind = match node.kind() {
            "binary_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .and_then(|o| BinOp::parse(self.text(o)));
                match (op, node.child_by_field_name("left"), node.child_by_field_name("right")) {
                    (Some(op), Some(l), Some(r)) => {
                        let left = self.lower_expr(l);
                        let right = self.lower_expr(r);
                        Expr::Binary { left, op, right }
                    }
                    _ => Expr::Raw(self.text(node).to_string()),
                }
            }
            "unary_expression" => {
                match (node.child_by_field_name("operator"), node.child_by_field_name("operand")) {
                    (Some(op), Some(operand)) => {
                        let op = self.text(op).to_string();
                        let expr = self.lower_expr(operand);
                        Expr::Unary { op, expr }
                    }
                    _ => Expr::Raw(self.text(node).to_string()),
                }
            }
            "parenthesized_expression" => match self.first_named(node) {
                Some(inner) => {
                    let inner = self.lower_expr(inner);
                    Expr::Paren(inner)
                }
                None => Expr::Raw(self.text(node).to_string()),
            },
            "identifier" | "blank_identifier" => Expr::Ident(self.text(node).to_string()),
            "selector_expression" => {
                match (node.child_by_field_name("operand"), node.child_by_field_name("field")) {
                    (Some(base), Some(field)) => {
                        let field = self.text(field).to_string();
                        let base = self.lower_expr(base);
                        Expr::Selector { base, field }
                    }
                    _ => Expr::Raw(self.text(node).to_string()),
                }
            }
            "index_expression" => {
                match (node.child_by_field_name("operand"), node.child_by_field_name("index")) {
                    (Some(base), Some(index)) => {
                        let base = self.lower_expr(base);
                        let index = self.lower_expr(index);
                        Expr::Index { base, index }
                    }
                    _ => Expr::Raw(self.text(node).to_string()),
                }
            }
            "call_expression" => self.lower_call(node),
            "int_literal" => Expr::IntLit(self.text(node).to_string()),
            "interpreted_string_literal" | "raw_string_literal" => {
                Expr::StringLit(self.text(node).to_string())
            }
            _ => Expr::Raw(self.text(node).to_string()),
        };
        self.tree.add_expr(kind, line)
    }

    fn lower_call(&mut self, node: Node) -> Expr {
        let (Some(func), Some(arg_list)) = (
            node.child_by_field_name("function"),
            node.child_by_field_name("arguments"),
        ) else {
            return Expr::Raw(self.text(node).to_string());
        };
        // make/new take a type argument; `f(xs...)` spreads. Both stay raw.
        if arg_list.kind() != "argument_list" {
            return Expr::Raw(self.text(node).to_string());
        }
        let mut cursor = arg_list.walk();
        for child in arg_list.children(&mut cursor) {
            if child.kind() == "..." {
                return Expr::Raw(self.text(node).to_string());
            }
        }

        let func = self.lower_expr(func);
        let mut args = Vec::new();
        for i in 0..arg_list.named_child_count() {
            let Some(child) = arg_list.named_child(i) else { continue };
            if child.kind() == "comment" {
                continue;
            }
            args.push(self.lower_expr(child));
        }
        Expr::Call { func, args }
    }

    fn first_named<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        for i in 0..node.named_child_count() {
            if let Some(child) = node.named_child(i) {
                if child.kind() != "comment" {
                    return Some(child);
                }
            }
        }
        None
    }

    fn collect_comments(&mut self, node: Node) {
        if node.kind() == "comment" {
            self.tree.comments.push(Comment {
                line: self.line(node),
                text: self.text(node).to_string(),
            });
            return;
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                self.collect_comments(child);
            }
        }
    }
}
