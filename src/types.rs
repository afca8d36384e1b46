//! Lightweight type information for mutation guards.
//!
//! Mutators consult types only to suppress rewrites that cannot compile
//! (string `+` is concatenation in Go). The pass tracks parameter, `var`,
//! `const` and `:=` bindings per function scope and propagates through the
//! expressions it recognizes; everything else is `Unknown`, which never
//! suppresses a mutation.

use std::collections::HashMap;

use crate::ast::{Expr, ExprId, Item, Stmt, StmtId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    String,
    Int,
    Float,
    Bool,
    Unknown,
}

pub fn ty_from_text(text: &str) -> Ty {
    match text {
        "string" => Ty::String,
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" | "uintptr" | "byte" | "rune" => Ty::Int,
        "float32" | "float64" => Ty::Float,
        "bool" => Ty::Bool,
        _ => Ty::Unknown,
    }
}

/// Expression type table for one tree.
#[derive(Debug, Default)]
pub struct TypeInfo {
    tys: HashMap<ExprId, Ty>,
}

impl TypeInfo {
    pub fn infer(tree: &Tree) -> TypeInfo {
        let mut info = TypeInfo::default();
        for id in &tree.root_items {
            if let Item::Func(f) = tree.item(*id) {
                let mut scopes: Vec<HashMap<String, Ty>> = vec![HashMap::new()];
                for param in &f.params {
                    let ty = ty_from_text(&param.type_text);
                    for name in &param.names {
                        scopes[0].insert(name.clone(), ty);
                    }
                }
                info.walk_stmt(tree, f.body, &mut scopes);
            }
        }
        info
    }

    pub fn type_of(&self, id: ExprId) -> Ty {
        self.tys.get(&id).copied().unwrap_or(Ty::Unknown)
    }

    pub fn is_string(&self, id: ExprId) -> bool {
        self.type_of(id) == Ty::String
    }

    fn walk_stmt(&mut self, tree: &Tree, id: StmtId, scopes: &mut Vec<HashMap<String, Ty>>) {
        match tree.stmt(id).clone() {
            Stmt::Block(list) => {
                scopes.push(HashMap::new());
                for s in list {
                    self.walk_stmt(tree, s, scopes);
                }
                scopes.pop();
            }
            Stmt::VarDecl { specs, .. } => {
                for (names, type_text) in specs {
                    let ty = type_text.as_deref().map(ty_from_text).unwrap_or(Ty::Unknown);
                    for name in names {
                        bind(scopes, name, ty);
                    }
                }
            }
            Stmt::Assign { lhs, op, rhs } => {
                for e in &rhs {
                    self.type_expr(tree, *e, scopes);
                }
                for e in &lhs {
                    self.type_expr(tree, *e, scopes);
                }
                if op == crate::ast::AssignOp::Define {
                    if lhs.len() == rhs.len() {
                        for (l, r) in lhs.iter().zip(rhs.iter()) {
                            if let Expr::Ident(name) = tree.expr(*l) {
                                let ty = self.type_of(*r);
                                bind(scopes, name.clone(), ty);
                            }
                        }
                    } else {
                        // Multi-value form; bind conservatively.
                        for l in &lhs {
                            if let Expr::Ident(name) = tree.expr(*l) {
                                bind(scopes, name.clone(), Ty::Unknown);
                            }
                        }
                    }
                }
            }
            Stmt::Expr(e) | Stmt::IncDec { expr: e, .. } | Stmt::GoDefer { call: e, .. } => {
                self.type_expr(tree, e, scopes);
            }
            Stmt::Return(list) => {
                for e in list {
                    self.type_expr(tree, e, scopes);
                }
            }
            Stmt::Send { chan, value } => {
                self.type_expr(tree, chan, scopes);
                self.type_expr(tree, value, scopes);
            }
            Stmt::If { init, cond, then, els } => {
                scopes.push(HashMap::new());
                if let Some(s) = init {
                    self.walk_stmt(tree, s, scopes);
                }
                self.type_expr(tree, cond, scopes);
                self.walk_stmt(tree, then, scopes);
                if let Some(s) = els {
                    self.walk_stmt(tree, s, scopes);
                }
                scopes.pop();
            }
            Stmt::For { init, cond, post, body } => {
                scopes.push(HashMap::new());
                if let Some(s) = init {
                    self.walk_stmt(tree, s, scopes);
                }
                if let Some(c) = cond {
                    self.type_expr(tree, c, scopes);
                }
                if let Some(s) = post {
                    self.walk_stmt(tree, s, scopes);
                }
                self.walk_stmt(tree, body, scopes);
                scopes.pop();
            }
            Stmt::Range { lhs, define, expr, body } => {
                scopes.push(HashMap::new());
                self.type_expr(tree, expr, scopes);
                if define {
                    for l in &lhs {
                        if let Expr::Ident(name) = tree.expr(*l) {
                            bind(scopes, name.clone(), Ty::Unknown);
                        }
                    }
                }
                self.walk_stmt(tree, body, scopes);
                scopes.pop();
            }
            Stmt::Switch { cases, .. } => {
                for c in cases {
                    self.walk_stmt(tree, c, scopes);
                }
            }
            Stmt::Case { body, .. } => {
                scopes.push(HashMap::new());
                for s in body {
                    self.walk_stmt(tree, s, scopes);
                }
                scopes.pop();
            }
            Stmt::Break | Stmt::Raw(_) | Stmt::Empty => {}
        }
    }

    fn type_expr(&mut self, tree: &Tree, id: ExprId, scopes: &[HashMap<String, Ty>]) -> Ty {
        let ty = match tree.expr(id).clone() {
            Expr::IntLit(_) => Ty::Int,
            Expr::StringLit(_) => Ty::String,
            Expr::Ident(name) => lookup(scopes, &name),
            Expr::Paren(e) => self.type_expr(tree, e, scopes),
            Expr::Unary { op, expr } => {
                let inner = self.type_expr(tree, expr, scopes);
                match op.as_str() {
                    "!" => Ty::Bool,
                    "-" | "+" | "^" => inner,
                    _ => Ty::Unknown,
                }
            }
            Expr::Binary { left, op, right } => {
                let l = self.type_expr(tree, left, scopes);
                let r = self.type_expr(tree, right, scopes);
                use crate::ast::BinOp::*;
                match op {
                    Eq | Neq | Lt | Leq | Gt | Geq | LAnd | LOr => Ty::Bool,
                    Add if l == Ty::String || r == Ty::String => Ty::String,
                    _ => {
                        if l != Ty::Unknown {
                            l
                        } else {
                            r
                        }
                    }
                }
            }
            Expr::Call { func, args } => {
                for a in args {
                    self.type_expr(tree, a, scopes);
                }
                match tree.expr(func) {
                    Expr::Ident(name) if name == "string" => Ty::String,
                    Expr::Ident(name) if name == "len" || name == "cap" => Ty::Int,
                    _ => Ty::Unknown,
                }
            }
            Expr::Selector { base, .. } => {
                self.type_expr(tree, base, scopes);
                Ty::Unknown
            }
            Expr::Index { base, index } => {
                self.type_expr(tree, base, scopes);
                self.type_expr(tree, index, scopes);
                Ty::Unknown
            }
            Expr::Raw(_) => Ty::Unknown,
        };
        self.tys.insert(id, ty);
        ty
    }
}

fn bind(scopes: &mut [HashMap<String, Ty>], name: String, ty: Ty) {
    if name == "_" {
        return;
    }
    if let Some(scope) = scopes.last_mut() {
        scope.insert(name, ty);
    }
}

fn lookup(scopes: &[HashMap<String, Ty>], name: &str) -> Ty {
    for scope in scopes.iter().rev() {
        if let Some(ty) = scope.get(name) {
            return *ty;
        }
    }
    Ty::Unknown
}

/// Go's predeclared functions; never usable as bare values in a no-op.
const BUILTINS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

/// Identifier reads of a statement, for the statement-removal no-op.
///
/// Mirrors the original query: the blank identifier is skipped, a bare
/// identifier in call-function position is skipped (functions and builtins
/// are not assignable reads), and selector chains rooted at identifiers are
/// yielded whole.
pub fn reads_of_stmt(tree: &Tree, id: StmtId) -> Vec<ExprId> {
    let mut out = Vec::new();
    match tree.stmt(id).clone() {
        Stmt::Expr(e) => reads_of_expr(tree, e, false, &mut out),
        Stmt::IncDec { expr, .. } => reads_of_expr(tree, expr, false, &mut out),
        Stmt::Assign { lhs, rhs, .. } => {
            for e in lhs.iter().chain(rhs.iter()) {
                reads_of_expr(tree, *e, false, &mut out);
            }
        }
        _ => {}
    }
    out
}

fn reads_of_expr(tree: &Tree, id: ExprId, in_call_func: bool, out: &mut Vec<ExprId>) {
    match tree.expr(id).clone() {
        Expr::Ident(name) => {
            if name != "_" && !in_call_func && !BUILTINS.contains(&name.as_str()) {
                out.push(id);
            }
        }
        Expr::Selector { base, .. } => {
            if selector_rooted_in_idents(tree, id) {
                out.push(id);
            } else {
                reads_of_expr(tree, base, false, out);
            }
        }
        Expr::Call { func, args } => {
            reads_of_expr(tree, func, true, out);
            for a in args {
                reads_of_expr(tree, a, false, out);
            }
        }
        Expr::Index { base, index } => {
            reads_of_expr(tree, base, false, out);
            reads_of_expr(tree, index, false, out);
        }
        Expr::Binary { left, right, .. } => {
            reads_of_expr(tree, left, false, out);
            reads_of_expr(tree, right, false, out);
        }
        Expr::Unary { expr, .. } | Expr::Paren(expr) => reads_of_expr(tree, expr, false, out),
        Expr::IntLit(_) | Expr::StringLit(_) | Expr::Raw(_) => {}
    }
}

fn selector_rooted_in_idents(tree: &Tree, id: ExprId) -> bool {
    match tree.expr(id) {
        Expr::Ident(_) => true,
        Expr::Selector { base, .. } => selector_rooted_in_idents(tree, *base),
        _ => false,
    }
}
