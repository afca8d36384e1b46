//! Deterministic pretty-printer for the syntax tree.
//!
//! Output follows gofmt conventions (tabs, one statement per line, `} else {`
//! cuddling) for structured nodes; `Raw` spans are spliced back verbatim.
//! Mutant fingerprints are computed over these bytes, so the only requirement
//! beyond valid Go is that equal trees print equal bytes.

use crate::ast::{Expr, ExprId, Item, ItemId, Stmt, StmtId, Tree};

pub fn print(tree: &Tree) -> String {
    let mut p = Printer { tree, out: String::new() };
    for (i, item) in tree.root_items.iter().enumerate() {
        if i > 0 {
            p.out.push('\n');
        }
        p.print_item(*item);
        p.out.push('\n');
    }
    p.out
}

struct Printer<'t> {
    tree: &'t Tree,
    out: String,
}

impl<'t> Printer<'t> {
    fn print_item(&mut self, id: ItemId) {
        match self.tree.item(id) {
            Item::Raw(text) => self.out.push_str(text),
            Item::Func(f) => {
                self.out.push_str(&f.signature);
                self.out.push(' ');
                self.print_block(f.body, 0);
            }
        }
    }

    fn print_block(&mut self, id: StmtId, indent: usize) {
        let Stmt::Block(stmts) = self.tree.stmt(id) else {
            // A non-block in block position can only come from a lowering gap.
            self.print_stmt(id, indent);
            return;
        };
        if stmts.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        for s in stmts.clone() {
            self.print_stmt(s, indent + 1);
        }
        self.out.push_str(&tabs(indent));
        self.out.push('}');
    }

    fn print_stmt(&mut self, id: StmtId, indent: usize) {
        match self.tree.stmt(id).clone() {
            Stmt::Empty => {}
            Stmt::Raw(text) | Stmt::VarDecl { text, .. } => {
                if !text.is_empty() {
                    self.out.push_str(&tabs(indent));
                    self.out.push_str(&text);
                    self.out.push('\n');
                }
            }
            Stmt::Block(_) => {
                self.out.push_str(&tabs(indent));
                self.print_block(id, indent);
                self.out.push('\n');
            }
            Stmt::If { .. } => {
                self.out.push_str(&tabs(indent));
                self.print_if(id, indent);
                self.out.push('\n');
            }
            Stmt::For { init, cond, post, body } => {
                self.out.push_str(&tabs(indent));
                self.out.push_str("for ");
                if init.is_none() && post.is_none() {
                    if let Some(c) = cond {
                        let text = self.expr_str(c);
                        self.out.push_str(&text);
                        self.out.push(' ');
                    }
                } else {
                    if let Some(s) = init {
                        let text = self.simple_stmt_str(s);
                        self.out.push_str(&text);
                    }
                    self.out.push_str("; ");
                    if let Some(c) = cond {
                        let text = self.expr_str(c);
                        self.out.push_str(&text);
                    }
                    self.out.push_str("; ");
                    if let Some(s) = post {
                        let text = self.simple_stmt_str(s);
                        self.out.push_str(&text);
                    }
                    self.out.push(' ');
                }
                self.print_block(body, indent);
                self.out.push('\n');
            }
            Stmt::Range { lhs, define, expr, body } => {
                self.out.push_str(&tabs(indent));
                self.out.push_str("for ");
                if !lhs.is_empty() {
                    let vars: Vec<String> = lhs.iter().map(|e| self.expr_str(*e)).collect();
                    self.out.push_str(&vars.join(", "));
                    self.out.push_str(if define { " := " } else { " = " });
                }
                self.out.push_str("range ");
                let text = self.expr_str(expr);
                self.out.push_str(&text);
                self.out.push(' ');
                self.print_block(body, indent);
                self.out.push('\n');
            }
            Stmt::Switch { header, cases } => {
                self.out.push_str(&tabs(indent));
                self.out.push_str(&header);
                self.out.push('\n');
                for c in cases {
                    self.print_stmt(c, indent);
                }
                self.out.push_str(&tabs(indent));
                self.out.push_str("}\n");
            }
            Stmt::Case { header, body } => {
                self.out.push_str(&tabs(indent));
                self.out.push_str(&header);
                self.out.push('\n');
                for s in body {
                    self.print_stmt(s, indent + 1);
                }
            }
            simple => {
                self.out.push_str(&tabs(indent));
                let text = self.simple_stmt_kind_str(&simple);
                self.out.push_str(&text);
                self.out.push('\n');
            }
        }
    }

    fn print_if(&mut self, id: StmtId, indent: usize) {
        let Stmt::If { init, cond, then, els } = self.tree.stmt(id).clone() else {
            return;
        };
        self.out.push_str("if ");
        if let Some(s) = init {
            let text = self.simple_stmt_str(s);
            self.out.push_str(&text);
            self.out.push_str("; ");
        }
        let cond_text = self.expr_str(cond);
        self.out.push_str(&cond_text);
        self.out.push(' ');
        self.print_block(then, indent);
        if let Some(e) = els {
            self.out.push_str(" else ");
            if matches!(self.tree.stmt(e), Stmt::If { .. }) {
                self.print_if(e, indent);
            } else {
                self.print_block(e, indent);
            }
        }
    }

    /// Single-line rendering for statements in header positions
    /// (`if init; …`, `for init; cond; post`).
    fn simple_stmt_str(&self, id: StmtId) -> String {
        self.simple_stmt_kind_str(&self.tree.stmt(id).clone())
    }

    fn simple_stmt_kind_str(&self, kind: &Stmt) -> String {
        match kind {
            Stmt::Expr(e) => self.expr_str(*e),
            Stmt::IncDec { expr, dec } => {
                format!("{}{}", self.expr_str(*expr), if *dec { "--" } else { "++" })
            }
            Stmt::Assign { lhs, op, rhs } => {
                let l: Vec<String> = lhs.iter().map(|e| self.expr_str(*e)).collect();
                let r: Vec<String> = rhs.iter().map(|e| self.expr_str(*e)).collect();
                format!("{} {} {}", l.join(", "), op.as_str(), r.join(", "))
            }
            Stmt::Return(list) => {
                if list.is_empty() {
                    "return".to_string()
                } else {
                    let vals: Vec<String> = list.iter().map(|e| self.expr_str(*e)).collect();
                    format!("return {}", vals.join(", "))
                }
            }
            Stmt::Send { chan, value } => {
                format!("{} <- {}", self.expr_str(*chan), self.expr_str(*value))
            }
            Stmt::GoDefer { go, call } => {
                format!("{} {}", if *go { "go" } else { "defer" }, self.expr_str(*call))
            }
            Stmt::Break => "break".to_string(),
            Stmt::Raw(text) | Stmt::VarDecl { text, .. } => text.clone(),
            _ => String::new(),
        }
    }

    fn expr_str(&self, id: ExprId) -> String {
        match self.tree.expr(id) {
            Expr::Binary { left, op, right } => {
                let prec = op.precedence();
                format!(
                    "{} {} {}",
                    self.operand_str(*left, prec, false),
                    op.as_str(),
                    self.operand_str(*right, prec, true)
                )
            }
            Expr::Unary { op, expr } => {
                let inner = self.expr_str(*expr);
                if matches!(self.tree.expr(*expr), Expr::Binary { .. }) {
                    format!("{}({})", op, inner)
                } else {
                    format!("{}{}", op, inner)
                }
            }
            Expr::Paren(e) => format!("({})", self.expr_str(*e)),
            Expr::Ident(name) => name.clone(),
            Expr::Selector { base, field } => format!("{}.{}", self.expr_str(*base), field),
            Expr::Index { base, index } => {
                format!("{}[{}]", self.expr_str(*base), self.expr_str(*index))
            }
            Expr::Call { func, args } => {
                let rendered: Vec<String> = args.iter().map(|a| self.expr_str(*a)).collect();
                format!("{}({})", self.expr_str(*func), rendered.join(", "))
            }
            Expr::IntLit(text) | Expr::StringLit(text) | Expr::Raw(text) => text.clone(),
        }
    }

    /// Parenthesize a binary operand when printing it bare would rebind it
    /// to a different grouping than the tree encodes.
    fn operand_str(&self, id: ExprId, parent_prec: u8, is_right: bool) -> String {
        let s = self.expr_str(id);
        if let Expr::Binary { op, .. } = self.tree.expr(id) {
            let prec = op.precedence();
            if prec < parent_prec || (prec == parent_prec && is_right) {
                return format!("({})", s);
            }
        }
        s
    }
}

fn tabs(indent: usize) -> String {
    "\t".repeat(indent)
}
