//! Owned syntax tree for Go source files.
//!
//! The tree is an arena: items, statements and expressions live in flat
//! vectors and reference each other by id. Go constructs outside the modeled
//! subset are kept as verbatim `Raw` spans, so a file always round-trips
//! through the printer and only the slots a mutator touches ever change.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub(crate) u32);

/// Reference to any node in the tree, as handed to mutators by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    File,
    Item(ItemId),
    Stmt(StmtId),
    Expr(ExprId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::AndNot => "&^",
            BinOp::LAnd => "&&",
            BinOp::LOr => "||",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Leq => "<=",
            BinOp::Gt => ">",
            BinOp::Geq => ">=",
        }
    }

    pub fn parse(s: &str) -> Option<BinOp> {
        Some(match s {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Rem,
            "&" => BinOp::And,
            "|" => BinOp::Or,
            "^" => BinOp::Xor,
            "<<" => BinOp::Shl,
            ">>" => BinOp::Shr,
            "&^" => BinOp::AndNot,
            "&&" => BinOp::LAnd,
            "||" => BinOp::LOr,
            "==" => BinOp::Eq,
            "!=" => BinOp::Neq,
            "<" => BinOp::Lt,
            "<=" => BinOp::Leq,
            ">" => BinOp::Gt,
            ">=" => BinOp::Geq,
            _ => return None,
        })
    }

    /// Go binding strength, 1 (weakest, `||`) to 5 (strongest, `*`-class).
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::LOr => 1,
            BinOp::LAnd => 2,
            BinOp::Eq | BinOp::Neq | BinOp::Lt | BinOp::Leq | BinOp::Gt | BinOp::Geq => 3,
            BinOp::Add | BinOp::Sub | BinOp::Or | BinOp::Xor => 4,
            BinOp::Mul
            | BinOp::Div
            | BinOp::Rem
            | BinOp::Shl
            | BinOp::Shr
            | BinOp::And
            | BinOp::AndNot => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Define,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::AndNot => "&^=",
        }
    }

    pub fn parse(s: &str) -> Option<AssignOp> {
        Some(match s {
            "=" => AssignOp::Assign,
            ":=" => AssignOp::Define,
            "+=" => AssignOp::Add,
            "-=" => AssignOp::Sub,
            "*=" => AssignOp::Mul,
            "/=" => AssignOp::Div,
            "%=" => AssignOp::Rem,
            "&=" => AssignOp::And,
            "|=" => AssignOp::Or,
            "^=" => AssignOp::Xor,
            "<<=" => AssignOp::Shl,
            ">>=" => AssignOp::Shr,
            "&^=" => AssignOp::AndNot,
            _ => return None,
        })
    }

    pub fn is_compound(self) -> bool {
        !matches!(self, AssignOp::Assign | AssignOp::Define)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary { left: ExprId, op: BinOp, right: ExprId },
    Unary { op: String, expr: ExprId },
    Paren(ExprId),
    Ident(String),
    Selector { base: ExprId, field: String },
    Index { base: ExprId, index: ExprId },
    Call { func: ExprId, args: Vec<ExprId> },
    IntLit(String),
    StringLit(String),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Vec<StmtId>),
    Expr(ExprId),
    IncDec { expr: ExprId, dec: bool },
    Assign { lhs: Vec<ExprId>, op: AssignOp, rhs: Vec<ExprId> },
    Return(Vec<ExprId>),
    If { init: Option<StmtId>, cond: ExprId, then: StmtId, els: Option<StmtId> },
    For { init: Option<StmtId>, cond: Option<ExprId>, post: Option<StmtId>, body: StmtId },
    Range { lhs: Vec<ExprId>, define: bool, expr: ExprId, body: StmtId },
    Switch { header: String, cases: Vec<StmtId> },
    Case { header: String, body: Vec<StmtId> },
    GoDefer { go: bool, call: ExprId },
    Send { chan: ExprId, value: ExprId },
    Break,
    /// `var`/`const` declaration kept verbatim; specs feed the type table.
    VarDecl { text: String, specs: Vec<(Vec<String>, Option<String>)> },
    Raw(String),
    /// Placeholder for a removed statement with no reads; prints nothing.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Func(FuncDecl),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    /// Verbatim source from `func` up to the body's opening brace.
    pub signature: String,
    pub params: Vec<Param>,
    pub body: StmtId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub names: Vec<String>,
    pub type_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub line: u32,
    pub text: String,
}

#[derive(Debug)]
struct ItemNode {
    kind: Item,
    line: u32,
}

#[derive(Debug)]
struct StmtNode {
    kind: Stmt,
    line: u32,
}

#[derive(Debug)]
struct ExprNode {
    kind: Expr,
    line: u32,
}

/// A parsed Go file, mutable in place.
#[derive(Debug)]
pub struct Tree {
    pub package_name: String,
    items: Vec<ItemNode>,
    stmts: Vec<StmtNode>,
    exprs: Vec<ExprNode>,
    pub root_items: Vec<ItemId>,
    pub comments: Vec<Comment>,
}

impl Tree {
    pub fn new(package_name: String) -> Tree {
        Tree {
            package_name,
            items: Vec::new(),
            stmts: Vec::new(),
            exprs: Vec::new(),
            root_items: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn add_item(&mut self, kind: Item, line: u32) -> ItemId {
        self.items.push(ItemNode { kind, line });
        ItemId(self.items.len() as u32 - 1)
    }

    pub fn add_stmt(&mut self, kind: Stmt, line: u32) -> StmtId {
        self.stmts.push(StmtNode { kind, line });
        StmtId(self.stmts.len() as u32 - 1)
    }

    pub fn add_expr(&mut self, kind: Expr, line: u32) -> ExprId {
        self.exprs.push(ExprNode { kind, line });
        ExprId(self.exprs.len() as u32 - 1)
    }

    pub fn item(&self, id: ItemId) -> &Item {
        &self.items[id.0 as usize].kind
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0 as usize].kind
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0 as usize].kind
    }

    pub(crate) fn set_stmt(&mut self, id: StmtId, kind: Stmt) {
        self.stmts[id.0 as usize].kind = kind;
    }

    pub(crate) fn set_expr(&mut self, id: ExprId, kind: Expr) {
        self.exprs[id.0 as usize].kind = kind;
    }

    pub fn item_line(&self, id: ItemId) -> u32 {
        self.items[id.0 as usize].line
    }

    pub fn stmt_line(&self, id: StmtId) -> u32 {
        self.stmts[id.0 as usize].line
    }

    pub fn expr_line(&self, id: ExprId) -> u32 {
        self.exprs[id.0 as usize].line
    }

    pub fn node_line(&self, node: NodeRef) -> u32 {
        match node {
            NodeRef::File => 1,
            NodeRef::Item(id) => self.item_line(id),
            NodeRef::Stmt(id) => self.stmt_line(id),
            NodeRef::Expr(id) => self.expr_line(id),
        }
    }

    /// All top-level function declarations, in source order.
    pub fn functions(&self) -> Vec<(ItemId, &FuncDecl)> {
        self.root_items
            .iter()
            .filter_map(|id| match self.item(*id) {
                Item::Func(f) => Some((*id, f)),
                Item::Raw(_) => None,
            })
            .collect()
    }

    /// Pre-order traversal from `root`, in source order.
    pub fn preorder(&self, root: NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        self.visit(root, &mut out);
        out
    }

    fn visit(&self, node: NodeRef, out: &mut Vec<NodeRef>) {
        out.push(node);
        for child in direct_children(self, node) {
            self.visit(child, out);
        }
    }

    /// Indented node listing, used by the `print-ast` subcommand.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(NodeRef::File, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let label = match node {
                NodeRef::File => format!("File package={}", self.package_name),
                NodeRef::Item(id) => match self.item(id) {
                    Item::Func(f) => format!("Func {}", f.name),
                    Item::Raw(text) => format!("RawItem {:?}", first_line(text)),
                },
                NodeRef::Stmt(id) => match self.stmt(id) {
                    Stmt::Raw(text) => format!("RawStmt {:?}", first_line(text)),
                    Stmt::VarDecl { text, .. } => format!("VarDecl {:?}", first_line(text)),
                    other => format!("{}", StmtLabel(other)),
                },
                NodeRef::Expr(id) => match self.expr(id) {
                    Expr::Raw(text) => format!("RawExpr {:?}", first_line(text)),
                    other => format!("{}", ExprLabel(other)),
                },
            };
            let _ = writeln!(out, "{}{}", "\t".repeat(depth), label);
            for child in direct_children(self, node).into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

fn direct_children(tree: &Tree, node: NodeRef) -> Vec<NodeRef> {
    match node {
        NodeRef::File => tree.root_items.iter().map(|i| NodeRef::Item(*i)).collect(),
        NodeRef::Item(id) => match tree.item(id) {
            Item::Func(f) => vec![NodeRef::Stmt(f.body)],
            Item::Raw(_) => Vec::new(),
        },
        NodeRef::Stmt(id) => match tree.stmt(id).clone() {
            Stmt::Block(list) => list.into_iter().map(NodeRef::Stmt).collect(),
            Stmt::Expr(e) => vec![NodeRef::Expr(e)],
            Stmt::IncDec { expr, .. } => vec![NodeRef::Expr(expr)],
            Stmt::Assign { lhs, rhs, .. } => lhs
                .into_iter()
                .chain(rhs)
                .map(NodeRef::Expr)
                .collect(),
            Stmt::Return(list) => list.into_iter().map(NodeRef::Expr).collect(),
            Stmt::If { init, cond, then, els } => {
                let mut v = Vec::new();
                v.extend(init.map(NodeRef::Stmt));
                v.push(NodeRef::Expr(cond));
                v.push(NodeRef::Stmt(then));
                v.extend(els.map(NodeRef::Stmt));
                v
            }
            Stmt::For { init, cond, post, body } => {
                let mut v = Vec::new();
                v.extend(init.map(NodeRef::Stmt));
                v.extend(cond.map(NodeRef::Expr));
                v.extend(post.map(NodeRef::Stmt));
                v.push(NodeRef::Stmt(body));
                v
            }
            Stmt::Range { lhs, expr, body, .. } => {
                let mut v: Vec<NodeRef> = lhs.into_iter().map(NodeRef::Expr).collect();
                v.push(NodeRef::Expr(expr));
                v.push(NodeRef::Stmt(body));
                v
            }
            Stmt::Switch { cases, .. } => cases.into_iter().map(NodeRef::Stmt).collect(),
            Stmt::Case { body, .. } => body.into_iter().map(NodeRef::Stmt).collect(),
            Stmt::GoDefer { call, .. } => vec![NodeRef::Expr(call)],
            Stmt::Send { chan, value } => vec![NodeRef::Expr(chan), NodeRef::Expr(value)],
            Stmt::Break | Stmt::VarDecl { .. } | Stmt::Raw(_) | Stmt::Empty => Vec::new(),
        },
        NodeRef::Expr(id) => match tree.expr(id).clone() {
            Expr::Binary { left, right, .. } => vec![NodeRef::Expr(left), NodeRef::Expr(right)],
            Expr::Unary { expr, .. } => vec![NodeRef::Expr(expr)],
            Expr::Paren(e) => vec![NodeRef::Expr(e)],
            Expr::Selector { base, .. } => vec![NodeRef::Expr(base)],
            Expr::Index { base, index } => vec![NodeRef::Expr(base), NodeRef::Expr(index)],
            Expr::Call { func, args } => {
                let mut v = vec![NodeRef::Expr(func)];
                v.extend(args.into_iter().map(NodeRef::Expr));
                v
            }
            Expr::Ident(_) | Expr::IntLit(_) | Expr::StringLit(_) | Expr::Raw(_) => Vec::new(),
        },
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

struct StmtLabel<'a>(&'a Stmt);

impl std::fmt::Display for StmtLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Stmt::Block(_) => write!(f, "Block"),
            Stmt::Expr(_) => write!(f, "ExprStmt"),
            Stmt::IncDec { dec, .. } => write!(f, "IncDec {}", if *dec { "--" } else { "++" }),
            Stmt::Assign { op, .. } => write!(f, "Assign {}", op.as_str()),
            Stmt::Return(_) => write!(f, "Return"),
            Stmt::If { .. } => write!(f, "If"),
            Stmt::For { .. } => write!(f, "For"),
            Stmt::Range { .. } => write!(f, "Range"),
            Stmt::Switch { .. } => write!(f, "Switch"),
            Stmt::Case { header, .. } => write!(f, "Case {:?}", header),
            Stmt::GoDefer { go, .. } => write!(f, "{}", if *go { "Go" } else { "Defer" }),
            Stmt::Send { .. } => write!(f, "Send"),
            Stmt::Break => write!(f, "Break"),
            Stmt::Empty => write!(f, "Empty"),
            Stmt::VarDecl { .. } | Stmt::Raw(_) => unreachable!(),
        }
    }
}

struct ExprLabel<'a>(&'a Expr);

impl std::fmt::Display for ExprLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Expr::Binary { op, .. } => write!(f, "Binary {}", op.as_str()),
            Expr::Unary { op, .. } => write!(f, "Unary {}", op),
            Expr::Paren(_) => write!(f, "Paren"),
            Expr::Ident(name) => write!(f, "Ident {}", name),
            Expr::Selector { field, .. } => write!(f, "Selector .{}", field),
            Expr::Index { .. } => write!(f, "Index"),
            Expr::Call { .. } => write!(f, "Call"),
            Expr::IntLit(text) => write!(f, "IntLit {}", text),
            Expr::StringLit(text) => write!(f, "StringLit {}", text),
            Expr::Raw(_) => unreachable!(),
        }
    }
}
