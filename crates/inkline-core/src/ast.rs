//! Syntax tree for the restricted JavaScript subset.
//!
//! The grammar covers function declarations, `let` declarations, assignments,
//! `if`/`else`, `while`, `return`, and binary/logical/member/array
//! expressions. Both engines dispatch on these enums with exhaustive
//! matches, so adding a statement kind is a compile-time-checked decision
//! rather than a runtime lookup miss. Constructs outside the grammar never
//! reach the engines — the parser rejects them up front.

use serde::Serialize;

/// A parsed source file: an ordered list of top-level statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// A statement together with the 1-based source line of its first token.
///
/// For an `else if`, the nested `If` statement carries the line of its own
/// `if` keyword — the line the branch classifier reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    /// `let a = init, b;`
    VarDecl { decls: Vec<Declarator> },
    /// `function name(params) { body }`
    FunctionDecl {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    /// `target = value;`
    Assign { target: AssignTarget, value: Expr },
    /// A plain expression statement.
    Expr(Expr),
    /// `if (test) { consequent } else { alternate }`. An `else if` chain is
    /// an alternate holding a single nested `If`.
    If {
        test: Expr,
        consequent: Vec<Stmt>,
        alternate: Option<Vec<Stmt>>,
    },
    /// `while (test) { body }`
    While { test: Expr, body: Vec<Stmt> },
    /// `return argument;`
    Return { argument: Option<Expr> },
}

/// One `name [= init]` declarator in a `let` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
}

/// The left-hand side of an assignment.
///
/// Element targets are restricted to a named array and a literal index — the
/// substitution engine keys its environment on exactly that pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AssignTarget {
    Name(String),
    Element { object: String, index: Lit },
}

impl AssignTarget {
    /// The identifier the preservation rule checks: the name itself, or the
    /// array's name for an element write.
    pub fn name(&self) -> &str {
        match self {
            AssignTarget::Name(name) => name,
            AssignTarget::Element { object, .. } => object,
        }
    }
}

/// An expression (no side effects — calls are outside the grammar).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(Lit),
    Ident(String),
    /// `left op right` for arithmetic and comparison operators.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `left && right` / `left || right`.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Array-index access: `object[index]`.
    Member { object: Box<Expr>, index: Box<Expr> },
    /// Array literal: `[elements]`.
    Array(Vec<Expr>),
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Lit {
    Num(f64),
    Str(String),
    Bool(bool),
}

impl Lit {
    /// Source form of the literal, as the printer emits it. Also the index
    /// part of composite element keys, so `a[0]` re-parses to the same key.
    pub fn raw(&self) -> String {
        match self {
            Lit::Num(n) => format!("{n}"),
            Lit::Str(s) => format!("'{s}'"),
            Lit::Bool(b) => format!("{b}"),
        }
    }
}

/// Binary arithmetic and comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNe => "!==",
        }
    }
}

/// Short-circuit logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The tree serializes to JSON for the dump-ast surface.
    #[test]
    fn serializes_to_json() {
        let program = Program {
            body: vec![Stmt {
                kind: StmtKind::Return {
                    argument: Some(Expr::Literal(Lit::Num(1.0))),
                },
                line: 1,
            }],
        };
        let json = serde_json::to_value(&program).unwrap();
        assert_eq!(json["body"][0]["line"], 1);
    }

    /// Literal raw forms match their printed source text.
    #[test]
    fn literal_raw_forms() {
        assert_eq!(Lit::Num(5.0).raw(), "5");
        assert_eq!(Lit::Num(2.5).raw(), "2.5");
        assert_eq!(Lit::Str("hi".into()).raw(), "'hi'");
        assert_eq!(Lit::Bool(true).raw(), "true");
    }
}
