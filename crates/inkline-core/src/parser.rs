//! Recursive descent parser for the restricted JavaScript subset.
//!
//! Statements: `function`, `let`, assignment/expression statements,
//! `if`/`else`, `while`, `return`. Expressions use precedence climbing
//! (low to high): `||`, `&&`, equality, comparison, `+`/`-`, `*`/`/`/`%`,
//! then index access and atoms.
//!
//! Fail-fast: the first error aborts the parse. Statements and expressions
//! the subset does not model (`for`, calls, unary operators, computed-index
//! assignment targets) surface as unsupported-construct errors here, which
//! keeps the downstream engines total over the AST.

use crate::ast::{AssignTarget, BinOp, Declarator, Expr, Lit, LogicalOp, Program, Stmt, StmtKind};
use crate::error::CoreError;
use crate::lexer::{tokenize, Token, TokenKind};

/// Parse a source file into a [`Program`].
pub fn parse(source: &str) -> Result<Program, CoreError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut body = Vec::new();
    while parser.peek().kind != TokenKind::Eof {
        body.push(parser.parse_stmt()?);
    }
    Ok(Program { body })
}

/// Precedence levels for binary operators, low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    None,
    Or,
    And,
    Equality,
    Compare,
    Add,
    Mul,
    /// Above every binary operator; forces the right operand of a
    /// same-level operator to stop, giving left-associativity.
    Postfix,
}

impl Prec {
    /// Next-higher level, used for left-associativity.
    fn next(self) -> Prec {
        match self {
            Prec::None => Prec::Or,
            Prec::Or => Prec::And,
            Prec::And => Prec::Equality,
            Prec::Equality => Prec::Compare,
            Prec::Compare => Prec::Add,
            Prec::Add => Prec::Mul,
            Prec::Mul | Prec::Postfix => Prec::Postfix,
        }
    }
}

/// Operator kind at one precedence level.
enum OpKind {
    Binary(BinOp),
    Logical(LogicalOp),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn line(&self) -> usize {
        self.peek().line
    }

    fn error(&self, message: impl Into<String>) -> CoreError {
        CoreError::Parse {
            line: self.line(),
            message: message.into(),
        }
    }

    fn unsupported(&self, construct: impl Into<String>) -> CoreError {
        CoreError::Unsupported {
            line: self.line(),
            construct: construct.into(),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, CoreError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected {what}, found {:?}", self.peek().kind)))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, CoreError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!("expected {what}, found {other:?}"))),
        }
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn parse_stmt(&mut self) -> Result<Stmt, CoreError> {
        let line = self.line();
        match &self.peek().kind {
            TokenKind::Function => self.parse_function(line),
            TokenKind::Let => self.parse_var_decl(line),
            TokenKind::If => self.parse_if(line),
            TokenKind::While => self.parse_while(line),
            TokenKind::Return => self.parse_return(line),
            TokenKind::Ident(name) if is_foreign_keyword(name) => {
                Err(self.unsupported(format!("`{name}` statement")))
            }
            _ => self.parse_expr_stmt(line),
        }
    }

    fn parse_function(&mut self, line: usize) -> Result<Stmt, CoreError> {
        self.advance(); // `function`
        let name = self.expect_ident("function name")?;
        self.expect(TokenKind::LParen, "`(`")?;
        let mut params = Vec::new();
        if self.peek().kind != TokenKind::RParen {
            loop {
                params.push(self.expect_ident("parameter name")?);
                if self.peek().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        self.expect(TokenKind::LBrace, "`{`")?;
        let body = self.parse_block_body()?;
        Ok(Stmt {
            kind: StmtKind::FunctionDecl { name, params, body },
            line,
        })
    }

    fn parse_var_decl(&mut self, line: usize) -> Result<Stmt, CoreError> {
        self.advance(); // `let`
        let mut decls = Vec::new();
        loop {
            let name = self.expect_ident("variable name")?;
            let init = if self.peek().kind == TokenKind::Assign {
                self.advance();
                Some(self.parse_expr()?)
            } else {
                None
            };
            decls.push(Declarator { name, init });
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::Semi, "`;`")?;
        Ok(Stmt {
            kind: StmtKind::VarDecl { decls },
            line,
        })
    }

    fn parse_if(&mut self, line: usize) -> Result<Stmt, CoreError> {
        self.advance(); // `if`
        self.expect(TokenKind::LParen, "`(`")?;
        let test = self.parse_expr()?;
        self.expect(TokenKind::RParen, "`)`")?;
        let consequent = self.parse_branch()?;
        let alternate = if self.peek().kind == TokenKind::Else {
            self.advance();
            if self.peek().kind == TokenKind::If {
                // `else if` — the nested statement carries its own line.
                let nested_line = self.line();
                Some(vec![self.parse_if(nested_line)?])
            } else {
                Some(self.parse_branch()?)
            }
        } else {
            None
        };
        Ok(Stmt {
            kind: StmtKind::If {
                test,
                consequent,
                alternate,
            },
            line,
        })
    }

    fn parse_while(&mut self, line: usize) -> Result<Stmt, CoreError> {
        self.advance(); // `while`
        self.expect(TokenKind::LParen, "`(`")?;
        let test = self.parse_expr()?;
        self.expect(TokenKind::RParen, "`)`")?;
        let body = self.parse_branch()?;
        Ok(Stmt {
            kind: StmtKind::While { test, body },
            line,
        })
    }

    fn parse_return(&mut self, line: usize) -> Result<Stmt, CoreError> {
        self.advance(); // `return`
        let argument = if self.peek().kind == TokenKind::Semi {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semi, "`;`")?;
        Ok(Stmt {
            kind: StmtKind::Return { argument },
            line,
        })
    }

    /// An assignment statement, or a plain expression statement.
    fn parse_expr_stmt(&mut self, line: usize) -> Result<Stmt, CoreError> {
        let expr = self.parse_expr()?;
        let kind = if self.peek().kind == TokenKind::Assign {
            self.advance();
            let target = self.as_assign_target(expr)?;
            let value = self.parse_expr()?;
            StmtKind::Assign { target, value }
        } else {
            StmtKind::Expr(expr)
        };
        self.expect(TokenKind::Semi, "`;`")?;
        Ok(Stmt { kind, line })
    }

    /// A braced block, or a single statement treated as a one-element block.
    fn parse_branch(&mut self) -> Result<Vec<Stmt>, CoreError> {
        if self.peek().kind == TokenKind::LBrace {
            self.advance();
            self.parse_block_body()
        } else {
            Ok(vec![self.parse_stmt()?])
        }
    }

    /// Statements up to (and consuming) the closing `}`.
    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, CoreError> {
        let mut body = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            if self.peek().kind == TokenKind::Eof {
                return Err(self.error("unexpected end of input, expected `}`"));
            }
            body.push(self.parse_stmt()?);
        }
        self.advance(); // `}`
        Ok(body)
    }

    /// Reinterpret a parsed expression as an assignment target.
    fn as_assign_target(&self, expr: Expr) -> Result<AssignTarget, CoreError> {
        match expr {
            Expr::Ident(name) => Ok(AssignTarget::Name(name)),
            Expr::Member { object, index } => {
                let Expr::Ident(object) = *object else {
                    return Err(self.unsupported("assignment to a nested member expression"));
                };
                let Expr::Literal(index) = *index else {
                    return Err(self.unsupported("assignment to a computed array index"));
                };
                Ok(AssignTarget::Element { object, index })
            }
            _ => Err(self.error("invalid assignment target")),
        }
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, CoreError> {
        self.parse_prec(Prec::None)
    }

    fn parse_prec(&mut self, min_prec: Prec) -> Result<Expr, CoreError> {
        let mut left = self.parse_postfix()?;

        loop {
            let (op, prec) = match &self.peek().kind {
                TokenKind::OrOr => (OpKind::Logical(LogicalOp::Or), Prec::Or),
                TokenKind::AndAnd => (OpKind::Logical(LogicalOp::And), Prec::And),
                TokenKind::EqEq => (OpKind::Binary(BinOp::Eq), Prec::Equality),
                TokenKind::NotEq => (OpKind::Binary(BinOp::Ne), Prec::Equality),
                TokenKind::EqEqEq => (OpKind::Binary(BinOp::StrictEq), Prec::Equality),
                TokenKind::NotEqEq => (OpKind::Binary(BinOp::StrictNe), Prec::Equality),
                TokenKind::Lt => (OpKind::Binary(BinOp::Lt), Prec::Compare),
                TokenKind::Le => (OpKind::Binary(BinOp::Le), Prec::Compare),
                TokenKind::Gt => (OpKind::Binary(BinOp::Gt), Prec::Compare),
                TokenKind::Ge => (OpKind::Binary(BinOp::Ge), Prec::Compare),
                TokenKind::Plus => (OpKind::Binary(BinOp::Add), Prec::Add),
                TokenKind::Minus => (OpKind::Binary(BinOp::Sub), Prec::Add),
                TokenKind::Star => (OpKind::Binary(BinOp::Mul), Prec::Mul),
                TokenKind::Slash => (OpKind::Binary(BinOp::Div), Prec::Mul),
                TokenKind::Percent => (OpKind::Binary(BinOp::Rem), Prec::Mul),
                _ => break,
            };
            if prec < min_prec {
                break;
            }

            self.advance(); // the operator
            let right = self.parse_prec(prec.next())?;
            left = match op {
                OpKind::Binary(op) => Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                OpKind::Logical(op) => Expr::Logical {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }

        Ok(left)
    }

    /// An atom followed by any number of `[index]` accesses.
    fn parse_postfix(&mut self) -> Result<Expr, CoreError> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.peek().kind {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket, "`]`")?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::LParen => return Err(self.unsupported("function call")),
                _ => return Ok(expr),
            }
        }
    }

    fn parse_atom(&mut self) -> Result<Expr, CoreError> {
        match self.peek().kind.clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Literal(Lit::Num(n)))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Literal(Lit::Str(s)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(Lit::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(Lit::Bool(false)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Ident(name))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                if self.peek().kind != TokenKind::RBracket {
                    loop {
                        elements.push(self.parse_expr()?);
                        if self.peek().kind == TokenKind::Comma {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket, "`]`")?;
                Ok(Expr::Array(elements))
            }
            TokenKind::Minus => Err(self.unsupported("unary minus")),
            other => Err(self.error(format!("expected an expression, found {other:?}"))),
        }
    }
}

/// Statement keywords the subset deliberately does not model.
fn is_foreign_keyword(name: &str) -> bool {
    matches!(
        name,
        "for" | "do" | "switch" | "const" | "var" | "break" | "continue" | "throw" | "try"
    )
}
