//! Lexer for the restricted JavaScript subset.
//!
//! Byte-level scanner with line tracking. Produces the full token stream up
//! front; the parser indexes into it. Characters and operator forms outside
//! the subset (`!` as unary, `&`/`|` alone, `.` property access, …) fail
//! fast here with an unsupported-construct error rather than leaking an
//! unknown token into the parser.

use crate::error::CoreError;

/// A single token with the 1-based line it starts on.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Str(String),
    Ident(String),

    // Keywords
    Function,
    Let,
    If,
    Else,
    While,
    Return,
    True,
    False,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Assign,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    AndAnd,
    OrOr,

    Eof,
}

/// Tokenize a whole source file.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CoreError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> u8 {
        let b = self.bytes[self.pos];
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        b
    }

    fn token(&self, kind: TokenKind, line: usize) -> Token {
        Token { kind, line }
    }

    fn error(&self, message: impl Into<String>) -> CoreError {
        CoreError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn unsupported(&self, construct: impl Into<String>) -> CoreError {
        CoreError::Unsupported {
            line: self.line,
            construct: construct.into(),
        }
    }

    /// Skip whitespace, `//` line comments, and `/* */` block comments.
    fn skip_trivia(&mut self) -> Result<(), CoreError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !self.at_end() && self.peek() != Some(b'\n') {
                        self.advance();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start_line = self.line;
                    self.advance();
                    self.advance();
                    loop {
                        if self.at_end() {
                            return Err(CoreError::Parse {
                                line: start_line,
                                message: "unterminated block comment".into(),
                            });
                        }
                        if self.peek() == Some(b'*') && self.peek_at(1) == Some(b'/') {
                            self.advance();
                            self.advance();
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, CoreError> {
        self.skip_trivia()?;

        let line = self.line;
        let Some(b) = self.peek() else {
            return Ok(self.token(TokenKind::Eof, line));
        };

        match b {
            b'0'..=b'9' => self.lex_number(line),
            b'\'' | b'"' => self.lex_string(line),
            b if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => self.lex_ident(line),
            b'(' => self.punct(TokenKind::LParen, line),
            b')' => self.punct(TokenKind::RParen, line),
            b'{' => self.punct(TokenKind::LBrace, line),
            b'}' => self.punct(TokenKind::RBrace, line),
            b'[' => self.punct(TokenKind::LBracket, line),
            b']' => self.punct(TokenKind::RBracket, line),
            b',' => self.punct(TokenKind::Comma, line),
            b';' => self.punct(TokenKind::Semi, line),
            b'+' => self.punct(TokenKind::Plus, line),
            b'-' => self.punct(TokenKind::Minus, line),
            b'*' => self.punct(TokenKind::Star, line),
            b'/' => self.punct(TokenKind::Slash, line),
            b'%' => self.punct(TokenKind::Percent, line),
            b'<' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    Ok(self.token(TokenKind::Le, line))
                } else {
                    Ok(self.token(TokenKind::Lt, line))
                }
            }
            b'>' => {
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    Ok(self.token(TokenKind::Ge, line))
                } else {
                    Ok(self.token(TokenKind::Gt, line))
                }
            }
            b'=' => {
                self.advance();
                if self.peek() != Some(b'=') {
                    return Ok(self.token(TokenKind::Assign, line));
                }
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    Ok(self.token(TokenKind::EqEqEq, line))
                } else {
                    Ok(self.token(TokenKind::EqEq, line))
                }
            }
            b'!' => {
                if self.peek_at(1) != Some(b'=') {
                    return Err(self.unsupported("unary operator `!`"));
                }
                self.advance();
                self.advance();
                if self.peek() == Some(b'=') {
                    self.advance();
                    Ok(self.token(TokenKind::NotEqEq, line))
                } else {
                    Ok(self.token(TokenKind::NotEq, line))
                }
            }
            b'&' => {
                if self.peek_at(1) != Some(b'&') {
                    return Err(self.unsupported("bitwise operator `&`"));
                }
                self.advance();
                self.advance();
                Ok(self.token(TokenKind::AndAnd, line))
            }
            b'|' => {
                if self.peek_at(1) != Some(b'|') {
                    return Err(self.unsupported("bitwise operator `|`"));
                }
                self.advance();
                self.advance();
                Ok(self.token(TokenKind::OrOr, line))
            }
            b'.' => Err(self.unsupported("property access `.`")),
            other => Err(self.error(format!("unexpected character `{}`", other as char))),
        }
    }

    fn punct(&mut self, kind: TokenKind, line: usize) -> Result<Token, CoreError> {
        self.advance();
        Ok(self.token(kind, line))
    }

    fn lex_number(&mut self, line: usize) -> Result<Token, CoreError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).expect("ascii digits");
        let value: f64 = text
            .parse()
            .map_err(|_| self.error(format!("invalid number literal `{text}`")))?;
        Ok(self.token(TokenKind::Number(value), line))
    }

    fn lex_string(&mut self, line: usize) -> Result<Token, CoreError> {
        let quote = self.advance();
        let start = self.pos;
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Err(CoreError::Parse {
                        line,
                        message: "unterminated string literal".into(),
                    })
                }
                Some(b) if b == quote => break,
                _ => {
                    self.advance();
                }
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| self.error("invalid utf-8 in string literal"))?
            .to_string();
        self.advance(); // closing quote
        Ok(self.token(TokenKind::Str(text), line))
    }

    fn lex_ident(&mut self, line: usize) -> Result<Token, CoreError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
        {
            self.advance();
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| self.error("invalid utf-8 in identifier"))?;
        let kind = match text {
            "function" => TokenKind::Function,
            "let" => TokenKind::Let,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Ident(text.to_string()),
        };
        Ok(self.token(kind, line))
    }
}
