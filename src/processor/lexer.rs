//! Hand-written scanner for the formula language.
//!
//! Tokens are produced one at a time on request; the parser asks for the
//! next token whenever it has consumed the current one.
//
//  Lexical items:
//
//      Ident    ::= [A-Za-z][A-Za-z0-9_]*
//      Integer  ::= [0-9]+
//      Float    ::= [0-9]+ '.' [0-9]* Exp?
//                 | '.' [0-9]+ Exp?
//                 | [0-9]+ Exp
//      Exp      ::= [eE] [+-]? [0-9]+
//      Symbols  ::= '(' | ')' | ',' | '-' | '+' | '*' | '/' | '^'
//      Whitespace (space, tab, newline) comes out as a single token.

use std::fmt;

use crate::error::LexError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Eof,
    Whitespace,
    LParen,
    RParen,
    Comma,
    Minus,
    Plus,
    Star,
    Slash,
    Caret,
    Float,
    Integer,
    Ident,
    Error(LexError),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "end of input"),
            Self::Whitespace => write!(f, "whitespace"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::Comma => write!(f, "','"),
            Self::Minus => write!(f, "'-'"),
            Self::Plus => write!(f, "'+'"),
            Self::Star => write!(f, "'*'"),
            Self::Slash => write!(f, "'/'"),
            Self::Caret => write!(f, "'^'"),
            Self::Float => write!(f, "floating-point number"),
            Self::Integer => write!(f, "integer"),
            Self::Ident => write!(f, "identifier"),
            Self::Error(e) => write!(f, "error ({e})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn symbol(kind: TokenKind, c: char) -> Self {
        Self::new(kind, c.to_string())
    }

    pub fn is(&self, kind: &TokenKind) -> bool {
        &self.kind == kind
    }
}

#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    finished: bool,
}

impl Scanner {
    pub fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            finished: false,
        }
    }

    /// Rewinds to the start of the source.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.finished = false;
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_is(&self, pred: impl Fn(char) -> bool) -> bool {
        self.peek_char().is_some_and(pred)
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F, buf: &mut String) {
        while let Some(c) = self.peek_char() {
            if pred(c) {
                buf.push(c);
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut id = String::new();
        self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_', &mut id);
        id
    }

    /// Reads a decimal literal starting at a digit or `.`.
    ///
    /// Returns the literal text and whether it is an integer (no fraction,
    /// no exponent).
    fn read_number(&mut self) -> Result<(String, bool), LexError> {
        let mut num = String::new();
        self.consume_while(|c| c.is_ascii_digit(), &mut num);
        let before_dot = !num.is_empty();

        if self.peek_char() == Some('.') {
            num.push('.');
            self.next_char();

            if !before_dot && !self.peek_is(|c| c.is_ascii_digit()) {
                return Err(LexError::MalformedDecimal(num));
            }
            self.consume_while(|c| c.is_ascii_digit(), &mut num);
            if self.peek_is(is_exponent_mark) {
                self.read_exponent(&mut num)?;
            }
            return Ok((num, false));
        }

        if self.peek_is(is_exponent_mark) {
            self.read_exponent(&mut num)?;
            return Ok((num, false));
        }

        Ok((num, true))
    }

    fn read_exponent(&mut self, num: &mut String) -> Result<(), LexError> {
        // mark and optional sign are a single character each
        if let Some(mark) = self.next_char() {
            num.push(mark);
        }
        if self.peek_is(|c| c == '+' || c == '-') {
            if let Some(sign) = self.next_char() {
                num.push(sign);
            }
        }
        if !self.peek_is(|c| c.is_ascii_digit()) {
            return Err(LexError::MalformedExponent(num.clone()));
        }
        self.consume_while(|c| c.is_ascii_digit(), num);
        Ok(())
    }

    /// Returns the next token. Once the input is exhausted every call
    /// returns an `Eof` token.
    pub fn next_token(&mut self) -> Token {
        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, "");
        };

        if is_white(c) {
            let mut ws = String::new();
            self.consume_while(is_white, &mut ws);
            return Token::new(TokenKind::Whitespace, ws);
        }

        if c.is_ascii_alphabetic() {
            return Token::new(TokenKind::Ident, self.read_identifier());
        }

        if c.is_ascii_digit() || c == '.' {
            return match self.read_number() {
                Ok((num, true)) => Token::new(TokenKind::Integer, num),
                Ok((num, false)) => Token::new(TokenKind::Float, num),
                Err(e) => Token::new(TokenKind::Error(e), ""),
            };
        }

        self.next_char();
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            other => TokenKind::Error(LexError::UnexpectedChar(other)),
        };
        match kind {
            TokenKind::Error(_) => Token::new(kind, ""),
            kind => Token::symbol(kind, c),
        }
    }
}

fn is_white(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n'
}

fn is_exponent_mark(c: char) -> bool {
    c == 'e' || c == 'E'
}

/// Yields every token, whitespace included, and stops after `Eof`.
impl Iterator for Scanner {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is(&TokenKind::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::new(src).map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenisation() {
        let test_cases = vec![
            (
                "1+sin(x)",
                vec![
                    Token::new(TokenKind::Integer, "1"),
                    Token::new(TokenKind::Plus, "+"),
                    Token::new(TokenKind::Ident, "sin"),
                    Token::new(TokenKind::LParen, "("),
                    Token::new(TokenKind::Ident, "x"),
                    Token::new(TokenKind::RParen, ")"),
                    Token::new(TokenKind::Eof, ""),
                ],
            ),
            (
                "pow(a_1, 2.5) ^ -b",
                vec![
                    Token::new(TokenKind::Ident, "pow"),
                    Token::new(TokenKind::LParen, "("),
                    Token::new(TokenKind::Ident, "a_1"),
                    Token::new(TokenKind::Comma, ","),
                    Token::new(TokenKind::Whitespace, " "),
                    Token::new(TokenKind::Float, "2.5"),
                    Token::new(TokenKind::RParen, ")"),
                    Token::new(TokenKind::Whitespace, " "),
                    Token::new(TokenKind::Caret, "^"),
                    Token::new(TokenKind::Whitespace, " "),
                    Token::new(TokenKind::Minus, "-"),
                    Token::new(TokenKind::Ident, "b"),
                    Token::new(TokenKind::Eof, ""),
                ],
            ),
            (
                "x*y/z",
                vec![
                    Token::new(TokenKind::Ident, "x"),
                    Token::new(TokenKind::Star, "*"),
                    Token::new(TokenKind::Ident, "y"),
                    Token::new(TokenKind::Slash, "/"),
                    Token::new(TokenKind::Ident, "z"),
                    Token::new(TokenKind::Eof, ""),
                ],
            ),
        ];

        for (src, expected) in test_cases {
            let tokens: Vec<_> = Scanner::new(src).collect();
            assert_eq!(tokens, expected, "scanning {src:?}");
        }
    }

    #[test]
    fn test_numeric_literals() {
        let test_cases = vec![
            ("42", TokenKind::Integer, "42"),
            ("3.14", TokenKind::Float, "3.14"),
            ("3.", TokenKind::Float, "3."),
            (".5", TokenKind::Float, ".5"),
            ("1e10", TokenKind::Float, "1e10"),
            ("2.5E-3", TokenKind::Float, "2.5E-3"),
            ("3.e+7", TokenKind::Float, "3.e+7"),
        ];

        for (src, kind, text) in test_cases {
            let token = Scanner::new(src).next_token();
            assert_eq!(token, Token::new(kind, text), "scanning {src:?}");
        }
    }

    #[test]
    fn test_lexical_errors() {
        let test_cases = vec![
            (".e5", LexError::MalformedDecimal(".".into())),
            (".", LexError::MalformedDecimal(".".into())),
            ("2e", LexError::MalformedExponent("2e".into())),
            ("2e+", LexError::MalformedExponent("2e+".into())),
            ("1.5ex", LexError::MalformedExponent("1.5e".into())),
            ("1e+-2", LexError::MalformedExponent("1e+".into())),
            ("%", LexError::UnexpectedChar('%')),
            ("_x", LexError::UnexpectedChar('_')),
        ];

        for (src, expected) in test_cases {
            let token = Scanner::new(src).next_token();
            assert_eq!(token.kind, TokenKind::Error(expected), "scanning {src:?}");
        }
    }

    #[test]
    fn test_whitespace_is_one_token() {
        assert_eq!(
            kinds(" \t\n 1"),
            vec![TokenKind::Whitespace, TokenKind::Integer, TokenKind::Eof]
        );
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut scanner = Scanner::new("x");
        assert_eq!(scanner.next_token().kind, TokenKind::Ident);
        for _ in 0..3 {
            assert_eq!(scanner.next_token().kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_reset_rewinds() {
        let mut scanner = Scanner::new("a+b");
        let first: Vec<_> = scanner.by_ref().collect();
        scanner.reset();
        let second: Vec<_> = scanner.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }
}
