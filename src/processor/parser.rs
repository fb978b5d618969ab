//! Recursive-descent parser that drives the scanner and emits post-fix
//! instructions into the assembler.
//
//      expr            ::= additive
//      additive        ::= multiplicative (('+' | '-') multiplicative)*
//      multiplicative  ::= exponent (('*' | '/') exponent)*
//      exponent        ::= primary ('^' exponent)?
//      primary         ::= '(' expr ')' | unary
//      unary           ::= '-' primary | simple
//      simple          ::= NUMBER | IDENT ('(' expr (',' expr)* ')')?
//
//  Every production leaves `current` on the first token past itself.
//  `primary` and `exponent` count towards the nesting limit.

use log::debug;

use crate::error::{ParseError, ParseResult};
use crate::model::SymbolTables;
use crate::processor::assembler::Assembler;
use crate::processor::lexer::{Scanner, Token, TokenKind};

/// Deepest recursion the parser allows before giving up.
pub const MAX_DEPTH: usize = 256;

pub struct Parser<'a> {
    scanner: &'a mut Scanner,
    symbols: &'a mut SymbolTables,
    asm: &'a mut Assembler,
    current: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(
        scanner: &'a mut Scanner,
        symbols: &'a mut SymbolTables,
        asm: &'a mut Assembler,
    ) -> Self {
        Self {
            scanner,
            symbols,
            asm,
            current: Token {
                kind: TokenKind::Eof,
                text: String::new(),
            },
            depth: 0,
        }
    }

    /// Parses one complete expression followed by end of input.
    pub fn parse(&mut self) -> ParseResult<()> {
        self.consume()?;
        self.parse_expr()?;
        if !self.is_here(&TokenKind::Eof) {
            return Err(ParseError::TrailingInput(self.current.text.clone()));
        }
        Ok(())
    }

    /// Advances to the next non-whitespace token.
    fn consume(&mut self) -> ParseResult<()> {
        loop {
            self.current = self.scanner.next_token();
            if !self.is_here(&TokenKind::Whitespace) {
                break;
            }
        }
        debug!("token {} {:?}", self.current.kind, self.current.text);
        match &self.current.kind {
            TokenKind::Error(e) => Err(ParseError::Lexical(e.clone())),
            _ => Ok(()),
        }
    }

    fn is_here(&self, kind: &TokenKind) -> bool {
        self.current.is(kind)
    }

    /// Requires the current token to be `kind` and advances past it.
    ///
    /// An integer literal is accepted where a float is expected.
    fn expect(&mut self, kind: TokenKind) -> ParseResult<String> {
        let relaxed = kind == TokenKind::Float && self.is_here(&TokenKind::Integer);
        if !self.is_here(&kind) && !relaxed {
            return Err(ParseError::Expected {
                expected: kind,
                found: self.current.kind.clone(),
            });
        }
        let text = self.current.text.clone();
        self.consume()?;
        Ok(text)
    }

    /// Runs `production` one nesting level deeper.
    fn nested(&mut self, production: fn(&mut Self) -> ParseResult<()>) -> ParseResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn parse_expr(&mut self) -> ParseResult<()> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> ParseResult<()> {
        self.parse_multiplicative()?;
        while self.is_here(&TokenKind::Plus) || self.is_here(&TokenKind::Minus) {
            let op = self.current.clone();
            self.consume()?;
            self.parse_multiplicative()?;
            self.asm.op(&op)?;
        }
        Ok(())
    }

    fn parse_multiplicative(&mut self) -> ParseResult<()> {
        self.parse_exponent()?;
        while self.is_here(&TokenKind::Star) || self.is_here(&TokenKind::Slash) {
            let op = self.current.clone();
            self.consume()?;
            self.parse_exponent()?;
            self.asm.op(&op)?;
        }
        Ok(())
    }

    fn parse_exponent(&mut self) -> ParseResult<()> {
        self.nested(Self::exponent)
    }

    fn exponent(&mut self) -> ParseResult<()> {
        self.parse_primary()?;
        if self.is_here(&TokenKind::Caret) {
            let op = self.current.clone();
            self.consume()?;
            // right-associative: a^b^c == a^(b^c)
            self.parse_exponent()?;
            self.asm.op(&op)?;
        }
        Ok(())
    }

    fn parse_primary(&mut self) -> ParseResult<()> {
        self.nested(Self::primary)
    }

    fn primary(&mut self) -> ParseResult<()> {
        if self.is_here(&TokenKind::LParen) {
            self.consume()?;
            self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            return Ok(());
        }
        self.parse_unary()
    }

    fn parse_unary(&mut self) -> ParseResult<()> {
        if self.is_here(&TokenKind::Minus) {
            self.consume()?;
            self.parse_primary()?;
            self.asm.negate();
            return Ok(());
        }
        self.parse_simple()
    }

    fn parse_simple(&mut self) -> ParseResult<()> {
        match self.current.kind {
            TokenKind::Integer | TokenKind::Float => {
                let text = self.expect(TokenKind::Float)?;
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber(text.clone()))?;
                self.asm.constant(value);
                Ok(())
            }
            TokenKind::Ident => {
                let ident = self.current.text.clone();
                self.consume()?;
                if self.is_here(&TokenKind::LParen) {
                    self.parse_function(&ident)
                } else {
                    self.parse_variable(&ident);
                    Ok(())
                }
            }
            _ => {
                let found = if self.current.text.is_empty() {
                    self.current.kind.to_string()
                } else {
                    self.current.text.clone()
                };
                Err(ParseError::UnexpectedToken(found))
            }
        }
    }

    /// Parses `(arg, ..)` and emits a call to `name`.
    fn parse_function(&mut self, name: &str) -> ParseResult<()> {
        let mut count = 0;
        loop {
            // skips the opening '(' and every ',' after it
            self.consume()?;
            self.parse_expr()?;
            count += 1;
            if !self.is_here(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let (id, function) = self
            .symbols
            .functions
            .lookup(name)
            .ok_or_else(|| ParseError::UnknownFunction(name.to_string()))?;
        if function.arity() != count {
            return Err(ParseError::ArgumentCount {
                name: name.to_string(),
                expected: function.arity(),
                found: count,
            });
        }
        self.asm.call(id);
        Ok(())
    }

    /// Constants are inlined; anything else becomes a variable.
    fn parse_variable(&mut self, name: &str) {
        match self.symbols.constants.get(name) {
            Some(&value) => self.asm.constant(value),
            None => {
                let id = self.symbols.variables.insert(name);
                self.asm.variable(id);
            }
        }
    }
}
