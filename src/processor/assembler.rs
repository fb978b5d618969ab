//! Collects instructions emitted by the parser and assembles them into
//! the final [`Program`].

use log::debug;

use crate::error::{ParseError, ParseResult};
use crate::model::{FunctionId, VariableId};
use crate::processor::instruction::{Instruction, Program};
use crate::processor::lexer::{Token, TokenKind};

#[derive(Debug, Default)]
pub struct Assembler {
    pending: Vec<Instruction>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, ins: Instruction) {
        debug!("emit {ins:?}");
        self.pending.push(ins);
    }

    /// Emits the instruction for a binary operator token.
    pub fn op(&mut self, token: &Token) -> ParseResult<()> {
        let ins = match token.kind {
            TokenKind::Plus => Instruction::Add,
            TokenKind::Minus => Instruction::Sub,
            TokenKind::Star => Instruction::Mul,
            TokenKind::Slash => Instruction::Div,
            TokenKind::Caret => Instruction::Pow,
            _ => return Err(ParseError::UnexpectedToken(token.kind.to_string())),
        };
        self.emit(ins);
        Ok(())
    }

    pub fn negate(&mut self) {
        self.emit(Instruction::Negate);
    }

    pub fn call(&mut self, function: FunctionId) {
        self.emit(Instruction::Call(function));
    }

    pub fn variable(&mut self, variable: VariableId) {
        self.emit(Instruction::PushVariable(variable));
    }

    pub fn constant(&mut self, value: f64) {
        self.emit(Instruction::PushConstant(value));
    }

    /// Drops everything emitted so far.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Moves the pending instructions into a contiguous program.
    pub fn assemble(&mut self) -> Program {
        let code = std::mem::take(&mut self.pending);
        debug!("assembled {} instructions", code.len());
        Program::new(code)
    }
}
