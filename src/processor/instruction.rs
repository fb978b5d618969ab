//! Stack-machine instructions, in post-fix order.

use std::fmt;

use crate::model::{FunctionId, SymbolTables, VariableId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Negate,
    /// Pops `arity` operands, pushes the function's result.
    Call(FunctionId),
    /// Pushes the value read through the variable's binding.
    PushVariable(VariableId),
    /// Pushes a literal or an inlined constant.
    PushConstant(f64),
}

impl Instruction {
    /// Index == position of the variant in the enum.
    pub const MNEMONICS: &'static [&'static str] = &[
        "add", "sub", "mul", "div", "pow", "neg", "call", "load", "push",
    ];

    pub fn mnemonic(&self) -> &'static str {
        let idx = match self {
            Self::Add => 0,
            Self::Sub => 1,
            Self::Mul => 2,
            Self::Div => 3,
            Self::Pow => 4,
            Self::Negate => 5,
            Self::Call(_) => 6,
            Self::PushVariable(_) => 7,
            Self::PushConstant(_) => 8,
        };
        Self::MNEMONICS[idx]
    }

    /// Binds the instruction to `symbols` so operands print by name.
    pub fn display<'a>(&'a self, symbols: &'a SymbolTables) -> Listing<'a> {
        Listing {
            instruction: self,
            symbols,
        }
    }
}

/// An instruction rendered with names resolved from the symbol tables.
pub struct Listing<'a> {
    instruction: &'a Instruction,
    symbols: &'a SymbolTables,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.instruction.mnemonic();
        match *self.instruction {
            Instruction::Call(id) => {
                let name = self.symbols.functions.name(id).unwrap_or("?");
                let arity = self.symbols.functions.get(id).map_or(0, |func| func.arity());
                write!(f, "{mnemonic} {name}/{arity}")
            }
            Instruction::PushVariable(id) => {
                let name = self.symbols.variables.get(id).map_or("?", |v| v.name.as_str());
                write!(f, "{mnemonic} {name}")
            }
            Instruction::PushConstant(value) => write!(f, "{mnemonic} {value}"),
            _ => write!(f, "{mnemonic}"),
        }
    }
}

/// The finalized, immutable instruction sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    code: Box<[Instruction]>,
}

impl Program {
    pub fn new(code: Vec<Instruction>) -> Self {
        Self {
            code: code.into_boxed_slice(),
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing() {
        let mut symbols = SymbolTables::new();
        let x = symbols.variables.insert("x");
        let (pow, _) = symbols.functions.lookup("pow").unwrap();

        let test_cases = vec![
            (Instruction::PushVariable(x), "load x"),
            (Instruction::PushConstant(2.5), "push 2.5"),
            (Instruction::Call(pow), "call pow/2"),
            (Instruction::Negate, "neg"),
            (Instruction::Div, "div"),
        ];

        for (ins, expected) in test_cases {
            assert_eq!(ins.display(&symbols).to_string(), expected);
        }
    }
}
