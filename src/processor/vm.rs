//! Stack machine that runs an assembled [`Program`].
//!
//! Running never fails. Operand slots that are missing read as NaN, and
//! arithmetic follows IEEE semantics.

use crate::model::{Function, SymbolTables};
use crate::processor::instruction::{Instruction, Program};

#[derive(Debug, Default)]
pub struct Executor {
    program: Program,
    stack: Vec<f64>,
}

impl Executor {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            stack: Vec::new(),
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Replaces the loaded program.
    pub fn load(&mut self, program: Program) {
        self.program = program;
        self.stack.clear();
    }

    fn pop(&mut self) -> f64 {
        self.stack.pop().unwrap_or(f64::NAN)
    }

    /// Runs the program once. `values` is the caller's table that bound
    /// variables read from. An empty program yields `0.0`.
    pub fn run(&mut self, symbols: &SymbolTables, values: &[f64]) -> f64 {
        if self.program.is_empty() {
            return 0.0;
        }
        self.stack.clear();

        for i in 0..self.program.len() {
            let ins = self.program.instructions()[i];
            match ins {
                Instruction::Add => {
                    let (a, b) = self.pop2();
                    self.stack.push(a + b);
                }
                Instruction::Sub => {
                    let (a, b) = self.pop2();
                    self.stack.push(a - b);
                }
                Instruction::Mul => {
                    let (a, b) = self.pop2();
                    self.stack.push(a * b);
                }
                Instruction::Div => {
                    let (a, b) = self.pop2();
                    self.stack.push(a / b);
                }
                Instruction::Pow => {
                    let (a, b) = self.pop2();
                    self.stack.push(a.powf(b));
                }
                Instruction::Negate => {
                    let a = self.pop();
                    self.stack.push(-a);
                }
                Instruction::Call(id) => {
                    let value = match symbols.functions.get(id) {
                        Some(Function::Unary(f)) => {
                            let a = self.pop();
                            f(a)
                        }
                        Some(Function::Binary(f)) => {
                            let (a, b) = self.pop2();
                            f(a, b)
                        }
                        None => f64::NAN,
                    };
                    self.stack.push(value);
                }
                Instruction::PushVariable(id) => {
                    self.stack.push(symbols.variables.value(id, values));
                }
                Instruction::PushConstant(value) => self.stack.push(value),
            }
        }

        self.pop()
    }

    /// Pops the right operand, then the left one.
    fn pop2(&mut self) -> (f64, f64) {
        let b = self.pop();
        let a = self.pop();
        (a, b)
    }
}
