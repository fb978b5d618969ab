//! The formula engine: scanner, parser, assembler and stack machine.
//!
//! Parsing happens once; the resulting program can then be executed any
//! number of times against changing variable values.
//!
//! ```
//! use formula_vm::FunctionParser;
//!
//! let mut f = FunctionParser::new("x*2");
//! assert!(f.parse());
//! f.bind_variable("x", 0);
//!
//! let mut values = [3.0];
//! assert_eq!(f.execute(&values), 6.0);
//! values[0] = 5.0;
//! assert_eq!(f.execute(&values), 10.0);
//! ```
pub mod assembler;
pub mod instruction;
pub mod lexer;
pub mod parser;
pub mod vm;

use log::{error, warn};

use crate::error::ParseError;
use crate::model::{Function, SymbolTables};
use assembler::Assembler;
use instruction::Instruction;
use lexer::Scanner;
use parser::Parser;
use vm::Executor;

pub struct FunctionParser {
    scanner: Scanner,
    symbols: SymbolTables,
    asm: Assembler,
    vm: Executor,
    error: Option<ParseError>,
    result: f64,
}

impl FunctionParser {
    /// Creates an engine over `source` with the default function library.
    pub fn new(source: &str) -> Self {
        Self {
            scanner: Scanner::new(source),
            symbols: SymbolTables::new(),
            asm: Assembler::new(),
            vm: Executor::default(),
            error: None,
            result: 0.0,
        }
    }

    pub fn register_unary_function(&mut self, name: &str, f: fn(f64) -> f64) {
        self.symbols.functions.insert(name, Function::Unary(f));
    }

    pub fn register_binary_function(&mut self, name: &str, f: fn(f64, f64) -> f64) {
        self.symbols.functions.insert(name, Function::Binary(f));
    }

    /// Only takes effect for parses started after the call.
    pub fn register_constant(&mut self, name: &str, value: f64) {
        self.symbols.constants.insert(name.to_string(), value);
    }

    /// Compiles the source. Returns `false` on the first error; the error
    /// is logged and kept in [`last_error`](Self::last_error), and the
    /// loaded program is left empty.
    pub fn parse(&mut self) -> bool {
        self.asm.clear();
        self.error = None;

        let res = Parser::new(&mut self.scanner, &mut self.symbols, &mut self.asm).parse();
        let program = self.asm.assemble();
        match res {
            Ok(()) => self.vm.load(program),
            Err(e) => {
                error!("{e}");
                self.vm.load(Default::default());
                self.error = Some(e);
            }
        }

        self.scanner.reset();
        self.error.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn last_error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Names of the variables seen while parsing, in discovery order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.symbols.variables.names().collect()
    }

    /// Makes `name` read `values[slot]` on every later [`execute`](Self::execute).
    /// Returns `false` if the formula never mentions `name`.
    pub fn bind_variable(&mut self, name: &str, slot: usize) -> bool {
        let bound = self.symbols.variables.bind(name, slot);
        if !bound {
            warn!("no such variable '{name}'");
        }
        bound
    }

    /// Runs the compiled program against `values` and caches the result.
    ///
    /// Unbound variables read as NaN.
    pub fn execute(&mut self, values: &[f64]) -> f64 {
        self.result = self.vm.run(&self.symbols, values);
        self.result
    }

    /// The value of the last [`execute`](Self::execute), `0.0` before any.
    pub fn result(&self) -> f64 {
        self.result
    }

    pub fn program(&self) -> &[Instruction] {
        self.vm.program().instructions()
    }

    pub fn symbols(&self) -> &SymbolTables {
        &self.symbols
    }

    /// One line per instruction, operands printed by name.
    pub fn listing(&self) -> Vec<String> {
        self.program()
            .iter()
            .map(|ins| ins.display(&self.symbols).to_string())
            .collect()
    }
}
