//! Symbol tables shared by the parser and the executor.
//!
//! Instructions refer to functions and variables by index into these
//! tables, so a table entry always outlives the program that uses it.

use std::collections::HashMap;

/// Index of a function in [`Functions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub usize);

/// Index of a variable in [`Variables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableId(pub usize);

/// A native callable, tagged by arity.
#[derive(Debug, Clone, Copy)]
pub enum Function {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
}

impl Function {
    pub fn arity(&self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Functions {
    names: HashMap<String, FunctionId>,
    entries: Vec<(String, Function)>,
}

impl Functions {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// The built-in library: `log` (natural), `log10`, `exp`, `sqrt`,
    /// `sin`, `cos`, `tan` and `pow`.
    pub fn with_defaults() -> Self {
        let mut functions = Self::new();
        functions.insert("log", Function::Unary(f64::ln));
        functions.insert("log10", Function::Unary(f64::log10));
        functions.insert("exp", Function::Unary(f64::exp));
        functions.insert("sqrt", Function::Unary(f64::sqrt));
        functions.insert("sin", Function::Unary(f64::sin));
        functions.insert("cos", Function::Unary(f64::cos));
        functions.insert("tan", Function::Unary(f64::tan));
        functions.insert("pow", Function::Binary(f64::powf));
        functions
    }

    /// Registers `function` under `name`. A later registration of the same
    /// name shadows the earlier one for new lookups; entries themselves are
    /// never modified, so compiled programs keep calling what they were
    /// compiled against.
    pub fn insert(&mut self, name: &str, function: Function) -> FunctionId {
        let id = FunctionId(self.entries.len());
        self.entries.push((name.to_string(), function));
        self.names.insert(name.to_string(), id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<(FunctionId, Function)> {
        let id = *self.names.get(name)?;
        Some((id, self.entries[id.0].1))
    }

    pub fn get(&self, id: FunctionId) -> Option<Function> {
        self.entries.get(id.0).map(|(_, f)| *f)
    }

    pub fn name(&self, id: FunctionId) -> Option<&str> {
        self.entries.get(id.0).map(|(n, _)| n.as_str())
    }
}

impl Default for Functions {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// A named variable and the caller slot it reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Index into the caller's values table; `None` until bound.
    pub slot: Option<usize>,
}

/// Variables in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    names: HashMap<String, VariableId>,
    entries: Vec<Variable>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `name`, creating the variable on first sight.
    pub fn insert(&mut self, name: &str) -> VariableId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = VariableId(self.entries.len());
        self.entries.push(Variable {
            name: name.to_string(),
            slot: None,
        });
        self.names.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, id: VariableId) -> Option<&Variable> {
        self.entries.get(id.0)
    }

    /// Points `name` at `slot`. Returns `false` if `name` is unknown.
    pub fn bind(&mut self, name: &str, slot: usize) -> bool {
        match self.names.get(name) {
            Some(id) => {
                self.entries[id.0].slot = Some(slot);
                true
            }
            None => false,
        }
    }

    /// Reads the current value of `id` from `values`.
    ///
    /// Unbound variables and slots past the end of `values` read as NaN.
    pub fn value(&self, id: VariableId, values: &[f64]) -> f64 {
        self.entries
            .get(id.0)
            .and_then(|v| v.slot)
            .and_then(|slot| values.get(slot).copied())
            .unwrap_or(f64::NAN)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|v| v.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Constants, functions and variables of one formula.
#[derive(Debug, Clone, Default)]
pub struct SymbolTables {
    pub constants: HashMap<String, f64>,
    pub variables: Variables,
    pub functions: Functions,
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_functions() {
        let functions = Functions::with_defaults();
        let test_cases = vec![
            ("log", 1),
            ("log10", 1),
            ("exp", 1),
            ("sqrt", 1),
            ("sin", 1),
            ("cos", 1),
            ("tan", 1),
            ("pow", 2),
        ];

        for (name, arity) in test_cases {
            let (_, f) = functions.lookup(name).expect("default function");
            assert_eq!(f.arity(), arity, "arity of {name}");
        }
        assert!(functions.lookup("atan").is_none());
    }

    #[test]
    fn test_reregistration_leaves_old_entry_intact() {
        let mut functions = Functions::with_defaults();
        let (before, _) = functions.lookup("sin").unwrap();
        let after = functions.insert("sin", Function::Binary(f64::max));
        assert_ne!(before, after);

        let (found, f) = functions.lookup("sin").unwrap();
        assert_eq!(found, after);
        assert_eq!(f.arity(), 2);
        assert_eq!(functions.get(before).unwrap().arity(), 1);
        assert_eq!(functions.name(before), Some("sin"));
        assert_eq!(functions.name(after), Some("sin"));
    }

    #[test]
    fn test_variables_keep_discovery_order() {
        let mut vars = Variables::new();
        let y = vars.insert("y");
        let x = vars.insert("x");
        assert_eq!(vars.insert("y"), y);
        assert_ne!(x, y);
        assert_eq!(vars.names().collect::<Vec<_>>(), vec!["y", "x"]);
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_variable_binding() {
        let mut vars = Variables::new();
        let x = vars.insert("x");
        let values = [1.5, 2.5];

        assert!(vars.value(x, &values).is_nan());
        assert!(vars.bind("x", 1));
        assert_eq!(vars.value(x, &values), 2.5);
        assert!(vars.bind("x", 7));
        assert!(vars.value(x, &values).is_nan());
        assert!(!vars.bind("nope", 0));
    }
}
