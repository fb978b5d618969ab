//! Evaluates a formula over the Cartesian product of variable ranges.
//!
//! The sweep configuration comes from the command line, a JSON file, or
//! both; command-line entries win.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::processor::FunctionParser;

/// Constants registered for every formula evaluated by the driver.
pub const DEFAULT_CONSTANTS: &[(&str, f64)] =
    &[("pi", std::f64::consts::PI), ("e", std::f64::consts::E)];

/// Upper bound on the number of points in one sweep, per range and in total.
pub const MAX_POINTS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Range {
    pub fn validate(&self) -> Result<()> {
        if !(self.start.is_finite() && self.stop.is_finite() && self.step.is_finite()) {
            bail!("range values must be finite");
        }
        if self.step <= 0.0 {
            bail!("step must be positive, got {}", self.step);
        }
        if self.start + self.step == self.start {
            bail!("step {} is too small to move away from {}", self.step, self.start);
        }
        let steps = self.steps();
        if steps >= MAX_POINTS as f64 {
            bail!(
                "range {}:{}:{} has more than {MAX_POINTS} points",
                self.start,
                self.stop,
                self.step
            );
        }
        Ok(())
    }

    fn steps(&self) -> f64 {
        if self.start < self.stop {
            ((self.stop - self.start) / self.step).ceil()
        } else {
            0.0
        }
    }

    /// Number of points: `start`, each step below `stop`, and the first
    /// value at or past `stop`.
    pub fn count(&self) -> usize {
        self.steps() as usize + 1
    }

    /// The `index`-th point, computed from `start` so rounding never
    /// accumulates.
    pub fn value(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step
    }
}

/// Parses `start:stop:step`.
impl FromStr for Range {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let [start, stop, step] = parts.as_slice() else {
            bail!("expected start:stop:step, got '{s}'");
        };
        let num = |v: &str| -> Result<f64> {
            v.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid number '{v}' in range '{s}'"))
        };
        let range = Self {
            start: num(*start)?,
            stop: num(*stop)?,
            step: num(*step)?,
        };
        range.validate()?;
        Ok(range)
    }
}

/// Contents of a sweep file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub constants: HashMap<String, f64>,
    #[serde(default)]
    pub variables: HashMap<String, Range>,
}

pub fn load_config(json: &str) -> Result<SweepConfig> {
    let config: SweepConfig = serde_json::from_str(json)?;
    for (name, range) in &config.variables {
        range
            .validate()
            .with_context(|| format!("range of variable '{name}'"))?;
    }
    Ok(config)
}

/// Splits `name=value` command-line pairs.
pub fn split_assignment(s: &str) -> Result<(&str, &str)> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected name=value, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("missing name in '{s}'");
    }
    Ok((name, value.trim()))
}

/// Cartesian product of ranges; the last range varies fastest.
///
/// Ranges are expected to have passed [`Range::validate`].
#[derive(Debug, Clone)]
pub struct Sweep {
    ranges: Vec<Range>,
    counts: Vec<usize>,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Sweep {
    pub fn new(ranges: Vec<Range>) -> Self {
        let counts = ranges.iter().map(Range::count).collect();
        let indices = vec![0; ranges.len()];
        Self {
            ranges,
            counts,
            indices,
            started: false,
            done: false,
        }
    }

    /// Total number of points, or `None` on overflow.
    pub fn points(&self) -> Option<usize> {
        self.counts.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }

    fn advance(&mut self) -> bool {
        let mut k = self.indices.len();
        while k > 0 {
            if self.indices[k - 1] + 1 < self.counts[k - 1] {
                self.indices[k - 1] += 1;
                return true;
            }
            self.indices[k - 1] = 0;
            k -= 1;
        }
        false
    }

    fn current(&self) -> Vec<f64> {
        self.ranges
            .iter()
            .zip(&self.indices)
            .map(|(range, &i)| range.value(i))
            .collect()
    }
}

impl Iterator for Sweep {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started && !self.advance() {
            self.done = true;
            return None;
        }
        self.started = true;
        Some(self.current())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub name: String,
    pub value: f64,
}

/// One evaluated point of the sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub bindings: Vec<Binding>,
    pub result: f64,
}

/// Builds and parses an engine for `formula` with the default constants
/// plus `constants`.
pub fn compile(formula: &str, constants: &HashMap<String, f64>) -> Result<FunctionParser> {
    let mut parser = FunctionParser::new(formula);
    for (name, value) in DEFAULT_CONSTANTS {
        parser.register_constant(name, *value);
    }
    for (name, value) in constants {
        parser.register_constant(name, *value);
    }

    if !parser.parse() {
        let reason = parser
            .last_error()
            .map_or_else(|| "unknown error".to_string(), |e| e.to_string());
        bail!("cannot parse '{formula}': {reason}");
    }
    debug!("compiled '{formula}' into {} instructions", parser.program().len());
    Ok(parser)
}

/// Binds every variable of `parser` to a slot and runs the full sweep.
pub fn evaluate(parser: &mut FunctionParser, ranges: &HashMap<String, Range>) -> Result<Vec<Row>> {
    let names: Vec<String> = parser
        .variable_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut selected = Vec::with_capacity(names.len());
    for (slot, name) in names.iter().enumerate() {
        let range = ranges
            .get(name)
            .ok_or_else(|| anyhow!("no range given for variable '{name}'"))?;
        range
            .validate()
            .with_context(|| format!("range of variable '{name}'"))?;
        parser.bind_variable(name, slot);
        selected.push(*range);
    }

    let sweep = Sweep::new(selected);
    let total = sweep
        .points()
        .filter(|&n| n <= MAX_POINTS)
        .ok_or_else(|| anyhow!("sweep has more than {MAX_POINTS} points"))?;

    let mut rows = Vec::with_capacity(total);
    for values in sweep {
        let result = parser.execute(&values);
        let bindings = names
            .iter()
            .zip(&values)
            .map(|(name, value)| Binding {
                name: name.clone(),
                value: *value,
            })
            .collect();
        rows.push(Row { bindings, result });
    }
    info!("evaluated {} points", rows.len());
    Ok(rows)
}
