use std::fs;

use formula_vm::sweep::{self, Range};

#[test]
fn evaluates_sweep_file() {
    let json = fs::read_to_string("tests/sweep.json").unwrap();
    let config = sweep::load_config(&json).expect("valid sweep file");

    assert_eq!(config.formula.as_deref(), Some("k*x + y"));
    assert_eq!(config.constants["k"], 10.0);
    assert_eq!(
        config.variables["y"],
        Range {
            start: 0.0,
            stop: 0.5,
            step: 0.25
        }
    );

    let formula = config.formula.clone().unwrap();
    let mut parser = sweep::compile(&formula, &config.constants).unwrap();
    // `k` is a constant, so only x and y are variables
    assert_eq!(parser.variable_names(), vec!["x", "y"]);

    let rows = sweep::evaluate(&mut parser, &config.variables).unwrap();
    let results: Vec<f64> = rows.iter().map(|r| r.result).collect();
    assert_eq!(results, vec![0.0, 0.25, 0.5, 10.0, 10.25, 10.5]);

    let last = rows.last().unwrap();
    assert_eq!(last.bindings[0].name, "x");
    assert_eq!(last.bindings[0].value, 1.0);
    assert_eq!(last.bindings[1].name, "y");
    assert_eq!(last.bindings[1].value, 0.5);
}

#[test]
fn rejects_bad_sweep_files() {
    let test_cases = vec![
        r#"{ "variables": { "x": { "start": 0, "stop": 1, "step": 0 } } }"#,
        r#"{ "variables": { "x": { "start": 0, "stop": 1 } } }"#,
        r#"{ "formula": "x", "unknown": 1 }"#,
        r#"[1, 2, 3]"#,
    ];

    for json in test_cases {
        assert!(sweep::load_config(json).is_err(), "accepted {json}");
    }
}

#[test]
fn formula_without_variables_yields_one_row() {
    let mut parser = sweep::compile("2*pi", &Default::default()).unwrap();
    let rows = sweep::evaluate(&mut parser, &Default::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].bindings.is_empty());
    assert!((rows[0].result - 2.0 * std::f64::consts::PI).abs() < 1e-12);
}
