use dagrad::{Executor, Expression};
use dagrad_macro::expr;
use serde_json::json;

#[test]
fn matches_json_form() {
    let expected = Expression::from_json(&json!([["x", "^", 2], "+", ["x", "^", 2]])).unwrap();
    assert_eq!(expr!((x ^ 2) + (x ^ 2)), expected);

    let expected = Expression::from_json(&json!([
        "exp",
        [["sin", "x"], "-", ["cos", [-1.5, "/", "y"]]]
    ]))
    .unwrap();
    assert_eq!(expr!(exp(sin(x) - cos(-1.5 / y))), expected);
}

#[test]
fn splice_and_run() {
    let base = expr!(((2 + x) + (2 + y)) * 3);
    let mut executor = Executor::new(&expr!({ base } ^ y)).unwrap();
    executor
        .initialize_variables([("x", 3.), ("y", 2.)])
        .unwrap();
    assert_eq!(executor.forward().unwrap(), 729.);
    let grads = executor.backward().unwrap();
    assert!((grads["x"] - 162.).abs() < 0.01);
}

#[cfg(feature = "macro")]
#[test]
fn reexported_macro() {
    let expected = Expression::from_json(&json!(["sin", ["x", "/", 2]])).unwrap();
    assert_eq!(dagrad::expr!(sin(x / 2)), expected);
}
