use dagrad::{build_executor, Error, Expression, Operator};
use serde_json::json;

#[test]
fn parse_nested() {
    let expr = Expression::from_json(&json!(["exp", [["x", "+", 1.5], "*", "y"]])).unwrap();
    assert_eq!(
        expr,
        Expression::unary(
            Operator::EXP,
            Expression::binary(
                Expression::binary(
                    Expression::variable("x"),
                    Operator::ADD,
                    Expression::constant(1.5)
                ),
                Operator::MUL,
                Expression::variable("y"),
            )
        )
    );
    assert_eq!(expr.variables(), vec!["x", "y"]);
}

#[test]
fn deserialize() {
    let expr: Expression = serde_json::from_str(r#"[["cos", "x"], "+", ["sin", "y"]]"#).unwrap();
    assert_eq!(expr.variables(), vec!["x", "y"]);
    assert!(serde_json::from_str::<Expression>(r#"["x", "+"]"#).is_err());
}

fn construction_error(value: serde_json::Value) {
    assert!(
        matches!(
            Expression::from_json(&value),
            Err(Error::Construction(_))
        ),
        "{value} should be rejected"
    );
    assert!(matches!(
        build_executor(&value),
        Err(Error::Construction(_))
    ));
}

#[test]
fn malformed_sequences() {
    construction_error(json!([]));
    construction_error(json!(["x"]));
    construction_error(json!([1, "+", 2, "+", 3]));
    construction_error(json!([["x", "+", 1], "*", [2]]));
}

#[test]
fn malformed_leaves() {
    construction_error(json!(null));
    construction_error(json!(true));
    construction_error(json!({"x": 1}));
    construction_error(json!(""));
    construction_error(json!(["x", "+", "sin"]));
}

#[test]
fn operator_arity() {
    construction_error(json!(["+", "x"]));
    construction_error(json!(["x", "exp", 1]));
    construction_error(json!(["tan", "x"]));
    construction_error(json!(["x", 2, "y"]));
}

#[test]
fn parse_text() {
    assert!("[1, \"/\", \"z\"]".parse::<Expression>().is_ok());
    assert!(matches!(
        "[1, \"/\"".parse::<Expression>(),
        Err(Error::Construction(_))
    ));
}
