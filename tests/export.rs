use dagrad::{build_executor, ExportKind};
use serde_json::json;

#[test]
fn export_shared_graph() {
    let mut executor = build_executor(&json!([["x", "^", 2], "+", ["x", "^", 2]])).unwrap();
    executor.initialize_variables([("x", 3.)]).unwrap();
    executor.forward().unwrap();
    executor.backward().unwrap();

    let export = executor.export();
    assert_eq!(export.nodes.len(), 4);
    let kinds: Vec<_> = export.nodes.iter().map(|node| node.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ExportKind::Variable,
            ExportKind::Constant,
            ExportKind::Operator,
            ExportKind::Operator
        ]
    );
    let labels: Vec<_> = export.nodes.iter().map(|node| node.label.as_str()).collect();
    assert_eq!(labels, vec!["x", "2", "^", "+"]);
    assert_eq!(export.nodes[3].output, Some(18.));
    assert_eq!(export.nodes[0].gradient, 12.);

    let edges: Vec<_> = export
        .edges
        .iter()
        .map(|(from, to)| (from.index(), to.index()))
        .collect();
    assert_eq!(edges, vec![(0, 2), (1, 2), (2, 3), (2, 3)]);

    let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
    assert_eq!(json["nodes"][0]["kind"], "variable");
    assert_eq!(json["edges"][0], json!([0, 2]));
}

#[test]
fn export_does_not_mutate() {
    let mut executor = build_executor(&json!(["sin", "x"])).unwrap();
    executor.initialize_variables([("x", 0.)]).unwrap();
    executor.forward().unwrap();
    let before = executor.export();
    let mut dot = vec![];
    executor.dot(&mut dot).unwrap();
    assert_eq!(executor.export(), before);

    let dot = String::from_utf8(dot).unwrap();
    assert!(dot.starts_with("digraph G {"));
    assert!(dot.contains("a0 -> a1;"));
    assert!(dot.contains("a1 [label=\"sin \\ngrad:0, data:0\", shape=ellipse];"));
}
