//! Read-only views of a graph for visualization tools.

use std::io::Write;

use serde::Serialize;

use crate::{
    executor::Executor,
    graph::Graph,
    node::{NodeId, NodeKind},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Constant,
    Variable,
    Operator,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportNode {
    pub id: NodeId,
    pub kind: ExportKind,
    /// Operator symbol, variable name or constant value.
    pub label: String,
    pub depth: u32,
    pub output: Option<f64>,
    pub gradient: f64,
}

/// Snapshot of the nodes and edges of a graph. Edges point from an operand
/// to the node that consumes it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<(NodeId, NodeId)>,
}

impl GraphExport {
    pub fn new(graph: &Graph) -> Self {
        let mut export = Self::default();
        for (id, node) in graph.ids().zip(graph.nodes()) {
            let (kind, label) = match node.kind() {
                NodeKind::Constant(value) => (ExportKind::Constant, value.to_string()),
                NodeKind::Variable(name) => (ExportKind::Variable, name.clone()),
                NodeKind::Operator { op, .. } => (ExportKind::Operator, op.to_string()),
            };
            export.nodes.push(ExportNode {
                id,
                kind,
                label,
                depth: node.depth(),
                output: node.output(),
                gradient: node.gradient(),
            });
            export
                .edges
                .extend(node.parents().map(|parent| (parent, id)));
        }
        export
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write graphviz dot file to the given writer.
    pub fn dot(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "digraph G {{\nrankdir=\"LR\";")?;
        for node in &self.nodes {
            let shape = match node.kind {
                ExportKind::Operator => "ellipse",
                _ => "rect",
            };
            write!(
                writer,
                "{} [label=\"{} \\ngrad:{}",
                node.id, node.label, node.gradient
            )?;
            if let Some(output) = node.output {
                write!(writer, ", data:{output}")?;
            }
            writeln!(writer, "\", shape={shape}];")?;
        }
        for (from, to) in &self.edges {
            writeln!(writer, "{from} -> {to};")?;
        }
        writeln!(writer, "}}")?;
        Ok(())
    }
}

impl Executor {
    pub fn export(&self) -> GraphExport {
        GraphExport::new(self.graph())
    }

    /// Write graphviz dot file of the current graph state to the given writer.
    pub fn dot(&self, writer: &mut impl Write) -> std::io::Result<()> {
        self.export().dot(writer)
    }
}
