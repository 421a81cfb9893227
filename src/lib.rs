mod binary_fn;
pub mod error;
mod executor;
mod export;
mod expression;
mod graph;
mod node;
mod operator;
mod unary_fn;

pub use binary_fn::BinaryFn;
#[cfg(feature = "macro")]
pub use dagrad_macro::expr;
pub use error::{Error, Result};
pub use executor::{build_executor, Bindings, Executor};
pub use export::{ExportKind, ExportNode, GraphExport};
pub use expression::Expression;
pub use graph::Graph;
pub use node::{Application, Leaf, Node, NodeId, NodeKind};
pub use operator::{Operator, Partials};
pub use unary_fn::UnaryFn;
