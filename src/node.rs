use log::debug;
use serde::Serialize;

use crate::{
    error::{Error, Result},
    operator::{Operator, Partials},
};

/// Index of a node in its [`Graph`](crate::Graph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// The value half of a node definition.
#[derive(Clone, Debug, PartialEq)]
pub enum Leaf {
    Constant(f64),
    Variable(String),
}

/// The operator half of a node definition.
/// A unary operator keeps its operand in `right` and leaves `left` empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Application {
    pub op: Operator,
    pub left: Option<NodeId>,
    pub right: NodeId,
}

impl Application {
    pub fn unary(op: Operator, operand: NodeId) -> Self {
        Self {
            op,
            left: None,
            right: operand,
        }
    }

    pub fn binary(op: Operator, left: NodeId, right: NodeId) -> Self {
        Self {
            op,
            left: Some(left),
            right,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Constant(f64),
    Variable(String),
    Operator {
        op: Operator,
        left: Option<NodeId>,
        right: NodeId,
    },
}

#[derive(Clone, Debug)]
pub struct Node {
    kind: NodeKind,
    depth: u32,
    /// No variable is reachable through the operands.
    pub(crate) constant_valued: bool,
    pub(crate) output: Option<f64>,
    pub(crate) gradient: f64,
}

impl Node {
    /// Define a node from exactly one of a leaf value or an operator application.
    pub(crate) fn new(
        leaf: Option<Leaf>,
        application: Option<Application>,
        depth: u32,
    ) -> Result<Self> {
        let (kind, output) = match (leaf, application) {
            (Some(Leaf::Constant(value)), None) => (NodeKind::Constant(value), Some(value)),
            (Some(Leaf::Variable(name)), None) => (NodeKind::Variable(name), None),
            (None, Some(Application { op, left, right })) => {
                if op.is_unary() != left.is_none() {
                    return Err(Error::Construction(format!(
                        "operator `{op}` takes {} operand(s)",
                        op.arity()
                    )));
                }
                (NodeKind::Operator { op, left, right }, None)
            }
            (Some(_), Some(_)) | (None, None) => {
                return Err(Error::Construction(
                    "a node definition has to contain only one of: [value, operator]".to_string(),
                ))
            }
        };
        Ok(Self {
            constant_valued: matches!(kind, NodeKind::Constant(_)),
            kind,
            depth,
            output,
            gradient: 0.,
        })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The value computed by the last forward pass, or assigned to a leaf.
    pub fn output(&self) -> Option<f64> {
        self.output
    }

    pub fn gradient(&self) -> f64 {
        self.gradient
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, NodeKind::Constant(_))
    }

    /// True for constants and for operators whose operands are all constant valued.
    pub fn is_constant_valued(&self) -> bool {
        self.constant_valued
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, NodeKind::Variable(_))
    }

    /// Variable name, if this is a variable node.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            NodeKind::Operator { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Operands in (left, right) order. Unary nodes yield only the right one.
    pub fn parents(&self) -> impl Iterator<Item = NodeId> {
        let (left, right) = match self.kind {
            NodeKind::Operator { left, right, .. } => (left, Some(right)),
            _ => (None, None),
        };
        left.into_iter().chain(right)
    }

    /// Compute the output of an operator node from its operands' outputs.
    /// Leaves return `None`; their output is assigned from outside.
    pub fn forward(&self, nodes: &[Node]) -> Result<Option<f64>> {
        let NodeKind::Operator { op, left, right } = self.kind else {
            return Ok(None);
        };
        let a = operand(nodes, left.unwrap_or(right))?;
        let b = left.map(|_| operand(nodes, right)).transpose()?;
        op.f(a, b).map(Some)
    }

    /// Chain rule: the gradient contribution this node pushes to each operand.
    /// The caller adds them to the operands' accumulators.
    ///
    /// An exponent whose subgraph holds no variable gets no contribution when
    /// `^` has a non-positive base, since its gradient is never consumed.
    pub fn backward(&self, nodes: &[Node]) -> Result<Vec<(NodeId, f64)>> {
        let NodeKind::Operator { op, left, right } = self.kind else {
            return Ok(vec![]);
        };
        let grad = self.gradient;
        let a = operand(nodes, left.unwrap_or(right))?;
        let b = left.map(|_| operand(nodes, right)).transpose()?;
        let partials = match op.df(a, b) {
            Err(Error::UnsupportedDerivative { base })
                if nodes[right.index()].is_constant_valued() =>
            {
                debug!("skipping d/d{right} of `{op}` at base {base}");
                Partials::Unary(op.df_lhs(a, b)?)
            }
            partials => partials?,
        };
        match (partials, left) {
            (Partials::Unary(da), None) => Ok(vec![(right, grad * da)]),
            (Partials::Unary(da), Some(left)) => Ok(vec![(left, grad * da)]),
            (Partials::Binary(da, db), Some(left)) => {
                Ok(vec![(left, grad * da), (right, grad * db)])
            }
            (Partials::Binary(..), None) => Err(Error::Construction(format!(
                "operator `{op}` has the wrong number of operands"
            ))),
        }
    }
}

fn operand(nodes: &[Node], id: NodeId) -> Result<f64> {
    nodes
        .get(id.index())
        .and_then(|node| node.output)
        .ok_or(Error::State(id.index()))
}
