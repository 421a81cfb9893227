//! Arena of graph nodes, aka a tape, with common subexpression elimination.
//! Every node is registered under a structural key, so inserting an equivalent
//! node returns the existing one instead of growing the arena.

use std::collections::HashMap;

use log::{debug, trace};

use crate::{
    error::{Error, Result},
    expression::Expression,
    node::{Application, Leaf, Node, NodeId, NodeKind},
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum CacheKey {
    /// Bit pattern of the value, with `-0.0` folded into `0.0`.
    Constant(u64),
    Variable(String),
    Operator {
        arity: usize,
        symbol: &'static str,
        left: Option<NodeId>,
        right: NodeId,
    },
}

impl CacheKey {
    fn of(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Constant(value) => {
                let value = if *value == 0. { 0. } else { *value };
                Self::Constant(value.to_bits())
            }
            NodeKind::Variable(name) => Self::Variable(name.clone()),
            NodeKind::Operator { op, left, right } => Self::Operator {
                arity: op.arity(),
                symbol: op.symbol(),
                left: *left,
                right: *right,
            },
        }
    }
}

#[derive(Default, Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    cache: HashMap<CacheKey, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node defined by exactly one of `leaf` or `application`,
    /// reusing an existing node with the same structure.
    pub fn insert(
        &mut self,
        leaf: Option<Leaf>,
        application: Option<Application>,
    ) -> Result<NodeId> {
        let (depth, constant_valued) = match &application {
            Some(app) => {
                let (mut depth, mut constant_valued) = (0, true);
                for id in app.left.into_iter().chain(Some(app.right)) {
                    let parent = self.node(id).ok_or_else(|| {
                        Error::Construction(format!("operand {id} is not in the graph"))
                    })?;
                    depth = depth.max(parent.depth());
                    constant_valued &= parent.is_constant_valued();
                }
                (depth + 1, constant_valued)
            }
            None => (0, false),
        };
        let mut node = Node::new(leaf, application, depth)?;
        node.constant_valued |= constant_valued;
        let key = CacheKey::of(node.kind());
        if let Some(&id) = self.cache.get(&key) {
            trace!("Cache hit for node {id}");
            return Ok(id);
        }
        let id = NodeId(self.nodes.len() as u32);
        trace!("Cache miss. New node {id}: {:?} at depth {depth}", node.kind());
        self.nodes.push(node);
        self.cache.insert(key, id);
        Ok(id)
    }

    pub fn constant(&mut self, value: f64) -> Result<NodeId> {
        self.insert(Some(Leaf::Constant(value)), None)
    }

    pub fn variable(&mut self, name: impl Into<String>) -> Result<NodeId> {
        self.insert(Some(Leaf::Variable(name.into())), None)
    }

    pub fn apply(&mut self, application: Application) -> Result<NodeId> {
        self.insert(None, Some(application))
    }

    /// Recursively add the nodes of `expr` and return the node of its root.
    pub fn build(&mut self, expr: &Expression) -> Result<NodeId> {
        let before = self.nodes.len();
        let root = self.build_rec(expr)?;
        debug!(
            "Built {} new node(s), {} in total",
            self.nodes.len() - before,
            self.nodes.len()
        );
        Ok(root)
    }

    fn build_rec(&mut self, expr: &Expression) -> Result<NodeId> {
        match expr {
            Expression::Constant(value) => self.constant(*value),
            Expression::Variable(name) => self.variable(name.as_str()),
            Expression::Unary { op, operand } => {
                let operand = self.build_rec(operand)?;
                self.apply(Application::unary(*op, operand))
            }
            Expression::Binary { lhs, op, rhs } => {
                let lhs = self.build_rec(lhs)?;
                let rhs = self.build_rec(rhs)?;
                self.apply(Application::binary(*op, lhs, rhs))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Find the variable node with the given name.
    pub fn find_variable(&self, name: &str) -> Option<NodeId> {
        self.cache
            .get(&CacheKey::Variable(name.to_string()))
            .copied()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or_else(|| Error::Construction(format!("node {id} is not in the graph")))
    }

    /// Assign the output of a variable node.
    /// Operator outputs are cleared until the next forward pass.
    pub fn set_value(&mut self, id: NodeId, value: f64) -> Result<()> {
        self.set_values([(id, value)])
    }

    /// Assign several variables at once. Nothing is assigned if any id is not
    /// a variable node.
    pub fn set_values(&mut self, values: impl IntoIterator<Item = (NodeId, f64)>) -> Result<()> {
        let values: Vec<_> = values.into_iter().collect();
        for &(id, _) in &values {
            if !self.node_mut(id)?.is_variable() {
                return Err(Error::Construction(format!(
                    "cannot set value to non-variable node {id}"
                )));
            }
        }
        for (id, value) in values {
            self.nodes[id.index()].output = Some(value);
        }
        for node in &mut self.nodes {
            if node.operator().is_some() {
                node.output = None;
            }
        }
        Ok(())
    }

    pub fn set_gradient(&mut self, id: NodeId, gradient: f64) -> Result<()> {
        self.node_mut(id)?.gradient = gradient;
        Ok(())
    }

    pub(crate) fn clear_grad(&mut self) {
        for node in &mut self.nodes {
            node.gradient = 0.;
        }
    }

    /// Run the forward step of a single node. Its operands must already hold outputs.
    pub fn forward_node(&mut self, id: NodeId) -> Result<()> {
        let node = self
            .node(id)
            .ok_or_else(|| Error::Construction(format!("node {id} is not in the graph")))?;
        if let Some(output) = node.forward(&self.nodes)? {
            trace!("forward {id}: {output}");
            self.nodes[id.index()].output = Some(output);
        }
        Ok(())
    }

    /// Run the backward step of a single node, adding its contributions to the
    /// gradients of its operands.
    pub fn backward_node(&mut self, id: NodeId) -> Result<()> {
        let node = self
            .node(id)
            .ok_or_else(|| Error::Construction(format!("node {id} is not in the graph")))?;
        for (parent, grad) in node.backward(&self.nodes)? {
            self.nodes[parent.index()].gradient += grad;
        }
        Ok(())
    }
}
