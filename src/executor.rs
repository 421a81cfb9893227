use std::collections::{BTreeMap, HashMap};

use log::{debug, info, trace};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    expression::Expression,
    graph::Graph,
    node::{Node, NodeId},
};

/// Mapping from variable names to values or gradients.
pub type Bindings = BTreeMap<String, f64>;

/// Build an executor from the nested-sequence form of an expression.
pub fn build_executor(expression: &Value) -> Result<Executor> {
    Executor::new(&Expression::from_json(expression)?)
}

/// Owns a deduplicated graph and runs forward and backward passes over it.
#[derive(Debug)]
pub struct Executor {
    graph: Graph,
    root: NodeId,
    /// All nodes sorted by non-decreasing depth, ties in creation order.
    order: Vec<NodeId>,
    variables: Vec<NodeId>,
}

impl Executor {
    pub fn new(expression: &Expression) -> Result<Self> {
        let mut graph = Graph::new();
        let root = graph.build(expression)?;
        let mut order: Vec<_> = graph.ids().collect();
        order.sort_by_key(|id| graph.nodes()[id.index()].depth());
        let variables = graph
            .ids()
            .filter(|id| graph.nodes()[id.index()].is_variable())
            .collect();
        info!(
            "Built a graph of {} node(s) with depth {}",
            graph.len(),
            graph.nodes()[root.index()].depth()
        );
        Ok(Self {
            graph,
            root,
            order,
            variables,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn root_node(&self) -> &Node {
        &self.graph.nodes()[self.root.index()]
    }

    /// Number of distinct nodes after deduplication.
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    pub fn depth(&self) -> u32 {
        self.root_node().depth()
    }

    /// Output of the root node from the last forward pass.
    pub fn value(&self) -> Option<f64> {
        self.root_node().output()
    }

    fn variable_name(&self, id: NodeId) -> &str {
        self.graph.nodes()[id.index()].name().unwrap_or_default()
    }

    /// Current values of the initialized variables.
    pub fn variables(&self) -> Bindings {
        self.variables
            .iter()
            .filter_map(|&id| {
                let value = self.graph.nodes()[id.index()].output()?;
                Some((self.variable_name(id).to_string(), value))
            })
            .collect()
    }

    /// Assign every variable of the graph. Fails without assigning anything if
    /// a variable is missing from `values`; names not in the graph are ignored.
    pub fn initialize_variables<K: AsRef<str>>(
        &mut self,
        values: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<()> {
        let values: HashMap<String, f64> = values
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_string(), value))
            .collect();
        let assignments = self
            .variables
            .iter()
            .map(|&id| {
                let name = self.variable_name(id);
                values
                    .get(name)
                    .map(|&value| (id, value))
                    .ok_or_else(|| Error::Name(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        for name in values.keys() {
            if self.graph.find_variable(name).is_none() {
                debug!("Ignoring value for `{name}`, which is not in the graph");
            }
        }
        for &(id, value) in &assignments {
            debug!("{} = {value}", self.variable_name(id));
        }
        self.graph.set_values(assignments)
    }

    /// Evaluate every node in order of depth and return the root's value.
    pub fn forward(&mut self) -> Result<f64> {
        if let Some(&id) = self
            .variables
            .iter()
            .find(|id| self.graph.nodes()[id.index()].output().is_none())
        {
            return Err(Error::Name(self.variable_name(id).to_string()));
        }
        for &id in &self.order {
            self.graph.forward_node(id)?;
        }
        self.value().ok_or(Error::State(self.root.index()))
    }

    /// Propagate a unit gradient from the root down to every node and return
    /// the gradient of each variable. Uses the outputs of the last forward pass;
    /// fails with [`Error::State`] if variables were reassigned since then.
    pub fn backward(&mut self) -> Result<Bindings> {
        self.graph.clear_grad();
        self.graph.set_gradient(self.root, 1.)?;
        for &id in self.order.iter().rev() {
            self.graph.backward_node(id)?;
        }
        Ok(self
            .variables
            .iter()
            .map(|&id| {
                let grad = self.graph.nodes()[id.index()].gradient();
                (self.variable_name(id).to_string(), grad)
            })
            .collect())
    }

    /// Plain gradient descent over all variables for a fixed number of iterations.
    /// Returns the final variable values. Operator outputs are left cleared.
    pub fn gradient_descent(&mut self, iterations: usize, learning_rate: f64) -> Result<Bindings> {
        for i in 0..iterations {
            let value = self.forward()?;
            self.backward()?;
            let updates: Vec<_> = self
                .variables
                .iter()
                .map(|&id| {
                    let node = &self.graph.nodes()[id.index()];
                    let output = node.output().unwrap_or_default();
                    (id, output - learning_rate * node.gradient())
                })
                .collect();
            self.graph.set_values(updates)?;
            trace!("iteration {i}: value {value}");
        }
        let result = self.variables();
        debug!("gradient descent finished after {iterations} iterations: {result:?}");
        Ok(result)
    }
}
