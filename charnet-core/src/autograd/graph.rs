use crate::error::CharNetError;
use crate::ops::loss::softmax_cross_entropy_backward;
use crate::ops::OpKind;
use crate::tensor::{full, Tensor};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// Mapping from node name to value. Callers fill in inputs and parameters;
/// [`Graph::forward`] adds every derived node.
pub type ValueEnv = HashMap<String, Tensor>;

/// Mapping from node name to the gradient of the terminal node with respect to it.
pub type GradMap = HashMap<String, Tensor>;

/// What a graph node is. Leaves carry a default value; operations only carry
/// their operator and operand names, their values live in a [`ValueEnv`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Fed by the caller on every pass (features, labels).
    Input { default: Tensor },
    /// Learned state, changed only by an update step.
    Parameter { default: Tensor },
    /// Derived value: `op` applied to the named operands, in order.
    Operation { op: OpKind, operands: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_param(&self) -> bool {
        matches!(self.kind, NodeKind::Parameter { .. })
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input { .. })
    }

    /// Default value of a leaf node, `None` for operations.
    pub fn default_value(&self) -> Option<&Tensor> {
        match &self.kind {
            NodeKind::Input { default } | NodeKind::Parameter { default } => Some(default),
            NodeKind::Operation { .. } => None,
        }
    }
}

/// A named, acyclic computation graph.
///
/// Nodes are kept in declaration order. An operation may only name operands
/// that are already declared, so the graph is acyclic by construction.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, name: String, kind: NodeKind) -> Result<(), CharNetError> {
        if self.index.contains_key(&name) {
            return Err(CharNetError::DuplicateName { name });
        }
        self.index.insert(name.clone(), self.nodes.len());
        self.nodes.push(Node { name, kind });
        Ok(())
    }

    /// Declares an input leaf with a placeholder value.
    pub fn input(&mut self, name: impl Into<String>, default: Tensor) -> Result<(), CharNetError> {
        self.register(name.into(), NodeKind::Input { default })
    }

    /// Declares a parameter leaf with its initial value.
    pub fn param(&mut self, name: impl Into<String>, default: Tensor) -> Result<(), CharNetError> {
        self.register(name.into(), NodeKind::Parameter { default })
    }

    /// Declares an operation node `name = op(operands...)`.
    ///
    /// # Errors
    /// `DuplicateName` if `name` is taken, `UnknownOperand` if an operand is not
    /// declared yet, `ArityMismatch` if the operand count does not fit `op`.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        op: OpKind,
        operands: &[&str],
    ) -> Result<(), CharNetError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(CharNetError::DuplicateName { name });
        }
        if let Some(missing) = operands.iter().find(|o| !self.index.contains_key(**o)) {
            return Err(CharNetError::UnknownOperand {
                node: name,
                operand: missing.to_string(),
            });
        }
        if operands.len() != op.arity() {
            return Err(CharNetError::ArityMismatch {
                operation: format!("{} ({})", op.name(), name),
                expected: op.arity(),
                actual: operands.len(),
            });
        }
        let operands = operands.iter().map(|o| o.to_string()).collect();
        self.register(name, NodeKind::Operation { op, operands })
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    fn require(&self, name: &str) -> Result<&Node, CharNetError> {
        self.node(name).ok_or_else(|| CharNetError::UnknownNode {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_param(&self, name: &str) -> bool {
        self.node(name).map_or(false, Node::is_param)
    }

    pub fn is_input(&self, name: &str) -> bool {
        self.node(name).map_or(false, Node::is_input)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Parameter nodes in declaration order.
    pub fn params(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_param())
    }

    /// Input nodes in declaration order.
    pub fn inputs(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_input())
    }

    /// A value environment holding the default of every input and parameter.
    pub fn input_dict(&self) -> ValueEnv {
        self.nodes
            .iter()
            .filter_map(|n| n.default_value().map(|v| (n.name.clone(), v.clone())))
            .collect()
    }

    /// Orders every operation reachable backward from `terminal` so that each
    /// node comes after all of its operands. Leaves are not listed. The
    /// terminal, when it is an operation, is last.
    pub fn linearize(&self, terminal: &str) -> Result<Vec<String>, CharNetError> {
        self.require(terminal)?;
        let mut visited = HashSet::new();
        let mut in_progress = HashSet::new();
        let mut order = Vec::new();
        self.build_topo(terminal, &mut visited, &mut in_progress, &mut order)?;
        debug!("linearized {} operation(s) ending at '{}'", order.len(), terminal);
        Ok(order)
    }

    /// Depth-first post-order walk over operand edges.
    fn build_topo<'a>(
        &'a self,
        name: &'a str,
        visited: &mut HashSet<&'a str>,
        in_progress: &mut HashSet<&'a str>,
        order: &mut Vec<String>,
    ) -> Result<(), CharNetError> {
        if visited.contains(name) {
            return Ok(());
        }
        if !in_progress.insert(name) {
            return Err(CharNetError::CycleDetected {
                name: name.to_string(),
            });
        }
        let node = self.require(name)?;
        if let NodeKind::Operation { operands, .. } = &node.kind {
            for operand in operands {
                self.build_topo(operand, visited, in_progress, order)?;
            }
            order.push(node.name.clone());
        }
        in_progress.remove(name);
        visited.insert(name);
        Ok(())
    }

    /// Looks up the operand values of an operation node.
    fn operand_values<'e>(
        env: &'e ValueEnv,
        operands: &[String],
    ) -> Result<Vec<&'e Tensor>, CharNetError> {
        operands
            .iter()
            .map(|o| {
                env.get(o)
                    .ok_or_else(|| CharNetError::MissingValue { name: o.clone() })
            })
            .collect()
    }

    /// Evaluates every operation of `order` in sequence.
    ///
    /// Inputs and parameters must already be present in `env`. Returns a copy of
    /// `env` extended with the value of every evaluated node.
    pub fn forward(&self, env: &ValueEnv, order: &[String]) -> Result<ValueEnv, CharNetError> {
        let mut values = env.clone();
        for name in order {
            let node = self.require(name)?;
            let (op, operands) = match &node.kind {
                NodeKind::Operation { op, operands } => (op, operands),
                _ => continue,
            };
            let output = {
                let args = Self::operand_values(&values, operands)?;
                op.forward(&args)?
            };
            trace!("forward {} = {}({:?}) -> {:?}", name, op, operands, output.shape());
            values.insert(name.clone(), output);
        }
        Ok(values)
    }

    /// Reverse-mode sweep seeded with 1 at the terminal (the last entry of `order`).
    ///
    /// `env` must come from [`forward`](Self::forward) over the same `order`.
    ///
    /// # Errors
    /// `BackwardNonScalar` if the terminal holds more than one element.
    pub fn backward(&self, env: &ValueEnv, order: &[String]) -> Result<GradMap, CharNetError> {
        let terminal = order.last().ok_or(CharNetError::EmptyGraph)?;
        let value = env.get(terminal).ok_or_else(|| CharNetError::MissingValue {
            name: terminal.clone(),
        })?;
        if value.numel() != 1 {
            return Err(CharNetError::BackwardNonScalar {
                name: terminal.clone(),
                shape: value.shape().to_vec(),
            });
        }
        self.backward_with_seed(env, order, full(value.shape(), 1.0))
    }

    /// Reverse-mode sweep with an explicit upstream gradient for the terminal.
    ///
    /// Gradients from several consumers of a node are summed. Operations that
    /// received no gradient (nothing downstream depends on them) are skipped.
    pub fn backward_with_seed(
        &self,
        env: &ValueEnv,
        order: &[String],
        seed: Tensor,
    ) -> Result<GradMap, CharNetError> {
        let terminal = order.last().ok_or(CharNetError::EmptyGraph)?;
        let terminal_value = env.get(terminal).ok_or_else(|| CharNetError::MissingValue {
            name: terminal.clone(),
        })?;
        if seed.shape() != terminal_value.shape() {
            return Err(CharNetError::ShapeMismatch {
                expected: terminal_value.shape().to_vec(),
                actual: seed.shape().to_vec(),
                operation: format!("backward seed for '{}'", terminal),
            });
        }

        let mut grads = GradMap::new();
        grads.insert(terminal.clone(), seed);

        for name in order.iter().rev() {
            let node = self.require(name)?;
            let (op, operands) = match &node.kind {
                NodeKind::Operation { op, operands } => (*op, operands),
                _ => continue,
            };
            let upstream = match grads.get(name) {
                Some(g) => g.clone(),
                None => continue,
            };
            let output = env.get(name).ok_or_else(|| CharNetError::MissingValue {
                name: name.clone(),
            })?;
            let args = Self::operand_values(env, operands)?;

            if let Some(logits) = self.fused_softmax_input(op, operands) {
                // crossEnt directly on a softmax: differentiate the pair as one unit.
                let (d_logits, d_labels) =
                    softmax_cross_entropy_backward(&upstream, args[0], args[1])?;
                trace!("backward {} (fused with softMax '{}')", name, operands[0]);
                accumulate_gradient(&mut grads, env, logits, d_logits)?;
                accumulate_gradient(&mut grads, env, &operands[1], d_labels)?;
                continue;
            }

            let contributions = op.backward(&upstream, &args, output)?;
            trace!("backward {} = {}({:?})", name, op, operands);
            for (operand, grad) in operands.iter().zip(contributions) {
                accumulate_gradient(&mut grads, env, operand, grad)?;
            }
        }
        Ok(grads)
    }

    /// For a `crossEnt` whose probability operand is a `softMax` node, returns
    /// the name of that softmax's own operand (the logits).
    fn fused_softmax_input<'a>(&'a self, op: OpKind, operands: &[String]) -> Option<&'a str> {
        if op != OpKind::CrossEnt {
            return None;
        }
        match &self.node(&operands[0])?.kind {
            NodeKind::Operation {
                op: OpKind::SoftMax,
                operands: inner,
            } => inner.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Adds `grad` into the gradient entry of `name`, creating it if absent.
/// The contribution must have the shape of the node's value.
pub(crate) fn accumulate_gradient(
    grads: &mut GradMap,
    env: &ValueEnv,
    name: &str,
    grad: Tensor,
) -> Result<(), CharNetError> {
    if let Some(value) = env.get(name) {
        if value.shape() != grad.shape() {
            return Err(CharNetError::ShapeMismatch {
                expected: value.shape().to_vec(),
                actual: grad.shape().to_vec(),
                operation: format!("gradient accumulation into '{}'", name),
            });
        }
    }
    match grads.get_mut(name) {
        Some(existing) => {
            *existing = existing.zip_map(&grad, "gradient accumulation", |a, b| a + b)?;
        }
        None => {
            grads.insert(name.to_string(), grad);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
