use crate::autograd::graph::{Graph, ValueEnv};
use crate::error::CharNetError;
use crate::nn::init::{glorot_uniform, uniform_symmetric};
use crate::nn::Network;
use crate::ops::OpKind;
use crate::tensor::{rand_uniform, Tensor};
use log::info;
use rand::Rng;

/// Scale of the uniform bias initialisation.
const BIAS_SCALE: f64 = 0.1;

/// Name of the feature input.
pub const FEATURES: &str = "X";
/// Name of the multi-hot label input.
pub const LABELS: &str = "y";
/// Name of the softmax output node.
pub const OUTPUT: &str = "output";
/// Name of the scalar loss node.
pub const LOSS: &str = "loss";

/// Multilayer perceptron over layer widths `[in, hidden..., out]`.
///
/// Layer `k` (1-indexed) owns `W{k}` of shape `(sizes[k-1], sizes[k])` and
/// `b{k}` of shape `(sizes[k],)`. Every layer, the last one included, applies
/// `relu(matmul(h, W) + b)`; the result goes through `softMax` and the loss is
/// `mean(crossEnt(output, y))`.
#[derive(Debug, Clone)]
pub struct Mlp {
    layer_sizes: Vec<usize>,
    graph: Graph,
    order: Vec<String>,
    params: ValueEnv,
}

impl Mlp {
    /// Declares parameters and inputs, builds the graph and caches its
    /// evaluation order.
    ///
    /// Draw order from `rng`: `W1, b1, W2, b2, ...`, then the `X` and `y`
    /// placeholders (uniform in `[0, 1]`, one row each).
    pub fn new<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Self, CharNetError> {
        if layer_sizes.len() < 2 || layer_sizes.contains(&0) {
            return Err(CharNetError::InvalidLayerSizes {
                sizes: layer_sizes.to_vec(),
            });
        }
        info!("initializing MLP with layer_sizes: {:?}", layer_sizes);
        let mut graph = Graph::new();
        let mut params = ValueEnv::new();

        for (i, pair) in layer_sizes.windows(2).enumerate() {
            let k = i + 1;
            let w = glorot_uniform(pair[0], pair[1], rng)?;
            let b = uniform_symmetric(&[pair[1]], BIAS_SCALE, rng)?;
            for (name, value) in [(format!("W{}", k), w), (format!("b{}", k), b)] {
                graph.param(name.as_str(), value.clone())?;
                params.insert(name, value);
            }
        }

        let in_size = layer_sizes[0];
        let out_size = layer_sizes[layer_sizes.len() - 1];
        graph.input(FEATURES, rand_uniform(&[1, in_size], 0.0, 1.0, rng)?)?;
        graph.input(LABELS, rand_uniform(&[1, out_size], 0.0, 1.0, rng)?)?;

        let num_layers = layer_sizes.len() - 1;
        let mut hidden = FEATURES.to_string();
        for k in 1..=num_layers {
            let (weight, bias) = (format!("W{}", k), format!("b{}", k));
            let (matmul, add, relu) = (
                format!("matmul_{}", k),
                format!("add_{}", k),
                format!("relu_{}", k),
            );
            graph.declare(matmul.as_str(), OpKind::MatMul, &[hidden.as_str(), weight.as_str()])?;
            graph.declare(add.as_str(), OpKind::Add, &[matmul.as_str(), bias.as_str()])?;
            graph.declare(relu.as_str(), OpKind::Relu, &[add.as_str()])?;
            hidden = relu;
        }
        graph.declare(OUTPUT, OpKind::SoftMax, &[hidden.as_str()])?;
        graph.declare("crossEnt", OpKind::CrossEnt, &[OUTPUT, LABELS])?;
        graph.declare(LOSS, OpKind::Mean, &["crossEnt"])?;

        let order = graph.linearize(LOSS)?;
        info!(
            "built graph with {} nodes, {} operations in evaluation order",
            graph.len(),
            order.len()
        );
        Ok(Mlp {
            layer_sizes: layer_sizes.to_vec(),
            graph,
            order,
            params,
        })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn num_layers(&self) -> usize {
        self.layer_sizes.len() - 1
    }

    /// Copies the parameter entries of `env` into the model's own parameter
    /// values. Entries for other nodes are ignored.
    pub fn store_params(&mut self, env: &ValueEnv) -> Result<(), CharNetError> {
        for node in self.graph.params() {
            let value = env.get(&node.name).ok_or_else(|| CharNetError::MissingValue {
                name: node.name.clone(),
            })?;
            self.params.insert(node.name.clone(), value.clone());
        }
        Ok(())
    }

    /// The input entries for one batch: `X` of shape `(batch, in)` and `y` of
    /// shape `(batch, out)`.
    pub fn data_dict(&self, features: Tensor, labels: Tensor) -> ValueEnv {
        let mut env = ValueEnv::new();
        env.insert(FEATURES.to_string(), features);
        env.insert(LABELS.to_string(), labels);
        env
    }
}

impl Network for Mlp {
    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn order(&self) -> &[String] {
        &self.order
    }

    fn param_values(&self) -> &ValueEnv {
        &self.params
    }
}

#[cfg(test)]
#[path = "mlp_test.rs"]
mod tests;
