use crate::autograd::graph::{GradMap, Graph, ValueEnv};
use crate::error::CharNetError;
use crate::tensor::zeros;

/// A model expressed as a computation graph with a scalar loss terminal.
///
/// Implementors only describe their graph, its cached evaluation order and the
/// current parameter values. The fwd/bwd/update protocol is shared and works
/// for any depth or width.
pub trait Network {
    /// The graph structure. Built once, never changed afterwards.
    fn graph(&self) -> &Graph;

    /// Evaluation order ending at the loss node.
    fn order(&self) -> &[String];

    /// Current value of every parameter, keyed by node name.
    fn param_values(&self) -> &ValueEnv;

    /// A value environment holding every input's placeholder and every
    /// parameter's current value. Callers overwrite the inputs with batch data.
    fn input_dict(&self) -> ValueEnv {
        let mut env = self.graph().input_dict();
        for (name, value) in self.param_values() {
            env.insert(name.clone(), value.clone());
        }
        env
    }

    /// Full forward evaluation, returning every intermediate value.
    fn fwd(&self, env: &ValueEnv) -> Result<ValueEnv, CharNetError> {
        self.graph().forward(env, self.order())
    }

    /// Gradient of the loss with respect to every parameter.
    ///
    /// `env` must come from [`fwd`](Self::fwd). A parameter the loss does not
    /// depend on gets a zero gradient.
    fn bwd(&self, env: &ValueEnv) -> Result<GradMap, CharNetError> {
        let mut grads = self.graph().backward(env, self.order())?;
        let mut param_grads = GradMap::new();
        for node in self.graph().params() {
            let grad = match grads.remove(&node.name) {
                Some(g) => g,
                None => {
                    let value = env.get(&node.name).ok_or_else(|| CharNetError::MissingValue {
                        name: node.name.clone(),
                    })?;
                    zeros(value.shape())
                }
            };
            param_grads.insert(node.name.clone(), grad);
        }
        Ok(param_grads)
    }

    /// One SGD step: `param - learning_rate * grad` for every parameter with a
    /// gradient entry. Inputs and everything else pass through unchanged.
    fn update(
        &self,
        env: &ValueEnv,
        grads: &GradMap,
        learning_rate: f64,
    ) -> Result<ValueEnv, CharNetError> {
        let mut next = env.clone();
        for node in self.graph().params() {
            let grad = match grads.get(&node.name) {
                Some(g) => g,
                None => continue,
            };
            let value = env.get(&node.name).ok_or_else(|| CharNetError::MissingValue {
                name: node.name.clone(),
            })?;
            let stepped = value.zip_map(grad, "update", |v, g| v - learning_rate * g)?;
            next.insert(node.name.clone(), stepped);
        }
        Ok(next)
    }
}
