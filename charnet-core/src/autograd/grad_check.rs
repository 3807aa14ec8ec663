use crate::autograd::graph::{Graph, ValueEnv};
use crate::error::CharNetError;
use crate::nn::Network;
use crate::ops::OpKind;
use crate::tensor::Tensor;
use log::debug;

/// Default finite-difference step.
pub const EPS: f64 = 1e-4;
/// Default absolute tolerance between analytical and numerical gradients.
pub const TOLERANCE: f64 = 1e-3;

/// Relative tolerance folded into the comparison, as `numpy.isclose` does.
const REL_TOLERANCE: f64 = 1e-5;

fn is_close(analytical: f64, numerical: f64, atol: f64) -> bool {
    analytical.is_finite()
        && numerical.is_finite()
        && approx::relative_eq!(
            analytical,
            numerical,
            epsilon = atol,
            max_relative = REL_TOLERANCE
        )
}

/// Checks every parameter of `network` with the default step and tolerance.
pub fn grad_check<N: Network + ?Sized>(network: &N) -> Result<(), CharNetError> {
    grad_check_with(network, EPS, TOLERANCE)
}

/// Compares the analytical gradient of the terminal loss with a centred
/// finite difference, for the first element of every parameter.
///
/// Parameters are visited in declaration order and the values come from
/// [`Network::input_dict`].
///
/// # Errors
/// `GradientMismatch` naming the first parameter whose estimates disagree by
/// more than `atol`. Engine errors are passed through.
pub fn grad_check_with<N: Network + ?Sized>(
    network: &N,
    eps: f64,
    atol: f64,
) -> Result<(), CharNetError> {
    let terminal = network
        .order()
        .last()
        .ok_or(CharNetError::EmptyGraph)?
        .clone();
    let mut env = network.input_dict();
    let values = network.fwd(&env)?;
    let grads = network.bwd(&values)?;

    let loss_at = |env: &ValueEnv| -> Result<f64, CharNetError> {
        let values = network.fwd(env)?;
        values
            .get(&terminal)
            .ok_or_else(|| CharNetError::MissingValue {
                name: terminal.clone(),
            })?
            .item()
    };

    for node in network.graph().params() {
        let name = &node.name;
        let original = match env.get(name).and_then(|v| v.data().first().copied()) {
            Some(v) => v,
            None => continue,
        };
        let plus = perturb(&mut env, name, 0, original + eps, &loss_at)?;
        let minus = perturb(&mut env, name, 0, original - eps, &loss_at)?;
        let numerical = (plus - minus) / (2.0 * eps);
        let analytical = grads
            .get(name)
            .and_then(|g| g.data().first().copied())
            .unwrap_or(0.0);
        debug!(
            "grad check {}: analytical {:.6} numerical {:.6}",
            name, analytical, numerical
        );
        if !is_close(analytical, numerical, atol) {
            return Err(CharNetError::GradientMismatch {
                name: name.clone(),
                analytical,
                numerical,
            });
        }
    }
    Ok(())
}

/// Sets element `index` of `env[name]` to `value`, evaluates `f`, then restores it.
fn perturb<F>(
    env: &mut ValueEnv,
    name: &str,
    index: usize,
    value: f64,
    f: &F,
) -> Result<f64, CharNetError>
where
    F: Fn(&ValueEnv) -> Result<f64, CharNetError>,
{
    let slot = env
        .get_mut(name)
        .ok_or_else(|| CharNetError::MissingValue {
            name: name.to_string(),
        })?;
    let original = slot.data()[index];
    slot.data_mut()[index] = value;
    let result = f(env);
    if let Some(slot) = env.get_mut(name) {
        slot.data_mut()[index] = original;
    }
    result
}

/// Checks the backward rule of a single operator against finite differences.
///
/// The operator is wrapped in a one-node graph over parameters `x0, x1, ...`
/// and the scalar `sum(op(operands) * output_grad)` is differentiated, so every
/// element of every operand is compared.
pub fn check_op_grad(
    op: OpKind,
    operands: &[Tensor],
    output_grad: &Tensor,
    eps: f64,
    atol: f64,
) -> Result<(), CharNetError> {
    let mut graph = Graph::new();
    let names: Vec<String> = (0..operands.len()).map(|i| format!("x{}", i)).collect();
    for (name, value) in names.iter().zip(operands) {
        graph.param(name.as_str(), value.clone())?;
    }
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    graph.declare("out", op, &refs)?;
    let order = graph.linearize("out")?;

    let mut env = graph.input_dict();
    let values = graph.forward(&env, &order)?;
    let grads = graph.backward_with_seed(&values, &order, output_grad.clone())?;

    let weighted_sum = |env: &ValueEnv| -> Result<f64, CharNetError> {
        let values = graph.forward(env, &order)?;
        let out = values.get("out").ok_or_else(|| CharNetError::MissingValue {
            name: "out".to_string(),
        })?;
        Ok(out
            .zip_map(output_grad, "check_op_grad", |o, g| o * g)?
            .sum())
    };

    for name in &names {
        let numel = env.get(name).map_or(0, Tensor::numel);
        for i in 0..numel {
            let original = env[name].data()[i];
            let plus = perturb(&mut env, name, i, original + eps, &weighted_sum)?;
            let minus = perturb(&mut env, name, i, original - eps, &weighted_sum)?;
            let numerical = (plus - minus) / (2.0 * eps);
            let analytical = grads.get(name).map_or(0.0, |g| g.data()[i]);
            if !is_close(analytical, numerical, atol) {
                return Err(CharNetError::GradientMismatch {
                    name: format!("{}({})[{}]", op, name, i),
                    analytical,
                    numerical,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
