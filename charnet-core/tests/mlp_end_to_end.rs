mod common;

use approx::assert_abs_diff_eq;
use charnet_core::autograd::{grad_check, grad_check_with};
use charnet_core::metrics::accuracy;
use charnet_core::nn::mlp::{FEATURES, LABELS, LOSS, OUTPUT};
use charnet_core::{Mlp, Network};
use common::{create_test_tensor, init_logger};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn single_layer_scenario() {
    init_logger();
    let mlp = Mlp::new(&[3, 2], &mut StdRng::seed_from_u64(0)).unwrap();
    let mut env = mlp.input_dict();
    env.extend(mlp.data_dict(
        create_test_tensor(vec![0.1, 0.2, 0.3], vec![1, 3]),
        create_test_tensor(vec![1.0, 0.0], vec![1, 2]),
    ));
    let values = mlp.fwd(&env).unwrap();

    let loss = values[LOSS].item().unwrap();
    assert!(loss.is_finite());
    assert!(loss >= 0.0);
    assert_eq!(values[OUTPUT].shape(), &[1, 2]);
    assert_abs_diff_eq!(values[OUTPUT].sum(), 1.0, epsilon = 1e-6);

    assert!(grad_check(&mlp).is_ok());
}

#[test]
fn deeper_networks_pass_grad_check() {
    init_logger();
    for (seed, sizes) in [(1, vec![8, 6, 4]), (2, vec![5, 7, 6, 3]), (3, vec![12, 4])] {
        let mlp = Mlp::new(&sizes, &mut StdRng::seed_from_u64(seed)).unwrap();
        let result = grad_check_with(&mlp, 1e-4, 1e-3);
        assert!(result.is_ok(), "grad check failed for {:?}: {:?}", sizes, result);
    }
}

#[test]
fn sgd_reduces_loss_on_fixed_batch() {
    init_logger();
    let mut mlp = Mlp::new(&[4, 8, 2], &mut StdRng::seed_from_u64(7)).unwrap();
    let features = create_test_tensor(
        vec![
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
        vec![4, 4],
    );
    let labels = create_test_tensor(vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0], vec![4, 2]);

    let mut env = mlp.input_dict();
    env.extend(mlp.data_dict(features, labels.clone()));
    let initial = mlp.fwd(&env).unwrap()[LOSS].item().unwrap();

    for _ in 0..100 {
        let values = mlp.fwd(&env).unwrap();
        let grads = mlp.bwd(&values).unwrap();
        env = mlp.update(&env, &grads, 0.1).unwrap();
    }
    mlp.store_params(&env).unwrap();

    let trained = mlp.fwd(&env).unwrap()[LOSS].item().unwrap();
    assert!(trained < initial, "loss went from {} to {}", initial, trained);

    // Stored parameters now drive the default environment.
    let mut fresh = mlp.input_dict();
    assert_eq!(fresh["W1"], env["W1"]);
    fresh.insert(FEATURES.to_string(), env[FEATURES].clone());
    fresh.insert(LABELS.to_string(), labels.clone());
    let probs = &mlp.fwd(&fresh).unwrap()[OUTPUT];
    let acc = accuracy(probs, &labels).unwrap();
    assert!((0.0..=1.0).contains(&acc));
}
