use conjgrad::{
    solve, solve_prec, solve_stoppable, CancelToken, ConjugateGradient, DenseMatrix, FnOperator,
    LinearOperator, SolveAlgorithm, SparseMatrix, Termination, Triplete,
};
use futures::channel::oneshot;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

// Helper for float comparison in tests
fn assert_approx_eq_vec(a: &[f64], b: &[f64], tolerance: f64) {
    assert_eq!(a.len(), b.len(), "Vector lengths differ");
    for i in 0..a.len() {
        let diff = (a[i] - b[i]).abs();
        assert!(
            diff <= tolerance,
            "Verification failed at index {}: expected {}, got {}, diff {}",
            i,
            b[i],
            a[i],
            diff
        );
    }
}

/// max |t·x - b|
fn true_residual<O: LinearOperator<f64>>(t: &O, x: &[f64], b: &[f64]) -> f64 {
    t.apply(x)
        .iter()
        .zip(b)
        .map(|(tx, bi)| (tx - bi).abs())
        .fold(0.0, f64::max)
}

/// `M^T M + n I` for a random M, which is symmetric positive-definite.
fn random_spd(n: usize, seed: u64) -> DenseMatrix {
    let mut rng = fastrand::Rng::with_seed(seed);
    let m: Vec<f64> = (0..n * n).map(|_| rng.f64() * 2.0 - 1.0).collect();
    let mut a = DenseMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let mut sum: f64 = (0..n).map(|k| m[k * n + i] * m[k * n + j]).sum();
            if i == j {
                sum += n as f64;
            }
            *a.get_mut(i, j).unwrap() = sum;
        }
    }
    a
}

fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..n).map(|_| rng.f64() * 10.0 - 5.0).collect()
}

/// Reference solve through a Cholesky factorization.
fn cholesky_solve(a: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
            if i == j {
                l[i][j] = (a[i][i] - sum).sqrt();
            } else {
                l[i][j] = (a[i][j] - sum) / l[j][j];
            }
        }
    }
    let mut y = vec![0.0; n];
    for i in 0..n {
        let sum: f64 = (0..i).map(|k| l[i][k] * y[k]).sum();
        y[i] = (b[i] - sum) / l[i][i];
    }
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|k| l[k][i] * x[k]).sum();
        x[i] = (y[i] - sum) / l[i][i];
    }
    x
}

fn pentadiagonal(n: usize) -> SparseMatrix {
    let mut triplets = Vec::new();
    for i in 0..n {
        if i >= 2 {
            triplets.push(Triplete::new(i, i - 2, -0.5));
        }
        if i >= 1 {
            triplets.push(Triplete::new(i, i - 1, -1.0));
        }
        triplets.push(Triplete::new(i, i, 4.0));
        if i + 1 < n {
            triplets.push(Triplete::new(i, i + 1, -1.0));
        }
        if i + 2 < n {
            triplets.push(Triplete::new(i, i + 2, -0.5));
        }
    }
    SparseMatrix::from_triplets(n, n, triplets).unwrap()
}

#[test]
fn test_identity_solves_in_one_iteration() {
    let t = DenseMatrix::identity(2);
    let b = [3.0, 4.0];
    assert_approx_eq_vec(&solve(&t, &b), &b, 1e-12);

    let result = ConjugateGradient::new().solve(&t, &b).unwrap();
    assert_eq!(result.metadata.iterations, 1);
    assert_eq!(result.metadata.termination, Termination::Converged);
}

#[test]
fn test_diagonal_system() {
    let t = DenseMatrix::from_diagonal(&[2.0, 4.0]);
    let x = solve(&t, &[4.0, 8.0]);
    assert_approx_eq_vec(&x, &[2.0, 2.0], 1e-10);
}

#[test]
fn test_diagonal_system_reports_convergence() {
    // Converges on the second and last allowed iteration.
    let t = DenseMatrix::from_diagonal(&[2.0, 4.0]);
    let result = ConjugateGradient::with_params(1e-12, 20)
        .solve(&t, &[4.0, 8.0])
        .unwrap();
    assert_approx_eq_vec(&result.x, &[2.0, 2.0], 1e-10);
    assert!(result.metadata.iterations <= 2);
    assert!(result.metadata.residual_max <= 1e-12);
    assert_eq!(result.metadata.termination, Termination::Converged);
}

#[test]
fn test_three_by_three_matches_cholesky() {
    let rows = vec![
        vec![4.0, 1.0, 0.0],
        vec![1.0, 3.0, 1.0],
        vec![0.0, 1.0, 2.0],
    ];
    let b = [1.0, 2.0, 3.0];
    let t = DenseMatrix::from_rows(&rows).unwrap();

    let x = solve(&t, &b);
    let reference = cholesky_solve(&rows, &b);
    assert_approx_eq_vec(&x, &reference, 1e-9);
    assert_approx_eq_vec(&x, &[2.0 / 9.0, 1.0 / 9.0, 13.0 / 9.0], 1e-9);
}

#[test]
fn test_sparse_conjugate_gradient() {
    let a = SparseMatrix::from_dense(&[
        vec![4.0, -1.0, 0.0],
        vec![-1.0, 4.0, -1.0],
        vec![0.0, -1.0, 4.0],
    ])
    .unwrap();
    let b = [1.0, 2.0, 3.0];

    let x_result = ConjugateGradient::new().solve(&a, &b).unwrap();

    let expected_x = vec![0.464, 0.857, 0.964];
    assert_approx_eq_vec(&x_result.x, &expected_x, 1e-3);
    assert!(x_result.metadata.iterations <= 3);
}

#[test]
fn test_zero_rhs_returns_zero() {
    let t = random_spd(8, 1);
    let result = ConjugateGradient::new().solve(&t, &[0.0; 8]).unwrap();
    assert_eq!(result.x, vec![0.0; 8]);
    assert_eq!(result.metadata.iterations, 0);
    assert_eq!(solve(&t, &[0.0; 8]), vec![0.0; 8]);
}

#[test]
fn test_random_spd_converges() {
    let n = 30;
    let t = random_spd(n, 7);
    let b = random_vector(n, 8);

    let x = solve(&t, &b);
    assert!(true_residual(&t, &x, &b) <= 1e-8);
}

#[test]
fn test_precision_contract() {
    let n = 40;
    let t = random_spd(n, 11);
    let b = random_vector(n, 12);

    // Already within precision: nothing to do.
    assert_eq!(solve_prec(&t, &b, 1e6), vec![0.0; n]);

    let precision = 1e-6;
    let result = ConjugateGradient::with_params(precision, 20)
        .solve(&t, &b)
        .unwrap();
    assert_eq!(result.metadata.termination, Termination::Converged);
    assert!(result.metadata.iterations >= 1);
    assert!(result.metadata.residual_max <= precision);
    assert!(true_residual(&t, &result.x, &b) <= precision + 1e-9);
    assert_eq!(solve_prec(&t, &b, precision), result.x);
}

#[test]
fn test_drift_correction_does_not_change_answer() {
    let n = 50;
    let t = random_spd(n, 21);
    let b = random_vector(n, 22);

    let every_step = ConjugateGradient::with_params(0.0, 1).solve(&t, &b).unwrap();
    let never = ConjugateGradient::with_params(0.0, usize::MAX)
        .solve(&t, &b)
        .unwrap();

    assert_approx_eq_vec(&every_step.x, &never.x, 1e-8);
    assert!(true_residual(&t, &every_step.x, &b) <= 1e-8);
    assert!(true_residual(&t, &never.x, &b) <= 1e-8);
}

#[test]
fn test_sparse_pentadiagonal_system() {
    let n = 200;
    let a = pentadiagonal(n);
    let b: Vec<f64> = (0..n).map(|i| (i as f64 / n as f64).sin()).collect();

    let x = solve(&a, &b);
    assert!(true_residual(&a, &x, &b) <= 1e-8);
}

#[test]
fn test_implicit_stencil_operator() {
    let n = 50;
    // Shifted 1D Laplacian, applied without ever storing a matrix.
    let stencil = FnOperator::new(n, |v: &[f64]| -> Vec<f64> {
        (0..v.len())
            .map(|i| {
                let left = if i > 0 { v[i - 1] } else { 0.0 };
                let right = v.get(i + 1).copied().unwrap_or(0.0);
                3.0 * v[i] - left - right
            })
            .collect()
    });
    let b = random_vector(n, 5);

    let x = solve(&stencil, &b);
    assert!(true_residual(&stencil, &x, &b) <= 1e-8);
}

#[test]
fn test_single_precision() {
    let t = DenseMatrix::from_diagonal(&[2.0f32, 4.0, 8.0]);
    let x = solve(&t, &[2.0f32, 4.0, 8.0]);
    for xi in x {
        assert!((xi - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_cancel_before_first_iteration_completes() {
    let t = DenseMatrix::from_diagonal(&[1.0, 2.0, 3.0, 4.0]);
    let b = [1.0, 1.0, 1.0, 1.0];
    let token = CancelToken::new();
    token.cancel();

    let x = solve_stoppable(&t, &b, 0.0, token.clone());
    // One exact line search along b: alpha = b·b / b·Tb.
    let alpha = 4.0 / 10.0;
    assert_approx_eq_vec(&x, &[alpha; 4], 1e-15);

    let result = ConjugateGradient::new()
        .solve_stoppable(&t, &b, token)
        .unwrap();
    assert_eq!(result.metadata.iterations, 1);
    assert_eq!(result.metadata.termination, Termination::Cancelled);
}

#[test]
fn test_cancel_when_operator_triggers_token() {
    let n = 50;
    let diag = DenseMatrix::from_diagonal(&(1..=n).map(|i| i as f64).collect::<Vec<_>>());
    let token = CancelToken::new();
    let applications = AtomicUsize::new(0);
    let t = FnOperator::new(n, |v: &[f64]| -> Vec<f64> {
        if applications.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
            token.cancel();
        }
        diag.apply(v)
    });

    let result = ConjugateGradient::new()
        .solve_stoppable(&t, &vec![1.0; n], token.clone())
        .unwrap();
    assert_eq!(result.metadata.iterations, 3);
    assert_eq!(result.metadata.termination, Termination::Cancelled);
}

#[test]
fn test_cancel_from_another_thread() {
    let n = 64;
    let barrier = Arc::new(Barrier::new(2));
    let token = CancelToken::new();

    let solver = {
        let barrier = Arc::clone(&barrier);
        let token = token.clone();
        thread::spawn(move || {
            let diag = DenseMatrix::from_diagonal(&(1..=n).map(|i| i as f64).collect::<Vec<_>>());
            let first_call = AtomicUsize::new(0);
            let t = FnOperator::new(n, move |v: &[f64]| -> Vec<f64> {
                if first_call.fetch_add(1, Ordering::SeqCst) == 0 {
                    // Hold the first application until the other thread has cancelled.
                    barrier.wait();
                    barrier.wait();
                }
                diag.apply(v)
            });
            ConjugateGradient::new()
                .solve_stoppable(&t, &vec![1.0; n], token)
                .unwrap()
        })
    };

    barrier.wait();
    token.cancel();
    barrier.wait();

    let result = solver.join().unwrap();
    assert_eq!(result.metadata.iterations, 1);
    assert_eq!(result.metadata.termination, Termination::Cancelled);
    assert_eq!(result.x.len(), n);
}

#[test]
fn test_closed_channel_cancels() {
    let t = DenseMatrix::from_diagonal(&[1.0, 2.0, 3.0]);
    let (tx, rx) = oneshot::channel::<()>();
    drop(tx);

    let result = ConjugateGradient::new()
        .solve_stoppable(&t, &[1.0, 1.0, 1.0], rx)
        .unwrap();
    assert_eq!(result.metadata.termination, Termination::Cancelled);
    assert_eq!(result.metadata.iterations, 1);
}

#[test]
fn test_open_channel_does_not_cancel() {
    let t = DenseMatrix::from_diagonal(&[1.0, 2.0, 3.0]);
    let (_tx, mut rx) = oneshot::channel::<()>();

    let x = solve_stoppable(&t, &[1.0, 2.0, 3.0], 0.0, &mut rx);
    assert_approx_eq_vec(&x, &[1.0, 1.0, 1.0], 1e-12);
}

#[test]
fn test_config_from_json() {
    let config: ConjugateGradient = serde_json::from_str(r#"{ "precision": 0.25 }"#).unwrap();
    assert_eq!(config, ConjugateGradient::with_params(0.25, 20));

    let t = DenseMatrix::identity(2);
    let result = config.solve(&t, &[3.0, 4.0]).unwrap();
    let metadata = serde_json::to_value(result.metadata).unwrap();
    assert_eq!(metadata["termination"], "Converged");
    assert_eq!(metadata["iterations"], 1);
}
