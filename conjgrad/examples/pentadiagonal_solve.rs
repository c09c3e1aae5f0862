use conjgrad::{
    algorithms::{check_symmetry_and_positive_diagonal, SolveAlgorithm},
    ConjugateGradient, LinearOperator, SparseMatrix, Triplete,
};
use std::time::Instant;

/// Creates a pentadiagonal sparse matrix A of size n x n.
/// Diagonals:
/// - Main: 4.0
/// - Adjacent (+1, -1): -1.0
/// - Outer (+2, -2): -0.5
fn create_pentadiagonal_matrix(n: usize) -> SparseMatrix {
    let mut triplets = Vec::new();

    for i in 0..n {
        // Diagonal -2
        if i >= 2 {
            triplets.push(Triplete::new(i, i - 2, -0.5));
        }
        // Diagonal -1
        if i >= 1 {
            triplets.push(Triplete::new(i, i - 1, -1.0));
        }
        // Main Diagonal
        triplets.push(Triplete::new(i, i, 4.0));
        // Diagonal +1
        if i + 1 < n {
            triplets.push(Triplete::new(i, i + 1, -1.0));
        }
        // Diagonal +2
        if i + 2 < n {
            triplets.push(Triplete::new(i, i + 2, -0.5));
        }
    }

    SparseMatrix::from_triplets(n, n, triplets).expect("Failed to create sparse matrix from COO")
}

/// Creates a vector b of size n with b[i] = sin(i / n).
fn create_sin_vector(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 / n as f64).sin()).collect()
}

fn main() {
    // Initialize logging based on RUST_LOG environment variable
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n = 5000;
    log::info!(
        "Setting up {}x{} pentadiagonal matrix A and sin vector b...",
        n,
        n
    );

    let a = create_pentadiagonal_matrix(n);
    let b = create_sin_vector(n);

    check_symmetry_and_positive_diagonal(&a, 0.0).expect("Matrix is not a CG candidate");

    let precision = 1e-10;
    log::info!("Running Conjugate Gradient solver...");
    log::info!("  Size: {}", n);
    log::info!("  Non-zeros: {}", a.nnz());
    log::info!("  Precision: {}", precision);

    let algorithm = ConjugateGradient::with_params(precision, 20);

    let start_time = Instant::now();
    let x_result = algorithm.solve(&a, &b);
    let duration = start_time.elapsed();

    match x_result {
        Ok(result) => {
            let max_error = a
                .apply(&result.x)
                .iter()
                .zip(&b)
                .map(|(ax, bi)| (ax - bi).abs())
                .fold(0.0, f64::max);
            log::info!("Solver finished: {:?}", result.metadata.termination);
            log::info!("  Iterations: {}", result.metadata.iterations);
            log::info!(
                "  Tracked residual max: {:.6e}",
                result.metadata.residual_max
            );
            log::info!("  Recomputed max |Ax - b|: {:.6e}", max_error);
            log::info!("  Time elapsed: {:?}", duration);
            log::debug!("Solution vector x (first 10 elements): {:?}", &result.x[..10.min(n)]);
        }
        Err(e) => {
            log::error!("Solver failed: {:?}", e);
        }
    }
}
