//! Runs a badly conditioned solve on the blocking pool and stops it from a
//! timer task by closing a oneshot channel.

use conjgrad::{ConjugateGradient, FnOperator};
use futures::channel::oneshot;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n = 20_000;
    // diag(n + i^2) plus a rank-one coupling term.
    let operator = FnOperator::new(n, move |v: &[f64]| -> Vec<f64> {
        let sum: f64 = v.iter().sum();
        v.iter()
            .enumerate()
            .map(|(i, x)| (n + i * i) as f64 * x + sum)
            .collect()
    });
    let b: Vec<f64> = (0..n).map(|i| ((i % 7) as f64) - 3.0).collect();
    log::info!("Solving a {}-dimensional implicit system", n);

    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

    let solver = tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let result = ConjugateGradient::new().solve_stoppable(&operator, &b, cancel_rx);
        (result, started.elapsed())
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    log::info!("Deadline reached, cancelling solve");
    drop(cancel_tx);

    match solver.await {
        Ok((Ok(result), elapsed)) => {
            log::info!("Solve stopped: {:?}", result.metadata.termination);
            log::info!("  Iterations: {}", result.metadata.iterations);
            log::info!("  Residual max: {:.6e}", result.metadata.residual_max);
            log::info!("  Time elapsed: {:?}", elapsed);
        }
        Ok((Err(e), _)) => log::error!("Solver rejected its inputs: {:?}", e),
        Err(e) => log::error!("Solver task panicked: {:?}", e),
    }
}
