use conjgrad_core::{error::Result, vector, CancelSignal, LinearOperator, NeverCancel};
use log::{debug, trace, warn};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::{ConjugateGradient, SolveAlgorithm, SolveResult};

/// Why a solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The largest residual entry dropped to the requested precision.
    Converged,
    /// The search direction came out exactly zero.
    DegenerateDirection,
    /// The cancellation signal fired at an iteration boundary.
    Cancelled,
    /// As many iterations as the operator has dimensions.
    IterationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConjugateGradientMetadata<T = f64> {
    /// Completed iterations.
    pub iterations: usize,
    /// Largest absolute entry of the maintained residual when the solve stopped.
    pub residual_max: T,
    pub termination: Termination,
}

impl<T, O> SolveAlgorithm<T, O> for ConjugateGradient<T>
where
    T: Float + Debug,
    O: LinearOperator<T> + ?Sized,
{
    type Metadata = ConjugateGradientMetadata<T>;

    fn solve(&self, a: &O, b: &[T]) -> Result<SolveResult<T, Self::Metadata>> {
        self.solve_stoppable(a, b, NeverCancel)
    }
}

impl<T: Float + Debug> ConjugateGradient<T> {
    /// Like [`SolveAlgorithm::solve`], polling `cancel` after every iteration.
    /// A cancelled solve still returns `Ok` with the partial solution.
    pub fn solve_stoppable<O, C>(
        &self,
        a: &O,
        b: &[T],
        cancel: C,
    ) -> Result<SolveResult<T, ConjugateGradientMetadata<T>>>
    where
        O: LinearOperator<T> + ?Sized,
        C: CancelSignal,
    {
        self.validate_params()?;
        <Self as SolveAlgorithm<T, O>>::validate_inputs(self, a, b)?;

        Ok(solve_cg(
            a,
            b,
            self.precision,
            self.residual_update_frequency,
            cancel,
        ))
    }
}

/// Iteration `i` recomputes the residual directly when it is a positive
/// multiple of `frequency`.
fn recompute_residual(i: usize, frequency: usize) -> bool {
    i != 0 && i.checked_rem(frequency) == Some(0)
}

fn as_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

// --- Main Solver Logic ---

/// Runs at most `t.dim()` conjugate gradient iterations starting from `x = 0`.
///
/// Performs no validation. A zero `p·Tp` denominator is not guarded against:
/// the resulting infinities/NaNs flow into the solution.
pub(crate) fn solve_cg<T, O, C>(
    t: &O,
    b: &[T],
    precision: T,
    residual_update_frequency: usize,
    mut cancel: C,
) -> SolveResult<T, ConjugateGradientMetadata<T>>
where
    T: Float,
    O: LinearOperator<T> + ?Sized,
    C: CancelSignal,
{
    let n = t.dim();
    debug!(
        "CG solve started: dimension {}, precision {:e}",
        n,
        as_f64(precision)
    );

    let mut residual = b.to_vec();
    let mut solution = vector::zeros(n);
    let mut conj_vec: Vec<T> = Vec::new();
    let mut last_residual_dot = T::zero();

    let mut iterations = 0;
    let mut termination = Termination::IterationLimit;

    for i in 0..n {
        if vector::max_abs(&residual) <= precision {
            termination = Termination::Converged;
            break;
        }

        if i == 0 {
            conj_vec.clone_from(&residual);
            last_residual_dot = vector::dot(&conj_vec, &conj_vec);
        } else {
            // Fletcher-Reeves: p = r + (r·r / r_old·r_old) p
            let residual_dot = vector::dot(&residual, &residual);
            let beta = residual_dot / last_residual_dot;
            last_residual_dot = residual_dot;
            vector::scale(&mut conj_vec, beta);
            vector::add_assign(&mut conj_vec, &residual);
        }
        if vector::all_zero(&conj_vec) {
            termination = Termination::DegenerateDirection;
            break;
        }

        let t_conj = t.apply(&conj_vec);
        let optimal_distance = vector::dot(&conj_vec, &residual) / vector::dot(&conj_vec, &t_conj);
        if !optimal_distance.is_finite() {
            warn!(
                "CG iteration {}: non-finite step size {}; operator may not be positive-definite",
                i + 1,
                as_f64(optimal_distance)
            );
        }

        vector::axpy(optimal_distance, &conj_vec, &mut solution);
        if recompute_residual(i, residual_update_frequency) {
            // r = b - T·x
            residual = t.apply(&solution);
            vector::scale(&mut residual, -T::one());
            vector::add_assign(&mut residual, b);
        } else {
            vector::axpy(-optimal_distance, &t_conj, &mut residual);
        }
        iterations = i + 1;

        trace!(
            "CG iteration {}: step {:e}, max residual {:e}",
            iterations,
            as_f64(optimal_distance),
            as_f64(vector::max_abs(&residual))
        );

        if cancel.is_cancelled() {
            termination = Termination::Cancelled;
            break;
        }
    }

    let residual_max = vector::max_abs(&residual);
    // The last allowed step can reach the precision without another loop check.
    if termination == Termination::IterationLimit && residual_max <= precision {
        termination = Termination::Converged;
    }
    debug!(
        "CG solve finished after {} iterations ({:?}), max residual {:e}",
        iterations,
        termination,
        as_f64(residual_max)
    );

    SolveResult {
        x: solution,
        metadata: ConjugateGradientMetadata {
            iterations,
            residual_max,
            termination,
        },
    }
}
