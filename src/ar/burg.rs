//! Burg's method for AR coefficient estimation.
//!
//! Estimates reflection coefficients by minimizing the sum of forward and
//! backward prediction error energies, stage by stage, without forming
//! autocovariances.

use tracing::trace;

/// Estimate AR coefficients with Burg's method.
///
/// # Arguments
/// * `samples` - Observations ordered most-recent-first; the first
///   `order + 1` values are used
/// * `order` - AR order `k`
///
/// # Returns
/// `order` prediction error filter coefficients `a[1..=k]`, in the same
/// convention as [`yule_walker_solve`](super::yule_walker_solve). A stage with
/// zero error energy (or with no samples left) contributes a zero reflection
/// coefficient.
pub fn burg_solve(samples: &[f64], order: usize) -> Vec<f64> {
    // Chronological order, oldest first
    let x: Vec<f64> = samples.iter().take(order + 1).rev().copied().collect();
    let n = x.len();

    let mut forward = x.clone();
    let mut backward = x;

    // Prediction error filter, a[0] = 1
    let mut a = vec![0.0; order + 1];
    a[0] = 1.0;
    let mut prev = a.clone();

    for m in 1..=order {
        let mut num = 0.0;
        let mut den = 0.0;
        for i in m..n {
            num += forward[i] * backward[i - 1];
            den += forward[i] * forward[i] + backward[i - 1] * backward[i - 1];
        }

        let kappa = if den > 0.0 {
            -2.0 * num / den
        } else {
            trace!(stage = m, "zero error energy, reflection coefficient set to 0");
            0.0
        };

        prev.copy_from_slice(&a);
        for i in 1..m {
            a[i] = prev[i] + kappa * prev[m - i];
        }
        a[m] = kappa;

        // Descending so backward[i - 1] is read before it is overwritten
        for i in (m..n).rev() {
            let f = forward[i];
            let b = backward[i - 1];
            forward[i] = f + kappa * b;
            backward[i] = b + kappa * f;
        }
    }

    a.split_off(1)
}
