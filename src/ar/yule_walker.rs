//! Yule-Walker estimation via the Levinson-Durbin recursion.

use tracing::trace;

/// Lag-0 autocovariance below which no model is fitted.
const MIN_LAG0: f64 = 1e-300;

/// Prediction error power, relative to lag 0, below which the recursion stops.
const MIN_RELATIVE_ERROR: f64 = 1e-12;

/// Solve the Yule-Walker equations by Levinson-Durbin recursion.
///
/// # Arguments
/// * `autocovariances` - Lag-0..lag-k autocovariances (`k + 1` values)
/// * `order` - AR order `k`
///
/// # Returns
/// `order` prediction error filter coefficients `a[1..=k]`, so that
/// `e_t = x_t + Σ a_j · x_{t-j}` (the filter's leading 1 is omitted).
/// Missing lags are treated as zero.
///
/// Discounted autocovariances are not guaranteed to be positive definite.
/// When the lag-0 term is not positive, or the prediction error power
/// collapses, the recursion ends early and the coefficients found so far are
/// returned with the remaining ones left at zero.
pub fn yule_walker_solve(autocovariances: &[f64], order: usize) -> Vec<f64> {
    let c = |lag: usize| autocovariances.get(lag).copied().unwrap_or(0.0);

    let mut phi = vec![0.0; order];
    let c0 = c(0);

    if c0.is_nan() || c0 <= MIN_LAG0 {
        trace!(c0, "lag-0 autocovariance not positive, returning zero coefficients");
        return phi;
    }

    let floor = c0 * MIN_RELATIVE_ERROR;
    let mut error = c0;
    let mut prev = vec![0.0; order];
    for m in 1..=order {
        let mut acc = c(m);
        for j in 1..m {
            acc -= phi[j - 1] * c(m - j);
        }

        let kappa = acc / error;

        prev[..m].copy_from_slice(&phi[..m]);
        phi[m - 1] = kappa;
        for j in 1..m {
            phi[j - 1] = prev[j - 1] - kappa * prev[m - j - 1];
        }

        error *= 1.0 - kappa * kappa;
        if (error.is_nan() || error <= floor) && m < order {
            trace!(stage = m, error, "prediction error power exhausted, stopping recursion");
            break;
        }
    }

    phi.iter().map(|p| -p).collect()
}
