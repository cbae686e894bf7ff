//! Anomaly scores derived from SDAR updates.
//!
//! Two scorings are supported:
//!
//! - **Log-loss**: negative log-likelihood of the observation under the
//!   updated model
//! - **Hellinger**: distance between the Gaussian models before and after the
//!   update, scaled by [`HELLINGER_SCALE`]

use crate::error::Result;
use crate::sdar::{Sdar, SdarState};

/// Multiplier applied to Hellinger distances before they are reported.
pub const HELLINGER_SCALE: f64 = 100.0;

/// How an SDAR update is turned into an anomaly score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreMethod {
    /// Negative log of the predictive density.
    #[default]
    LogLoss,
    /// Scaled Hellinger distance between consecutive models.
    Hellinger,
}

impl ScoreMethod {
    /// Update `model` with `x` and score the update.
    pub fn score(&self, model: &mut Sdar, x: f64, regressors: &[f64]) -> Result<f64> {
        match self {
            ScoreMethod::LogLoss => {
                let p = model.update(x, regressors)?;
                Ok(log_loss(p))
            }
            ScoreMethod::Hellinger => {
                let before = model.state();
                model.update(x, regressors)?;
                let after = model.state();
                Ok(HELLINGER_SCALE * hellinger_distance(&before, &after))
            }
        }
    }

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            ScoreMethod::LogLoss => "logloss",
            ScoreMethod::Hellinger => "hellinger",
        }
    }
}

/// Negative log-likelihood of a density value, `0` for a zero density.
pub fn log_loss(p: f64) -> f64 {
    if p == 0.0 {
        return 0.0;
    }
    -p.ln()
}

/// Hellinger distance between two models, in `[0, 1]`.
///
/// The variance of each model is the 1x1 covariance of the AR predictive
/// distribution. Returns `1` when both variances are zero.
///
/// Only variance ratios enter the computation, so the distance is unchanged
/// when the series is rescaled and stays finite for any finite variances.
pub fn hellinger_distance(p: &SdarState, q: &SdarState) -> f64 {
    let s1 = p.variance.max(0.0);
    let s2 = q.variance.max(0.0);
    // Halved before adding so the average cannot overflow
    let half_sum = s1 / 2.0 + s2 / 2.0;
    if half_sum <= 0.0 {
        return 1.0;
    }

    // (s1 s2)^(1/4) / sqrt((s1 + s2) / 2)
    let spread = ((s1 / half_sum).sqrt() * (s2 / half_sum).sqrt()).sqrt();
    // (m1 - m2)^2 / (4 (s1 + s2)) == z^2 / 8
    let z = (p.mean - q.mean) / half_sum.sqrt();
    let affinity = spread * (-0.125 * z * z).exp();
    debug_assert!(affinity.is_finite(), "non-finite Hellinger affinity");

    // Rounding can push the affinity a hair above 1
    (1.0 - affinity).max(0.0)
}
