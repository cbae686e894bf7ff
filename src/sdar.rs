//! Sequentially Discounted AR (SDAR) estimation.
//!
//! An SDAR model keeps exponentially discounted estimates of the mean,
//! autocovariances and residual variance of a scalar AR(k) process. Every
//! update folds one observation into those estimates and scores the
//! observation against the refreshed model.
//!
//! # Example
//!
//! ```
//! use changefinder::ar::ArMethod;
//! use changefinder::sdar::Sdar;
//!
//! let mut model = Sdar::new(0.5, 1, ArMethod::YuleWalker).unwrap();
//! let p = model.update(1.0, &[0.0]).unwrap();
//! assert!(p >= 0.0);
//! assert!((model.mean() - 0.5).abs() < 1e-12);
//! ```

use statrs::distribution::{Continuous, Normal};
use tracing::{debug, warn};

use crate::ar::{burg_solve, yule_walker_solve, ArMethod};
use crate::error::{ChangeFinderError, Result};

/// Snapshot of the Gaussian predictive model: discounted mean and residual
/// variance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SdarState {
    /// Discounted mean.
    pub mean: f64,
    /// Discounted residual variance.
    pub variance: f64,
}

/// Online AR(k) model with exponential forgetting.
#[derive(Debug, Clone, PartialEq)]
pub struct Sdar {
    discount: f64,
    order: usize,
    method: ArMethod,
    mean: f64,
    variance: f64,
    /// Lag-0..lag-k discounted autocovariances (Yule-Walker only)
    autocovariances: Vec<f64>,
    coefficients: Vec<f64>,
    prediction: Option<f64>,
}

impl Sdar {
    /// Create a model with zero mean, variance and autocovariances.
    ///
    /// # Arguments
    /// * `discount` - Forgetting factor `r`, weight given to each new observation
    /// * `order` - AR order `k`, at least 1
    /// * `method` - How AR coefficients are estimated
    pub fn new(discount: f64, order: usize, method: ArMethod) -> Result<Self> {
        if order == 0 {
            return Err(ChangeFinderError::InvalidParameter(
                "AR order must be at least 1".to_string(),
            ));
        }

        debug!(discount, order, method = method.name(), "created SDAR model");

        Ok(Self {
            discount,
            order,
            method,
            mean: 0.0,
            variance: 0.0,
            autocovariances: vec![0.0; order + 1],
            coefficients: vec![0.0; order],
            prediction: None,
        })
    }

    /// Fold a new observation into the model and return its density.
    ///
    /// `regressors` are past observations, oldest first; the last `k` of them
    /// are the lags `x_{t-k}, ..., x_{t-1}`. The returned value is the normal
    /// density of `x` under the model *after* this update, or `0.0` when the
    /// residual variance is zero.
    ///
    /// The update is all-or-nothing: on error the model is left unchanged.
    pub fn update(&mut self, x: f64, regressors: &[f64]) -> Result<f64> {
        let k = self.order;
        if regressors.len() < k {
            return Err(ChangeFinderError::InsufficientData {
                needed: k,
                got: regressors.len(),
            });
        }
        if !x.is_finite() {
            return Err(ChangeFinderError::ComputationError(format!(
                "non-finite observation: {}",
                x
            )));
        }

        let r = self.discount;

        // lags[j - 1] holds x_{t-j}
        let lags: Vec<f64> = regressors.iter().rev().take(k).copied().collect();

        let mean = (1.0 - r) * self.mean + r * x;

        let (coefficients, autocovariances) = match self.method {
            ArMethod::YuleWalker => {
                let dev = x - mean;
                let mut c = self.autocovariances.clone();
                c[0] = (1.0 - r) * c[0] + r * dev * dev;
                for (cj, &lag) in c[1..].iter_mut().zip(&lags) {
                    *cj = (1.0 - r) * *cj + r * dev * (lag - mean);
                }
                (yule_walker_solve(&c, k), Some(c))
            }
            ArMethod::Burg => {
                let mut samples = Vec::with_capacity(k + 1);
                samples.push(x);
                samples.extend_from_slice(&lags);
                (burg_solve(&samples, k), None)
            }
        };

        let prediction = mean
            + coefficients
                .iter()
                .zip(&lags)
                .map(|(a, lag)| a * (lag - mean))
                .sum::<f64>();

        let residual = x - prediction;
        let variance = (1.0 - r) * self.variance + r * residual * residual;

        if coefficients.iter().any(|a| !a.is_finite())
            || !prediction.is_finite()
            || !variance.is_finite()
        {
            warn!(
                x,
                mean,
                prediction,
                variance,
                method = self.method.name(),
                "SDAR update produced non-finite model state"
            );
            return Err(ChangeFinderError::ComputationError(format!(
                "non-finite SDAR state (prediction {}, variance {})",
                prediction, variance
            )));
        }

        self.mean = mean;
        self.variance = variance;
        if let Some(c) = autocovariances {
            self.autocovariances = c;
        }
        self.coefficients = coefficients;
        self.prediction = Some(prediction);

        gaussian_density(x, prediction, variance)
    }

    /// Current mean and variance, copied out.
    pub fn state(&self) -> SdarState {
        SdarState {
            mean: self.mean,
            variance: self.variance,
        }
    }

    /// Discounted mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Discounted residual variance.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Lag-0..lag-k discounted autocovariances.
    ///
    /// Stays at zero when the model uses Burg's method.
    pub fn autocovariances(&self) -> &[f64] {
        &self.autocovariances
    }

    /// AR coefficients from the latest update.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// One-step prediction made during the latest update.
    pub fn prediction(&self) -> Option<f64> {
        self.prediction
    }

    /// Forgetting factor `r`.
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// AR order `k`.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Coefficient estimation method.
    pub fn method(&self) -> ArMethod {
        self.method
    }
}

/// Normal density with the given mean and variance; zero for a degenerate
/// (non-positive) variance.
pub(crate) fn gaussian_density(x: f64, mean: f64, variance: f64) -> Result<f64> {
    if variance <= 0.0 {
        return Ok(0.0);
    }
    let normal = Normal::new(mean, variance.sqrt())
        .map_err(|e| ChangeFinderError::ComputationError(e.to_string()))?;
    Ok(normal.pdf(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_zero_order() {
        let err = Sdar::new(0.5, 0, ArMethod::YuleWalker).unwrap_err();
        assert!(matches!(err, ChangeFinderError::InvalidParameter(_)));
    }

    #[test]
    fn starts_at_zero() {
        let model = Sdar::new(0.1, 3, ArMethod::YuleWalker).unwrap();
        assert_eq!(model.state(), SdarState::default());
        assert_eq!(model.autocovariances(), &[0.0; 4]);
        assert_eq!(model.coefficients(), &[0.0; 3]);
        assert_eq!(model.prediction(), None);
        assert_eq!(model.order(), 3);
        assert_relative_eq!(model.discount(), 0.1);
    }

    #[test]
    fn insufficient_regressors_leave_state_untouched() {
        let mut model = Sdar::new(0.5, 3, ArMethod::YuleWalker).unwrap();
        let err = model.update(1.0, &[0.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            ChangeFinderError::InsufficientData { needed: 3, got: 2 }
        );
        assert_eq!(model.state(), SdarState::default());
    }

    #[test]
    fn non_finite_observation_is_rejected() {
        let mut model = Sdar::new(0.5, 1, ArMethod::Burg).unwrap();
        assert!(matches!(
            model.update(f64::NAN, &[0.0]),
            Err(ChangeFinderError::ComputationError(_))
        ));
        assert!(matches!(
            model.update(f64::INFINITY, &[0.0]),
            Err(ChangeFinderError::ComputationError(_))
        ));
        assert_eq!(model.state(), SdarState::default());
    }

    #[test]
    fn first_yule_walker_update_by_hand() {
        // mu = 0.5 * 2 = 1, c0 = 0.5 * 1 = 0.5, c1 = 0.5 * 1 * (0 - 1) = -0.5
        // a = -c1 / c0 = 1, x_hat = 1 + 1 * (0 - 1) = 0, sigma = 0.5 * 2^2 = 2
        let mut model = Sdar::new(0.5, 1, ArMethod::YuleWalker).unwrap();
        let p = model.update(2.0, &[0.0]).unwrap();

        assert_relative_eq!(model.mean(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(model.autocovariances()[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(model.autocovariances()[1], -0.5, epsilon = 1e-12);
        assert_relative_eq!(model.coefficients()[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(model.prediction().unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(model.variance(), 2.0, epsilon = 1e-12);

        let expected = (-1.0f64).exp() / (2.0 * std::f64::consts::PI.sqrt());
        assert_relative_eq!(p, expected, max_relative = 1e-12);
    }

    #[test]
    fn density_is_evaluated_after_update() {
        let mut model = Sdar::new(0.5, 1, ArMethod::YuleWalker).unwrap();
        model.update(2.0, &[0.0]).unwrap();
        let p = model.update(1.0, &[2.0]).unwrap();

        let x_hat = model.prediction().unwrap();
        let sigma = model.variance();
        assert!(sigma > 0.0);
        let expected = (-(1.0 - x_hat).powi(2) / (2.0 * sigma)).exp()
            / (2.0 * std::f64::consts::PI * sigma).sqrt();
        assert_relative_eq!(p, expected, max_relative = 1e-12);
    }

    #[test]
    fn burg_leaves_autocovariances_untouched() {
        let mut model = Sdar::new(0.3, 2, ArMethod::Burg).unwrap();
        for (i, x) in [1.0, 3.0, 2.0, 5.0, 4.0].iter().enumerate() {
            let regressors = [i as f64, i as f64 + 1.0];
            model.update(*x, &regressors).unwrap();
        }
        assert!(model.autocovariances().iter().all(|&c| c == 0.0));
        assert!(model.variance() > 0.0);
    }

    #[test]
    fn uses_most_recent_regressors() {
        let mut long = Sdar::new(0.5, 1, ArMethod::YuleWalker).unwrap();
        let mut short = Sdar::new(0.5, 1, ArMethod::YuleWalker).unwrap();

        let p_long = long.update(3.0, &[100.0, -7.0, 2.0]).unwrap();
        let p_short = short.update(3.0, &[2.0]).unwrap();

        assert_eq!(long, short);
        assert_eq!(p_long, p_short);
    }

    #[test]
    fn constant_input_collapses_variance_to_zero() {
        let mut model = Sdar::new(0.5, 1, ArMethod::YuleWalker).unwrap();
        let mut prev = 0.0;
        let mut p = f64::NAN;
        for _ in 0..3000 {
            p = model.update(5.0, &[prev]).unwrap();
            prev = 5.0;
        }
        assert_eq!(model.mean(), 5.0);
        assert_eq!(model.variance(), 0.0);
        assert_eq!(p, 0.0);
    }

    #[test]
    fn mean_converges_to_constant() {
        for method in [ArMethod::YuleWalker, ArMethod::Burg] {
            let mut model = Sdar::new(0.1, 2, method).unwrap();
            let mut history = vec![0.0, 0.0];
            for _ in 0..500 {
                model.update(3.0, &history).unwrap();
                history.remove(0);
                history.push(3.0);
            }
            assert_relative_eq!(model.mean(), 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn gaussian_density_matches_closed_form() {
        let p = gaussian_density(1.5, 1.0, 4.0).unwrap();
        let expected = (-(0.5f64).powi(2) / 8.0).exp() / (2.0 * std::f64::consts::PI * 4.0).sqrt();
        assert_relative_eq!(p, expected, max_relative = 1e-12);
    }

    #[test]
    fn gaussian_density_degenerate_variance() {
        assert_eq!(gaussian_density(1.0, 1.0, 0.0).unwrap(), 0.0);
        assert_eq!(gaussian_density(1.0, 1.0, -1e-18).unwrap(), 0.0);
    }
}
