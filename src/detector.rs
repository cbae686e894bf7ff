//! Two-stage ChangeFinder detection.
//!
//! Stage 1 scores each raw point against an SDAR model of the series. The
//! outlier scores are smoothed with a moving average over `t1` points, and
//! stage 2 scores that smoothed stream against a second, slower SDAR model.
//! The change-point score is the moving average of stage-2 scores over `t2`
//! points.
//!
//! # Example
//!
//! ```
//! use changefinder::detector::{ChangeFinder, ChangeFinderConfig, StreamingDetector};
//!
//! let config = ChangeFinderConfig::new(0.5, 1, 3, 3);
//! let mut cf = ChangeFinder::new(config).unwrap();
//!
//! for x in [1.0, 1.0, 1.0, 1.0, 10.0, 1.0, 1.0, 1.0] {
//!     let d = cf.detect(x).unwrap();
//!     println!("outlier {:.3} change {:.3}", d.outlier.value, d.change.value);
//! }
//! assert_eq!(cf.n_observations(), 8);
//! ```

use tracing::{debug, trace};

use crate::ar::ArMethod;
use crate::error::{ChangeFinderError, Result};
use crate::score::ScoreMethod;
use crate::sdar::Sdar;
use crate::window::Window;

/// Common interface for detectors fed one observation at a time.
pub trait StreamingDetector {
    /// Result produced for every observation.
    type Output;

    /// Process the next observation, in time order.
    fn detect(&mut self, x: f64) -> Result<Self::Output>;

    /// Number of observations processed so far.
    fn n_observations(&self) -> usize;

    /// Detector name.
    fn name(&self) -> &str;

    /// Process a batch of observations in order.
    fn detect_all(&mut self, series: &[f64]) -> Result<Vec<Self::Output>> {
        series.iter().map(|&x| self.detect(x)).collect()
    }
}

/// Configuration for [`ChangeFinder`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeFinderConfig {
    /// Discount `r` of the outlier model; the change model uses `r / 2`
    pub r: f64,
    /// AR order `k`
    pub k: usize,
    /// Moving-average window for outlier scores
    pub t1: usize,
    /// Moving-average window for change scores
    pub t2: usize,
    /// AR coefficient estimation method
    pub ar_method: ArMethod,
    /// Score transform applied at both stages
    pub score_method: ScoreMethod,
    /// Outlier scores above this are flagged
    pub threshold_outlier: f64,
    /// Change scores above this are flagged
    pub threshold_change: f64,
}

impl Default for ChangeFinderConfig {
    fn default() -> Self {
        Self {
            r: 0.5,
            k: 1,
            t1: 7,
            t2: 7,
            ar_method: ArMethod::YuleWalker,
            score_method: ScoreMethod::LogLoss,
            threshold_outlier: 0.0,
            threshold_change: 0.0,
        }
    }
}

impl ChangeFinderConfig {
    /// Create a config with the given discount, order and window sizes.
    pub fn new(r: f64, k: usize, t1: usize, t2: usize) -> Self {
        Self {
            r,
            k,
            t1,
            t2,
            ..Default::default()
        }
    }

    /// Set the AR coefficient estimation method.
    pub fn ar_method(mut self, method: ArMethod) -> Self {
        self.ar_method = method;
        self
    }

    /// Set the score transform.
    pub fn score_method(mut self, method: ScoreMethod) -> Self {
        self.score_method = method;
        self
    }

    /// Set the outlier threshold.
    pub fn threshold_outlier(mut self, threshold: f64) -> Self {
        self.threshold_outlier = threshold;
        self
    }

    /// Set the change-point threshold.
    pub fn threshold_change(mut self, threshold: f64) -> Self {
        self.threshold_change = threshold;
        self
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.r > 0.0 && self.r <= 1.0) {
            return Err(ChangeFinderError::InvalidParameter(format!(
                "discount r must be in (0, 1], got {}",
                self.r
            )));
        }
        if self.k == 0 {
            return Err(ChangeFinderError::InvalidParameter(
                "AR order k must be at least 1".to_string(),
            ));
        }
        if self.t1 == 0 || self.t2 == 0 {
            return Err(ChangeFinderError::InvalidParameter(format!(
                "window sizes must be at least 1, got t1={} t2={}",
                self.t1, self.t2
            )));
        }
        if self.threshold_outlier.is_nan() || self.threshold_change.is_nan() {
            return Err(ChangeFinderError::InvalidParameter(
                "thresholds must not be NaN".to_string(),
            ));
        }
        Ok(())
    }
}

/// A score and whether it exceeds its threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Score value.
    pub value: f64,
    /// `value > threshold`.
    pub is_anomaly: bool,
}

impl Score {
    fn new(value: f64, threshold: f64) -> Self {
        Self {
            value,
            is_anomaly: value > threshold,
        }
    }
}

/// Scores produced for one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Raw stage-1 outlier score.
    pub outlier: Score,
    /// Smoothed stage-2 change-point score.
    pub change: Score,
}

/// Online outlier and change-point detector.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeFinder {
    config: ChangeFinderConfig,
    /// Last `k` raw observations
    xs: Window,
    outliers: Window,
    sdar_outlier: Sdar,
    /// Last `k` smoothed outlier scores
    ys: Window,
    changes: Window,
    sdar_change: Sdar,
    n_observations: usize,
}

impl ChangeFinder {
    /// Create a detector, validating the configuration.
    pub fn new(config: ChangeFinderConfig) -> Result<Self> {
        config.validate()?;

        let sdar_outlier = Sdar::new(config.r, config.k, config.ar_method)?;
        let sdar_change = Sdar::new(config.r / 2.0, config.k, config.ar_method)?;

        debug!(
            r = config.r,
            k = config.k,
            t1 = config.t1,
            t2 = config.t2,
            ar_method = config.ar_method.name(),
            score_method = config.score_method.name(),
            "created ChangeFinder"
        );

        Ok(Self {
            xs: Window::zeros(config.k)?,
            outliers: Window::zeros(config.t1)?,
            sdar_outlier,
            ys: Window::zeros(config.k)?,
            changes: Window::zeros(config.t2)?,
            sdar_change,
            n_observations: 0,
            config,
        })
    }

    /// Discard all learned state, keeping the configuration.
    pub fn reset(&mut self) -> Result<()> {
        *self = Self::new(self.config.clone())?;
        Ok(())
    }

    /// The detector configuration.
    pub fn config(&self) -> &ChangeFinderConfig {
        &self.config
    }

    /// Stage-1 model over raw observations.
    pub fn outlier_model(&self) -> &Sdar {
        &self.sdar_outlier
    }

    /// Stage-2 model over smoothed outlier scores.
    pub fn change_model(&self) -> &Sdar {
        &self.sdar_change
    }

    /// Window of recent raw outlier scores.
    pub fn outlier_window(&self) -> &Window {
        &self.outliers
    }

    /// Window of recent raw change scores.
    pub fn change_window(&self) -> &Window {
        &self.changes
    }
}

impl StreamingDetector for ChangeFinder {
    type Output = Detection;

    fn detect(&mut self, x: f64) -> Result<Detection> {
        let method = self.config.score_method;

        // Both stages run on copies and are committed together, so a failure
        // in either one leaves the detector untouched
        let mut sdar_outlier = self.sdar_outlier.clone();
        let mut outliers = self.outliers.clone();
        let mut sdar_change = self.sdar_change.clone();

        // Stage 1: outlier score from the raw series
        let outlier = method.score(&mut sdar_outlier, x, self.xs.as_slice())?;
        outliers.push(outlier);
        let y = outliers.mean();

        // Stage 2: change score from the smoothed outlier scores
        let raw_change = method.score(&mut sdar_change, y, self.ys.as_slice())?;

        self.sdar_outlier = sdar_outlier;
        self.outliers = outliers;
        self.xs.push(x);
        self.sdar_change = sdar_change;
        self.changes.push(raw_change);
        self.ys.push(y);

        let change = self.changes.mean();
        self.n_observations += 1;

        trace!(
            t = self.n_observations,
            x,
            outlier,
            smoothed = y,
            change,
            "processed observation"
        );

        Ok(Detection {
            outlier: Score::new(outlier, self.config.threshold_outlier),
            change: Score::new(change, self.config.threshold_change),
        })
    }

    fn n_observations(&self) -> usize {
        self.n_observations
    }

    fn name(&self) -> &str {
        "ChangeFinder"
    }
}

/// Scores for a whole series.
#[derive(Debug, Clone)]
pub struct ChangeFinderResult {
    /// Raw outlier score of every point
    pub outlier_scores: Vec<f64>,
    /// Smoothed change-point score of every point
    pub change_scores: Vec<f64>,
    /// Indices whose outlier score exceeds the threshold
    pub outlier_indices: Vec<usize>,
    /// Indices whose change score exceeds the threshold
    pub changepoint_indices: Vec<usize>,
}

impl ChangeFinderResult {
    /// Number of flagged outliers.
    pub fn outlier_count(&self) -> usize {
        self.outlier_indices.len()
    }

    /// Number of flagged change points.
    pub fn changepoint_count(&self) -> usize {
        self.changepoint_indices.len()
    }

    /// Check if a specific index is flagged as an outlier.
    pub fn is_outlier(&self, index: usize) -> bool {
        self.outlier_indices.contains(&index)
    }

    /// Check if a specific index is flagged as a change point.
    pub fn is_changepoint(&self, index: usize) -> bool {
        self.changepoint_indices.contains(&index)
    }
}

/// Run a fresh [`ChangeFinder`] over a whole series.
///
/// # Arguments
/// * `series` - Observations in time order
/// * `config` - Detector configuration
pub fn changefinder_detect(series: &[f64], config: &ChangeFinderConfig) -> Result<ChangeFinderResult> {
    let mut detector = ChangeFinder::new(config.clone())?;
    let detections = detector.detect_all(series)?;

    let mut result = ChangeFinderResult {
        outlier_scores: Vec::with_capacity(series.len()),
        change_scores: Vec::with_capacity(series.len()),
        outlier_indices: Vec::new(),
        changepoint_indices: Vec::new(),
    };

    for (i, d) in detections.iter().enumerate() {
        result.outlier_scores.push(d.outlier.value);
        result.change_scores.push(d.change.value);
        if d.outlier.is_anomaly {
            result.outlier_indices.push(i);
        }
        if d.change.is_anomaly {
            result.changepoint_indices.push(i);
        }
    }

    Ok(result)
}
