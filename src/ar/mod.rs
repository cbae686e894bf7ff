//! AR coefficient estimation.
//!
//! Solvers that turn either discounted autocovariances or a short run of
//! samples into AR(k) coefficients.
//!
//! # Available Methods
//!
//! - **Yule-Walker**: Levinson-Durbin recursion over autocovariances
//! - **Burg**: reflection coefficients estimated directly from samples
//!
//! Both return prediction error filter coefficients `a[1..=k]` of the
//! classical Levinson and Burg recursions: `e_t = x_t + Σ a_j · x_{t-j}`, with
//! the leading 1 of the filter omitted.
//!
//! # Example
//!
//! ```
//! use changefinder::ar::{burg_solve, yule_walker_solve};
//!
//! // Autocovariances of an AR(1) process with coefficient 0.5
//! let a = yule_walker_solve(&[1.0, 0.5], 1);
//! assert!((a[0] + 0.5).abs() < 1e-12);
//!
//! // Most-recent-first samples
//! let a = burg_solve(&[1.0, 2.0], 1);
//! assert!((a[0] + 0.8).abs() < 1e-12);
//! ```

pub mod burg;
pub mod yule_walker;

pub use burg::burg_solve;
pub use yule_walker::yule_walker_solve;

/// Method used to estimate AR coefficients inside an SDAR update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArMethod {
    /// Solve the Yule-Walker equations over discounted autocovariances.
    #[default]
    YuleWalker,
    /// Burg's method over the current point and its `k` lags.
    Burg,
}

impl ArMethod {
    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            ArMethod::YuleWalker => "yule-walker",
            ArMethod::Burg => "burg",
        }
    }
}
