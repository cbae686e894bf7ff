//! # changefinder
//!
//! Online outlier and change-point detection for scalar time series.
//!
//! Implements the two-stage ChangeFinder scheme: a sequentially discounted
//! AR model (SDAR) scores every incoming point, and a second SDAR model run
//! over the smoothed outlier scores yields a change-point score. AR
//! coefficients are estimated with either the Yule-Walker equations or
//! Burg's method; scores are either log-losses or Hellinger distances.
//!
//! Diagnostics are emitted through [`tracing`]; install a subscriber to see
//! them.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::needless_range_loop)]

pub mod ar;
pub mod detector;
pub mod error;
pub mod score;
pub mod sdar;
pub mod window;

pub use error::{ChangeFinderError, Result};

pub mod prelude {
    pub use crate::ar::ArMethod;
    pub use crate::detector::{
        changefinder_detect, ChangeFinder, ChangeFinderConfig, ChangeFinderResult, Detection,
        Score, StreamingDetector,
    };
    pub use crate::error::{ChangeFinderError, Result};
    pub use crate::score::ScoreMethod;
    pub use crate::sdar::{Sdar, SdarState};
}
