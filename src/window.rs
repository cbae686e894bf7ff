//! Fixed-capacity sliding windows.
//!
//! A window always holds exactly `capacity` values: it starts zero-filled and
//! every push evicts the oldest value. The detector uses windows both as AR
//! regressors and for moving-average smoothing of scores.

use std::collections::VecDeque;

use crate::error::{ChangeFinderError, Result};

/// FIFO ring of the most recent `capacity` values, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    values: VecDeque<f64>,
    capacity: usize,
}

impl Window {
    /// Create a zero-filled window holding `capacity` values, at least 1.
    pub fn zeros(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ChangeFinderError::InvalidParameter(
                "window capacity must be at least 1".to_string(),
            ));
        }
        let mut values = VecDeque::with_capacity(capacity);
        values.resize(capacity, 0.0);
        Ok(Self { values, capacity })
    }

    /// Append a value, evicting the oldest one.
    pub fn push(&mut self, value: f64) {
        self.values.pop_front();
        self.values.push_back(value);
    }

    /// Arithmetic mean of the window, zero padding included.
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.capacity as f64
    }

    /// The values as one contiguous slice, oldest first.
    pub fn as_slice(&mut self) -> &[f64] {
        self.values.make_contiguous()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &f64> + ExactSizeIterator + '_ {
        self.values.iter()
    }

    /// Most recently pushed value.
    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: a window is never empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum number of values held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
