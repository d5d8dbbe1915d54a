//! Descriptive statistics over finite numeric sequences.
//!
//! Every function borrows its input, validates it eagerly and returns a
//! [`StatsError`] instead of a placeholder value.

use thiserror::Error;

/// Errors returned by the statistics functions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    /// The operation needs at least one value.
    #[error("input sequence is empty")]
    EmptyInput,

    /// The window is zero or longer than the sequence.
    #[error("window must be in the range 1..={len}, but is {window}")]
    InvalidWindow { window: usize, len: usize },
}

/// Running mean and sum of squared deviations (Welford's method).
struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    fn pop_std_dev(&self) -> Result<f64, StatsError> {
        if self.n_vals == 0 {
            return Err(StatsError::EmptyInput);
        }
        Ok((self.diff_2_sum / self.n_vals as f64).sqrt())
    }
}

/// Compensated (Neumaier) sum of a sliding set of values.
///
/// Non-finite values are counted rather than summed, so they only affect the
/// windows that hold them.
#[derive(Default)]
struct RunningSum {
    sum: f64,
    comp: f64,
    n_nan: usize,
    n_pos_inf: usize,
    n_neg_inf: usize,
}

impl RunningSum {
    fn add(&mut self, val: f64) {
        if val.is_nan() {
            self.n_nan += 1;
        } else if val == f64::INFINITY {
            self.n_pos_inf += 1;
        } else if val == f64::NEG_INFINITY {
            self.n_neg_inf += 1;
        } else {
            self.add_finite(val);
        }
    }

    fn remove(&mut self, val: f64) {
        if val.is_nan() {
            self.n_nan -= 1;
        } else if val == f64::INFINITY {
            self.n_pos_inf -= 1;
        } else if val == f64::NEG_INFINITY {
            self.n_neg_inf -= 1;
        } else {
            self.add_finite(-val);
        }
    }

    fn add_finite(&mut self, val: f64) {
        let sum = self.sum + val;
        if self.sum.abs() >= val.abs() {
            self.comp += (self.sum - sum) + val;
        } else {
            self.comp += (val - sum) + self.sum;
        }
        self.sum = sum;
    }

    fn value(&self) -> f64 {
        match (self.n_nan, self.n_pos_inf, self.n_neg_inf) {
            (0, 0, 0) => self.sum + self.comp,
            (0, _, 0) => f64::INFINITY,
            (0, 0, _) => f64::NEG_INFINITY,
            _ => f64::NAN,
        }
    }
}

/// Compute the arithmetic mean of `vals`.
///
/// # Errors
/// Returns [`StatsError::EmptyInput`] if `vals` is empty.
pub fn average(vals: &[f64]) -> Result<f64, StatsError> {
    if vals.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    Ok(vals.iter().sum::<f64>() / vals.len() as f64)
}

/// Compute the mean of every complete window of `window` consecutive values.
///
/// The result has `vals.len() - window + 1` elements; element `k` is the
/// mean of `vals[k..k + window]`. Runs in linear time with a compensated
/// running sum, so a large value leaving the window does not wipe out the
/// small ones that follow it.
///
/// # Errors
/// Returns [`StatsError::InvalidWindow`] if `window` is zero or greater
/// than `vals.len()`.
pub fn moving_average(vals: &[f64], window: usize) -> Result<Vec<f64>, StatsError> {
    let len = vals.len();
    if window == 0 || window > len {
        return Err(StatsError::InvalidWindow { window, len });
    }

    let mut means = Vec::with_capacity(len - window + 1);
    let mut sum = RunningSum::default();
    for &val in &vals[..window] {
        sum.add(val);
    }
    means.push(sum.value() / window as f64);

    for (&leaving, &entering) in vals.iter().zip(&vals[window..]) {
        sum.add(entering);
        sum.remove(leaving);
        means.push(sum.value() / window as f64);
    }

    Ok(means)
}

/// Compute the population standard deviation of `vals`.
///
/// Uses a single stable pass, so large offsets do not cancel out the
/// deviations.
///
/// # Errors
/// Returns [`StatsError::EmptyInput`] if `vals` is empty.
pub fn stddev(vals: &[f64]) -> Result<f64, StatsError> {
    let mut acc = Accumulator::new();
    for &val in vals {
        acc.add(val);
    }
    acc.pop_std_dev()
}
