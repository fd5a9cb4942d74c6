//! Triangular Membership Functions

use crate::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Triangular membership function over `[a, c]` peaking at `b`
///
/// `a == b` or `b == c` gives a shoulder that steps straight to 1 at the peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembershipFunction {
    a: f64,
    b: f64,
    c: f64,
}

impl MembershipFunction {
    /// Create a triangular function, rejecting unordered or non-finite breakpoints
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, ConfigurationError> {
        let finite = a.is_finite() && b.is_finite() && c.is_finite();
        if !finite || a > b || b > c {
            return Err(ConfigurationError::InvalidMembership { a, b, c });
        }
        Ok(Self { a, b, c })
    }

    /// Degree of membership of `x`, always in `[0, 1]`
    pub fn membership(&self, x: f64) -> f64 {
        if x.is_nan() || x < self.a || x > self.c {
            0.0
        } else if x == self.b {
            1.0
        } else if x < self.b {
            // a <= x < b, so b - a > 0
            (x - self.a) / (self.b - self.a)
        } else {
            (self.c - x) / (self.c - self.b)
        }
    }

    /// Sample the function over a universe
    pub fn sample(&self, universe: &[f64]) -> Vec<f64> {
        universe.iter().map(|&x| self.membership(x)).collect()
    }

    /// Breakpoints `(a, b, c)`
    pub fn params(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Closed interval where membership can be non-zero
    pub fn support(&self) -> (f64, f64) {
        (self.a, self.c)
    }

    /// Point of full membership
    pub fn peak(&self) -> f64 {
        self.b
    }
}
