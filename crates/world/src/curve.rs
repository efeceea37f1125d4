//! Gaussian density curves used for relative weighting.
//!
//! The curves are normal densities, but nothing downstream relies on them
//! integrating to one; only ordering and ratios between evaluations matter.

use crate::error::GenerationError;
use std::f64::consts::PI;

/// One-dimensional Gaussian density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityCurve {
    mean: f64,
    stddev: f64,
}

impl ProbabilityCurve {
    /// Build a curve, rejecting non-positive or non-finite deviations.
    ///
    /// `owner` names the definition that owns the curve for diagnostics.
    pub fn new(owner: &str, mean: f64, stddev: f64) -> Result<Self, GenerationError> {
        check_stddev(owner, stddev)?;
        Ok(Self { mean, stddev })
    }

    /// Curve mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Curve standard deviation.
    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// Relative density at `x`; peaks at the mean and falls off symmetrically.
    pub fn density(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.stddev;
        (-0.5 * z * z).exp() / (self.stddev * (2.0 * PI).sqrt())
    }
}

/// Two-dimensional Gaussian density with a covariance cross term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityCurve2d {
    mean_x: f64,
    mean_y: f64,
    stddev_x: f64,
    stddev_y: f64,
    covariance: f64,
}

impl ProbabilityCurve2d {
    /// Build a 2-D curve.
    ///
    /// Both deviations must be positive and `|covariance|` must stay strictly
    /// below `stddev_x * stddev_y`.
    pub fn new(
        owner: &str,
        mean_x: f64,
        mean_y: f64,
        stddev_x: f64,
        stddev_y: f64,
        covariance: f64,
    ) -> Result<Self, GenerationError> {
        check_stddev(owner, stddev_x)?;
        check_stddev(owner, stddev_y)?;
        let limit = stddev_x * stddev_y;
        if !covariance.is_finite() || covariance.abs() >= limit {
            return Err(GenerationError::InvalidCovariance {
                owner: owner.to_string(),
                covariance,
                limit,
            });
        }
        Ok(Self {
            mean_x,
            mean_y,
            stddev_x,
            stddev_y,
            covariance,
        })
    }

    /// Axis-aligned curve without correlation.
    pub fn uncorrelated(
        owner: &str,
        mean_x: f64,
        mean_y: f64,
        stddev_x: f64,
        stddev_y: f64,
    ) -> Result<Self, GenerationError> {
        Self::new(owner, mean_x, mean_y, stddev_x, stddev_y, 0.0)
    }

    /// Relative density at `(x, y)`.
    pub fn density2d(&self, x: f64, y: f64) -> f64 {
        let rho = self.covariance / (self.stddev_x * self.stddev_y);
        let one_minus_rho2 = 1.0 - rho * rho;
        let dx = (x - self.mean_x) / self.stddev_x;
        let dy = (y - self.mean_y) / self.stddev_y;
        let exponent = -(dx * dx - 2.0 * rho * dx * dy + dy * dy) / (2.0 * one_minus_rho2);
        exponent.exp() / (2.0 * PI * self.stddev_x * self.stddev_y * one_minus_rho2.sqrt())
    }
}

fn check_stddev(owner: &str, stddev: f64) -> Result<(), GenerationError> {
    if stddev.is_finite() && stddev > 0.0 {
        Ok(())
    } else {
        Err(GenerationError::InvalidStdDev {
            owner: owner.to_string(),
            stddev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_peaks_at_mean_and_falls_off() {
        let curve = ProbabilityCurve::new("test", 50.0, 15.0).unwrap();
        assert!(curve.density(50.0) > curve.density(30.0));
        assert!(curve.density(30.0) > curve.density(0.0));
        assert!((curve.density(40.0) - curve.density(60.0)).abs() < 1e-12);
    }

    #[test]
    fn wider_curves_are_flatter() {
        let narrow = ProbabilityCurve::new("narrow", 0.0, 1.0).unwrap();
        let wide = ProbabilityCurve::new("wide", 0.0, 10.0).unwrap();
        assert!(narrow.density(0.0) > wide.density(0.0));
        assert!(narrow.density(8.0) < wide.density(8.0));
    }

    #[test]
    fn rejects_bad_stddev() {
        assert!(matches!(
            ProbabilityCurve::new("stone", 10.0, 0.0),
            Err(GenerationError::InvalidStdDev { .. })
        ));
        assert!(ProbabilityCurve::new("stone", 10.0, -1.0).is_err());
        assert!(ProbabilityCurve::new("stone", 10.0, f64::NAN).is_err());
    }

    #[test]
    fn covariance_tilts_the_2d_curve() {
        let flat = ProbabilityCurve2d::uncorrelated("flat", 0.0, 0.0, 1.0, 1.0).unwrap();
        let tilted = ProbabilityCurve2d::new("tilted", 0.0, 0.0, 1.0, 1.0, 0.8).unwrap();

        assert!((flat.density2d(1.0, 1.0) - flat.density2d(1.0, -1.0)).abs() < 1e-12);
        assert!(tilted.density2d(1.0, 1.0) > tilted.density2d(1.0, -1.0));
    }

    #[test]
    fn rejects_degenerate_covariance() {
        assert!(matches!(
            ProbabilityCurve2d::new("bad", 0.0, 0.0, 1.0, 2.0, 2.0),
            Err(GenerationError::InvalidCovariance { .. })
        ));
    }
}
