// Copyright 2024 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! Cubic spline interpolation of uniformly tabulated potentials.
//!
//! [`CubicSpline`] fits a natural cubic spline through samples at
//! `0, Δx, 2Δx, …` once, then evaluates by Horner's rule on precomputed
//! per-interval coefficients. Evaluation is generic over the scalar so
//! that derivatives propagate through [`crate::autodiff::Dual`]: the
//! interval index comes from a clamped floor division on the value part
//! and therefore carries no derivative, while the fractional coordinate
//! keeps the full derivative of the input.
//!
//! Inputs outside the tabulated range are not errors: the boundary
//! interval's polynomial is extended, so near-cutoff distances that
//! overshoot the table by a rounding error evaluate smoothly.

use crate::{cast, ConfigurationError, Cutoff, Real};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Piecewise-cubic interpolant of uniformly spaced samples.
///
/// Immutable once constructed; construction cost is paid once, not per
/// evaluation. The interval polynomial is `c₀ + c₁u + c₂u² + c₃u³` with
/// `u ∈ [0, 1)` the fractional position inside the interval.
///
/// # Examples
/// ~~~
/// use diffatomic::spline::CubicSpline;
/// let table = CubicSpline::new(&[1.0, 3.0, 2.0], 0.5).unwrap();
/// assert_eq!(table.evaluate(0.0), 1.0);
/// assert_eq!(table.evaluate(0.5), 3.0);
/// assert_eq!(table.domain_end(), 1.0);
/// ~~~
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct CubicSpline {
    /// Normalized coefficients per interval
    coeffs: Vec<[f64; 4]>,
    /// Knot spacing, Δx
    dx: f64,
    /// Inverse knot spacing
    inv_dx: f64,
}

impl CubicSpline {
    /// Fit a natural cubic spline to samples at `0, dx, 2·dx, …`
    ///
    /// Fails if fewer than two samples are given or if `dx` is not
    /// strictly positive; this is the only fallible operation in the
    /// crate.
    pub fn new(samples: &[f64], dx: f64) -> Result<Self, ConfigurationError> {
        if samples.len() < 2 {
            return Err(ConfigurationError::TooFewKnots(samples.len()));
        }
        if !(dx > 0.0) {
            return Err(ConfigurationError::NonPositiveSpacing(dx));
        }
        let m = second_derivatives(samples, dx);
        let coeffs = (0..samples.len() - 1)
            .map(|i| {
                let slope = (samples[i + 1] - samples[i]) / dx - dx * (2.0 * m[i] + m[i + 1]) / 6.0;
                let curvature = m[i] / 2.0;
                let jerk = (m[i + 1] - m[i]) / (6.0 * dx);
                [
                    samples[i],
                    slope * dx,
                    curvature * dx * dx,
                    jerk * dx * dx * dx,
                ]
            })
            .collect();
        Ok(Self {
            coeffs,
            dx,
            inv_dx: 1.0 / dx,
        })
    }

    /// Interpolated value at `x`; never fails.
    ///
    /// Outside `[0, domain_end]` the boundary interval's polynomial is
    /// extended. Segment selection clamps a floor division on the value
    /// part of `x`, so the derivative of the result equals the analytic
    /// derivative of the selected polynomial everywhere.
    #[inline]
    pub fn evaluate<T: Real>(&self, x: T) -> T {
        let t = x * cast(self.inv_dx);
        let last = self.coeffs.len() - 1;
        let index = (t.to_f64().unwrap().floor().max(0.0) as usize).min(last);
        let u = t - cast(index as f64);
        let c = &self.coeffs[index];
        cast::<T>(c[0]) + u * (cast::<T>(c[1]) + u * (cast::<T>(c[2]) + u * cast::<T>(c[3])))
    }

    /// Position of the last knot, `(n − 1)·Δx`
    pub fn domain_end(&self) -> f64 {
        self.coeffs.len() as f64 * self.dx
    }

    /// Knot spacing
    pub fn spacing(&self) -> f64 {
        self.dx
    }
}

/// A tabulated potential is usable out to its last knot
impl Cutoff for CubicSpline {
    fn cutoff(&self) -> f64 {
        self.domain_end()
    }
}

/// Second derivatives at the knots for a natural cubic spline
/// (zero curvature at both ends), by the Thomas algorithm.
fn second_derivatives(samples: &[f64], dx: f64) -> Vec<f64> {
    let n = samples.len();
    let mut m = vec![0.0; n];
    if n == 2 {
        return m; // straight line through two knots
    }
    let interior = n - 2;
    let mut diag = vec![4.0; interior];
    let mut rhs: Vec<f64> = (0..interior)
        .map(|i| 6.0 * (samples[i + 2] - 2.0 * samples[i + 1] + samples[i]) / (dx * dx))
        .collect();
    for i in 1..interior {
        let w = 1.0 / diag[i - 1];
        diag[i] -= w;
        rhs[i] -= w * rhs[i - 1];
    }
    m[interior] = rhs[interior - 1] / diag[interior - 1];
    for i in (1..interior).rev() {
        m[i] = (rhs[i - 1] - m[i + 1]) / diag[i - 1];
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autodiff::derivative;
    use approx::assert_relative_eq;

    const SAMPLES: [f64; 7] = [0.3, 1.1, 0.7, -0.2, 0.4, 0.9, 0.1];
    const DX: f64 = 0.3;

    #[test]
    fn rejects_malformed_tables() {
        assert_eq!(
            CubicSpline::new(&[1.0], 0.1),
            Err(ConfigurationError::TooFewKnots(1))
        );
        assert_eq!(
            CubicSpline::new(&[], 0.1),
            Err(ConfigurationError::TooFewKnots(0))
        );
        assert_eq!(
            CubicSpline::new(&[1.0, 2.0], 0.0),
            Err(ConfigurationError::NonPositiveSpacing(0.0))
        );
        assert_eq!(
            CubicSpline::new(&[1.0, 2.0], -0.5),
            Err(ConfigurationError::NonPositiveSpacing(-0.5))
        );
    }

    #[test]
    fn reproduces_samples_at_knots() {
        let spline = CubicSpline::new(&SAMPLES, DX).unwrap();
        for (i, &y) in SAMPLES.iter().enumerate() {
            assert_relative_eq!(spline.evaluate(i as f64 * DX), y, epsilon = 1e-12);
        }
    }

    #[test]
    fn interpolates_linear_data_exactly() {
        // collinear samples solve to zero curvature everywhere, so the
        // spline is the line itself, including in the extended region
        let samples: Vec<f64> = (0..5).map(|i| 2.0 * 0.25 * i as f64 - 1.0).collect();
        let spline = CubicSpline::new(&samples, 0.25).unwrap();
        for &x in &[0.1, 0.62, 0.99, 1.0, 1.7, -0.4] {
            assert_relative_eq!(spline.evaluate(x), 2.0 * x - 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn extends_boundary_polynomial() {
        let spline = CubicSpline::new(&SAMPLES, DX).unwrap();
        let end = spline.domain_end();
        // continuous through the last knot under a rounding-sized overshoot
        assert_relative_eq!(
            spline.evaluate(end + 1e-9),
            spline.evaluate(end),
            epsilon = 1e-7
        );
        // and smooth: the overshoot follows the tangent at the last knot
        let slope = derivative(|x| spline.evaluate(x), end);
        assert_relative_eq!(
            spline.evaluate(end + 1e-6),
            spline.evaluate(end) + 1e-6 * slope,
            epsilon = 1e-9
        );
        assert!(spline.evaluate(-0.05_f64).is_finite());
    }

    #[test]
    fn derivative_matches_central_difference() {
        let spline = CubicSpline::new(&SAMPLES, DX).unwrap();
        let h = 1e-6;
        for &x in &[0.05, 0.31, 0.9, 1.45, 1.79] {
            let numeric = (spline.evaluate(x + h) - spline.evaluate(x - h)) / (2.0 * h);
            assert_relative_eq!(
                derivative(|x| spline.evaluate(x), x),
                numeric,
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn evaluation_is_pure() {
        let spline = CubicSpline::new(&SAMPLES, DX).unwrap();
        let first = spline.evaluate(0.77);
        assert_eq!(spline.evaluate(0.77), first);
        assert_eq!(spline.evaluate(0.77), first);
    }

    #[test]
    fn two_knots_degenerate_to_a_line() {
        let spline = CubicSpline::new(&[1.0, 2.0], 0.5).unwrap();
        assert_relative_eq!(spline.evaluate(0.25), 1.5);
        assert_relative_eq!(spline.evaluate(1.0), 3.0); // extended line
    }
}
