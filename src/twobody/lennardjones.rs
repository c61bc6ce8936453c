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

use super::PairPotential;
use crate::{cast, norm_squared, Cutoff, Real, Vector};
#[cfg(feature = "serde")]
use crate::{sqrt_serialize, square_deserialize};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lennard-Jones potential in its 12-6 minimum form
///
/// 𝑈(𝑟) = ε · \[(σ/𝑟)¹² − 2(σ/𝑟)⁶\]
///
/// calibrated so that the minimum sits exactly at 𝑟 = σ with depth −ε
/// and zero gradient. Originally by J. E. Lennard-Jones, see
/// [doi:10/cqhgm7](https://dx.doi.org/10/cqhgm7).
///
/// The raw kernel is singular at 𝑟 = 0; self pairs inside summations go
/// through [`PairPotential::masked_pair_energy`] which never evaluates
/// the singular expression.
///
/// # Examples
/// ~~~
/// use diffatomic::twobody::{LennardJones, PairPotential};
/// use diffatomic::Vector;
/// let lennard_jones = LennardJones::new(1.5, 2.0);
/// let minimum = Vector::<f64, 3>::new(2.0, 0.0, 0.0);
/// assert_eq!(lennard_jones.pair_energy(&minimum), -1.5);
/// ~~~
#[derive(Debug, Clone, PartialEq, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct LennardJones {
    /// Well depth, ε
    #[cfg_attr(feature = "serde", serde(rename = "eps"))]
    epsilon: f64,
    /// Squared position of the minimum, σ²
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "sigma",
            serialize_with = "sqrt_serialize",
            deserialize_with = "square_deserialize"
        )
    )]
    sigma_squared: f64,
}

impl LennardJones {
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        Self {
            epsilon,
            sigma_squared: sigma.powi(2),
        }
    }
}

impl PairPotential for LennardJones {
    #[inline]
    fn pair_energy<T: Real, const D: usize>(&self, dr: &Vector<T, D>) -> T {
        let x = (cast::<T>(self.sigma_squared) / norm_squared(dr)).powi(3); // (σ/r)⁶
        cast::<T>(self.epsilon) * (x * x - (cast::<T>(2.0)) * x)
    }
}

impl Cutoff for LennardJones {
    fn cutoff(&self) -> f64 {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn minimum_sits_at_sigma() {
        let lennard_jones = LennardJones::new(1.7, 1.3);
        assert_eq!(
            lennard_jones.pair_energy(&Vector::<f64, 3>::new(1.3, 0.0, 0.0)),
            -1.7
        );
        assert_eq!(
            lennard_jones.pair_force(&Vector::<f64, 3>::new(1.3, 0.0, 0.0)),
            Vector::<f64, 3>::zeros()
        );
        // also in two dimensions
        assert_eq!(
            lennard_jones.pair_energy(&Vector::<f64, 2>::new(0.0, 1.3)),
            -1.7
        );
    }

    #[test]
    fn attractive_outside_repulsive_inside() {
        let lennard_jones = LennardJones::new(1.0, 1.0);
        let inside = lennard_jones.pair_energy(&Vector::<f64, 3>::new(0.9, 0.0, 0.0));
        let outside = lennard_jones.pair_energy(&Vector::<f64, 3>::new(1.5, 0.0, 0.0));
        assert!(inside > -1.0);
        assert!(lennard_jones.pair_force(&Vector::<f64, 3>::new(0.9, 0.0, 0.0))[0] > 0.0);
        assert!((-1.0..0.0).contains(&outside));
        assert!(lennard_jones.pair_force(&Vector::<f64, 3>::new(1.5, 0.0, 0.0))[0] < 0.0);
    }

    #[test]
    fn reduces_to_known_values() {
        let (epsilon, sigma) = (0.8, 1.1);
        let lennard_jones = LennardJones::new(epsilon, sigma);
        let r: f64 = 1.45;
        let x = (sigma / r).powi(6);
        assert_relative_eq!(
            lennard_jones.pair_energy(&Vector::<f64, 2>::new(r, 0.0)),
            epsilon * (x * x - 2.0 * x),
            epsilon = 1e-12
        );
    }
}
