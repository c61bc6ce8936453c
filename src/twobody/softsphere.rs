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
use crate::{cast, norm, Cutoff, Real, Vector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Finite-range soft-sphere potential
///
/// Purely repulsive with strength ε, particle diameter σ and stiffness
/// exponent α:
///
/// 𝑈(𝑟) = ε/α · (1 − 𝑟/σ)ᵅ for 𝑟 < σ, zero otherwise.
///
/// The overlap argument is clamped to zero *before* exponentiation, so
/// the energy is exactly ε/α at contactless overlap (𝑟 = 0), exactly
/// zero from σ outward, and the derivative vanishes identically for all
/// 𝑟 ≥ σ, including at the boundary itself (for α > 1).
///
/// # Examples
/// ~~~
/// use diffatomic::twobody::{PairPotential, SoftSphere};
/// use diffatomic::Vector;
/// let softsphere = SoftSphere::new(2.0, 1.5, 2.0);
/// let contact = Vector::<f64, 2>::new(1.5, 0.0);
/// assert_eq!(softsphere.pair_energy(&contact), 0.0);
/// assert_eq!(softsphere.pair_energy(&(contact * 0.0)), 1.0); // ε/α
/// ~~~
#[derive(Debug, Clone, PartialEq, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct SoftSphere {
    /// Interaction strength, ε
    #[cfg_attr(feature = "serde", serde(rename = "eps"))]
    epsilon: f64,
    /// Diameter, σ
    #[cfg_attr(feature = "serde", serde(rename = "sigma"))]
    sigma: f64,
    /// Stiffness exponent, α
    #[cfg_attr(feature = "serde", serde(rename = "alpha"))]
    alpha: f64,
}

impl SoftSphere {
    pub fn new(epsilon: f64, sigma: f64, alpha: f64) -> Self {
        assert!(sigma > 0.0);
        assert!(alpha > 0.0);
        Self {
            epsilon,
            sigma,
            alpha,
        }
    }
}

impl PairPotential for SoftSphere {
    #[inline]
    fn pair_energy<T: Real, const D: usize>(&self, dr: &Vector<T, D>) -> T {
        let alpha = cast::<T>(self.alpha);
        // masked before exponentiation; ties at r = σ take the constant
        // branch so the gradient is exactly zero there
        let overlap = (T::one() - norm(dr) / cast(self.sigma)).max(T::zero());
        cast::<T>(self.epsilon) / alpha * overlap.powf(alpha)
    }
}

impl Cutoff for SoftSphere {
    fn cutoff(&self) -> f64 {
        self.sigma
    }
}
