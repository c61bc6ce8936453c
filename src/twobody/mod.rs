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

//! ## Twobody interactions
//!
//! Module for describing exactly two particles interacting with each
//! other. Potentials take the displacement vector between the pair and
//! are generic over the scalar, so forces fall out of the same kernel
//! via [`crate::autodiff`].

use crate::autodiff::Dual;
use crate::{norm_squared, Real, Vector};

mod lennardjones;
mod softsphere;
pub use self::lennardjones::LennardJones;
pub use self::softsphere::SoftSphere;

/// Potential energy between a pair of particles, 𝑈(𝚫𝒓).
///
/// A pure function of the displacement and the potential's parameters;
/// nothing is retained between calls.
pub trait PairPotential {
    /// Interaction energy for the pair displacement `dr`
    fn pair_energy<T: Real, const D: usize>(&self, dr: &Vector<T, D>) -> T;

    /// Interaction energy with the self pair masked out.
    ///
    /// A zero displacement (an atom paired with itself, or exactly
    /// coincident atoms) contributes exactly zero energy and zero
    /// gradient; the kernel is never evaluated on the masked input, so
    /// forms singular at the origin (e.g. 1/𝑟¹²) stay off both the
    /// value and the gradient path.
    fn masked_pair_energy<T: Real, const D: usize>(&self, dr: &Vector<T, D>) -> T {
        if norm_squared(dr).is_zero() {
            T::zero()
        } else {
            self.pair_energy(dr)
        }
    }

    /// Force on the first particle, 𝑭 = −∇𝑈(𝚫𝒓).
    ///
    /// The default implementation differentiates `pair_energy` exactly
    /// with one dual-number evaluation per component.
    fn pair_force<const D: usize>(&self, dr: &Vector<f64, D>) -> Vector<f64, D> {
        Vector::from_fn(|axis, _| {
            let seeded = Vector::<Dual, D>::from_fn(|i, _| {
                Dual::new(dr[i], if i == axis { 1.0 } else { 0.0 })
            });
            -self.pair_energy(&seeded).eps
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_force_matches_central_difference() {
        let lj = LennardJones::new(1.5, 2.0);
        let dr = Vector::<f64, 3>::new(1.9, -0.7, 0.4);
        let force = lj.pair_force(&dr);
        let h = 1e-6;
        for axis in 0..3 {
            let mut plus = dr;
            let mut minus = dr;
            plus[axis] += h;
            minus[axis] -= h;
            let numeric = -(lj.pair_energy(&plus) - lj.pair_energy(&minus)) / (2.0 * h);
            assert_relative_eq!(force[axis], numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn masked_self_pair_is_silent() {
        let lj = LennardJones::new(2.0, 1.0);
        let origin = Vector::<f64, 3>::zeros();
        assert_eq!(lj.masked_pair_energy(&origin), 0.0);

        // the gradient path is masked as well: no NaN, no Inf
        let seeded = Vector::<Dual, 3>::from_fn(|i, _| Dual::new(0.0, if i == 0 { 1.0 } else { 0.0 }));
        let energy = lj.masked_pair_energy(&seeded);
        assert_eq!(energy.re, 0.0);
        assert_eq!(energy.eps, 0.0);

        let ss = SoftSphere::new(2.0, 1.5, 2.0);
        let energy = ss.masked_pair_energy(&seeded);
        assert!(energy.re.is_finite() && energy.eps.is_finite());
        assert_eq!(energy.re, 0.0);
        assert_eq!(energy.eps, 0.0);
    }
}
