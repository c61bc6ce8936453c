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

use super::ConfigurationEnergy;
use crate::spline::CubicSpline;
use crate::{cast, norm, Cutoff, DisplacementMetric, Real, Vector};
use itertools::Itertools;

/// Embedded-atom method (EAM) potential
///
/// A many-body potential built from three tabulated functions: a
/// per-neighbor charge density ρ(𝑟), an embedding energy 𝐹(ρ) and a
/// pairwise repulsion φ(𝑟). For a configuration 𝑹₁…𝑹ₙ under the
/// injected displacement metric 𝐷,
///
/// 𝑈 = Σᵢ 𝐹(Σ_{j≠i} ρ(𝑟ᵢⱼ)) + ½ Σ_{i≠j} φ(𝑟ᵢⱼ), 𝑟ᵢⱼ = |𝐷(𝑹ᵢ, 𝑹ⱼ)|
///
/// implemented as a single pass over unordered pairs, so each pair's
/// distance and density contribution is computed once. The self pair
/// never enters the iteration, and pairs at or beyond the radial
/// tables' last knot are masked to zero before either radial table is
/// evaluated. That masking is what keeps the energy density of a
/// homogeneous periodic crystal independent of the replication count:
/// tables are expected to decay to ≈0 at their end, and everything
/// beyond contributes exact algebraic zero regardless of cell size.
///
/// # Examples
/// ~~~
/// use diffatomic::manybody::{ConfigurationEnergy, EmbeddedAtom};
/// use diffatomic::spline::CubicSpline;
/// use diffatomic::{DisplacementMetric, Real, Vector};
///
/// struct FreeSpace;
/// impl<const D: usize> DisplacementMetric<D> for FreeSpace {
///     fn displacement<T: Real>(&self, a: &Vector<T, D>, b: &Vector<T, D>) -> Vector<T, D> {
///         a - b
///     }
/// }
///
/// let charge_density = CubicSpline::new(&[1.0, 0.5, 0.0], 1.0).unwrap();
/// let embedding = CubicSpline::new(&[0.0, -1.0, -2.0], 1.0).unwrap();
/// let pairwise = CubicSpline::new(&[4.0, 2.0, 0.0], 1.0).unwrap();
/// let eam = EmbeddedAtom::new(FreeSpace, charge_density, embedding, pairwise);
///
/// // two atoms one length unit apart: ρ = 0.5 each, so
/// // U = 2·F(0.5) + φ(1) = 2·(−0.5) + 2 = 1
/// let positions = [Vector::<f64, 3>::zeros(), Vector::<f64, 3>::new(1.0, 0.0, 0.0)];
/// assert_eq!(eam.configuration_energy(&positions), 1.0);
/// ~~~
#[derive(Clone, Debug)]
pub struct EmbeddedAtom<M> {
    metric: M,
    charge_density: CubicSpline,
    embedding: CubicSpline,
    pairwise: CubicSpline,
    /// Pairs at or beyond this separation are masked out
    radial_cutoff: f64,
}

impl<M> EmbeddedAtom<M> {
    /// Combine a displacement metric with tabulated charge-density,
    /// embedding and pairwise functions.
    ///
    /// The radial cutoff is the shorter of the two radial tables; the
    /// embedding table is indexed by density, not distance, and is
    /// never masked.
    pub fn new(
        metric: M,
        charge_density: CubicSpline,
        embedding: CubicSpline,
        pairwise: CubicSpline,
    ) -> Self {
        let radial_cutoff = charge_density.cutoff().min(pairwise.cutoff());
        Self {
            metric,
            charge_density,
            embedding,
            pairwise,
            radial_cutoff,
        }
    }
}

impl<M: DisplacementMetric<D>, const D: usize> ConfigurationEnergy<D> for EmbeddedAtom<M> {
    fn configuration_energy<T: Real>(&self, positions: &[Vector<T, D>]) -> T {
        let cutoff = cast::<T>(self.radial_cutoff);
        let mut densities = vec![T::zero(); positions.len()];
        let mut pair_sum = T::zero();
        for (i, j) in (0..positions.len()).tuple_combinations() {
            let r = norm(&self.metric.displacement(&positions[i], &positions[j]));
            if r >= cutoff {
                continue; // masked before any table lookup
            }
            let contribution = self.charge_density.evaluate(r);
            densities[i] += contribution;
            densities[j] += contribution;
            pair_sum += self.pairwise.evaluate(r);
        }
        densities
            .into_iter()
            .fold(pair_sum, |sum, rho| sum + self.embedding.evaluate(rho))
    }
}

impl<M> Cutoff for EmbeddedAtom<M> {
    fn cutoff(&self) -> f64 {
        self.radial_cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct FreeSpace;

    impl<const D: usize> DisplacementMetric<D> for FreeSpace {
        fn displacement<T: Real>(&self, a: &Vector<T, D>, b: &Vector<T, D>) -> Vector<T, D> {
            a - b
        }
    }

    fn tables() -> (CubicSpline, CubicSpline, CubicSpline) {
        let charge_density =
            CubicSpline::new(&[0.9, 0.6, 0.35, 0.15, 0.05, 0.0], 0.5).unwrap();
        let embedding = CubicSpline::new(&[0.2, -0.8, -1.1, -1.0, -0.6, 0.1], 0.4).unwrap();
        let pairwise = CubicSpline::new(&[8.0, 3.0, 0.8, -0.2, -0.05, 0.0], 0.5).unwrap();
        (charge_density, embedding, pairwise)
    }

    #[test]
    fn two_atoms_check_against_tables() {
        let (charge_density, embedding, pairwise) = tables();
        let rho = charge_density.evaluate(1.9);
        let expected = 2.0 * embedding.evaluate(rho) + pairwise.evaluate(1.9);

        let eam = EmbeddedAtom::new(FreeSpace, charge_density, embedding, pairwise);
        let positions = [
            Vector::<f64, 3>::new(0.2, -0.1, 0.4),
            Vector::<f64, 3>::new(0.2, -0.1, 2.3),
        ];
        assert_relative_eq!(eam.configuration_energy(&positions), expected, epsilon = 1e-12);
    }

    #[test]
    fn lone_atom_embeds_zero_density() {
        let (charge_density, embedding, pairwise) = tables();
        let expected = embedding.evaluate(0.0);
        let eam = EmbeddedAtom::new(FreeSpace, charge_density, embedding, pairwise);
        assert_relative_eq!(
            eam.configuration_energy(&[Vector::<f64, 2>::new(0.3, 0.3)]),
            expected
        );
    }

    #[test]
    fn distant_pairs_are_masked_out() {
        let (charge_density, embedding, pairwise) = tables();
        let lone = embedding.evaluate(0.0);
        let eam = EmbeddedAtom::new(FreeSpace, charge_density, embedding, pairwise);
        // both radial tables end at 2.5; the pair no longer interacts
        let positions = [
            Vector::<f64, 2>::zeros(),
            Vector::<f64, 2>::new(2.5, 0.0),
        ];
        assert_eq!(eam.configuration_energy(&positions), 2.0 * lone);
        let far = [Vector::<f64, 2>::zeros(), Vector::<f64, 2>::new(100.0, 0.0)];
        assert_eq!(eam.configuration_energy(&far), 2.0 * lone);
    }

    #[test]
    fn coincident_atoms_stay_finite() {
        // the tables are regular at the origin, so stacked atoms give a
        // (large but) finite energy rather than NaN or Inf
        let (charge_density, embedding, pairwise) = tables();
        let eam = EmbeddedAtom::new(FreeSpace, charge_density, embedding, pairwise);
        let stacked = [Vector::<f64, 3>::zeros(), Vector::<f64, 3>::zeros()];
        assert!(eam.configuration_energy(&stacked).is_finite());
    }

    #[test]
    fn forces_match_central_differences() {
        let (charge_density, embedding, pairwise) = tables();
        let eam = EmbeddedAtom::new(FreeSpace, charge_density, embedding, pairwise);
        let positions = [
            Vector::<f64, 3>::new(0.0, 0.0, 0.0),
            Vector::<f64, 3>::new(1.7, 0.1, -0.3),
            Vector::<f64, 3>::new(0.4, 1.9, 0.6),
        ];
        let forces = eam.configuration_forces(&positions);
        let h = 1e-6;
        for atom in 0..positions.len() {
            for axis in 0..3 {
                let mut plus = positions;
                let mut minus = positions;
                plus[atom][axis] += h;
                minus[atom][axis] -= h;
                let numeric = -(eam.configuration_energy(&plus)
                    - eam.configuration_energy(&minus))
                    / (2.0 * h);
                assert_relative_eq!(forces[atom][axis], numeric, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn evaluation_is_pure() {
        let (charge_density, embedding, pairwise) = tables();
        let eam = EmbeddedAtom::new(FreeSpace, charge_density, embedding, pairwise);
        let positions = [
            Vector::<f64, 2>::new(0.0, 0.0),
            Vector::<f64, 2>::new(1.1, 0.0),
            Vector::<f64, 2>::new(0.0, 1.3),
        ];
        let first = eam.configuration_energy(&positions);
        assert_eq!(eam.configuration_energy(&positions), first);
    }
}
