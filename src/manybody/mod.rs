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

//! ## Manybody interactions
//!
//! Potentials over whole configurations of particles, where the energy
//! of an atom depends on more than one neighbor at a time.

use crate::autodiff::{self, Dual};
use crate::{Real, Vector};

mod eam;
pub use self::eam::EmbeddedAtom;

/// Potential energy of a configuration of positions, 𝑈(𝑹).
///
/// The common evaluation contract of configuration-level potentials: a
/// pure function of the positions (and the potential's immutable
/// parameters), differentiable end to end with respect to every
/// coordinate. Callers obtain forces from the same kernel through
/// [`ConfigurationEnergy::configuration_forces`].
pub trait ConfigurationEnergy<const D: usize> {
    /// Total potential energy of the configuration
    fn configuration_energy<T: Real>(&self, positions: &[Vector<T, D>]) -> T;

    /// Per-atom forces, 𝑭ᵢ = −∂𝑈/∂𝑹ᵢ.
    ///
    /// The default implementation seeds one dual derivative per
    /// coordinate through `configuration_energy`, propagating exactly
    /// through masking, interpolation and reduction.
    fn configuration_forces(&self, positions: &[Vector<f64, D>]) -> Vec<Vector<f64, D>> {
        autodiff::gradient(|r: &[Vector<Dual, D>]| self.configuration_energy(r), positions)
            .into_iter()
            .map(|g| -g)
            .collect()
    }
}
