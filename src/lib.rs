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

//! # Diffatomic
//!
//! A library for calculating interatomic potential energies and, through
//! forward-mode automatic differentiation, the forces they exert.
//! Provides closed-form pair potentials (soft sphere, Lennard-Jones),
//! cubic-spline interpolation of tabulated potentials, and the many-body
//! embedded-atom method (EAM) built on top of them.
//!
//! Every energy kernel is written once, generically over the scalar type,
//! so that the same expression evaluates with `f64` for energies and with
//! [`autodiff::Dual`] for exact derivatives. Cutoffs and singular inputs
//! are handled by masking *before* the offending operation, keeping the
//! kernels differentiable at the exact boundary points they are evaluated
//! at.

#[cfg(test)]
extern crate approx;

use num::{Float, NumCast};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;

pub mod autodiff;
pub mod manybody;
pub mod spline;
pub mod twobody;

/// A point or displacement in `D`-dimensional space
pub type Vector<T, const D: usize> = nalgebra::SVector<T, D>;

/// Scalar type accepted by all energy kernels.
///
/// Implemented by `f64` and by [`autodiff::Dual`]; the bounds bundle what
/// `nalgebra` needs for vector arithmetic on top of [`num::Float`].
pub trait Real:
    Float
    + nalgebra::Scalar
    + nalgebra::ClosedAddAssign
    + nalgebra::ClosedSubAssign
    + nalgebra::ClosedMulAssign
    + nalgebra::ClosedDivAssign
    + std::ops::Neg<Output = Self>
{
}

impl<T> Real for T where
    T: Float
        + nalgebra::Scalar
        + nalgebra::ClosedAddAssign
        + nalgebra::ClosedSubAssign
        + nalgebra::ClosedMulAssign
        + nalgebra::ClosedDivAssign
        + std::ops::Neg<Output = T>
{
}

/// Squared Euclidean norm of a displacement vector
pub fn norm_squared<T: Real, const D: usize>(displacement: &Vector<T, D>) -> T {
    displacement.iter().fold(T::zero(), |sum, &x| sum + x * x)
}

/// Euclidean norm of a displacement vector
pub fn norm<T: Real, const D: usize>(displacement: &Vector<T, D>) -> T {
    norm_squared(displacement).sqrt()
}

/// Defines a cutoff distance
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f64;
}

/// Displacement function for a spatial topology, injected by the caller.
///
/// Implementations return the vector separating two positions under free
/// or periodic geometry; periodic metrics typically wrap to the minimum
/// image. The method is generic over the scalar so that the same metric
/// participates in both energy and force evaluation. Metrics are assumed
/// norm-symmetric, |𝐷(𝑎,𝑏)| = |𝐷(𝑏,𝑎)|.
pub trait DisplacementMetric<const D: usize> {
    /// Vector separating position `a` from position `b`
    fn displacement<T: Real>(&self, a: &Vector<T, D>, b: &Vector<T, D>) -> Vector<T, D>;
}

/// Error for malformed tabulated data, raised at construction time only.
///
/// Evaluating an already constructed interpolant never fails; inputs
/// outside the tabulated range follow the extrapolation policy instead.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    /// Fewer than two knots cannot define an interval
    TooFewKnots(usize),
    /// Knot spacing must be strictly positive
    NonPositiveSpacing(f64),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewKnots(n) => write!(f, "spline table needs at least 2 knots, got {}", n),
            Self::NonPositiveSpacing(dx) => {
                write!(f, "spline knot spacing must be positive, got {}", dx)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Cast a potential parameter into the kernel scalar type
pub(crate) fn cast<T: Real>(value: f64) -> T {
    NumCast::from(value).unwrap()
}

/// Transform x^2 --> x when serializing
#[cfg(feature = "serde")]
fn sqrt_serialize<S>(x: &f64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_f64(x.sqrt())
}

/// Transform x --> x^2 when deserializing
#[cfg(feature = "serde")]
fn square_deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64::deserialize(deserializer)?.powi(2))
}
