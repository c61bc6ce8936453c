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

//! Forward-mode automatic differentiation with dual numbers.
//!
//! [`Dual`] carries a value and one derivative and implements the full
//! [`num::Float`] surface, making it a drop-in scalar for every kernel in
//! this crate. Seeding a coordinate with unit derivative and reading the
//! derivative part of the result yields the exact analytic derivative of
//! the composed expression; [`gradient`] does this one coordinate at a
//! time over a whole configuration.
//!
//! Two rules make masked potential kernels differentiable at their
//! boundaries:
//!
//! * `max`/`min` select an operand wholesale, value and derivative
//!   together; ties select the second operand, so `(1 − r/σ).max(0)`
//!   takes the constant branch exactly at r = σ.
//! * `floor`/`ceil`/`round`/`trunc` carry zero derivative; quantities
//!   derived from them (segment indices, periodic wraps) are locally
//!   constant.

use crate::Vector;
use num::{Float, Num, NumCast, One, ToPrimitive, Zero};
use std::num::FpCategory;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign};

/// A dual number: value plus one derivative.
///
/// # Examples
/// ~~~
/// use diffatomic::autodiff::derivative;
/// let slope = derivative(|x| x * x * x, 2.0);
/// assert_eq!(slope, 12.0);
/// ~~~
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Dual {
    /// Value part
    pub re: f64,
    /// Derivative part
    pub eps: f64,
}

impl Dual {
    pub const fn new(re: f64, eps: f64) -> Self {
        Self { re, eps }
    }

    /// Lift a constant; its derivative is zero
    pub const fn constant(re: f64) -> Self {
        Self { re, eps: 0.0 }
    }
}

/// Derivative of a scalar function at `x`
pub fn derivative(f: impl Fn(Dual) -> Dual, x: f64) -> f64 {
    f(Dual::new(x, 1.0)).eps
}

/// Gradient of a scalar function of a configuration.
///
/// Seeds one coordinate at a time with unit derivative, so the cost is
/// one function evaluation per degree of freedom.
pub fn gradient<const D: usize>(
    f: impl Fn(&[Vector<Dual, D>]) -> Dual,
    positions: &[Vector<f64, D>],
) -> Vec<Vector<f64, D>> {
    let mut seeded: Vec<Vector<Dual, D>> =
        positions.iter().map(|p| p.map(Dual::constant)).collect();
    let mut grad = vec![Vector::<f64, D>::zeros(); positions.len()];
    for atom in 0..positions.len() {
        for axis in 0..D {
            seeded[atom][axis].eps = 1.0;
            grad[atom][axis] = f(&seeded).eps;
            seeded[atom][axis].eps = 0.0;
        }
    }
    grad
}

impl Add for Dual {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.eps + rhs.eps)
    }
}

impl Sub for Dual {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.eps - rhs.eps)
    }
}

impl Mul for Dual {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.re * rhs.re, self.eps * rhs.re + self.re * rhs.eps)
    }
}

impl Div for Dual {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(
            self.re / rhs.re,
            (self.eps * rhs.re - self.re * rhs.eps) / (rhs.re * rhs.re),
        )
    }
}

impl Rem for Dual {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        // x % y = x − trunc(x/y)·y and the quotient is locally constant
        let quotient = (self.re / rhs.re).trunc();
        Self::new(self.re % rhs.re, self.eps - quotient * rhs.eps)
    }
}

impl Neg for Dual {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.re, -self.eps)
    }
}

impl AddAssign for Dual {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Dual {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Dual {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Dual {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl RemAssign for Dual {
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

impl Zero for Dual {
    fn zero() -> Self {
        Self::constant(0.0)
    }
    fn is_zero(&self) -> bool {
        self.re == 0.0 && self.eps == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl Num for Dual {
    type FromStrRadixErr = <f64 as Num>::FromStrRadixErr;
    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        f64::from_str_radix(str, radix).map(Self::constant)
    }
}

impl ToPrimitive for Dual {
    fn to_i64(&self) -> Option<i64> {
        self.re.to_i64()
    }
    fn to_u64(&self) -> Option<u64> {
        self.re.to_u64()
    }
    fn to_f64(&self) -> Option<f64> {
        Some(self.re)
    }
}

impl NumCast for Dual {
    fn from<N: ToPrimitive>(n: N) -> Option<Self> {
        n.to_f64().map(Self::constant)
    }
}

/// Unary functions lifted by the chain rule: value and local slope as
/// expressions in the value part `x`
macro_rules! chain_rule {
    ($($name:ident: |$x:ident| ($value:expr, $slope:expr);)*) => {
        $(
            fn $name(self) -> Self {
                let $x = self.re;
                Self::new($value, self.eps * $slope)
            }
        )*
    };
}

impl Float for Dual {
    fn nan() -> Self {
        Self::constant(f64::NAN)
    }
    fn infinity() -> Self {
        Self::constant(f64::INFINITY)
    }
    fn neg_infinity() -> Self {
        Self::constant(f64::NEG_INFINITY)
    }
    fn neg_zero() -> Self {
        Self::constant(-0.0)
    }
    fn min_value() -> Self {
        Self::constant(f64::MIN)
    }
    fn min_positive_value() -> Self {
        Self::constant(f64::MIN_POSITIVE)
    }
    fn max_value() -> Self {
        Self::constant(f64::MAX)
    }

    fn is_nan(self) -> bool {
        self.re.is_nan()
    }
    fn is_infinite(self) -> bool {
        self.re.is_infinite()
    }
    fn is_finite(self) -> bool {
        self.re.is_finite()
    }
    fn is_normal(self) -> bool {
        self.re.is_normal()
    }
    fn classify(self) -> FpCategory {
        self.re.classify()
    }
    fn is_sign_positive(self) -> bool {
        self.re.is_sign_positive()
    }
    fn is_sign_negative(self) -> bool {
        self.re.is_sign_negative()
    }

    chain_rule! {
        floor: |x| (x.floor(), 0.0);
        ceil: |x| (x.ceil(), 0.0);
        round: |x| (x.round(), 0.0);
        trunc: |x| (x.trunc(), 0.0);
        fract: |x| (x.fract(), 1.0);
        abs: |x| (x.abs(), x.signum());
        signum: |x| (x.signum(), 0.0);
        recip: |x| (x.recip(), -1.0 / (x * x));
        sqrt: |x| (x.sqrt(), 0.5 / x.sqrt());
        cbrt: |x| (x.cbrt(), 1.0 / (3.0 * x.cbrt() * x.cbrt()));
        exp: |x| (x.exp(), x.exp());
        exp2: |x| (x.exp2(), x.exp2() * std::f64::consts::LN_2);
        exp_m1: |x| (x.exp_m1(), x.exp());
        ln: |x| (x.ln(), 1.0 / x);
        ln_1p: |x| (x.ln_1p(), 1.0 / (1.0 + x));
        log2: |x| (x.log2(), 1.0 / (x * std::f64::consts::LN_2));
        log10: |x| (x.log10(), 1.0 / (x * std::f64::consts::LN_10));
        sin: |x| (x.sin(), x.cos());
        cos: |x| (x.cos(), -x.sin());
        tan: |x| (x.tan(), 1.0 / (x.cos() * x.cos()));
        asin: |x| (x.asin(), 1.0 / (1.0 - x * x).sqrt());
        acos: |x| (x.acos(), -1.0 / (1.0 - x * x).sqrt());
        atan: |x| (x.atan(), 1.0 / (1.0 + x * x));
        sinh: |x| (x.sinh(), x.cosh());
        cosh: |x| (x.cosh(), x.sinh());
        tanh: |x| (x.tanh(), 1.0 / (x.cosh() * x.cosh()));
        asinh: |x| (x.asinh(), 1.0 / (x * x + 1.0).sqrt());
        acosh: |x| (x.acosh(), 1.0 / (x * x - 1.0).sqrt());
        atanh: |x| (x.atanh(), 1.0 / (1.0 - x * x));
    }

    fn mul_add(self, a: Self, b: Self) -> Self {
        Self::new(
            self.re.mul_add(a.re, b.re),
            self.eps * a.re + self.re * a.eps + b.eps,
        )
    }

    fn powi(self, n: i32) -> Self {
        Self::new(
            self.re.powi(n),
            <f64 as From<i32>>::from(n) * self.re.powi(n - 1) * self.eps,
        )
    }

    fn powf(self, n: Self) -> Self {
        let value = self.re.powf(n.re);
        // constant exponent: d(x^a) = a·x^(a−1)·dx; a varying exponent
        // adds the x^a·ln(x)·da term
        let mut slope = n.re * self.re.powf(n.re - 1.0) * self.eps;
        if n.eps != 0.0 {
            slope += value * self.re.ln() * n.eps;
        }
        Self::new(value, slope)
    }

    fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }

    fn max(self, other: Self) -> Self {
        // ties (and NaN) select `other`, value and derivative together
        if self.re > other.re {
            self
        } else {
            other
        }
    }

    fn min(self, other: Self) -> Self {
        if self.re < other.re {
            self
        } else {
            other
        }
    }

    fn abs_sub(self, other: Self) -> Self {
        (self - other).max(Self::zero())
    }

    fn hypot(self, other: Self) -> Self {
        let value = self.re.hypot(other.re);
        Self::new(value, (self.re * self.eps + other.re * other.eps) / value)
    }

    fn atan2(self, other: Self) -> Self {
        Self::new(
            self.re.atan2(other.re),
            (self.eps * other.re - self.re * other.eps) / (self.re * self.re + other.re * other.re),
        )
    }

    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }

    fn integer_decode(self) -> (u64, i16, i8) {
        Float::integer_decode(self.re)
    }
}
