//! Quadratic extension `F_{p²} = F_p[u] / (u² − β)`.
//!
//! How the extension is presented is an explicit [`ExtensionMode`]: the
//! complex presentation `u² = −1` exists only for `p ≡ 3 (mod 4)`, the
//! generic one adjoins the square root of the least quadratic non-residue.

use core::fmt;
use core::hash::Hash;
use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::algebra::field::{tonelli_shanks, Field};
use crate::algebra::ring::Ring;
use crate::error::{Error, Result};
use crate::structures::fp::{Fp, PrimeModulus};

/// How the quadratic extension is presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtensionMode {
    /// `u² = −1`; the generator is the imaginary unit `i`.
    Complex,
    /// `u² = β` for the least quadratic non-residue `β ≥ 2`.
    Generic {
        /// The adjoined non-residue `β`.
        non_residue: u64,
    },
}

/// Defining data of `F_{p²}`: the base modulus and `β = u²`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct QuadraticModulus {
    base: PrimeModulus,
    mode: ExtensionMode,
    beta: Fp,
}

impl QuadraticModulus {
    /// The extension by `x² + 1`.
    ///
    /// # Errors
    ///
    /// [`Error::NotComplexExtension`] if `−1` is a square modulo `p`,
    /// i.e. unless `p ≡ 3 (mod 4)`.
    pub fn complex(base: PrimeModulus) -> Result<Self> {
        let p = base.value();
        if p % 4 != 3 {
            return Err(Error::NotComplexExtension(p));
        }
        Ok(Self {
            base,
            mode: ExtensionMode::Complex,
            beta: Fp::from_i64(-1, base),
        })
    }

    /// The extension by `x² − β` with `β` the least non-residue `≥ 2`.
    pub fn generic(base: PrimeModulus) -> Self {
        let mut candidate = 2u64;
        while base.element(candidate).legendre() != -1 {
            candidate += 1;
        }
        Self {
            base,
            mode: ExtensionMode::Generic {
                non_residue: candidate,
            },
            beta: base.element(candidate),
        }
    }

    /// Complex presentation when available, generic otherwise.
    pub fn for_prime(base: PrimeModulus) -> Self {
        Self::complex(base).unwrap_or_else(|_| Self::generic(base))
    }

    #[inline]
    pub const fn base(&self) -> PrimeModulus {
        self.base
    }

    #[inline]
    pub const fn mode(&self) -> ExtensionMode {
        self.mode
    }

    /// `β = u²` as a base-field element.
    #[inline]
    pub const fn non_residue(&self) -> Fp {
        self.beta
    }

    /// The element `c0 + c1·u`.
    pub fn element(&self, c0: u64, c1: u64) -> Fp2 {
        Fp2::new(self.base.element(c0), self.base.element(c1), *self)
    }

    /// The element `c0 + c1·u` from signed coordinates.
    pub fn element_i64(&self, c0: i64, c1: i64) -> Fp2 {
        Fp2::new(Fp::from_i64(c0, self.base), Fp::from_i64(c1, self.base), *self)
    }

    /// Embed a base-field element.
    #[inline]
    pub fn lift(&self, a: Fp) -> Fp2 {
        Fp2::new(a, self.base.zero(), *self)
    }

    #[inline]
    pub fn zero(&self) -> Fp2 {
        self.lift(self.base.zero())
    }

    #[inline]
    pub fn one(&self) -> Fp2 {
        self.lift(self.base.one())
    }

    /// The adjoined root `u`.
    #[inline]
    pub fn gen(&self) -> Fp2 {
        Fp2::new(self.base.zero(), self.base.one(), *self)
    }

    /// `p²`.
    #[inline]
    pub fn order(&self) -> u128 {
        let p = self.base.value() as u128;
        p * p
    }
}

impl fmt::Debug for QuadraticModulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ExtensionMode::Complex => write!(f, "GF({}^2)[u^2 = -1]", self.base.value()),
            ExtensionMode::Generic { non_residue } => {
                write!(f, "GF({}^2)[u^2 = {}]", self.base.value(), non_residue)
            }
        }
    }
}

/// Element `c0 + c1·u` of `F_{p²}`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Fp2 {
    c0: Fp,
    c1: Fp,
    modulus: QuadraticModulus,
}

#[cfg(feature = "serde")]
impl serde::Serialize for Fp2 {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.c0.value(), self.c1.value()).serialize(serializer)
    }
}

impl Fp2 {
    #[inline]
    pub fn new(c0: Fp, c1: Fp, modulus: QuadraticModulus) -> Self {
        Self { c0, c1, modulus }
    }

    #[inline]
    pub const fn c0(self) -> Fp {
        self.c0
    }

    #[inline]
    pub const fn c1(self) -> Fp {
        self.c1
    }

    #[inline]
    pub const fn modulus(self) -> QuadraticModulus {
        self.modulus
    }

    /// The image of `c0 + c1·u` under the `p`-power Frobenius, `c0 − c1·u`.
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(self.c0, -self.c1, self.modulus)
    }

    /// `N(a) = a · ā = c0² − β·c1²`.
    pub fn norm(self) -> Fp {
        self.c0 * self.c0 - self.modulus.beta * self.c1 * self.c1
    }

    #[inline]
    pub fn is_in_base_field(self) -> bool {
        self.c1.is_zero()
    }

    /// The base-field value when `c1 = 0`.
    pub fn to_base(self) -> Option<Fp> {
        self.is_in_base_field().then_some(self.c0)
    }

    /// Multiply by a base-field scalar.
    #[inline]
    pub fn scale(self, k: Fp) -> Self {
        Self::new(self.c0 * k, self.c1 * k, self.modulus)
    }

    #[inline]
    fn check_same_field(self, rhs: Self) {
        debug_assert_eq!(
            self.modulus, rhs.modulus,
            "Fp2 elements must share the same modulus"
        );
    }

    #[inline]
    fn mul_by_beta(self, a: Fp) -> Fp {
        match self.modulus.mode {
            ExtensionMode::Complex => -a,
            ExtensionMode::Generic { .. } => self.modulus.beta * a,
        }
    }

    /// The smaller of `±r` in the `(c1, c0)` order.
    fn normalize_sqrt(r: Self) -> Self {
        let neg = -r;
        if r.sort_key() <= neg.sort_key() {
            r
        } else {
            neg
        }
    }
}

impl fmt::Debug for Fp2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp2<{}>({})", self.modulus.base.value(), self)
    }
}

impl fmt::Display for Fp2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.modulus.mode {
            ExtensionMode::Complex => "i",
            ExtensionMode::Generic { .. } => "u",
        };
        match (self.c0.value(), self.c1.value()) {
            (c0, 0) => write!(f, "{}", c0),
            (0, 1) => write!(f, "{}", name),
            (0, c1) => write!(f, "{}*{}", c1, name),
            (c0, 1) => write!(f, "{} + {}", c0, name),
            (c0, c1) => write!(f, "{} + {}*{}", c0, c1, name),
        }
    }
}

/* ---- standard arithmetic operators ---- */

impl Add for Fp2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.check_same_field(rhs);
        Self::new(self.c0 + rhs.c0, self.c1 + rhs.c1, self.modulus)
    }
}

impl Sub for Fp2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.check_same_field(rhs);
        Self::new(self.c0 - rhs.c0, self.c1 - rhs.c1, self.modulus)
    }
}

impl Mul for Fp2 {
    type Output = Self;

    /// Karatsuba: three base multiplications plus one by `β`.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.check_same_field(rhs);
        let v0 = self.c0 * rhs.c0;
        let v1 = self.c1 * rhs.c1;
        let cross = (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - v0 - v1;
        Self::new(v0 + self.mul_by_beta(v1), cross, self.modulus)
    }
}

impl Neg for Fp2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.c0, -self.c1, self.modulus)
    }
}

impl Div for Fp2 {
    type Output = Self;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Self) -> Self::Output {
        self * rhs.inverse().expect("division by zero in Fp2")
    }
}

/* ---- implement Ring ---- */

impl Ring for Fp2 {
    #[inline]
    fn zero_like(&self) -> Self {
        self.modulus.zero()
    }

    #[inline]
    fn one_like(&self) -> Self {
        self.modulus.one()
    }

    fn from_u128_like(&self, n: u128) -> Self {
        self.modulus.lift(self.c0.from_u128_like(n))
    }
}

/* ---- implement Field ---- */

impl Field for Fp2 {
    fn inverse(self) -> Option<Self> {
        let norm_inv = self.norm().inverse()?;
        Some(self.conjugate().scale(norm_inv))
    }

    #[inline]
    fn characteristic(&self) -> u64 {
        self.modulus.base.value()
    }

    #[inline]
    fn order(&self) -> u128 {
        self.modulus.order()
    }

    /// Index `n` maps to `c0 = n mod p`, `c1 = (⌊n/p⌋ + 1) mod p`, so the
    /// elements `c + u` come first and the base field comes last.
    fn element_at(&self, index: u128) -> Self {
        let p = self.modulus.base.value() as u128;
        let n = index % (p * p);
        let c0 = (n % p) as u64;
        let c1 = ((n / p + 1) % p) as u64;
        self.modulus.element(c0, c1)
    }

    fn sort_key(&self) -> (u64, u64) {
        (self.c1.value(), self.c0.value())
    }

    /// Square root, normalised to the smaller of `±r` in `(c1, c0)` order.
    ///
    /// Every base-field element is a square in `F_{p²}`: residues keep their
    /// canonical base-field root, non-residues `a` get `sqrt(a/β)·u`.
    fn sqrt(self) -> Option<Self> {
        if let Some(a) = self.to_base() {
            let root = match a.sqrt() {
                Some(r) => self.modulus.lift(r),
                None => {
                    let s = (a / self.modulus.beta).sqrt()?;
                    Self::new(self.c0.zero_like(), s, self.modulus)
                }
            };
            return Some(Self::normalize_sqrt(root));
        }
        tonelli_shanks(self).map(Self::normalize_sqrt)
    }
}
