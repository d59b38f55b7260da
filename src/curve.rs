//! Elliptic curves `y² = x³ + a₂x² + a₄x + a₆` over a finite field.
//!
//! Only the arithmetic the supersingular construction needs: affine group
//! law, scalar multiplication, j-invariant and a supersingularity check.

use core::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algebra::field::Field;
use crate::algebra::ring::Ring;
use crate::structures::fp::Fp;
use crate::structures::fp2::{Fp2, QuadraticModulus};

/// Number of random points tested by [`EllipticCurve::is_supersingular`].
pub const SUPERSINGULARITY_ROUNDS: usize = 20;

const SUPERSINGULARITY_SEED: u64 = 0x7373_6375_7276_6573;

/// A point on an elliptic curve, in affine coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Point<F: Field> {
    /// The point at infinity `O`.
    Infinity,
    /// An affine point `(x, y)`.
    Affine { x: F, y: F },
}

impl<F: Field> Point<F> {
    pub fn is_infinity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    /// The x-coordinate, `None` at infinity.
    pub fn x(&self) -> Option<F> {
        match *self {
            Self::Infinity => None,
            Self::Affine { x, .. } => Some(x),
        }
    }
}

/// Elliptic curve in the Weierstrass form `y² = x³ + a₂x² + a₄x + a₆`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EllipticCurve<F: Field> {
    a2: F,
    a4: F,
    a6: F,
}

impl<F: Field> EllipticCurve<F> {
    /// The curve `y² = x³ + a₂x² + a₄x + a₆`. Not validated; see
    /// [`is_singular`](Self::is_singular).
    pub fn new(a2: F, a4: F, a6: F) -> Self {
        Self { a2, a4, a6 }
    }

    /// Short Weierstrass curve `y² = x³ + ax + b`.
    pub fn short(a: F, b: F) -> Self {
        Self::new(a.zero_like(), a, b)
    }

    pub fn a2(&self) -> F {
        self.a2
    }

    pub fn a4(&self) -> F {
        self.a4
    }

    pub fn a6(&self) -> F {
        self.a6
    }

    /// `b₂, b₄, b₆, b₈` for `a₁ = a₃ = 0`.
    fn b_invariants(&self) -> (F, F, F, F) {
        let four = self.a2.from_u128_like(4);
        let two = self.a2.from_u128_like(2);
        let b2 = four * self.a2;
        let b4 = two * self.a4;
        let b6 = four * self.a6;
        let b8 = four * self.a2 * self.a6 - self.a4 * self.a4;
        (b2, b4, b6, b8)
    }

    /// `Δ = −b₂²b₈ − 8b₄³ − 27b₆² + 9b₂b₄b₆`.
    pub fn discriminant(&self) -> F {
        let (b2, b4, b6, b8) = self.b_invariants();
        let k = |n: u128| self.a2.from_u128_like(n);
        -(b2 * b2 * b8) - k(8) * b4 * b4 * b4 - k(27) * b6 * b6 + k(9) * b2 * b4 * b6
    }

    pub fn is_singular(&self) -> bool {
        self.discriminant().is_zero()
    }

    /// `j = c₄³ / Δ`, `None` for a singular curve.
    pub fn j_invariant(&self) -> Option<F> {
        let (b2, b4, _, _) = self.b_invariants();
        let c4 = b2 * b2 - self.a2.from_u128_like(24) * b4;
        self.discriminant().inverse().map(|d| c4 * c4 * c4 * d)
    }

    /// The right-hand side `x³ + a₂x² + a₄x + a₆`.
    pub fn rhs(&self, x: F) -> F {
        ((x + self.a2) * x + self.a4) * x + self.a6
    }

    pub fn contains(&self, point: &Point<F>) -> bool {
        match *point {
            Point::Infinity => true,
            Point::Affine { x, y } => y * y == self.rhs(x),
        }
    }

    pub fn neg(&self, point: &Point<F>) -> Point<F> {
        match *point {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::Affine { x, y: -y },
        }
    }

    /// Chord-and-tangent addition.
    pub fn add(&self, p: &Point<F>, q: &Point<F>) -> Point<F> {
        let (x1, y1, x2, y2) = match (*p, *q) {
            (Point::Infinity, _) => return *q,
            (_, Point::Infinity) => return *p,
            (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => (x1, y1, x2, y2),
        };

        let lambda = if x1 == x2 {
            if (y1 + y2).is_zero() {
                return Point::Infinity;
            }
            let three = x1.from_u128_like(3);
            let two = x1.from_u128_like(2);
            (three * x1 * x1 + two * self.a2 * x1 + self.a4) / (two * y1)
        } else {
            (y2 - y1) / (x2 - x1)
        };

        let x3 = lambda * lambda - self.a2 - x1 - x2;
        let y3 = lambda * (x1 - x3) - y1;
        Point::Affine { x: x3, y: y3 }
    }

    pub fn double(&self, p: &Point<F>) -> Point<F> {
        self.add(p, p)
    }

    /// `[n]P` by double-and-add.
    pub fn mul(&self, p: &Point<F>, n: u128) -> Point<F> {
        let mut result = Point::Infinity;
        let mut base = *p;
        let mut e = n;
        while e > 0 {
            if e & 1 == 1 {
                result = self.add(&result, &base);
            }
            base = self.double(&base);
            e >>= 1;
        }
        result
    }

    /// A random affine point: random `x` until the right-hand side is a
    /// square, then a random sign for `y`.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point<F> {
        loop {
            let x = self.a2.random(rng);
            if let Some(y) = self.rhs(x).sqrt() {
                let y = if rng.gen::<bool>() { y } else { -y };
                return Point::Affine { x, y };
            }
        }
    }

    /// Probabilistic check that `[p+1]P = O` on the whole group.
    ///
    /// A supersingular curve defined over `F_p` (and any curve whose
    /// `p²`-Frobenius is `−p`) has `E(F_{p²}) ≅ (Z/(p+1))²`, so every point
    /// passes. Over `F_p`, an ordinary curve survives each round with
    /// probability at most one half. The seed is fixed.
    pub fn is_supersingular(&self) -> bool {
        if self.is_singular() {
            return false;
        }
        let order = self.a2.characteristic() as u128 + 1;
        let mut rng = StdRng::seed_from_u64(SUPERSINGULARITY_SEED);
        (0..SUPERSINGULARITY_ROUNDS).all(|_| {
            let p = self.random_point(&mut rng);
            self.mul(&p, order).is_infinity()
        })
    }
}

impl EllipticCurve<Fp> {
    /// `#E(F_p)` by summing Legendre symbols. Linear in `p`.
    pub fn count_points(&self) -> u128 {
        let p = self.a2.characteristic();
        let affine: i128 = (0..p)
            .map(|x| 1 + i128::from(self.rhs(self.a2.from_u128_like(x as u128)).legendre()))
            .sum();
        (affine + 1) as u128
    }

    /// The same curve over `F_{p²}`.
    pub fn base_change(&self, ext: QuadraticModulus) -> EllipticCurve<Fp2> {
        EllipticCurve::new(ext.lift(self.a2), ext.lift(self.a4), ext.lift(self.a6))
    }
}

impl EllipticCurve<Fp2> {
    /// The curve over `F_p` when all coefficients lie in the base field.
    pub fn descend(&self) -> Option<EllipticCurve<Fp>> {
        Some(EllipticCurve::new(
            self.a2.to_base()?,
            self.a4.to_base()?,
            self.a6.to_base()?,
        ))
    }
}

impl<F: Field + fmt::Display> fmt::Display for EllipticCurve<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y^2 = x^3")?;
        if !self.a2.is_zero() {
            write!(f, " + ({})*x^2", self.a2)?;
        }
        if !self.a4.is_zero() {
            write!(f, " + ({})*x", self.a4)?;
        }
        if !self.a6.is_zero() {
            write!(f, " + ({})", self.a6)?;
        }
        Ok(())
    }
}

/// Constructors for the two curve models used with isogeny formulas.
pub struct CurveFactory;

impl CurveFactory {
    /// Montgomery curve `y² = x³ + Ax² + x`.
    pub fn montgomery<F: Field>(a: F) -> EllipticCurve<F> {
        EllipticCurve::new(a, a.one_like(), a.zero_like())
    }

    /// Legendre curve `y² = x(x − 1)(x − λ) = x³ − (λ + 1)x² + λx`.
    pub fn legendre<F: Field>(lambda: F) -> EllipticCurve<F> {
        EllipticCurve::new(-(lambda + lambda.one_like()), lambda, lambda.zero_like())
    }
}
