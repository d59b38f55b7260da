use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algebra::field::Field;
use crate::algebra::ring::Ring;

/// Seed of the generator used by [`Poly::roots`]. The returned roots are
/// sorted, so the seed only affects running time.
const ROOT_FINDING_SEED: u64 = 0x6973_6f74_6f77_6572;

/// Polynomial over a finite field `F`.
///
/// Coefficients are stored in ascending order of degree:
/// `coeffs[i]` is the coefficient of `x^i`.
///
/// The zero polynomial is represented as an empty coefficient vector.
#[derive(Clone, PartialEq, Eq)]
pub struct Poly<F: Field> {
    coeffs: Vec<F>,
}

impl<F: Field> Poly<F> {
    /// Create a polynomial from coefficients in ascending order.
    ///
    /// `coeffs[i]` is the coefficient of `x^i`.
    /// Trailing zeros are automatically removed.
    ///
    /// # Example
    ///
    /// ```
    /// use isotower::{Poly, PrimeModulus};
    ///
    /// let f17 = PrimeModulus::new(17).unwrap();
    ///
    /// // 3 + 2x + x^2
    /// let p = Poly::new(vec![f17.element(3), f17.element(2), f17.element(1)]);
    /// assert_eq!(p.degree(), Some(2));
    /// ```
    pub fn new(coeffs: Vec<F>) -> Self {
        let mut poly = Self { coeffs };
        poly.normalize();
        poly
    }

    /// Create the zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Create a constant polynomial.
    pub fn constant(c: F) -> Self {
        Self::new(vec![c])
    }

    /// Create the polynomial `x` over the field of `like`.
    pub fn x(like: F) -> Self {
        Self {
            coeffs: vec![like.zero_like(), like.one_like()],
        }
    }

    /// Create a monomial `c * x^n`.
    ///
    /// # Example
    ///
    /// ```
    /// use isotower::{Poly, PrimeModulus};
    ///
    /// let f17 = PrimeModulus::new(17).unwrap();
    ///
    /// let m = Poly::monomial(f17.element(3), 2);  // 3x^2
    /// assert_eq!(m.degree(), Some(2));
    /// assert_eq!(m.eval(f17.element(2)), f17.element(12));  // 3 * 4 = 12
    /// ```
    pub fn monomial(c: F, n: usize) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        let mut coeffs = vec![c.zero_like(); n + 1];
        coeffs[n] = c;
        Self { coeffs }
    }

    /// Check if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Get the degree of the polynomial.
    ///
    /// Returns `None` for the zero polynomial, `Some(n)` otherwise
    /// where `n` is the highest power with a non-zero coefficient.
    pub fn degree(&self) -> Option<usize> {
        if self.coeffs.is_empty() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    /// Get the leading coefficient.
    ///
    /// Returns `None` for the zero polynomial.
    pub fn leading_coeff(&self) -> Option<F> {
        self.coeffs.last().copied()
    }

    /// Get the coefficient of `x^i`, or `None` beyond the degree.
    pub fn coeff(&self, i: usize) -> Option<F> {
        self.coeffs.get(i).copied()
    }

    /// Get a slice of all coefficients.
    pub fn coefficients(&self) -> &[F] {
        &self.coeffs
    }

    /// Evaluate the polynomial at a point using Horner's method.
    ///
    /// # Example
    ///
    /// ```
    /// use isotower::{Poly, PrimeModulus};
    ///
    /// let f17 = PrimeModulus::new(17).unwrap();
    ///
    /// // p(x) = 1 + 2x + 3x^2
    /// let p = Poly::new(vec![f17.element(1), f17.element(2), f17.element(3)]);
    ///
    /// // p(2) = 1 + 4 + 12 = 17 ≡ 0 (mod 17)
    /// assert_eq!(p.eval(f17.element(2)), f17.zero());
    /// ```
    pub fn eval(&self, x: F) -> F {
        // Horner's method: p(x) = a_0 + x(a_1 + x(a_2 + ... + x*a_n))
        let mut result = x.zero_like();
        for &coeff in self.coeffs.iter().rev() {
            result = result * x + coeff;
        }
        result
    }

    /// Remove trailing zero coefficients.
    fn normalize(&mut self) {
        while self.coeffs.last().is_some_and(|c| c.is_zero()) {
            self.coeffs.pop();
        }
    }

    /// Coefficient of `x^i`, zero beyond the degree.
    fn coeff_or(&self, i: usize, zero: F) -> F {
        self.coeffs.get(i).copied().unwrap_or(zero)
    }

    /// Create a polynomial from its roots: `(x - r1)(x - r2)...(x - rn)`.
    ///
    /// Returns `None` for an empty root list, whose field is unknown.
    pub fn from_roots(roots: &[F]) -> Option<Self> {
        let (&first, rest) = roots.split_first()?;
        let one = first.one_like();

        let mut result = Self::new(vec![-first, one]); // (x - r0)
        for &root in rest {
            result = result * Self::new(vec![-root, one]); // (x - ri)
        }
        Some(result)
    }

    /// Make the polynomial monic (leading coefficient = 1).
    ///
    /// Returns `None` if the polynomial is zero.
    pub fn monic(&self) -> Option<Self> {
        let lc = self.leading_coeff()?;
        let inv = lc.inverse()?;
        Some(self.scale(inv))
    }

    /// Multiply every coefficient by `k`.
    pub fn scale(&self, k: F) -> Self {
        Self::new(self.coeffs.iter().map(|&c| c * k).collect())
    }

    /// Formal derivative.
    pub fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| c * c.from_u128_like(i as u128))
            .collect();
        Self::new(coeffs)
    }

    /// Euclidean division: compute quotient and remainder.
    ///
    /// Returns `(q, r)` such that `self = q * divisor + r` and `deg(r) < deg(divisor)`.
    ///
    /// Returns `None` if the divisor is zero.
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        let divisor_deg = divisor.degree()?;
        let divisor_lc = divisor.leading_coeff()?;

        // If dividend degree < divisor degree, quotient is 0
        match self.degree() {
            None => return Some((Self::zero(), Self::zero())),
            Some(d) if d < divisor_deg => return Some((Self::zero(), self.clone())),
            _ => {}
        }

        let lc_inv = divisor_lc.inverse()?;
        let mut remainder = self.clone();
        let mut quotient_coeffs =
            vec![divisor_lc.zero_like(); self.coeffs.len() - divisor.coeffs.len() + 1];

        while let (Some(rem_deg), Some(rem_lc)) = (remainder.degree(), remainder.leading_coeff()) {
            if rem_deg < divisor_deg {
                break;
            }

            let coeff = rem_lc * lc_inv;
            let deg_diff = rem_deg - divisor_deg;

            quotient_coeffs[deg_diff] = coeff;

            // remainder -= coeff * x^deg_diff * divisor
            for (i, &d_coeff) in divisor.coeffs.iter().enumerate() {
                remainder.coeffs[i + deg_diff] = remainder.coeffs[i + deg_diff] - coeff * d_coeff;
            }
            remainder.normalize();
        }

        Some((Self::new(quotient_coeffs), remainder))
    }

    /// Compute the remainder of division.
    ///
    /// Returns `None` if the divisor is zero.
    pub fn rem(&self, divisor: &Self) -> Option<Self> {
        self.div_rem(divisor).map(|(_, r)| r)
    }

    /// Compute the greatest common divisor of two polynomials.
    ///
    /// The result is monic (leading coefficient = 1) unless both inputs are zero.
    ///
    /// # Example
    ///
    /// ```
    /// use isotower::{Poly, PrimeModulus};
    ///
    /// let f17 = PrimeModulus::new(17).unwrap();
    ///
    /// // gcd((x-1)(x-2), (x-2)(x-3)) = (x-2)
    /// let p1 = Poly::from_roots(&[f17.element(1), f17.element(2)]).unwrap();
    /// let p2 = Poly::from_roots(&[f17.element(2), f17.element(3)]).unwrap();
    /// let g = Poly::gcd(&p1, &p2);
    ///
    /// assert_eq!(g.degree(), Some(1));
    /// assert_eq!(g.eval(f17.element(2)), f17.zero());
    /// ```
    pub fn gcd(a: &Self, b: &Self) -> Self {
        let mut a = a.clone();
        let mut b = b.clone();
        while let Some(r) = a.rem(&b) {
            a = b;
            b = r;
        }
        a.monic().unwrap_or_else(Self::zero)
    }

    /// Compute `base^exp mod self` using repeated squaring.
    ///
    /// Returns `None` if self is zero.
    pub fn powmod(&self, base: &Self, exp: u128) -> Option<Self> {
        let one = self.leading_coeff()?.one_like();

        let mut b = base.rem(self)?;
        let mut result = Self::constant(one).rem(self)?;
        let mut e = exp;

        while e > 0 {
            if e & 1 == 1 {
                result = (result * &b).rem(self)?;
            }
            b = (b.clone() * &b).rem(self)?;
            e >>= 1;
        }

        Some(result)
    }

    /// The distinct roots of `self` in `F`, sorted by [`Field::sort_key`].
    ///
    /// Uses a fixed seed, so repeated calls give identical results.
    ///
    /// # Example
    ///
    /// ```
    /// use isotower::{Poly, PrimeModulus};
    ///
    /// let f17 = PrimeModulus::new(17).unwrap();
    ///
    /// // (x - 5)^2 (x - 3)(x^2 + 1) has roots 3, 4, 5, 13 mod 17
    /// let f = Poly::from_roots(&[f17.element(5), f17.element(5), f17.element(3)]).unwrap()
    ///     * Poly::new(vec![f17.one(), f17.zero(), f17.one()]);
    /// let roots: Vec<u64> = f.roots().iter().map(|r| r.value()).collect();
    /// assert_eq!(roots, vec![3, 4, 5, 13]);
    /// ```
    pub fn roots(&self) -> Vec<F> {
        let mut rng = StdRng::seed_from_u64(ROOT_FINDING_SEED);
        self.roots_with_rng(&mut rng)
    }

    /// The least root in [`Field::sort_key`] order, if any.
    pub fn any_root(&self) -> Option<F> {
        self.roots().into_iter().next()
    }

    /// Distinct roots, sorted, using the caller's randomness for the
    /// equal-degree splitting.
    pub fn roots_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<F> {
        let Some(f) = self.monic() else {
            return vec![];
        };
        if f.degree() == Some(0) {
            return vec![];
        }
        let Some(lc) = f.leading_coeff() else {
            return vec![];
        };

        // g = gcd(x^q - x, f) is the product of the distinct linear factors
        let x = Self::x(lc);
        let x_q = match f.powmod(&x, lc.order()) {
            Some(r) => r,
            None => return vec![],
        };
        let g = Self::gcd(&(x_q - &x), &f);

        let mut roots = Vec::new();
        g.split_linear(rng, &mut roots);
        roots.sort_by_key(|r| r.sort_key());
        roots
    }

    /// Split a monic product of distinct linear factors (Cantor–Zassenhaus).
    fn split_linear<R: Rng + ?Sized>(&self, rng: &mut R, roots: &mut Vec<F>) {
        let (Some(n), Some(lc)) = (self.degree(), self.leading_coeff()) else {
            return;
        };
        match n {
            0 => return,
            1 => {
                roots.push(-self.coeffs[0]);
                return;
            }
            _ => {}
        }

        let one = Self::constant(lc.one_like());
        let half_order = (lc.order() - 1) / 2;
        loop {
            // (x + δ)^((q-1)/2) - 1 picks out roughly half of the roots
            let shift = Self::new(vec![lc.random(rng), lc.one_like()]);
            let Some(b) = self.powmod(&shift, half_order) else {
                return;
            };
            let g = Self::gcd(&(b - &one), self);
            let Some(d) = g.degree() else {
                continue;
            };
            if d == 0 || d == n {
                continue;
            }
            if let Some((other, _)) = self.div_rem(&g) {
                g.split_linear(rng, roots);
                other.split_linear(rng, roots);
                return;
            }
        }
    }
}

/* ---- Arithmetic operators ---- */

impl<F: Field> Add<&Poly<F>> for Poly<F> {
    type Output = Self;

    fn add(self, rhs: &Poly<F>) -> Self::Output {
        let Some(zero) = self.leading_coeff().or(rhs.leading_coeff()) else {
            return Self::zero();
        };
        let zero = zero.zero_like();
        let max_len = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..max_len)
            .map(|i| self.coeff_or(i, zero) + rhs.coeff_or(i, zero))
            .collect();
        Self::new(coeffs)
    }
}

impl<F: Field> Add for Poly<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self + &rhs
    }
}

impl<F: Field> Neg for Poly<F> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        let coeffs = self.coeffs.into_iter().map(|c| -c).collect();
        Self { coeffs }
    }
}

impl<F: Field> Sub<&Poly<F>> for Poly<F> {
    type Output = Self;

    fn sub(self, rhs: &Poly<F>) -> Self::Output {
        self + &(-rhs.clone())
    }
}

impl<F: Field> Sub for Poly<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + &(-rhs)
    }
}

impl<F: Field> Mul<&Poly<F>> for Poly<F> {
    type Output = Self;

    /// Polynomial multiplication using naive O(n*m) convolution.
    fn mul(self, rhs: &Poly<F>) -> Self::Output {
        let (Some(lc), false) = (self.leading_coeff(), rhs.is_zero()) else {
            return Self::zero();
        };

        let n = self.coeffs.len();
        let m = rhs.coeffs.len();
        let mut coeffs = vec![lc.zero_like(); n + m - 1];

        for i in 0..n {
            for j in 0..m {
                coeffs[i + j] = coeffs[i + j] + self.coeffs[i] * rhs.coeffs[j];
            }
        }

        Self::new(coeffs)
    }
}

impl<F: Field> Mul for Poly<F> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self * &rhs
    }
}

impl<F: Field + fmt::Display> fmt::Debug for Poly<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (i, &coeff) in self.coeffs.iter().enumerate().rev() {
            if coeff.is_zero() {
                continue;
            }

            if !first {
                write!(f, " + ")?;
            }
            first = false;

            match i {
                0 => write!(f, "{}", coeff)?,
                1 if coeff.is_one() => write!(f, "x")?,
                1 => write!(f, "({})*x", coeff)?,
                _ if coeff.is_one() => write!(f, "x^{}", i)?,
                _ => write!(f, "({})*x^{}", coeff, i)?,
            }
        }

        Ok(())
    }
}

impl<F: Field + fmt::Display> fmt::Display for Poly<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
