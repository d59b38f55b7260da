use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::algebra::field::Field;
use crate::algebra::ring::Ring;
use crate::error::{Error, Result};
use crate::utils::is_prime;

/// Largest supported modulus (exclusive). Montgomery reduction needs
/// `T + m·p < 2^128` for `T < p·2^64`, and additions must not overflow.
pub const MAX_MODULUS: u64 = 1 << 63;

/// Compute -P^(-1) mod 2^64 using the Newton-Raphson method.
const fn compute_p_inv(p: u64) -> u64 {
    // We want x such that p * x ≡ -1 (mod 2^64)
    // Each iteration doubles the number of correct bits.
    let mut x: u64 = 1;
    let mut i = 0;
    while i < 6 {
        x = x.wrapping_mul(2u64.wrapping_sub(p.wrapping_mul(x)));
        i += 1;
    }
    x.wrapping_neg()
}

/// Validated odd prime modulus with its Montgomery constants (R = 2^64).
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PrimeModulus {
    p: u64,
    /// -p^(-1) mod 2^64
    p_inv: u64,
    /// R mod p
    r: u64,
    /// R^2 mod p
    r2: u64,
}

impl PrimeModulus {
    /// Validate `p` and precompute its Montgomery constants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrime`] unless `p` is an odd prime below
    /// [`MAX_MODULUS`].
    pub fn new(p: u64) -> Result<Self> {
        if p < 3 || p >= MAX_MODULUS || !is_prime(p) {
            return Err(Error::InvalidPrime(p));
        }
        let r = (1u128 << 64) % (p as u128);
        let r2 = (r * r) % (p as u128);
        Ok(Self {
            p,
            p_inv: compute_p_inv(p),
            r: r as u64,
            r2: r2 as u64,
        })
    }

    /// The prime `p`.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.p
    }

    /// Montgomery reduction: given T < p * R, compute T * R^(-1) mod p.
    #[inline]
    fn reduce(&self, t: u128) -> u64 {
        let m = (t as u64).wrapping_mul(self.p_inv);
        let t = ((t + (m as u128) * (self.p as u128)) >> 64) as u64;
        if t >= self.p {
            t - self.p
        } else {
            t
        }
    }

    /// The element `value mod p`.
    #[inline]
    pub fn element(&self, value: u64) -> Fp {
        Fp::new(value, *self)
    }

    /// The zero of `F_p`.
    #[inline]
    pub fn zero(&self) -> Fp {
        Fp::from_mont(0, *self)
    }

    /// The one of `F_p`.
    #[inline]
    pub fn one(&self) -> Fp {
        Fp::from_mont(self.r, *self)
    }
}

impl fmt::Debug for PrimeModulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimeModulus({})", self.p)
    }
}

impl Hash for PrimeModulus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.p.hash(state);
    }
}

/// Prime field element of GF(p) for a runtime modulus `p < 2^63`.
///
/// Internally uses Montgomery representation for efficient multiplication.
/// Every element carries its modulus, so mixing elements of different
/// fields is caught by a debug assertion.
#[derive(Copy, Clone)]
pub struct Fp {
    /// Value stored in Montgomery form: value = aR mod p
    mont: u64,
    modulus: PrimeModulus,
}

#[cfg(feature = "serde")]
impl serde::Serialize for Fp {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value().serialize(serializer)
    }
}

impl Fp {
    /// Create a new field element from a standard integer.
    pub fn new(value: u64, modulus: PrimeModulus) -> Self {
        let reduced = value % modulus.p;
        Self {
            mont: modulus.reduce((reduced as u128) * (modulus.r2 as u128)),
            modulus,
        }
    }

    /// Create the element `value mod p` from a signed integer.
    pub fn from_i64(value: i64, modulus: PrimeModulus) -> Self {
        let magnitude = Self::new(value.unsigned_abs(), modulus);
        if value < 0 {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Create from a value already in Montgomery form.
    #[inline]
    pub(crate) const fn from_mont(mont: u64, modulus: PrimeModulus) -> Self {
        Self { mont, modulus }
    }

    /// The Montgomery form `aR mod p`.
    #[inline]
    pub(crate) const fn mont(self) -> u64 {
        self.mont
    }

    /// Get the representative in `[0, p-1]`.
    #[inline]
    pub fn value(self) -> u64 {
        self.modulus.reduce(self.mont as u128)
    }

    /// The modulus this element lives under.
    #[inline]
    pub const fn modulus(self) -> PrimeModulus {
        self.modulus
    }

    /// Return the canonical (smaller) of `±r`.
    #[inline]
    fn normalize_sqrt(r: Self) -> Self {
        let neg_r = -r;
        if r.value() <= neg_r.value() {
            r
        } else {
            neg_r
        }
    }

    /// The larger representative of `±self`.
    ///
    /// Used to pick a canonical square root of `-1` when `p = 1 (mod 4)`.
    pub fn max_conjugate(self) -> Self {
        let neg = -self;
        if self.value() >= neg.value() {
            self
        } else {
            neg
        }
    }

    #[inline]
    fn check_same_field(self, rhs: Self) {
        debug_assert_eq!(
            self.modulus.p, rhs.modulus.p,
            "Fp elements must share the same modulus"
        );
    }
}

impl PartialEq for Fp {
    fn eq(&self, other: &Self) -> bool {
        self.mont == other.mont && self.modulus.p == other.modulus.p
    }
}

impl Eq for Fp {}

impl Hash for Fp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mont.hash(state);
        self.modulus.p.hash(state);
    }
}

impl fmt::Debug for Fp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp<{}>({})", self.modulus.p, self.value())
    }
}

impl fmt::Display for Fp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl From<Fp> for u64 {
    fn from(fp: Fp) -> Self {
        fp.value()
    }
}

/* ---- standard arithmetic operators ---- */

impl Add for Fp {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.check_same_field(rhs);
        let p = self.modulus.p;
        let mut sum = self.mont + rhs.mont;
        if sum >= p {
            sum -= p;
        }
        Self::from_mont(sum, self.modulus)
    }
}

impl Sub for Fp {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.check_same_field(rhs);
        if self.mont >= rhs.mont {
            Self::from_mont(self.mont - rhs.mont, self.modulus)
        } else {
            Self::from_mont(self.mont + self.modulus.p - rhs.mont, self.modulus)
        }
    }
}

impl Mul for Fp {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.check_same_field(rhs);
        // (aR) * (bR) = abR^2, then reduce to get abR
        let prod = (self.mont as u128) * (rhs.mont as u128);
        Self::from_mont(self.modulus.reduce(prod), self.modulus)
    }
}

impl Neg for Fp {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        if self.mont == 0 {
            self
        } else {
            Self::from_mont(self.modulus.p - self.mont, self.modulus)
        }
    }
}

/// Division implemented via multiplicative inverse.
impl Div for Fp {
    type Output = Self;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Self) -> Self::Output {
        self * rhs.inverse().expect("division by zero in Fp")
    }
}

/* ---- implement Ring ---- */

impl Ring for Fp {
    #[inline]
    fn zero_like(&self) -> Self {
        self.modulus.zero()
    }

    #[inline]
    fn one_like(&self) -> Self {
        self.modulus.one()
    }

    fn from_u128_like(&self, n: u128) -> Self {
        let reduced = (n % self.modulus.p as u128) as u64;
        Self::new(reduced, self.modulus)
    }
}

/* ---- implement Field ---- */

impl Field for Fp {
    fn inverse(self) -> Option<Self> {
        if self.mont == 0 {
            return None;
        }

        // Convert out of Montgomery form, compute inverse, convert back
        let a = self.value();
        let m = self.modulus.p as i128;

        let (g, x, _) = egcd(a as i128, m);
        if g != 1 {
            return None;
        }

        let mut x = x % m;
        if x < 0 {
            x += m;
        }
        Some(Self::new(x as u64, self.modulus))
    }

    #[inline]
    fn characteristic(&self) -> u64 {
        self.modulus.p
    }

    #[inline]
    fn order(&self) -> u128 {
        self.modulus.p as u128
    }

    fn element_at(&self, index: u128) -> Self {
        self.from_u128_like(index)
    }

    fn sort_key(&self) -> (u64, u64) {
        (0, self.value())
    }

    /// Square root with the canonical (smaller) representative.
    ///
    /// For `p = 3 (mod 4)` this is `a^((p+1)/4)`; otherwise Tonelli–Shanks.
    fn sqrt(self) -> Option<Self> {
        crate::algebra::field::tonelli_shanks(self).map(Self::normalize_sqrt)
    }
}

/* ---- internal helper: extended Euclidean algorithm ---- */

/// Returns `(g, x, y)` such that `g = gcd(a, b)` and `a*x + b*y = g`.
fn egcd(a: i128, b: i128) -> (i128, i128, i128) {
    if b == 0 {
        (a, 1, 0)
    } else {
        let (g, x1, y1) = egcd(b, a % b);
        (g, y1, x1 - (a / b) * y1)
    }
}

/* ---- basic tests ---- */
