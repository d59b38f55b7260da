use core::ops::Div;

use rand::Rng;

use super::ring::Ring;

/// A finite (commutative) field.
///
/// Extends `Ring` with multiplicative inverses for all non-zero elements and
/// with the handful of finite-field facts the tower construction relies on:
/// the field order, a fixed enumeration of the elements, and a canonical
/// ordering used wherever a choice between conjugate values has to be made.
pub trait Field: Ring + Div<Output = Self> {
    /// Multiplicative inverse `a⁻¹`, if it exists.
    ///
    /// - `self == 0`  ⇒  `None`
    /// - otherwise    ⇒  `Some(a⁻¹)`
    fn inverse(self) -> Option<Self>;

    /// Safe division: returns `None` on division by zero.
    #[inline]
    fn try_div(self, rhs: Self) -> Option<Self> {
        rhs.inverse().map(|inv| self * inv)
    }

    /// The characteristic `p`.
    fn characteristic(&self) -> u64;

    /// The number of elements `q = p^k`.
    fn order(&self) -> u128;

    /// The element at position `index` (reduced modulo the order) in a fixed
    /// enumeration of the field. The enumeration is a bijection on `0..order`.
    fn element_at(&self, index: u128) -> Self;

    /// Integer coordinates `(c1, c0)` ordering elements canonically.
    ///
    /// Base-field elements have `c1 = 0`, so on them the order is the usual
    /// order of representatives in `[0, p-1]`.
    fn sort_key(&self) -> (u64, u64);

    /// A uniformly random element.
    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        self.element_at(rng.gen_range(0..self.order()))
    }

    /// Quadratic character: `1` for non-zero squares, `-1` for non-squares,
    /// `0` for zero.
    ///
    /// Uses Euler's criterion: `a^((q-1)/2)`.
    fn legendre(self) -> i8 {
        if self.is_zero() {
            return 0;
        }
        if self.pow((self.order() - 1) / 2).is_one() {
            1
        } else {
            -1
        }
    }

    /// Check if this element has a square root (zero included).
    #[inline]
    fn is_square(self) -> bool {
        self.legendre() >= 0
    }

    /// A square root of `self`, or `None` if `self` is not a square.
    fn sqrt(self) -> Option<Self> {
        tonelli_shanks(self)
    }

    /// Check whether `self` generates the multiplicative group, given the
    /// distinct prime factors of `order - 1`.
    fn is_generator(self, prime_factors: &[u128]) -> bool {
        if self.is_zero() {
            return false;
        }
        let group_order = self.order() - 1;
        prime_factors
            .iter()
            .all(|&q| !self.pow(group_order / q).is_one())
    }
}

/// Tonelli–Shanks over any odd-order finite field.
///
/// The quadratic non-residue is the first one met in the field's
/// enumeration starting at index 2, so the result is deterministic.
pub fn tonelli_shanks<F: Field>(a: F) -> Option<F> {
    if a.is_zero() {
        return Some(a);
    }
    if a.legendre() != 1 {
        return None;
    }

    let q = a.order();

    // Special case: q = 3 (mod 4)
    if q % 4 == 3 {
        return Some(a.pow((q + 1) / 4));
    }

    // Write q - 1 = Q * 2^S where Q is odd
    let mut odd = q - 1;
    let mut s = 0u32;
    while odd % 2 == 0 {
        odd /= 2;
        s += 1;
    }

    let mut index = 2u128;
    let mut z = a.element_at(index);
    while z.legendre() != -1 {
        index += 1;
        z = a.element_at(index);
    }

    let one = a.one_like();
    let mut m = s;
    let mut c = z.pow(odd);
    let mut t = a.pow(odd);
    let mut r = a.pow(odd.div_ceil(2));

    loop {
        if t == one {
            return Some(r);
        }

        // Find the least i such that t^(2^i) = 1
        let mut i = 1u32;
        let mut t_pow = t * t;
        while t_pow != one {
            t_pow = t_pow * t_pow;
            i += 1;
        }

        let b = c.pow(1u128 << (m - i - 1));
        m = i;
        c = b * b;
        t = t * c;
        r = r * b;
    }
}
