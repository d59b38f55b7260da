//! Supersingular curve construction.
//!
//! For `p ≡ 3 (mod 4)` the curve `y² = x³ + x` is supersingular. Otherwise
//! the CM method is used: the least prime `q ≡ 3 (mod 4)` inert in
//! `Q(sqrt(−q))` gives a class polynomial whose roots modulo `p` are
//! supersingular j-invariants.

pub mod forms;
pub mod hilbert;

use log::debug;

use crate::algebra::field::Field;
use crate::curve::EllipticCurve;
use crate::error::{ensure, Error, Result};
use crate::structures::fp::{Fp, PrimeModulus};
use crate::structures::fp2::{Fp2, QuadraticModulus};
use crate::utils::{fundamental_discriminant, is_prime, legendre_symbol};

pub use hilbert::{hilbert_class_polynomial, reduce_mod_p};

/// Exclusive upper bound on the CM prime `q`, on top of `q < p`.
pub const DISCRIMINANT_SEARCH_LIMIT: u64 = 10_000;

/// Largest `p` for which the constructed curve is also point-counted.
pub const NAIVE_COUNT_LIMIT: u64 = 1 << 16;

/// Primes `q ≡ 3 (mod 4)` in ascending order, below a fixed bound.
#[derive(Clone, Debug)]
pub struct CmCandidates {
    next: u64,
    limit: u64,
}

impl CmCandidates {
    /// Candidates for the prime `p`: `3 ≤ q < min(p, DISCRIMINANT_SEARCH_LIMIT)`.
    pub fn for_prime(p: u64) -> Self {
        Self::below(p.min(DISCRIMINANT_SEARCH_LIMIT))
    }

    /// Candidates `3 ≤ q < limit`.
    pub fn below(limit: u64) -> Self {
        Self { next: 3, limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Iterator for CmCandidates {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        while self.next < self.limit {
            let q = self.next;
            self.next += 4;
            if is_prime(q) {
                return Some(q);
            }
        }
        None
    }
}

/// The least candidate `q` with `(−q / p) = −1`.
///
/// # Errors
///
/// [`Error::DiscriminantSearchExhausted`] when no candidate qualifies.
pub fn cm_discriminant(p: u64) -> Result<u64> {
    let mut candidates = CmCandidates::for_prime(p);
    let limit = candidates.limit();
    candidates
        .find(|&q| legendre_symbol(-(q as i64), p) == -1)
        .ok_or(Error::DiscriminantSearchExhausted { p, limit })
}

/// A supersingular curve over `F_{p²}` with `#E(F_p) = p + 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SupersingularCurve {
    curve: EllipticCurve<Fp2>,
    j_invariant: Fp2,
    discriminant: Option<i64>,
}

impl SupersingularCurve {
    pub fn curve(&self) -> &EllipticCurve<Fp2> {
        &self.curve
    }

    pub fn j_invariant(&self) -> Fp2 {
        self.j_invariant
    }

    /// The CM discriminant used, `None` for `y² = x³ + x`.
    pub fn discriminant(&self) -> Option<i64> {
        self.discriminant
    }

    /// `p + 1`.
    pub fn order(&self) -> u128 {
        self.j_invariant.characteristic() as u128 + 1
    }
}

/// The curve `y² = x³ + ax − a` with j-invariant `j`, or `y² = x³ + 1` for
/// `j = 0`, where `a = 27j / (4(1728 − j))`.
pub fn curve_with_j_invariant(j: Fp) -> Result<EllipticCurve<Fp>> {
    let m = j.modulus();
    if j == m.zero() {
        return Ok(EllipticCurve::short(m.zero(), m.one()));
    }
    let a = (m.element(27) * j)
        .try_div(m.element(4) * (m.element(1728) - j))
        .ok_or(Error::InvariantViolated { what: "j != 1728" })?;
    Ok(EllipticCurve::short(a, -a))
}

/// Build a supersingular curve over `ext` and verify it.
///
/// # Errors
///
/// Configuration errors from the discriminant search and class polynomial,
/// [`Error::InvariantViolated`] if the result fails verification.
pub fn build_supersingular_curve(ext: QuadraticModulus) -> Result<SupersingularCurve> {
    let base: PrimeModulus = ext.base();
    let p = base.value();

    let (curve, discriminant) = if p % 4 == 3 {
        (EllipticCurve::short(base.one(), base.zero()), None)
    } else {
        let q = cm_discriminant(p)?;
        let d = fundamental_discriminant(-(q as i64)).ok_or(Error::InvalidDiscriminant(-(q as i64)))?;
        debug!("p = {}: CM discriminant {}", p, d);

        let h = reduce_mod_p(&hilbert_class_polynomial(d)?, base);
        let j = h.any_root().ok_or(Error::NoClassPolynomialRoot {
            discriminant: d,
            p,
        })?;
        debug!("p = {}: j = {} from a degree {:?} class polynomial", p, j, h.degree());
        (curve_with_j_invariant(j)?, Some(d))
    };

    if p <= NAIVE_COUNT_LIMIT {
        ensure(curve.count_points() == p as u128 + 1, "#E(F_p) = p + 1")?;
    }
    let lifted = curve.base_change(ext);
    ensure(lifted.is_supersingular(), "curve is supersingular")?;
    let j_invariant = lifted
        .j_invariant()
        .ok_or(Error::InvariantViolated { what: "curve is non-singular" })?;

    Ok(SupersingularCurve {
        curve: lifted,
        j_invariant,
        discriminant,
    })
}
