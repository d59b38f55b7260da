//! The field tower `F_p ⊂ F_{p²}` and its canonical constants.
//!
//! Every constant is chosen deterministically, so two towers built for the
//! same prime agree bit for bit (see [`FieldTower::snapshot`]).

use log::debug;

use crate::algebra::field::Field;
use crate::algebra::ring::Ring;
use crate::error::{ensure, Error, Result};
use crate::structures::fp::{PrimeModulus, MAX_MODULUS};
use crate::structures::fp2::{ExtensionMode, Fp2, QuadraticModulus};
use crate::structures::poly::Poly;
use crate::utils::{factor, next_prime};

/// Smallest supported characteristic; `1/5` has to exist.
pub const MIN_PRIME: u64 = 7;

/// Supported bit lengths for the prime search.
pub const BIT_RANGE: core::ops::RangeInclusive<u32> = 2..=62;

/// The least prime above `2^bits`, restricted to `p ≡ 3 (mod 4)` when
/// `complex` is set. Primes below [`MIN_PRIME`] are skipped.
///
/// # Errors
///
/// [`Error::UnsupportedBitLength`] outside [`BIT_RANGE`],
/// [`Error::NoPrimeFound`] when the search leaves `p < 2^63`.
pub fn find_prime(bits: u32, complex: bool) -> Result<u64> {
    if !BIT_RANGE.contains(&bits) {
        return Err(Error::UnsupportedBitLength(bits));
    }
    let mut candidate = (1u64 << bits).max(MIN_PRIME - 1);
    loop {
        candidate = next_prime(candidate)
            .filter(|&p| p < MAX_MODULUS)
            .ok_or(Error::NoPrimeFound { bits })?;
        if !complex || candidate % 4 == 3 {
            debug!("prime search: 2^{} -> {}", bits, candidate);
            return Ok(candidate);
        }
    }
}

/// `F_p`, `F_{p²}` and the constants derived from them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldTower {
    base: PrimeModulus,
    ext: QuadraticModulus,
    i: Fp2,
    generator: Fp2,
    zeta3: Option<Fp2>,
    zeta5: Option<Fp2>,
    sqrt2: Fp2,
    sqrt5: Fp2,
    turn_tail25: Option<Fp2>,
    dual_x1_5: Fp2,
}

/// Integer representatives `(c0, c1)` of every tower constant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TowerSnapshot {
    pub p: u64,
    pub mode: ExtensionMode,
    pub i: (u64, u64),
    pub generator: (u64, u64),
    pub zeta3: Option<(u64, u64)>,
    pub zeta5: Option<(u64, u64)>,
    pub sqrt2: (u64, u64),
    pub sqrt5: (u64, u64),
    pub turn_tail25: Option<(u64, u64)>,
    pub dual_x1_5: (u64, u64),
}

fn coords(a: Fp2) -> (u64, u64) {
    (a.c0().value(), a.c1().value())
}

impl FieldTower {
    /// Build the tower for `p`: complex extension when `p ≡ 3 (mod 4)`,
    /// generic otherwise.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPrime`] unless `p` is a prime with `7 ≤ p < 2^63`;
    /// [`Error::InvariantViolated`] if a derived constant fails its check.
    pub fn build(p: u64) -> Result<Self> {
        if p < MIN_PRIME {
            return Err(Error::InvalidPrime(p));
        }
        let base = PrimeModulus::new(p)?;
        Self::with_extension(QuadraticModulus::for_prime(base))
    }

    /// Build the constants over an explicitly presented extension.
    pub fn with_extension(ext: QuadraticModulus) -> Result<Self> {
        let base = ext.base();
        let p = base.value();
        if p < MIN_PRIME {
            return Err(Error::InvalidPrime(p));
        }
        debug!("building tower over {:?}", ext);

        let i = match ext.mode() {
            ExtensionMode::Complex => ext.gen(),
            ExtensionMode::Generic { .. } => match base.element(p - 1).sqrt() {
                Some(root) => ext.lift(root.max_conjugate()),
                // p = 3 (mod 4) presented generically: i lies outside F_p
                None => (-ext.one())
                    .sqrt()
                    .ok_or(Error::InvariantViolated { what: "-1 is a square in F_{p^2}" })?,
            },
        };
        ensure(i * i == -ext.one(), "i^2 = -1")?;

        let generator = primitive_element(ext)?;
        let zeta3 = root_of_unity(ext, 3)?;
        let zeta5 = root_of_unity(ext, 5)?;

        let two = ext.element(2, 0);
        let five = ext.element(5, 0);
        let sqrt2 = two
            .sqrt()
            .ok_or(Error::InvariantViolated { what: "2 is a square in F_{p^2}" })?;
        ensure(sqrt2 * sqrt2 == two, "SQRT2^2 = 2")?;

        let (turn_tail25, sqrt5) = match turn_tail(ext) {
            Some((w, s)) => (Some(w), s),
            None => {
                debug!("p = {}: w^4 + 2w^2 + 1/5 has no root, using sqrt(5)", p);
                let s = five
                    .sqrt()
                    .ok_or(Error::InvariantViolated { what: "5 is a square in F_{p^2}" })?;
                (None, s)
            }
        };
        ensure(sqrt5 * sqrt5 == five, "SQRT5^2 = 5")?;

        let half = ext
            .one()
            .try_div(two)
            .ok_or(Error::InvariantViolated { what: "2 is invertible" })?;
        let dual_x1_5 = (ext.element(11, 0) + five * sqrt5) * half;

        Ok(Self {
            base,
            ext,
            i,
            generator,
            zeta3,
            zeta5,
            sqrt2,
            sqrt5,
            turn_tail25,
            dual_x1_5,
        })
    }

    #[inline]
    pub fn p(&self) -> u64 {
        self.base.value()
    }

    #[inline]
    pub fn base(&self) -> PrimeModulus {
        self.base
    }

    #[inline]
    pub fn ext(&self) -> QuadraticModulus {
        self.ext
    }

    /// The canonical square root of `−1`.
    #[inline]
    pub fn i(&self) -> Fp2 {
        self.i
    }

    /// A generator of `F_{p²}^×`.
    #[inline]
    pub fn generator(&self) -> Fp2 {
        self.generator
    }

    /// A primitive cube root of unity, when `3 | p² − 1`.
    #[inline]
    pub fn zeta3(&self) -> Option<Fp2> {
        self.zeta3
    }

    /// A primitive fifth root of unity, when `5 | p² − 1`.
    #[inline]
    pub fn zeta5(&self) -> Option<Fp2> {
        self.zeta5
    }

    #[inline]
    pub fn sqrt2(&self) -> Fp2 {
        self.sqrt2
    }

    #[inline]
    pub fn sqrt5(&self) -> Fp2 {
        self.sqrt5
    }

    /// The root `w` of `w⁴ + 2w² + 1/5` that `sqrt5` came from, if any.
    #[inline]
    pub fn turn_tail25(&self) -> Option<Fp2> {
        self.turn_tail25
    }

    /// `11/2 + 5·sqrt5/2`.
    #[inline]
    pub fn dual_x1_5(&self) -> Fp2 {
        self.dual_x1_5
    }

    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            p: self.p(),
            mode: self.ext.mode(),
            i: coords(self.i),
            generator: coords(self.generator),
            zeta3: self.zeta3.map(coords),
            zeta5: self.zeta5.map(coords),
            sqrt2: coords(self.sqrt2),
            sqrt5: coords(self.sqrt5),
            turn_tail25: self.turn_tail25.map(coords),
            dual_x1_5: coords(self.dual_x1_5),
        }
    }
}

/// First element of the enumeration of order `p² − 1`.
fn primitive_element(ext: QuadraticModulus) -> Result<Fp2> {
    let p = ext.base().value();
    let mut primes: Vec<u128> = factor(p - 1)
        .into_iter()
        .chain(factor(p + 1))
        .map(|(q, _)| q as u128)
        .collect();
    primes.sort_unstable();
    primes.dedup();

    let zero = ext.zero();
    (0..ext.order())
        .map(|n| zero.element_at(n))
        .find(|a| a.is_generator(&primes))
        .ok_or(Error::InvariantViolated { what: "F_{p^2}^* is cyclic" })
}

/// The first root of `xⁿ − 1` other than `1`, when `n | p² − 1`.
fn root_of_unity(ext: QuadraticModulus, n: usize) -> Result<Option<Fp2>> {
    if (ext.order() - 1) % n as u128 != 0 {
        return Ok(None);
    }
    let one = ext.one();
    let cyclotomic = Poly::monomial(one, n) - Poly::constant(one);
    let zeta = cyclotomic
        .roots()
        .into_iter()
        .find(|r| !r.is_one())
        .ok_or(Error::InvariantViolated { what: "x^n - 1 splits" })?;
    ensure(zeta.pow(n as u128).is_one(), "zeta^n = 1")?;
    Ok(Some(zeta))
}

/// The first root `w` of `w⁴ + 2w² + 1/5` and `sqrt5 = 2 / (w² + 1)`.
fn turn_tail(ext: QuadraticModulus) -> Option<(Fp2, Fp2)> {
    let one = ext.one();
    let fifth = one.try_div(ext.element(5, 0))?;
    let quartic = Poly::new(vec![fifth, ext.zero(), ext.element(2, 0), ext.zero(), one]);
    let w = quartic.any_root()?;
    let sqrt5 = ext.element(2, 0).try_div(w * w + one)?;
    Some((w, sqrt5))
}
