//! The `Setting`: one prime, its field tower, a supersingular j-invariant and
//! optionally the level chain anchored at it.
//!
//! # Example
//!
//! ```
//! use isotower::{Setting, SettingConfig};
//!
//! let config = SettingConfig::builder().prime(431).build().unwrap();
//! let setting = Setting::new(&config).unwrap();
//!
//! let i = setting.tower().i();
//! assert_eq!(i * i, -setting.ext().one());
//! assert_eq!(setting.j_invariant(), setting.ext().element(1728, 0));
//! ```

use log::debug;

use crate::cm::{build_supersingular_curve, SupersingularCurve};
use crate::curve::{CurveFactory, EllipticCurve};
use crate::error::{Error, Result};
use crate::export::{magma_system, MultiPoly};
use crate::level::{LevelChain, LevelFactory};
use crate::structures::fp::PrimeModulus;
use crate::structures::fp2::{Fp2, QuadraticModulus};
use crate::structures::poly::Poly;
use crate::tower::{find_prime, FieldTower, BIT_RANGE, MIN_PRIME};

/// How to choose the prime.
///
/// An explicit `prime` wins over `bits`; `complex` only restricts the
/// search above `2^bits` to `p ≡ 3 (mod 4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettingConfig {
    pub prime: Option<u64>,
    pub bits: Option<u32>,
    pub complex: bool,
}

impl Default for SettingConfig {
    fn default() -> Self {
        Self {
            prime: None,
            bits: None,
            complex: true,
        }
    }
}

impl SettingConfig {
    /// Start a builder with the defaults.
    #[must_use]
    pub fn builder() -> SettingConfigBuilder {
        SettingConfigBuilder::new()
    }

    /// Check the configuration without searching for a prime.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPrime`], [`Error::UnsupportedBitLength`] or
    /// [`Error::MissingPrime`].
    pub fn validate(&self) -> Result<()> {
        match (self.prime, self.bits) {
            (Some(p), _) => {
                if p < MIN_PRIME {
                    return Err(Error::InvalidPrime(p));
                }
                PrimeModulus::new(p).map(|_| ())
            }
            (None, Some(bits)) if !BIT_RANGE.contains(&bits) => {
                Err(Error::UnsupportedBitLength(bits))
            }
            (None, Some(_)) => Ok(()),
            (None, None) => Err(Error::MissingPrime),
        }
    }

    /// The prime this configuration designates.
    pub fn resolve_prime(&self) -> Result<u64> {
        self.validate()?;
        match (self.prime, self.bits) {
            (Some(p), _) => Ok(p),
            (None, Some(bits)) => find_prime(bits, self.complex),
            (None, None) => Err(Error::MissingPrime),
        }
    }
}

/// Builder for [`SettingConfig`].
///
/// ```
/// use isotower::SettingConfig;
///
/// let config = SettingConfig::builder().bits(16).complex(false).build().unwrap();
/// assert_eq!(config.resolve_prime().unwrap(), 65537);
/// ```
#[derive(Debug, Clone)]
pub struct SettingConfigBuilder {
    config: SettingConfig,
}

impl Default for SettingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SettingConfig::default(),
        }
    }

    /// Use this prime.
    #[must_use]
    pub fn prime(mut self, p: u64) -> Self {
        self.config.prime = Some(p);
        self
    }

    /// Search for the least suitable prime above `2^bits`.
    #[must_use]
    pub fn bits(mut self, bits: u32) -> Self {
        self.config.bits = Some(bits);
        self
    }

    /// Restrict the prime search to `p ≡ 3 (mod 4)`. Default `true`.
    #[must_use]
    pub fn complex(mut self, complex: bool) -> Self {
        self.config.complex = complex;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<SettingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Everything derived from one prime.
#[derive(Debug)]
pub struct Setting {
    tower: FieldTower,
    j_invariant: Fp2,
    discriminant: Option<i64>,
    chain: Option<LevelChain>,
}

impl Setting {
    /// Build the tower and a supersingular j-invariant. No level chain.
    ///
    /// # Errors
    ///
    /// Configuration errors, or [`Error::InvariantViolated`] if a
    /// construction check fails.
    pub fn new(config: &SettingConfig) -> Result<Self> {
        let p = config.resolve_prime()?;
        let tower = FieldTower::build(p)?;
        let curve = build_supersingular_curve(tower.ext())?;
        debug!(
            "setting p = {}: j0 = {} (discriminant {:?})",
            p,
            curve.j_invariant(),
            curve.discriminant()
        );
        Ok(Self {
            tower,
            j_invariant: curve.j_invariant(),
            discriminant: curve.discriminant(),
            chain: None,
        })
    }

    /// Shorthand for a setting over an explicit prime.
    pub fn for_prime(p: u64) -> Result<Self> {
        Self::new(&SettingConfig::builder().prime(p).build()?)
    }

    /// [`Setting::new`] followed by the level chain from `factory`.
    pub fn with_levels<L: LevelFactory + ?Sized>(config: &SettingConfig, factory: &L) -> Result<Self> {
        let mut setting = Self::new(config)?;
        setting.chain = Some(LevelChain::build(factory, setting.j_invariant, &setting.tower)?);
        Ok(setting)
    }

    #[inline]
    pub fn p(&self) -> u64 {
        self.tower.p()
    }

    #[inline]
    pub fn tower(&self) -> &FieldTower {
        &self.tower
    }

    #[inline]
    pub fn ext(&self) -> QuadraticModulus {
        self.tower.ext()
    }

    /// The supersingular j-invariant anchoring the level chain.
    #[inline]
    pub fn j_invariant(&self) -> Fp2 {
        self.j_invariant
    }

    /// The CM discriminant used, `None` when `p ≡ 3 (mod 4)`.
    #[inline]
    pub fn discriminant(&self) -> Option<i64> {
        self.discriminant
    }

    pub fn chain(&self) -> Option<&LevelChain> {
        self.chain.as_ref()
    }

    /// Rebuild the supersingular curve the j-invariant came from.
    pub fn supersingular_curve(&self) -> Result<SupersingularCurve> {
        build_supersingular_curve(self.ext())
    }

    pub fn montgomery_curve(&self, a: Fp2) -> EllipticCurve<Fp2> {
        CurveFactory::montgomery(a)
    }

    pub fn legendre_curve(&self, lambda: Fp2) -> EllipticCurve<Fp2> {
        CurveFactory::legendre(lambda)
    }

    /// Distinct roots of `f` in `F_{p²}`, in canonical order.
    pub fn roots(&self, f: &Poly<Fp2>) -> Vec<Fp2> {
        f.roots()
    }

    /// Polynomial ring variables over `F_{p²}`.
    pub fn variables(&self, names: &[&str]) -> Vec<MultiPoly<Fp2>> {
        MultiPoly::variables(names, self.ext().one())
    }

    /// A Magma script for the system `equations` over this setting's field.
    pub fn magma_system(&self, equations: &[MultiPoly<Fp2>]) -> String {
        magma_system(self.ext(), equations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SettingConfig::default();
        assert!(config.complex);
        assert_eq!(config.prime, None);
        assert_eq!(config.validate(), Err(Error::MissingPrime));
        assert_eq!(SettingConfig::builder().build(), Err(Error::MissingPrime));
    }

    #[test]
    fn validation() {
        let b = SettingConfig::builder;
        assert_eq!(b().prime(5).build(), Err(Error::InvalidPrime(5)));
        assert_eq!(b().prime(91).build(), Err(Error::InvalidPrime(91)));
        assert_eq!(b().bits(63).build(), Err(Error::UnsupportedBitLength(63)));
        assert_eq!(b().bits(0).build(), Err(Error::UnsupportedBitLength(0)));
        // an explicit prime wins over the bit length
        let config = b().prime(431).bits(63).build().unwrap();
        assert_eq!(config.resolve_prime(), Ok(431));
    }

    #[test]
    fn prime_from_bits() {
        let complex = SettingConfig::builder().bits(8).build().unwrap();
        assert_eq!(complex.resolve_prime(), Ok(263));
        let any = SettingConfig::builder().bits(8).complex(false).build().unwrap();
        assert_eq!(any.resolve_prime(), Ok(257));
    }

    #[test]
    fn setting_without_chain() {
        let s = Setting::for_prime(431).unwrap();
        assert_eq!(s.p(), 431);
        assert!(s.chain().is_none());
        assert_eq!(s.discriminant(), None);
        assert_eq!(s.supersingular_curve().unwrap().j_invariant(), s.j_invariant());
    }

    #[test]
    fn helpers_use_the_setting_field() {
        let s = Setting::for_prime(431).unwrap();
        let k = s.ext();
        let f = Poly::new(vec![k.one(), k.zero(), k.one()]);
        assert_eq!(s.roots(&f), vec![k.gen(), -k.gen()]);
        let xs = s.variables(&["x"]);
        assert!(s.magma_system(&xs).contains("P<x> := PolynomialRing(Fp2, 1, \"grevlex\");"));
        assert_eq!(
            s.montgomery_curve(k.zero()).j_invariant(),
            Some(k.element(1728, 0))
        );
    }
}
