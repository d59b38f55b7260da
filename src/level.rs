//! Seam to the modular-curve level algebra.
//!
//! The level objects themselves (parametrisations of `X₀(N)` and friends,
//! their Hecke maps and involutions) live outside this crate. The core only
//! starts the algebra from a j-invariant and walks a fixed chain of
//! `merge(sample_fw(d), d)` steps.

use core::fmt;

use log::debug;

use crate::error::Result;
use crate::structures::fp2::Fp2;
use crate::tower::FieldTower;

/// A point on a modular curve of some level `N`.
pub trait LevelParameter: fmt::Debug {
    /// The level `N`.
    fn level(&self) -> u32;

    /// The parameter value in `F_{p²}`.
    fn value(&self) -> Fp2;

    /// Sample a forward neighbour, optionally of a chosen degree `d`.
    fn sample_fw(&self, d: Option<u32>) -> Result<Box<dyn LevelParameter>>;

    /// Combine `self` with a neighbour into an object of higher level.
    fn merge(&self, other: &dyn LevelParameter, d: Option<u32>) -> Result<Box<dyn LevelParameter>>;
}

/// Entry point into a level algebra.
pub trait LevelFactory {
    /// The level-1 object for the j-invariant `j`.
    fn level1(&self, j: Fp2, tower: &FieldTower) -> Result<Box<dyn LevelParameter>>;
}

/// Degrees passed to the successive derivation steps `D0, A0, a0, r0`.
pub const CHAIN_DEGREES: [Option<u32>; 4] = [Some(2), None, None, None];

/// The objects `j0, D0, A0, a0, r0`, each merged from its predecessor.
#[derive(Debug)]
pub struct LevelChain {
    j0: Box<dyn LevelParameter>,
    d0: Box<dyn LevelParameter>,
    upper_a0: Box<dyn LevelParameter>,
    a0: Box<dyn LevelParameter>,
    r0: Box<dyn LevelParameter>,
}

fn derive(from: &dyn LevelParameter, d: Option<u32>) -> Result<Box<dyn LevelParameter>> {
    let sample = from.sample_fw(d)?;
    let merged = from.merge(&*sample, d)?;
    debug!(
        "level chain: {} -> {} (d = {:?})",
        from.level(),
        merged.level(),
        d
    );
    Ok(merged)
}

impl LevelChain {
    /// Build the chain anchored at `j`.
    ///
    /// # Errors
    ///
    /// Whatever the level algebra reports, typically [`crate::Error::Level`].
    pub fn build<L: LevelFactory + ?Sized>(factory: &L, j: Fp2, tower: &FieldTower) -> Result<Self> {
        let j0 = factory.level1(j, tower)?;
        let [d_d0, d_upper, d_a0, d_r0] = CHAIN_DEGREES;
        let d0 = derive(&*j0, d_d0)?;
        let upper_a0 = derive(&*d0, d_upper)?;
        let a0 = derive(&*upper_a0, d_a0)?;
        let r0 = derive(&*a0, d_r0)?;
        Ok(Self {
            j0,
            d0,
            upper_a0,
            a0,
            r0,
        })
    }

    pub fn j0(&self) -> &dyn LevelParameter {
        &*self.j0
    }

    pub fn d0(&self) -> &dyn LevelParameter {
        &*self.d0
    }

    /// `A0`.
    pub fn upper_a0(&self) -> &dyn LevelParameter {
        &*self.upper_a0
    }

    pub fn a0(&self) -> &dyn LevelParameter {
        &*self.a0
    }

    pub fn r0(&self) -> &dyn LevelParameter {
        &*self.r0
    }

    /// All five objects in derivation order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn LevelParameter + 'static)> + '_ {
        [&self.j0, &self.d0, &self.upper_a0, &self.a0, &self.r0]
            .into_iter()
            .map(|b| &**b)
    }
}
