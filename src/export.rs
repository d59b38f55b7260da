//! Sparse multivariate polynomials and a Magma printer for systems of them.
//!
//! Meant for checking a system of equations independently in Magma: the
//! printed script rebuilds `F_{p²}` with the same defining polynomial, the
//! polynomial ring, the ideal and asks for a Gröbner basis.

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};
use std::collections::BTreeMap;

use crate::algebra::field::Field;
use crate::structures::fp2::{ExtensionMode, Fp2, QuadraticModulus};

/// A polynomial in named variables, stored as exponent vector → coefficient.
///
/// Zero coefficients are never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct MultiPoly<F: Field> {
    vars: Vec<String>,
    terms: BTreeMap<Vec<u32>, F>,
}

impl<F: Field> MultiPoly<F> {
    /// The zero polynomial over `vars`.
    pub fn zero(vars: &[&str]) -> Self {
        Self {
            vars: vars.iter().map(|v| v.to_string()).collect(),
            terms: BTreeMap::new(),
        }
    }

    /// The constant `c`.
    pub fn constant(vars: &[&str], c: F) -> Self {
        let mut poly = Self::zero(vars);
        poly.add_term(vec![0; vars.len()], c);
        poly
    }

    /// The `index`-th variable.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn variable(vars: &[&str], index: usize, like: F) -> Self {
        assert!(index < vars.len(), "variable index out of range");
        let mut exps = vec![0; vars.len()];
        exps[index] = 1;
        let mut poly = Self::zero(vars);
        poly.add_term(exps, like.one_like());
        poly
    }

    /// All variables of `vars` at once.
    pub fn variables(vars: &[&str], like: F) -> Vec<Self> {
        (0..vars.len()).map(|i| Self::variable(vars, i, like)).collect()
    }

    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Total degree, `None` for zero.
    pub fn degree(&self) -> Option<u32> {
        self.terms.keys().map(|e| e.iter().sum()).max()
    }

    /// The coefficient of the monomial with exponents `exps`.
    pub fn coeff(&self, exps: &[u32]) -> Option<F> {
        self.terms.get(exps).copied()
    }

    /// Add `c · x^exps` in place.
    ///
    /// # Panics
    ///
    /// If `exps` does not have one entry per variable.
    pub fn add_term(&mut self, exps: Vec<u32>, c: F) {
        assert_eq!(exps.len(), self.vars.len(), "exponent vector length");
        if c.is_zero() {
            return;
        }
        let sum = match self.terms.get(&exps) {
            Some(&old) => old + c,
            None => c,
        };
        if sum.is_zero() {
            self.terms.remove(&exps);
        } else {
            self.terms.insert(exps, sum);
        }
    }

    /// Evaluate at `point`, one value per variable. `None` only for the
    /// zero polynomial in no variables, where there is no field to land in.
    ///
    /// # Panics
    ///
    /// If `point` has the wrong length.
    pub fn eval(&self, point: &[F]) -> Option<F> {
        assert_eq!(point.len(), self.vars.len(), "point dimension");
        let zero = point
            .first()
            .or_else(|| self.terms.values().next())
            .map(|x| x.zero_like())?;
        Some(self.terms.iter().fold(zero, |sum, (exps, &c)| {
            sum + exps
                .iter()
                .zip(point)
                .fold(c, |acc, (&e, &x)| acc * x.pow(u128::from(e)))
        }))
    }

    /// Multiply every coefficient by `k`.
    pub fn scale(mut self, k: F) -> Self {
        if k.is_zero() {
            self.terms.clear();
            return self;
        }
        for c in self.terms.values_mut() {
            *c = *c * k;
        }
        self
    }

    fn check_same_ring(&self, rhs: &Self) {
        assert_eq!(self.vars, rhs.vars, "polynomials over different rings");
    }
}

impl<F: Field> Add for MultiPoly<F> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.check_same_ring(&rhs);
        for (exps, c) in rhs.terms {
            self.add_term(exps, c);
        }
        self
    }
}

impl<F: Field> Neg for MultiPoly<F> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in self.terms.values_mut() {
            *c = -*c;
        }
        self
    }
}

impl<F: Field> Sub for MultiPoly<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl<F: Field> Mul for MultiPoly<F> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.check_same_ring(&rhs);
        let mut out = Self {
            vars: self.vars.clone(),
            terms: BTreeMap::new(),
        };
        for (ea, &ca) in &self.terms {
            for (eb, &cb) in &rhs.terms {
                let exps = ea.iter().zip(eb).map(|(a, b)| a + b).collect();
                out.add_term(exps, ca * cb);
            }
        }
        out
    }
}

/// Writes `c` so that it can stand as a factor: sums get parentheses.
fn write_coeff<F: fmt::Display>(f: &mut fmt::Formatter<'_>, c: &F) -> fmt::Result {
    let s = c.to_string();
    if s.contains(' ') {
        write!(f, "({})", s)
    } else {
        write!(f, "{}", s)
    }
}

/// Terms in decreasing exponent order, e.g. `x^2*y + 3*x + 5`.
impl<F: Field + fmt::Display> fmt::Display for MultiPoly<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (n, (exps, c)) in self.terms.iter().rev().enumerate() {
            if n > 0 {
                write!(f, " + ")?;
            }
            let monomial: Vec<String> = self
                .vars
                .iter()
                .zip(exps)
                .filter(|(_, &e)| e > 0)
                .map(|(v, &e)| if e == 1 { v.clone() } else { format!("{}^{}", v, e) })
                .collect();
            if monomial.is_empty() {
                write_coeff(f, c)?;
            } else {
                if !c.is_one() {
                    write_coeff(f, c)?;
                    write!(f, "*")?;
                }
                write!(f, "{}", monomial.join("*"))?;
            }
        }
        Ok(())
    }
}

impl<F: Field + fmt::Display> fmt::Debug for MultiPoly<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiPoly[{}]({})", self.vars.join(","), self)
    }
}

/// A Magma script computing a Gröbner basis of the ideal generated by
/// `equations` over the extension `ext`.
///
/// The ring variables are taken from the first equation; all equations must
/// share them.
#[derive(Copy, Clone, Debug)]
pub struct MagmaSystem<'a> {
    ext: QuadraticModulus,
    equations: &'a [MultiPoly<Fp2>],
}

impl<'a> MagmaSystem<'a> {
    pub fn new(ext: QuadraticModulus, equations: &'a [MultiPoly<Fp2>]) -> Self {
        Self { ext, equations }
    }

    fn vars(&self) -> &'a [String] {
        self.equations.first().map(|e| e.vars()).unwrap_or_default()
    }
}

impl fmt::Display for MagmaSystem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vars = self.vars();
        writeln!(f, "F := GF({});", self.ext.base().value())?;
        writeln!(f, "Fi<ii> := PolynomialRing(F);")?;
        match self.ext.mode() {
            ExtensionMode::Complex => {
                writeln!(f, "Fp2 := ext< F | ii^2 + 1>;")?;
                writeln!(f, "i := Fp2 ! ii;")?;
            }
            ExtensionMode::Generic { non_residue } => {
                writeln!(f, "Fp2 := ext< F | ii^2 - {}>;", non_residue)?;
                writeln!(f, "u := Fp2 ! ii;")?;
            }
        }
        writeln!(
            f,
            "P<{}> := PolynomialRing(Fp2, {}, \"grevlex\");",
            vars.join(","),
            vars.len()
        )?;
        write!(f, "I := ideal<P | ")?;
        for eq in self.equations {
            write!(f, "{}, ", eq)?;
        }
        writeln!(f, "0>;")?;
        writeln!(f, "B := GroebnerBasis(I); B")
    }
}

/// [`MagmaSystem`] rendered to a string.
pub fn magma_system(ext: QuadraticModulus, equations: &[MultiPoly<Fp2>]) -> String {
    MagmaSystem::new(ext, equations).to_string()
}
