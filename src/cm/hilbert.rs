//! Hilbert class polynomials by complex approximation.
//!
//! `H_D(X) = Π (X − j(τ_f))` over the reduced forms `f = (a, b, c)` of
//! discriminant `D`, with `τ_f = (−b + sqrt(D)) / 2a`. Each `j(τ)` comes
//! from the q-expansions `j = E₄³ / Δ`, `Δ = q·η̃²⁴`, evaluated with MPFR
//! floats; the product is rounded to integers and retried at double
//! precision when the rounding is not clean.

use log::debug;
use rug::float::Constant;
use rug::{Complex, Float, Integer};

use super::forms::{reduced_forms, ReducedForm};
use crate::error::{Error, Result};
use crate::structures::fp::{Fp, PrimeModulus};
use crate::structures::poly::Poly;

/// Precision doublings tried after the initial estimate.
const MAX_DOUBLINGS: usize = 4;

/// Mantissa bits on top of the coefficient size estimate.
const GUARD_BITS: u32 = 64;

/// Required closeness of each coefficient to an integer, as `2^-TOLERANCE`.
const TOLERANCE: i32 = 16;

/// `σ₃(n) = Σ_{d | n} d³`.
fn sigma3(n: u64) -> u128 {
    let mut sum = 0u128;
    let mut d = 1u64;
    while d * d <= n {
        if n % d == 0 {
            sum += u128::from(d).pow(3);
            let e = n / d;
            if e != d {
                sum += u128::from(e).pow(3);
            }
        }
        d += 1;
    }
    sum
}

/// Generalised pentagonal numbers `k(3k ∓ 1)/2` in increasing order, with
/// the Euler sign `(−1)^k`.
fn pentagonal_terms() -> impl Iterator<Item = (u64, bool)> {
    (1u64..).flat_map(|k| {
        let negative = k % 2 == 1;
        [(k * (3 * k - 1) / 2, negative), (k * (3 * k + 1) / 2, negative)]
    })
}

/// Bits needed to hold the coefficients of `H_D` plus guard bits.
///
/// `|j(τ_f)| ≈ e^(π·sqrt|D| / a)`, so the coefficients are bounded by the
/// product of those sizes.
fn estimate_precision(d: i64, forms: &[ReducedForm]) -> u32 {
    use core::f64::consts::{LN_2, PI};

    let root = (d.unsigned_abs() as f64).sqrt();
    // + 11 covers the constant 744 and the E₄ series
    let sizes: Vec<u32> = forms
        .iter()
        .map(|f| (PI * root / (f.a as f64) / LN_2).ceil() as u32 + 11)
        .collect();
    let total: u32 = sizes.iter().sum();
    let largest = sizes.iter().copied().max().unwrap_or(0);
    total + largest + forms.len() as u32 + GUARD_BITS
}

/// `j(τ)` for `τ = (−b + i·sqrt|D|) / 2a`.
fn j_value(prec: u32, d: i64, form: &ReducedForm, pi: &Float) -> Option<Complex> {
    use core::f64::consts::LN_2;

    let root = Float::with_val(prec, d.unsigned_abs()).sqrt();
    // 2πiτ = −π·sqrt|D| / a − i·π·b / a
    let x = Float::with_val(prec, pi * &root) / form.a;
    let theta = -(Float::with_val(prec, pi * form.b) / form.a);
    let exponent = Complex::with_val(prec, (-x.clone(), theta));
    let q = exponent.clone().exp();
    let q_inv = (-exponent).exp();

    // |q|^n drops below the working precision after this many terms
    let terms = (f64::from(prec) * LN_2 / x.to_f64()).ceil() as u64 + 1;

    // E₄ = 1 + 240 Σ σ₃(n) qⁿ, η̃ = Σ_k (−1)^k q^(k(3k−1)/2)
    let mut e4_sum = Complex::new(prec);
    let mut eta = Complex::with_val(prec, 1);
    let mut pentagonal = pentagonal_terms().peekable();
    let mut q_n = q.clone();
    for n in 1..=terms {
        e4_sum += q_n.clone() * &Float::with_val(prec, sigma3(n));
        while let Some(&(g, negative)) = pentagonal.peek() {
            if g > n {
                break;
            }
            if g == n {
                if negative {
                    eta -= &q_n;
                } else {
                    eta += &q_n;
                }
            }
            pentagonal.next();
        }
        q_n *= &q;
    }
    let e4 = e4_sum * 240u32 + 1u32;

    let eta2 = eta.clone() * &eta;
    let eta4 = eta2.clone() * &eta2;
    let eta8 = eta4.clone() * &eta4;
    let eta24 = eta8.clone() * &eta8 * &eta8;
    if eta24.real().is_zero() && eta24.imag().is_zero() {
        return None;
    }

    let e4_cubed = e4.clone() * &e4 * &e4;
    Some(e4_cubed / &eta24 * &q_inv)
}

/// Nearest integer to `z`, if `z` lies within `2^-TOLERANCE` of it on the
/// real axis.
fn round_to_integer(z: &Complex) -> Option<Integer> {
    let limit = Float::with_val(z.prec().0, 1) >> TOLERANCE;
    let n = z.real().to_integer()?;
    let residue = (z.real().clone() - &n).abs();
    let drift = z.imag().clone().abs();
    (residue < limit && drift < limit).then_some(n)
}

/// One attempt at a fixed precision; `None` if the rounding is not clean.
fn attempt(d: i64, forms: &[ReducedForm], prec: u32) -> Option<Vec<Integer>> {
    let pi = Float::with_val(prec, Constant::Pi);

    // Coefficients in ascending order, starting from the constant 1.
    let mut coeffs = vec![Complex::with_val(prec, 1)];
    for form in forms {
        let j = j_value(prec, d, form, &pi)?;
        let mut next = vec![Complex::new(prec); coeffs.len() + 1];
        for (k, c) in coeffs.iter().enumerate() {
            next[k + 1] += c;
            next[k] -= c.clone() * &j;
        }
        coeffs = next;
    }

    coeffs.iter().map(round_to_integer).collect()
}

/// Integer coefficients of `H_D`, constant term first (monic).
///
/// # Errors
///
/// [`Error::InvalidDiscriminant`] for `d ≥ 0` or `d ≢ 0, 1 (mod 4)`;
/// [`Error::PrecisionExhausted`] if the coefficients never round cleanly.
pub fn hilbert_class_polynomial(d: i64) -> Result<Vec<Integer>> {
    let forms = reduced_forms(d)?;
    let mut prec = estimate_precision(d, &forms);
    debug!(
        "hilbert class polynomial: D = {}, h = {}, {} bits",
        d,
        forms.len(),
        prec
    );

    for round in 0..=MAX_DOUBLINGS {
        if let Some(coeffs) = attempt(d, &forms, prec) {
            return Ok(coeffs);
        }
        if round < MAX_DOUBLINGS {
            debug!("D = {}: rounding failed at {} bits, doubling", d, prec);
            prec *= 2;
        }
    }
    Err(Error::PrecisionExhausted {
        discriminant: d,
        bits: prec as usize,
    })
}

/// Reduce integer coefficients into `F_p`.
pub fn reduce_mod_p(coeffs: &[Integer], modulus: PrimeModulus) -> Poly<Fp> {
    let p = Integer::from(modulus.value());
    Poly::new(
        coeffs
            .iter()
            .map(|c| {
                let mut r = Integer::from(c % &p);
                if r < 0 {
                    r += &p;
                }
                // 0 ≤ r < p < 2^63
                modulus.element(r.to_u64_wrapping())
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[&str]) -> Vec<Integer> {
        values.iter().map(|v| v.parse().unwrap()).collect()
    }

    #[test]
    fn sigma3_values() {
        assert_eq!(sigma3(1), 1);
        assert_eq!(sigma3(2), 9);
        assert_eq!(sigma3(6), 1 + 8 + 27 + 216);
        assert_eq!(sigma3(9), 1 + 27 + 729);
    }

    #[test]
    fn pentagonal_order() {
        let first: Vec<(u64, bool)> = pentagonal_terms().take(6).collect();
        assert_eq!(
            first,
            vec![(1, true), (2, true), (5, false), (7, false), (12, true), (15, true)]
        );
    }

    #[test]
    fn rounding_rejects_non_integers() {
        let half = Complex::with_val(64, (7.5, 0));
        assert_eq!(round_to_integer(&half), None);
        let off_axis = Complex::with_val(64, (7, 0.25));
        assert_eq!(round_to_integer(&off_axis), None);
        let near = Complex::with_val(128, (-7, 0)) + Complex::with_val(128, (1e-9, -1e-9));
        assert_eq!(round_to_integer(&near), Some(Integer::from(-7)));
    }

    #[test]
    fn j_of_i_is_1728() {
        let prec = 256;
        let pi = Float::with_val(prec, Constant::Pi);
        let form = reduced_forms(-4).unwrap()[0];
        let j = j_value(prec, -4, &form, &pi).unwrap();
        assert_eq!(round_to_integer(&j), Some(Integer::from(1728)));
    }

    #[test]
    fn class_number_one() {
        assert_eq!(hilbert_class_polynomial(-3).unwrap(), ints(&["0", "1"]));
        assert_eq!(hilbert_class_polynomial(-4).unwrap(), ints(&["-1728", "1"]));
        assert_eq!(hilbert_class_polynomial(-7).unwrap(), ints(&["3375", "1"]));
        assert_eq!(
            hilbert_class_polynomial(-163).unwrap(),
            ints(&["262537412640768000", "1"])
        );
    }

    #[test]
    fn discriminant_minus_23() {
        assert_eq!(
            hilbert_class_polynomial(-23).unwrap(),
            ints(&["12771880859375", "-5151296875", "3491750", "1"])
        );
    }

    #[test]
    fn discriminant_minus_47() {
        assert_eq!(
            hilbert_class_polynomial(-47).unwrap(),
            ints(&[
                "16042929600623870849609375",
                "-14982472850828613281250",
                "5115161850595703125",
                "-9987963828125",
                "2257834125",
                "1",
            ])
        );
    }

    #[test]
    fn discriminant_minus_71() {
        let h = hilbert_class_polynomial(-71).unwrap();
        assert_eq!(h.len(), 8);
        assert_eq!(h[0], "737707086760731113357714241006081263".parse::<Integer>().unwrap());
        assert_eq!(h[6], Integer::from(313645809715i64));
    }

    #[test]
    fn invalid_discriminant() {
        assert_eq!(
            hilbert_class_polynomial(-5),
            Err(Error::InvalidDiscriminant(-5))
        );
    }

    #[test]
    fn reduction_has_expected_root() {
        let m = PrimeModulus::new(709).unwrap();
        let h = reduce_mod_p(&hilbert_class_polynomial(-23).unwrap(), m);
        assert_eq!(h.degree(), Some(3));
        assert_eq!(h.eval(m.element(98)), m.zero());
        let negative = reduce_mod_p(&ints(&["-1"]), m);
        assert_eq!(negative.coefficients(), &[m.element(708)]);
    }

    #[test]
    fn reduction_beyond_u64() {
        let m = PrimeModulus::new(709).unwrap();
        let big: Integer = Integer::from(1u128 << 70) + 5;
        let h = reduce_mod_p(&[big.clone(), -big], m);
        assert_eq!(h.coefficients(), &[m.element(121), m.element(588)]);

        let p = (1u64 << 62) - 57;
        let m = PrimeModulus::new(p).unwrap();
        let h = reduce_mod_p(&ints(&["-1", "1"]), m);
        assert_eq!(h.coefficients(), &[m.element(p - 1), m.one()]);
    }
}
