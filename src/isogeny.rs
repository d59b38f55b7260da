//! x-only isogeny formulas on Montgomery curves `y² = x³ + Ax² + x`.
//!
//! `x_ker` is the x-coordinate of a generator of the kernel. For degree 2 it
//! is a root of `x² + Ax + 1` (a 2-torsion point other than `(0, 0)`), for
//! degree 4 a point `P` with `[2]P` such a root, for degree 3 a root of the
//! 3-division polynomial `3x⁴ + 4Ax³ + 6x² − 1`.
//!
//! # Panics
//!
//! The push-forward maps divide by `x − x_ker`; evaluating them at the
//! kernel point itself panics through the field's `Div`. Excluding the
//! kernel is the caller's job.

use crate::algebra::field::Field;

/// Image of `x` under the 2-isogeny with kernel `⟨(x_ker, ·)⟩`:
/// `x·(x_ker·x − 1) / (x − x_ker)`.
pub fn push2<F: Field>(x_ker: F, x: F) -> F {
    let one = x.one_like();
    x * (x_ker * x - one) / (x - x_ker)
}

/// Image of `x` under the 3-isogeny with kernel `⟨(x_ker, ·)⟩`:
/// `x·(x_ker·x − 1)² / (x − x_ker)²`.
pub fn push3<F: Field>(x_ker: F, x: F) -> F {
    let one = x.one_like();
    let num = x_ker * x - one;
    let den = x - x_ker;
    x * num * num / (den * den)
}

/// Codomain coefficient after a 2-isogeny: `2·(1 − 2·x_ker²)`.
pub fn codomain_a2<F: Field>(x_ker: F) -> F {
    let one = x_ker.one_like();
    let two = one + one;
    two * (one - two * x_ker * x_ker)
}

/// Codomain coefficient after a 4-isogeny: `2·(1 − 2·x_ker⁴)`.
pub fn codomain_a4<F: Field>(x_ker: F) -> F {
    let one = x_ker.one_like();
    let two = one + one;
    let x2 = x_ker * x_ker;
    two * (one - two * x2 * x2)
}

/// Codomain coefficient after a 3-isogeny on the curve with coefficient
/// `a`: `(6 − 6·x_ker² + a·x_ker)·x_ker`.
pub fn codomain_a3<F: Field>(x_ker: F, a: F) -> F {
    let six = x_ker.from_u128_like(6);
    (six - six * x_ker * x_ker + a * x_ker) * x_ker
}

/// `j(E_A) = 256·(A² − 3)³ / (A² − 4)`, `None` when `A² = 4`.
pub fn montgomery_j_invariant<F: Field>(a: F) -> Option<F> {
    let a2 = a * a;
    let t = a2 - a.from_u128_like(3);
    let num = a.from_u128_like(256) * t * t * t;
    num.try_div(a2 - a.from_u128_like(4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::ring::Ring;
    use crate::curve::CurveFactory;
    use crate::modular::{modular2, modular3, modular4};
    use crate::structures::fp::PrimeModulus;
    use crate::structures::fp2::{Fp2, QuadraticModulus};
    use crate::structures::poly::Poly;

    fn field() -> QuadraticModulus {
        QuadraticModulus::complex(PrimeModulus::new(431).unwrap()).unwrap()
    }

    fn coefficient(k: QuadraticModulus) -> Fp2 {
        k.element(8, 1)
    }

    /// x-only doubling `(x² − 1)² / (4x(x² + Ax + 1))`.
    fn x_double(a: Fp2, x: Fp2) -> Option<Fp2> {
        let one = x.one_like();
        let num = (x * x - one) * (x * x - one);
        num.try_div(x.from_u128_like(4) * x * (x * x + a * x + one))
    }

    fn sample_points(k: QuadraticModulus) -> Vec<Fp2> {
        (1..30u64).map(|n| k.element(7 * n + 3, 11 * n + 5)).collect()
    }

    fn two_torsion(k: QuadraticModulus, a: Fp2) -> Vec<Fp2> {
        Poly::new(vec![k.one(), a, k.one()]).roots()
    }

    #[test]
    fn montgomery_j_matches_weierstrass_j() {
        let k = field();
        let a = coefficient(k);
        assert_eq!(
            montgomery_j_invariant(a),
            CurveFactory::montgomery(a).j_invariant()
        );
        assert_eq!(montgomery_j_invariant(k.element(2, 0)), None);
        // A = 0 is y^2 = x^3 + x
        assert_eq!(montgomery_j_invariant(k.zero()), Some(k.element(1728, 0)));
    }

    #[test]
    fn degree_2_codomain_satisfies_phi2() {
        let k = field();
        let a = coefficient(k);
        let j = montgomery_j_invariant(a).unwrap();
        let kernels = two_torsion(k, a);
        assert_eq!(kernels.len(), 2);
        for x_ker in kernels {
            let j2 = montgomery_j_invariant(codomain_a2(x_ker)).unwrap();
            assert_eq!(modular2(j, j2), k.zero());
        }
    }

    #[test]
    fn push2_commutes_with_doubling() {
        let k = field();
        let a = coefficient(k);
        for x_ker in two_torsion(k, a) {
            let a2 = codomain_a2(x_ker);
            for x in sample_points(k) {
                let Some(dx) = x_double(a, x) else { continue };
                if x == x_ker || dx == x_ker {
                    continue;
                }
                let image = push2(x_ker, x);
                assert_eq!(x_double(a2, image), Some(push2(x_ker, dx)));
            }
        }
    }

    #[test]
    fn degree_3_codomain_satisfies_phi3() {
        let k = field();
        let a = coefficient(k);
        let j = montgomery_j_invariant(a).unwrap();
        let three = k.element(3, 0);
        let four = k.element(4, 0);
        let six = k.element(6, 0);
        let division = Poly::new(vec![-k.one(), k.zero(), six, four * a, three]);
        let kernels = division.roots();
        assert!(!kernels.is_empty());
        for x_ker in kernels {
            let a3 = codomain_a3(x_ker, a);
            let j3 = montgomery_j_invariant(a3).unwrap();
            assert_eq!(modular3(j, j3), k.zero());

            for x in sample_points(k) {
                let Some(dx) = x_double(a, x) else { continue };
                if x == x_ker || dx == x_ker {
                    continue;
                }
                assert_eq!(x_double(a3, push3(x_ker, x)), Some(push3(x_ker, dx)));
            }
        }
    }

    #[test]
    fn degree_4_codomain_satisfies_phi4() {
        let k = field();
        let a = coefficient(k);
        let j = montgomery_j_invariant(a).unwrap();
        let mut checked = 0;
        for alpha in two_torsion(k, a) {
            // x with x([2]P) = alpha: (x² − 1)² − 4αx(x² + Ax + 1) = 0
            let four_alpha = k.element(4, 0) * alpha;
            let quartic = Poly::new(vec![
                k.one(),
                -four_alpha,
                -k.element(2, 0) - four_alpha * a,
                -four_alpha,
                k.one(),
            ]);
            for x_ker in quartic.roots() {
                let j4 = montgomery_j_invariant(codomain_a4(x_ker)).unwrap();
                assert_eq!(modular4(j, j4), k.zero());
                checked += 1;
            }
        }
        assert!(checked > 0);
    }

    #[test]
    #[should_panic(expected = "division by zero in Fp2")]
    fn push_at_kernel_panics() {
        let k = field();
        let x_ker = k.element(11, 14);
        let _ = push2(x_ker, x_ker);
    }
}
