use proptest::prelude::*;

use isotower::{
    codomain_a2, codomain_a3, codomain_a4, modular2, modular3, modular4, montgomery_j_invariant,
    push2, Field, Fp, Fp2, Poly, PrimeModulus, QuadraticModulus, Ring,
};

const P: u64 = 431;

fn f431() -> PrimeModulus {
    PrimeModulus::new(P).unwrap()
}

fn k431() -> QuadraticModulus {
    QuadraticModulus::complex(f431()).unwrap()
}

fn k433() -> QuadraticModulus {
    QuadraticModulus::generic(PrimeModulus::new(433).unwrap())
}

fn arb_fp() -> impl Strategy<Value = Fp> {
    (0u64..P).prop_map(|v| f431().element(v))
}

fn arb_fp_nonzero() -> impl Strategy<Value = Fp> {
    (1u64..P).prop_map(|v| f431().element(v))
}

fn arb_fp2() -> impl Strategy<Value = Fp2> {
    (0u64..P, 0u64..P).prop_map(|(a, b)| k431().element(a, b))
}

fn arb_fp2_nonzero() -> impl Strategy<Value = Fp2> {
    arb_fp2().prop_filter("non-zero", |a| !a.is_zero())
}

fn arb_generic() -> impl Strategy<Value = Fp2> {
    (0u64..433, 0u64..433).prop_map(|(a, b)| k433().element(a, b))
}

// ===== Prime field =====

proptest! {
    #[test]
    fn fp_addition_commutative(a in arb_fp(), b in arb_fp()) {
        prop_assert_eq!(a + b, b + a);
    }
}

proptest! {
    #[test]
    fn fp_additive_inverse(a in arb_fp()) {
        prop_assert_eq!(a + (-a), f431().zero());
        prop_assert_eq!(a - a, f431().zero());
    }
}

proptest! {
    #[test]
    fn fp_distributive(a in arb_fp(), b in arb_fp(), c in arb_fp()) {
        prop_assert_eq!(a * (b + c), a * b + a * c);
    }
}

proptest! {
    #[test]
    fn fp_multiplicative_inverse(a in arb_fp_nonzero()) {
        let inv = a.inverse().unwrap();
        prop_assert_eq!(a * inv, f431().one());
        prop_assert_eq!(inv.inverse().unwrap(), a);
    }
}

proptest! {
    #[test]
    fn fp_division_consistency(a in arb_fp(), b in arb_fp_nonzero()) {
        prop_assert_eq!((a / b) * b, a);
        prop_assert_eq!(a.try_div(b), Some(a / b));
    }
}

proptest! {
    #[test]
    fn fp_value_in_range(v in 0u64..100_000u64) {
        let a = f431().element(v);
        prop_assert!(a.value() < P);
        prop_assert_eq!(a.value(), v % P);
    }
}

proptest! {
    #[test]
    fn fp_sqrt_squares_back(a in arb_fp()) {
        let sq = a * a;
        let r = sq.sqrt().unwrap();
        prop_assert_eq!(r * r, sq);
        // canonical: the smaller representative
        prop_assert!(r.value() <= (-r).value());
    }
}

proptest! {
    #[test]
    fn fp_fermat(a in arb_fp_nonzero()) {
        prop_assert!(a.pow(u128::from(P - 1)).is_one());
    }
}

#[test]
fn fp_zero_has_no_inverse() {
    assert_eq!(f431().zero().inverse(), None);
    assert_eq!(f431().one().try_div(f431().zero()), None);
}

// ===== Quadratic extension =====

proptest! {
    #[test]
    fn fp2_multiplication_commutative(a in arb_fp2(), b in arb_fp2()) {
        prop_assert_eq!(a * b, b * a);
    }
}

proptest! {
    #[test]
    fn fp2_multiplication_associative(a in arb_fp2(), b in arb_fp2(), c in arb_fp2()) {
        prop_assert_eq!((a * b) * c, a * (b * c));
    }
}

proptest! {
    #[test]
    fn fp2_distributive(a in arb_fp2(), b in arb_fp2(), c in arb_fp2()) {
        prop_assert_eq!(a * (b + c), a * b + a * c);
    }
}

proptest! {
    #[test]
    fn fp2_inverse(a in arb_fp2_nonzero()) {
        prop_assert_eq!(a * a.inverse().unwrap(), k431().one());
    }
}

proptest! {
    #[test]
    fn fp2_frobenius_is_conjugation(a in arb_fp2()) {
        prop_assert_eq!(a.pow(u128::from(P)), a.conjugate());
        prop_assert!((a * a.conjugate()).is_in_base_field());
    }
}

proptest! {
    #[test]
    fn fp2_every_base_element_is_a_square(a in arb_fp()) {
        let lifted = k431().lift(a);
        let r = lifted.sqrt().unwrap();
        prop_assert_eq!(r * r, lifted);
    }
}

proptest! {
    #[test]
    fn fp2_sqrt_of_squares(a in arb_fp2()) {
        let sq = a * a;
        let r = sq.sqrt().unwrap();
        prop_assert_eq!(r * r, sq);
        prop_assert!(r.sort_key() <= (-r).sort_key());
    }
}

proptest! {
    #[test]
    fn generic_extension_is_a_field(a in arb_generic(), b in arb_generic()) {
        prop_assert_eq!(a * b, b * a);
        if !b.is_zero() {
            prop_assert_eq!((a / b) * b, a);
        }
        prop_assert_eq!(a.pow(433), a.conjugate());
    }
}

// ===== Polynomials =====

proptest! {
    #[test]
    fn roots_of_split_polynomial(xs in proptest::collection::vec(arb_fp2(), 1..5)) {
        let f = Poly::from_roots(&xs).unwrap();
        let mut expected = xs.clone();
        expected.sort_by_key(|r| r.sort_key());
        expected.dedup();
        prop_assert_eq!(f.roots(), expected);
    }
}

proptest! {
    #[test]
    fn div_rem_reconstructs(
        a in proptest::collection::vec(arb_fp(), 0..8),
        b in proptest::collection::vec(arb_fp_nonzero(), 1..4),
    ) {
        let a = Poly::new(a);
        let b = Poly::new(b);
        let (q, r) = a.div_rem(&b).unwrap();
        prop_assert_eq!(q * &b + &r, a);
        prop_assert!(r.degree().unwrap_or(0) < b.degree().unwrap_or(0).max(1));
    }
}

// ===== Isogeny formulas =====

proptest! {
    #[test]
    fn two_isogenous_curves_satisfy_phi2(alpha in arb_fp2_nonzero()) {
        // A = -(α + 1/α) puts (α, 0) in the 2-torsion
        let a = -(alpha + alpha.inverse().unwrap());
        let Some(j) = montgomery_j_invariant(a) else { return Ok(()) };
        let a2 = codomain_a2(alpha);
        if let Some(j2) = montgomery_j_invariant(a2) {
            prop_assert_eq!(modular2(j, j2), k431().zero());
        }
    }
}

proptest! {
    #[test]
    fn push2_sends_two_torsion_to_origin(alpha in arb_fp2_nonzero()) {
        // the other 2-torsion point 1/α maps to (0, 0) on the codomain
        let other = alpha.inverse().unwrap();
        prop_assume!(other != alpha);
        prop_assert_eq!(push2(alpha, other), k431().zero());
    }
}

/// Every root of `3x⁴ + 4Ax³ + 6x² − 1` gives a 3-isogenous codomain.
fn check_three_isogenies(k: QuadraticModulus, a: Fp2) -> Result<(), TestCaseError> {
    let Some(j) = montgomery_j_invariant(a) else { return Ok(()) };
    let division = Poly::new(vec![
        -k.one(),
        k.zero(),
        k.element(6, 0),
        k.element(4, 0) * a,
        k.element(3, 0),
    ]);
    for x_ker in division.roots() {
        if let Some(j3) = montgomery_j_invariant(codomain_a3(x_ker, a)) {
            prop_assert_eq!(modular3(j, j3), k.zero());
        }
    }
    Ok(())
}

/// Halving each 2-torsion root `α` of `x² + Ax + 1` gives the kernels of
/// cyclic 4-isogenies.
fn check_four_isogenies(k: QuadraticModulus, a: Fp2) -> Result<(), TestCaseError> {
    let Some(j) = montgomery_j_invariant(a) else { return Ok(()) };
    for alpha in Poly::new(vec![k.one(), a, k.one()]).roots() {
        let four_alpha = k.element(4, 0) * alpha;
        // x([2]P) = α, cleared of denominators
        let halving = Poly::new(vec![
            k.one(),
            -four_alpha,
            -k.element(2, 0) - four_alpha * a,
            -four_alpha,
            k.one(),
        ]);
        for x_ker in halving.roots() {
            if let Some(j4) = montgomery_j_invariant(codomain_a4(x_ker)) {
                prop_assert_eq!(modular4(j, j4), k.zero());
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn three_isogenous_curves_satisfy_phi3(a in arb_fp2()) {
        check_three_isogenies(k431(), a)?;
    }
}

proptest! {
    #[test]
    fn three_isogenies_in_generic_extension(a in arb_generic()) {
        check_three_isogenies(k433(), a)?;
    }
}

proptest! {
    #[test]
    fn four_isogenous_curves_satisfy_phi4(a in arb_fp2()) {
        check_four_isogenies(k431(), a)?;
    }
}

proptest! {
    #[test]
    fn four_isogenies_in_generic_extension(a in arb_generic()) {
        check_four_isogenies(k433(), a)?;
    }
}
