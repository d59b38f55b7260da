//! Classical modular polynomials `Φ_N(X, Y)` for `N = 2, 3, 4`.
//!
//! `Φ_N(j, j') = 0` exactly when the curves with j-invariants `j` and `j'`
//! are linked by a cyclic `N`-isogeny. Coefficients are the published
//! integer values, reduced into the target ring at evaluation time.

use crate::algebra::ring::Ring;

/// One monomial `± c · X^x_deg · Y^y_deg` with `|c| < 2^128`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub x_deg: u32,
    pub y_deg: u32,
    pub negative: bool,
    pub magnitude: u128,
}

const fn term(x_deg: u32, y_deg: u32, negative: bool, magnitude: u128) -> Term {
    Term {
        x_deg,
        y_deg,
        negative,
        magnitude,
    }
}

const PHI2: &[Term] = &[
    term(3, 0, false, 1),
    term(2, 2, true, 1),
    term(2, 1, false, 1488),
    term(2, 0, true, 162000),
    term(1, 2, false, 1488),
    term(1, 1, false, 40773375),
    term(1, 0, false, 8748000000),
    term(0, 3, false, 1),
    term(0, 2, true, 162000),
    term(0, 1, false, 8748000000),
    term(0, 0, true, 157464000000000),
];
const PHI3: &[Term] = &[
    term(4, 0, false, 1),
    term(3, 3, true, 1),
    term(3, 2, false, 2232),
    term(3, 1, true, 1069956),
    term(3, 0, false, 36864000),
    term(2, 3, false, 2232),
    term(2, 2, false, 2587918086),
    term(2, 1, false, 8900222976000),
    term(2, 0, false, 452984832000000),
    term(1, 3, true, 1069956),
    term(1, 2, false, 8900222976000),
    term(1, 1, true, 770845966336000000),
    term(1, 0, false, 1855425871872000000000),
    term(0, 4, false, 1),
    term(0, 3, false, 36864000),
    term(0, 2, false, 452984832000000),
    term(0, 1, false, 1855425871872000000000),
];
const PHI4: &[Term] = &[
    term(6, 0, false, 1),
    term(5, 4, true, 1),
    term(5, 3, false, 2976),
    term(5, 2, true, 2533680),
    term(5, 1, false, 561444609),
    term(5, 0, true, 8507430000),
    term(4, 5, true, 1),
    term(4, 4, false, 7440),
    term(4, 3, false, 80967606480),
    term(4, 2, false, 1425220456750080),
    term(4, 1, false, 1194227244109980000),
    term(4, 0, false, 24125474716854750000),
    term(3, 5, false, 2976),
    term(3, 4, false, 80967606480),
    term(3, 3, false, 2729942049541120),
    term(3, 2, true, 914362550706103200000),
    term(3, 1, false, 12519806366846423598750000),
    term(3, 0, true, 22805180351548032195000000000),
    term(2, 5, true, 2533680),
    term(2, 4, false, 1425220456750080),
    term(2, 3, true, 914362550706103200000),
    term(2, 2, false, 26402314839969410496000000),
    term(2, 1, false, 188656639464998455284287109375),
    term(2, 0, false, 158010236947953767724187500000000),
    term(1, 5, false, 561444609),
    term(1, 4, false, 1194227244109980000),
    term(1, 3, false, 12519806366846423598750000),
    term(1, 2, false, 188656639464998455284287109375),
    term(1, 1, true, 94266583063223403127324218750000),
    term(1, 0, true, 364936327796757658404375000000000000),
    term(0, 6, false, 1),
    term(0, 5, true, 8507430000),
    term(0, 4, false, 24125474716854750000),
    term(0, 3, true, 22805180351548032195000000000),
    term(0, 2, false, 158010236947953767724187500000000),
    term(0, 1, true, 364936327796757658404375000000000000),
    term(0, 0, false, 280949374722195372109640625000000000000),
];

/// Coefficient table of `Φ_level`, or `None` outside `2..=4`.
pub fn table(level: u32) -> Option<&'static [Term]> {
    match level {
        2 => Some(PHI2),
        3 => Some(PHI3),
        4 => Some(PHI4),
        _ => None,
    }
}

/// Evaluate a coefficient table at `(x, y)`.
pub fn eval_terms<R: Ring>(terms: &[Term], x: R, y: R) -> R {
    let max_deg = terms
        .iter()
        .map(|t| t.x_deg.max(t.y_deg))
        .max()
        .unwrap_or(0) as usize;

    let mut x_pows = Vec::with_capacity(max_deg + 1);
    let mut y_pows = Vec::with_capacity(max_deg + 1);
    let (mut xp, mut yp) = (x.one_like(), y.one_like());
    for _ in 0..=max_deg {
        x_pows.push(xp);
        y_pows.push(yp);
        xp = xp * x;
        yp = yp * y;
    }

    terms.iter().fold(x.zero_like(), |acc, t| {
        let c = x.from_u128_like(t.magnitude);
        let monomial = c * x_pows[t.x_deg as usize] * y_pows[t.y_deg as usize];
        if t.negative {
            acc - monomial
        } else {
            acc + monomial
        }
    })
}

/// `Φ₂(X, Y)`.
pub fn modular2<R: Ring>(x: R, y: R) -> R {
    eval_terms(PHI2, x, y)
}

/// `Φ₃(X, Y)`.
pub fn modular3<R: Ring>(x: R, y: R) -> R {
    eval_terms(PHI3, x, y)
}

/// `Φ₄(X, Y)`.
pub fn modular4<R: Ring>(x: R, y: R) -> R {
    eval_terms(PHI4, x, y)
}

/// `Φ_level(X, Y)`, or `None` when no table exists for `level`.
pub fn phi<R: Ring>(level: u32, x: R, y: R) -> Option<R> {
    table(level).map(|terms| eval_terms(terms, x, y))
}
