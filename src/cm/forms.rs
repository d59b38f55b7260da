//! Reduced primitive positive-definite binary quadratic forms.

use core::fmt;

use crate::error::{Error, Result};
use crate::utils::gcd;

/// The form `a·x² + b·xy + c·y²` with discriminant `b² − 4ac`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReducedForm {
    pub a: i64,
    pub b: i64,
    pub c: i64,
}

impl ReducedForm {
    pub fn discriminant(&self) -> i64 {
        self.b * self.b - 4 * self.a * self.c
    }
}

impl fmt::Display for ReducedForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.a, self.b, self.c)
    }
}

/// Check that `d` is a negative discriminant (`d ≡ 0, 1 mod 4`).
pub fn validate_discriminant(d: i64) -> Result<()> {
    if d >= 0 || !matches!(d.rem_euclid(4), 0 | 1) {
        return Err(Error::InvalidDiscriminant(d));
    }
    Ok(())
}

/// All reduced primitive forms of discriminant `d < 0`, ordered by `(a, b)`.
///
/// Reduced means `|b| ≤ a ≤ c`, with `b ≥ 0` whenever `|b| = a` or `a = c`.
/// Their number is the class number `h(d)`.
pub fn reduced_forms(d: i64) -> Result<Vec<ReducedForm>> {
    validate_discriminant(d)?;
    let abs_d = d.unsigned_abs() as i64;

    let mut forms = Vec::new();
    let mut a = 1i64;
    // a ≤ sqrt(|d| / 3)
    while 3 * a * a <= abs_d {
        for b in -a + 1..=a {
            if (b - d).rem_euclid(2) != 0 {
                continue;
            }
            let num = b * b - d;
            if num % (4 * a) != 0 {
                continue;
            }
            let c = num / (4 * a);
            if c < a || (b < 0 && a == c) {
                continue;
            }
            let g = gcd(gcd(a.unsigned_abs(), b.unsigned_abs()), c.unsigned_abs());
            if g != 1 {
                continue;
            }
            forms.push(ReducedForm { a, b, c });
        }
        a += 1;
    }
    Ok(forms)
}

/// The class number `h(d)`.
pub fn class_number(d: i64) -> Result<usize> {
    reduced_forms(d).map(|forms| forms.len())
}
