use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

/// A commutative ring whose elements carry their own modulus.
///
/// This trait assumes:
/// - (R, +) is an abelian group with identity `zero_like`
/// - (R, ·) is a commutative monoid with identity `one_like`
/// - multiplication distributes over addition.
///
/// The modulus is only known at runtime, so the identities are produced
/// from an existing element instead of associated constants.
pub trait Ring:
    Sized
    + Copy
    + Eq
    + fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity of the ring `self` belongs to.
    fn zero_like(&self) -> Self;

    /// Multiplicative identity of the ring `self` belongs to.
    fn one_like(&self) -> Self;

    /// Image of the unsigned integer `n` under `Z -> R`.
    fn from_u128_like(&self, n: u128) -> Self;

    /// Image of the signed integer `n` under `Z -> R`.
    fn from_i64_like(&self, n: i64) -> Self {
        let magnitude = self.from_u128_like(n.unsigned_abs() as u128);
        if n < 0 {
            -magnitude
        } else {
            magnitude
        }
    }

    #[inline]
    fn is_zero(&self) -> bool {
        *self == self.zero_like()
    }

    #[inline]
    fn is_one(&self) -> bool {
        *self == self.one_like()
    }

    #[inline]
    fn square(self) -> Self {
        self * self
    }

    /// Compute `self^exp` using square-and-multiply.
    fn pow(self, exp: u128) -> Self {
        let mut base = self;
        let mut result = self.one_like();
        let mut e = exp;

        while e > 0 {
            if e & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            e >>= 1;
        }
        result
    }
}
