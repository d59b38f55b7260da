//! Error types for isotower.
//!
//! Configuration problems and internal-consistency failures are both fatal for
//! the construction that raised them; nothing in the crate retries.

use thiserror::Error;

/// The main error type for isotower.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ============ Configuration errors ============
    /// The supplied modulus is not a supported odd prime.
    #[error("modulus {0} is not a supported prime (need an odd prime 7 <= p < 2^63)")]
    InvalidPrime(u64),

    /// The requested bit length is outside the supported range.
    #[error("bit length {0} is unsupported (must be in 2..=62)")]
    UnsupportedBitLength(u32),

    /// Neither a prime nor a bit length was configured.
    #[error("either a prime or a bit length must be supplied")]
    MissingPrime,

    /// The prime search above `2^bits` left the supported range.
    #[error("no prime above 2^{bits} satisfies the congruence condition below 2^63")]
    NoPrimeFound {
        /// Requested bit length.
        bits: u32,
    },

    /// The complex extension `x^2 + 1` needs `p = 3 (mod 4)`.
    #[error("x^2 + 1 is reducible modulo {0}; the complex extension needs p = 3 (mod 4)")]
    NotComplexExtension(u64),

    /// No prime `q = 3 (mod 4)` below the cap is inert in `Q(sqrt(-q))`.
    #[error("no discriminant -q with q < {limit} has (-q/{p}) = -1")]
    DiscriminantSearchExhausted {
        /// Working prime.
        p: u64,
        /// Exclusive upper bound of the candidate search.
        limit: u64,
    },

    /// The reduced class polynomial has no root in the base field.
    #[error("Hilbert class polynomial of discriminant {discriminant} has no root modulo {p}")]
    NoClassPolynomialRoot {
        /// Discriminant `D < 0`.
        discriminant: i64,
        /// Working prime.
        p: u64,
    },

    /// The fixed-point evaluation never produced integral coefficients.
    #[error("class polynomial of discriminant {discriminant} did not converge at {bits} bits")]
    PrecisionExhausted {
        /// Discriminant `D < 0`.
        discriminant: i64,
        /// Last precision attempted.
        bits: usize,
    },

    /// A value is not a negative discriminant (`D = 0, 1 mod 4`).
    #[error("{0} is not a negative discriminant")]
    InvalidDiscriminant(i64),

    // ============ Internal consistency ============
    /// A construction invariant failed to hold.
    #[error("internal invariant violated: {what}")]
    InvariantViolated {
        /// The invariant that failed, e.g. `"i^2 = -1"`.
        what: &'static str,
    },

    // ============ Collaborators ============
    /// The modular-curve level algebra reported a failure.
    #[error("level algebra: {message}")]
    Level {
        /// Description supplied by the collaborator.
        message: String,
    },
}

impl Error {
    /// Create a level-algebra error.
    pub fn level(message: impl Into<String>) -> Self {
        Self::Level {
            message: message.into(),
        }
    }
}

/// Result type alias using the isotower error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Turn a failed invariant into an [`Error::InvariantViolated`].
pub(crate) fn ensure(holds: bool, what: &'static str) -> Result<()> {
    if holds {
        Ok(())
    } else {
        Err(Error::InvariantViolated { what })
    }
}
