//! Concrete finite-field arithmetic.

pub mod fp;
pub mod fp2;
pub mod poly;
