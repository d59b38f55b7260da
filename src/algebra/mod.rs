//! Abstract algebraic structures.

pub mod field;
pub mod ring;
