//! Shared traits for the gridq matrix crates.
//!
//! This crate provides the element capability traits consumed by the
//! `gridq` matrix layer:
//!
//! - [`Scalar`]: arithmetic capability (elementwise ops, matrix product)
//! - [`CellText`]: text-format capability (bare vs quoted tokens)
//!
//! External crates can depend on `gridq-traits` to implement the traits
//! for their own element types without orphan rule violations.

pub mod cell;
pub mod scalar;

pub use cell::CellText;
pub use scalar::Scalar;
