//! Numerical algorithms.

pub mod dot_product;
