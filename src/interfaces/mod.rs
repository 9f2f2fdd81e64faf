//! Batch adapters for feeding payments in and reading invoice state out.

pub mod csv;
