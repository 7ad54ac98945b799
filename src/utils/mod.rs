//! Shared helpers for input validation and allele names.

pub mod validation;
