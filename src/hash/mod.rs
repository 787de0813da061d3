//! Non-cryptographic hash functions over byte slices.
//!
//! These are used as fingerprints: fast to compute and good at telling unequal keys apart, but
//! never a substitute for comparing the keys themselves.

mod fnv;

pub use fnv::*;
