//! State fingerprints for Skirmish replicas.
//!
//! Every replica reduces its world state to a 32-bit [`GameHash`] after
//! each tick. Peers exchange and compare these values to detect desyncs.
//!
//! Hashes combine by wrapping addition, so a collection's hash does not
//! depend on iteration order. The digest is deliberately weak: it flags
//! divergence, it does not identify state.
//!
//! - [`ComputeHash`]: per-type hashing, with impls for primitives,
//!   core types and standard collections.
//! - [`combine_hashes!`]: sum a fixed list of field hashes.
//! - [`HashLog`] and [`first_divergence`]: per-tick history and
//!   cross-replica comparison.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compare;
pub mod hash;

pub use compare::{first_divergence, Divergence, HashLog};
pub use hash::{hash_unordered, ComputeHash, GameHash};
