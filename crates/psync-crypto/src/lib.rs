//! Cryptographic primitives for patchsync.
//!
//! Domain-separated BLAKE3 hashing for fingerprints and in-memory commit
//! ids.

pub mod hasher;

pub use hasher::{ContentHasher, StreamingHasher};
