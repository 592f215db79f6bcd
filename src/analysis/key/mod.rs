//! Key detection module
//!
//! Matches the most frequent pitch classes of a recording against an
//! ordered table of key signatures.

pub mod matcher;
pub mod signatures;

pub use matcher::{match_key, UNKNOWN_KEY};
pub use signatures::{KeySignature, KeySignatureTable};
