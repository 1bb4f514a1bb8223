//! # fprep-dsa: Storage Foundations
//!
//! The immutable byte region every phase reads from, and the fixed-size
//! counter array every analysis writes into.

pub mod histogram;
pub mod source;

pub use histogram::TrailingRunHistogram;
pub use source::{MappedFile, SourceError};
