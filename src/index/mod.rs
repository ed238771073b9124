//! In-memory inverted index
//!
//! - `InvertedIndex`: immutable term → posting list map, built once
//! - `IndexBuilder`: one-shot bulk build with parallel per-chunk tokenization

mod builder;
mod inverted;

pub use builder::*;
pub use inverted::*;
