//! OCR layout analysis
//!
//! Turns a raw hierarchical OCR result into clean body text: `parser`
//! flattens the page hierarchy into word records, `classifier` clusters the
//! word heights into size bands and keeps only the band that looks like
//! ordinary body text.

pub mod classifier;
pub mod parser;

pub use classifier::{cluster_sizes, filter_body_words, BodyBand, DEFAULT_BANDS};
pub use parser::{flatten, WordRecord};
