//! rdFC Core - data model and statistics for recursive dynamic functional
//! connectivity
//!
//! This crate provides the foundational types shared by the processing
//! pipeline and the command-line tool.
//!
//! # Modules
//!
//! - [`types`]: Channels, pairs, notch frequency, epochs, patterns, scores
//! - [`error`]: The `InvalidParameter` / `ShapeMismatch` / `DegenerateSignal` taxonomy
//! - [`math`]: Whole-series and sliding-window Pearson correlation
//! - [`reference`]: The three compiled-in reference patterns
//!
//! # Example
//!
//! ```rust
//! use rdfc_core::types::{ChannelPair, RdfcPattern};
//! use rdfc_core::reference::FIRST_REFERENCE;
//!
//! let pattern: RdfcPattern = FIRST_REFERENCE.pattern;
//! assert_eq!(pattern.value(1, ChannelPair::AB), Some(0.85));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod math;
pub mod reference;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{RdfcError, RdfcResult};
pub use reference::{ReferencePattern, REFERENCE_PATTERNS};
pub use types::{
    Channel, ChannelPair, Epoch, MatchScores, NotchFrequency, RdfcPattern, EPOCH_DURATION_SECS,
    NUM_CHANNELS, NUM_ORDERS, NUM_PAIRS,
};
