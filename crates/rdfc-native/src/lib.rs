//! rdFC Native - Host signal processing for rdFC pattern analysis
//!
//! This crate provides the processing chain behind the `rdfc` tool:
//! - Zero-phase elliptic band-pass and mains notch filtering
//! - Recursive dynamic functional connectivity up to order 5
//! - Match scoring against the three reference patterns
//!
//! # Modules
//!
//! - [`processing`]: Filter design, pattern generation, scoring and the pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use rdfc_native::{PipelineConfig, RdfcPipeline};
//!
//! # fn load() -> Vec<Vec<f64>> { Vec::new() }
//! let pipeline = RdfcPipeline::new(PipelineConfig::default());
//! let analysis = pipeline.run_rows(load(), 256, 50)?;
//! println!("best match: {}", analysis.scores.best_match());
//! # Ok::<(), rdfc_core::RdfcError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod processing;

// Re-export key types
pub use processing::filters::{BiquadCascade, FilterConfig, FilterStage, TransferFunction};
pub use processing::pattern::PatternGenerator;
pub use processing::pipeline::{PipelineConfig, RdfcAnalysis, RdfcPipeline};
pub use processing::scoring::MatchScorer;
