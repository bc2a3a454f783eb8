//! Signal processing pipelines
//!
//! This module provides the rdFC processing chain:
//! - [`ellip`]: Minimum-order elliptic band-pass design
//! - [`filters`]: Transfer functions, notch design and zero-phase filtering
//! - [`pattern`]: Recursive five-order connectivity pattern generation
//! - [`scoring`]: Match scores against the reference patterns
//! - [`pipeline`]: Filter, generate and score in one call

pub mod ellip;
pub mod filters;
pub mod pattern;
pub mod pipeline;
pub mod scoring;
