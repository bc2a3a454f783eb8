//! End-to-end rdFC analysis
//!
//! Raw epoch → filter stage → pattern generator → match scorer. Parameters
//! and the filter design are checked first, then the raw signal is checked
//! for constant channels before any filtering.

use rdfc_core::{Epoch, MatchScores, NotchFrequency, RdfcPattern, RdfcResult};
use serde::{Deserialize, Serialize};

use super::filters::{FilterConfig, FilterStage};
use super::pattern::PatternGenerator;
use super::scoring::MatchScorer;

/// Pipeline configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Band-pass and notch design
    pub filter: FilterConfig,
}

/// Result of one analysis run
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RdfcAnalysis {
    /// Generated 5×3 pattern (unrounded)
    pub pattern: RdfcPattern,
    /// Scores against references 1, 2 and 3
    pub scores: MatchScores,
}

/// Filter, generate and score in one call.
#[derive(Clone, Debug, Default)]
pub struct RdfcPipeline {
    config: PipelineConfig,
    scorer: MatchScorer,
}

impl RdfcPipeline {
    /// Create a pipeline scoring against the built-in references.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, scorer: MatchScorer::default() }
    }

    /// Analyse a raw epoch.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the filters cannot be designed for the epoch's
    /// sampling rate, `DegenerateSignal` if a raw channel is constant.
    pub fn run(&self, epoch: &Epoch, notch: NotchFrequency) -> RdfcResult<RdfcAnalysis> {
        let rate = epoch.sampling_rate_hz();
        tracing::info!("Analysing {} s epoch at {} Hz, notch {}", epoch.len() / rate as usize, rate, notch);

        let stage = FilterStage::design(rate, notch, &self.config.filter)?;
        epoch.check_variance()?;
        let filtered = stage.apply(epoch)?;

        let pattern = PatternGenerator::for_sampling_rate(rate)?.generate(&filtered)?;
        let scores = self.scorer.score(&pattern);

        tracing::info!("Best matching reference pattern: {}", scores.best_match());
        Ok(RdfcAnalysis { pattern, scores })
    }

    /// Analyse a raw three-row matrix with integer parameters.
    ///
    /// The notch frequency is validated first, then the epoch shape.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a notch other than 50/60 Hz or a zero rate,
    /// `ShapeMismatch` for a wrong row count or length, otherwise as
    /// [`RdfcPipeline::run`].
    pub fn run_rows(
        &self,
        rows: Vec<Vec<f64>>,
        sampling_rate_hz: u32,
        notch_hz: u32,
    ) -> RdfcResult<RdfcAnalysis> {
        let notch = NotchFrequency::try_from(notch_hz)?;
        let epoch = Epoch::from_rows(sampling_rate_hz, rows)?;
        self.run(&epoch, notch)
    }
}
