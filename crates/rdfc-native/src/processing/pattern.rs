//! Recursive dynamic functional connectivity
//!
//! Order 1 is the whole-epoch Pearson correlation of each channel pair.
//! Every further order replaces each pair by its one-second rolling
//! correlation trace and correlates those traces again, so order `k`
//! describes the dynamics of the order `k - 1` connectivity.

use rdfc_core::math::{pearson, rolling_pearson};
use rdfc_core::{ChannelPair, Epoch, RdfcError, RdfcPattern, RdfcResult, NUM_ORDERS, NUM_PAIRS};

/// Per-pair series of one order, indexed like [`ChannelPair::ALL`] for
/// orders > 1 and like the epoch channels for order 1.
type Series = [Vec<f64>; NUM_PAIRS];

/// Five-order rdFC pattern generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternGenerator {
    window: usize,
}

impl PatternGenerator {
    /// Generator with an explicit rolling window length in samples.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the window is shorter than two samples.
    pub fn new(window: usize) -> RdfcResult<Self> {
        if window < 2 {
            return Err(RdfcError::invalid(format!(
                "rolling window must span at least 2 samples, got {window}"
            )));
        }
        Ok(Self { window })
    }

    /// Generator with a one-second window.
    ///
    /// # Errors
    ///
    /// As [`PatternGenerator::new`].
    pub fn for_sampling_rate(sampling_rate_hz: u32) -> RdfcResult<Self> {
        Self::new(sampling_rate_hz as usize)
    }

    /// Rolling window length in samples
    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Compute the 5×3 pattern of a (filtered) epoch.
    ///
    /// # Errors
    ///
    /// `DegenerateSignal` if a whole channel is constant, `ShapeMismatch` if
    /// an order's series would hold fewer than two samples.
    pub fn generate(&self, epoch: &Epoch) -> RdfcResult<RdfcPattern> {
        epoch.check_variance()?;

        let mut series: Series = epoch.channels().clone();
        let mut rows = [[0.0; NUM_PAIRS]; NUM_ORDERS];

        for (k, row) in rows.iter_mut().enumerate() {
            let order = k + 1;
            let len = series[0].len();
            if len < 2 {
                return Err(RdfcError::shape("samples in an order's series", 2, len));
            }

            *row = correlate_pairs(&series);
            for (pair, value) in ChannelPair::ALL.iter().zip(row.iter()) {
                if *value == 0.0 {
                    tracing::debug!("Order {} pair {} has zero variance, cell set to 0", order, pair);
                }
            }

            if order < NUM_ORDERS {
                series = self.next_order(&series);
            }
        }

        tracing::debug!("Generated {}-order pattern with window {}", NUM_ORDERS, self.window);
        Ok(RdfcPattern::from_rows(rows))
    }

    /// Rolling correlation trace of every pair: the next order's channels.
    fn next_order(&self, series: &Series) -> Series {
        ChannelPair::ALL.map(|pair| {
            let (x, y) = pair.channels();
            rolling_pearson(&series[x.index()], &series[y.index()], self.window)
        })
    }
}

/// Whole-series correlation of each pair in column order.
fn correlate_pairs(series: &Series) -> [f64; NUM_PAIRS] {
    ChannelPair::ALL.map(|pair| {
        let (x, y) = pair.channels();
        pearson(&series[x.index()], &series[y.index()])
    })
}
