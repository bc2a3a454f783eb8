//! Core types for rdFC pattern analysis
//!
//! This module provides the data model shared by the processing pipeline
//! and the command-line front end:
//! - Channel and channel-pair identifiers for an electrode triplet
//! - Mains notch frequency selection
//! - Five-minute three-channel epochs
//! - The 5×3 rdFC pattern matrix and the three match scores

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RdfcError, RdfcResult};

/// Number of electrodes in a triplet
pub const NUM_CHANNELS: usize = 3;

/// Number of unordered channel pairs in a triplet
pub const NUM_PAIRS: usize = 3;

/// Number of recursive connectivity orders in a pattern
pub const NUM_ORDERS: usize = 5;

/// Duration of an analysed epoch in seconds (5 minutes)
pub const EPOCH_DURATION_SECS: usize = 5 * 60;

// ============================================================================
// Channels
// ============================================================================

/// One electrode of the analysed triplet, in input row order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    /// First input row
    A,
    /// Second input row
    B,
    /// Third input row
    C,
}

impl Channel {
    /// All channels in input order
    pub const ALL: [Self; NUM_CHANNELS] = [Self::A, Self::B, Self::C];

    /// Row index of this channel in the epoch
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }

    /// Short display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unordered channel pair. The variant order is the pattern column order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelPair {
    /// {A, B}: column 0
    AB,
    /// {B, C}: column 1
    BC,
    /// {C, A}: column 2
    CA,
}

impl ChannelPair {
    /// All pairs in pattern column order
    pub const ALL: [Self; NUM_PAIRS] = [Self::AB, Self::BC, Self::CA];

    /// Pattern column of this pair
    #[inline]
    #[must_use]
    pub const fn column(self) -> usize {
        match self {
            Self::AB => 0,
            Self::BC => 1,
            Self::CA => 2,
        }
    }

    /// The two channels of the pair, lower row index first.
    #[inline]
    #[must_use]
    pub const fn channels(self) -> (Channel, Channel) {
        match self {
            Self::AB => (Channel::A, Channel::B),
            Self::BC => (Channel::B, Channel::C),
            Self::CA => (Channel::A, Channel::C),
        }
    }

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AB => "A-B",
            Self::BC => "B-C",
            Self::CA => "C-A",
        }
    }
}

impl fmt::Display for ChannelPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Mains Notch Frequency
// ============================================================================

/// Mains frequency convention removed by the notch filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotchFrequency {
    /// 50 Hz mains (Europe, Asia, Africa, Oceania)
    Hz50,
    /// 60 Hz mains (Americas)
    Hz60,
}

impl NotchFrequency {
    /// Notch centre in Hz
    #[inline]
    #[must_use]
    pub const fn hz(self) -> f64 {
        match self {
            Self::Hz50 => 50.0,
            Self::Hz60 => 60.0,
        }
    }
}

impl TryFrom<u32> for NotchFrequency {
    type Error = RdfcError;

    fn try_from(hz: u32) -> RdfcResult<Self> {
        match hz {
            50 => Ok(Self::Hz50),
            60 => Ok(Self::Hz60),
            other => Err(RdfcError::invalid(format!(
                "notch frequency must be 50 or 60 Hz, got {other} Hz"
            ))),
        }
    }
}

impl fmt::Display for NotchFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

// ============================================================================
// Epoch
// ============================================================================

/// A five-minute recording of an electrode triplet.
///
/// Used both for the raw input and for the filtered signal; the filter stage
/// returns a new epoch of identical shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Epoch {
    sampling_rate_hz: u32,
    channels: [Vec<f64>; NUM_CHANNELS],
}

impl Epoch {
    /// Number of samples per channel required at a sampling rate.
    #[inline]
    #[must_use]
    pub const fn expected_len(sampling_rate_hz: u32) -> usize {
        sampling_rate_hz as usize * EPOCH_DURATION_SECS
    }

    /// Create an epoch from three channels.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the sampling rate is zero or a sample is not
    /// finite, `ShapeMismatch` if a channel does not hold
    /// `sampling_rate_hz * 300` samples.
    pub fn new(sampling_rate_hz: u32, channels: [Vec<f64>; NUM_CHANNELS]) -> RdfcResult<Self> {
        if sampling_rate_hz == 0 {
            return Err(RdfcError::invalid("sampling rate must be a positive integer"));
        }

        let expected = Self::expected_len(sampling_rate_hz);
        for samples in &channels {
            if samples.len() != expected {
                return Err(RdfcError::shape("samples per channel", expected, samples.len()));
            }
        }

        for (channel, samples) in Channel::ALL.iter().zip(channels.iter()) {
            if let Some(i) = samples.iter().position(|v| !v.is_finite()) {
                return Err(RdfcError::invalid(format!(
                    "channel {channel} sample {i} is not a finite number"
                )));
            }
        }

        Ok(Self { sampling_rate_hz, channels })
    }

    /// Create an epoch from a list of rows (one per channel).
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if there are not exactly three rows, otherwise as
    /// [`Epoch::new`].
    pub fn from_rows(sampling_rate_hz: u32, rows: Vec<Vec<f64>>) -> RdfcResult<Self> {
        let channels: [Vec<f64>; NUM_CHANNELS] = rows
            .try_into()
            .map_err(|rows: Vec<Vec<f64>>| RdfcError::shape("epoch rows", NUM_CHANNELS, rows.len()))?;
        Self::new(sampling_rate_hz, channels)
    }

    /// Replace the samples, keeping the sampling rate.
    ///
    /// # Errors
    ///
    /// As [`Epoch::new`].
    pub fn with_channels(&self, channels: [Vec<f64>; NUM_CHANNELS]) -> RdfcResult<Self> {
        Self::new(self.sampling_rate_hz, channels)
    }

    /// Sampling rate in Hz
    #[inline]
    #[must_use]
    pub const fn sampling_rate_hz(&self) -> u32 {
        self.sampling_rate_hz
    }

    /// Samples per channel
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// Always false for a constructed epoch
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels[0].is_empty()
    }

    /// Samples of one channel
    #[inline]
    #[must_use]
    pub fn channel(&self, channel: Channel) -> &[f64] {
        &self.channels[channel.index()]
    }

    /// All channels in row order
    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[Vec<f64>; NUM_CHANNELS] {
        &self.channels
    }

    /// Reorder channels: row `i` of the result is `order[i]` of this epoch.
    #[must_use]
    pub fn permuted(&self, order: [Channel; NUM_CHANNELS]) -> Self {
        Self {
            sampling_rate_hz: self.sampling_rate_hz,
            channels: order.map(|ch| self.channels[ch.index()].clone()),
        }
    }

    /// Fail if any channel is constant.
    ///
    /// # Errors
    ///
    /// `DegenerateSignal` naming the first constant channel.
    pub fn check_variance(&self) -> RdfcResult<()> {
        for channel in Channel::ALL {
            if crate::math::is_constant(self.channel(channel)) {
                return Err(RdfcError::DegenerateSignal { channel });
            }
        }
        Ok(())
    }
}

// ============================================================================
// rdFC Pattern and Match Scores
// ============================================================================

/// The 5×3 rdFC pattern: rows are orders 1..=5, columns are
/// [`ChannelPair::ALL`].
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct RdfcPattern {
    rows: [[f64; NUM_PAIRS]; NUM_ORDERS],
}

impl RdfcPattern {
    /// Create a pattern from order-major rows.
    #[must_use]
    pub const fn from_rows(rows: [[f64; NUM_PAIRS]; NUM_ORDERS]) -> Self {
        Self { rows }
    }

    /// Create a pattern from a dynamically sized matrix.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` unless the matrix has 5 rows of 3 values.
    pub fn try_from_matrix(matrix: &[Vec<f64>]) -> RdfcResult<Self> {
        if matrix.len() != NUM_ORDERS {
            return Err(RdfcError::shape("pattern rows", NUM_ORDERS, matrix.len()));
        }

        let mut rows = [[0.0; NUM_PAIRS]; NUM_ORDERS];
        for (dst, src) in rows.iter_mut().zip(matrix) {
            if src.len() != NUM_PAIRS {
                return Err(RdfcError::shape("pattern columns", NUM_PAIRS, src.len()));
            }
            dst.copy_from_slice(src);
        }

        Ok(Self { rows })
    }

    /// Order-major rows
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> &[[f64; NUM_PAIRS]; NUM_ORDERS] {
        &self.rows
    }

    /// Row for a 1-based order (1..=5)
    #[must_use]
    pub fn order(&self, order: usize) -> Option<&[f64; NUM_PAIRS]> {
        order.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    /// Cell for a 1-based order and a pair
    #[must_use]
    pub fn value(&self, order: usize, pair: ChannelPair) -> Option<f64> {
        self.order(order).map(|row| row[pair.column()])
    }
}

/// Match scores against reference patterns 1, 2 and 3, in that order.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchScores([f64; 3]);

impl MatchScores {
    /// Wrap scores in reference order
    #[must_use]
    pub const fn new(scores: [f64; 3]) -> Self {
        Self(scores)
    }

    /// Scores in reference order
    #[inline]
    #[must_use]
    pub const fn as_array(&self) -> &[f64; 3] {
        &self.0
    }

    /// 1-based number of the best-matching reference
    #[must_use]
    pub fn best_match(&self) -> usize {
        let mut best = 0;
        for (i, score) in self.0.iter().enumerate() {
            if *score > self.0[best] {
                best = i;
            }
        }
        best + 1
    }
}
