//! Match scoring against the reference rdFC patterns
//!
//! A pattern is compared through its order-to-order changes: the four
//! first differences along orders, each scaled to unit length. The score
//! against a reference is the sum of the four cosine similarities, so it
//! lies in `[-4, 4]` and higher means a closer match.

use rdfc_core::math::{dot, unit_vector};
use rdfc_core::{
    MatchScores, RdfcPattern, RdfcResult, ReferencePattern, NUM_ORDERS, NUM_PAIRS,
    REFERENCE_PATTERNS,
};

/// Number of order-to-order difference rows
pub const NUM_DIFFERENCES: usize = NUM_ORDERS - 1;

/// Unit-length first differences along orders.
///
/// A difference row of zero length stays the zero vector.
pub fn normalized_differences(pattern: &RdfcPattern) -> [[f64; NUM_PAIRS]; NUM_DIFFERENCES] {
    let rows = pattern.rows();
    std::array::from_fn(|k| {
        let mut diff = [0.0; NUM_PAIRS];
        for (j, d) in diff.iter_mut().enumerate() {
            *d = rows[k + 1][j] - rows[k][j];
        }
        unit_vector(diff)
    })
}

/// Sum of row-wise dot products of two sets of unit difference rows.
fn difference_similarity(
    generated: &[[f64; NUM_PAIRS]; NUM_DIFFERENCES],
    reference: &[[f64; NUM_PAIRS]; NUM_DIFFERENCES],
) -> f64 {
    generated.iter().zip(reference).map(|(p, r)| dot(p, r)).sum()
}

/// Scores patterns against a fixed set of three references.
#[derive(Clone, Debug)]
pub struct MatchScorer {
    references: [[[f64; NUM_PAIRS]; NUM_DIFFERENCES]; 3],
}

impl MatchScorer {
    /// Scorer over the given references, in score order.
    pub fn new(references: &[ReferencePattern; 3]) -> Self {
        Self { references: references.map(|r| normalized_differences(&r.pattern)) }
    }

    /// Score a pattern against references 1, 2 and 3.
    pub fn score(&self, pattern: &RdfcPattern) -> MatchScores {
        let generated = normalized_differences(pattern);
        let scores = self.references.map(|reference| difference_similarity(&generated, &reference));
        MatchScores::new(scores)
    }

    /// Score a dynamically sized pattern matrix.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` unless the matrix is 5×3.
    pub fn score_matrix(&self, matrix: &[Vec<f64>]) -> RdfcResult<MatchScores> {
        let pattern = RdfcPattern::try_from_matrix(matrix)?;
        Ok(self.score(&pattern))
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new(&REFERENCE_PATTERNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfc_core::RdfcError;

    #[test]
    fn test_normalized_differences_are_unit_rows() {
        let diffs = normalized_differences(&REFERENCE_PATTERNS[0].pattern);
        for row in &diffs {
            assert!((dot(row, row) - 1.0).abs() < 1e-12);
        }

        // First difference of reference 1, {A,B}: 0.41 - 0.85 scaled
        let raw = [0.41 - 0.85, 0.36 - 0.82, 0.25 - 0.69];
        let norm = raw.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((diffs[0][0] - raw[0] / norm).abs() < 1e-12);
    }

    #[test]
    fn test_flat_pattern_scores_zero() {
        let flat = RdfcPattern::from_rows([[0.5, 0.2, -0.1]; NUM_ORDERS]);
        assert_eq!(normalized_differences(&flat), [[0.0; NUM_PAIRS]; NUM_DIFFERENCES]);
        let scores = MatchScorer::default().score(&flat);
        assert_eq!(scores.as_array(), &[0.0; 3]);
    }

    #[test]
    fn test_reference_matches_itself_best() {
        let scorer = MatchScorer::default();
        for (i, reference) in REFERENCE_PATTERNS.iter().enumerate() {
            let scores = scorer.score(&reference.pattern);
            let own = scores.as_array()[i];
            assert!((own - 4.0).abs() < 1e-12);
            for (j, other) in scores.as_array().iter().enumerate() {
                if j != i {
                    assert!(*other < own, "reference {} vs {}", i + 1, j + 1);
                }
            }
            assert_eq!(scores.best_match(), reference.number);
        }
    }

    #[test]
    fn test_scores_are_bounded() {
        let scorer = MatchScorer::default();
        let reference = REFERENCE_PATTERNS[1].pattern;
        let inverted = RdfcPattern::from_rows((*reference.rows()).map(|row| row.map(|v| -v)));

        let scores = scorer.score(&inverted);
        assert!((scores.as_array()[1] + 4.0).abs() < 1e-12);
        assert!(scores.as_array().iter().all(|s| (-4.0..=4.0).contains(s)));
    }

    #[test]
    fn test_score_matrix_shape() {
        let scorer = MatchScorer::default();
        let matrix: Vec<Vec<f64>> = REFERENCE_PATTERNS[2]
            .pattern
            .rows()
            .iter()
            .map(|row| row.to_vec())
            .collect();
        let scores = scorer.score_matrix(&matrix).unwrap();
        assert_eq!(scores.best_match(), 3);

        let err = scorer.score_matrix(&matrix[..4]).unwrap_err();
        assert_eq!(err, RdfcError::shape("pattern rows", 5, 4));

        let mut ragged = matrix.clone();
        ragged[2].push(0.0);
        let err = scorer.score_matrix(&ragged).unwrap_err();
        assert_eq!(err, RdfcError::shape("pattern columns", 3, 4));
    }
}
