//! Canonical rdFC reference patterns
//!
//! The three reference signatures a generated pattern is scored against.
//! They are compiled-in constants: rows are orders 1..=5, columns are the
//! pairs {A,B}, {B,C}, {C,A}, the same convention as [`RdfcPattern`].

use serde::Serialize;

use crate::types::RdfcPattern;

/// A named reference signature.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReferencePattern {
    /// 1-based reference number, as reported in match scores
    pub number: usize,
    /// The 5×3 reference matrix
    pub pattern: RdfcPattern,
}

/// Reference pattern 1: strong order-1 coupling that decays steeply, with
/// the {C,A} pair weakest at order 1 and strongest by order 5.
pub const FIRST_REFERENCE: ReferencePattern = ReferencePattern {
    number: 1,
    pattern: RdfcPattern::from_rows([
        [0.8500, 0.8200, 0.6900],
        [0.4100, 0.3600, 0.2500],
        [0.2200, 0.1800, 0.1900],
        [0.0900, 0.1200, 0.1500],
        [-0.0300, 0.0700, 0.1600],
    ]),
};

/// Reference pattern 2: uniformly high order-1 coupling that persists into
/// order 2 before collapsing.
pub const SECOND_REFERENCE: ReferencePattern = ReferencePattern {
    number: 2,
    pattern: RdfcPattern::from_rows([
        [0.9200, 0.9100, 0.9200],
        [0.7600, 0.7400, 0.7800],
        [0.3100, 0.3500, 0.2900],
        [0.2400, 0.1900, 0.2600],
        [0.0500, 0.0900, 0.0200],
    ]),
};

/// Reference pattern 3: moderate, uneven order-1 coupling with the {B,C}
/// pair dominating early and fading to negative by order 5.
pub const THIRD_REFERENCE: ReferencePattern = ReferencePattern {
    number: 3,
    pattern: RdfcPattern::from_rows([
        [0.6500, 0.7800, 0.7200],
        [0.2700, 0.4600, 0.3900],
        [0.1500, 0.1100, 0.2300],
        [0.1800, 0.0400, 0.1300],
        [0.1100, -0.0200, 0.2100],
    ]),
};

/// All reference patterns in score order.
pub static REFERENCE_PATTERNS: [ReferencePattern; 3] =
    [FIRST_REFERENCE, SECOND_REFERENCE, THIRD_REFERENCE];
