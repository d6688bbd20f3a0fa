//! Ordered-rule combination of match tiers into one confidence value.
//!
//! Tiers are not independent evidence, so they are never summed: the first
//! rule that applies decides the score. Rule order is part of the contract.

use dupescope_core::ConfidenceClass;
use serde::Serialize;

use crate::matcher::MatchTiers;

pub const SCORE_EXACT: u8 = 100;
pub const SCORE_CONTACT_OVERLAP: u8 = 85;
pub const SCORE_EXACT_NAME: u8 = 75;
pub const SCORE_FUZZY_PHONETIC: u8 = 65;
pub const SCORE_FUZZY: u8 = 50;
pub const SCORE_PHONETIC: u8 = 35;
pub const SCORE_NONE: u8 = 0;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Confidence {
    pub score: u8,
    pub class: ConfidenceClass,
}

impl Confidence {
    const fn new(score: u8, class: ConfidenceClass) -> Self {
        Self { score, class }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConfidenceAggregator {
    fuzzy_threshold: f64,
}

impl Default for ConfidenceAggregator {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl ConfidenceAggregator {
    pub fn new(fuzzy_threshold: f64) -> Self {
        Self {
            fuzzy_threshold: fuzzy_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn fuzzy_threshold(&self) -> f64 {
        self.fuzzy_threshold
    }

    pub fn score(&self, tiers: &MatchTiers) -> Confidence {
        let fuzzy = tiers.fuzzy_similarity > 0.0 && tiers.fuzzy_similarity >= self.fuzzy_threshold;

        if tiers.exact_name && tiers.contact_overlap {
            Confidence::new(SCORE_EXACT, ConfidenceClass::Exact)
        } else if tiers.contact_overlap {
            Confidence::new(SCORE_CONTACT_OVERLAP, ConfidenceClass::High)
        } else if tiers.exact_name {
            Confidence::new(SCORE_EXACT_NAME, ConfidenceClass::High)
        } else if fuzzy && tiers.phonetic_match {
            Confidence::new(SCORE_FUZZY_PHONETIC, ConfidenceClass::Medium)
        } else if fuzzy {
            Confidence::new(SCORE_FUZZY, ConfidenceClass::Medium)
        } else if tiers.phonetic_match {
            Confidence::new(SCORE_PHONETIC, ConfidenceClass::Low)
        } else {
            Confidence::new(SCORE_NONE, ConfidenceClass::None)
        }
    }
}
