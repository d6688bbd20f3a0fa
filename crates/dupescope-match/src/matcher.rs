//! Four-tier pairwise comparison of normalized contacts.

use dupescope_core::{ConfidenceClass, ContactId, MatchingConfig};
use serde::Serialize;

use crate::confidence::{Confidence, ConfidenceAggregator};
use crate::normalize::NormalizedKey;

/// Independent signals computed for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MatchTiers {
    pub exact_name: bool,
    pub contact_overlap: bool,
    pub fuzzy_similarity: f64,
    pub phonetic_match: bool,
}

/// Scored comparison of two distinct records, `left < right` by identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub left: ContactId,
    pub right: ContactId,
    #[serde(flatten)]
    pub tiers: MatchTiers,
    pub score: u8,
    pub class: ConfidenceClass,
}

impl MatchResult {
    pub fn confidence(&self) -> Confidence {
        Confidence {
            score: self.score,
            class: self.class,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseMatcher {
    aggregator: ConfidenceAggregator,
    min_fuzzy_name_chars: usize,
}

impl PairwiseMatcher {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            aggregator: ConfidenceAggregator::new(config.fuzzy_threshold),
            min_fuzzy_name_chars: config.min_fuzzy_name_chars,
        }
    }

    pub fn aggregator(&self) -> &ConfidenceAggregator {
        &self.aggregator
    }

    /// Evaluate every tier. Symmetric in its arguments.
    pub fn tiers(&self, a: &NormalizedKey, b: &NormalizedKey) -> MatchTiers {
        let contact_overlap = !a.emails.is_disjoint(&b.emails)
            || !a.phones.is_disjoint(&b.phones)
            || !a.phone_suffixes.is_disjoint(&b.phone_suffixes);

        // Nameless records can only be linked through contact info.
        if !a.has_name || !b.has_name {
            return MatchTiers {
                contact_overlap,
                ..MatchTiers::default()
            };
        }

        let exact_name = !a.full_name.is_empty() && a.full_name == b.full_name;

        let fuzzy_similarity = if self.too_short(&a.full_name) || self.too_short(&b.full_name) {
            0.0
        } else {
            name_similarity(&a.full_name, &b.full_name)
        };

        let phonetic_match =
            a.family_code.matches(&b.family_code) && a.given_code.matches(&b.given_code);

        MatchTiers {
            exact_name,
            contact_overlap,
            fuzzy_similarity,
            phonetic_match,
        }
    }

    /// Compare two distinct records and score the result.
    pub fn match_pair(&self, a: &NormalizedKey, b: &NormalizedKey) -> MatchResult {
        debug_assert_ne!(a.id, b.id, "a record is never matched against itself");

        let (left, right) = if a.id <= b.id { (a, b) } else { (b, a) };
        let tiers = self.tiers(left, right);
        let Confidence { score, class } = self.aggregator.score(&tiers);

        MatchResult {
            left: left.id.clone(),
            right: right.id.clone(),
            tiers,
            score,
            class,
        }
    }

    fn too_short(&self, name: &str) -> bool {
        name.chars().count() < self.min_fuzzy_name_chars
    }
}

/// `1 - levenshtein / max(len)`, over characters. Empty input scores 0.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b).clamp(0.0, 1.0)
}
