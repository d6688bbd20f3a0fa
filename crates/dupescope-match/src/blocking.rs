//! Candidate-pair generation.
//!
//! Small inputs are compared exhaustively. Larger ones only compare records
//! that share at least one cheap blocking key, which bounds the work by the
//! size of the largest block instead of the square of the input.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::normalize::NormalizedKey;

/// A cheap key two records must share to become a candidate pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum BlockKey {
    Name(String),
    Email(String),
    Phone(String),
    PhoneSuffix(String),
    FamilySound(String),
    GivenSound(String),
}

fn block_keys(key: &NormalizedKey) -> Vec<BlockKey> {
    let mut keys: Vec<BlockKey> = Vec::new();

    keys.extend(key.emails.iter().cloned().map(BlockKey::Email));
    keys.extend(key.phones.iter().cloned().map(BlockKey::Phone));
    keys.extend(key.phone_suffixes.iter().cloned().map(BlockKey::PhoneSuffix));

    if key.has_name {
        if !key.full_name.is_empty() {
            keys.push(BlockKey::Name(key.full_name.clone()));
        }
        if !key.family_code.is_empty() {
            keys.push(BlockKey::FamilySound(key.family_code.as_str().to_string()));
        }
        if !key.given_code.is_empty() {
            keys.push(BlockKey::GivenSound(key.given_code.as_str().to_string()));
        }
    }

    keys
}

/// Index pairs `(i, j)` with `i < j`, sorted and free of repeats.
///
/// `keys` must be ordered by identifier so that `i < j` implies
/// `keys[i].id < keys[j].id`.
pub fn candidate_pairs(
    keys: &[&NormalizedKey],
    blocking: bool,
    full_scan_limit: usize,
) -> Vec<(usize, usize)> {
    if !blocking || keys.len() <= full_scan_limit {
        debug!(records = keys.len(), "full pairwise scan");
        return all_pairs(keys.len());
    }

    let mut blocks: BTreeMap<BlockKey, Vec<usize>> = BTreeMap::new();
    for (idx, key) in keys.iter().enumerate() {
        for block in block_keys(key) {
            blocks.entry(block).or_default().push(idx);
        }
    }

    let mut pairs: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut largest = 0usize;
    for members in blocks.values() {
        largest = largest.max(members.len());
        for (pos, &i) in members.iter().enumerate() {
            for &j in &members[pos + 1..] {
                if i != j {
                    pairs.insert((i.min(j), i.max(j)));
                }
            }
        }
    }

    debug!(
        records = keys.len(),
        blocks = blocks.len(),
        largest_block = largest,
        pairs = pairs.len(),
        "blocked candidate generation"
    );

    pairs.into_iter().collect()
}

fn all_pairs(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n.saturating_mul(n.saturating_sub(1)) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;
    use dupescope_core::{ContactRecord, MatchingConfig};

    fn keys(records: &[ContactRecord]) -> Vec<NormalizedKey> {
        let normalizer = Normalizer::new(&MatchingConfig::default());
        records.iter().map(|r| normalizer.normalize(r)).collect()
    }

    #[test]
    fn test_small_input_uses_full_scan() {
        let owned = keys(&[
            ContactRecord::new("a").with_name("Ann", "Lee"),
            ContactRecord::new("b").with_name("Bob", "Ray"),
            ContactRecord::new("c").with_name("Cy", "Young"),
        ]);
        let refs: Vec<&NormalizedKey> = owned.iter().collect();

        let pairs = candidate_pairs(&refs, true, 10);
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_blocking_only_pairs_records_sharing_a_key() {
        let owned = keys(&[
            ContactRecord::new("a").with_name("Ann", "Lee").with_email("ann@x.org"),
            ContactRecord::new("b").with_name("Bob", "Ray"),
            ContactRecord::new("c").with_name("Annie", "Lea"),
            ContactRecord::new("d").with_email("ANN@x.org"),
        ]);
        let refs: Vec<&NormalizedKey> = owned.iter().collect();

        let pairs = candidate_pairs(&refs, true, 0);
        // a/c share the L000 family code, a/d share an email.
        assert_eq!(pairs, vec![(0, 2), (0, 3)]);
    }

    #[test]
    fn test_shared_given_name_sound_is_enough() {
        let owned = keys(&[
            ContactRecord::new("a").with_name("Christopher", "Brown"),
            ContactRecord::new("b").with_name("Dana", "Ito"),
            ContactRecord::new("c").with_name("Christopher", "Crown"),
        ]);
        let refs: Vec<&NormalizedKey> = owned.iter().collect();

        let pairs = candidate_pairs(&refs, true, 0);
        assert_eq!(pairs, vec![(0, 2)]);
    }

    #[test]
    fn test_identity_pairs_are_never_generated() {
        let owned = keys(&[
            ContactRecord::new("a")
                .with_name("Ann", "Lee")
                .with_email("ann@x.org")
                .with_phone("555 123 4567"),
            ContactRecord::new("b")
                .with_name("Ann", "Lee")
                .with_email("ann@x.org")
                .with_phone("555 123 4567"),
        ]);
        let refs: Vec<&NormalizedKey> = owned.iter().collect();

        for blocking in [true, false] {
            let pairs = candidate_pairs(&refs, blocking, 0);
            assert_eq!(pairs, vec![(0, 1)]);
        }
    }
}
