//! Field-level consolidation of a duplicate group.
//!
//! Scalars come from the best-ranked member that has a value; lists are
//! unioned so no member's data is dropped. The resolver only returns a
//! decision; applying it is up to the caller.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use dupescope_core::{ConfidenceClass, ContactField, ContactId, ContactRecord, MergeStrategy};
use serde::Serialize;
use tracing::debug;

use crate::cluster::DuplicateGroup;
use crate::matcher::PairwiseMatcher;
use crate::normalize::{
    NormalizedKey, Normalizer, address_key, handle_key, normalize_email, url_key,
};
use crate::tiebreak::{NoTieBreak, TieBreaker};

/// Why a value won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Only one member had a value.
    OnlyValue,
    /// Taken from the member with more populated fields.
    MostComplete,
    /// Completeness tied and the tie-break hook preferred this member.
    TieBreak,
    /// Completeness tied; the lowest identifier wins.
    LowestIdentifier,
    /// Values of all members were unioned.
    Union,
    /// Set because at least one member had it set.
    AnyMember,
}

/// One field whose value differed across group members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecision {
    pub field: ContactField,
    /// Distinct non-empty values seen across members.
    pub candidates: Vec<String>,
    pub chosen: String,
    /// Member the chosen value came from; `None` for unions.
    pub source: Option<ContactId>,
    pub reason: DecisionReason,
}

/// A pair of group members scoring below HIGH. Pairs that were not retained
/// while grouping are scored again here, so chains are caught too.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakEdge {
    pub left: ContactId,
    pub right: ContactId,
    pub class: ConfidenceClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    Merged {
        record: ContactRecord,
    },
    /// Nothing was changed; a person has to look at the group.
    NeedsReview {
        reason: String,
        weak_edges: Vec<WeakEdge>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeDecision {
    pub strategy: MergeStrategy,
    pub members: Vec<ContactId>,
    pub outcome: MergeOutcome,
    pub field_decisions: Vec<FieldDecision>,
    /// Scalar fields the caller must confirm (interactive strategy only).
    /// List fields are unioned and `has_image` is or-ed, so they never
    /// appear here even when members differ.
    pub conflicts: Vec<ContactField>,
}

impl MergeDecision {
    pub fn consolidated(&self) -> Option<&ContactRecord> {
        match &self.outcome {
            MergeOutcome::Merged { record } => Some(record),
            MergeOutcome::NeedsReview { .. } => None,
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self.outcome, MergeOutcome::Merged { .. })
    }

    /// True when the caller has to step in before anything is applied.
    pub fn needs_review(&self) -> bool {
        !self.is_merged() || !self.conflicts.is_empty()
    }

    fn review(strategy: MergeStrategy, members: Vec<ContactId>, reason: String, weak_edges: Vec<WeakEdge>) -> Self {
        Self {
            strategy,
            members,
            outcome: MergeOutcome::NeedsReview { reason, weak_edges },
            field_decisions: Vec::new(),
            conflicts: Vec::new(),
        }
    }
}

struct Ranked<'a> {
    record: &'a ContactRecord,
    completeness: usize,
}

pub struct MergeResolver {
    normalizer: Normalizer,
    matcher: PairwiseMatcher,
    tie_breaker: Arc<dyn TieBreaker>,
}

impl MergeResolver {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            matcher: PairwiseMatcher::default(),
            tie_breaker: Arc::new(NoTieBreak),
        }
    }

    /// Matcher used to score member pairs the group carries no edge for.
    pub fn with_matcher(mut self, matcher: PairwiseMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_tie_breaker(mut self, tie_breaker: Arc<dyn TieBreaker>) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Resolve `group` against the full record set.
    pub fn resolve(
        &self,
        group: &DuplicateGroup,
        records: &[ContactRecord],
        strategy: MergeStrategy,
    ) -> MergeDecision {
        let members: Vec<&ContactRecord> = records
            .iter()
            .filter(|record| group.contains(&record.id))
            .collect();
        self.resolve_members(group, members, strategy)
    }

    /// Resolve `group` given its already looked-up member records.
    pub fn resolve_members(
        &self,
        group: &DuplicateGroup,
        members: Vec<&ContactRecord>,
        strategy: MergeStrategy,
    ) -> MergeDecision {
        if members.len() < 2 {
            return MergeDecision::review(
                strategy,
                group.members.clone(),
                "group members are missing from the input".to_string(),
                Vec::new(),
            );
        }

        match strategy {
            MergeStrategy::Conservative => {
                let weak_edges = self.weak_pairs(group, &members);
                if !weak_edges.is_empty() {
                    debug!(members = ?group.members, weak = weak_edges.len(), "conservative merge refused");
                    return MergeDecision::review(
                        strategy,
                        group.members.clone(),
                        format!(
                            "{} match(es) below HIGH confidence; manual review recommended",
                            weak_edges.len()
                        ),
                        weak_edges,
                    );
                }
                self.merge(strategy, group, members, false)
            }
            MergeStrategy::MostComplete => self.merge(strategy, group, members, false),
            MergeStrategy::Interactive => self.merge(strategy, group, members, true),
        }
    }

    fn merge(
        &self,
        strategy: MergeStrategy,
        group: &DuplicateGroup,
        members: Vec<&ContactRecord>,
        flag_conflicts: bool,
    ) -> MergeDecision {
        let ranked = self.rank(members);
        let mut record = ranked[0].record.clone();
        let mut field_decisions = Vec::new();
        let mut conflicts = Vec::new();

        for field in ContactField::SCALARS {
            let values: Vec<Option<String>> =
                ranked.iter().map(|member| member.record.scalar(field)).collect();
            let Some(winner) = values.iter().position(Option::is_some) else {
                continue;
            };
            record.copy_scalar(field, ranked[winner].record);

            let distinct: BTreeSet<&String> = values.iter().flatten().collect();
            if flag_conflicts && distinct.len() > 1 {
                conflicts.push(field);
            }

            let differs = distinct.len() > 1 || values.iter().any(Option::is_none);
            if let (true, Some(chosen)) = (differs, values[winner].clone()) {
                field_decisions.push(FieldDecision {
                    field,
                    candidates: distinct.into_iter().cloned().collect(),
                    chosen,
                    source: Some(ranked[winner].record.id.clone()),
                    reason: self.scalar_reason(&ranked, &values, winner),
                });
            }
        }

        let with_image: Vec<&Ranked> = ranked.iter().filter(|m| m.record.has_image).collect();
        record.has_image = !with_image.is_empty();
        if !with_image.is_empty() && with_image.len() < ranked.len() {
            field_decisions.push(FieldDecision {
                field: ContactField::HasImage,
                candidates: vec!["false".to_string(), "true".to_string()],
                chosen: "true".to_string(),
                source: Some(with_image[0].record.id.clone()),
                reason: DecisionReason::AnyMember,
            });
        }

        let (emails, decision) = union_field(ContactField::Emails, &ranked, |r| &r.emails, |v| {
            normalize_email(&v.value).map(|email| email.address)
        });
        record.emails = emails;
        field_decisions.extend(decision);

        let (phones, decision) = union_field(ContactField::Phones, &ranked, |r| &r.phones, |v| {
            self.normalizer
                .phone_key(&v.value)
                .or_else(|| non_blank(&v.value.to_lowercase()))
        });
        record.phones = phones;
        field_decisions.extend(decision);

        let (addresses, decision) =
            union_field(ContactField::Addresses, &ranked, |r| &r.addresses, |a| {
                (!a.is_empty()).then(|| address_key(a))
            });
        record.addresses = addresses;
        field_decisions.extend(decision);

        let (urls, decision) = union_field(ContactField::Urls, &ranked, |r| &r.urls, |v| {
            non_blank(&url_key(&v.value))
        });
        record.urls = urls;
        field_decisions.extend(decision);

        let (profiles, decision) =
            union_field(ContactField::SocialProfiles, &ranked, |r| &r.social_profiles, |h| {
                (!h.handle.trim().is_empty()).then(|| handle_key(h))
            });
        record.social_profiles = profiles;
        field_decisions.extend(decision);

        let (messages, decision) =
            union_field(ContactField::InstantMessages, &ranked, |r| &r.instant_messages, |h| {
                (!h.handle.trim().is_empty()).then(|| handle_key(h))
            });
        record.instant_messages = messages;
        field_decisions.extend(decision);

        debug!(
            keep = %record.id,
            members = group.len(),
            decisions = field_decisions.len(),
            conflicts = conflicts.len(),
            "group merged"
        );

        MergeDecision {
            strategy,
            members: group.members.clone(),
            outcome: MergeOutcome::Merged { record },
            field_decisions,
            conflicts,
        }
    }

    /// Every member pair below HIGH, ordered by `(left, right)`.
    fn weak_pairs(&self, group: &DuplicateGroup, members: &[&ContactRecord]) -> Vec<WeakEdge> {
        let mut keys: Vec<NormalizedKey> = members
            .iter()
            .map(|record| self.normalizer.normalize(record))
            .collect();
        keys.sort_by(|a, b| a.id.cmp(&b.id));

        let mut weak = Vec::new();
        for (pos, left) in keys.iter().enumerate() {
            for right in &keys[pos + 1..] {
                let class = group
                    .edges
                    .iter()
                    .find(|edge| edge.left == left.id && edge.right == right.id)
                    .map(|edge| edge.class)
                    .unwrap_or_else(|| self.matcher.match_pair(left, right).class);
                if class < ConfidenceClass::High {
                    weak.push(WeakEdge {
                        left: left.id.clone(),
                        right: right.id.clone(),
                        class,
                    });
                }
            }
        }
        weak
    }

    /// Most complete first, then the tie-break hook, then lowest identifier.
    ///
    /// Members are put in identifier order first so the outcome never
    /// depends on the order records arrived in.
    fn rank<'a>(&self, mut members: Vec<&'a ContactRecord>) -> Vec<Ranked<'a>> {
        members.sort_by(|a, b| a.id.cmp(&b.id));
        let mut ranked: Vec<Ranked<'a>> = members
            .into_iter()
            .map(|record| Ranked {
                record,
                completeness: record.completeness(),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.completeness
                .cmp(&a.completeness)
                .then_with(|| self.tie_breaker.prefer(a.record, b.record))
                .then_with(|| a.record.id.cmp(&b.record.id))
        });
        ranked
    }

    fn scalar_reason(
        &self,
        ranked: &[Ranked],
        values: &[Option<String>],
        winner: usize,
    ) -> DecisionReason {
        let runner_up = values
            .iter()
            .enumerate()
            .skip(winner + 1)
            .find(|(_, value)| value.is_some())
            .map(|(idx, _)| idx);

        let Some(runner_up) = runner_up else {
            return DecisionReason::OnlyValue;
        };

        let (win, other) = (&ranked[winner], &ranked[runner_up]);
        if win.completeness > other.completeness {
            DecisionReason::MostComplete
        } else if self.tie_breaker.prefer(win.record, other.record) == Ordering::Less {
            DecisionReason::TieBreak
        } else {
            DecisionReason::LowestIdentifier
        }
    }
}

/// Union a list field over ranked members, de-duplicated by `key`.
///
/// Items whose key is `None` are dropped. Returns a decision when members'
/// lists were not identical.
fn union_field<T: Clone>(
    field: ContactField,
    ranked: &[Ranked],
    items: impl Fn(&ContactRecord) -> &Vec<T>,
    key: impl Fn(&T) -> Option<String>,
) -> (Vec<T>, Option<FieldDecision>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();
    let mut per_member: Vec<BTreeSet<String>> = Vec::with_capacity(ranked.len());

    for member in ranked {
        let mut member_keys = BTreeSet::new();
        for item in items(member.record) {
            let Some(k) = key(item) else {
                continue;
            };
            if seen.insert(k.clone()) {
                merged.push(item.clone());
            }
            member_keys.insert(k);
        }
        per_member.push(member_keys);
    }

    let differs = per_member.windows(2).any(|pair| pair[0] != pair[1]);
    if !differs {
        return (merged, None);
    }

    let candidates: Vec<String> = per_member
        .into_iter()
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let decision = FieldDecision {
        field,
        chosen: candidates.join(", "),
        candidates,
        source: None,
        reason: DecisionReason::Union,
    };
    (merged, Some(decision))
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{MatchResult, MatchTiers};
    use crate::tiebreak::DubiousScoreTieBreaker;
    use dupescope_core::{Birthday, MatchingConfig};

    fn resolver() -> MergeResolver {
        MergeResolver::new(Normalizer::new(&MatchingConfig::default()))
    }

    fn group(ids: &[&str], classes: &[ConfidenceClass]) -> DuplicateGroup {
        let edges: Vec<MatchResult> = ids
            .windows(2)
            .zip(classes)
            .map(|(pair, class)| MatchResult {
                left: pair[0].to_string(),
                right: pair[1].to_string(),
                tiers: MatchTiers::default(),
                score: 0,
                class: *class,
            })
            .collect();
        DuplicateGroup {
            members: ids.iter().map(|id| id.to_string()).collect(),
            min_class: classes.iter().copied().min().unwrap_or_default(),
            edges,
        }
    }

    #[test]
    fn test_emails_are_unioned_not_overwritten() {
        let a = ContactRecord::new("a").with_name("Ann", "Lee").with_email("a@x.com");
        let b = ContactRecord::new("b").with_name("Ann", "Lee").with_email("b@x.com");
        let records = vec![a, b];

        let decision = resolver().resolve(
            &group(&["a", "b"], &[ConfidenceClass::High]),
            &records,
            MergeStrategy::MostComplete,
        );

        let merged = decision.consolidated().unwrap();
        let emails: Vec<&str> = merged.emails.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
        let email_decision = decision
            .field_decisions
            .iter()
            .find(|d| d.field == ContactField::Emails)
            .unwrap();
        assert_eq!(email_decision.reason, DecisionReason::Union);
    }

    #[test]
    fn test_duplicate_list_values_removed_by_normalized_form() {
        let a = ContactRecord::new("a").with_email("Ann@X.com").with_phone("(555) 123-4567");
        let b = ContactRecord::new("b").with_email("ann@x.com ").with_phone("555.123.4567");
        let records = vec![a, b];

        let decision = resolver().resolve(
            &group(&["a", "b"], &[ConfidenceClass::Exact]),
            &records,
            MergeStrategy::MostComplete,
        );
        let merged = decision.consolidated().unwrap();
        assert_eq!(merged.emails.len(), 1);
        assert_eq!(merged.phones.len(), 1);
        assert!(decision.field_decisions.is_empty());
    }

    #[test]
    fn test_conservative_refuses_weak_groups() {
        let records = vec![
            ContactRecord::new("a").with_name("Jon", "Smith"),
            ContactRecord::new("b").with_name("John", "Smith"),
            ContactRecord::new("c").with_name("John", "Smith"),
        ];
        let g = group(&["a", "b", "c"], &[ConfidenceClass::Medium, ConfidenceClass::High]);

        let decision = resolver().resolve(&g, &records, MergeStrategy::Conservative);
        assert!(!decision.is_merged());
        assert!(decision.needs_review());
        assert!(decision.consolidated().is_none());
        assert!(decision.field_decisions.is_empty());
        match &decision.outcome {
            MergeOutcome::NeedsReview { weak_edges, .. } => {
                let pairs: Vec<(&str, &str, ConfidenceClass)> = weak_edges
                    .iter()
                    .map(|e| (e.left.as_str(), e.right.as_str(), e.class))
                    .collect();
                assert_eq!(
                    pairs,
                    vec![
                        ("a", "b", ConfidenceClass::Medium),
                        ("a", "c", ConfidenceClass::Medium),
                    ]
                );
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(records[0].name.given.as_deref(), Some("Jon"));
    }

    #[test]
    fn test_conservative_scores_pairs_missing_from_the_chain() {
        let records = vec![
            ContactRecord::new("a").with_name("Ann", "Lee").with_email("ann@x.org"),
            ContactRecord::new("b")
                .with_name("Ann", "Lee")
                .with_email("ann@x.org")
                .with_email("bob@ray.net"),
            ContactRecord::new("c").with_name("Bob", "Ray").with_email("bob@ray.net"),
        ];
        let g = group(&["a", "b", "c"], &[ConfidenceClass::Exact, ConfidenceClass::High]);

        let decision = resolver().resolve(&g, &records, MergeStrategy::Conservative);
        match &decision.outcome {
            MergeOutcome::NeedsReview { weak_edges, .. } => {
                assert_eq!(weak_edges.len(), 1);
                assert_eq!((weak_edges[0].left.as_str(), weak_edges[0].right.as_str()), ("a", "c"));
                assert_eq!(weak_edges[0].class, ConfidenceClass::None);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_conservative_merges_confident_groups() {
        let records = vec![
            ContactRecord::new("a").with_name("Ann", "Lee").with_email("ann@x.org"),
            ContactRecord::new("b").with_name("Ann", "Lee"),
        ];
        let decision = resolver().resolve(
            &group(&["a", "b"], &[ConfidenceClass::High]),
            &records,
            MergeStrategy::Conservative,
        );
        assert!(decision.is_merged());
        assert!(!decision.needs_review());
    }

    #[test]
    fn test_scalar_from_most_complete_member() {
        let mut sparse = ContactRecord::new("a").with_name("J.", "Doe");
        sparse.organization = Some("Initech".to_string());
        let mut rich = ContactRecord::new("b")
            .with_name("John", "Doe")
            .with_email("john@doe.net")
            .with_phone("555 000 1111");
        rich.job_title = Some("Engineer".to_string());
        let records = vec![sparse, rich];

        let decision = resolver().resolve(
            &group(&["a", "b"], &[ConfidenceClass::Medium]),
            &records,
            MergeStrategy::MostComplete,
        );
        let merged = decision.consolidated().unwrap();

        assert_eq!(merged.id, "b");
        assert_eq!(merged.name.given.as_deref(), Some("John"));
        assert_eq!(merged.organization.as_deref(), Some("Initech"));
        assert_eq!(merged.job_title.as_deref(), Some("Engineer"));

        let given = decision
            .field_decisions
            .iter()
            .find(|d| d.field == ContactField::Given)
            .unwrap();
        assert_eq!(given.reason, DecisionReason::MostComplete);
        assert_eq!(given.candidates, vec!["J.", "John"]);

        let org = decision
            .field_decisions
            .iter()
            .find(|d| d.field == ContactField::Organization)
            .unwrap();
        assert_eq!(org.reason, DecisionReason::OnlyValue);
        assert_eq!(org.source.as_deref(), Some("a"));
        assert!(
            !decision
                .field_decisions
                .iter()
                .any(|d| d.field == ContactField::Family)
        );
    }

    #[test]
    fn test_ties_keep_lowest_identifier() {
        let records = vec![
            ContactRecord::new("b").with_name("Robert", "Smith"),
            ContactRecord::new("a").with_name("Bob", "Smith"),
        ];
        let decision = resolver().resolve(
            &group(&["a", "b"], &[ConfidenceClass::Medium]),
            &records,
            MergeStrategy::MostComplete,
        );
        let merged = decision.consolidated().unwrap();
        assert_eq!(merged.id, "a");
        assert_eq!(merged.name.given.as_deref(), Some("Bob"));
        let given = &decision.field_decisions[0];
        assert_eq!(given.reason, DecisionReason::LowestIdentifier);
    }

    #[test]
    fn test_tie_breaker_prefers_less_dubious_record() {
        let records = vec![
            ContactRecord::new("a").with_name("Bob", "Smith"),
            ContactRecord::new("b").with_name("Robert", "Smith"),
        ];
        let breaker = DubiousScoreTieBreaker::new(|record: &ContactRecord| {
            Some(if record.id == "a" { 50 } else { 5 })
        });
        let resolver = resolver().with_tie_breaker(Arc::new(breaker));

        let decision = resolver.resolve(
            &group(&["a", "b"], &[ConfidenceClass::Medium]),
            &records,
            MergeStrategy::MostComplete,
        );
        let merged = decision.consolidated().unwrap();
        assert_eq!(merged.name.given.as_deref(), Some("Robert"));
        assert_eq!(decision.field_decisions[0].reason, DecisionReason::TieBreak);
    }

    #[test]
    fn test_unscored_members_do_not_make_ranking_order_dependent() {
        let records = vec![
            ContactRecord::new("a").with_name("Alan", "Smith"),
            ContactRecord::new("b").with_name("Bert", "Smith"),
            ContactRecord::new("c").with_name("Carl", "Smith"),
        ];
        let breaker = DubiousScoreTieBreaker::new(|record: &ContactRecord| match record.id.as_str() {
            "a" => Some(9),
            "c" => Some(1),
            _ => None,
        });
        let resolver = resolver().with_tie_breaker(Arc::new(breaker));
        let g = group(&["a", "b", "c"], &[ConfidenceClass::High, ConfidenceClass::High]);

        let orders: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        let decisions: Vec<MergeDecision> = orders
            .iter()
            .map(|order| {
                let permuted: Vec<ContactRecord> =
                    order.iter().map(|&idx| records[idx].clone()).collect();
                resolver.resolve(&g, &permuted, MergeStrategy::MostComplete)
            })
            .collect();

        for decision in &decisions {
            assert_eq!(decision, &decisions[0]);
        }
        let merged = decisions[0].consolidated().unwrap();
        assert_eq!(merged.id, "c");
        assert_eq!(merged.name.given.as_deref(), Some("Carl"));
        assert_eq!(decisions[0].field_decisions[0].reason, DecisionReason::TieBreak);
    }

    #[test]
    fn test_interactive_flags_disagreeing_fields() {
        let mut a = ContactRecord::new("a").with_name("Ann", "Lee");
        a.birthday = Some(Birthday {
            day: Some(1),
            month: Some(2),
            year: Some(1990),
        });
        let mut b = ContactRecord::new("b").with_name("Anne", "Lee");
        b.birthday = Some(Birthday {
            day: Some(2),
            month: Some(1),
            year: Some(1990),
        });
        b.note = Some("met at conf".to_string());
        let records = vec![a, b];

        let decision = resolver().resolve(
            &group(&["a", "b"], &[ConfidenceClass::Medium]),
            &records,
            MergeStrategy::Interactive,
        );
        assert!(decision.is_merged());
        assert!(decision.needs_review());
        assert_eq!(
            decision.conflicts,
            vec![ContactField::Given, ContactField::Birthday]
        );
        assert_eq!(decision.consolidated().unwrap().note.as_deref(), Some("met at conf"));
    }

    #[test]
    fn test_has_image_survives_merge() {
        let mut a = ContactRecord::new("a").with_name("Ann", "Lee");
        a.has_image = true;
        let b = ContactRecord::new("b")
            .with_name("Ann", "Lee")
            .with_email("ann@x.org")
            .with_email("ann@y.org");
        let records = vec![a, b];

        let decision = resolver().resolve(
            &group(&["a", "b"], &[ConfidenceClass::High]),
            &records,
            MergeStrategy::MostComplete,
        );
        let merged = decision.consolidated().unwrap();
        assert_eq!(merged.id, "b");
        assert!(merged.has_image);
    }

    #[test]
    fn test_missing_members_need_review() {
        let records = vec![ContactRecord::new("a")];
        let decision = resolver().resolve(
            &group(&["a", "zz"], &[ConfidenceClass::Exact]),
            &records,
            MergeStrategy::MostComplete,
        );
        assert!(!decision.is_merged());
    }
}
