//! End-to-end detection run: validate, normalize, cluster, resolve.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use dupescope_core::{
    ConfidenceClass, ContactRecord, EngineConfig, MergeStrategy, ValidationReport,
    validate_records,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::cluster::{ClusterBuilder, DuplicateGroup};
use crate::error::Result;
use crate::matcher::PairwiseMatcher;
use crate::merge::{MergeDecision, MergeResolver};
use crate::normalize::Normalizer;
use crate::tiebreak::{NoTieBreak, TieBreaker};

/// Counts behind the one-line run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Groups with a consolidated record (applied or proposed).
    pub merged_groups: usize,
    /// Records left once every merged group collapses to one.
    pub resulting_records: usize,
    /// Decisions the caller has to look at before anything is applied.
    pub conflicts: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "merged {} groups into {} records, {} conflicts require review",
            self.merged_groups, self.resulting_records, self.conflicts
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub validation: ValidationReport,
    pub records_considered: usize,
    pub candidate_pairs: usize,
    pub retained_edges: usize,
    pub threshold: ConfidenceClass,
    pub strategy: MergeStrategy,
    pub country_digit: Option<char>,
    pub groups: Vec<DuplicateGroup>,
    /// One decision per group, in group order.
    pub decisions: Vec<MergeDecision>,
    pub summary: RunSummary,
}

impl DetectionReport {
    /// Decisions that can be applied without asking anyone.
    pub fn applicable(&self) -> impl Iterator<Item = &MergeDecision> {
        self.decisions.iter().filter(|decision| !decision.needs_review())
    }

    /// Collapse every applicable group in `records` into its consolidated
    /// record, placed where the group's first member was. Everything else is
    /// returned untouched and in input order.
    pub fn apply(&self, records: Vec<ContactRecord>) -> Vec<ContactRecord> {
        let mut replacement: HashMap<&str, &ContactRecord> = HashMap::new();
        for decision in self.applicable() {
            if let Some(record) = decision.consolidated() {
                for member in &decision.members {
                    replacement.insert(member.as_str(), record);
                }
            }
        }

        let mut emitted: HashSet<&str> = HashSet::new();
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            match replacement.get(record.id.as_str()) {
                Some(merged) => {
                    if emitted.insert(merged.id.as_str()) {
                        out.push((*merged).clone());
                    }
                }
                None => out.push(record),
            }
        }
        out
    }
}

/// Runs the whole pipeline over one batch of records.
pub struct DuplicateDetector {
    config: EngineConfig,
    tie_breaker: Arc<dyn TieBreaker>,
    cancel: Option<Arc<AtomicBool>>,
}

impl DuplicateDetector {
    /// Fails if `config` is out of range; nothing has run at that point.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tie_breaker: Arc::new(NoTieBreak),
            cancel: None,
        })
    }

    pub fn with_tie_breaker(mut self, tie_breaker: Arc<dyn TieBreaker>) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn run(&self, records: Vec<ContactRecord>) -> Result<DetectionReport> {
        let (records, validation) = validate_records(records);
        for rejected in &validation.rejected {
            warn!(
                index = rejected.index,
                id = %rejected.id,
                reason = rejected.reason.message(),
                "record rejected"
            );
        }

        let normalizer = Normalizer::for_records(&records, &self.config.matching);
        let keys: Vec<_> = records.iter().map(|record| normalizer.normalize(record)).collect();
        info!(
            records = keys.len(),
            country_digit = ?normalizer.country_digit(),
            "normalization complete"
        );

        let mut builder = ClusterBuilder::new(&self.config);
        if let Some(flag) = &self.cancel {
            builder = builder.with_cancellation(Arc::clone(flag));
        }
        let outcome = builder.build_groups(&keys)?;

        let country_digit = normalizer.country_digit();
        let resolver = MergeResolver::new(normalizer)
            .with_matcher(PairwiseMatcher::new(&self.config.matching))
            .with_tie_breaker(Arc::clone(&self.tie_breaker));
        let strategy = self.config.merge.strategy;
        let by_id: HashMap<&str, &ContactRecord> =
            records.iter().map(|record| (record.id.as_str(), record)).collect();

        let decisions: Vec<MergeDecision> = outcome
            .groups
            .iter()
            .map(|group| {
                let members = group
                    .members
                    .iter()
                    .filter_map(|id| by_id.get(id.as_str()).copied())
                    .collect();
                resolver.resolve_members(group, members, strategy)
            })
            .collect();

        let summary = summarize(records.len(), &decisions);
        info!(%summary, strategy = %strategy, "resolution complete");

        Ok(DetectionReport {
            validation,
            records_considered: records.len(),
            candidate_pairs: outcome.candidate_pairs,
            retained_edges: outcome.retained_edges,
            threshold: builder.threshold(),
            strategy,
            country_digit,
            groups: outcome.groups,
            decisions,
            summary,
        })
    }
}

fn summarize(records: usize, decisions: &[MergeDecision]) -> RunSummary {
    let merged: Vec<&MergeDecision> = decisions.iter().filter(|d| d.is_merged()).collect();
    let collapsed: usize = merged.iter().map(|d| d.members.len().saturating_sub(1)).sum();
    RunSummary {
        merged_groups: merged.len(),
        resulting_records: records.saturating_sub(collapsed),
        conflicts: decisions.iter().filter(|d| d.needs_review()).count(),
    }
}
