//! Transitive grouping of confident pairwise matches.
//!
//! Scoring is fanned out over a rayon pool in fixed-size batches; grouping
//! runs afterwards on a single thread over the sorted edge list, so the
//! output never depends on the order in which workers finish.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dupescope_core::{ConfidenceClass, ContactId, EngineConfig};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::blocking::candidate_pairs;
use crate::error::{MatchError, Result};
use crate::matcher::{MatchResult, PairwiseMatcher};
use crate::normalize::NormalizedKey;

/// A connected component of the retained match graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// Member identifiers, ascending.
    pub members: Vec<ContactId>,
    /// Retained edges between members, ordered by `(left, right)`.
    pub edges: Vec<MatchResult>,
    /// Weakest class among `edges`.
    pub min_class: ConfidenceClass,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|member| member == id)
    }
}

/// Result of one clustering pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterOutcome {
    pub candidate_pairs: usize,
    pub retained_edges: usize,
    pub groups: Vec<DuplicateGroup>,
}

#[derive(Clone)]
pub struct ClusterBuilder {
    matcher: PairwiseMatcher,
    threshold: ConfidenceClass,
    blocking: bool,
    full_scan_limit: usize,
    batch_size: usize,
    workers: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl ClusterBuilder {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            matcher: PairwiseMatcher::new(&config.matching),
            threshold: config.grouping.threshold,
            blocking: config.grouping.blocking,
            full_scan_limit: config.grouping.full_scan_limit,
            batch_size: config.grouping.batch_size.max(1),
            workers: config.grouping.workers,
            cancel: None,
        }
    }

    pub fn with_threshold(mut self, threshold: ConfidenceClass) -> Self {
        self.threshold = threshold;
        self
    }

    /// Flag checked between scoring batches; setting it aborts the pass.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn threshold(&self) -> ConfidenceClass {
        self.threshold
    }

    /// Score every candidate pair and group the retained edges.
    pub fn build_groups(&self, keys: &[NormalizedKey]) -> Result<ClusterOutcome> {
        let mut ordered: Vec<&NormalizedKey> = keys.iter().collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));

        let pairs = candidate_pairs(&ordered, self.blocking, self.full_scan_limit);
        let edges = self.score_pairs(&ordered, &pairs)?;

        let ids: Vec<&str> = ordered.iter().map(|key| key.id.as_str()).collect();
        let groups = group_edges(&ids, &edges, self.threshold);
        let retained_edges = groups.iter().map(|group| group.edges.len()).sum();

        info!(
            records = ordered.len(),
            candidate_pairs = pairs.len(),
            retained_edges,
            groups = groups.len(),
            threshold = %self.threshold,
            "clustering complete"
        );

        Ok(ClusterOutcome {
            candidate_pairs: pairs.len(),
            retained_edges,
            groups,
        })
    }

    /// Score candidate pairs in parallel batches, returning only the edges
    /// at or above the threshold, sorted by `(left, right)`.
    fn score_pairs(
        &self,
        ordered: &[&NormalizedKey],
        pairs: &[(usize, usize)],
    ) -> Result<Vec<MatchResult>> {
        let run = || -> Result<Vec<Vec<MatchResult>>> {
            pairs
                .par_chunks(self.batch_size)
                .map(|batch| {
                    if self.is_cancelled() {
                        return Err(MatchError::Cancelled);
                    }
                    Ok(batch
                        .iter()
                        .map(|&(i, j)| self.matcher.match_pair(ordered[i], ordered[j]))
                        .filter(|result| result.class >= self.threshold)
                        .collect())
                })
                .collect()
        };

        let batches = if self.workers > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
                .map_err(|e| MatchError::ThreadPool(e.to_string()))?;
            pool.install(run)?
        } else {
            run()?
        };

        debug!(batches = batches.len(), batch_size = self.batch_size, "scoring finished");

        let mut edges: Vec<MatchResult> = batches.into_iter().flatten().collect();
        edges.sort_by(|a, b| (&a.left, &a.right).cmp(&(&b.left, &b.right)));
        Ok(edges)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Connected components over the edges at or above `threshold`.
///
/// `ids` must be sorted ascending; edges naming unknown ids are ignored.
/// Components of one record are not groups.
pub fn group_edges(
    ids: &[&str],
    edges: &[MatchResult],
    threshold: ConfidenceClass,
) -> Vec<DuplicateGroup> {
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut retained: Vec<(usize, &MatchResult)> = Vec::new();
    let mut dsu = DisjointSet::new(ids.len());
    for edge in edges.iter().filter(|edge| edge.class >= threshold) {
        let (Some(&left), Some(&right)) =
            (index.get(edge.left.as_str()), index.get(edge.right.as_str()))
        else {
            continue;
        };
        dsu.union(left, right);
        retained.push((left, edge));
    }

    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for idx in 0..ids.len() {
        let root = dsu.find(idx);
        components.entry(root).or_default().push(idx);
    }

    let mut by_root: HashMap<usize, Vec<MatchResult>> = HashMap::new();
    for (left, edge) in retained {
        by_root.entry(dsu.find(left)).or_default().push(edge.clone());
    }

    let mut groups: Vec<DuplicateGroup> = components
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(root, members)| {
            let mut edges = by_root.remove(&root).unwrap_or_default();
            edges.sort_by(|a, b| (&a.left, &a.right).cmp(&(&b.left, &b.right)));
            edges.dedup_by(|a, b| a.left == b.left && a.right == b.right);
            let min_class = edges
                .iter()
                .map(|edge| edge.class)
                .min()
                .unwrap_or_default();
            DuplicateGroup {
                members: members.into_iter().map(|idx| ids[idx].to_string()).collect(),
                edges,
                min_class,
            }
        })
        .collect();

    sort_groups_deterministically(&mut groups);
    groups
}

fn sort_groups_deterministically(groups: &mut [DuplicateGroup]) {
    groups.sort_by(|a, b| a.members.first().cmp(&b.members.first()));
}

/// Union-find over record indexes, owned by one grouping call.
#[derive(Debug, Clone)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, left: usize, right: usize) {
        let left_root = self.find(left);
        let right_root = self.find(right);

        if left_root == right_root {
            return;
        }

        match self.rank[left_root].cmp(&self.rank[right_root]) {
            std::cmp::Ordering::Less => self.parent[left_root] = right_root,
            std::cmp::Ordering::Greater => self.parent[right_root] = left_root,
            std::cmp::Ordering::Equal => {
                self.parent[right_root] = left_root;
                self.rank[left_root] += 1;
            }
        }
    }
}
