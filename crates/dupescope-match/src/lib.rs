pub mod blocking;
pub mod cluster;
pub mod confidence;
pub mod detector;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod normalize;
pub mod phonetic;
pub mod tiebreak;

pub use cluster::{ClusterBuilder, ClusterOutcome, DuplicateGroup, group_edges};
pub use confidence::{Confidence, ConfidenceAggregator};
pub use detector::{DetectionReport, DuplicateDetector, RunSummary};
pub use error::{MatchError, Result};
pub use matcher::{MatchResult, MatchTiers, PairwiseMatcher, name_similarity};
pub use merge::{DecisionReason, FieldDecision, MergeDecision, MergeOutcome, MergeResolver, WeakEdge};
pub use normalize::{NormalizedKey, Normalizer};
pub use phonetic::{PhoneticCode, phonetic_code};
pub use tiebreak::{DubiousScoreTieBreaker, NoTieBreak, TieBreaker};
