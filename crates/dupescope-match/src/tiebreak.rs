//! Caller-supplied preference between equally complete group members.

use std::cmp::Ordering;

use dupescope_core::ContactRecord;

/// Advisory preference consulted only when two members tie on completeness.
///
/// `Ordering::Less` means `a` is preferred over `b`. Returning `Equal`
/// defers to the identifier order.
pub trait TieBreaker: Send + Sync {
    fn prefer(&self, a: &ContactRecord, b: &ContactRecord) -> Ordering;
}

/// Expresses no preference.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTieBreak;

impl TieBreaker for NoTieBreak {
    fn prefer(&self, _a: &ContactRecord, _b: &ContactRecord) -> Ordering {
        Ordering::Equal
    }
}

/// Prefers the record an external classifier finds less dubious.
///
/// Scored records rank ahead of unscored ones, so the preference is a total
/// order whatever the classifier returns.
pub struct DubiousScoreTieBreaker<F> {
    score: F,
}

impl<F> DubiousScoreTieBreaker<F>
where
    F: Fn(&ContactRecord) -> Option<u32> + Send + Sync,
{
    pub fn new(score: F) -> Self {
        Self { score }
    }
}

impl<F> TieBreaker for DubiousScoreTieBreaker<F>
where
    F: Fn(&ContactRecord) -> Option<u32> + Send + Sync,
{
    fn prefer(&self, a: &ContactRecord, b: &ContactRecord) -> Ordering {
        match ((self.score)(a), (self.score)(b)) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
