//! Pre-flight checks run before any matching.
//!
//! Invalid records are collected into a [`ValidationReport`] and excluded;
//! they never abort processing of the rest of the batch.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{ContactId, ContactRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    EmptyIdentifier,
    DuplicateIdentifier,
}

impl RejectionReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::EmptyIdentifier => "record has an empty identifier",
            RejectionReason::DuplicateIdentifier => "identifier already used by an earlier record",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    /// Position of the record in the input sequence.
    pub index: usize,
    pub id: ContactId,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedRecord>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Split `records` into the valid ones and a report of the rest.
///
/// The first occurrence of an identifier wins; later repeats are rejected.
pub fn validate_records(records: Vec<ContactRecord>) -> (Vec<ContactRecord>, ValidationReport) {
    let mut seen: HashSet<ContactId> = HashSet::with_capacity(records.len());
    let mut valid = Vec::with_capacity(records.len());
    let mut report = ValidationReport::default();

    for (index, record) in records.into_iter().enumerate() {
        let reason = if record.id.trim().is_empty() {
            Some(RejectionReason::EmptyIdentifier)
        } else if seen.contains(&record.id) {
            Some(RejectionReason::DuplicateIdentifier)
        } else {
            None
        };

        match reason {
            Some(reason) => report.rejected.push(RejectedRecord {
                index,
                id: record.id,
                reason,
            }),
            None => {
                seen.insert(record.id.clone());
                valid.push(record);
            }
        }
    }

    report.accepted = valid.len();
    (valid, report)
}
