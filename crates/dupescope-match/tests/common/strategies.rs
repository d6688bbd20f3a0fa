//! Proptest strategies producing contact batches with realistic overlap.
//!
//! Names, emails and phones are drawn from small pools so that generated
//! batches contain exact, fuzzy and contact-info matches.

use dupescope_core::ContactRecord;
use proptest::prelude::*;

const GIVEN: &[&str] = &["John", "Jon", "JOHN", "Mary", "Marie", "Ann", "Anne", "Robert", "Rupert", ""];
const FAMILY: &[&str] = &["Smith", "Smyth", "Jones", "Lee", "Lea", "Doe", ""];

pub fn given_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(GIVEN).prop_map(str::to_string)
}

pub fn family_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(FAMILY).prop_map(str::to_string)
}

/// Emails from a small domain pool, with random casing and padding.
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-c]{1,2}", prop::sample::select(&["x.org", "Example.COM"][..]), any::<bool>()).prop_map(
        |(user, domain, padded)| {
            let email = format!("{user}@{domain}");
            if padded { format!(" {email} ") } else { email }
        },
    )
}

/// Phone numbers sharing suffixes, in a few punctuation styles.
pub fn phone_strategy() -> impl Strategy<Value = String> {
    (0u8..4, prop::sample::select(&["+1 ", "", "1-"][..])).prop_map(|(n, prefix)| {
        format!("{prefix}(555) 201-33{n:02}")
    })
}

pub fn record_strategy() -> impl Strategy<Value = ContactRecord> {
    (
        given_strategy(),
        family_strategy(),
        prop::option::of(email_strategy()),
        prop::option::of(phone_strategy()),
    )
        .prop_map(|(given, family, email, phone)| {
            let mut record = ContactRecord::new("").with_name(&given, &family);
            if let Some(email) = email {
                record = record.with_email(&email);
            }
            if let Some(phone) = phone {
                record = record.with_phone(&phone);
            }
            record
        })
}

/// A batch of records with unique identifiers `r000`, `r001`, ...
pub fn batch_strategy(max: usize) -> impl Strategy<Value = Vec<ContactRecord>> {
    prop::collection::vec(record_strategy(), 0..max).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(idx, mut record)| {
                record.id = format!("r{idx:03}");
                record
            })
            .collect()
    })
}
