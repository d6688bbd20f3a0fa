//! Canonical, comparison-ready forms of contact fields.

use std::collections::{BTreeSet, HashMap};

use dupescope_core::{ContactId, ContactRecord, MatchingConfig, PostalAddress, ServiceHandle};
use serde::Serialize;

use crate::phonetic::{PhoneticCode, phonetic_code};

const FACEBOOK_DOMAIN: &str = "facebook.com";
const COUNTRY_PREFIXED_LEN: usize = 11;

/// Derived, cached comparison form of one [`ContactRecord`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedKey {
    pub id: ContactId,
    /// Whitespace-collapsed full name in its original casing.
    pub display_name: String,
    /// Lower-cased `display_name`.
    pub full_name: String,
    pub has_name: bool,
    pub emails: BTreeSet<String>,
    /// Subset of `emails` on the facebook.com domain.
    pub facebook_emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub phone_suffixes: BTreeSet<String>,
    pub family_code: PhoneticCode,
    pub given_code: PhoneticCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEmail {
    pub address: String,
    pub is_facebook: bool,
}

/// Batch-aware normalizer.
///
/// Phone normalization depends on the dominant country digit of the batch,
/// so build one per run with [`Normalizer::for_records`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    country_digit: Option<char>,
    phone_suffix_len: usize,
    ignore_numeric_emails: bool,
}

impl Normalizer {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            country_digit: None,
            phone_suffix_len: config.phone_suffix_len,
            ignore_numeric_emails: config.ignore_numeric_emails,
        }
    }

    pub fn for_records(records: &[ContactRecord], config: &MatchingConfig) -> Self {
        Self::new(config).with_country_digit(dominant_country_digit(records))
    }

    pub fn with_country_digit(mut self, digit: Option<char>) -> Self {
        self.country_digit = digit;
        self
    }

    pub fn country_digit(&self) -> Option<char> {
        self.country_digit
    }

    pub fn normalize(&self, record: &ContactRecord) -> NormalizedKey {
        let display_name = display_name(record);
        let full_name = display_name.to_lowercase();

        let mut emails = BTreeSet::new();
        let mut facebook_emails = BTreeSet::new();
        for email in &record.emails {
            let Some(normalized) = normalize_email(&email.value) else {
                continue;
            };
            if self.ignore_numeric_emails && has_numeric_local_part(&normalized.address) {
                continue;
            }
            if normalized.is_facebook {
                facebook_emails.insert(normalized.address.clone());
            }
            emails.insert(normalized.address);
        }

        let mut phones = BTreeSet::new();
        let mut phone_suffixes = BTreeSet::new();
        for phone in &record.phones {
            if let Some(key) = self.phone_key(&phone.value) {
                if let Some(suffix) = self.phone_suffix(&key) {
                    phone_suffixes.insert(suffix);
                }
                phones.insert(key);
            }
        }

        NormalizedKey {
            id: record.id.clone(),
            display_name,
            full_name,
            has_name: record.has_name(),
            emails,
            facebook_emails,
            phones,
            phone_suffixes,
            family_code: token_code(record.name.family.as_deref()),
            given_code: token_code(record.name.given.as_deref()),
        }
    }

    /// Digits-only phone key with the dominant country digit dropped.
    pub fn phone_key(&self, raw: &str) -> Option<String> {
        let digits = phone_digits(raw);
        if digits.is_empty() {
            return None;
        }
        if digits.len() == COUNTRY_PREFIXED_LEN
            && self
                .country_digit
                .is_some_and(|country| digits.starts_with(country))
        {
            return Some(digits[1..].to_string());
        }
        Some(digits)
    }

    /// Trailing digits of a phone key, when it is long enough.
    pub fn phone_suffix(&self, key: &str) -> Option<String> {
        if key.len() < self.phone_suffix_len {
            return None;
        }
        Some(key[key.len() - self.phone_suffix_len..].to_string())
    }
}

/// Trim and collapse runs of whitespace to a single space.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_name(value: &str) -> String {
    collapse_whitespace(value).to_lowercase()
}

pub fn normalize_email(raw: &str) -> Option<NormalizedEmail> {
    let address = raw.trim().to_lowercase();
    if address.is_empty() {
        return None;
    }
    let is_facebook = address
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain == FACEBOOK_DOMAIN);
    Some(NormalizedEmail {
        address,
        is_facebook,
    })
}

pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Leading digit shared by a strict majority of the batch's 11-digit numbers.
pub fn dominant_country_digit(records: &[ContactRecord]) -> Option<char> {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;

    for phone in records.iter().flat_map(|record| &record.phones) {
        let digits = phone_digits(&phone.value);
        if digits.len() != COUNTRY_PREFIXED_LEN {
            continue;
        }
        if let Some(first) = digits.chars().next() {
            *counts.entry(first).or_default() += 1;
            total += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| count * 2 > total)
        .map(|(digit, _)| digit)
        .next()
}

/// Canonical form used to de-duplicate urls during a merge.
pub fn url_key(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_string()
}

pub fn address_key(address: &PostalAddress) -> String {
    [
        &address.street,
        &address.city,
        &address.region,
        &address.postal_code,
        &address.country,
    ]
    .iter()
    .map(|part| normalize_name(part))
    .collect::<Vec<_>>()
    .join("|")
}

pub fn handle_key(handle: &ServiceHandle) -> String {
    format!(
        "{}:{}",
        normalize_name(&handle.service),
        handle.handle.trim().trim_start_matches('@').to_lowercase()
    )
}

fn display_name(record: &ContactRecord) -> String {
    let parts: Vec<&str> = [
        record.name.given.as_deref(),
        record.name.middle.as_deref(),
        record.name.family.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect();

    if parts.is_empty() {
        return record
            .name
            .nickname
            .as_deref()
            .map(collapse_whitespace)
            .unwrap_or_default();
    }
    collapse_whitespace(&parts.join(" "))
}

fn token_code(token: Option<&str>) -> PhoneticCode {
    token.map(phonetic_code).unwrap_or_default()
}

fn has_numeric_local_part(address: &str) -> bool {
    address
        .split_once('@')
        .is_some_and(|(local, _)| !local.is_empty() && local.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(&MatchingConfig::default())
    }

    #[test]
    fn test_name_is_collapsed_and_lowercased() {
        let mut record = ContactRecord::new("1").with_name("  Mary  Ann ", "McDonald");
        record.name.middle = Some("  ".to_string());

        let key = normalizer().normalize(&record);
        assert_eq!(key.display_name, "Mary Ann McDonald");
        assert_eq!(key.full_name, "mary ann mcdonald");
        assert!(key.has_name);
    }

    #[test]
    fn test_nickname_stands_in_for_missing_name() {
        let mut record = ContactRecord::new("1");
        record.name.nickname = Some("Bubba".to_string());

        let key = normalizer().normalize(&record);
        assert_eq!(key.full_name, "bubba");
        assert!(key.has_name);
        assert!(key.family_code.is_empty());
    }

    #[test]
    fn test_email_lowercased_and_facebook_flagged() {
        let record = ContactRecord::new("1")
            .with_email("  J.Doe@Example.COM ")
            .with_email("jdoe77@FaceBook.com")
            .with_email("   ");

        let key = normalizer().normalize(&record);
        assert!(key.emails.contains("j.doe@example.com"));
        assert!(key.emails.contains("jdoe77@facebook.com"));
        assert_eq!(key.emails.len(), 2);
        assert_eq!(key.facebook_emails.len(), 1);
    }

    #[test]
    fn test_numeric_emails_can_be_ignored() {
        let config = MatchingConfig {
            ignore_numeric_emails: true,
            ..Default::default()
        };
        let record = ContactRecord::new("1")
            .with_email("5551234567@txt.example.net")
            .with_email("jane@example.com");

        let key = Normalizer::new(&config).normalize(&record);
        assert_eq!(key.emails.len(), 1);
        assert!(key.emails.contains("jane@example.com"));
    }

    #[test]
    fn test_phone_digits_and_suffix() {
        let record = ContactRecord::new("1").with_phone("(555) 123-4567");
        let key = normalizer().normalize(&record);
        assert!(key.phones.contains("5551234567"));
        assert!(key.phone_suffixes.contains("1234567"));
    }

    #[test]
    fn test_short_phone_has_no_suffix() {
        let record = ContactRecord::new("1").with_phone("112");
        let key = normalizer().normalize(&record);
        assert!(key.phones.contains("112"));
        assert!(key.phone_suffixes.is_empty());
    }

    #[test]
    fn test_dominant_country_digit_is_dropped() {
        let records = vec![
            ContactRecord::new("1").with_phone("+1 (555) 123-4567"),
            ContactRecord::new("2").with_phone("1-555-765-4321"),
            ContactRecord::new("3").with_phone("+4 415 555 0000"),
        ];
        let normalizer = Normalizer::for_records(&records, &MatchingConfig::default());
        assert_eq!(normalizer.country_digit(), Some('1'));

        let key = normalizer.normalize(&records[0]);
        assert!(key.phones.contains("5551234567"));

        let foreign = normalizer.normalize(&records[2]);
        assert!(foreign.phones.contains("44155550000"));
    }

    #[test]
    fn test_no_strict_majority_means_no_country_digit() {
        let records = vec![
            ContactRecord::new("1").with_phone("15551234567"),
            ContactRecord::new("2").with_phone("45551234567"),
        ];
        assert_eq!(dominant_country_digit(&records), None);
    }

    #[test]
    fn test_url_and_handle_keys() {
        assert_eq!(url_key("HTTPS://www.Example.com/"), "example.com");
        assert_eq!(url_key("example.com"), "example.com");

        let a = ServiceHandle::new("Twitter", "@JDoe");
        let b = ServiceHandle::new("twitter ", "jdoe");
        assert_eq!(handle_key(&a), handle_key(&b));
    }
}
