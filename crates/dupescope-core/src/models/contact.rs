use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, source-stable contact identifier.
pub type ContactId = String;

/// A contact snapshot as handed over by the acquisition layer.
///
/// Records are treated as immutable once a detection run starts; merging
/// produces a new record rather than editing one of the inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: ContactId,

    #[serde(default)]
    pub name: PersonName,

    #[serde(default)]
    pub emails: Vec<LabeledValue>,

    #[serde(default)]
    pub phones: Vec<LabeledValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<Birthday>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default)]
    pub has_image: bool,

    #[serde(default)]
    pub addresses: Vec<PostalAddress>,

    #[serde(default)]
    pub urls: Vec<LabeledValue>,

    #[serde(default)]
    pub social_profiles: Vec<ServiceHandle>,

    #[serde(default)]
    pub instant_messages: Vec<ServiceHandle>,
}

/// Structured name components, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub value: String,
}

impl LabeledValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            label: None,
            value: value.into(),
        }
    }

    pub fn labeled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            value: value.into(),
        }
    }
}

/// A handle on some external service (social network, messenger).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHandle {
    pub service: String,
    pub handle: String,
}

impl ServiceHandle {
    pub fn new(service: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            handle: handle.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl PostalAddress {
    pub fn is_empty(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|part| part.trim().is_empty())
    }
}

/// A possibly partial birthday; address books commonly omit the year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthday {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Birthday {
    pub fn is_empty(&self) -> bool {
        self.day.is_none() && self.month.is_none() && self.year.is_none()
    }
}

impl fmt::Display for Birthday {
    /// ISO-like rendering with `--` standing in for missing parts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{year:04}")?,
            None => f.write_str("--")?,
        }
        match self.month {
            Some(month) => write!(f, "-{month:02}")?,
            None => f.write_str("---")?,
        }
        match self.day {
            Some(day) => write!(f, "-{day:02}"),
            None => f.write_str("---"),
        }
    }
}

/// Every mergeable field of a [`ContactRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Prefix,
    Given,
    Middle,
    Family,
    Suffix,
    Nickname,
    Organization,
    Department,
    JobTitle,
    Birthday,
    Note,
    HasImage,
    Emails,
    Phones,
    Addresses,
    Urls,
    SocialProfiles,
    InstantMessages,
}

impl ContactField {
    /// Single-valued fields, resolved by picking one member's value.
    pub const SCALARS: [ContactField; 11] = [
        ContactField::Prefix,
        ContactField::Given,
        ContactField::Middle,
        ContactField::Family,
        ContactField::Suffix,
        ContactField::Nickname,
        ContactField::Organization,
        ContactField::Department,
        ContactField::JobTitle,
        ContactField::Birthday,
        ContactField::Note,
    ];

    /// Multi-valued fields, resolved by union.
    pub const LISTS: [ContactField; 6] = [
        ContactField::Emails,
        ContactField::Phones,
        ContactField::Addresses,
        ContactField::Urls,
        ContactField::SocialProfiles,
        ContactField::InstantMessages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Prefix => "prefix",
            ContactField::Given => "given",
            ContactField::Middle => "middle",
            ContactField::Family => "family",
            ContactField::Suffix => "suffix",
            ContactField::Nickname => "nickname",
            ContactField::Organization => "organization",
            ContactField::Department => "department",
            ContactField::JobTitle => "job_title",
            ContactField::Birthday => "birthday",
            ContactField::Note => "note",
            ContactField::HasImage => "has_image",
            ContactField::Emails => "emails",
            ContactField::Phones => "phones",
            ContactField::Addresses => "addresses",
            ContactField::Urls => "urls",
            ContactField::SocialProfiles => "social_profiles",
            ContactField::InstantMessages => "instant_messages",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ContactRecord {
    pub fn new(id: impl Into<ContactId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, given: &str, family: &str) -> Self {
        self.name.given = non_empty(given);
        self.name.family = non_empty(family);
        self
    }

    pub fn with_email(mut self, address: &str) -> Self {
        self.emails.push(LabeledValue::new(address));
        self
    }

    pub fn with_phone(mut self, number: &str) -> Self {
        self.phones.push(LabeledValue::new(number));
        self
    }

    /// True when at least one of given name, family name or nickname is set.
    pub fn has_name(&self) -> bool {
        [&self.name.given, &self.name.family, &self.name.nickname]
            .iter()
            .any(|part| is_present(part))
    }

    /// Trimmed, non-empty display value of a scalar field.
    ///
    /// List-valued fields and `HasImage` return `None`.
    pub fn scalar(&self, field: ContactField) -> Option<String> {
        let raw = match field {
            ContactField::Prefix => &self.name.prefix,
            ContactField::Given => &self.name.given,
            ContactField::Middle => &self.name.middle,
            ContactField::Family => &self.name.family,
            ContactField::Suffix => &self.name.suffix,
            ContactField::Nickname => &self.name.nickname,
            ContactField::Organization => &self.organization,
            ContactField::Department => &self.department,
            ContactField::JobTitle => &self.job_title,
            ContactField::Note => &self.note,
            ContactField::Birthday => {
                return self
                    .birthday
                    .filter(|birthday| !birthday.is_empty())
                    .map(|birthday| birthday.to_string());
            }
            _ => return None,
        };
        raw.as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Copy one scalar field verbatim from `source`.
    pub fn copy_scalar(&mut self, field: ContactField, source: &ContactRecord) {
        match field {
            ContactField::Prefix => self.name.prefix = source.name.prefix.clone(),
            ContactField::Given => self.name.given = source.name.given.clone(),
            ContactField::Middle => self.name.middle = source.name.middle.clone(),
            ContactField::Family => self.name.family = source.name.family.clone(),
            ContactField::Suffix => self.name.suffix = source.name.suffix.clone(),
            ContactField::Nickname => self.name.nickname = source.name.nickname.clone(),
            ContactField::Organization => self.organization = source.organization.clone(),
            ContactField::Department => self.department = source.department.clone(),
            ContactField::JobTitle => self.job_title = source.job_title.clone(),
            ContactField::Birthday => self.birthday = source.birthday,
            ContactField::Note => self.note = source.note.clone(),
            _ => {}
        }
    }

    /// Number of populated fields, counting each list entry separately.
    pub fn completeness(&self) -> usize {
        let mut score = ContactField::SCALARS
            .iter()
            .filter(|field| self.scalar(**field).is_some())
            .count();

        if self.has_image {
            score += 1;
        }
        score += self
            .emails
            .iter()
            .filter(|email| !email.value.trim().is_empty())
            .count();
        score += self
            .phones
            .iter()
            .filter(|phone| !phone.value.trim().is_empty())
            .count();
        score += self
            .addresses
            .iter()
            .filter(|address| !address.is_empty())
            .count();
        score += self
            .urls
            .iter()
            .filter(|url| !url.value.trim().is_empty())
            .count();
        score += self
            .social_profiles
            .iter()
            .filter(|profile| !profile.handle.trim().is_empty())
            .count();
        score += self
            .instant_messages
            .iter()
            .filter(|im| !im.handle.trim().is_empty())
            .count();

        score
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
