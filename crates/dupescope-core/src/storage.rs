use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DupescopeError, Result};
use crate::models::ContactRecord;

/// Either a bare array of records or an export envelope around one.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContactFile {
    Bare(Vec<ContactRecord>),
    Envelope { contacts: Vec<ContactRecord> },
}

/// Load contact records from a JSON file.
///
/// Accepts `[ {...}, ... ]` as well as `{ "contacts": [ ... ] }`.
pub fn load_contacts(path: &Path) -> Result<Vec<ContactRecord>> {
    let contents = fs::read_to_string(path)?;
    let file: ContactFile = serde_json::from_str(&contents)?;
    Ok(match file {
        ContactFile::Bare(records) => records,
        ContactFile::Envelope { contacts } => contacts,
    })
}

/// Save contact records as a pretty-printed JSON array.
pub fn save_contacts(path: &Path, records: &[ContactRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

/// Look a record up by identifier.
pub fn find_contact<'a>(records: &'a [ContactRecord], id: &str) -> Result<&'a ContactRecord> {
    records
        .iter()
        .find(|record| record.id == id)
        .ok_or_else(|| DupescopeError::ContactNotFound(id.to_string()))
}
