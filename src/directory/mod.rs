//! Identity directory bridging GitHub logins and Discord usernames.
//!
//! The directory is loaded once from a YAML document keyed by an opaque
//! label:
//!
//! ```yaml
//! alice:
//!   github: alice
//!   discord: alice#1
//! bob:
//!   github: bob
//!   discord: bob#2
//! ```
//!
//! JSON documents of the same shape load as well. Records are indexed by
//! GitHub login at load time. A label or login that appears twice is
//! rejected, so every lookup resolves to exactly one record. The directory
//! is read-only after loading and can be shared freely between notification
//! tasks.

mod error;
pub mod mapper;

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

pub use error::DirectoryError;
pub use mapper::{IdentityMapper, MappedIdentity};

/// One GitHub-to-Discord identity pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Label the record was stored under in the source document.
    pub label: String,
    /// GitHub login.
    pub host_username: String,
    /// Discord username (optionally in legacy `name#discriminator` form).
    pub chat_username: String,
}

#[derive(Debug, Deserialize)]
struct RawIdentity {
    github: String,
    discord: String,
}

/// Top-level entries in document order, repeated labels included.
struct IdentityDocument(Vec<(String, serde_yaml::Value)>);

impl<'de> Deserialize<'de> for IdentityDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(IdentityDocumentVisitor)
    }
}

struct IdentityDocumentVisitor;

impl<'de> Visitor<'de> for IdentityDocumentVisitor {
    type Value = IdentityDocument;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a mapping of labels to identity entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, serde_yaml::Value>()? {
            entries.push(entry);
        }
        Ok(IdentityDocument(entries))
    }
}

/// Loaded identity mapping indexed by GitHub login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityDirectory {
    by_host: HashMap<String, IdentityRecord>,
}

impl IdentityDirectory {
    /// Reads and parses the identity document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Io`] when the file cannot be read and any
    /// error from [`IdentityDirectory::parse`] when its content is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, DirectoryError> {
        let io_error = |message: String| DirectoryError::Io {
            path: path.to_string(),
            message,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("path has no file name".to_owned()))?;

        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|error| io_error(format!("failed to open directory '{parent}': {error}")))?;
        let content = dir
            .read_to_string(file_name)
            .map_err(|error| io_error(error.to_string()))?;

        let directory = Self::parse(path.as_str(), &content)?;
        tracing::info!(
            "loaded {count} identity record(s) from {path}",
            count = directory.len()
        );
        Ok(directory)
    }

    /// Parses an identity document. `source` names the document in errors.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Parse`] for malformed YAML or entries missing
    /// a field, [`DirectoryError::DuplicateLabel`] when a label repeats,
    /// [`DirectoryError::BlankField`] for empty usernames, and
    /// [`DirectoryError::DuplicateHostUsername`] when two labels share a
    /// GitHub login.
    pub fn parse(source: &str, content: &str) -> Result<Self, DirectoryError> {
        let IdentityDocument(entries) =
            serde_yaml::from_str(content).map_err(|error| DirectoryError::Parse {
                source_name: source.to_owned(),
                message: error.to_string(),
            })?;

        let mut labels = HashSet::with_capacity(entries.len());
        let mut records = Vec::with_capacity(entries.len());
        for (label, value) in entries {
            if !labels.insert(label.clone()) {
                return Err(DirectoryError::DuplicateLabel { label });
            }
            records.push(parse_record(source, label, value)?);
        }
        Self::from_records(records)
    }

    /// Builds a directory from `(host_username, chat_username)` pairs,
    /// labelling each record with its GitHub login.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DuplicateHostUsername`] when a login repeats
    /// and [`DirectoryError::BlankField`] for empty usernames.
    pub fn from_pairs<I, H, C>(pairs: I) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = (H, C)>,
        H: Into<String>,
        C: Into<String>,
    {
        let records = pairs
            .into_iter()
            .map(|(host, chat)| {
                let host_username: String = host.into();
                validate_record(IdentityRecord {
                    label: host_username.clone(),
                    host_username,
                    chat_username: chat.into(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_records(records)
    }

    fn from_records(records: Vec<IdentityRecord>) -> Result<Self, DirectoryError> {
        let mut by_host = HashMap::with_capacity(records.len());
        for record in records {
            match by_host.entry(record.host_username.clone()) {
                Entry::Occupied(occupied) => {
                    let first: &IdentityRecord = occupied.get();
                    return Err(DirectoryError::DuplicateHostUsername {
                        host_username: record.host_username,
                        first_label: first.label.clone(),
                        second_label: record.label,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
        Ok(Self { by_host })
    }

    /// Returns the Discord username mapped to `host_username`, if any.
    #[must_use]
    pub fn resolve(&self, host_username: &str) -> Option<&str> {
        self.by_host
            .get(host_username)
            .map(|record| record.chat_username.as_str())
    }

    /// Returns the full record for `host_username`, if any.
    #[must_use]
    pub fn record(&self, host_username: &str) -> Option<&IdentityRecord> {
        self.by_host.get(host_username)
    }

    /// Number of loaded records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_host.len()
    }

    /// Whether the directory holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_host.is_empty()
    }
}

fn parse_record(
    source: &str,
    label: String,
    value: serde_yaml::Value,
) -> Result<IdentityRecord, DirectoryError> {
    let raw: RawIdentity = serde_yaml::from_value(value).map_err(|error| DirectoryError::Parse {
        source_name: source.to_owned(),
        message: format!("entry `{label}`: {error}"),
    })?;

    validate_record(IdentityRecord {
        label,
        host_username: raw.github,
        chat_username: raw.discord,
    })
}

/// Trims both usernames and rejects blank ones.
fn validate_record(record: IdentityRecord) -> Result<IdentityRecord, DirectoryError> {
    let host_username = record.host_username.trim().to_owned();
    if host_username.is_empty() {
        return Err(DirectoryError::BlankField {
            label: record.label,
            field: "github",
        });
    }
    let chat_username = record.chat_username.trim().to_owned();
    if chat_username.is_empty() {
        return Err(DirectoryError::BlankField {
            label: record.label,
            field: "discord",
        });
    }

    Ok(IdentityRecord {
        label: record.label,
        host_username,
        chat_username,
    })
}
