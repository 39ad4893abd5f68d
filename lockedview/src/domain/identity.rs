//! Local identity record.
//!
//! The record is the `{username, jobTitle}` pair a visitor enters before the
//! character directory is shown. Both fields are trimmed on construction and
//! must be non-empty afterwards; deserialisation applies the same rules, so
//! a stored value that breaks them never becomes an [`IdentityRecord`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field of an identity record, named as it appears in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    /// The visitor's name.
    Username,
    /// The visitor's job title.
    JobTitle,
}

impl IdentityField {
    /// Storage key for the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::JobTitle => "jobTitle",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned when building identity values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityValidationError {
    /// A field was empty once surrounding whitespace was removed.
    #[error("empty field: {field}")]
    EmptyField {
        /// The offending field.
        field: IdentityField,
    },
}

fn trimmed_non_empty(
    value: String,
    field: IdentityField,
) -> Result<String, IdentityValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdentityValidationError::EmptyField { field });
    }
    if trimmed.len() == value.len() {
        return Ok(value);
    }
    Ok(trimmed.to_owned())
}

/// Name the visitor entered, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Trim and validate a username.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityValidationError> {
        trimmed_non_empty(value.into(), IdentityField::Username).map(Self)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Job title the visitor entered, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobTitle(String);

impl JobTitle {
    /// Trim and validate a job title.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityValidationError> {
        trimmed_non_empty(value.into(), IdentityField::JobTitle).map(Self)
    }
}

impl AsRef<str> for JobTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for JobTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<JobTitle> for String {
    fn from(value: JobTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for JobTitle {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Raw form submission, before trimming or validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityCandidate {
    /// Username as typed.
    pub username: String,
    /// Job title as typed.
    pub job_title: String,
}

impl IdentityCandidate {
    /// Build a candidate from raw input.
    pub fn new(username: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            job_title: job_title.into(),
        }
    }
}

/// Persisted identity of the local visitor.
///
/// ## Invariants
/// - `username` and `job_title` are trimmed and non-empty.
///
/// Serialised as a flat object: `{"username": "...", "jobTitle": "..."}`.
/// Unknown keys are ignored when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    username: Username,
    job_title: JobTitle,
}

impl IdentityRecord {
    /// Build a record from validated components.
    pub fn new(username: Username, job_title: JobTitle) -> Self {
        Self {
            username,
            job_title,
        }
    }

    /// Fallible constructor trimming and validating both fields.
    ///
    /// The username is checked first, so a submission with both fields blank
    /// reports [`IdentityField::Username`].
    pub fn try_from_strings(
        username: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Result<Self, IdentityValidationError> {
        let username = Username::new(username)?;
        let job_title = JobTitle::new(job_title)?;
        Ok(Self::new(username, job_title))
    }

    /// The visitor's name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// The visitor's job title.
    pub fn job_title(&self) -> &JobTitle {
        &self.job_title
    }
}

impl fmt::Display for IdentityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.job_title)
    }
}

impl TryFrom<IdentityCandidate> for IdentityRecord {
    type Error = IdentityValidationError;

    fn try_from(value: IdentityCandidate) -> Result<Self, Self::Error> {
        Self::try_from_strings(value.username, value.job_title)
    }
}

/// What is known about the local identity.
///
/// `Unknown` only exists between constructing a consumer and the first
/// completed load; after that the state is always `Absent` or `Present`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdentityState {
    /// Not loaded yet.
    #[default]
    Unknown,
    /// Loaded; no valid record is stored.
    Absent,
    /// Loaded; a valid record is stored.
    Present(IdentityRecord),
}

impl IdentityState {
    /// The record, when present.
    pub fn record(&self) -> Option<&IdentityRecord> {
        match self {
            Self::Present(record) => Some(record),
            Self::Unknown | Self::Absent => None,
        }
    }

    /// Whether the initial load has completed.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl From<Option<IdentityRecord>> for IdentityState {
    fn from(value: Option<IdentityRecord>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}
