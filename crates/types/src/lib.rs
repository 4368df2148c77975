//! Shared domain primitives for the ward record manager.
//!
//! These types are used by both the flat-file boundary crate and the core data layer.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing shared domain types.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// The text is not one of the known admission states
    #[error("unknown admission status: {0}")]
    Unknown(String),
}

/// Admission state of a patient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdmissionStatus {
    #[default]
    Admitted,
    Discharged,
}

impl AdmissionStatus {
    /// Returns the string stored in the patient file for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionStatus::Admitted => "Admitted",
            AdmissionStatus::Discharged => "Discharged",
        }
    }

    pub fn is_discharged(&self) -> bool {
        matches!(self, AdmissionStatus::Discharged)
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdmissionStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admitted" => Ok(AdmissionStatus::Admitted),
            "Discharged" => Ok(AdmissionStatus::Discharged),
            other => Err(StatusError::Unknown(other.to_owned())),
        }
    }
}

impl serde::Serialize for AdmissionStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for AdmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Last-in-first-out log of treatment entries.
///
/// Treatments and audit notes share the same log. The most recently pushed entry is
/// the "top": it is the first one returned by [`iter`](TreatmentLog::iter) and the one
/// removed by [`pop`](TreatmentLog::pop).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreatmentLog(Vec<String>);

impl TreatmentLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a log from entries listed most recent first.
    ///
    /// This is the order entries are stored on disk and returned by `iter`.
    pub fn from_recent_first<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        entries.reverse();
        Self(entries)
    }

    /// Pushes an entry onto the top of the log.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.0.push(entry.into());
    }

    /// Removes and returns the most recent entry.
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// Returns the most recent entry without removing it.
    pub fn peek(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Iterates entries from most recent to oldest without modifying the log.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        self.0.iter().rev().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl serde::Serialize for TreatmentLog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> serde::Deserialize<'de> for TreatmentLog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<String>::deserialize(deserializer)?;
        Ok(TreatmentLog::from_recent_first(entries))
    }
}
