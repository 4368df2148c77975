//! Flat-file boundary support for the ward record manager.
//!
//! This crate provides the **record carriers** and the **line-oriented text format** used
//! for the two backing files:
//! - `patients.txt`: two lines per admitted patient (record line, then history line)
//! - `erqueue.txt`: one line per ER intake
//!
//! Fields are pipe-delimited and never escaped. A field containing `|` (or, for
//! treatment history entries, `,`) does not survive a save/load cycle. Neither does a
//! history made of a single empty entry: it is written as an empty line, which loads
//! as an empty history. The collaborators refuse empty treatment descriptions.
//!
//! Parsing is deliberately lossy: a record line that cannot be parsed is skipped and
//! loading carries on with the next line. Skips are logged at `debug` level only.

pub mod er_intake;
pub mod patient;

pub use er_intake::ErIntake;
pub use patient::{PatientRecord, NOT_DISCHARGED};
pub use ward_types::{AdmissionStatus, TreatmentLog};

/// Field separator used on every record line.
pub const FIELD_SEPARATOR: &str = "|";

/// Separator between treatment history entries on a patient history line.
pub const HISTORY_SEPARATOR: &str = ",";

/// Errors describing why a single record line was rejected.
#[derive(Debug, thiserror::Error)]
pub enum FlatFileError {
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("invalid integer in field `{field}`: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid status: {0}")]
    InvalidStatus(#[from] ward_types::StatusError),
}

/// Type alias for Results that can fail with a [`FlatFileError`].
pub type FlatFileResult<T> = Result<T, FlatFileError>;

/// A record that can be stored in a flat file.
///
/// Implementors define how a whole collection is rendered to and parsed from text.
/// `parse_all` never fails: malformed records are dropped.
pub trait FlatRecord: Sized {
    /// The numeric id used for lookups and id allocation.
    fn record_id(&self) -> u32;

    /// Renders records, in order, to the complete file contents.
    fn render_all<'a, I>(records: I) -> String
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a;

    /// Parses complete file contents, skipping malformed records.
    fn parse_all(content: &str) -> Vec<Self>;
}

pub(crate) fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> FlatFileResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FlatFileError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
}
