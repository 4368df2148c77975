//! Admitted-patient records and the `patients.txt` line format.
//!
//! Each patient occupies two lines:
//!
//! ```text
//! id|name|age|gender|diagnosis|admission_date|discharge_date|status
//! newest entry,older entry,oldest entry
//! ```
//!
//! The history line is empty when the patient has no treatment history.

use crate::{
    parse_number, FlatFileError, FlatFileResult, FlatRecord, FIELD_SEPARATOR, HISTORY_SEPARATOR,
};
use serde::{Deserialize, Serialize};
use ward_types::{AdmissionStatus, TreatmentLog};

/// Discharge date stored for a patient who has not been discharged.
pub const NOT_DISCHARGED: &str = "N/A";

const RECORD_FIELDS: usize = 8;

/// One admitted patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: u32,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub diagnosis: String,
    pub admission_date: String,
    /// `"N/A"` until the patient is discharged.
    pub discharge_date: String,
    pub status: AdmissionStatus,
    /// Most recent entry first.
    pub treatment_history: TreatmentLog,
}

impl PatientRecord {
    /// Parses a record line (the first of the two lines), with an empty history.
    ///
    /// Fields beyond the eighth are ignored.
    pub fn parse_record_line(line: &str) -> FlatFileResult<Self> {
        let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if parts.len() < RECORD_FIELDS {
            return Err(FlatFileError::MissingFields {
                expected: RECORD_FIELDS,
                found: parts.len(),
            });
        }

        Ok(Self {
            id: parse_number("id", parts[0])?,
            name: parts[1].to_owned(),
            age: parse_number("age", parts[2])?,
            gender: parts[3].to_owned(),
            diagnosis: parts[4].to_owned(),
            admission_date: parts[5].to_owned(),
            discharge_date: parts[6].to_owned(),
            status: parts[7].parse()?,
            treatment_history: TreatmentLog::new(),
        })
    }

    /// Parses a history line into a log. An empty line is an empty history.
    pub fn parse_history_line(line: &str) -> TreatmentLog {
        if line.is_empty() {
            return TreatmentLog::new();
        }
        TreatmentLog::from_recent_first(line.split(HISTORY_SEPARATOR))
    }

    fn render_into(&self, out: &mut String) {
        let fields = [
            self.id.to_string(),
            self.name.clone(),
            self.age.to_string(),
            self.gender.clone(),
            self.diagnosis.clone(),
            self.admission_date.clone(),
            self.discharge_date.clone(),
            self.status.as_str().to_owned(),
        ];
        out.push_str(&fields.join(FIELD_SEPARATOR));
        out.push('\n');

        let history: Vec<&str> = self.treatment_history.iter().collect();
        out.push_str(&history.join(HISTORY_SEPARATOR));
        out.push('\n');
    }
}

impl FlatRecord for PatientRecord {
    fn record_id(&self) -> u32 {
        self.id
    }

    fn render_all<'a, I>(records: I) -> String
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        let mut out = String::new();
        for record in records {
            record.render_into(&mut out);
        }
        out
    }

    fn parse_all(content: &str) -> Vec<Self> {
        let mut records = Vec::new();
        let mut lines = content.lines();

        while let Some(line) = lines.next() {
            if line.is_empty() {
                continue;
            }

            // A rejected record line does not consume the following line; it is
            // tried as a record line in its own right.
            match Self::parse_record_line(line) {
                Ok(mut record) => {
                    if let Some(history) = lines.next() {
                        record.treatment_history = Self::parse_history_line(history);
                    }
                    records.push(record);
                }
                Err(e) => {
                    tracing::debug!("skipping malformed patient line {:?}: {}", line, e);
                }
            }
        }

        records
    }
}
