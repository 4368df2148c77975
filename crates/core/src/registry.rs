//! Admitted-patient registry.
//!
//! The registry owns every [`PatientRecord`] and each record's treatment history. Records
//! keep admission order for their whole life; nothing reorders them.
//!
//! Every mutating operation persists the full registry to `patients.txt` before it
//! returns (see [`crate::store`]).
//!
//! ## Treatment history
//!
//! The history is a LIFO log. Treatments and system audit entries share it:
//!
//! - `update_diagnosis` pushes `Diagnosis updated to: <diagnosis>`
//! - `discharge` pushes `Patient discharged on <date>`
//!
//! `undo_last_treatment` pops whatever is on top, audit entry or not.

use crate::config::CoreConfig;
use crate::constants::{DIAGNOSIS_UPDATED_PREFIX, DISCHARGED_PREFIX, FIRST_PATIENT_ID};
use crate::error::{RecordError, RecordResult};
use crate::store::RecordStore;
use std::fmt;
use ward_flatfile::{AdmissionStatus, PatientRecord, TreatmentLog, NOT_DISCHARGED};

/// Details captured when a patient is admitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Admission {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub diagnosis: String,
    pub admission_date: String,
}

/// How to look patients up in [`PatientRegistry::search`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatientQuery {
    /// Exact id match.
    Id(u32),
    /// Case-sensitive substring of the patient name.
    NameContains(String),
}

impl fmt::Display for PatientQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientQuery::Id(id) => write!(f, "id {}", id),
            PatientQuery::NameContains(term) => write!(f, "name containing {:?}", term),
        }
    }
}

#[derive(Debug)]
pub struct PatientRegistry {
    store: RecordStore<PatientRecord>,
}

impl PatientRegistry {
    /// Loads the registry from the configured patient file.
    pub fn open(cfg: &CoreConfig) -> RecordResult<Self> {
        let store = RecordStore::open(cfg.patients_file(), FIRST_PATIENT_ID)?;
        Ok(Self { store })
    }

    /// Admits a new patient and returns the assigned id.
    ///
    /// The record starts `Admitted`, with discharge date `N/A` and an empty history.
    pub fn add(&mut self, admission: Admission) -> RecordResult<u32> {
        let id = self.store.append_new(|id| PatientRecord {
            id,
            name: admission.name,
            age: admission.age,
            gender: admission.gender,
            diagnosis: admission.diagnosis,
            admission_date: admission.admission_date,
            discharge_date: NOT_DISCHARGED.to_owned(),
            status: AdmissionStatus::Admitted,
            treatment_history: TreatmentLog::new(),
        })?;
        tracing::info!("admitted patient {}", id);
        Ok(id)
    }

    /// Removes the patient with the given id and returns the removed record.
    pub fn delete(&mut self, id: u32) -> RecordResult<PatientRecord> {
        let record = self.store.remove(id)?;
        tracing::info!("deleted patient {}", id);
        Ok(record)
    }

    pub fn find_by_id(&self, id: u32) -> RecordResult<&PatientRecord> {
        self.store.find(id)
    }

    /// Mutates a record in place and persists the registry afterwards.
    ///
    /// This is the escape hatch for edits that have no dedicated operation.
    pub fn modify<T>(
        &mut self,
        id: u32,
        f: impl FnOnce(&mut PatientRecord) -> T,
    ) -> RecordResult<T> {
        self.store.update(id, |record| Ok(f(record)))
    }

    /// Replaces the diagnosis and records the change in the treatment history.
    pub fn update_diagnosis(&mut self, id: u32, diagnosis: &str) -> RecordResult<()> {
        self.store.update(id, |record| {
            record.diagnosis = diagnosis.to_owned();
            record
                .treatment_history
                .push(format!("{}{}", DIAGNOSIS_UPDATED_PREFIX, diagnosis));
            Ok(())
        })
    }

    /// Discharges a patient.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NotFound`] if no patient has this id
    /// - [`RecordError::AlreadyDischarged`] if the patient was discharged before; the
    ///   original discharge date is left in place and reported in the error
    pub fn discharge(&mut self, id: u32, discharge_date: &str) -> RecordResult<()> {
        self.store.update(id, |record| {
            if record.status.is_discharged() {
                return Err(RecordError::AlreadyDischarged {
                    id,
                    discharge_date: record.discharge_date.clone(),
                });
            }

            record.discharge_date = discharge_date.to_owned();
            record.status = AdmissionStatus::Discharged;
            record
                .treatment_history
                .push(format!("{}{}", DISCHARGED_PREFIX, discharge_date));
            Ok(())
        })?;

        tracing::info!("discharged patient {}", id);
        Ok(())
    }

    /// Pushes a treatment onto the patient's history.
    ///
    /// Discharged patients are refused with [`RecordError::PatientDischarged`].
    pub fn add_treatment(&mut self, id: u32, description: &str) -> RecordResult<()> {
        self.store.update(id, |record| {
            if record.status.is_discharged() {
                return Err(RecordError::PatientDischarged(id));
            }
            record.treatment_history.push(description);
            Ok(())
        })
    }

    /// Pops and returns the most recent history entry.
    pub fn undo_last_treatment(&mut self, id: u32) -> RecordResult<String> {
        self.store.update(id, |record| {
            record
                .treatment_history
                .pop()
                .ok_or(RecordError::EmptyHistory(id))
        })
    }

    /// Returns the history entries, most recent first, without changing them.
    pub fn treatment_history(&self, id: u32) -> RecordResult<Vec<&str>> {
        let record = self.store.find(id)?;
        Ok(record.treatment_history.iter().collect())
    }

    /// Iterates all patients in admission order.
    pub fn list(&self) -> impl Iterator<Item = &PatientRecord> + '_ {
        self.store.iter()
    }

    /// Returns every patient matching `query`, in admission order.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NoMatch`] when nothing matches.
    pub fn search(&self, query: &PatientQuery) -> RecordResult<Vec<&PatientRecord>> {
        let matches: Vec<&PatientRecord> = match query {
            PatientQuery::Id(id) => self.store.iter().filter(|r| r.id == *id).take(1).collect(),
            PatientQuery::NameContains(term) => self
                .store
                .iter()
                .filter(|r| r.name.contains(term.as_str()))
                .collect(),
        };

        if matches.is_empty() {
            return Err(RecordError::NoMatch(query.to_string()));
        }
        Ok(matches)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The id the next admission will receive, or `None` once ids are used up.
    pub fn next_id(&self) -> Option<u32> {
        self.store.next_id()
    }
}
