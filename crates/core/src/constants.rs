//! Constants used throughout the ward core crate.
//!
//! File names, id ranges and the wording of audit entries live here so that the
//! registry, the queue and their tests agree on them.

/// Default directory for the backing files when none is configured.
pub const DEFAULT_DATA_DIR: &str = ".";

/// Filename for the admitted-patient store.
pub const PATIENTS_FILE_NAME: &str = "patients.txt";

/// Filename for the ER queue store.
pub const ER_QUEUE_FILE_NAME: &str = "erqueue.txt";

/// First id handed out by an empty patient registry.
pub const FIRST_PATIENT_ID: u32 = 1;

/// First id handed out by an empty ER queue. Keeps ER ids clear of patient ids.
pub const FIRST_ER_ID: u32 = 1000;

/// Prefix of the audit entry pushed when a diagnosis changes.
pub const DIAGNOSIS_UPDATED_PREFIX: &str = "Diagnosis updated to: ";

/// Prefix of the audit entry pushed when a patient is discharged.
pub const DISCHARGED_PREFIX: &str = "Patient discharged on ";
