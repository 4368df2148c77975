//! # Ward Core
//!
//! Core data layer for the ward record manager.
//!
//! This crate contains the two persistent collections and nothing else:
//! - [`PatientRegistry`]: admitted patients, each with a LIFO treatment history
//! - [`ErQueue`]: a first-in-first-out emergency-room intake queue
//!
//! Both are backed by flat text files (see `ward_flatfile`) and write through on every
//! mutation. Both are plain owned values built once at startup from a [`CoreConfig`];
//! neither is safe to share between threads or processes.
//!
//! **No presentation concerns**: menus, prompts and table layout belong in the binaries.

pub mod config;
pub mod constants;
pub mod er_queue;
mod error;
pub mod registry;
pub mod store;

pub use config::{data_dir_from_env_value, CoreConfig};
pub use er_queue::ErQueue;
pub use error::{RecordError, RecordResult};
pub use registry::{Admission, PatientQuery, PatientRegistry};
pub use ward_flatfile::{AdmissionStatus, ErIntake, PatientRecord, TreatmentLog};
