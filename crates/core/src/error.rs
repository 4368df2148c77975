#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no record with id {0}")]
    NotFound(u32),
    #[error("patient {id} is already discharged on {discharge_date}")]
    AlreadyDischarged { id: u32, discharge_date: String },
    #[error("patient {0} is discharged; no further treatment can be added")]
    PatientDischarged(u32),
    #[error("patient {0} has no treatment history")]
    EmptyHistory(u32),
    #[error("ER queue is empty")]
    EmptyQueue,
    #[error("no patient matches {0}")]
    NoMatch(String),
    #[error("no record ids left to allocate")]
    IdSpaceExhausted,

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
