//! Emergency-room intake records and the `erqueue.txt` line format.
//!
//! One intake per line, in arrival order: `id|name|priority`.

use crate::{parse_number, FlatFileError, FlatFileResult, FlatRecord, FIELD_SEPARATOR};
use serde::{Deserialize, Serialize};

const RECORD_FIELDS: usize = 3;

/// One ER intake.
///
/// `priority` is informational (1-5, 5 = highest by convention) and is not range checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErIntake {
    pub id: u32,
    pub name: String,
    pub priority: i32,
}

impl ErIntake {
    pub fn parse_line(line: &str) -> FlatFileResult<Self> {
        let parts: Vec<&str> = line.splitn(RECORD_FIELDS, FIELD_SEPARATOR).collect();
        if parts.len() < RECORD_FIELDS {
            return Err(FlatFileError::MissingFields {
                expected: RECORD_FIELDS,
                found: parts.len(),
            });
        }

        Ok(Self {
            id: parse_number("id", parts[0])?,
            name: parts[1].to_owned(),
            priority: parse_number("priority", parts[2])?,
        })
    }
}

impl FlatRecord for ErIntake {
    fn record_id(&self) -> u32 {
        self.id
    }

    fn render_all<'a, I>(records: I) -> String
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        records
            .into_iter()
            .map(|r| format!("{}|{}|{}\n", r.id, r.name, r.priority))
            .collect()
    }

    fn parse_all(content: &str) -> Vec<Self> {
        content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| match Self::parse_line(line) {
                Ok(intake) => Some(intake),
                Err(e) => {
                    tracing::debug!("skipping malformed ER line {:?}: {}", line, e);
                    None
                }
            })
            .collect()
    }
}
