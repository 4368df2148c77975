//! Write-through record store shared by the patient registry and the ER queue.
//!
//! A [`RecordStore`] holds an ordered, in-memory collection of flat-file records
//! together with the file it is backed by and the next id to hand out.
//!
//! ## Persistence
//!
//! Every mutating operation renders the collection as it will look after the change and
//! rewrites the whole backing file. The in-memory records change only once that write
//! has succeeded, so a failed write leaves both memory and disk as they were. There is
//! no batching, no append-only log and no temp-file rename, so a crash mid-write can
//! leave a truncated file behind. On load, records that cannot be parsed are dropped.
//!
//! ## Id allocation
//!
//! After loading, the next id is `max(first_id, highest loaded id + 1)`. Ids are only
//! ever incremented; removing a record never frees its id for this process. Once
//! `u32::MAX` has been handed out, further allocations fail with
//! [`RecordError::IdSpaceExhausted`].

use crate::error::{RecordError, RecordResult};
use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use ward_flatfile::FlatRecord;

#[derive(Debug)]
pub struct RecordStore<R> {
    path: PathBuf,
    records: VecDeque<R>,
    /// `None` once the id space is used up.
    next_id: Option<u32>,
}

impl<R: FlatRecord> RecordStore<R> {
    /// Loads the store from `path`.
    ///
    /// A missing file yields an empty store. Any other read failure is returned as
    /// [`RecordError::FileRead`].
    pub fn open(path: impl Into<PathBuf>, first_id: u32) -> RecordResult<Self> {
        let path = path.into();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(RecordError::FileRead(e)),
        };

        let records: VecDeque<R> = R::parse_all(&content).into();
        let next_id = match records.iter().map(R::record_id).max() {
            Some(highest) => highest.checked_add(1).map(|id| id.max(first_id)),
            None => Some(first_id),
        };

        match next_id {
            Some(id) => tracing::info!(
                "loaded {} record(s) from {}, next id {}",
                records.len(),
                path.display(),
                id
            ),
            None => tracing::warn!(
                "loaded {} record(s) from {}, no ids left to allocate",
                records.len(),
                path.display()
            ),
        }

        Ok(Self {
            path,
            records,
            next_id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The id the next call to [`append_new`](RecordStore::append_new) will use, or
    /// `None` when the id space is exhausted.
    pub fn next_id(&self) -> Option<u32> {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.records.iter()
    }

    /// Returns the first record with the given id.
    pub fn find(&self, id: u32) -> RecordResult<&R> {
        self.records
            .iter()
            .find(|r| r.record_id() == id)
            .ok_or(RecordError::NotFound(id))
    }

    /// Builds a record with the next id, appends it at the tail and persists.
    ///
    /// The id is consumed only when the write succeeds.
    pub fn append_new(&mut self, build: impl FnOnce(u32) -> R) -> RecordResult<u32> {
        let id = self.next_id.ok_or(RecordError::IdSpaceExhausted)?;
        self.append(build(id))?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    /// Appends a record at the tail and persists.
    pub fn append(&mut self, record: R) -> RecordResult<()> {
        self.write_records(self.records.iter().chain(std::iter::once(&record)))?;
        self.records.push_back(record);
        Ok(())
    }

    /// Applies `f` to a copy of the first record with the given id.
    ///
    /// The copy replaces the stored record only when `f` returns `Ok` and the write
    /// succeeds. Otherwise the store is left exactly as it was.
    pub fn update<T>(
        &mut self,
        id: u32,
        f: impl FnOnce(&mut R) -> RecordResult<T>,
    ) -> RecordResult<T>
    where
        R: Clone,
    {
        let index = self.position(id)?;
        let mut candidate = self.records[index].clone();
        let value = f(&mut candidate)?;

        self.write_records(
            self.records
                .iter()
                .enumerate()
                .map(|(i, r)| if i == index { &candidate } else { r }),
        )?;
        self.records[index] = candidate;
        Ok(value)
    }

    /// Removes the first record with the given id and persists.
    pub fn remove(&mut self, id: u32) -> RecordResult<R> {
        let index = self.position(id)?;

        self.write_records(
            self.records
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, r)| r),
        )?;
        self.records.remove(index).ok_or(RecordError::NotFound(id))
    }

    /// Removes the head record and persists. Returns `None` without writing when empty.
    pub fn pop_front(&mut self) -> RecordResult<Option<R>> {
        if self.records.is_empty() {
            return Ok(None);
        }

        self.write_records(self.records.iter().skip(1))?;
        Ok(self.records.pop_front())
    }

    /// Rewrites the whole backing file from the in-memory records.
    pub fn persist(&self) -> RecordResult<()> {
        self.write_records(&self.records)
    }

    fn position(&self, id: u32) -> RecordResult<usize> {
        self.records
            .iter()
            .position(|r| r.record_id() == id)
            .ok_or(RecordError::NotFound(id))
    }

    fn write_records<'a, I>(&self, records: I) -> RecordResult<()>
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(RecordError::StorageDirCreation)?;
            }
        }

        let content = R::render_all(records);
        fs::write(&self.path, content).map_err(RecordError::FileWrite)?;

        tracing::debug!("rewrote {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use ward_flatfile::ErIntake;

    fn intake(id: u32, name: &str) -> ErIntake {
        ErIntake {
            id,
            name: name.into(),
            priority: 3,
        }
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store: RecordStore<ErIntake> =
            RecordStore::open(temp_dir.path().join("missing.txt"), 1000)
                .expect("open should succeed");

        assert!(store.is_empty());
        assert_eq!(store.next_id(), Some(1000));
        assert!(
            !temp_dir.path().join("missing.txt").exists(),
            "opening must not create the file"
        );
    }

    #[test]
    fn test_open_reconstructs_next_id_from_highest_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("queue.txt");
        fs::write(&path, "1005|A|1\n1001|B|2\n").expect("should write fixture");

        let store: RecordStore<ErIntake> =
            RecordStore::open(&path, 1000).expect("open should succeed");
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), Some(1006));
    }

    #[test]
    fn test_open_never_goes_below_first_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("queue.txt");
        fs::write(&path, "7|Low|1\n").expect("should write fixture");

        let store: RecordStore<ErIntake> =
            RecordStore::open(&path, 1000).expect("open should succeed");
        assert_eq!(store.next_id(), Some(1000));
    }

    #[test]
    fn test_open_reports_unreadable_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        // A directory cannot be read as a file.
        let err = RecordStore::<ErIntake>::open(temp_dir.path(), 1000)
            .expect_err("reading a directory should fail");
        assert!(matches!(err, RecordError::FileRead(_)));
    }

    #[test]
    fn test_append_writes_through_and_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("queue.txt");

        let mut store: RecordStore<ErIntake> =
            RecordStore::open(&path, 1000).expect("open should succeed");
        let id = store
            .append_new(|id| intake(id, "A"))
            .expect("append should succeed");
        assert_eq!(id, 1000);

        assert_eq!(
            fs::read_to_string(&path).expect("file should exist"),
            "1000|A|3\n"
        );
    }

    #[test]
    fn test_update_applies_only_on_success() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("queue.txt");
        let mut store: RecordStore<ErIntake> =
            RecordStore::open(&path, 1000).expect("open should succeed");
        store.append(intake(1000, "A")).expect("append should succeed");

        let err = store
            .update(1000, |r| {
                r.name = "changed".into();
                Err::<(), _>(RecordError::EmptyQueue)
            })
            .expect_err("closure error should pass through");
        assert!(matches!(err, RecordError::EmptyQueue));
        assert_eq!(store.find(1000).expect("record should exist").name, "A");
        assert_eq!(
            fs::read_to_string(&path).expect("file should exist"),
            "1000|A|3\n",
            "failed update must not be persisted"
        );

        store
            .update(1000, |r| {
                r.priority = 5;
                Ok(())
            })
            .expect("update should succeed");
        assert_eq!(
            fs::read_to_string(&path).expect("file should exist"),
            "1000|A|5\n"
        );
    }

    #[test]
    fn test_failed_write_leaves_records_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("queue.txt");
        let mut store: RecordStore<ErIntake> =
            RecordStore::open(&path, 1000).expect("open should succeed");
        store
            .append_new(|id| intake(id, "A"))
            .expect("append should succeed");

        // A directory in place of the file makes every write fail.
        fs::remove_file(&path).expect("should remove file");
        fs::create_dir(&path).expect("should create blocking directory");

        let err = store
            .append_new(|id| intake(id, "Ghost"))
            .expect_err("append should fail");
        assert!(matches!(err, RecordError::FileWrite(_)));
        let err = store
            .update(1000, |r| {
                r.priority = 5;
                Ok(())
            })
            .expect_err("update should fail");
        assert!(matches!(err, RecordError::FileWrite(_)));
        let err = store.remove(1000).expect_err("remove should fail");
        assert!(matches!(err, RecordError::FileWrite(_)));
        let err = store.pop_front().expect_err("pop should fail");
        assert!(matches!(err, RecordError::FileWrite(_)));

        assert_eq!(store.len(), 1);
        assert_eq!(store.find(1000).expect("record should survive").priority, 3);
        assert_eq!(store.next_id(), Some(1001), "failed append must not use up an id");

        fs::remove_dir(&path).expect("should remove blocking directory");
        store
            .append_new(|id| intake(id, "Real"))
            .expect("append should succeed");
        assert_eq!(
            fs::read_to_string(&path).expect("file should exist"),
            "1000|A|3\n1001|Real|3\n"
        );
    }

    #[test]
    fn test_id_space_exhaustion_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("queue.txt");
        fs::write(&path, "4294967294|Near|1\n").expect("should write fixture");

        let mut store: RecordStore<ErIntake> =
            RecordStore::open(&path, 1000).expect("open should succeed");
        let id = store
            .append_new(|id| intake(id, "Last"))
            .expect("the final id should be handed out");
        assert_eq!(id, u32::MAX);
        assert_eq!(store.next_id(), None);

        let err = store
            .append_new(|id| intake(id, "Overflow"))
            .expect_err("no ids should be left");
        assert!(matches!(err, RecordError::IdSpaceExhausted));
        assert_eq!(store.len(), 2);

        let reopened: RecordStore<ErIntake> =
            RecordStore::open(&path, 1000).expect("open should succeed");
        assert_eq!(reopened.next_id(), None);
    }

    #[test]
    fn test_update_and_remove_unknown_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut store: RecordStore<ErIntake> =
            RecordStore::open(temp_dir.path().join("queue.txt"), 1000)
                .expect("open should succeed");

        let err = store.update(42, |_| Ok(())).expect_err("id 42 is absent");
        assert!(matches!(err, RecordError::NotFound(42)));

        let err = store.remove(42).expect_err("id 42 is absent");
        assert!(matches!(err, RecordError::NotFound(42)));
    }

    #[test]
    fn test_pop_front_on_empty_does_not_write() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("queue.txt");
        let mut store: RecordStore<ErIntake> =
            RecordStore::open(&path, 1000).expect("open should succeed");

        assert!(store.pop_front().expect("pop should succeed").is_none());
        assert!(!path.exists());
    }
}
