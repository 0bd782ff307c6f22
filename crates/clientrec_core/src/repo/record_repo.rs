//! Record repository contract and `Vec`-backed implementation.

use crate::model::record::{Record, RecordId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for id-addressed operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoError {
    /// `None` stands for "records without an id".
    NotFound(Option<RecordId>),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(Some(id)) => write!(f, "record not found: {id}"),
            Self::NotFound(None) => f.write_str("record not found: <no id>"),
        }
    }
}

impl Error for RepoError {}

/// Ordered record storage.
///
/// Ids are caller-supplied and may repeat after a merge, so every
/// id-addressed write touches all matches. An id of `None` addresses the
/// records that carry no usable id.
pub trait RecordRepository {
    /// All records in insertion order.
    fn records(&self) -> &[Record];
    /// Drops current contents and stores `records` as-is.
    fn replace_all(&mut self, records: Vec<Record>);
    /// Appends `records` after current contents.
    fn append(&mut self, records: Vec<Record>);
    /// Clones every record carrying `id`, in order.
    fn snapshot(&self, id: Option<&RecordId>) -> Vec<Record>;
    /// Applies `update` to every record carrying `id`; returns the match count.
    fn update<F>(&mut self, id: Option<&RecordId>, update: F) -> RepoResult<usize>
    where
        F: FnMut(&mut Record);
    /// Removes every record carrying `id`; returns the removed count.
    fn remove(&mut self, id: Option<&RecordId>) -> RepoResult<usize>;
    /// Removes everything.
    fn clear(&mut self);

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// In-memory repository over a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct VecRecordRepository {
    records: Vec<Record>,
}

impl VecRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl RecordRepository for VecRecordRepository {
    fn records(&self) -> &[Record] {
        &self.records
    }

    fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    fn append(&mut self, records: Vec<Record>) {
        self.records.extend(records);
    }

    fn snapshot(&self, id: Option<&RecordId>) -> Vec<Record> {
        self.records
            .iter()
            .filter(|record| record.matches_id(id))
            .cloned()
            .collect()
    }

    fn update<F>(&mut self, id: Option<&RecordId>, mut update: F) -> RepoResult<usize>
    where
        F: FnMut(&mut Record),
    {
        let mut changed = 0;
        for record in self.records.iter_mut().filter(|record| record.matches_id(id)) {
            update(record);
            changed += 1;
        }
        if changed == 0 {
            return Err(RepoError::NotFound(id.cloned()));
        }
        Ok(changed)
    }

    fn remove(&mut self, id: Option<&RecordId>) -> RepoResult<usize> {
        let before = self.records.len();
        self.records.retain(|record| !record.matches_id(id));
        let removed = before - self.records.len();
        if removed == 0 {
            return Err(RepoError::NotFound(id.cloned()));
        }
        Ok(removed)
    }

    fn clear(&mut self) {
        self.records.clear();
    }
}
