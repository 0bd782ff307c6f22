//! Record manager state machine.
//!
//! # Responsibility
//! - Apply upload, search, edit, delete and paging operations.
//! - Produce render snapshots for the table UI.
//!
//! # Invariants
//! - At most one record id is in edit mode at a time.
//! - The page cursor is 1-based and never drops below 1.
//! - Only upload failures and email collisions become the displayed error;
//!   a later success clears it.
//! - Save checks emails against the last successfully parsed upload, not
//!   against the live record set.
//! - Only last-upload entries with the edited record's own id are exempt
//!   from that check.

use crate::config::ManagerConfig;
use crate::ingest::merge::merge_by_email;
use crate::ingest::parse::{parse_selected_file, IngestError};
use crate::model::record::{Record, RecordId};
use crate::repo::record_repo::{RecordRepository, RepoError, VecRecordRepository};
use crate::search::filter::{normalize_query, record_matches};
use crate::service::pagination::{clamp_page, page_count, page_range};
use crate::upload::selection::{FileSelection, SelectedFile};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Record manager error.
#[derive(Debug)]
pub enum ManagerError {
    /// Upload failed; shown to the user.
    Ingest(IngestError),
    /// Edited email is taken by the last upload; shown to the user.
    EmailInUse(String),
    /// Edit input or save arrived with no record in edit mode.
    NotEditing,
    /// No record carries the requested id (`None`: no id-less record).
    RecordNotFound(Option<RecordId>),
    /// Requested page has no button.
    PageOutOfRange { requested: usize, page_count: usize },
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingest(err) => write!(f, "{err}"),
            Self::EmailInUse(_) => {
                f.write_str("This email is already in use. Please enter a unique email.")
            }
            Self::NotEditing => f.write_str("no record is in edit mode"),
            Self::RecordNotFound(Some(id)) => write!(f, "record not found: {id}"),
            Self::RecordNotFound(None) => f.write_str("record not found: <no id>"),
            Self::PageOutOfRange {
                requested,
                page_count,
            } => write!(f, "page {requested} out of range 1..={page_count}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ingest(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IngestError> for ManagerError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<RepoError> for ManagerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::RecordNotFound(id),
        }
    }
}

/// How an upload changed the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// First successful upload: set replaced wholesale.
    Replaced,
    /// Later upload: merged by email.
    Merged,
}

impl IngestMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Replaced => "replace",
            Self::Merged => "merge",
        }
    }
}

/// Per-file ingest report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub file_name: String,
    pub mode: IngestMode,
    /// Object elements decoded from the file.
    pub parsed: usize,
    /// Records that entered the set.
    pub added: usize,
    pub skipped_duplicate: usize,
    pub skipped_missing_email: usize,
    pub skipped_non_object: usize,
}

/// One table row in a render snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub record: Record,
    /// Whether inline inputs are shown for this row.
    pub editing: bool,
}

/// Render snapshot of the whole editor.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    /// Rows on the current page.
    pub rows: Vec<RowView>,
    pub current_page: usize,
    /// Number of page buttons.
    pub page_count: usize,
    pub page_size: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub search_query: String,
    pub error: Option<String>,
    /// Name of the file that seeded the set.
    pub file_name: Option<String>,
}

#[derive(Debug, Clone)]
struct EditSession {
    // `None` edits the records that carry no id.
    id: Option<RecordId>,
    // Matching records as they were when editing started.
    original: Vec<Record>,
}

/// In-memory client record editor.
pub struct RecordManager<R: RecordRepository = VecRecordRepository> {
    repo: R,
    config: ManagerConfig,
    first_file_name: Option<String>,
    // (id, email) of every record in the last parsed upload, duplicates kept.
    last_upload: Vec<(Option<RecordId>, Option<String>)>,
    search_query: String,
    edit: Option<EditSession>,
    current_page: usize,
    error: Option<String>,
}

impl RecordManager<VecRecordRepository> {
    /// Creates an empty manager with default configuration.
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        Self::with_repository(VecRecordRepository::new(), config)
    }
}

impl Default for RecordManager<VecRecordRepository> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RecordRepository> RecordManager<R> {
    /// Creates a manager over the provided repository.
    ///
    /// Existing repository contents are kept, but the next upload still
    /// counts as the first one and replaces them.
    pub fn with_repository(repo: R, config: ManagerConfig) -> Self {
        Self {
            repo,
            config: config.normalized(),
            first_file_name: None,
            last_upload: Vec::new(),
            search_query: String::new(),
            edit: None,
            current_page: 1,
            error: None,
        }
    }

    /// Ingests every file of a selection in order.
    ///
    /// Stops at the first failing file; files before it stay applied. An
    /// empty selection is reported like a non-JSON pick.
    ///
    /// # Errors
    /// - Returns `ManagerError::Ingest` for the failing file, which also
    ///   becomes the displayed error.
    pub fn ingest_selection(
        &mut self,
        selection: &FileSelection,
    ) -> ManagerResult<Vec<IngestOutcome>> {
        if selection.is_empty() {
            let err = IngestError::NotJson {
                file_name: String::new(),
            };
            return Err(self.fail_ingest(err));
        }

        let mut outcomes = Vec::with_capacity(selection.files.len());
        for file in &selection.files {
            outcomes.push(self.ingest_file(file)?);
        }
        Ok(outcomes)
    }

    /// Parses one file and applies it to the record set.
    ///
    /// The first successful upload replaces the set as-is; later uploads
    /// merge by email. Either way the file becomes the reference for the
    /// save-time email check.
    ///
    /// # Errors
    /// - Returns `ManagerError::Ingest` and leaves records untouched when
    ///   the file is not JSON, not an array, or malformed.
    pub fn ingest_file(&mut self, file: &SelectedFile) -> ManagerResult<IngestOutcome> {
        let parsed = match parse_selected_file(file) {
            Ok(parsed) => parsed,
            Err(err) => return Err(self.fail_ingest(err)),
        };

        self.last_upload = parsed
            .records
            .iter()
            .map(|record| (record.id.clone(), record.email.clone()))
            .collect();

        let parsed_count = parsed.records.len();
        let outcome = if self.first_file_name.is_none() {
            self.first_file_name = Some(parsed.file_name.clone());
            self.repo.replace_all(parsed.records);
            IngestOutcome {
                file_name: parsed.file_name,
                mode: IngestMode::Replaced,
                parsed: parsed_count,
                added: parsed_count,
                skipped_duplicate: 0,
                skipped_missing_email: 0,
                skipped_non_object: parsed.skipped_non_object,
            }
        } else {
            let merged = merge_by_email(self.repo.records(), parsed.records);
            let added = merged.accepted.len();
            self.repo.append(merged.accepted);
            IngestOutcome {
                file_name: parsed.file_name,
                mode: IngestMode::Merged,
                parsed: parsed_count,
                added,
                skipped_duplicate: merged.skipped_duplicate,
                skipped_missing_email: merged.skipped_missing_email,
                skipped_non_object: parsed.skipped_non_object,
            }
        };
        self.error = None;

        info!(
            "event=ingest module=manager status=ok mode={} parsed={} added={} skipped_duplicate={} skipped_missing_email={} skipped_non_object={} total={}",
            outcome.mode.as_str(),
            outcome.parsed,
            outcome.added,
            outcome.skipped_duplicate,
            outcome.skipped_missing_email,
            outcome.skipped_non_object,
            self.repo.len()
        );
        Ok(outcome)
    }

    /// Reads a file from disk and ingests it.
    ///
    /// # Errors
    /// - Returns `IngestError::Unreadable` when the file cannot be read.
    /// - Otherwise the same errors as [`RecordManager::ingest_file`].
    pub fn ingest_path(&mut self, path: impl AsRef<Path>) -> ManagerResult<IngestOutcome> {
        let path = path.as_ref();
        match SelectedFile::from_path(path) {
            Ok(file) => self.ingest_file(&file),
            Err(source) => {
                let err = IngestError::Unreadable {
                    path: path.display().to_string(),
                    source,
                };
                Err(self.fail_ingest(err))
            }
        }
    }

    /// Updates search text and jumps back to page 1.
    pub fn search(&mut self, raw_query: &str) {
        self.search_query = normalize_query(raw_query);
        self.current_page = 1;
        debug!(
            "event=search module=manager status=ok query_chars={} matches={}",
            self.search_query.chars().count(),
            self.filtered_count()
        );
    }

    /// Puts `id` into edit mode, replacing any previous edit cursor.
    ///
    /// Inputs typed into a previously edited row are kept as-is.
    ///
    /// Passing `None` edits the records that carry no id.
    ///
    /// # Errors
    /// - Returns `RecordNotFound` when no record carries `id`.
    pub fn begin_edit<'a>(&mut self, id: impl Into<Option<&'a RecordId>>) -> ManagerResult<()> {
        let id = id.into();
        let original = self.repo.snapshot(id);
        if original.is_empty() {
            return Err(ManagerError::RecordNotFound(id.cloned()));
        }
        self.edit = Some(EditSession {
            id: id.cloned(),
            original,
        });
        Ok(())
    }

    /// Writes the name input straight into the edited record.
    pub fn set_edit_name(&mut self, name: &str) -> ManagerResult<()> {
        let id = self.edited_id()?;
        self.repo
            .update(id.as_ref(), |record| record.name = Some(name.to_string()))?;
        Ok(())
    }

    /// Writes the email input straight into the edited record.
    pub fn set_edit_email(&mut self, email: &str) -> ManagerResult<()> {
        let id = self.edited_id()?;
        self.repo
            .update(id.as_ref(), |record| record.email = Some(email.to_string()))?;
        Ok(())
    }

    /// Commits the edited record and leaves edit mode.
    ///
    /// The edited email is rejected when any other record of the last
    /// uploaded file carries it; entries with the edited record's own id
    /// are exempt. A missing email counts as a value, so an id-less email
    /// clashes with any other email-less record of that file.
    ///
    /// # Errors
    /// - `EmailInUse`: record restored to its pre-edit values, edit mode
    ///   kept, message displayed.
    /// - `NotEditing` / `RecordNotFound` for stale UI calls.
    pub fn save_edit(&mut self) -> ManagerResult<()> {
        let session = self.edit.clone().ok_or(ManagerError::NotEditing)?;
        let Some(current) = self
            .repo
            .records()
            .iter()
            .find(|record| record.matches_id(session.id.as_ref()))
        else {
            self.edit = None;
            return Err(ManagerError::RecordNotFound(session.id));
        };

        let edited_email = current.email.clone();
        let collides = self
            .last_upload
            .iter()
            .any(|(id, email)| *email == edited_email && *id != session.id);
        if collides {
            self.restore_original(&session)?;
            let err = ManagerError::EmailInUse(edited_email.unwrap_or_default());
            self.error = Some(err.to_string());
            warn!("event=save_edit module=manager status=error error_code=email_in_use");
            return Err(err);
        }

        self.error = None;
        self.edit = None;
        info!("event=save_edit module=manager status=ok");
        Ok(())
    }

    /// Leaves edit mode and restores the record to its pre-edit values.
    pub fn cancel_edit(&mut self) -> ManagerResult<()> {
        let session = self.edit.take().ok_or(ManagerError::NotEditing)?;
        self.restore_original(&session)
    }

    /// Removes every record carrying `id`; `None` removes id-less records.
    ///
    /// Moves the page cursor back when its page no longer exists.
    ///
    /// # Errors
    /// - Returns `RecordNotFound` when nothing was removed.
    pub fn delete<'a>(&mut self, id: impl Into<Option<&'a RecordId>>) -> ManagerResult<usize> {
        let id = id.into();
        let removed = self.repo.remove(id)?;
        if self
            .edit
            .as_ref()
            .is_some_and(|session| session.id.as_ref() == id)
        {
            self.edit = None;
        }

        let filtered = self.filtered_count();
        let clamped = clamp_page(self.current_page, filtered, self.config.page_size);
        if clamped != self.current_page {
            debug!(
                "event=page_clamp module=manager from={} to={}",
                self.current_page, clamped
            );
            self.current_page = clamped;
        }

        info!(
            "event=delete module=manager status=ok removed={} total={}",
            removed,
            self.repo.len()
        );
        Ok(removed)
    }

    /// Selects a page button.
    ///
    /// # Errors
    /// - Returns `PageOutOfRange` for pages without a button.
    pub fn go_to_page(&mut self, page: usize) -> ManagerResult<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(ManagerError::PageOutOfRange {
                requested: page,
                page_count,
            });
        }
        self.current_page = page;
        Ok(())
    }

    /// Discards all state, like a page reload.
    pub fn reset(&mut self) {
        self.repo.clear();
        self.first_file_name = None;
        self.last_upload.clear();
        self.search_query.clear();
        self.edit = None;
        self.current_page = 1;
        self.error = None;
        info!("event=reset module=manager status=ok");
    }

    /// Builds the render snapshot for the current state.
    pub fn view(&self) -> RecordView {
        let filtered = self.filtered();
        let range = page_range(self.current_page, self.config.page_size, filtered.len());
        let editing = self.edit.as_ref().map(|session| session.id.as_ref());
        let rows = filtered[range]
            .iter()
            .map(|record| RowView {
                record: (*record).clone(),
                editing: editing.is_some_and(|id| record.matches_id(id)),
            })
            .collect();

        RecordView {
            rows,
            current_page: self.current_page,
            page_count: page_count(filtered.len(), self.config.page_size),
            page_size: self.config.page_size,
            filtered_count: filtered.len(),
            total_count: self.repo.len(),
            search_query: self.search_query.clone(),
            error: self.error.clone(),
            file_name: self.first_file_name.clone(),
        }
    }

    /// Serializes the whole record set as a pretty JSON array.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self.repo.records())
    }

    /// All records in set order, ignoring search.
    pub fn records(&self) -> &[Record] {
        self.repo.records()
    }

    pub fn config(&self) -> ManagerConfig {
        self.config
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered_count(), self.config.page_size)
    }

    pub fn filtered_count(&self) -> usize {
        self.repo
            .records()
            .iter()
            .filter(|record| record_matches(record, &self.search_query))
            .count()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Id of the record in edit mode; `None` also when it has no id.
    pub fn editing_id(&self) -> Option<&RecordId> {
        self.edit.as_ref().and_then(|session| session.id.as_ref())
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn first_file_name(&self) -> Option<&str> {
        self.first_file_name.as_deref()
    }

    fn filtered(&self) -> Vec<&Record> {
        self.repo
            .records()
            .iter()
            .filter(|record| record_matches(record, &self.search_query))
            .collect()
    }

    fn restore_original(&mut self, session: &EditSession) -> ManagerResult<()> {
        let mut originals = session.original.iter();
        self.repo.update(session.id.as_ref(), |record| {
            if let Some(original) = originals.next() {
                record.name = original.name.clone();
                record.email = original.email.clone();
            }
        })?;
        Ok(())
    }

    fn edited_id(&self) -> ManagerResult<Option<RecordId>> {
        self.edit
            .as_ref()
            .map(|session| session.id.clone())
            .ok_or(ManagerError::NotEditing)
    }

    fn fail_ingest(&mut self, err: IngestError) -> ManagerError {
        warn!(
            "event=ingest module=manager status=error error_code={}",
            err.code()
        );
        self.error = Some(err.to_string());
        ManagerError::Ingest(err)
    }
}
