//! Core state logic for the client record editor.
//! UI layers render [`RecordView`] snapshots and call back into
//! [`RecordManager`]; this crate owns every business rule.

pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod upload;

pub use config::{ManagerConfig, DEFAULT_PAGE_SIZE};
pub use ingest::merge::{merge_by_email, MergeOutcome};
pub use ingest::parse::{parse_selected_file, IngestError, IngestResult, ParsedUpload};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{parse_row_key, row_key, Record, RecordId};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, VecRecordRepository};
pub use search::filter::{filter_records, normalize_query, record_matches};
pub use service::record_manager::{
    IngestMode, IngestOutcome, ManagerError, ManagerResult, RecordManager, RecordView, RowView,
};
pub use upload::control::UploadControl;
pub use upload::selection::{FileSelection, SelectedFile, JSON_MIME_TYPE};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
