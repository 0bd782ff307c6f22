//! FFI use-case API for the record table screen.
//!
//! # Responsibility
//! - Expose editor operations to Dart via FRB as sync calls.
//! - Hold the single process-wide record manager the screen talks to.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every mutating call returns the fresh table view, so the UI never
//!   renders stale rows.
//! - Rows are addressed by `row_key`, the JSON encoding of the record id
//!   (`null` for records without a usable id).

use clientrec_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    parse_row_key, row_key, FileSelection, ManagerResult, RecordId, RecordManager, RecordView,
    SelectedFile,
};
use log::{debug, warn};
use std::sync::{Mutex, OnceLock, PoisonError};

static MANAGER: OnceLock<Mutex<RecordManager>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One picked file as handed over by the Dart file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    /// Declared MIME type, if the platform reported one.
    pub mime_type: Option<String>,
    pub contents: Vec<u8>,
}

/// Table row projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    /// Opaque key to pass back into edit/delete calls.
    pub row_key: String,
    /// Id as displayed in the ID column.
    pub id_label: String,
    pub name: String,
    pub email: String,
    /// Whether this row shows inline inputs and a Save button.
    pub editing: bool,
}

/// Whole-screen projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTableView {
    pub rows: Vec<RecordRow>,
    /// 1-based page cursor.
    pub current_page: u32,
    /// Number of page buttons to render.
    pub page_count: u32,
    pub filtered_count: u32,
    pub total_count: u32,
    pub search_query: String,
    /// Inline error message, if any.
    pub error: Option<String>,
    pub file_name: Option<String>,
}

/// Result envelope for screen actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordActionResponse {
    pub ok: bool,
    /// Empty on success; error text otherwise.
    pub message: String,
    pub view: RecordTableView,
}

/// Ingests picked files in order, stopping at the first failing one.
#[flutter_rust_bridge::frb(sync)]
pub fn upload_files(files: Vec<UploadedFile>) -> RecordActionResponse {
    with_manager(|manager| upload_into(manager, files))
}

/// Applies search text and jumps to page 1.
#[flutter_rust_bridge::frb(sync)]
pub fn search_records(query: String) -> RecordTableView {
    with_manager(|manager| {
        manager.search(query.as_str());
        to_table_view(manager.view())
    })
}

/// Puts the row into edit mode.
#[flutter_rust_bridge::frb(sync)]
pub fn begin_edit(row_key: String) -> RecordActionResponse {
    with_manager(|manager| {
        keyed_action(manager, &row_key, "begin_edit", |manager, id| {
            manager.begin_edit(id)
        })
    })
}

/// Name input changed on the edited row.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_name(value: String) -> RecordActionResponse {
    with_manager(|manager| {
        let result = manager.set_edit_name(value.as_str());
        respond(manager, "edit_name", result)
    })
}

/// Email input changed on the edited row.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_email(value: String) -> RecordActionResponse {
    with_manager(|manager| {
        let result = manager.set_edit_email(value.as_str());
        respond(manager, "edit_email", result)
    })
}

/// Save button on the edited row.
#[flutter_rust_bridge::frb(sync)]
pub fn save_edit() -> RecordActionResponse {
    with_manager(|manager| {
        let result = manager.save_edit();
        respond(manager, "save_edit", result)
    })
}

/// Leaves edit mode without saving.
#[flutter_rust_bridge::frb(sync)]
pub fn cancel_edit() -> RecordActionResponse {
    with_manager(|manager| {
        let result = manager.cancel_edit();
        respond(manager, "cancel_edit", result)
    })
}

/// Delete button on a row.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_record(row_key: String) -> RecordActionResponse {
    with_manager(|manager| {
        keyed_action(manager, &row_key, "delete_record", |manager, id| {
            manager.delete(id).map(|_| ())
        })
    })
}

/// Page button click.
#[flutter_rust_bridge::frb(sync)]
pub fn go_to_page(page: u32) -> RecordActionResponse {
    with_manager(|manager| {
        let result = manager.go_to_page(page as usize);
        respond(manager, "go_to_page", result)
    })
}

/// Current table state, for first paint and hot restart.
#[flutter_rust_bridge::frb(sync)]
pub fn current_view() -> RecordTableView {
    with_manager(|manager| to_table_view(manager.view()))
}

/// Full record set as a pretty JSON array.
#[flutter_rust_bridge::frb(sync)]
pub fn export_records() -> String {
    with_manager(|manager| match manager.export_json() {
        Ok(json) => json,
        Err(err) => {
            warn!("event=export module=ffi status=error error={err}");
            String::from("[]")
        }
    })
}

/// Drops every record and resets the screen.
#[flutter_rust_bridge::frb(sync)]
pub fn reset_records() -> RecordTableView {
    with_manager(|manager| {
        manager.reset();
        to_table_view(manager.view())
    })
}

fn with_manager<T>(f: impl FnOnce(&mut RecordManager) -> T) -> T {
    let mutex = MANAGER.get_or_init(|| Mutex::new(RecordManager::new()));
    // A panic while holding the lock leaves plain data behind; keep serving it.
    let mut guard = mutex.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

fn upload_into(manager: &mut RecordManager, files: Vec<UploadedFile>) -> RecordActionResponse {
    let selection = FileSelection::new(
        files
            .into_iter()
            .map(|file| SelectedFile::new(file.name, file.mime_type, file.contents))
            .collect(),
    );
    let result = manager.ingest_selection(&selection).map(|_| ());
    respond(manager, "upload_files", result)
}

fn keyed_action(
    manager: &mut RecordManager,
    row_key: &str,
    action: &str,
    f: impl FnOnce(&mut RecordManager, Option<&RecordId>) -> ManagerResult<()>,
) -> RecordActionResponse {
    let Some(id) = parse_row_key(row_key) else {
        warn!("event={action} module=ffi status=error error_code=invalid_row_key");
        return RecordActionResponse {
            ok: false,
            message: format!("{action} failed: invalid row key `{row_key}`"),
            view: to_table_view(manager.view()),
        };
    };
    let result = f(manager, id.as_ref());
    respond(manager, action, result)
}

fn respond(
    manager: &RecordManager,
    action: &str,
    result: ManagerResult<()>,
) -> RecordActionResponse {
    let view = to_table_view(manager.view());
    match result {
        Ok(()) => RecordActionResponse {
            ok: true,
            message: String::new(),
            view,
        },
        Err(err) => {
            debug!("event={action} module=ffi status=error");
            RecordActionResponse {
                ok: false,
                message: err.to_string(),
                view,
            }
        }
    }
}

fn to_table_view(view: RecordView) -> RecordTableView {
    let rows = view
        .rows
        .into_iter()
        .map(|row| {
            let record = row.record;
            RecordRow {
                row_key: row_key(record.id.as_ref()),
                id_label: record.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                name: record.name.unwrap_or_default(),
                email: record.email.unwrap_or_default(),
                editing: row.editing,
            }
        })
        .collect();

    RecordTableView {
        rows,
        current_page: to_u32(view.current_page),
        page_count: to_u32(view.page_count),
        filtered_count: to_u32(view.filtered_count),
        total_count: to_u32(view.total_count),
        search_query: view.search_query,
        error: view.error,
        file_name: view.file_name,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, current_view, init_logging, keyed_action, ping, reset_records, respond,
        search_records, to_table_view, upload_files, upload_into, UploadedFile,
    };
    use clientrec_core::{RecordManager, JSON_MIME_TYPE};

    fn json_file(name: &str, body: &str) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            mime_type: Some(JSON_MIME_TYPE.to_string()),
            contents: body.as_bytes().to_vec(),
        }
    }

    fn seeded() -> RecordManager {
        let mut manager = RecordManager::new();
        let response = upload_into(
            &mut manager,
            vec![json_file(
                "clients.json",
                r#"[{"id":1,"name":"Ada","email":"ada@x.io"},{"id":"b-2","name":"Bob","email":"bob@x.io"}]"#,
            )],
        );
        assert!(response.ok, "{}", response.message);
        manager
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn upload_returns_rows_with_round_trippable_keys() {
        let mut manager = seeded();
        let view = to_table_view(manager.view());
        assert_eq!(view.total_count, 2);
        assert_eq!(view.rows[1].id_label, "b-2");
        assert_eq!(view.file_name.as_deref(), Some("clients.json"));

        let key = view.rows[1].row_key.clone();
        let response = keyed_action(&mut manager, &key, "delete_record", |manager, id| {
            manager.delete(id).map(|_| ())
        });
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.view.total_count, 1);
    }

    #[test]
    fn upload_failure_is_reported_in_envelope_and_view() {
        let mut manager = seeded();
        let response = upload_into(&mut manager, vec![json_file("bad.json", "{bad")]);
        assert!(!response.ok);
        assert_eq!(
            response.message,
            "Invalid JSON file. Please upload a valid JSON."
        );
        assert_eq!(response.view.error.as_deref(), Some(response.message.as_str()));
        assert_eq!(response.view.total_count, 2);
    }

    #[test]
    fn rows_without_id_get_a_null_key_and_can_be_deleted() {
        let mut manager = RecordManager::new();
        let response = upload_into(
            &mut manager,
            vec![json_file(
                "clients.json",
                r#"[{"name":"Anon","email":"anon@x.io"},{"id":2,"name":"Bob","email":"bob@x.io"}]"#,
            )],
        );
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.view.rows[0].row_key, "null");
        assert_eq!(response.view.rows[0].id_label, "");

        let response = keyed_action(&mut manager, "null", "delete_record", |manager, id| {
            manager.delete(id).map(|_| ())
        });
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.view.total_count, 1);
        assert_eq!(response.view.rows[0].row_key, "2");
    }

    #[test]
    fn invalid_row_key_is_rejected_without_touching_state() {
        let mut manager = seeded();
        let response = keyed_action(&mut manager, "{not json", "begin_edit", |manager, id| {
            manager.begin_edit(id)
        });
        assert!(!response.ok);
        assert!(response.message.contains("invalid row key"));
        assert!(response.view.rows.iter().all(|row| !row.editing));
    }

    #[test]
    fn edit_flow_marks_row_and_rejects_taken_email() {
        let mut manager = seeded();
        let response = keyed_action(&mut manager, "1", "begin_edit", |manager, id| {
            manager.begin_edit(id)
        });
        assert!(response.view.rows[0].editing);

        manager.set_edit_email("bob@x.io").expect("editing");
        let result = manager.save_edit();
        let response = respond(&manager, "save_edit", result);
        assert!(!response.ok);
        assert_eq!(response.view.rows[0].email, "ada@x.io");
        assert!(response.view.error.is_some());
    }

    #[test]
    fn process_wide_manager_serves_the_screen() {
        reset_records();
        let response = upload_files(vec![json_file(
            "screen.json",
            r#"[{"id":1,"name":"Ada","email":"ada@x.io"},{"id":2,"name":"Bob","email":"bob@x.io"}]"#,
        )]);
        assert!(response.ok, "{}", response.message);

        let view = search_records("BOB".to_string());
        assert_eq!(view.filtered_count, 1);
        assert_eq!(current_view().rows[0].name, "Bob");

        let cleared = reset_records();
        assert_eq!(cleared.total_count, 0);
    }
}
