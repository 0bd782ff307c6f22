use clientrec_core::{ManagerConfig, ManagerError, RecordManager, SelectedFile};
use serde_json::json;

fn seeded() -> RecordManager {
    let mut manager = RecordManager::new();
    let rows = json!([
        { "id": 1, "name": "Ada Lovelace", "email": "ada@math.org" },
        { "id": 2, "name": "Alan Turing", "email": "alan@bletchley.uk" },
        { "id": 3, "name": "Grace Hopper", "email": "grace@navy.mil" },
        { "id": 4, "name": "Edsger Dijkstra", "email": "ewd@utexas.edu" },
        { "id": 5, "name": "Barbara Liskov", "email": "liskov@mit.edu" },
        { "id": 6, "name": "Donald Knuth", "email": "knuth@stanford.edu" },
        { "id": "X-12", "name": "Margaret Hamilton", "email": "mh@nasa.gov" }
    ]);
    manager
        .ingest_file(&SelectedFile::json("people.json", rows.to_string()))
        .unwrap();
    manager
}

#[test]
fn empty_query_shows_all_records() {
    let mut manager = seeded();
    manager.search("");
    let view = manager.view();
    assert_eq!(view.filtered_count, 7);
    assert_eq!(view.page_count, 2);
    assert_eq!(view.rows.len(), 5);
}

#[test]
fn unmatched_query_shows_no_rows_and_no_page_buttons() {
    let mut manager = seeded();
    manager.search("zzz-nothing");
    let view = manager.view();
    assert!(view.rows.is_empty());
    assert_eq!(view.page_count, 0);
    assert_eq!(view.filtered_count, 0);
}

#[test]
fn query_matches_id_name_and_email_ignoring_case() {
    let mut manager = seeded();

    manager.search("EDU");
    assert_eq!(manager.view().filtered_count, 3);

    manager.search("x-1");
    let view = manager.view();
    assert_eq!(view.filtered_count, 1);
    assert_eq!(view.rows[0].record.name.as_deref(), Some("Margaret Hamilton"));
    assert_eq!(view.search_query, "x-1");

    manager.search("Grace");
    assert_eq!(manager.view().filtered_count, 1);
}

#[test]
fn search_resets_to_first_page() {
    let mut manager = seeded();
    manager.go_to_page(2).unwrap();
    assert_eq!(manager.current_page(), 2);

    manager.search("a");
    assert_eq!(manager.current_page(), 1);
}

#[test]
fn go_to_page_rejects_pages_without_buttons() {
    let mut manager = seeded();
    assert!(matches!(
        manager.go_to_page(3),
        Err(ManagerError::PageOutOfRange {
            requested: 3,
            page_count: 2
        })
    ));
    assert!(manager.go_to_page(0).is_err());
    assert_eq!(manager.current_page(), 1);
}

#[test]
fn page_size_is_configurable() {
    let mut manager = RecordManager::with_config(ManagerConfig::with_page_size(3));
    manager
        .ingest_file(&SelectedFile::json(
            "a.json",
            json!([
                { "id": 1, "email": "a@x.io" },
                { "id": 2, "email": "b@x.io" },
                { "id": 3, "email": "c@x.io" },
                { "id": 4, "email": "d@x.io" }
            ])
            .to_string(),
        ))
        .unwrap();
    let view = manager.view();
    assert_eq!(view.page_size, 3);
    assert_eq!(view.page_count, 2);
    assert_eq!(view.rows.len(), 3);
}
