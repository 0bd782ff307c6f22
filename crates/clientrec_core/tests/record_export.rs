use clientrec_core::{Record, RecordId, RecordManager, SelectedFile};
use serde_json::json;

#[test]
fn export_preserves_extra_fields_and_id_shapes() {
    let mut manager = RecordManager::new();
    let rows = json!([
        { "id": 1, "name": "Ada", "email": "ada@x.io", "phone": "555-0100" },
        { "id": "c-2", "name": "Bob", "email": "bob@x.io", "tags": ["vip"] }
    ]);
    manager
        .ingest_file(&SelectedFile::json("clients.json", rows.to_string()))
        .unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&manager.export_json().unwrap()).unwrap();
    assert_eq!(exported, rows);
}

#[test]
fn record_deserializes_from_loose_objects() {
    let record: Record = serde_json::from_value(json!({
        "id": "c-9",
        "email": "c9@x.io",
        "name": null
    }))
    .unwrap();
    assert_eq!(record.id, Some(RecordId::from("c-9")));
    assert_eq!(record.name, None);
    assert_eq!(record.extra["name"], serde_json::Value::Null);

    let err = serde_json::from_value::<Record>(json!([1, 2])).unwrap_err();
    assert!(err.to_string().contains("JSON object"));
}
