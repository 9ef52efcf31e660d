use form_pilot::{
    error::PilotError,
    template::{
        index::{FieldIndex, build_index},
        store::{JsonFileStore, MemoryStore, TemplateStore},
        template_model::{CapturedForm, DEFAULT_TEMPLATE_NAME, FieldType, StoredField, TemplateEntry},
    },
};

mod common;

use crate::common::utils::{entry, field};

// =========================================================================
// Wire format
// =========================================================================

#[test]
fn stored_field_accepts_legacy_and_loose_values() {
    let json = r#"[
        {"label": "Name", "type": "text", "values": ["Ada"]},
        {"label": "Age", "type": "text", "value": 36},
        {"label": "Colors", "type": "checkbox", "values": ["Red", null, true]},
        {"label": "Signature", "type": "signature", "values": ["x"]},
        {"label": "Nothing", "type": "paragraph"}
    ]"#;

    let fields: Vec<StoredField> = serde_json::from_str(json).unwrap();

    assert_eq!(fields[0].values, vec!["Ada"]);
    assert_eq!(fields[1].values, vec!["36"], "Legacy single value");
    assert_eq!(fields[2].values, vec!["Red", "true"], "Nulls dropped, scalars stringified");
    assert_eq!(fields[3].field_type, FieldType::Unknown, "Unknown types survive parsing");
    assert!(fields[4].values.is_empty());
}

#[test]
fn template_entry_reads_camel_case_json() {
    let json = r#"{
        "id": "abc",
        "name": "Contact",
        "createdAt": 1700000000000,
        "sourceUrl": "https://forms.example/1",
        "sourceTitle": "Contact form",
        "fields": [{"label": "Email", "type": "text", "values": ["ada@example.com"]}]
    }"#;

    let entry: TemplateEntry = serde_json::from_str(json).unwrap();
    assert_eq!(entry.created_at, 1_700_000_000_000);
    assert_eq!(entry.source_url, "https://forms.example/1");
    assert_eq!(entry.fields[0].first_value(), Some("ada@example.com"));

    let out = serde_json::to_value(&entry).unwrap();
    assert!(out.get("createdAt").is_some());
    assert_eq!(out["fields"][0]["type"], "text");
}

#[test]
fn template_entry_fills_missing_identity_fields() {
    let json = r#"{
        "sourceUrl": "https://forms.example/2",
        "sourceTitle": "Imported form",
        "fields": [{"label": "Email", "type": "text", "values": ["ada@example.com"]}]
    }"#;

    let entry: TemplateEntry = serde_json::from_str(json).unwrap();
    assert_eq!(entry.name, "Imported form");
    assert_eq!(entry.created_at, 0);
    assert_eq!(entry.id.len(), 40);

    let again: TemplateEntry = serde_json::from_str(json).unwrap();
    assert_eq!(entry.id, again.id, "Generated ids are stable");

    let bare: TemplateEntry = serde_json::from_str(r#"{"id": "  "}"#).unwrap();
    assert_eq!(bare.name, DEFAULT_TEMPLATE_NAME);
    assert_eq!(bare.id.len(), 40);
    assert!(bare.fields.is_empty());
}

#[test]
fn json_store_tolerates_partial_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("templates.json");
    std::fs::write(
        &path,
        r#"{"entries": [
            {"id": "kept", "name": "Full", "createdAt": 5, "fields": []},
            {"fields": [{"label": "Name", "type": "text", "values": ["Ada"]}]}
        ]}"#,
    )
    .unwrap();

    let db = JsonFileStore::new(&path).snapshot().unwrap();
    assert_eq!(db.entries.len(), 2);
    assert_eq!(db.entries[0].id, "kept");
    assert_eq!(db.entries[1].name, DEFAULT_TEMPLATE_NAME);
    assert!(db.find(&db.entries[1].id).is_some());
}

#[test]
fn from_capture_falls_back_to_form_title_then_default() {
    let capture = |title: &str| CapturedForm {
        form_title: title.to_string(),
        fields: vec![field("Email", FieldType::Text, &["a@b.c"])],
    };

    let named = TemplateEntry::from_capture(Some("Work"), capture("Signup"), "u", 1);
    assert_eq!(named.name, "Work");

    let titled = TemplateEntry::from_capture(Some("   "), capture("Signup"), "u", 1);
    assert_eq!(titled.name, "Signup");
    assert_eq!(titled.source_title, "Signup");

    let untitled = TemplateEntry::from_capture(None, capture(""), "u", 1);
    assert_eq!(untitled.name, DEFAULT_TEMPLATE_NAME);
}

#[test]
fn entry_ids_are_hex_fingerprints() {
    let a = entry("A", vec![field("Email", FieldType::Text, &["x"])]);
    let b = entry("B", vec![field("Email", FieldType::Text, &["x"])]);

    assert_eq!(a.id.len(), 40);
    assert!(a.id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a.id, b.id);
}

// =========================================================================
// Field index
// =========================================================================

#[test]
fn index_buckets_by_type_and_drops_unknown() {
    let first = entry(
        "First",
        vec![
            field("Email", FieldType::Text, &["a@b.c"]),
            field("Colors", FieldType::Checkbox, &["Red"]),
            field("Signature", FieldType::Unknown, &["x"]),
        ],
    );
    let second = entry("Second", vec![field("Email", FieldType::Text, &["z@y.x"])]);

    let index = build_index([&first, &second]);

    assert_eq!(index.len(), 3);
    assert_eq!(index.bucket(FieldType::Checkbox).len(), 1);
    assert!(index.bucket(FieldType::Radio).is_empty());
    assert!(index.bucket(FieldType::Unknown).is_empty());

    let emails = index.bucket(FieldType::Text);
    assert_eq!(emails.len(), 2, "Duplicates are kept");
    assert_eq!(emails[0].first_value(), Some("a@b.c"), "Insertion order is kept");
    assert_eq!(emails[0].normalized_label, "email");
}

#[test]
fn empty_index() {
    let index = build_index(std::iter::empty::<&TemplateEntry>());
    assert!(index.is_empty());

    let mut manual = FieldIndex::new();
    assert!(!manual.insert(&field("?", FieldType::Unknown, &[])));
    assert!(manual.insert(&field("Bio", FieldType::Paragraph, &["Hi"])));
    assert_eq!(manual.bucket(FieldType::Paragraph)[0].normalized_values, vec!["hi"]);
}

// =========================================================================
// Stores
// =========================================================================

#[test]
fn json_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("none.json"));
    assert!(store.snapshot().unwrap().entries.is_empty());
}

#[test]
fn json_store_append_update_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("templates.json");
    let mut store = JsonFileStore::new(&path);

    let a = entry("A", vec![field("Email", FieldType::Text, &["a@b.c"])]);
    let b = entry("B", vec![field("Phone", FieldType::Text, &["555"])]);
    store.append_entry(a.clone()).unwrap();
    store.append_entry(b.clone()).unwrap();

    let reopened = JsonFileStore::new(&path);
    let db = reopened.snapshot().unwrap();
    assert_eq!(db.entries.len(), 2);
    assert_eq!(db.find(&b.id).unwrap().name, "B");

    let mut renamed = a.clone();
    renamed.name = "A2".into();
    assert!(store.update_entry(renamed).unwrap());
    assert_eq!(store.snapshot().unwrap().find(&a.id).unwrap().name, "A2");

    assert!(store.delete_entry(&a.id).unwrap());
    assert!(!store.delete_entry(&a.id).unwrap(), "Second delete finds nothing");
    assert_eq!(store.snapshot().unwrap().entries.len(), 1);

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value["entries"].is_array());
}

#[test]
fn json_store_reports_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileStore::new(&path).snapshot().unwrap_err();
    assert!(matches!(err, PilotError::Json { .. }));
}

#[test]
fn memory_store_round() {
    let a = entry("A", vec![]);
    let mut store = MemoryStore::with_entries(vec![a.clone()]);

    assert!(!store.update_entry(entry("Other", vec![])).unwrap());
    store.append_entry(entry("B", vec![])).unwrap();
    assert_eq!(store.snapshot().unwrap().entries.len(), 2);
    assert!(store.delete_entry(&a.id).unwrap());
    assert_eq!(store.snapshot().unwrap().entries[0].name, "B");

    assert!(MemoryStore::new().snapshot().unwrap().entries.is_empty());
}
