use std::path::PathBuf;

use form_pilot::page::dom::DomTree;
use form_pilot::template::template_model::{CapturedForm, FieldType, StoredField, TemplateEntry};

pub fn fixture(name: &str) -> PathBuf {
    let base = std::env::current_dir().unwrap();
    base.join("tests").join("fixtures").join(name)
}

pub fn load_fixture(name: &str) -> DomTree {
    DomTree::load(&fixture(name)).unwrap()
}

pub fn field(label: &str, field_type: FieldType, values: &[&str]) -> StoredField {
    StoredField::new(label, field_type, values.iter().map(|v| v.to_string()).collect())
}

pub fn entry(name: &str, fields: Vec<StoredField>) -> TemplateEntry {
    TemplateEntry::from_capture(
        Some(name),
        CapturedForm {
            form_title: name.to_string(),
            fields,
        },
        "test://form",
        1_700_000_000_000,
    )
}
