use std::collections::HashMap;

use tracing::debug;

use crate::template::template_model::{FieldType, StoredField, TemplateEntry};
use crate::text::normalize::normalize;

/// A stored field prepared for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedField {
    pub label: String,
    pub normalized_label: String,
    pub field_type: FieldType,
    pub values: Vec<String>,
    pub normalized_values: Vec<String>,
}

impl IndexedField {
    pub fn from_stored(field: &StoredField) -> Self {
        Self {
            label: field.label.clone(),
            normalized_label: normalize(&field.label),
            field_type: field.field_type,
            values: field.values.clone(),
            normalized_values: field.values.iter().map(|v| normalize(v)).collect(),
        }
    }

    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Per-type lookup over one or more templates.
///
/// Buckets keep insertion order; duplicates are kept as independent
/// candidates and the matcher prefers the first one on ties.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    buckets: HashMap<FieldType, Vec<IndexedField>>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &StoredField) -> bool {
        if !field.field_type.is_known() {
            return false;
        }
        self.buckets
            .entry(field.field_type)
            .or_default()
            .push(IndexedField::from_stored(field));
        true
    }

    pub fn bucket(&self, field_type: FieldType) -> &[IndexedField] {
        self.buckets
            .get(&field_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a fresh index from template entries. Fields of unknown type are
/// dropped silently.
pub fn build_index<'a, I>(entries: I) -> FieldIndex
where
    I: IntoIterator<Item = &'a TemplateEntry>,
{
    let mut index = FieldIndex::new();
    let mut dropped = 0usize;

    for entry in entries {
        for field in &entry.fields {
            if !index.insert(field) {
                dropped += 1;
            }
        }
    }

    debug!(indexed = index.len(), dropped, "built field index");
    index
}
