use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha1::{Digest, Sha1};

// ============================================================================
// Field types
// ============================================================================

/// Semantic type of a form question.
///
/// Serialized lower-case. Any string this version does not know deserializes
/// to `Unknown`, which is never indexed or matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Paragraph,
    Radio,
    Checkbox,
    Dropdown,
    #[serde(other)]
    Unknown,
}

impl FieldType {
    pub fn is_known(self) -> bool {
        self != FieldType::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Paragraph => "paragraph",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Dropdown => "dropdown",
            FieldType::Unknown => "unknown",
        }
    }
}

// ============================================================================
// Stored fields and template entries
// ============================================================================

/// One saved question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStoredField")]
pub struct StoredField {
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub values: Vec<String>,
}

impl StoredField {
    pub fn new(label: impl Into<String>, field_type: FieldType, values: Vec<String>) -> Self {
        Self {
            label: label.into(),
            field_type,
            values,
        }
    }

    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Wire shape accepted for a stored field. Older records carry a single
/// `value` instead of `values`, and values are not always strings.
#[derive(Deserialize)]
struct RawStoredField {
    #[serde(default)]
    label: Value,
    #[serde(rename = "type", default = "unknown_type")]
    field_type: FieldType,
    #[serde(default)]
    values: Option<Vec<Value>>,
    #[serde(default)]
    value: Option<Value>,
}

fn unknown_type() -> FieldType {
    FieldType::Unknown
}

impl From<RawStoredField> for StoredField {
    fn from(raw: RawStoredField) -> Self {
        let values = match (raw.values, raw.value) {
            (Some(values), _) => values.iter().filter_map(scalar_to_string).collect(),
            (None, Some(value)) => scalar_to_string(&value).into_iter().collect(),
            (None, None) => Vec::new(),
        };

        StoredField {
            label: scalar_to_string(&raw.label).unwrap_or_default(),
            field_type: raw.field_type,
            values,
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A saved snapshot of one form's answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTemplateEntry")]
pub struct TemplateEntry {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub source_url: String,
    pub source_title: String,
    pub fields: Vec<StoredField>,
}

pub const DEFAULT_TEMPLATE_NAME: &str = "Untitled template";

/// Wire shape accepted for an entry. Hand-written or imported records may
/// lack `id`, `name` or `createdAt`; those are filled in on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemplateEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    source_url: String,
    #[serde(default)]
    source_title: String,
    #[serde(default)]
    fields: Vec<StoredField>,
}

impl From<RawTemplateEntry> for TemplateEntry {
    fn from(raw: RawTemplateEntry) -> Self {
        let name = Some(raw.name.trim())
            .filter(|n| !n.is_empty())
            .or_else(|| Some(raw.source_title.trim()).filter(|t| !t.is_empty()))
            .unwrap_or(DEFAULT_TEMPLATE_NAME)
            .to_string();

        let id = match raw.id.trim() {
            "" => entry_fingerprint(&name, &raw.source_url, raw.created_at, &raw.fields),
            id => id.to_string(),
        };

        TemplateEntry {
            id,
            name,
            created_at: raw.created_at,
            source_url: raw.source_url,
            source_title: raw.source_title,
            fields: raw.fields,
        }
    }
}

impl TemplateEntry {
    /// Build a new entry from a capture.
    ///
    /// The name falls back to the captured form title, then to
    /// `DEFAULT_TEMPLATE_NAME`.
    pub fn from_capture(
        name: Option<&str>,
        capture: CapturedForm,
        source_url: &str,
        created_at: i64,
    ) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| Some(capture.form_title.trim()).filter(|t| !t.is_empty()))
            .unwrap_or(DEFAULT_TEMPLATE_NAME)
            .to_string();

        let id = entry_fingerprint(&name, source_url, created_at, &capture.fields);

        TemplateEntry {
            id,
            name,
            created_at,
            source_url: source_url.to_string(),
            source_title: capture.form_title,
            fields: capture.fields,
        }
    }
}

/// Stable hex id for a new entry.
pub fn entry_fingerprint(name: &str, source_url: &str, created_at: i64, fields: &[StoredField]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    hasher.update(source_url.as_bytes());
    hasher.update([0u8]);
    hasher.update(created_at.to_le_bytes());
    for field in fields {
        hasher.update([0u8]);
        hasher.update(field.label.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Answers read off a live form, before they become a `TemplateEntry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedForm {
    pub form_title: String,
    pub fields: Vec<StoredField>,
}
