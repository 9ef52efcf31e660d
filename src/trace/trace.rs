use chrono::Utc;
use serde::Serialize;

use crate::fill::matcher::MatchPath;
use crate::template::template_model::FieldType;

/// One line of the fill trace: what was decided for a single question.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: i64,
    pub question: usize,

    pub title: String,
    pub field_type: FieldType,

    pub matched_label: Option<String>,
    pub score: Option<f64>,
    pub match_path: Option<MatchPath>,

    pub status: String,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(question: usize, title: &str, field_type: FieldType) -> Self {
        Self {
            timestamp_ms: Utc::now().timestamp_millis(),
            question,
            title: title.to_string(),
            field_type,
            matched_label: None,
            score: None,
            match_path: None,
            status: String::new(),
            detail: None,
        }
    }

    pub fn with_match(mut self, label: Option<&str>, score: f64, path: MatchPath) -> Self {
        self.matched_label = label.map(str::to_string);
        self.score = Some(score);
        self.match_path = Some(path);
        self
    }

    pub fn with_status(mut self, status: impl ToString) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
