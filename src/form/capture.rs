use tracing::{debug, info};

use crate::form::classifier::{
    choice_options, discover_questions, dropdown_control, dropdown_current_value, is_textarea,
    DEFAULT_TITLE_MAX_CHARS,
};
use crate::form::form_model::QuestionCandidate;
use crate::page::document::FormDocument;
use crate::template::template_model::{CapturedForm, FieldType, StoredField};

/// Read the current answers of every supported question on the page.
pub fn capture_form<D: FormDocument>(doc: &D) -> CapturedForm {
    capture_form_with(doc, DEFAULT_TITLE_MAX_CHARS)
}

pub fn capture_form_with<D: FormDocument>(doc: &D, title_max_chars: usize) -> CapturedForm {
    let fields: Vec<StoredField> = discover_questions(doc, title_max_chars)
        .into_iter()
        .filter(QuestionCandidate::is_supported)
        .filter_map(|question| {
            let values = current_values(doc, &question);
            if values.is_empty() {
                debug!(title = %question.title, "no answer to capture");
                return None;
            }
            Some(StoredField::new(question.title, question.field_type, values))
        })
        .collect();

    info!(fields = fields.len(), "captured form");

    CapturedForm {
        form_title: doc.title(),
        fields,
    }
}

/// Answer(s) currently shown by a question. Password inputs are never read.
pub fn current_values<D: FormDocument>(doc: &D, question: &QuestionCandidate<D::Node>) -> Vec<String> {
    let container = question.container;

    match question.field_type {
        FieldType::Text => doc
            .query_first(container, |d, n| {
                d.input_type(n)
                    .is_some_and(|t| matches!(t.as_str(), "text" | "email" | "tel" | "url"))
            })
            .and_then(|n| doc.value(n))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .into_iter()
            .collect(),

        FieldType::Paragraph => doc
            .query_first(container, is_textarea::<D>)
            .and_then(|n| doc.value(n))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .into_iter()
            .collect(),

        FieldType::Radio => choice_options(doc, container, FieldType::Radio)
            .into_iter()
            .find(|o| o.checked && !o.label.is_empty())
            .map(|o| o.label)
            .into_iter()
            .collect(),

        FieldType::Checkbox => choice_options(doc, container, FieldType::Checkbox)
            .into_iter()
            .filter(|o| o.checked && !o.label.is_empty())
            .map(|o| o.label)
            .collect(),

        FieldType::Dropdown => dropdown_control(doc, container)
            .and_then(|control| dropdown_current_value(doc, control))
            .into_iter()
            .collect(),

        FieldType::Unknown => Vec::new(),
    }
}
