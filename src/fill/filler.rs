use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FillFailure, WidgetError};
use crate::fill::advance::{AdvanceOutcome, advance_to_next_page};
use crate::fill::apply::{apply_checkbox, apply_dropdown, apply_radio, apply_text};
use crate::fill::matcher::{MatchPath, best_field};
use crate::fill::policy::EnginePolicy;
use crate::form::classifier::discover_questions;
use crate::form::form_model::QuestionCandidate;
use crate::page::document::FormDocument;
use crate::template::index::{FieldIndex, IndexedField};
use crate::template::template_model::FieldType;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

// ============================================================================
// Reports
// ============================================================================

/// What happened to one question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionStatus {
    Filled,
    Untitled,
    UnknownType,
    NoMatch,
    /// The matched field has no value to write.
    EmptyValue,
    Failed(WidgetError),
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Filled => "filled",
            QuestionStatus::Untitled => "untitled",
            QuestionStatus::UnknownType => "unknown_type",
            QuestionStatus::NoMatch => "no_match",
            QuestionStatus::EmptyValue => "empty_value",
            QuestionStatus::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionReport {
    pub title: String,
    pub field_type: FieldType,
    pub matched_label: Option<String>,
    pub score: Option<f64>,
    pub path: Option<MatchPath>,
    pub status: QuestionStatus,
}

impl QuestionReport {
    fn skipped<N>(question: &QuestionCandidate<N>, status: QuestionStatus) -> Self {
        Self {
            title: question.title.clone(),
            field_type: question.field_type,
            matched_label: None,
            score: None,
            path: None,
            status,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self.status, QuestionStatus::Untitled | QuestionStatus::UnknownType)
    }
}

/// Full result of one fill pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FillReport {
    pub questions: Vec<QuestionReport>,
    pub failure: Option<FillFailure>,
}

impl FillReport {
    pub fn filled_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.status == QuestionStatus::Filled)
            .count()
    }

    /// Questions with a title and a known type.
    pub fn recognized_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_supported()).count()
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Some questions were filled, but not every recognized one.
    pub fn is_partial(&self) -> bool {
        self.is_ok() && self.filled_count() < self.recognized_count()
    }

    pub fn outcome(&self) -> FillOutcome {
        match &self.failure {
            None => FillOutcome {
                ok: true,
                filled_count: Some(self.filled_count()),
                error: None,
            },
            Some(failure) => FillOutcome {
                ok: false,
                filled_count: None,
                error: Some(failure.to_string()),
            },
        }
    }
}

/// The compact result handed back to a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillOutcome {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Filler
// ============================================================================

/// Matches the questions of a document against a `FieldIndex` and writes the
/// stored answers.
pub struct Filler<'t> {
    policy: EnginePolicy,
    tracer: Option<&'t TraceLogger>,
}

impl Default for Filler<'_> {
    fn default() -> Self {
        Self::new(EnginePolicy::default())
    }
}

impl<'t> Filler<'t> {
    pub fn new(policy: EnginePolicy) -> Self {
        Self { policy, tracer: None }
    }

    pub fn with_tracer(mut self, tracer: &'t TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// One fill pass over the whole document.
    ///
    /// Per-question failures are recorded and skipped; only an empty page or a
    /// pass that filled nothing sets `failure`.
    pub fn fill<D: FormDocument>(&self, doc: &mut D, index: &FieldIndex) -> FillReport {
        let questions = discover_questions(doc, self.policy.matching.title_max_chars);

        if questions.is_empty() {
            info!("no question containers on page");
            return FillReport {
                questions: Vec::new(),
                failure: Some(FillFailure::NoFormDetected),
            };
        }

        let reports: Vec<QuestionReport> = questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let report = self.fill_question(doc, index, question);
                self.trace(i, &report);
                report
            })
            .collect();

        let mut report = FillReport {
            questions: reports,
            failure: None,
        };

        if report.filled_count() == 0 {
            let recognized = report.recognized_count();
            report.failure = Some(if recognized == 0 {
                FillFailure::NoRecognizedFields
            } else {
                FillFailure::NoMatch { recognized }
            });
        }

        info!(
            questions = report.questions.len(),
            recognized = report.recognized_count(),
            filled = report.filled_count(),
            "fill pass complete"
        );
        report
    }

    /// Fill, then try to move the form to its next page when the fill worked.
    pub fn fill_and_advance<D: FormDocument>(
        &self,
        doc: &mut D,
        index: &FieldIndex,
    ) -> (FillReport, Option<AdvanceOutcome>) {
        let report = self.fill(doc, index);
        if !report.is_ok() {
            return (report, None);
        }

        let advance = advance_to_next_page(doc, &self.policy.advance);
        info!(?advance, "auto-advance");
        (report, Some(advance))
    }

    fn fill_question<D: FormDocument>(
        &self,
        doc: &mut D,
        index: &FieldIndex,
        question: &QuestionCandidate<D::Node>,
    ) -> QuestionReport {
        if question.title.is_empty() {
            return QuestionReport::skipped(question, QuestionStatus::Untitled);
        }
        if !question.field_type.is_known() {
            return QuestionReport::skipped(question, QuestionStatus::UnknownType);
        }

        let matched = best_field(&question.title, index.bucket(question.field_type), &self.policy.matching);
        debug!(
            title = %question.title,
            field_type = question.field_type.as_str(),
            score = matched.score,
            path = ?matched.path,
            "best match"
        );

        let mut report = QuestionReport {
            title: question.title.clone(),
            field_type: question.field_type,
            matched_label: matched.field.map(|f| f.label.clone()),
            score: Some(matched.score),
            path: Some(matched.path),
            status: QuestionStatus::NoMatch,
        };

        let Some(field) = matched.field else {
            return report;
        };

        report.status = match self.apply(doc, question, field) {
            Ok(status) => status,
            Err(e) => {
                warn!(title = %question.title, error = %e, "could not fill question");
                QuestionStatus::Failed(e)
            }
        };
        report
    }

    fn apply<D: FormDocument>(
        &self,
        doc: &mut D,
        question: &QuestionCandidate<D::Node>,
        field: &IndexedField,
    ) -> Result<QuestionStatus, WidgetError> {
        let container = question.container;
        let first = field.first_value().filter(|v| !v.is_empty());

        match question.field_type {
            FieldType::Text | FieldType::Paragraph => {
                let Some(value) = first else {
                    return Ok(QuestionStatus::EmptyValue);
                };
                apply_text(doc, container, question.field_type, value)?;
            }
            FieldType::Radio => {
                let Some(value) = first else {
                    return Ok(QuestionStatus::EmptyValue);
                };
                apply_radio(doc, container, value)?;
            }
            FieldType::Checkbox => {
                let effect = apply_checkbox(doc, container, &field.values, self.policy.matching.checkbox_threshold)?;
                debug!(selected = effect.selected, toggled = effect.toggled, "checkbox pass");
                if effect.selected == 0 {
                    return Err(WidgetError::NoMatchingOption(field.values.join(", ")));
                }
            }
            FieldType::Dropdown => {
                let Some(value) = first else {
                    return Ok(QuestionStatus::EmptyValue);
                };
                apply_dropdown(doc, container, value, &self.policy.poll)?;
            }
            FieldType::Unknown => return Ok(QuestionStatus::UnknownType),
        }

        Ok(QuestionStatus::Filled)
    }

    fn trace(&self, question: usize, report: &QuestionReport) {
        let Some(tracer) = self.tracer else {
            return;
        };

        let mut event = TraceEvent::now(question, &report.title, report.field_type)
            .with_status(report.status.as_str());
        if let (Some(score), Some(path)) = (report.score, report.path) {
            event = event.with_match(report.matched_label.as_deref(), score, path);
        }
        if let QuestionStatus::Failed(e) = &report.status {
            event = event.with_detail(e);
        }
        tracer.log(&event);
    }
}

/// Fill `doc` from `index` with the default policy.
pub fn fill_form<D: FormDocument>(doc: &mut D, index: &FieldIndex) -> FillOutcome {
    Filler::default().fill(doc, index).outcome()
}
