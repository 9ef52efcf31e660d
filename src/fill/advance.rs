use tracing::{debug, info, warn};

use crate::fill::policy::AdvancePolicy;
use crate::page::document::FormDocument;
use crate::page::poll::settle;

// ============================================================================
// Button scoring
// ============================================================================

const EXACT_NEXT: i32 = 20;
const PARTIAL_NEXT: i32 = 10;
const EXACT_SUBMIT: i32 = -25;
const PARTIAL_SUBMIT: i32 = -15;
const EXACT_BACK: i32 = -20;
const PARTIAL_BACK: i32 = -10;
const HINT_BONUS: i32 = 8;
const NON_SUBMIT_BONUS: i32 = 5;
const ICON_BONUS: i32 = 3;
const INVISIBLE_SCORE: i32 = -100;
const DISABLED_SCORE: i32 = -50;

const ICON_CLASS_HINTS: [&str; 3] = ["arrow", "chevron", "right"];

/// Result of one auto-advance attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// The page looks like the final review/submit step; nothing was clicked.
    SubmitScreen,
    Clicked { label: String, score: i32 },
    NoButton,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonCandidate<N> {
    pub node: N,
    /// Lower-cased, trimmed button text.
    pub label: String,
    pub score: i32,
}

fn is_button<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    match doc.tag(node).as_str() {
        "button" => true,
        "input" => matches!(doc.input_type(node).as_deref(), Some("button") | Some("submit")),
        _ => doc.has_role(node, "button"),
    }
}

/// Text a user would read on the button.
fn button_text<D: FormDocument>(doc: &D, node: D::Node) -> String {
    let text = doc.text_content(node).trim().to_string();
    let text = if !text.is_empty() {
        text
    } else if let Some(value) = doc.attribute(node, "value").filter(|v| !v.trim().is_empty()) {
        value
    } else {
        doc.attribute(node, "aria-label").unwrap_or_default()
    };
    text.trim().to_lowercase()
}

/// `<button>` without a type submits its form.
fn is_submit_type<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    match doc.tag(node).as_str() {
        "button" => doc
            .attribute(node, "type")
            .map(|t| t.trim().eq_ignore_ascii_case("submit"))
            .unwrap_or(true),
        "input" => doc.input_type(node).as_deref() == Some("submit"),
        _ => false,
    }
}

fn has_icon<D: FormDocument>(doc: &D, node: D::Node) -> bool {
    doc.query_first(node, |d, n| match d.tag(n).as_str() {
        "svg" | "i" => true,
        "span" => d
            .attribute(n, "class")
            .is_some_and(|c| ICON_CLASS_HINTS.iter().any(|h| c.contains(h))),
        _ => false,
    })
    .is_some()
}

fn keyword_score(text: &str, keywords: &[String], exact: i32, partial: i32) -> i32 {
    keywords
        .iter()
        .map(|k| k.to_lowercase())
        .map(|k| {
            if text == k {
                exact
            } else if text.contains(&k) {
                partial
            } else {
                0
            }
        })
        .sum()
}

fn score_button<D: FormDocument>(doc: &D, node: D::Node, policy: &AdvancePolicy) -> i32 {
    let text = button_text(doc, node);

    let mut score = keyword_score(&text, &policy.next_keywords, EXACT_NEXT, PARTIAL_NEXT)
        + keyword_score(&text, &policy.submit_keywords, EXACT_SUBMIT, PARTIAL_SUBMIT)
        + keyword_score(&text, &policy.back_keywords, EXACT_BACK, PARTIAL_BACK);

    for attr in ["class", "id"] {
        let value = doc.attribute(node, attr).unwrap_or_default();
        if policy.next_hints.iter().any(|h| value.contains(h.as_str())) {
            score += HINT_BONUS;
        }
    }

    if !is_submit_type(doc, node) {
        score += NON_SUBMIT_BONUS;
    }
    if has_icon(doc, node) {
        score += ICON_BONUS;
    }

    if !doc.is_visible(node) {
        score = INVISIBLE_SCORE;
    }
    if doc.is_disabled(node) {
        score = DISABLED_SCORE;
    }
    score
}

/// Every button on the page with its next-button score, in document order.
pub fn score_buttons<D: FormDocument>(doc: &D, policy: &AdvancePolicy) -> Vec<ButtonCandidate<D::Node>> {
    doc.query_all(doc.root(), is_button::<D>)
        .into_iter()
        .map(|node| ButtonCandidate {
            node,
            label: button_text(doc, node),
            score: score_button(doc, node, policy),
        })
        .collect()
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| text.contains(&k.to_lowercase()))
}

/// Some button carries a final-submit keyword.
fn has_submit_buttons<D: FormDocument>(doc: &D, policy: &AdvancePolicy) -> bool {
    doc.query_all(doc.root(), is_button::<D>)
        .into_iter()
        .any(|node| contains_any(&button_text(doc, node), &policy.submit_keywords))
}

// ============================================================================
// Submit-screen detection
// ============================================================================

/// The page title names a review/submit step, or some button reads like a
/// final submit.
pub fn is_submit_screen<D: FormDocument>(doc: &D, policy: &AdvancePolicy) -> bool {
    let title = doc.title().to_lowercase();
    if let Some(hit) = policy
        .submit_screen_indicators
        .iter()
        .find(|i| title.contains(&i.to_lowercase()))
    {
        debug!(indicator = %hit, "submit indicator in page title");
        return true;
    }

    doc.query_all(doc.root(), is_button::<D>)
        .into_iter()
        .any(|node| contains_any(&button_text(doc, node), &policy.submit_button_words))
}

// ============================================================================
// Advance
// ============================================================================

/// Wait for the page to settle, then click the most next-like button unless
/// the form is on its final step.
pub fn advance_to_next_page<D: FormDocument>(doc: &mut D, policy: &AdvancePolicy) -> AdvanceOutcome {
    settle(doc, policy.settle_ms);

    if is_submit_screen(doc, policy) {
        info!("submit screen detected; not advancing");
        return AdvanceOutcome::SubmitScreen;
    }

    settle(doc, policy.scan_delay_ms);

    let mut candidates: Vec<_> = score_buttons(doc, policy)
        .into_iter()
        .filter(|c| c.score > 0)
        .collect();
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    debug!(candidates = candidates.len(), "next-button candidates");

    let submit_present = has_submit_buttons(doc, policy);

    for candidate in candidates {
        if submit_present && contains_any(&candidate.label, &policy.back_keywords) {
            debug!(label = %candidate.label, "skipping back button next to a submit button");
            continue;
        }
        match doc.click(candidate.node) {
            Ok(()) => {
                info!(label = %candidate.label, score = candidate.score, "clicked next button");
                return AdvanceOutcome::Clicked {
                    label: candidate.label,
                    score: candidate.score,
                };
            }
            Err(e) => warn!(label = %candidate.label, error = %e, "next button click failed"),
        }
    }

    AdvanceOutcome::NoButton
}
