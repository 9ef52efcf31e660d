use serde::Serialize;

use crate::fill::policy::MatchPolicy;
use crate::template::index::IndexedField;
use crate::text::normalize::normalize;
use crate::text::similarity::{similarity, word_overlap};

/// Which score produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPath {
    Similarity,
    WordOverlap,
}

/// Outcome of matching one question title against a bucket.
///
/// `field` is set only when the match clears the policy; `score` is the best
/// score seen either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub field: Option<&'a IndexedField>,
    pub score: f64,
    pub path: MatchPath,
}

impl MatchResult<'_> {
    pub fn is_match(&self) -> bool {
        self.field.is_some()
    }
}

/// Pick the stored field that best answers `title`.
///
/// Strict maximum of `similarity`, so the earliest entry wins ties. When the
/// best is under the primary threshold, a word-overlap score above the
/// fallback threshold that also beats the best replaces it.
pub fn best_field<'a>(title: &str, bucket: &'a [IndexedField], policy: &MatchPolicy) -> MatchResult<'a> {
    let title = normalize(title);

    let mut best: Option<&IndexedField> = None;
    let mut best_score = 0.0;
    let mut path = MatchPath::Similarity;

    for candidate in bucket {
        let score = similarity(&title, &candidate.normalized_label);
        if score > best_score {
            best = Some(candidate);
            best_score = score;
        }
    }

    if policy.fallback_enabled && (best.is_none() || best_score < policy.primary_threshold) {
        for candidate in bucket {
            let score = word_overlap(&title, &candidate.normalized_label);
            if score > policy.fallback_threshold && score > best_score {
                best = Some(candidate);
                best_score = score;
                path = MatchPath::WordOverlap;
            }
        }
    }

    let accepted = best.filter(|_| best_score >= policy.primary_threshold);

    MatchResult {
        field: accepted,
        score: best_score,
        path,
    }
}

/// Index and score of the label that best resembles `desired`.
///
/// Only strictly positive scores count; the first label wins ties.
pub fn best_option<S: AsRef<str>>(desired: &str, labels: &[S]) -> Option<(usize, f64)> {
    let desired = normalize(desired);

    let mut best: Option<(usize, f64)> = None;
    for (i, label) in labels.iter().enumerate() {
        let score = similarity(&desired, label.as_ref());
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((i, score));
        }
    }
    best
}

/// Highest similarity between `label` and any of the desired values.
pub fn best_score_against<S: AsRef<str>>(label: &str, desired: &[S]) -> f64 {
    desired
        .iter()
        .map(|d| similarity(d.as_ref(), label))
        .fold(0.0, f64::max)
}
