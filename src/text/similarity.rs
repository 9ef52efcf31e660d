use serde::Serialize;

use crate::text::normalize::{normalize, tokenize};

pub const JACCARD_WEIGHT: f64 = 0.5;
pub const LCS_WEIGHT: f64 = 0.3;
pub const CONTAINMENT_WEIGHT: f64 = 0.2;

/// Minimum character length for a token to take part in `word_overlap`.
pub const OVERLAP_MIN_TOKEN_CHARS: usize = 3;

/// The three sub-metrics behind a `similarity` score, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub jaccard: f64,
    pub lcs_ratio: f64,
    pub contains_ratio: f64,
    pub score: f64,
}

/// Weighted text similarity in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    breakdown(a, b).score
}

pub fn breakdown(a: &str, b: &str) -> SimilarityBreakdown {
    let a = normalize(a);
    let b = normalize(b);

    let jaccard = jaccard_normalized(&a, &b);
    let lcs_ratio = lcs_ratio_normalized(&a, &b);
    let contains_ratio = contains_ratio_normalized(&a, &b);

    let score = JACCARD_WEIGHT * jaccard + LCS_WEIGHT * lcs_ratio + CONTAINMENT_WEIGHT * contains_ratio;

    SimilarityBreakdown {
        jaccard,
        lcs_ratio,
        contains_ratio,
        score: score.clamp(0.0, 1.0),
    }
}

/// Token-set Jaccard index; 0 when both sides have no tokens.
pub fn jaccard(a: &str, b: &str) -> f64 {
    jaccard_normalized(&normalize(a), &normalize(b))
}

/// Longest-common-subsequence length over the longer normalized length.
pub fn lcs_ratio(a: &str, b: &str) -> f64 {
    lcs_ratio_normalized(&normalize(a), &normalize(b))
}

/// Shorter/longer length ratio when the shorter normalized string occurs
/// literally inside the longer one, otherwise 0.
pub fn contains_ratio(a: &str, b: &str) -> f64 {
    contains_ratio_normalized(&normalize(a), &normalize(b))
}

/// Fallback lexical score for weak matches.
///
/// Tokens of at least `OVERLAP_MIN_TOKEN_CHARS` characters are compared
/// pairwise; a token of `a` counts once if any token of `b` contains it or is
/// contained by it. The count is divided by the larger token count.
pub fn word_overlap(a: &str, b: &str) -> f64 {
    let left = significant_tokens(a);
    let right = significant_tokens(b);

    let denominator = left.len().max(right.len());
    if denominator == 0 {
        return 0.0;
    }

    let matches = left
        .iter()
        .filter(|l| right.iter().any(|r| l.contains(r.as_str()) || r.contains(l.as_str())))
        .count();

    matches as f64 / denominator as f64
}

// ============================================================================
// Sub-metrics over already-normalized text
// ============================================================================

fn jaccard_normalized(a: &str, b: &str) -> f64 {
    let left = tokenize(a);
    let right = tokenize(b);

    let intersection = left.intersection(&right).count();
    let union = left.len() + right.len() - intersection;

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn lcs_ratio_normalized(a: &str, b: &str) -> f64 {
    let left: Vec<char> = a.chars().collect();
    let right: Vec<char> = b.chars().collect();

    let (n, m) = (left.len(), right.len());
    if n == 0 || m == 0 {
        return 0.0;
    }

    lcs_len(&left, &right) as f64 / n.max(m) as f64
}

/// Longest-common-subsequence length, keeping only two DP rows.
fn lcs_len(left: &[char], right: &[char]) -> usize {
    // prev[j] / curr[j] = LCS length of left[..i-1] / left[..i] and right[..j]
    let mut prev = vec![0usize; right.len() + 1];
    let mut curr = vec![0usize; right.len() + 1];

    for l in left {
        for (j, r) in right.iter().enumerate() {
            curr[j + 1] = if l == r {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[right.len()]
}

fn contains_ratio_normalized(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let (longer, longer_len, shorter, shorter_len) = if a_len >= b_len {
        (a, a_len, b, b_len)
    } else {
        (b, b_len, a, a_len)
    };

    if longer.contains(shorter) {
        shorter_len as f64 / longer_len as f64
    } else {
        0.0
    }
}

fn significant_tokens(raw: &str) -> Vec<String> {
    tokenize(raw)
        .into_iter()
        .filter(|t| t.chars().count() >= OVERLAP_MIN_TOKEN_CHARS)
        .collect()
}
