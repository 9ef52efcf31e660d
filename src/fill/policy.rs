use serde::{Deserialize, Serialize};

use crate::form::classifier::DEFAULT_TITLE_MAX_CHARS;
use crate::page::poll::PollPolicy;

// ============================================================================
// Matching thresholds
// ============================================================================

/// Thresholds that decide whether a question matches a stored field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Minimum similarity for a question/field match.
    #[serde(default = "default_primary_threshold")]
    pub primary_threshold: f64,

    /// Try the word-overlap score when the best similarity is weak.
    #[serde(default = "default_true")]
    pub fallback_enabled: bool,

    /// A word-overlap score must exceed this to be accepted.
    #[serde(default = "default_fallback_threshold")]
    pub fallback_threshold: f64,

    /// Minimum similarity for a checkbox option to end up checked.
    #[serde(default = "default_checkbox_threshold")]
    pub checkbox_threshold: f64,

    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            primary_threshold: default_primary_threshold(),
            fallback_enabled: true,
            fallback_threshold: default_fallback_threshold(),
            checkbox_threshold: default_checkbox_threshold(),
            title_max_chars: default_title_max_chars(),
        }
    }
}

fn default_primary_threshold() -> f64 { 0.2 }
fn default_fallback_threshold() -> f64 { 0.3 }
fn default_checkbox_threshold() -> f64 { 0.2 }
fn default_title_max_chars() -> usize { DEFAULT_TITLE_MAX_CHARS }
fn default_true() -> bool { true }

// ============================================================================
// Auto-advance keyword tables
// ============================================================================

/// Data that drives the "click next page" heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancePolicy {
    /// Delay after filling, before looking at the page.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Delay between the submit-screen check and the button scan.
    #[serde(default = "default_scan_delay_ms")]
    pub scan_delay_ms: u64,

    #[serde(default = "default_next_keywords")]
    pub next_keywords: Vec<String>,

    #[serde(default = "default_back_keywords")]
    pub back_keywords: Vec<String>,

    #[serde(default = "default_submit_keywords")]
    pub submit_keywords: Vec<String>,

    /// Page-title fragments that mark a review/submit screen.
    #[serde(default = "default_submit_screen_indicators")]
    pub submit_screen_indicators: Vec<String>,

    /// Button-text fragments that mark the final submit button.
    #[serde(default = "default_submit_button_words")]
    pub submit_button_words: Vec<String>,

    /// class/id fragments that hint at a next button.
    #[serde(default = "default_next_hints")]
    pub next_hints: Vec<String>,
}

impl Default for AdvancePolicy {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            scan_delay_ms: default_scan_delay_ms(),
            next_keywords: default_next_keywords(),
            back_keywords: default_back_keywords(),
            submit_keywords: default_submit_keywords(),
            submit_screen_indicators: default_submit_screen_indicators(),
            submit_button_words: default_submit_button_words(),
            next_hints: default_next_hints(),
        }
    }
}

fn default_settle_ms() -> u64 { 1500 }
fn default_scan_delay_ms() -> u64 { 1000 }

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_next_keywords() -> Vec<String> {
    owned(&[
        // en
        "next", "continue", "proceed", "forward", "advance", "go", "next page", "continue to",
        "next step", "continue to next",
        // zh
        "下一步", "繼續", "繼續進行", "前進", "進行", "前往", "下一頁", "繼續到", "下一步驟", "繼續下一步",
        // es
        "siguiente", "continuar", "proceder", "avanzar", "página siguiente", "siguiente paso",
        // fr
        "suivant", "continuer", "procéder", "avancer", "page suivante", "étape suivante",
        // ja
        "次へ", "続行", "進む", "次に", "次のページ", "次のステップ",
        // ko
        "다음", "계속", "진행", "다음으로", "다음 페이지", "다음 단계",
    ])
}

fn default_back_keywords() -> Vec<String> {
    owned(&[
        "back", "return", "previous", "go back", "back to", "return to",
        "返回", "回到", "上一步", "返回上一步", "回到上一步",
        "volver", "regresar", "anterior", "volver a", "regresar a",
        "retour", "retourner", "précédent", "retour à", "retourner à",
        "戻る", "前へ", "戻り", "前のページ", "戻るページ",
        "돌아가기", "이전", "뒤로", "이전 페이지", "돌아가기 페이지",
    ])
}

fn default_submit_keywords() -> Vec<String> {
    owned(&[
        "submit form", "final submit", "send form", "submit your response", "submit response",
        "提交表單", "最終提交", "發送表單", "提交您的回應", "提交回應", "提交",
        "enviar formulario", "enviar respuesta final", "enviar respuesta",
        "envoyer formulaire", "envoyer réponse finale", "envoyer réponse",
        "フォーム送信", "最終送信", "回答を送信", "送信",
        "폼 제출", "최종 제출", "응답 제출", "제출",
    ])
}

fn default_submit_screen_indicators() -> Vec<String> {
    owned(&[
        "submit form", "final submit", "send form", "submit your response",
        "提交表單", "最終提交", "發送表單", "提交您的回應",
        "enviar formulario", "enviar respuesta final",
        "envoyer formulaire", "envoyer réponse finale",
        "フォーム送信", "最終送信", "回答を送信",
        "폼 제출", "최종 제출", "응답 제출",
        "review", "confirmation", "summary", "final", "submit",
        "檢閱", "確認", "摘要", "最終", "提交",
        "revisar", "confirmación", "resumen", "enviar",
        "réviser", "résumé", "envoyer",
        "要約", "送信",
        "검토", "확인", "요약", "최종", "제출",
    ])
}

fn default_submit_button_words() -> Vec<String> {
    owned(&[
        "submit", "send", "finish",
        "送出", "提交", "完成",
        "enviar", "finalizar", "completar",
        "envoyer", "terminer", "compléter",
        "送信", "完了", "終了",
        "제출", "완료", "마침",
    ])
}

fn default_next_hints() -> Vec<String> {
    owned(&["next", "continue", "proceed"])
}

// ============================================================================
// Engine policy
// ============================================================================

/// Everything the engine can be tuned with, in one place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnginePolicy {
    #[serde(default)]
    pub matching: MatchPolicy,
    #[serde(default)]
    pub poll: PollPolicy,
    #[serde(default)]
    pub advance: AdvancePolicy,
}
