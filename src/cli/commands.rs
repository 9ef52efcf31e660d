use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::PilotError;
use crate::fill::advance::AdvanceOutcome;
use crate::fill::filler::{FillOutcome, Filler};
use crate::fill::policy::EnginePolicy;
use crate::form::capture::capture_form_with;
use crate::page::document::FormDocument;
use crate::page::dom::DomTree;
use crate::template::index::build_index;
use crate::template::store::{JsonFileStore, TemplateDb, TemplateStore};
use crate::template::template_model::TemplateEntry;
use crate::text::similarity::breakdown;
use crate::trace::logger::TraceLogger;

// ============================================================================
// capture subcommand
// ============================================================================

/// Capture the answers on a page snapshot and append them as a new template.
pub fn cmd_capture(
    page: &str,
    name: Option<&str>,
    source_url: Option<&str>,
    store_path: &str,
    policy: &EnginePolicy,
) -> Result<TemplateEntry, Box<dyn std::error::Error>> {
    let doc = load_page(page)?;
    let capture = capture_form_with(&doc, policy.matching.title_max_chars);

    let url = source_url.map(str::to_string).unwrap_or_else(|| doc.url());
    let entry = TemplateEntry::from_capture(name, capture, &url, Utc::now().timestamp_millis());

    let mut store = JsonFileStore::new(store_path);
    store.append_entry(entry.clone())?;

    info!(id = %entry.id, fields = entry.fields.len(), "captured template");
    println!("Captured '{}' ({} fields) as {}", entry.name, entry.fields.len(), entry.id);
    Ok(entry)
}

// ============================================================================
// fill subcommand
// ============================================================================

/// Options of one `fill` run.
#[derive(Debug, Clone, Default)]
pub struct FillArgs<'a> {
    pub page: &'a str,
    pub templates: &'a [String],
    pub output: Option<&'a str>,
    pub auto_next: bool,
    pub trace: Option<&'a str>,
}

/// Fill a page snapshot from the store and print the outcome JSON.
pub fn cmd_fill(
    args: &FillArgs<'_>,
    store_path: &str,
    policy: &EnginePolicy,
) -> Result<FillOutcome, Box<dyn std::error::Error>> {
    let mut doc = load_page(args.page)?;

    let db = JsonFileStore::new(store_path).snapshot()?;
    let entries = select_entries(&db, args.templates)?;
    let index = build_index(entries);

    let tracer = match args.trace {
        Some(path) => TraceLogger::new(Path::new(path)),
        None => TraceLogger::disabled(),
    };
    let filler = Filler::new(policy.clone()).with_tracer(&tracer);

    let report = if args.auto_next {
        let (report, advance) = filler.fill_and_advance(&mut doc, &index);
        match &advance {
            Some(AdvanceOutcome::Clicked { label, score }) => {
                eprintln!("Clicked next button '{}' (score {})", label, score)
            }
            Some(AdvanceOutcome::SubmitScreen) => eprintln!("Submit screen reached; not advancing"),
            Some(AdvanceOutcome::NoButton) => eprintln!("No next button found"),
            None => {}
        }
        report
    } else {
        filler.fill(&mut doc, &index)
    };

    for question in &report.questions {
        debug!(
            title = %question.title,
            status = question.status.as_str(),
            matched = question.matched_label.as_deref().unwrap_or(""),
            "question result"
        );
    }

    if let Some(path) = args.trace.filter(|_| tracer.is_enabled()) {
        info!(path, lines = tracer.lines_written(), "fill trace written");
    }

    let outcome = report.outcome();
    println!("{}", serde_json::to_string(&outcome)?);

    if let Some(path) = args.output {
        std::fs::write(path, doc.to_json()?).map_err(|e| PilotError::io(path, e))?;
    }

    Ok(outcome)
}

// ============================================================================
// list / delete subcommands
// ============================================================================

pub fn cmd_list(store_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = JsonFileStore::new(store_path).snapshot()?;

    if db.entries.is_empty() {
        println!("No templates in {}", store_path);
        return Ok(());
    }

    for entry in &db.entries {
        let created = DateTime::<Utc>::from_timestamp_millis(entry.created_at)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{}  {}  {} fields  {}  {}",
            entry.id,
            created,
            entry.fields.len(),
            entry.name,
            entry.source_url
        );
    }
    Ok(())
}

pub fn cmd_delete(store_path: &str, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = JsonFileStore::new(store_path);
    if !store.delete_entry(id)? {
        return Err(PilotError::TemplateNotFound(id.to_string()).into());
    }
    println!("Deleted {}", id);
    Ok(())
}

// ============================================================================
// score subcommand
// ============================================================================

pub fn cmd_score(a: &str, b: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parts = breakdown(a, b);
    println!("jaccard:     {:.4}", parts.jaccard);
    println!("lcs ratio:   {:.4}", parts.lcs_ratio);
    println!("containment: {:.4}", parts.contains_ratio);
    println!("score:       {:.4}", parts.score);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

pub fn load_page(path: &str) -> Result<DomTree, PilotError> {
    DomTree::load(Path::new(path))
}

/// The entries named by `ids`, or every entry when `ids` is empty.
pub fn select_entries<'a>(db: &'a TemplateDb, ids: &[String]) -> Result<Vec<&'a TemplateEntry>, PilotError> {
    if ids.is_empty() {
        return Ok(db.entries.iter().collect());
    }

    ids.iter()
        .map(|id| db.find(id).ok_or_else(|| PilotError::TemplateNotFound(id.clone())))
        .collect()
}
