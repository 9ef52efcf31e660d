use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PilotError;
use crate::template::template_model::TemplateEntry;

/// Persisted collection of templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDb {
    #[serde(default)]
    pub entries: Vec<TemplateEntry>,
}

impl TemplateDb {
    pub fn find(&self, id: &str) -> Option<&TemplateEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

/// Explicit storage seam for host command handlers. The matching engine never
/// touches a store; it only consumes the snapshot.
pub trait TemplateStore {
    fn snapshot(&self) -> Result<TemplateDb, PilotError>;

    fn append_entry(&mut self, entry: TemplateEntry) -> Result<(), PilotError>;

    /// Replace the entry with the same id. Returns false if there is none.
    fn update_entry(&mut self, entry: TemplateEntry) -> Result<bool, PilotError>;

    /// Returns false if no entry had this id.
    fn delete_entry(&mut self, id: &str) -> Result<bool, PilotError>;
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    db: TemplateDb,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<TemplateEntry>) -> Self {
        Self {
            db: TemplateDb { entries },
        }
    }
}

impl TemplateStore for MemoryStore {
    fn snapshot(&self) -> Result<TemplateDb, PilotError> {
        Ok(self.db.clone())
    }

    fn append_entry(&mut self, entry: TemplateEntry) -> Result<(), PilotError> {
        self.db.entries.push(entry);
        Ok(())
    }

    fn update_entry(&mut self, entry: TemplateEntry) -> Result<bool, PilotError> {
        Ok(replace_entry(&mut self.db, entry))
    }

    fn delete_entry(&mut self, id: &str) -> Result<bool, PilotError> {
        Ok(remove_entry(&mut self.db, id))
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// Templates kept in a single JSON file shaped `{"entries": [...]}`.
/// A missing file reads as an empty collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, db: &TemplateDb) -> Result<(), PilotError> {
        let json = serde_json::to_string_pretty(db)
            .map_err(|e| PilotError::json("serialize template store", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PilotError::io(parent, e))?;
        }

        std::fs::write(&self.path, json).map_err(|e| PilotError::io(&self.path, e))?;
        debug!(path = %self.path.display(), entries = db.entries.len(), "wrote template store");
        Ok(())
    }
}

impl TemplateStore for JsonFileStore {
    fn snapshot(&self) -> Result<TemplateDb, PilotError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TemplateDb::default()),
            Err(e) => return Err(PilotError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(TemplateDb::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| PilotError::json(format!("template store {}", self.path.display()), e))
    }

    fn append_entry(&mut self, entry: TemplateEntry) -> Result<(), PilotError> {
        let mut db = self.snapshot()?;
        db.entries.push(entry);
        self.write(&db)
    }

    fn update_entry(&mut self, entry: TemplateEntry) -> Result<bool, PilotError> {
        let mut db = self.snapshot()?;
        let replaced = replace_entry(&mut db, entry);
        if replaced {
            self.write(&db)?;
        }
        Ok(replaced)
    }

    fn delete_entry(&mut self, id: &str) -> Result<bool, PilotError> {
        let mut db = self.snapshot()?;
        let removed = remove_entry(&mut db, id);
        if removed {
            self.write(&db)?;
        }
        Ok(removed)
    }
}

fn replace_entry(db: &mut TemplateDb, entry: TemplateEntry) -> bool {
    match db.entries.iter_mut().find(|e| e.id == entry.id) {
        Some(slot) => {
            *slot = entry;
            true
        }
        None => false,
    }
}

fn remove_entry(db: &mut TemplateDb, id: &str) -> bool {
    let before = db.entries.len();
    db.entries.retain(|e| e.id != id);
    db.entries.len() != before
}
