use std::path::Path;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PilotError;
use crate::fill::policy::{AdvancePolicy, EnginePolicy, MatchPolicy};
use crate::page::poll::PollPolicy;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-pilot",
    version,
    about = "Capture form answers as templates and fill them back into matching forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-pilot.yaml in current dir).
    /// An explicit path must exist and parse.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Template store file (overrides the config file)
    #[arg(long, global = true)]
    pub store: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read the answers of a page snapshot into a new template
    Capture {
        /// Page snapshot (JSON)
        #[arg(long)]
        page: String,

        /// Template name (default: the form title)
        #[arg(long)]
        name: Option<String>,

        /// Source URL to record (default: the snapshot's url)
        #[arg(long)]
        source_url: Option<String>,
    },

    /// Fill a page snapshot from stored templates
    Fill {
        /// Page snapshot (JSON)
        #[arg(long)]
        page: String,

        /// Only use these template ids (repeatable; default: all)
        #[arg(long = "template")]
        templates: Vec<String>,

        /// Write the filled page snapshot here
        #[arg(short, long)]
        output: Option<String>,

        /// Click the most likely "next" button after a successful fill
        #[arg(long)]
        auto_next: bool,

        /// Append per-question decisions to this JSONL file
        #[arg(long)]
        trace: Option<String>,
    },

    /// List stored templates
    List,

    /// Delete a stored template
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Print the similarity breakdown of two strings
    Score {
        a: String,
        b: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-pilot.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub matching: MatchPolicy,
    #[serde(default)]
    pub poll: PollPolicy,
    #[serde(default)]
    pub advance: AdvancePolicy,
}

impl AppConfig {
    pub fn engine_policy(&self) -> EnginePolicy {
        EnginePolicy {
            matching: self.matching.clone(),
            poll: self.poll,
            advance: self.advance.clone(),
        }
    }

    /// Store path: CLI flag first, then the config file.
    pub fn store_path<'a>(&'a self, cli_store: Option<&'a str>) -> &'a str {
        cli_store.unwrap_or(&self.store.path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String { DEFAULT_STORE_PATH.to_string() }

pub const DEFAULT_CONFIG_PATH: &str = "form-pilot.yaml";
pub const DEFAULT_STORE_PATH: &str = "form-pilot-templates.json";

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    if !Path::new(config_path).exists() {
        return AppConfig::default();
    }

    load_config_file(config_path).unwrap_or_else(|e| {
        warn!(path = config_path, error = %e, "unusable config; using defaults");
        AppConfig::default()
    })
}

/// Strict variant for a config file the user named explicitly.
pub fn load_config_file(path: &str) -> Result<AppConfig, PilotError> {
    let content = std::fs::read_to_string(path).map_err(|e| PilotError::io(path, e))?;
    serde_yaml::from_str(&content).map_err(|e| PilotError::yaml(format!("config {}", path), e))
}
