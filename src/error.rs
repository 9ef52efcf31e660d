use std::path::PathBuf;

use thiserror::Error;

/// Host-side failures: files, parsing, template lookup.
#[derive(Debug, Error)]
pub enum PilotError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("YAML error ({context}): {source}")]
    Yaml {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no template with id '{0}'")]
    TemplateNotFound(String),

    #[error("invalid page snapshot: {0}")]
    InvalidPage(String),
}

impl PilotError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PilotError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn yaml(context: impl Into<String>, source: serde_yaml::Error) -> Self {
        PilotError::Yaml {
            context: context.into(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        PilotError::Json {
            context: context.into(),
            source,
        }
    }
}

/// A single widget could not be driven. Recovered per question; never aborts
/// the rest of the form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WidgetError {
    #[error("no {0} control inside the question")]
    MissingControl(&'static str),

    #[error("question has no selectable options")]
    NoOptions,

    #[error("option popup did not appear within {waited_ms} ms")]
    PopupTimeout { waited_ms: u64 },

    #[error("no option resembles '{0}'")]
    NoMatchingOption(String),

    #[error("interaction failed: {0}")]
    Interaction(String),
}

/// Why a whole fill produced nothing. Each variant carries its own copy
/// because the remedy differs (unsupported page vs. wrong template).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FillFailure {
    #[error("No supported form detected on this page")]
    NoFormDetected,

    #[error("This form has no recognizable fields; check that it is a supported form type")]
    NoRecognizedFields,

    #[error("Found {recognized} fields but none matched the template data; check that the template fits this form")]
    NoMatch { recognized: usize },
}
