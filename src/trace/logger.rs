use std::cell::{Cell, RefCell};
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;

use tracing::warn;

use crate::trace::trace::TraceEvent;

/// JSONL sink for per-question fill decisions.
///
/// A trace that cannot be opened or written only warns; a fill never fails
/// because of its trace.
pub struct TraceLogger {
    sink: Option<RefCell<LineWriter<File>>>,
    lines: Cell<usize>,
}

impl TraceLogger {
    /// Append to `path`, creating it if needed.
    pub fn new(path: &Path) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Some(RefCell::new(LineWriter::new(file))),
                lines: Cell::new(0),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open trace file");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            sink: None,
            lines: Cell::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Lines this logger has written so far.
    pub fn lines_written(&self) -> usize {
        self.lines.get()
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        match append_line(&mut *sink.borrow_mut(), event) {
            Ok(()) => self.lines.set(self.lines.get() + 1),
            Err(e) => warn!(question = event.question, error = %e, "could not write trace line"),
        }
    }
}

fn append_line<W: Write>(out: &mut W, event: &TraceEvent) -> io::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    out.write_all(b"\n")
}
