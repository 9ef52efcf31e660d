use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::page::document::FormDocument;

/// Fixed-interval polling with a total time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_interval_ms() -> u64 { 50 }
fn default_timeout_ms() -> u64 { 2000 }

/// Run `check` until it yields a value or the timeout budget is spent.
///
/// The document's own `pause` provides the wait between attempts, so a
/// synthetic document can advance a virtual clock instead of sleeping.
pub fn poll_until<D, T, F>(doc: &mut D, policy: &PollPolicy, mut check: F) -> Option<T>
where
    D: FormDocument,
    F: FnMut(&D) -> Option<T>,
{
    let interval = policy.interval_ms.max(1);
    let mut waited = 0u64;

    loop {
        if let Some(found) = check(&*doc) {
            return Some(found);
        }
        if waited >= policy.timeout_ms {
            return None;
        }

        let step = interval.min(policy.timeout_ms - waited);
        doc.pause(Duration::from_millis(step));
        waited += step;
    }
}

/// Give the host page a fixed delay to react (validation, re-render).
pub fn settle<D: FormDocument>(doc: &mut D, delay_ms: u64) {
    if delay_ms > 0 {
        doc.pause(Duration::from_millis(delay_ms));
    }
}
