use std::sync::{Arc, Mutex};

use solflare_adapter_core::{AdapterError, AdapterEvent, AdapterEventKind};

/// Ordered record of lifecycle events for the host framework to drain.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Arc<Mutex<EventLogState>>,
}

#[derive(Debug, Default)]
struct EventLogState {
    sequence: u64,
    events: Vec<AdapterEvent>,
}

impl EventLog {
    pub fn record(&self, kind: AdapterEventKind) {
        match &kind {
            AdapterEventKind::Errored { error } => tracing::warn!("adapter errored: {error}"),
            other => tracing::info!(event = ?other, "adapter event"),
        }
        // A poisoned log only loses events; lifecycle state is unaffected.
        if let Ok(mut g) = self.inner.lock() {
            g.sequence = g.sequence.saturating_add(1);
            let sequence = g.sequence;
            g.events.push(AdapterEvent { sequence, kind });
        }
    }

    pub fn errored(&self, error: AdapterError) {
        self.record(AdapterEventKind::Errored { error });
    }

    pub fn drain(&self) -> Result<Vec<AdapterEvent>, AdapterError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| AdapterError::poisoned("event log", e))?;
        Ok(std::mem::take(&mut g.events))
    }
}
