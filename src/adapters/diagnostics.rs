use crate::domain::ports::{DiagnosticEvent, Diagnostics};
use std::sync::{Mutex, MutexGuard};

/// 將警告轉交 tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, event: DiagnosticEvent, context: &str) {
        tracing::warn!(event = event.as_ref(), "⚠️ {}", context);
    }
}

/// 在記憶體中記錄所有警告，供測試與批次報告檢查
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    events: Mutex<Vec<(DiagnosticEvent, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<(DiagnosticEvent, String)>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<(DiagnosticEvent, String)> {
        self.guard().clone()
    }

    pub fn count(&self, event: DiagnosticEvent) -> usize {
        self.guard().iter().filter(|(e, _)| *e == event).count()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn warn(&self, event: DiagnosticEvent, context: &str) {
        self.guard().push((event, context.to_string()));
    }
}
