//! Non-fatal script and engine diagnostics
//!
//! Anything a script does wrong that the engine absorbs (calling an unbound
//! function, jumping into no area) is reported here rather than raised.

use parking_lot::Mutex;

/// Receiver for non-fatal warnings
pub trait DiagnosticSink: Send + Sync {
    fn warning(&self, message: &str);
}

/// Default sink: forwards everything to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn warning(&self, message: &str) {
        tracing::warn!(target: "aurora::diagnostics", "{}", message);
    }
}

/// Sink that keeps every message it receives, in order
#[derive(Debug, Default)]
pub struct RecordedDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl RecordedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl DiagnosticSink for RecordedDiagnostics {
    fn warning(&self, message: &str) {
        tracing::warn!(target: "aurora::diagnostics", "{}", message);
        self.messages.lock().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_diagnostics_keep_order() {
        let sink = RecordedDiagnostics::new();
        assert!(sink.is_empty());

        sink.warning("first");
        sink.warning("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);

        sink.clear();
        assert_eq!(sink.len(), 0);
    }
}
