//! Refresh event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::RefreshEvent;

/// Trait for receiving refresh events.
///
/// The refresh service emits events through this trait as a cycle runs.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no DB writes)
/// - Implementations should queue events for async processing
/// - Failure to emit must not affect the refresh cycle (best-effort)
pub trait RefreshEventSink: Send + Sync {
    /// Emit a single refresh event.
    fn emit(&self, event: RefreshEvent);

    /// Emit multiple refresh events.
    ///
    /// Default implementation calls `emit()` for each event.
    /// Implementations may override for batch optimization.
    fn emit_batch(&self, events: Vec<RefreshEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// No-op implementation for tests or contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpRefreshEventSink;

impl RefreshEventSink for NoOpRefreshEventSink {
    fn emit(&self, _event: RefreshEvent) {
        // Intentionally empty - events are discarded
    }
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockRefreshEventSink {
    events: Arc<Mutex<Vec<RefreshEvent>>>,
}

impl MockRefreshEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<RefreshEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl RefreshEventSink for MockRefreshEventSink {
    fn emit(&self, event: RefreshEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpRefreshEventSink;
        sink.emit(RefreshEvent::symbol_skipped("AAPL", "provider unavailable"));
        sink.emit_batch(vec![
            RefreshEvent::symbol_skipped("MSFT", "provider unavailable"),
            RefreshEvent::cycle_completed(0, 0, 2, 0),
        ]);
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockRefreshEventSink::new();
        assert!(sink.is_empty());

        sink.emit(RefreshEvent::symbol_skipped("AAPL", "provider unavailable"));
        assert_eq!(sink.len(), 1);

        sink.emit_batch(vec![
            RefreshEvent::symbol_skipped("MSFT", "provider unavailable"),
            RefreshEvent::cycle_completed(0, 0, 2, 0),
        ]);
        assert_eq!(sink.len(), 3);

        let events = sink.events();
        assert_eq!(events.len(), 3);

        sink.clear();
        assert!(sink.is_empty());
    }
}
