//! Output sinks
//!
//! Widgets publish value changes to the outside world through an
//! [`OutputSink`]. The shell hands every widget a clone of one shared handle
//! at setup; nothing else mutates it afterwards.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::info;

/// Receiver for everything widgets send out
pub trait OutputSink: Send + Sync {
    /// A widget value changed
    fn value_changed(&self, symbol: &str, value: f32);

    /// A non-numeric payload
    fn message(&self, symbol: &str, text: &str);
}

/// Shared sink handle cloned into each widget
pub type SharedSink = Arc<dyn OutputSink>;

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NullSink {
    pub fn shared() -> SharedSink {
        Arc::new(NullSink)
    }
}

impl OutputSink for NullSink {
    fn value_changed(&self, _symbol: &str, _value: f32) {}

    fn message(&self, _symbol: &str, _text: &str) {}
}

/// Sink that logs every emission, standing in for the synthesis bus
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    pub fn shared() -> SharedSink {
        Arc::new(LogSink)
    }
}

impl OutputSink for LogSink {
    fn value_changed(&self, symbol: &str, value: f32) {
        info!(symbol, value, "value changed");
    }

    fn message(&self, symbol: &str, text: &str) {
        info!(symbol, text, "message");
    }
}

type ValueFn = dyn Fn(&str, f32) + Send + Sync;
type MessageFn = dyn Fn(&str, &str) + Send + Sync;

/// Sink built from a pair of closures
pub struct CallbackSink {
    on_value: Box<ValueFn>,
    on_message: Box<MessageFn>,
}

impl CallbackSink {
    pub fn new<V, M>(on_value: V, on_message: M) -> Self
    where
        V: Fn(&str, f32) + Send + Sync + 'static,
        M: Fn(&str, &str) + Send + Sync + 'static,
    {
        Self {
            on_value: Box::new(on_value),
            on_message: Box::new(on_message),
        }
    }

    /// Only numeric values are of interest
    pub fn values<V>(on_value: V) -> Self
    where
        V: Fn(&str, f32) + Send + Sync + 'static,
    {
        Self::new(on_value, |_, _| {})
    }
}

impl fmt::Debug for CallbackSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSink").finish_non_exhaustive()
    }
}

impl OutputSink for CallbackSink {
    fn value_changed(&self, symbol: &str, value: f32) {
        (self.on_value)(symbol, value);
    }

    fn message(&self, symbol: &str, text: &str) {
        (self.on_message)(symbol, text);
    }
}

/// One recorded emission
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    Value { symbol: String, value: f32 },
    Message { symbol: String, text: String },
}

/// Sink that keeps every emission, for tests and scripted playback
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<OutputEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<OutputEvent> {
        self.lock().clone()
    }

    /// Only the numeric emissions, as (symbol, value) pairs
    pub fn values(&self) -> Vec<(String, f32)> {
        self.lock()
            .iter()
            .filter_map(|ev| match ev {
                OutputEvent::Value { symbol, value } => Some((symbol.clone(), *value)),
                OutputEvent::Message { .. } => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain the recording
    pub fn take(&self) -> Vec<OutputEvent> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<OutputEvent>> {
        // A panic while holding the lock cannot leave the Vec inconsistent
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OutputSink for RecordingSink {
    fn value_changed(&self, symbol: &str, value: f32) {
        self.lock().push(OutputEvent::Value {
            symbol: symbol.to_string(),
            value,
        });
    }

    fn message(&self, symbol: &str, text: &str) {
        self.lock().push(OutputEvent::Message {
            symbol: symbol.to_string(),
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.value_changed("a", 1.0);
        sink.message("b", "hello");
        sink.value_changed("c", 2.5);

        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.values(),
            vec![("a".to_string(), 1.0), ("c".to_string(), 2.5)]
        );

        let drained = sink.take();
        assert_eq!(drained.len(), 3);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_callback_sink_forwards() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink = CallbackSink::values(move |symbol, value| {
            seen_clone.lock().unwrap().push((symbol.to_string(), value));
        });

        sink.value_changed("vol", 0.5);
        sink.message("vol", "ignored");

        assert_eq!(*seen.lock().unwrap(), vec![("vol".to_string(), 0.5)]);
    }
}
