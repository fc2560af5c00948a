//! Goal action events
//!
//! Goals announce state changes to the goal selector and to each other. A
//! goal receiving an event from another goal knows it lost control of the
//! agent in between.

use crossbeam_channel::Sender;

/// World-state keys goals can assert or require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalKey {
    InCombat,
    Fighting,
}

/// A goal announcing a world-state change
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    /// Name of the goal that raised the event
    pub source: String,
    pub key: GoalKey,
    pub value: bool,
}

impl ActionEvent {
    pub fn new(source: impl Into<String>, key: GoalKey, value: bool) -> Self {
        Self {
            source: source.into(),
            key,
            value,
        }
    }
}

/// Receiver side of goal events
pub trait ActionEventSink: Send + Sync {
    fn publish(&self, event: ActionEvent);
}

impl ActionEventSink for Sender<ActionEvent> {
    fn publish(&self, event: ActionEvent) {
        if let Err(e) = self.send(event) {
            log::debug!("Action event dropped, no receiver: {:?}", e.into_inner().key);
        }
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ActionEventSink for NullSink {
    fn publish(&self, _event: ActionEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.publish(ActionEvent::new("Vendor", GoalKey::Fighting, false));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.source, "Vendor");
        assert_eq!(event.key, GoalKey::Fighting);
        assert!(!event.value);
    }

    #[test]
    fn test_disconnected_sink_does_not_panic() {
        let (tx, rx) = crossbeam_channel::unbounded::<ActionEvent>();
        drop(rx);
        tx.publish(ActionEvent::new("Vendor", GoalKey::Fighting, false));
    }
}
