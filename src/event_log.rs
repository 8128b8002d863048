// 📜 Event Log - append-only narration of every change to the movie list
//
// "Every change is an event": adds and ratings are recorded here as
// human-readable descriptions. The log is narration only and is never replayed.
//
// Threading: the log is a single-threaded shared handle (Rc<RefCell<..>>).
// Cloning an EventLog shares the same sequence. It is neither Send nor Sync,
// so the compiler enforces the single-caller model instead of a lock.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::info;

// ============================================================================
// EVENT
// ============================================================================

/// Immutable record of one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

impl Event {
    pub fn new(description: &str) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            description: description.to_string(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}",
            self.timestamp.format("%a %b %d %H:%M:%S UTC %Y"),
            self.description
        )
    }
}

// ============================================================================
// EVENT LOG
// ============================================================================

thread_local! {
    static SHARED_LOG: EventLog = EventLog::new();
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventLog {
    /// Create an isolated, empty log
    pub fn new() -> Self {
        EventLog {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The process-wide shared log, created on first access.
    ///
    /// The application runs on one thread; each thread would see its own
    /// instance. Prefer passing a log explicitly where possible.
    pub fn instance() -> Self {
        SHARED_LOG.with(|log| log.clone())
    }

    /// Append an event stamped with the current time. Never fails.
    pub fn log_event(&self, description: &str) {
        let event = Event::new(description);
        info!(
            target: "movie_catalog::event_log",
            event_id = %event.event_id,
            "{}",
            event.description
        );
        self.events.borrow_mut().push(event);
    }

    /// Snapshot of all events in insertion order
    pub fn entries(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Iterate over a snapshot; calling again restarts from the first event
    pub fn iter(&self) -> std::vec::IntoIter<Event> {
        self.entries().into_iter()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Drop every event (test isolation only)
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// True if both handles share the same underlying sequence
    #[cfg(test)]
    fn shares_with(&self, other: &EventLog) -> bool {
        Rc::ptr_eq(&self.events, &other.events)
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_appends_in_order() {
        let log = EventLog::new();
        log.log_event("added movie Heat");
        log.log_event("rated movie Heat: 9");

        let descriptions: Vec<String> = log.iter().map(|e| e.description).collect();
        assert_eq!(descriptions, vec!["added movie Heat", "rated movie Heat: 9"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let log = EventLog::new();
        log.log_event("one");
        log.log_event("two");

        let first: Vec<Event> = log.iter().collect();
        let second: Vec<Event> = (&log).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clones_share_sequence() {
        let log = EventLog::new();
        let other = log.clone();
        other.log_event("from clone");

        assert_eq!(log.len(), 1);
        assert!(log.shares_with(&other));
        assert!(!log.shares_with(&EventLog::new()));
    }

    #[test]
    fn test_instance_is_shared() {
        let a = EventLog::instance();
        let b = EventLog::instance();
        assert!(a.shares_with(&b));
    }

    #[test]
    fn test_clear() {
        let log = EventLog::new();
        log.log_event("something");
        log.clear();

        assert!(log.is_empty());
        assert_eq!(log.iter().count(), 0);
    }

    #[test]
    fn test_event_serializes_for_reports() {
        let event = Event::new("saved movie list to data/movieList.json");
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["event_id"], event.event_id.as_str());
        assert_eq!(value["description"], "saved movie list to data/movieList.json");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_event_display() {
        let event = Event::new("added movie Dune");
        let rendered = event.to_string();
        let mut lines = rendered.lines();

        assert!(lines.next().unwrap().ends_with(&event.timestamp.format("%Y").to_string()));
        assert_eq!(lines.next(), Some("added movie Dune"));
        assert_eq!(event.event_id.len(), 36, "UUID v4 string");
    }
}
