//! Low-level input collection: crossterm polling and translation into primitive events that
//! the higher-level input service can consume.

use crate::error::Result;
use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::collections::VecDeque;
use std::time::Duration;

/// Poll timeout used when the caller does not provide one.
const DEFAULT_POLL_TIMEOUT_MS: u64 = 50;

/// Low-level events surfaced by the raw input collector.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    Key(KeyEvent),
    Paste(String),
    Resize { width: u16, height: u16 },
}

/// Collector that polls crossterm for events and queues the ones the app cares about.
#[derive(Debug, Default)]
pub struct RawInputCollector {
    pending_events: VecDeque<RawInputEvent>,
}

impl RawInputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the collector has no pending events.
    pub fn is_idle(&self) -> bool {
        self.pending_events.is_empty()
    }

    /// Process a synthetic event (primarily used by unit tests).
    pub fn process_event(&mut self, event: Event) {
        self.enqueue_event(event);
    }

    /// Retrieve the next raw input event, blocking up to `timeout`.
    pub fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<RawInputEvent>> {
        if let Some(event) = self.pop_pending() {
            return Ok(Some(event));
        }

        let poll_timeout = timeout.unwrap_or(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS));
        if !event::poll(poll_timeout)? {
            return Ok(None);
        }

        let event = event::read()?;
        self.enqueue_event(event);
        Ok(self.pop_pending())
    }

    fn enqueue_event(&mut self, event: Event) {
        match event {
            // Windows reports releases too; only presses and repeats edit the field.
            Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                self.pending_events.push_back(RawInputEvent::Key(key_event));
            }
            Event::Paste(text) if !text.is_empty() => {
                self.pending_events.push_back(RawInputEvent::Paste(text));
            }
            Event::Resize(width, height) => {
                self.pending_events
                    .push_back(RawInputEvent::Resize { width, height });
            }
            _ => {}
        }
    }

    /// Pop the next pending raw event.
    pub fn pop_pending(&mut self) -> Option<RawInputEvent> {
        self.pending_events.pop_front()
    }
}
