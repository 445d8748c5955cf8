//! High-level input service.
//!
//! Consumes raw events, runs the filter-field editing state machine, and yields
//! domain-level `InputAction`s that the render coordinator consumes.

use crate::error::Result;
use crate::input::raw::{RawInputCollector, RawInputEvent};
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Direction for list scroll actions emitted by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// High-level input actions emitted by the state machine/service.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// The filter text changed; carries the full text and the cursor (in chars).
    FilterEdited { text: String, cursor: usize },
    /// Cursor moved without changing the text.
    CursorMoved(usize),
    Scroll {
        direction: ScrollDirection,
        lines: u64,
    },
    PageUp,
    PageDown,
    GoToStart,
    GoToEnd,
    Quit,
    Resize {
        width: u16,
        height: u16,
    },
    NoAction,
    InvalidInput,
}

/// Line editor for the filter field.
///
/// The cursor is a char index into the buffer, so multi-byte input edits cleanly.
pub struct InputStateMachine {
    buffer: String,
    cursor: usize,
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> InputAction {
        if key_event.kind == KeyEventKind::Release {
            return InputAction::NoAction;
        }

        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key_event.modifiers.contains(KeyModifiers::ALT);

        match key_event.code {
            KeyCode::Esc => InputAction::Quit,
            KeyCode::Char('c') if ctrl => InputAction::Quit,
            KeyCode::Char('a') if ctrl => self.move_cursor(0),
            KeyCode::Char('e') if ctrl => self.move_cursor(self.char_len()),
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char('w') if ctrl => self.delete_word_before_cursor(),
            KeyCode::Char(ch) if !ctrl && !alt && !ch.is_control() => {
                self.insert_str(&ch.to_string())
            }
            KeyCode::Backspace => self.delete_before_cursor(),
            KeyCode::Delete => self.delete_at_cursor(),
            KeyCode::Left => self.move_cursor(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_cursor((self.cursor + 1).min(self.char_len())),
            KeyCode::Up => InputAction::Scroll {
                direction: ScrollDirection::Up,
                lines: 1,
            },
            KeyCode::Down => InputAction::Scroll {
                direction: ScrollDirection::Down,
                lines: 1,
            },
            KeyCode::PageUp => InputAction::PageUp,
            KeyCode::PageDown => InputAction::PageDown,
            KeyCode::Home => InputAction::GoToStart,
            KeyCode::End => InputAction::GoToEnd,
            _ => InputAction::InvalidInput,
        }
    }

    /// Insert pasted text at the cursor. Line breaks are flattened to spaces.
    pub fn handle_paste(&mut self, text: &str) -> InputAction {
        let flattened: String = text
            .chars()
            .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
            .filter(|ch| !ch.is_control())
            .collect();
        if flattened.is_empty() {
            return InputAction::NoAction;
        }
        self.insert_str(&flattened)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map_or(self.buffer.len(), |(offset, _)| offset)
    }

    fn edited(&self) -> InputAction {
        InputAction::FilterEdited {
            text: self.buffer.clone(),
            cursor: self.cursor,
        }
    }

    fn insert_str(&mut self, text: &str) -> InputAction {
        let offset = self.byte_offset(self.cursor);
        self.buffer.insert_str(offset, text);
        self.cursor += text.chars().count();
        self.edited()
    }

    fn delete_before_cursor(&mut self) -> InputAction {
        if self.cursor == 0 {
            return InputAction::NoAction;
        }
        self.cursor -= 1;
        let offset = self.byte_offset(self.cursor);
        self.buffer.remove(offset);
        self.edited()
    }

    fn delete_at_cursor(&mut self) -> InputAction {
        if self.cursor >= self.char_len() {
            return InputAction::NoAction;
        }
        let offset = self.byte_offset(self.cursor);
        self.buffer.remove(offset);
        self.edited()
    }

    fn delete_word_before_cursor(&mut self) -> InputAction {
        if self.cursor == 0 {
            return InputAction::NoAction;
        }
        let chars: Vec<char> = self.buffer.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }

        let from = self.byte_offset(start);
        let to = self.byte_offset(self.cursor);
        self.buffer.replace_range(from..to, "");
        self.cursor = start;
        self.edited()
    }

    fn clear(&mut self) -> InputAction {
        if self.buffer.is_empty() {
            return InputAction::NoAction;
        }
        self.buffer.clear();
        self.cursor = 0;
        self.edited()
    }

    fn move_cursor(&mut self, target: usize) -> InputAction {
        if target == self.cursor {
            return InputAction::NoAction;
        }
        self.cursor = target;
        InputAction::CursorMoved(target)
    }
}

impl Default for InputStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Service responsible for producing high-level `InputAction`s from terminal events.
pub struct InputService {
    state_machine: InputStateMachine,
    raw_input: RawInputCollector,
}

impl InputService {
    pub fn new() -> Self {
        Self {
            state_machine: InputStateMachine::new(),
            raw_input: RawInputCollector::new(),
        }
    }

    pub fn poll_actions(&mut self, timeout: Option<Duration>) -> Result<Vec<InputAction>> {
        let mut actions = Vec::new();

        if let Some(raw_event) = self.raw_input.poll_event(timeout)? {
            if let Some(action) = self.process_raw_event(raw_event) {
                actions.push(action);
            }

            while let Some(extra_event) = self.raw_input.pop_pending() {
                if let Some(action) = self.process_raw_event(extra_event) {
                    actions.push(action);
                }
            }
        }

        Ok(actions)
    }

    pub fn process_event(&mut self, event: Event) -> Vec<InputAction> {
        let mut actions = Vec::new();
        self.raw_input.process_event(event);
        while let Some(raw_event) = self.raw_input.pop_pending() {
            if let Some(action) = self.process_raw_event(raw_event) {
                actions.push(action);
            }
        }
        actions
    }

    fn process_raw_event(&mut self, event: RawInputEvent) -> Option<InputAction> {
        let action = match event {
            RawInputEvent::Key(key_event) => self.state_machine.handle_key_event(key_event),
            RawInputEvent::Paste(text) => self.state_machine.handle_paste(&text),
            RawInputEvent::Resize { width, height } => InputAction::Resize { width, height },
        };

        match action {
            InputAction::NoAction | InputAction::InvalidInput => None,
            _ => Some(action),
        }
    }
}

impl Default for InputService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(sm: &mut InputStateMachine, text: &str) -> InputAction {
        let mut last = InputAction::NoAction;
        for ch in text.chars() {
            last = sm.handle_key_event(key(KeyCode::Char(ch)));
        }
        last
    }

    #[test]
    fn typing_reports_full_text_each_keystroke() {
        let mut sm = InputStateMachine::new();
        assert_eq!(
            sm.handle_key_event(key(KeyCode::Char('a'))),
            InputAction::FilterEdited {
                text: "a".into(),
                cursor: 1
            }
        );
        assert_eq!(
            type_str(&mut sm, "lice"),
            InputAction::FilterEdited {
                text: "alice".into(),
                cursor: 5
            }
        );
    }

    #[test]
    fn shift_produces_uppercase_insert() {
        let mut sm = InputStateMachine::new();
        let action = sm.handle_key_event(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(
            action,
            InputAction::FilterEdited {
                text: "A".into(),
                cursor: 1
            }
        );
    }

    #[test]
    fn editing_in_the_middle_respects_cursor() {
        let mut sm = InputStateMachine::new();
        type_str(&mut sm, "alce");
        sm.handle_key_event(key(KeyCode::Left));
        sm.handle_key_event(key(KeyCode::Left));
        assert_eq!(
            sm.handle_key_event(key(KeyCode::Char('i'))),
            InputAction::FilterEdited {
                text: "alice".into(),
                cursor: 3
            }
        );
        assert_eq!(
            sm.handle_key_event(key(KeyCode::Delete)),
            InputAction::FilterEdited {
                text: "alie".into(),
                cursor: 3
            }
        );
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut sm = InputStateMachine::new();
        assert_eq!(
            sm.handle_key_event(key(KeyCode::Backspace)),
            InputAction::NoAction
        );
        type_str(&mut sm, "bo");
        assert_eq!(
            sm.handle_key_event(key(KeyCode::Backspace)),
            InputAction::FilterEdited {
                text: "b".into(),
                cursor: 1
            }
        );
    }

    #[test]
    fn multibyte_characters_edit_by_char() {
        let mut sm = InputStateMachine::new();
        type_str(&mut sm, "zoë");
        sm.handle_key_event(key(KeyCode::Left));
        sm.handle_key_event(key(KeyCode::Backspace));
        assert_eq!(sm.buffer(), "zë");
        assert_eq!(sm.cursor(), 1);
    }

    #[test]
    fn control_shortcuts_edit_and_move() {
        let mut sm = InputStateMachine::new();
        type_str(&mut sm, "ervin howell");

        assert_eq!(
            sm.handle_key_event(ctrl('w')),
            InputAction::FilterEdited {
                text: "ervin ".into(),
                cursor: 6
            }
        );
        assert_eq!(sm.handle_key_event(ctrl('a')), InputAction::CursorMoved(0));
        assert_eq!(sm.handle_key_event(ctrl('e')), InputAction::CursorMoved(6));
        assert_eq!(
            sm.handle_key_event(ctrl('u')),
            InputAction::FilterEdited {
                text: String::new(),
                cursor: 0
            }
        );
        assert_eq!(sm.handle_key_event(ctrl('u')), InputAction::NoAction);
    }

    #[test]
    fn navigation_keys_scroll_the_list() {
        let mut sm = InputStateMachine::new();
        assert_eq!(
            sm.handle_key_event(key(KeyCode::Down)),
            InputAction::Scroll {
                direction: ScrollDirection::Down,
                lines: 1
            }
        );
        assert_eq!(sm.handle_key_event(key(KeyCode::PageUp)), InputAction::PageUp);
        assert_eq!(sm.handle_key_event(key(KeyCode::End)), InputAction::GoToEnd);
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut sm = InputStateMachine::new();
        assert_eq!(sm.handle_key_event(key(KeyCode::Esc)), InputAction::Quit);
        assert_eq!(sm.handle_key_event(ctrl('c')), InputAction::Quit);
    }

    #[test]
    fn paste_inserts_flattened_text() {
        let mut service = InputService::new();
        let actions = service.process_event(Event::Paste("clem\nentine".into()));
        assert_eq!(
            actions,
            vec![InputAction::FilterEdited {
                text: "clem entine".into(),
                cursor: 11
            }]
        );
    }

    #[test]
    fn service_drops_invalid_input_and_keeps_order() {
        let mut service = InputService::new();
        assert!(service.process_event(Event::Key(key(KeyCode::F(5)))).is_empty());

        let mut actions = service.process_event(Event::Key(key(KeyCode::Char('b'))));
        actions.extend(service.process_event(Event::Resize(100, 30)));
        assert_eq!(
            actions,
            vec![
                InputAction::FilterEdited {
                    text: "b".into(),
                    cursor: 1
                },
                InputAction::Resize {
                    width: 100,
                    height: 30
                },
            ]
        );
    }
}
