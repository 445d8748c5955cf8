//! Input subsystem.
//!
//! Terminal events are collected by [`raw`], turned into filter edits and list navigation by
//! [`service`], and the filter text is settled by the [`debounce`] primitive before it reaches
//! the directory.

pub mod debounce;
pub mod raw;
pub mod service;

// Modules outside this crate should prefer importing from `crate::input` rather than reaching
// into submodules.
pub use debounce::{Debouncer, DEFAULT_QUIET_PERIOD_MS};
pub use service::{InputAction, InputService, InputStateMachine, ScrollDirection};
