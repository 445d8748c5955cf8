//! # userlook - Debounced Terminal User Search
//!
//! A terminal screen with a filter box and a list of users fetched from a remote JSON
//! collection. Typing updates the filter immediately, but the directory is only queried once
//! the filter has been stable for a quiet period (500 ms by default).
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - Layered runtime configuration
//! - [`input`] - Terminal input, filter editing and the debounce primitive
//! - [`directory`] - The remote user collection and its fetch worker
//! - [`render`] - Render coordination, worker protocol and terminal UI
//! - [`app`] - Application core and component coordination

pub mod config;
pub mod error;

pub mod directory;
pub mod input;
pub mod render;

pub mod app;

// Re-export commonly used types for convenience
pub use error::{Result, UserlookError};

pub use app::Application;
pub use config::AppConfig;
pub use directory::{HttpUserDirectory, User, UserDirectory};
pub use input::Debouncer;
pub use render::ResponseOrdering;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
