//! Rendering subsystem.
//!
//! Hosts the coordinator that turns input actions and fetch responses into view updates, the
//! protocol it speaks with the fetch worker, and the terminal renderer.

pub mod protocol;
pub mod service;
pub mod ui;

pub use protocol::{FetchCommand, FetchResponse, RequestId, ResponseOrdering};
pub use service::RenderLoopState;
