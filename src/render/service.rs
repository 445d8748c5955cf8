//! Render coordination.
//!
//! Provides the state machine that mediates between input actions, the filter debouncer,
//! fetch commands and view updates. The live filter text changes on every keystroke; the
//! directory is only queried when the debounced filter settles on a new value.

use crate::error::{Result, UserlookError};
use crate::input::{Debouncer, InputAction, ScrollDirection};
use crate::render::protocol::{FetchCommand, FetchResponse, RequestId, ResponseOrdering};
use crate::render::ui::ViewState;
use std::collections::HashSet;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// Tracks state that must persist across input actions and worker responses.
pub struct RenderLoopState {
    debouncer: Debouncer<String>,
    ordering: ResponseOrdering,
    fetch_tx: mpsc::Sender<FetchCommand>,
    next_request_id: RequestId,
    latest_request: Option<RequestId>,
    in_flight: HashSet<RequestId>,
    torn_down: bool,
}

impl RenderLoopState {
    pub fn new(
        fetch_tx: mpsc::Sender<FetchCommand>,
        quiet_period: Duration,
        ordering: ResponseOrdering,
    ) -> Self {
        Self {
            debouncer: Debouncer::new(quiet_period, String::new()),
            ordering,
            fetch_tx,
            next_request_id: 1,
            latest_request: None,
            in_flight: HashSet::new(),
            torn_down: false,
        }
    }

    /// The settled filter the directory was last asked about.
    pub fn debounced_filter(&self) -> &str {
        self.debouncer.current()
    }

    /// Id of the most recently issued request.
    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    /// When the pending filter edit settles, if one is pending.
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Issue the initial fetch for the empty filter. An empty filter is unfiltered.
    pub async fn mount(&mut self, view_state: &mut ViewState) -> Result<()> {
        let initial = self.debouncer.current().clone();
        self.issue_fetch(initial, view_state).await
    }

    /// Apply an input action. Returns false when the screen should close.
    ///
    /// Filter edits update the live text immediately and restart the quiet period; they
    /// never reach the directory directly.
    pub fn process_action(
        &mut self,
        action: InputAction,
        view_state: &mut ViewState,
        now: Instant,
    ) -> bool {
        match action {
            InputAction::Quit => return false,
            InputAction::FilterEdited { text, cursor } => {
                let changed = text != view_state.filter_text;
                view_state.set_filter(text.clone(), cursor);
                if changed {
                    self.debouncer.push(text, now);
                }
            }
            InputAction::CursorMoved(cursor) => {
                view_state.cursor = cursor;
            }
            InputAction::Scroll { direction, lines } => {
                let delta = match direction {
                    ScrollDirection::Up => -(lines as i64),
                    ScrollDirection::Down => lines as i64,
                };
                view_state.scroll_by(delta);
            }
            InputAction::PageUp => {
                view_state.scroll_by(-(view_state.lines_per_page() as i64));
            }
            InputAction::PageDown => {
                view_state.scroll_by(view_state.lines_per_page() as i64);
            }
            InputAction::GoToStart => view_state.go_to_start(),
            InputAction::GoToEnd => view_state.go_to_end(),
            InputAction::Resize { width, height } => {
                view_state.update_terminal_size(width, height);
            }
            InputAction::NoAction | InputAction::InvalidInput => {}
        }
        true
    }

    /// Settle the debounced filter if its quiet period has elapsed, fetching on change.
    pub async fn on_deadline(&mut self, view_state: &mut ViewState, now: Instant) -> Result<()> {
        if let Some(filter) = self.debouncer.poll_expired(now) {
            self.issue_fetch(filter, view_state).await?;
        }
        Ok(())
    }

    /// Apply a worker response to the view according to the ordering policy.
    pub fn handle_response(&mut self, response: FetchResponse, view_state: &mut ViewState) {
        let request_id = response.request_id();
        self.in_flight.remove(&request_id);

        if self.ordering == ResponseOrdering::Latest && Some(request_id) != self.latest_request {
            log::debug!(
                "discarding stale response {} for {:?} (latest is {:?})",
                request_id,
                response.filter(),
                self.latest_request
            );
            self.refresh_loading(view_state);
            return;
        }

        match response {
            FetchResponse::UsersLoaded { filter, users, .. } => {
                view_state.replace_users(users);
                view_state.status_line.shown_filter = Some(filter);
                view_state.status_line.clear_failure();
            }
            FetchResponse::Failed { error, .. } => {
                // The previous collection stays on screen.
                view_state.status_line.set_failure(error.to_string());
            }
        }
        self.refresh_loading(view_state);
    }

    /// Cancel any pending debounce and stop the worker. No fetch is issued afterwards.
    pub async fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.debouncer.cancel();
        // Worker already gone is fine during shutdown.
        let _ = self.fetch_tx.send(FetchCommand::Shutdown).await;
    }

    async fn issue_fetch(&mut self, filter: String, view_state: &mut ViewState) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.latest_request = Some(request_id);
        self.in_flight.insert(request_id);
        log::debug!("issuing request {} for {:?}", request_id, filter);

        self.fetch_tx
            .send(FetchCommand::Fetch { request_id, filter })
            .await
            .map_err(|_| UserlookError::channel_closed("fetch worker"))?;
        self.refresh_loading(view_state);
        Ok(())
    }

    fn refresh_loading(&self, view_state: &mut ViewState) {
        view_state.status_line.loading = match self.ordering {
            ResponseOrdering::Latest => self
                .latest_request
                .is_some_and(|id| self.in_flight.contains(&id)),
            ResponseOrdering::Arrival => !self.in_flight.is_empty(),
        };
    }
}
