//! Application orchestration layer
//!
//! Wires the input thread, the fetch worker, the render coordinator and the terminal renderer
//! together for the lifetime of one screen. All view state is created when the screen mounts
//! and dropped when it closes.

pub mod runtime;

use crate::config::AppConfig;
use crate::directory::UserDirectory;
use crate::error::Result;
use crate::input::InputAction;
use crate::render::protocol::FetchResponse;
use crate::render::ui::{UIRenderer, ViewState};
use crate::render::RenderLoopState;
use runtime::{spawn_fetch_worker, spawn_input_thread};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long the input thread blocks on the terminal before re-checking for shutdown.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Application orchestrator - coordinates components without duplicating their state
pub struct Application {
    config: AppConfig,
    directory: Arc<dyn UserDirectory>,
    ui_renderer: Box<dyn UIRenderer>,
}

impl Application {
    pub fn new(
        config: AppConfig,
        directory: Arc<dyn UserDirectory>,
        ui_renderer: Box<dyn UIRenderer>,
    ) -> Self {
        Self {
            config,
            directory,
            ui_renderer,
        }
    }

    /// Run the interactive screen until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        self.ui_renderer.initialize()?;

        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let input_thread = spawn_input_thread(input_tx, Arc::clone(&shutdown), INPUT_POLL_INTERVAL);

        let outcome = self.run_with_input(input_rx).await;

        shutdown.store(true, Ordering::SeqCst);
        // The thread wakes within one poll interval; join off the async executor.
        let _ = tokio::task::spawn_blocking(move || input_thread.join()).await;

        self.ui_renderer.cleanup()?;
        outcome
    }

    /// Drive the screen from an arbitrary stream of input actions.
    ///
    /// Mounting issues the initial unfiltered fetch; the loop then multiplexes input, worker
    /// responses and the debounce deadline until a quit action or the input source closes.
    pub async fn run_with_input(
        &mut self,
        mut input_rx: mpsc::UnboundedReceiver<InputAction>,
    ) -> Result<()> {
        let (width, height) = self.ui_renderer.get_terminal_size()?;
        let mut view_state = ViewState::new(width, height);

        let mut worker = spawn_fetch_worker(Arc::clone(&self.directory));
        let mut state = RenderLoopState::new(
            worker.commands.clone(),
            self.config.quiet_period,
            self.config.ordering,
        );

        let outcome = async {
            state.mount(&mut view_state).await?;
            self.ui_renderer.render(&view_state)?;
            self.event_loop(
                &mut state,
                &mut view_state,
                &mut input_rx,
                &mut worker.responses,
            )
            .await
        }
        .await;

        state.teardown().await;
        drop(worker.commands);
        let _ = worker.task.await;
        log::debug!("screen closed");
        outcome
    }

    async fn event_loop(
        &mut self,
        state: &mut RenderLoopState,
        view_state: &mut ViewState,
        input_rx: &mut mpsc::UnboundedReceiver<InputAction>,
        responses: &mut mpsc::Receiver<FetchResponse>,
    ) -> Result<()> {
        loop {
            let deadline = state.debounce_deadline();

            tokio::select! {
                action = input_rx.recv() => match action {
                    Some(action) => {
                        if !state.process_action(action, view_state, Instant::now()) {
                            return Ok(());
                        }
                    }
                    None => return Ok(()),
                },
                Some(response) = responses.recv() => {
                    state.handle_response(response, view_state);
                }
                _ = sleep_until_deadline(deadline) => {
                    state.on_deadline(view_state, Instant::now()).await?;
                }
            }

            self.ui_renderer.render(view_state)?;
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
