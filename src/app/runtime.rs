use crate::directory::{fetch_worker_loop, UserDirectory};
use crate::input::{InputAction, InputService};
use crate::render::protocol::{FetchCommand, FetchResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

/// Capacity of the coordinator <-> fetch worker channels.
pub const FETCH_CHANNEL_CAPACITY: usize = 32;

/// Spawn a blocking thread that collects terminal input and forwards actions onto a channel.
pub fn spawn_input_thread(
    tx: UnboundedSender<InputAction>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut service = InputService::new();
        while !shutdown.load(Ordering::SeqCst) {
            match service.poll_actions(Some(poll_interval)) {
                Ok(actions) => {
                    for action in actions {
                        if tx.send(action).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    log::error!("input thread error: {}", err);
                    break;
                }
            }
        }
    })
}

/// Channel ends the coordinator keeps after spawning the fetch worker.
pub struct FetchWorkerHandle {
    pub commands: mpsc::Sender<FetchCommand>,
    pub responses: mpsc::Receiver<FetchResponse>,
    pub task: JoinHandle<()>,
}

/// Spawn the fetch worker on the current runtime.
pub fn spawn_fetch_worker(directory: Arc<dyn UserDirectory>) -> FetchWorkerHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(FETCH_CHANNEL_CAPACITY);
    let (resp_tx, resp_rx) = mpsc::channel(FETCH_CHANNEL_CAPACITY);
    let task = tokio::spawn(fetch_worker_loop(cmd_rx, resp_tx, directory));

    FetchWorkerHandle {
        commands: cmd_tx,
        responses: resp_rx,
        task,
    }
}
