use crate::directory::UserDirectory;
use crate::render::protocol::{FetchCommand, FetchResponse, RequestId};
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender};

/// Run the fetch worker processing commands from the coordinator.
///
/// Every `Fetch` is served on its own task, so responses are delivered in the order the
/// directory completes them rather than the order they were requested. In-flight requests
/// are not cancelled on shutdown; their responses are dropped once the coordinator is gone.
pub async fn fetch_worker_loop(
    mut rx: Receiver<FetchCommand>,
    tx: Sender<FetchResponse>,
    directory: Arc<dyn UserDirectory>,
) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            FetchCommand::Fetch { request_id, filter } => {
                let directory = Arc::clone(&directory);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let response = run_fetch(directory.as_ref(), request_id, filter).await;
                    // Coordinator hung up; nobody is waiting for this result.
                    let _ = tx.send(response).await;
                });
            }
            FetchCommand::Shutdown => {
                log::debug!("fetch worker shutting down");
                break;
            }
        }
    }
}

async fn run_fetch(
    directory: &dyn UserDirectory,
    request_id: RequestId,
    filter: String,
) -> FetchResponse {
    match directory.fetch_users(&filter).await {
        Ok(users) => {
            log::debug!(
                "request {} ({:?}) returned {} users",
                request_id,
                filter,
                users.len()
            );
            FetchResponse::UsersLoaded {
                request_id,
                filter,
                users,
            }
        }
        Err(error) => {
            log::warn!("request {} ({:?}) failed: {}", request_id, filter, error);
            FetchResponse::Failed {
                request_id,
                filter,
                error,
            }
        }
    }
}
