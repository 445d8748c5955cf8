use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use tokio::time::{timeout, Duration, Instant};

use userlook::directory::{fetch_worker_loop, User, UserDirectory};
use userlook::input::InputAction;
use userlook::render::protocol::{FetchCommand, FetchResponse, ResponseOrdering};
use userlook::render::ui::ViewState;
use userlook::render::RenderLoopState;
use userlook::Result;

const QUIET: Duration = Duration::from_millis(500);
const TIMEOUT_MS: u64 = 500;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn edit(text: &str) -> InputAction {
    InputAction::FilterEdited {
        text: text.into(),
        cursor: text.chars().count(),
    }
}

/// Coordinator wired to a bare channel so tests can see exactly what would be fetched.
fn recording_state(
    ordering: ResponseOrdering,
) -> (RenderLoopState, mpsc::Receiver<FetchCommand>, ViewState) {
    let (tx, rx) = mpsc::channel(32);
    (
        RenderLoopState::new(tx, QUIET, ordering),
        rx,
        ViewState::new(80, 24),
    )
}

fn drain_fetches(rx: &mut mpsc::Receiver<FetchCommand>) -> Vec<String> {
    let mut filters = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        if let FetchCommand::Fetch { filter, .. } = cmd {
            filters.push(filter);
        }
    }
    filters
}

#[tokio::test]
async fn initial_mount_fetches_unfiltered_collection_once() {
    let (mut state, mut rx, mut view) = recording_state(ResponseOrdering::Latest);
    let t0 = Instant::now();

    state.mount(&mut view).await.unwrap();
    state.on_deadline(&mut view, t0 + QUIET).await.unwrap();
    state.on_deadline(&mut view, t0 + QUIET * 4).await.unwrap();

    assert_eq!(drain_fetches(&mut rx), vec![String::new()]);
    assert_eq!(state.debounced_filter(), "");
}

#[tokio::test]
async fn typing_burst_issues_single_fetch_for_final_text() {
    let (mut state, mut rx, mut view) = recording_state(ResponseOrdering::Latest);
    state.mount(&mut view).await.unwrap();
    drain_fetches(&mut rx);

    let t0 = Instant::now();
    let keystrokes = [("al", 0), ("ali", 120), ("alic", 260), ("alice", 400)];
    for (text, at) in keystrokes {
        let now = t0 + ms(at);
        state.process_action(edit(text), &mut view, now);
        assert_eq!(view.filter_text, text);
        // A timer check while typing never settles the filter.
        state.on_deadline(&mut view, now + ms(100)).await.unwrap();
        assert_eq!(state.debounced_filter(), "");
    }
    assert!(drain_fetches(&mut rx).is_empty());

    state
        .on_deadline(&mut view, t0 + ms(400) + QUIET - ms(1))
        .await
        .unwrap();
    assert!(drain_fetches(&mut rx).is_empty());

    state
        .on_deadline(&mut view, t0 + ms(400) + QUIET)
        .await
        .unwrap();
    assert_eq!(drain_fetches(&mut rx), vec!["alice".to_string()]);
    assert_eq!(state.debounced_filter(), "alice");
}

#[tokio::test]
async fn editing_back_to_settled_filter_does_not_refetch() {
    let (mut state, mut rx, mut view) = recording_state(ResponseOrdering::Latest);
    state.mount(&mut view).await.unwrap();
    drain_fetches(&mut rx);

    let t0 = Instant::now();
    state.process_action(edit("x"), &mut view, t0);
    state.process_action(edit(""), &mut view, t0 + ms(100));
    state.on_deadline(&mut view, t0 + ms(100) + QUIET).await.unwrap();

    assert!(drain_fetches(&mut rx).is_empty());
}

#[tokio::test]
async fn teardown_with_pending_edit_never_fetches() {
    let (mut state, mut rx, mut view) = recording_state(ResponseOrdering::Latest);
    state.mount(&mut view).await.unwrap();
    drain_fetches(&mut rx);

    let t0 = Instant::now();
    state.process_action(edit("bob"), &mut view, t0);
    assert!(state.debounce_deadline().is_some());

    state.teardown().await;
    assert_eq!(state.debounce_deadline(), None);
    state.on_deadline(&mut view, t0 + QUIET * 2).await.unwrap();
    state.mount(&mut view).await.unwrap();

    assert_eq!(rx.try_recv().ok(), Some(FetchCommand::Shutdown));
    assert!(rx.try_recv().is_err());
}

/// Directory whose answers for selected filters are held until released.
#[derive(Default)]
struct GatedDirectory {
    gates: HashMap<String, Arc<Notify>>,
}

impl GatedDirectory {
    fn gate(&mut self, filter: &str) -> Arc<Notify> {
        Arc::clone(
            self.gates
                .entry(filter.to_string())
                .or_insert_with(|| Arc::new(Notify::new())),
        )
    }
}

#[async_trait]
impl UserDirectory for GatedDirectory {
    async fn fetch_users(&self, filter: &str) -> Result<Vec<User>> {
        if let Some(gate) = self.gates.get(filter) {
            gate.notified().await;
        }
        Ok(vec![User::named(format!("{filter}-result"))])
    }
}

async fn next_response(rx: &mut mpsc::Receiver<FetchResponse>) -> FetchResponse {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.recv())
        .await
        .expect("worker response timed out")
        .expect("worker channel closed unexpectedly")
}

fn names(view: &ViewState) -> Vec<&str> {
    view.users.iter().map(|user| user.name.as_str()).collect()
}

/// Issue "bob" then "bo", let "bo" resolve first and "bob" last, and return the names on
/// screen after each response is applied.
async fn overlapping_requests(ordering: ResponseOrdering) -> (Vec<String>, Vec<String>) {
    let mut directory = GatedDirectory::default();
    let bob_gate = directory.gate("bob");
    let bo_gate = directory.gate("bo");

    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (resp_tx, mut resp_rx) = mpsc::channel(8);
    let worker = tokio::spawn(fetch_worker_loop(cmd_rx, resp_tx, Arc::new(directory)));

    let mut state = RenderLoopState::new(cmd_tx, QUIET, ordering);
    let mut view = ViewState::new(80, 24);

    state.mount(&mut view).await.unwrap();
    let initial = next_response(&mut resp_rx).await;
    state.handle_response(initial, &mut view);
    assert_eq!(names(&view), vec!["-result"]);

    let t0 = Instant::now();
    state.process_action(edit("bob"), &mut view, t0);
    state.on_deadline(&mut view, t0 + QUIET).await.unwrap();
    let t1 = t0 + QUIET;
    state.process_action(edit("bo"), &mut view, t1);
    state.on_deadline(&mut view, t1 + QUIET).await.unwrap();
    assert!(view.status_line.loading);

    bo_gate.notify_one();
    let first = next_response(&mut resp_rx).await;
    assert_eq!(first.filter(), "bo");
    state.handle_response(first, &mut view);
    let after_first: Vec<String> = names(&view).into_iter().map(String::from).collect();

    bob_gate.notify_one();
    let second = next_response(&mut resp_rx).await;
    assert_eq!(second.filter(), "bob");
    state.handle_response(second, &mut view);
    let after_second: Vec<String> = names(&view).into_iter().map(String::from).collect();
    assert!(!view.status_line.loading);

    state.teardown().await;
    worker.await.unwrap();
    (after_first, after_second)
}

#[tokio::test]
async fn arrival_ordering_lets_the_last_response_win() {
    let (after_first, after_second) = overlapping_requests(ResponseOrdering::Arrival).await;

    assert_eq!(after_first, vec!["bo-result"]);
    // The older "bob" request resolved last and overwrites the newer results.
    assert_eq!(after_second, vec!["bob-result"]);
}

#[tokio::test]
async fn latest_ordering_discards_stale_responses() {
    let (after_first, after_second) = overlapping_requests(ResponseOrdering::Latest).await;

    assert_eq!(after_first, vec!["bo-result"]);
    assert_eq!(after_second, vec!["bo-result"]);
}

#[tokio::test]
async fn loaded_response_updates_status_line() {
    let (mut state, mut rx, mut view) = recording_state(ResponseOrdering::Latest);
    state.mount(&mut view).await.unwrap();
    drain_fetches(&mut rx);

    state.handle_response(
        FetchResponse::UsersLoaded {
            request_id: state.latest_request().unwrap(),
            filter: String::new(),
            users: vec![User::named("Alice"), User::named("Bob")],
        },
        &mut view,
    );

    assert_eq!(names(&view), vec!["Alice", "Bob"]);
    assert_eq!(view.format_status_line(), "2 users | all names");
}
