//! Request lifecycle for prediction submissions.
//!
//! [`PredictionController::submit`] moves the published state to
//! `Submitting`, spawns one task that performs the network call and settles
//! the state to `Succeeded` or `Failed`. Every submission is tagged with a
//! generation; a task whose generation is no longer the latest drops its
//! outcome instead of overwriting newer state.

use super::adapter;
use super::transport::{PredictionTransport, RawResponse};
use super::PredictError;
use crate::domain::{GenreDistribution, PredictionRequest, PredictionResult, SubmissionState};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

/// Everything the presentation layer needs, published after each transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerSnapshot {
    pub state: SubmissionState,
    /// Only set in `Succeeded`.
    pub result: Option<PredictionResult>,
    /// Only set in `Failed`.
    pub error: Option<String>,
    /// Generation of the latest submission; 0 before the first one.
    pub generation: u64,
    pub url: Option<String>,
    pub completed_at: Option<DateTime<Local>>,
}

impl ControllerSnapshot {
    pub fn loading_visible(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    pub fn video_title(&self) -> Option<&str> {
        self.result.as_ref()?.video_title.as_deref()
    }

    pub fn distribution(&self) -> Option<&GenreDistribution> {
        self.result.as_ref()?.genre_distribution.as_ref()
    }

    pub fn top_genre(&self) -> Option<&str> {
        self.result.as_ref()?.top_genre.as_deref()
    }
}

/// Handle to one in-flight submission. Dropping it does not cancel anything.
#[derive(Debug)]
pub struct Submission {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Submission {
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait until this submission's task has finished, whether or not its
    /// outcome was applied.
    pub async fn settled(self) -> Result<(), JoinError> {
        self.handle.await
    }
}

#[derive(Clone)]
pub struct PredictionController {
    transport: Arc<dyn PredictionTransport>,
    state: Arc<watch::Sender<ControllerSnapshot>>,
}

impl std::fmt::Debug for PredictionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionController")
            .field("transport", &self.transport.name())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl PredictionController {
    pub fn new(transport: Arc<dyn PredictionTransport>) -> Self {
        let (state, _) = watch::channel(ControllerSnapshot::default());
        Self {
            transport,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.state.borrow().clone()
    }

    /// Start a new submission for `url_value`, passed through unvalidated.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, url_value: &str) -> Submission {
        let request = PredictionRequest::new(url_value);

        let mut generation = 0;
        self.state.send_modify(|snapshot| {
            snapshot.generation += 1;
            generation = snapshot.generation;
            snapshot.state = SubmissionState::Submitting;
            snapshot.result = None;
            snapshot.error = None;
            snapshot.url = Some(request.url.clone());
            snapshot.completed_at = None;
        });

        tracing::info!(
            generation,
            url = %request.url,
            transport = self.transport.name(),
            "submitting prediction request"
        );

        let transport = Arc::clone(&self.transport);
        let guard = SettleGuard {
            state: Arc::clone(&self.state),
            generation,
            armed: true,
        };

        let handle = tokio::spawn(async move {
            let outcome = match transport.send(&request).await {
                Ok(response) => resolve_response(&response),
                Err(error) => Err(error),
            };
            guard.settle(outcome);
        });

        Submission { generation, handle }
    }
}

/// Map a raw server answer onto a prediction or a classified failure.
pub fn resolve_response(response: &RawResponse) -> Result<PredictionResult, PredictError> {
    tracing::debug!(status = response.status, "resolving prediction response");

    if response.is_success() {
        let payload = adapter::decode_payload(&response.body)
            .map_err(|e| PredictError::Transport(format!("malformed response body: {e}")))?;
        return Ok(adapter::adapt_result(&payload));
    }

    // A failure body that is not JSON is as unreadable as a broken connection
    let payload = adapter::decode_payload(&response.body).map_err(|e| {
        PredictError::Transport(format!(
            "malformed error body with status {}: {e}",
            response.status
        ))
    })?;

    match adapter::error_message(&payload) {
        Some(message) => Err(PredictError::Server {
            status: response.status,
            message,
        }),
        None => Err(PredictError::ServerUnlabeled {
            status: response.status,
        }),
    }
}

/// Settles a generation exactly once. If the task is dropped or panics before
/// settling, the drop settles it as a transport failure so the loading state
/// never outlives the attempt.
struct SettleGuard {
    state: Arc<watch::Sender<ControllerSnapshot>>,
    generation: u64,
    armed: bool,
}

impl SettleGuard {
    fn settle(mut self, outcome: Result<PredictionResult, PredictError>) {
        self.armed = false;
        apply_outcome(&self.state, self.generation, outcome);
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if self.armed {
            apply_outcome(
                &self.state,
                self.generation,
                Err(PredictError::Transport(
                    "submission ended before a response was resolved".to_string(),
                )),
            );
        }
    }
}

fn apply_outcome(
    state: &watch::Sender<ControllerSnapshot>,
    generation: u64,
    outcome: Result<PredictionResult, PredictError>,
) -> bool {
    state.send_if_modified(|snapshot| {
        if snapshot.generation != generation {
            tracing::debug!(
                generation,
                latest = snapshot.generation,
                "discarding stale prediction outcome"
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(
                    generation,
                    title = result.video_title.as_deref().unwrap_or(""),
                    top = result.top_genre.as_deref().unwrap_or(""),
                    "prediction succeeded"
                );
                snapshot.state = SubmissionState::Succeeded;
                snapshot.result = Some(result);
                snapshot.error = None;
            }
            Err(error) => {
                tracing::warn!(generation, kind = error.kind(), "prediction failed: {error}");
                snapshot.state = SubmissionState::Failed;
                snapshot.result = None;
                snapshot.error = Some(error.user_message());
            }
        }
        snapshot.completed_at = Some(Local::now());
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::error::{SERVER_FALLBACK_MESSAGE, TRANSPORT_FALLBACK_MESSAGE};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type Outcome = Result<RawResponse, PredictError>;

    /// Answers every call with the same canned outcome.
    struct ScriptedTransport {
        status: u16,
        body: &'static str,
        fail: bool,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn respond(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                status: 0,
                body: "",
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PredictionTransport for ScriptedTransport {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(&self, _request: &PredictionRequest) -> Outcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PredictError::Transport("dns lookup failed".to_string()));
            }
            Ok(RawResponse::new(self.status, self.body))
        }
    }

    /// Holds each call open until the test releases the gate for its URL.
    #[derive(Default)]
    struct GatedTransport {
        gates: Mutex<HashMap<String, oneshot::Receiver<Outcome>>>,
    }

    impl GatedTransport {
        fn gate(&self, url: &str) -> oneshot::Sender<Outcome> {
            let (tx, rx) = oneshot::channel();
            if let Ok(mut gates) = self.gates.lock() {
                gates.insert(url.to_string(), rx);
            }
            tx
        }
    }

    #[async_trait]
    impl PredictionTransport for GatedTransport {
        fn name(&self) -> &str {
            "gated"
        }

        async fn send(&self, request: &PredictionRequest) -> Outcome {
            let gate = self
                .gates
                .lock()
                .ok()
                .and_then(|mut gates| gates.remove(&request.url));
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(PredictError::Transport("gate dropped".to_string()))),
                None => Err(PredictError::Transport("no gate".to_string())),
            }
        }
    }

    struct PanickingTransport;

    #[async_trait]
    impl PredictionTransport for PanickingTransport {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn send(&self, _request: &PredictionRequest) -> Outcome {
            panic!("transport blew up");
        }
    }

    const FULL_BODY: &str =
        r#"{"video_title":"Song X","results":{"rock":0.7,"jazz":0.3},"top_prediction":"rock"}"#;

    #[test]
    fn starts_idle_with_nothing_to_show() {
        let controller = PredictionController::new(ScriptedTransport::respond(200, "{}"));
        let snapshot = controller.snapshot();

        assert_eq!(snapshot.state, SubmissionState::Idle);
        assert_eq!(snapshot.generation, 0);
        assert!(snapshot.result.is_none());
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading_visible());
    }

    #[tokio::test]
    async fn full_success_response() -> Result<(), Box<dyn std::error::Error>> {
        let transport = ScriptedTransport::respond(200, FULL_BODY);
        let controller = PredictionController::new(transport.clone());

        let submission = controller.submit("https://youtu.be/abc");
        assert_eq!(controller.snapshot().state, SubmissionState::Submitting);
        assert!(controller.snapshot().loading_visible());
        submission.settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Succeeded);
        assert!(!snapshot.loading_visible());
        assert_eq!(snapshot.video_title(), Some("Song X"));
        assert_eq!(snapshot.top_genre(), Some("rock"));
        assert!(snapshot.error.is_none());
        assert!(snapshot.completed_at.is_some());

        let dist = snapshot.distribution().ok_or("distribution missing")?;
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.get("rock"), Some(0.7));
        assert_eq!(dist.get("jazz"), Some(0.3));

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn partial_success_response() -> Result<(), Box<dyn std::error::Error>> {
        let controller = PredictionController::new(ScriptedTransport::respond(
            200,
            r#"{"top_prediction":"pop"}"#,
        ));

        controller.submit("https://youtu.be/abc").settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Succeeded);
        assert_eq!(snapshot.video_title(), None);
        assert!(snapshot.distribution().is_none());
        assert_eq!(snapshot.top_genre(), Some("pop"));
        Ok(())
    }

    #[tokio::test]
    async fn server_error_with_message() -> Result<(), Box<dyn std::error::Error>> {
        let controller =
            PredictionController::new(ScriptedTransport::respond(400, r#"{"error":"bad url"}"#));

        controller.submit("not a url").settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("bad url"));
        assert!(snapshot.result.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn empty_url_is_passed_through() -> Result<(), Box<dyn std::error::Error>> {
        let gated = Arc::new(GatedTransport::default());
        let gate = gated.gate("");
        let controller = PredictionController::new(gated);

        let submission = controller.submit("");
        assert_eq!(controller.snapshot().url.as_deref(), Some(""));
        let _ = gate.send(Ok(RawResponse::new(400, r#"{"error":"url required"}"#)));
        submission.settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("url required"));
        Ok(())
    }

    #[tokio::test]
    async fn server_error_without_body_uses_fallback() -> Result<(), Box<dyn std::error::Error>> {
        let controller = PredictionController::new(ScriptedTransport::respond(502, ""));

        controller.submit("https://youtu.be/abc").settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some(TRANSPORT_FALLBACK_MESSAGE));
        Ok(())
    }

    #[tokio::test]
    async fn html_error_page_is_a_transport_failure() -> Result<(), Box<dyn std::error::Error>> {
        let controller = PredictionController::new(ScriptedTransport::respond(
            502,
            "<html><body>502 Bad Gateway</body></html>",
        ));

        controller.submit("https://youtu.be/abc").settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some(TRANSPORT_FALLBACK_MESSAGE));
        assert!(!controller.snapshot().loading_visible());
        Ok(())
    }

    #[tokio::test]
    async fn json_error_without_message_uses_server_fallback(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let controller =
            PredictionController::new(ScriptedTransport::respond(500, r#"{"detail":"boom"}"#));

        controller.submit("https://youtu.be/abc").settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some(SERVER_FALLBACK_MESSAGE));
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_uses_fallback_and_hides_loading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let controller = PredictionController::new(ScriptedTransport::unreachable());

        controller.submit("https://youtu.be/abc").settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some(TRANSPORT_FALLBACK_MESSAGE));
        assert!(!snapshot.loading_visible());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_transport_failure(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let controller = PredictionController::new(ScriptedTransport::respond(200, "<html>"));

        controller.submit("https://youtu.be/abc").settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some(TRANSPORT_FALLBACK_MESSAGE));
        Ok(())
    }

    #[tokio::test]
    async fn panicking_task_still_leaves_submitting() {
        let controller = PredictionController::new(Arc::new(PanickingTransport));

        let joined = controller.submit("https://youtu.be/abc").settled().await;
        assert!(joined.is_err());

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some(TRANSPORT_FALLBACK_MESSAGE));
        assert!(!snapshot.loading_visible());
    }

    #[tokio::test]
    async fn resubmitting_clears_previous_result_and_error(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let gated = Arc::new(GatedTransport::default());
        let first = gated.gate("first");
        let second = gated.gate("second");
        let controller = PredictionController::new(gated);

        let submission = controller.submit("first");
        let _ = first.send(Ok(RawResponse::new(200, FULL_BODY)));
        submission.settled().await?;
        assert!(controller.snapshot().result.is_some());

        let submission = controller.submit("second");
        let pending = controller.snapshot();
        assert_eq!(pending.state, SubmissionState::Submitting);
        assert!(pending.result.is_none());
        assert!(pending.error.is_none());
        assert!(pending.completed_at.is_none());

        let _ = second.send(Ok(RawResponse::new(500, r#"{"error":"model offline"}"#)));
        submission.settled().await?;
        let failed = controller.snapshot();
        assert_eq!(failed.error.as_deref(), Some("model offline"));
        assert!(failed.result.is_none());

        let _retry = controller.submit("third");
        let retrying = controller.snapshot();
        assert_eq!(retrying.state, SubmissionState::Submitting);
        assert!(retrying.error.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn stale_success_does_not_overwrite_newer_submission(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let gated = Arc::new(GatedTransport::default());
        let first_gate = gated.gate("first");
        let second_gate = gated.gate("second");
        let controller = PredictionController::new(gated);

        let first = controller.submit("first");
        let second = controller.submit("second");
        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 2);

        let _ = first_gate.send(Ok(RawResponse::new(200, FULL_BODY)));
        first.settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Submitting);
        assert!(snapshot.result.is_none());
        assert_eq!(snapshot.url.as_deref(), Some("second"));

        let _ = second_gate.send(Ok(RawResponse::new(400, r#"{"error":"bad url"}"#)));
        second.settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Failed);
        assert_eq!(snapshot.error.as_deref(), Some("bad url"));
        assert_eq!(snapshot.generation, 2);
        Ok(())
    }

    #[tokio::test]
    async fn stale_failure_after_newer_success_is_dropped(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let gated = Arc::new(GatedTransport::default());
        let first_gate = gated.gate("first");
        let second_gate = gated.gate("second");
        let controller = PredictionController::new(gated);

        let first = controller.submit("first");
        let second = controller.submit("second");

        let _ = second_gate.send(Ok(RawResponse::new(200, FULL_BODY)));
        second.settled().await?;
        let _ = first_gate.send(Err(PredictError::Transport("timed out".to_string())));
        first.settled().await?;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, SubmissionState::Succeeded);
        assert_eq!(snapshot.top_genre(), Some("rock"));
        assert!(snapshot.error.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn subscribers_observe_each_transition() -> Result<(), Box<dyn std::error::Error>> {
        let gated = Arc::new(GatedTransport::default());
        let gate = gated.gate("https://youtu.be/abc");
        let controller = PredictionController::new(gated);
        let mut updates = controller.subscribe();

        let submission = controller.submit("https://youtu.be/abc");
        updates.changed().await?;
        assert_eq!(updates.borrow_and_update().state, SubmissionState::Submitting);

        let _ = gate.send(Ok(RawResponse::new(200, FULL_BODY)));
        updates.changed().await?;
        assert_eq!(updates.borrow_and_update().state, SubmissionState::Succeeded);

        submission.settled().await?;
        Ok(())
    }

    #[test]
    fn resolve_response_classifies_failures() {
        let server = resolve_response(&RawResponse::new(400, r#"{"error":"bad url"}"#));
        assert!(matches!(server, Err(PredictError::Server { status: 400, .. })));

        let unlabeled = resolve_response(&RawResponse::new(500, "{}"));
        assert!(matches!(
            unlabeled,
            Err(PredictError::ServerUnlabeled { status: 500 })
        ));

        let html = resolve_response(&RawResponse::new(502, "<html>Bad Gateway</html>"));
        assert!(matches!(html, Err(PredictError::Transport(_))));

        let ok = resolve_response(&RawResponse::new(200, "{}"));
        assert!(matches!(ok, Ok(result) if result.is_empty()));
    }
}
