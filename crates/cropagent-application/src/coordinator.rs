//! Fetch coordination with per-stream staleness tokens.
//!
//! Every refresh mints a token on its stream, stamped with a sequence
//! number shared by both streams. When the request completes, its result
//! updates the canonical report only if its token is still the newest one
//! minted on that stream and no later-issued reply from the other stream
//! has been applied; otherwise the result is superseded. Completion order
//! never matters, only mint order.

use cropagent_core::backend::AnalysisBackend;
use cropagent_core::error::{CropAgentError, Result};
use cropagent_core::report::{AggregatedReport, AnalysisRequest, AnalysisResponse};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;
use tokio::sync::{RwLock, watch};

/// Independent request streams sharing the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RefreshStream {
    /// Selection-driven refreshes of the dashboard panels.
    Dashboard,
    /// Free-text questions from the chat.
    Chat,
}

/// Per-stream generation plus the issue sequence across both streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequestToken {
    stream: RefreshStream,
    generation: u64,
    sequence: u64,
}

/// What happened to one refresh, as seen by its initiator.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// Newest on its stream and successful: now the canonical report.
    Applied(Arc<AggregatedReport>),
    /// Newest on its stream but failed; the canonical report is untouched.
    Failed(CropAgentError),
    /// A newer refresh was started on the same stream, or a later-issued
    /// refresh on the other stream was already applied. The result is handed
    /// back but did not touch canonical state.
    Superseded(Result<Arc<AggregatedReport>>),
}

impl RefreshOutcome {
    /// Returns true if this refresh replaced the canonical report.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Returns true if a newer refresh made this one irrelevant.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded(_))
    }

    /// The reply carried by this outcome, applied or not.
    pub fn report(&self) -> Option<&Arc<AggregatedReport>> {
        match self {
            Self::Applied(report) | Self::Superseded(Ok(report)) => Some(report),
            Self::Failed(_) | Self::Superseded(Err(_)) => None,
        }
    }

    /// The failure carried by this outcome, applied or not.
    pub fn error(&self) -> Option<&CropAgentError> {
        match self {
            Self::Failed(err) | Self::Superseded(Err(err)) => Some(err),
            Self::Applied(_) | Self::Superseded(Ok(_)) => None,
        }
    }
}

/// Immutable view of the coordinator's canonical state.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorSnapshot {
    pub report: Option<Arc<AggregatedReport>>,
    pub dashboard_loading: bool,
    pub chat_loading: bool,
    /// Error of the newest failed refresh, cleared by the next applied one.
    pub last_error: Option<CropAgentError>,
}

impl CoordinatorSnapshot {
    pub fn is_loading(&self, stream: RefreshStream) -> bool {
        match stream {
            RefreshStream::Dashboard => self.dashboard_loading,
            RefreshStream::Chat => self.chat_loading,
        }
    }
}

#[derive(Debug, Default)]
struct StreamState {
    latest: u64,
    /// Issue sequence of the newest token on this stream.
    sequence: u64,
    loading: bool,
}

#[derive(Debug, Default)]
struct CoordinatorState {
    dashboard: StreamState,
    chat: StreamState,
    issued: u64,
    current: Option<Arc<AggregatedReport>>,
    /// Issue sequence of the request that produced `current`.
    current_sequence: u64,
    last_error: Option<CropAgentError>,
    last_dashboard_request: Option<AnalysisRequest>,
}

impl CoordinatorState {
    fn stream(&self, stream: RefreshStream) -> &StreamState {
        match stream {
            RefreshStream::Dashboard => &self.dashboard,
            RefreshStream::Chat => &self.chat,
        }
    }

    fn stream_mut(&mut self, stream: RefreshStream) -> &mut StreamState {
        match stream {
            RefreshStream::Dashboard => &mut self.dashboard,
            RefreshStream::Chat => &mut self.chat,
        }
    }

    fn mint(&mut self, stream: RefreshStream) -> RequestToken {
        self.issued += 1;
        let sequence = self.issued;
        let state = self.stream_mut(stream);
        state.latest += 1;
        state.sequence = sequence;
        state.loading = true;
        RequestToken {
            stream,
            generation: state.latest,
            sequence,
        }
    }

    fn is_latest(&self, token: RequestToken) -> bool {
        self.stream(token.stream).latest == token.generation
    }

    fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            report: self.current.clone(),
            dashboard_loading: self.dashboard.loading,
            chat_loading: self.chat.loading,
            last_error: self.last_error.clone(),
        }
    }
}

/// Owns the canonical current report and decides which replies may
/// replace it.
///
/// State lives behind a `RwLock` that is never held across an await;
/// readers get snapshots through [`snapshot`](Self::snapshot) or a watch
/// subscription.
pub struct FetchCoordinator {
    backend: Arc<dyn AnalysisBackend>,
    timeout: Duration,
    state: RwLock<CoordinatorState>,
    published: watch::Sender<CoordinatorSnapshot>,
}

impl FetchCoordinator {
    /// Creates a coordinator issuing requests through `backend`, each
    /// bounded by `timeout`.
    pub fn new(backend: Arc<dyn AnalysisBackend>, timeout: Duration) -> Self {
        let (published, _) = watch::channel(CoordinatorSnapshot::default());
        Self {
            backend,
            timeout,
            state: RwLock::new(CoordinatorState::default()),
            published,
        }
    }

    /// Bound applied to every request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Transport the coordinator issues requests through.
    pub fn backend(&self) -> &Arc<dyn AnalysisBackend> {
        &self.backend
    }

    /// Latest published state.
    pub fn snapshot(&self) -> CoordinatorSnapshot {
        self.published.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorSnapshot> {
        self.published.subscribe()
    }

    /// The canonical report, if any refresh has been applied.
    pub fn current_report(&self) -> Option<Arc<AggregatedReport>> {
        self.published.borrow().report.clone()
    }

    /// Returns true while the newest refresh on `stream` is pending.
    pub fn is_loading(&self, stream: RefreshStream) -> bool {
        self.published.borrow().is_loading(stream)
    }

    /// Issues `request` on `stream` and settles its result.
    ///
    /// There is no retry. A request exceeding the configured timeout
    /// completes with a `Timeout` error.
    pub async fn refresh(&self, stream: RefreshStream, request: AnalysisRequest) -> RefreshOutcome {
        let token = {
            let mut state = self.state.write().await;
            let token = state.mint(stream);
            if stream == RefreshStream::Dashboard {
                state.last_dashboard_request = Some(request.clone());
            }
            self.publish(&state);
            token
        };
        tracing::debug!(
            "[FetchCoordinator] {} #{} started (state={:?}, crop={:?})",
            stream,
            token.generation,
            request.state,
            request.crop
        );

        let result = match tokio::time::timeout(self.timeout, self.backend.analyze(&request)).await
        {
            Ok(result) => result.map(|response| Arc::new(response.response)),
            Err(_) => Err(CropAgentError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        };

        self.settle(token, result).await
    }

    async fn settle(
        &self,
        token: RequestToken,
        result: Result<Arc<AggregatedReport>>,
    ) -> RefreshOutcome {
        let mut state = self.state.write().await;

        if !state.is_latest(token) {
            tracing::debug!(
                "[FetchCoordinator] {} #{} superseded, result discarded",
                token.stream,
                token.generation
            );
            return RefreshOutcome::Superseded(result);
        }

        state.stream_mut(token.stream).loading = false;
        if token.sequence < state.current_sequence {
            tracing::debug!(
                "[FetchCoordinator] {} #{} outdated by a later-issued report, result discarded",
                token.stream,
                token.generation
            );
            self.publish(&state);
            return RefreshOutcome::Superseded(result);
        }

        let outcome = match result {
            Ok(report) => {
                tracing::info!(
                    "[FetchCoordinator] {} #{} applied",
                    token.stream,
                    token.generation
                );
                state.current = Some(report.clone());
                state.current_sequence = token.sequence;
                state.last_error = None;
                RefreshOutcome::Applied(report)
            }
            Err(err) => {
                tracing::warn!(
                    "[FetchCoordinator] {} #{} failed: {}",
                    token.stream,
                    token.generation,
                    err
                );
                state.last_error = Some(err.clone());
                RefreshOutcome::Failed(err)
            }
        };
        self.publish(&state);
        outcome
    }

    /// Applies a report pushed by the real-time channel.
    ///
    /// A push counts as a reply to the newest dashboard refresh. It is
    /// applied only when no dashboard refresh is pending, it answers the
    /// last dashboard request (region, crop and language), and no
    /// later-issued chat reply is on display.
    ///
    /// # Returns
    ///
    /// `true` if the push replaced the canonical report.
    pub async fn apply_push(&self, response: AnalysisResponse) -> bool {
        let mut state = self.state.write().await;

        if state.dashboard.loading {
            tracing::debug!("[FetchCoordinator] Push discarded: dashboard refresh pending");
            return false;
        }
        let matches = state
            .last_dashboard_request
            .as_ref()
            .is_some_and(|r| r.answered_by(&response));
        if !matches {
            tracing::debug!(
                "[FetchCoordinator] Push discarded: targets state={:?} crop={:?} language={:?}",
                response.state,
                response.crop,
                response.language
            );
            return false;
        }
        if state.dashboard.sequence < state.current_sequence {
            tracing::debug!("[FetchCoordinator] Push discarded: a later chat reply is on display");
            return false;
        }
        if !response.success {
            tracing::warn!(
                "[FetchCoordinator] Push discarded: backend failure {:?}",
                response.error
            );
            return false;
        }

        tracing::info!("[FetchCoordinator] Push applied");
        state.current = Some(Arc::new(response.response));
        state.current_sequence = state.dashboard.sequence;
        state.last_error = None;
        self.publish(&state);
        true
    }

    fn publish(&self, state: &CoordinatorState) {
        self.published.send_replace(state.snapshot());
    }
}
