//! Dashboard session: the orchestration entry point a UI drives.
//!
//! Ties the selection, the fetch coordinator, the chat timeline and the
//! prefetched snapshots together, and turns user intents (pick a region,
//! ask a question) into refreshes.

use crate::coordinator::{CoordinatorSnapshot, FetchCoordinator, RefreshOutcome, RefreshStream};
use cropagent_core::backend::AnalysisBackend;
use cropagent_core::chat::{ChatMessage, ChatTimeline};
use cropagent_core::config::DashboardConfig;
use cropagent_core::error::{CropAgentError, Result};
use cropagent_core::i18n::{self, StaticTranslations, Translations};
use cropagent_core::region::RegionCatalog;
use cropagent_core::report::{AnalysisRequest, Prefetched};
use cropagent_core::selection::{Language, Selection, SelectionChanged, SelectionState};
use cropagent_core::view::DashboardView;
use cropagent_interaction::RealtimeReceiver;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};

/// Notifications emitted by the session for a UI to react to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SelectionChanged(SelectionChanged),
    ReportApplied { stream: RefreshStream },
    RefreshFailed { stream: RefreshStream, error: CropAgentError },
    MessageAppended { id: String },
    PushApplied,
}

/// One chat round trip: the question and whatever answered it.
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub question_id: String,
    pub reply_id: String,
    pub outcome: RefreshOutcome,
}

/// A user's dashboard session.
///
/// All methods take `&self`; interior state is guarded by short-lived
/// locks so overlapping calls (e.g. from `tokio::join!`) interleave freely
/// while the coordinator keeps the newest request authoritative.
pub struct DashboardSession {
    selection: RwLock<SelectionState>,
    coordinator: Arc<FetchCoordinator>,
    timeline: RwLock<ChatTimeline>,
    prefetched: RwLock<Prefetched>,
    translations: Arc<dyn Translations>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl DashboardSession {
    /// Creates a session with the config's default selection.
    ///
    /// # Arguments
    ///
    /// * `backend` - Transport to the analysis service
    /// * `catalog` - Supported regions and their crops
    /// * `config` - Timeout and default selection
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        catalog: Arc<RegionCatalog>,
        config: &DashboardConfig,
    ) -> Self {
        let (region, crop) = config.default_selection(&catalog);
        let selection = SelectionState::with_preferences(
            catalog,
            Some(&region),
            Some(&crop),
            config.default_language,
        );

        Self {
            selection: RwLock::new(selection),
            coordinator: Arc::new(FetchCoordinator::new(backend, config.request_timeout())),
            timeline: RwLock::new(ChatTimeline::new()),
            prefetched: RwLock::new(Prefetched::default()),
            translations: Arc::new(StaticTranslations),
            events: None,
        }
    }

    pub fn with_translations(mut self, translations: Arc<dyn Translations>) -> Self {
        self.translations = translations;
        self
    }

    /// Routes session events to `sender`. Sends never block; a dropped
    /// receiver just stops delivery.
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.send(event);
        }
    }

    pub fn coordinator(&self) -> &Arc<FetchCoordinator> {
        &self.coordinator
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        self.coordinator.snapshot()
    }

    pub async fn selection(&self) -> Selection {
        self.selection.read().await.current().clone()
    }

    pub async fn available_crops(&self) -> Vec<String> {
        self.selection.read().await.available_crops().to_vec()
    }

    // ============================================================================
    // Selection intents
    // ============================================================================

    /// Switches region and refreshes the dashboard.
    ///
    /// # Returns
    ///
    /// `None` when the region is unknown or already selected; otherwise the
    /// dashboard refresh outcome.
    pub async fn set_region(&self, region: &str) -> Option<RefreshOutcome> {
        let changed = self.selection.write().await.set_region(region)?;
        Some(self.on_selection_changed(changed).await)
    }

    /// Switches crop within the current region and refreshes the dashboard.
    ///
    /// A crop the region does not grow is ignored.
    pub async fn set_crop(&self, crop: &str) -> Option<RefreshOutcome> {
        let changed = self.selection.write().await.set_crop(crop)?;
        Some(self.on_selection_changed(changed).await)
    }

    /// Like [`set_crop`](Self::set_crop) but reports an invalid crop.
    pub async fn try_set_crop(&self, crop: &str) -> Result<Option<RefreshOutcome>> {
        let changed = self.selection.write().await.try_set_crop(crop)?;
        match changed {
            Some(changed) => Ok(Some(self.on_selection_changed(changed).await)),
            None => Ok(None),
        }
    }

    /// Switches the response language and refreshes the dashboard; region
    /// and crop are unchanged.
    pub async fn set_language(&self, language: Language) -> Option<RefreshOutcome> {
        let changed = self.selection.write().await.set_language(language)?;
        Some(self.on_selection_changed(changed).await)
    }

    async fn on_selection_changed(&self, changed: SelectionChanged) -> RefreshOutcome {
        tracing::debug!(
            "[DashboardSession] Selection changed ({:?}): {} / {} / {}",
            changed.kind,
            changed.selection.region,
            changed.selection.crop,
            changed.selection.language
        );
        self.emit(SessionEvent::SelectionChanged(changed));
        self.refresh_dashboard().await
    }

    // ============================================================================
    // Refreshes
    // ============================================================================

    /// Refreshes the dashboard for the current selection, prefetching the
    /// weather and soil snapshots alongside.
    ///
    /// When the refresh fails the previous snapshots are kept, so the
    /// panels keep showing the last-known-good state.
    pub async fn refresh_dashboard(&self) -> RefreshOutcome {
        let selection = self.selection().await;
        let request = AnalysisRequest::dashboard(&selection);

        let (outcome, snapshots) = tokio::join!(
            self.coordinator.refresh(RefreshStream::Dashboard, request),
            self.prefetch(&selection)
        );
        if matches!(outcome, RefreshOutcome::Failed(_)) {
            tracing::debug!("[DashboardSession] Refresh failed, keeping previous snapshots");
        } else {
            self.store_snapshots(&selection, snapshots).await;
        }
        self.report_outcome(RefreshStream::Dashboard, &outcome);
        outcome
    }

    /// Fetches weather and soil snapshots for `selection`.
    ///
    /// Failures are logged and leave that snapshot empty.
    pub async fn prefetch(&self, selection: &Selection) -> Prefetched {
        let backend = self.coordinator.backend();
        let timeout = self.coordinator.timeout();
        let (weather, soil) = tokio::join!(
            tokio::time::timeout(timeout, backend.weather(&selection.region)),
            tokio::time::timeout(timeout, backend.soil(&selection.region, &selection.crop)),
        );

        Prefetched {
            weather: flatten_prefetch("weather", weather, timeout.as_secs()),
            soil: flatten_prefetch("soil", soil, timeout.as_secs()),
        }
    }

    /// Stores `snapshots` unless the selection moved on while they were
    /// fetched.
    async fn store_snapshots(&self, selection: &Selection, snapshots: Prefetched) {
        let current = self.selection().await;
        if current.region != selection.region || current.crop != selection.crop {
            tracing::debug!(
                "[DashboardSession] Prefetch for {} / {} dropped: selection moved on",
                selection.region,
                selection.crop
            );
            return;
        }

        *self.prefetched.write().await = snapshots;
    }

    fn report_outcome(&self, stream: RefreshStream, outcome: &RefreshOutcome) {
        match outcome {
            RefreshOutcome::Applied(_) => self.emit(SessionEvent::ReportApplied { stream }),
            RefreshOutcome::Failed(error) => self.emit(SessionEvent::RefreshFailed {
                stream,
                error: error.clone(),
            }),
            RefreshOutcome::Superseded(_) => {}
        }
    }

    // ============================================================================
    // Chat
    // ============================================================================

    /// Asks a free-text question scoped to the current selection.
    ///
    /// The question is appended to the timeline before the request leaves.
    /// Its answer (or a failure notice) is linked back to it, even when a
    /// later question was answered first.
    ///
    /// # Returns
    ///
    /// `None` for blank input; otherwise the exchange.
    pub async fn ask(&self, text: &str) -> Option<ChatExchange> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let selection = self.selection().await;
        let question_id = self.timeline.write().await.append_user(text);
        self.emit(SessionEvent::MessageAppended {
            id: question_id.clone(),
        });

        let request = AnalysisRequest::for_selection(text, &selection);
        let outcome = self.coordinator.refresh(RefreshStream::Chat, request).await;
        self.report_outcome(RefreshStream::Chat, &outcome);

        let reply_id = {
            let mut timeline = self.timeline.write().await;
            match outcome.report() {
                Some(report) => {
                    let fallback = self
                        .translations
                        .text(selection.language, i18n::CHAT_FALLBACK_REPLY);
                    timeline.append_agent(report.clone(), fallback, Some(&question_id))
                }
                None => {
                    let notice = self
                        .translations
                        .text(selection.language, i18n::CHAT_REQUEST_FAILED);
                    timeline.append_notice(notice, Some(&question_id))
                }
            }
        };
        self.emit(SessionEvent::MessageAppended {
            id: reply_id.clone(),
        });

        Some(ChatExchange {
            question_id,
            reply_id,
            outcome,
        })
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.timeline.read().await.messages().to_vec()
    }

    /// Greeting shown while the timeline is empty.
    pub async fn welcome_text(&self) -> String {
        let language = self.selection.read().await.language();
        self.translations
            .text(language, i18n::CHAT_WELCOME)
            .to_string()
    }

    // ============================================================================
    // Views and push updates
    // ============================================================================

    /// Derives every panel from the canonical report and prefetched
    /// snapshots.
    pub async fn view(&self) -> DashboardView {
        let report = self.coordinator.current_report();
        let (region, catalog) = {
            let selection = self.selection.read().await;
            (selection.region().to_string(), selection.catalog().clone())
        };
        let prefetched = self.prefetched.read().await.clone();
        DashboardView::derive(report.as_deref(), &prefetched, &catalog, &region)
    }

    /// Feeds real-time results into the coordinator until the channel ends.
    ///
    /// Undecodable frames are skipped; a realtime error ends the loop.
    pub async fn run_push_loop(&self, mut inbound: RealtimeReceiver) -> Result<()> {
        while let Some(item) = inbound.recv().await {
            match item {
                Ok(response) => {
                    if self.coordinator.apply_push(response).await {
                        self.emit(SessionEvent::PushApplied);
                    }
                }
                Err(err @ CropAgentError::Realtime(_)) => {
                    tracing::warn!("[DashboardSession] Realtime channel ended: {}", err);
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!("[DashboardSession] Skipping realtime frame: {}", err);
                }
            }
        }
        Ok(())
    }
}

fn flatten_prefetch<T>(
    what: &str,
    result: std::result::Result<Result<T>, tokio::time::error::Elapsed>,
    seconds: u64,
) -> Option<T> {
    match result {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            tracing::warn!("[DashboardSession] {} prefetch failed: {}", what, err);
            None
        }
        Err(_) => {
            tracing::warn!(
                "[DashboardSession] {} prefetch failed: {}",
                what,
                CropAgentError::Timeout { seconds }
            );
            None
        }
    }
}
