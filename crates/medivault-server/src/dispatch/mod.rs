// crates/medivault-server/src/dispatch/mod.rs
// Query dispatch: the encrypt/search/decrypt pipeline behind one chat submit

mod backend;
mod client;

pub use backend::{MockBackend, QueryBackend};
pub use client::{ProxyClient, QUERY_PATH};

use medivault_types::{
    AuditAction, AuditStatus, EncryptionStatus, Message, MessageRole, PerformanceMetric,
    SearchResult, SearchSource,
};
use rand::Rng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::audit::AuditLog;
use crate::error::{MediVaultError, Result};
use crate::metrics::MetricsLog;
use crate::state::{AuthStore, ChatStore, SettingsStore, derive_title};

/// Assistant text recorded when generation fails
pub const APOLOGY: &str = "I apologize, but I encountered an error processing your request. \
Please try again.";

/// Artificial pipeline delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTimings {
    /// Each phase delay is drawn uniformly from `phase_min..=phase_max`
    pub phase_min: Duration,
    pub phase_max: Duration,
    /// How long `complete` is shown before returning to `idle`
    pub complete_hold: Duration,
}

impl Default for DispatchTimings {
    fn default() -> Self {
        Self {
            phase_min: Duration::from_millis(300),
            phase_max: Duration::from_millis(500),
            complete_hold: Duration::from_millis(1500),
        }
    }
}

impl DispatchTimings {
    /// No delays at all
    pub fn instant() -> Self {
        Self {
            phase_min: Duration::ZERO,
            phase_max: Duration::ZERO,
            complete_hold: Duration::ZERO,
        }
    }

    fn phase_delay(&self) -> Duration {
        if self.phase_max <= self.phase_min {
            return self.phase_min;
        }
        let min = self.phase_min.as_millis() as u64;
        let max = self.phase_max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

/// What the search step produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Results came from the encrypted vector store
    Encrypted,
    /// Demo records or no search at all
    Demo,
    /// The search call failed; generation ran without context
    Unavailable,
}

impl From<SearchSource> for SearchStatus {
    fn from(source: SearchSource) -> Self {
        match source {
            SearchSource::Cyborgdb => SearchStatus::Encrypted,
            SearchSource::Demo => SearchStatus::Demo,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// Blank query or no active conversation; nothing was recorded
    Ignored,
    Answered {
        conversation_id: String,
        answer: Message,
        metric: PerformanceMetric,
        search: SearchStatus,
        records: usize,
    },
    /// Generation failed; the apology was recorded instead
    Failed {
        conversation_id: String,
        message: Message,
        search: SearchStatus,
        error: String,
    },
}

impl DispatchOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, DispatchOutcome::Answered { .. })
    }
}

/// Runs chat submits against a backend and records their side effects.
///
/// One phase channel is shared by every conversation, matching the single
/// status indicator it feeds.
#[derive(Clone)]
pub struct QueryDispatcher {
    backend: Arc<dyn QueryBackend>,
    chat: ChatStore,
    auth: AuthStore,
    settings: SettingsStore,
    metrics: MetricsLog,
    audit: AuditLog,
    timings: DispatchTimings,
    phase: Arc<watch::Sender<EncryptionStatus>>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl std::fmt::Debug for QueryDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryDispatcher")
            .field("backend", &self.backend.name())
            .field("timings", &self.timings)
            .field("phase", &*self.phase.borrow())
            .finish_non_exhaustive()
    }
}

/// Stores the dispatcher reads from and records into
#[derive(Debug, Clone)]
pub struct DispatchStores {
    pub chat: ChatStore,
    pub auth: AuthStore,
    pub settings: SettingsStore,
    pub metrics: MetricsLog,
    pub audit: AuditLog,
}

impl QueryDispatcher {
    pub fn new(
        backend: Arc<dyn QueryBackend>,
        stores: DispatchStores,
        timings: DispatchTimings,
    ) -> Self {
        let (phase, _) = watch::channel(EncryptionStatus::Idle);
        Self {
            backend,
            chat: stores.chat,
            auth: stores.auth,
            settings: stores.settings,
            metrics: stores.metrics,
            audit: stores.audit,
            timings,
            phase: Arc::new(phase),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Observe phase changes
    pub fn subscribe(&self) -> watch::Receiver<EncryptionStatus> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> EncryptionStatus {
        *self.phase.borrow()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Submit `query` to the active conversation.
    ///
    /// Fails with `QueryInFlight` when that conversation already has a
    /// submit running; nothing is recorded in that case.
    #[instrument(skip(self, query), fields(backend = self.backend.name()))]
    pub async fn submit(&self, query: &str) -> Result<DispatchOutcome> {
        if query.trim().is_empty() {
            debug!("Blank query ignored");
            return Ok(DispatchOutcome::Ignored);
        }
        let Some(conversation_id) = self.chat.active_id().await else {
            debug!("No active conversation, query ignored");
            return Ok(DispatchOutcome::Ignored);
        };

        let _guard = InFlightGuard::acquire(&self.in_flight, &conversation_id)?;

        let result = self.run(&conversation_id, query).await;
        if result.is_err() {
            self.set_phase(EncryptionStatus::Idle);
        }
        result
    }

    async fn run(&self, conversation_id: &str, query: &str) -> Result<DispatchOutcome> {
        self.chat
            .add_message(conversation_id, MessageRole::User, query)
            .await?;
        let role = self.auth.role().await;
        let actor = self.auth.actor().await;
        let encryption = self.settings.get().encryption_level.label();

        self.set_phase(EncryptionStatus::Encrypting);
        self.pause().await;

        self.set_phase(EncryptionStatus::Searching);
        let (context, search): (Vec<SearchResult>, SearchStatus) =
            match self.backend.search(query, role).await {
                Ok(response) => (response.results, response.source.into()),
                Err(e) => {
                    warn!(error = %e, "Search failed, continuing without context");
                    (Vec::new(), SearchStatus::Unavailable)
                }
            };

        self.set_phase(EncryptionStatus::Decrypting);
        self.pause().await;

        let description = format!("Query: {}", derive_title(query));
        match self.backend.generate(query, &context, role).await {
            Ok(text) => {
                let answer = self
                    .chat
                    .add_message(conversation_id, MessageRole::Assistant, &text)
                    .await?;
                let records_searched = match search {
                    SearchStatus::Unavailable => None,
                    _ => Some(context.len() as u32),
                };
                let metric = self.metrics.record_query(records_searched);
                self.audit.record(
                    &actor,
                    AuditAction::Query,
                    description,
                    encryption,
                    AuditStatus::Success,
                );

                self.set_phase(EncryptionStatus::Complete);
                if !self.timings.complete_hold.is_zero() {
                    tokio::time::sleep(self.timings.complete_hold).await;
                }
                self.set_phase(EncryptionStatus::Idle);

                info!(
                    conversation = conversation_id,
                    records = context.len(),
                    ?search,
                    "Query answered"
                );
                Ok(DispatchOutcome::Answered {
                    conversation_id: conversation_id.to_string(),
                    answer,
                    metric,
                    search,
                    records: context.len(),
                })
            }
            Err(e) => {
                warn!(error = %e, "Generate failed");
                let message = self
                    .chat
                    .add_message(conversation_id, MessageRole::Assistant, APOLOGY)
                    .await?;
                self.audit.record(
                    &actor,
                    AuditAction::Query,
                    description,
                    encryption,
                    AuditStatus::Failed,
                );
                self.set_phase(EncryptionStatus::Idle);

                Ok(DispatchOutcome::Failed {
                    conversation_id: conversation_id.to_string(),
                    message,
                    search,
                    error: e.to_string(),
                })
            }
        }
    }

    fn set_phase(&self, phase: EncryptionStatus) {
        debug!(%phase, "Dispatch phase");
        self.phase.send_replace(phase);
    }

    async fn pause(&self) {
        let delay = self.timings.phase_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Marks a conversation busy until dropped
struct InFlightGuard {
    set: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl InFlightGuard {
    fn acquire(set: &Arc<Mutex<HashSet<String>>>, id: &str) -> Result<Self> {
        let mut busy = set
            .lock()
            .map_err(|_| MediVaultError::Other("in-flight lock poisoned".to_string()))?;
        if !busy.insert(id.to_string()) {
            return Err(MediVaultError::QueryInFlight(id.to_string()));
        }
        Ok(Self {
            set: Arc::clone(set),
            id: id.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut busy) = self.set.lock() {
            busy.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StaticPermission;
    use async_trait::async_trait;
    use medivault_types::{Role, SearchResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingBackend {
        fail_search: bool,
    }

    #[async_trait]
    impl QueryBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn search(&self, _query: &str, _role: Role) -> Result<SearchResponse> {
            if self.fail_search {
                return Err(MediVaultError::Other("search down".into()));
            }
            Ok(SearchResponse {
                results: Vec::new(),
                source: SearchSource::Demo,
                message: None,
            })
        }

        async fn generate(&self, _q: &str, _c: &[SearchResult], _r: Role) -> Result<String> {
            Err(MediVaultError::Upstream {
                status: 500,
                message: "gateway down".into(),
            })
        }
    }

    /// Counts searches and blocks generate until released
    struct GatedBackend {
        searches: AtomicUsize,
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl QueryBackend for GatedBackend {
        fn name(&self) -> &'static str {
            "gated"
        }

        async fn search(&self, _query: &str, _role: Role) -> Result<SearchResponse> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(SearchResponse {
                results: Vec::new(),
                source: SearchSource::Demo,
                message: None,
            })
        }

        async fn generate(&self, _q: &str, _c: &[SearchResult], _r: Role) -> Result<String> {
            self.release.notified().await;
            Ok("done".into())
        }
    }

    fn stores(dir: &tempfile::TempDir) -> DispatchStores {
        let audit = AuditLog::new();
        DispatchStores {
            chat: ChatStore::new(),
            auth: AuthStore::new(audit.clone()),
            settings: SettingsStore::load(
                dir.path().join("settings.json"),
                Arc::new(StaticPermission(true)),
            ),
            metrics: MetricsLog::new(),
            audit,
        }
    }

    fn dispatcher(backend: Arc<dyn QueryBackend>, stores: DispatchStores) -> QueryDispatcher {
        QueryDispatcher::new(backend, stores, DispatchTimings::instant())
    }

    #[test]
    fn test_default_timings() {
        let timings = DispatchTimings::default();
        for _ in 0..50 {
            let d = timings.phase_delay();
            assert!(d >= Duration::from_millis(300) && d <= Duration::from_millis(500));
        }
        assert_eq!(timings.complete_hold, Duration::from_millis(1500));
        assert_eq!(DispatchTimings::instant().phase_delay(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_blank_query_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let stores = stores(&dir);
        let chat = stores.chat.clone();
        let dispatcher = dispatcher(Arc::new(MockBackend), stores);
        chat.new_conversation().await;

        let outcome = dispatcher.submit("   ").await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Ignored));
        assert!(chat.active().await.unwrap().messages.is_empty());
    }

    #[tokio::test]
    async fn test_no_active_conversation_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(Arc::new(MockBackend), stores(&dir));
        let outcome = dispatcher.submit("diabetes").await.unwrap();
        assert!(matches!(outcome, DispatchOutcome::Ignored));
    }

    #[tokio::test]
    async fn test_mock_backend_answers() {
        let dir = tempfile::tempdir().unwrap();
        let stores = stores(&dir);
        let (chat, metrics, audit) = (stores.chat.clone(), stores.metrics.clone(), stores.audit.clone());
        let dispatcher = dispatcher(Arc::new(MockBackend), stores);
        let mut phases = dispatcher.subscribe();
        chat.new_conversation().await;

        let outcome = dispatcher.submit("Any drug interactions?").await.unwrap();
        assert!(outcome.is_answered());
        assert_eq!(dispatcher.phase(), EncryptionStatus::Idle);
        assert!(phases.has_changed().unwrap());
        assert_eq!(*phases.borrow_and_update(), EncryptionStatus::Idle);

        let conversation = chat.active().await.unwrap();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.title, "Any drug interactions?");
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics.latest().unwrap().records_searched, 0);

        let entries = audit.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Query);
        assert_eq!(entries[0].status, AuditStatus::Success);
    }

    #[tokio::test]
    async fn test_generate_failure_records_apology() {
        let dir = tempfile::tempdir().unwrap();
        let stores = stores(&dir);
        let (chat, metrics, audit) = (stores.chat.clone(), stores.metrics.clone(), stores.audit.clone());
        let dispatcher = dispatcher(Arc::new(FailingBackend { fail_search: true }), stores);
        chat.new_conversation().await;

        let outcome = dispatcher.submit("diabetes").await.unwrap();
        match outcome {
            DispatchOutcome::Failed { message, search, .. } => {
                assert_eq!(message.content, APOLOGY);
                assert_eq!(search, SearchStatus::Unavailable);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(dispatcher.phase(), EncryptionStatus::Idle);
        assert!(metrics.is_empty());
        assert_eq!(audit.entries()[0].status, AuditStatus::Failed);
        assert_eq!(chat.active().await.unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let stores = stores(&dir);
        let chat = stores.chat.clone();
        let backend = Arc::new(GatedBackend {
            searches: AtomicUsize::new(0),
            release: tokio::sync::Notify::new(),
        });
        let dispatcher = dispatcher(backend.clone(), stores);
        chat.new_conversation().await;

        let first = {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.submit("first").await })
        };
        // wait until the first submit is parked in generate
        while backend.searches.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = dispatcher.submit("second").await;
        assert!(matches!(second, Err(MediVaultError::QueryInFlight(_))));
        assert_eq!(chat.active().await.unwrap().messages.len(), 1);

        backend.release.notify_one();
        assert!(first.await.unwrap().unwrap().is_answered());
        assert_eq!(chat.active().await.unwrap().messages.len(), 2);

        // guard released
        backend.release.notify_one();
        assert!(dispatcher.submit("third").await.unwrap().is_answered());
    }
}
