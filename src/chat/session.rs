//! Chat sessions and their lifecycle
//!
//! A session owns its transcript and generation config outright. Sessions are
//! created on the first request that names them and destroyed on clear, which
//! returns the id to the `Uninitialized` phase.

use super::config::{ChatSettings, ConfigUpdate, GenerationConfig, SessionConfig, TokenBounds};
use super::export::{self, ExportFormat};
use super::resolver::{ReplySource, Resolution, ResponseResolver};
use super::transcript::{Role, TranscriptStore, Turn};
use super::{summary, trimmer, ChatError};
use crate::llm::LlmErrorKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Result of one user turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// Text stored as the assistant turn
    pub reply: String,
    pub source: ReplySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<LlmErrorKind>,
}

/// One conversation
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    transcript: TranscriptStore,
    config: SessionConfig,
    trim_replies: bool,
}

impl Session {
    pub fn new(id: Uuid, settings: &ChatSettings) -> Self {
        Self {
            id,
            transcript: TranscriptStore::new(settings.transcript_bound),
            config: settings.new_session_config(),
            trim_replies: settings.trim_replies,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    pub fn config(&self) -> &GenerationConfig {
        self.config.current()
    }

    pub fn bounds(&self) -> TokenBounds {
        self.config.bounds()
    }

    pub fn update_config(&mut self, update: ConfigUpdate) -> Result<GenerationConfig, ChatError> {
        let updated = self.config.update(update)?.clone();
        tracing::info!(
            session = %self.id,
            model = %updated.model,
            temperature = updated.temperature,
            max_tokens = updated.max_tokens,
            "Session config updated"
        );
        Ok(updated)
    }

    /// Run one exchange: record the input, get a reply, record the reply,
    /// then evict the oldest turns beyond the bound.
    pub async fn take_turn(
        &mut self,
        input: &str,
        resolver: &ResponseResolver,
    ) -> Result<TurnOutcome, ChatError> {
        self.transcript.append(Turn::user(input))?;

        let config = self.config.current().clone();
        let resolution = resolver.resolve(input, &config, &self.transcript).await;

        let reply = match &resolution {
            Resolution::Failed { .. } => resolution.render(),
            Resolution::Canned(text) | Resolution::Generated(text) if self.trim_replies => {
                trimmer::trim(text)
            }
            Resolution::Canned(text) | Resolution::Generated(text) => text.clone(),
        };

        let turn = if resolution.is_failure() {
            Turn::diagnostic(reply.clone())
        } else {
            Turn::assistant(reply.clone())
        };
        self.transcript.append(turn)?;
        self.enforce_bound();

        let error_kind = match &resolution {
            Resolution::Failed { kind, .. } => Some(*kind),
            _ => None,
        };
        tracing::info!(
            session = %self.id,
            source = ?resolution.source(),
            turns = self.transcript.len(),
            "Turn completed"
        );

        Ok(TurnOutcome {
            reply,
            source: resolution.source(),
            error_kind,
        })
    }

    /// Evict to the bound, never leaving an assistant turn without its user turn
    fn enforce_bound(&mut self) {
        self.transcript.enforce_bound();
        if self.transcript.all().next().map(Turn::role) == Some(Role::Assistant) {
            let keep = self.transcript.len() - 1;
            self.transcript.trim_to_bound(keep);
        }
    }

    pub async fn summarize(&self, resolver: &ResponseResolver) -> Result<Resolution, ChatError> {
        summary::summarize(resolver, &self.transcript, self.config.current()).await
    }

    pub fn export(&self, format: ExportFormat) -> Result<String, ChatError> {
        export::render(format, self.transcript.all())
    }

    fn reset(&mut self) {
        self.transcript.clear();
    }
}

/// Session listing entry. A session in the middle of a turn is reported as
/// busy, without turn count or model.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Lifecycle phase of a session id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Ready,
}

/// Handle to a live session; holding the lock makes the holder the only writer
pub type SharedSession = Arc<tokio::sync::Mutex<Session>>;

#[derive(Clone)]
struct SessionSlot {
    created_at: DateTime<Utc>,
    session: SharedSession,
}

/// All live sessions, each fully independent of the others
pub struct SessionManager {
    sessions: Mutex<HashMap<Uuid, SessionSlot>>,
    settings: ChatSettings,
}

impl SessionManager {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            settings,
        }
    }

    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, SessionSlot>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a session under a fresh id
    pub fn create(&self) -> (Uuid, SharedSession) {
        self.get_or_create(None)
    }

    /// Return the session for `requested`, creating it if the id is unknown.
    /// `None` always creates a session under a new id.
    pub fn get_or_create(&self, requested: Option<Uuid>) -> (Uuid, SharedSession) {
        let mut sessions = self.map();
        if let Some(id) = requested {
            if let Some(existing) = sessions.get(&id) {
                return (id, existing.session.clone());
            }
        }

        let id = requested.unwrap_or_else(Uuid::new_v4);
        let session = Arc::new(tokio::sync::Mutex::new(Session::new(id, &self.settings)));
        sessions.insert(
            id,
            SessionSlot {
                created_at: Utc::now(),
                session: session.clone(),
            },
        );
        tracing::info!(session = %id, "Session created");
        (id, session)
    }

    pub fn get(&self, id: Uuid) -> Result<SharedSession, ChatError> {
        self.map()
            .get(&id)
            .map(|slot| slot.session.clone())
            .ok_or(ChatError::SessionNotFound(id))
    }

    pub fn phase(&self, id: Uuid) -> SessionPhase {
        if self.map().contains_key(&id) {
            SessionPhase::Ready
        } else {
            SessionPhase::Uninitialized
        }
    }

    /// Empty the session's transcript and destroy it
    pub async fn clear(&self, id: Uuid) -> Result<(), ChatError> {
        let slot = self
            .map()
            .remove(&id)
            .ok_or(ChatError::SessionNotFound(id))?;
        slot.session.lock().await.reset();
        tracing::info!(session = %id, "Session cleared");
        Ok(())
    }

    /// Snapshot of every session without waiting on turns in progress
    pub fn list(&self) -> Vec<SessionSummary> {
        let slots: Vec<(Uuid, SessionSlot)> = self
            .map()
            .iter()
            .map(|(id, slot)| (*id, slot.clone()))
            .collect();

        let mut summaries: Vec<SessionSummary> = slots
            .into_iter()
            .map(|(id, slot)| {
                let current = slot.session.try_lock().ok().map(|session| {
                    (session.transcript().len(), session.config().model.clone())
                });
                SessionSummary {
                    id,
                    created_at: slot.created_at,
                    busy: current.is_none(),
                    turns: current.as_ref().map(|(turns, _)| *turns),
                    model: current.map(|(_, model)| model),
                }
            })
            .collect();
        summaries.sort_by_key(|s| s.created_at);
        summaries
    }
}
