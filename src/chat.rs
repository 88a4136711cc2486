//! Conversation core
//!
//! Per turn: the user input is appended to the session transcript, the
//! resolver answers it (demo override table first, model second), the reply
//! is trimmed to two sentences, appended, and the transcript is cut back to
//! its bound.

mod config;
mod error;
mod export;
mod overrides;
#[cfg(test)]
mod proptests;
mod resolver;
mod session;
mod summary;
mod transcript;
mod trimmer;

pub use config::{
    ChatSettings, ConfigUpdate, GenerationConfig, PromptTemplate, TokenBounds, PROMPT_TEMPLATES,
};
pub use error::ChatError;
pub use export::ExportFormat;
pub use overrides::DemoOverrideTable;
pub use resolver::{Resolution, ResponseResolver};
pub use session::{Session, SessionManager, SessionPhase, SessionSummary, TurnOutcome};
pub use summary::SUMMARY_FAILURE_LABEL;
pub use transcript::Turn;
