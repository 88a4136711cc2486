//! Conversation summaries produced by the model

use super::config::GenerationConfig;
use super::export::to_plain_text;
use super::resolver::{generation_request, Resolution, ResponseResolver};
use super::transcript::TranscriptStore;
use super::ChatError;
use crate::llm::LlmMessage;

const SUMMARY_INSTRUCTION: &str = "Summarize the following conversation:";

/// Label used when rendering a failed summary
pub const SUMMARY_FAILURE_LABEL: &str = "Error while summarizing";

pub fn summary_prompt(transcript: &TranscriptStore) -> String {
    format!("{SUMMARY_INSTRUCTION}\n{}", to_plain_text(transcript.all()))
}

/// Ask the model to summarize `transcript`.
///
/// The transcript is not modified. Remote failures come back as
/// [`Resolution::Failed`]; only an empty transcript is an error.
pub async fn summarize(
    resolver: &ResponseResolver,
    transcript: &TranscriptStore,
    config: &GenerationConfig,
) -> Result<Resolution, ChatError> {
    if transcript.is_empty() {
        return Err(ChatError::EmptyTranscript);
    }

    let request = generation_request(config, vec![LlmMessage::user(summary_prompt(transcript))]);
    Ok(resolver.complete(config, &request).await)
}
