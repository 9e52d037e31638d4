use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::ChatProviderConfig;
use crate::errors::{ChatError, ChatResult};
use crate::ingest::Row;

const SYSTEM_PROMPT: &str = "You are a data analysis assistant. Provide clear, \
concise, and accurate responses based on the provided dataset and user prompt. \
Focus on summarizing data, identifying trends, or answering specific questions \
about the dataset.";

/// Number of leading rows included in the prompt as a dataset sample.
const SAMPLE_ROWS: usize = 5;

/// Pass-through to an OpenAI-compatible chat-completions endpoint.
///
/// Provider failures are opaque: anything that goes wrong on the wire or in
/// the response shape becomes `ChatError::Upstream`.
#[derive(Clone)]
pub struct ChatService {
    config: ChatProviderConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ChatService {
    pub fn new(config: ChatProviderConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Ask the provider about the dataset and return the assistant's answer.
    pub async fn answer(
        &self,
        columns: &[String],
        rows: &[Row],
        question: &str,
    ) -> ChatResult<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ChatError::MissingApiKey);
        };

        let context = build_context(columns, rows, question);
        let request = CompletionRequest {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: &context,
                },
            ],
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "chat provider request failed");
                ChatError::Upstream(err.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "chat provider returned an error status");
            return Err(ChatError::Upstream(format!(
                "provider responded with status {}",
                status
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|err| ChatError::Upstream(err.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ChatError::Upstream("provider returned no choices".to_string()))
    }
}

/// Build the analysis prompt from the schema, a sample of the rows and the
/// user's question.
fn build_context(columns: &[String], rows: &[Row], question: &str) -> String {
    let sample: Vec<&Row> = rows.iter().take(SAMPLE_ROWS).collect();
    let sample_json =
        serde_json::to_string_pretty(&sample).unwrap_or_else(|_| Value::Null.to_string());

    format!(
        "You are an AI assistant analyzing a dataset uploaded by the user. \
The dataset has the following columns: {}.\n\
The data contains {} rows. Here is a sample of the data (first {} rows or less \
if fewer rows exist):\n{}\n\n\
The user has provided the following prompt: \"{}\"\n\n\
Provide a concise and accurate response based on the dataset and the user's \
prompt. If the prompt requires data analysis, summarize the relevant \
information or trends from the dataset. Avoid generating code unless \
explicitly requested.",
        columns.join(", "),
        rows.len(),
        SAMPLE_ROWS,
        sample_json,
        question,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn context_includes_schema_sample_and_question() {
        let columns = vec!["name".to_string(), "score".to_string()];
        let rows: Vec<Row> = (0..8)
            .map(|i| {
                let mut row = Row::new();
                row.insert("name".to_string(), Value::String(format!("row{}", i)));
                row.insert("score".to_string(), Value::String(i.to_string()));
                row
            })
            .collect();

        let context = build_context(&columns, &rows, "what is the average score?");
        assert!(context.contains("name, score"));
        assert!(context.contains("contains 8 rows"));
        assert!(context.contains("row4"));
        // Only the first five rows are sampled.
        assert!(!context.contains("row5"));
        assert!(context.contains("what is the average score?"));
    }

    #[tokio::test]
    async fn missing_api_key_is_reported() {
        let service = ChatService::new(ChatProviderConfig::default());
        let err = service.answer(&[], &[], "hello").await.unwrap_err();
        assert!(matches!(err, ChatError::MissingApiKey));
    }
}
