//! Grammar checking and text insights on top of a completion provider
//!
//! Every call is validate → compose → generate → interpret. Validation failures
//! never reach the provider.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::prompts::{self, InsightAction};
use crate::providers::CompletionProvider;
use crate::types::{
    GrammarCheckRequest, GrammarCheckResponse, ModelsResponse, TextInsightRequest,
    TextInsightResponse,
};

const REQUEST_PREVIEW_CHARS: usize = 100;
const REPLY_PREVIEW_CHARS: usize = 200;

/// Stateless request handler shared by every route
#[derive(Clone)]
pub struct Assistant {
    provider: Arc<dyn CompletionProvider>,
}

impl Assistant {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Check `request.text` and return the model's suggestions
    ///
    /// A reply that doesn't decode is reported as "no issues", not as an error.
    pub async fn check_grammar(
        &self,
        request: &GrammarCheckRequest,
    ) -> Result<GrammarCheckResponse> {
        let prompt = prompts::compose_grammar(&request.feature, &request.text)?;

        debug!(
            "Grammar check request ({}): {}",
            request.feature,
            preview(&request.text, REQUEST_PREVIEW_CHARS)
        );

        let reply = self.generate(&prompt).await?;
        debug!("Grammar check response: {}", preview(&reply, REPLY_PREVIEW_CHARS));

        Ok(parse_grammar_reply(&reply).unwrap_or_else(|reason| {
            warn!("Discarding unparseable grammar reply: {}", reason);
            GrammarCheckResponse::no_issues()
        }))
    }

    /// Explain, summarize or run a custom instruction over `request.text`
    pub async fn text_insight(&self, request: &TextInsightRequest) -> Result<TextInsightResponse> {
        prompts::ensure_text(&request.text)?;
        let action: InsightAction = request.action.parse()?;
        let prompt = prompts::compose(
            action.id(),
            &request.text,
            request.custom_prompt.as_deref(),
        )?;

        debug!(
            "Text insights request - action: {}, text: {}",
            action,
            preview(&request.text, REQUEST_PREVIEW_CHARS)
        );

        let reply = self.generate(&prompt).await?;
        debug!("Text insights response: {}", preview(&reply, REPLY_PREVIEW_CHARS));

        Ok(TextInsightResponse {
            original_text: request.text.clone(),
            action: action.id().to_string(),
            result: reply.trim().to_string(),
            custom_prompt: match action {
                InsightAction::Custom => request.custom_prompt.clone(),
                _ => None,
            },
        })
    }

    /// Generation models available to the configured key
    pub async fn list_models(&self) -> Result<ModelsResponse> {
        let models = self.provider.list_models().await?;
        Ok(ModelsResponse {
            count: models.len(),
            models,
            current_model: self.provider.model().to_string(),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let reply = self.provider.generate(prompt).await?;
        if reply.is_empty() {
            return Err(Error::EmptyResponse);
        }
        Ok(reply)
    }
}

/// Remove a surrounding Markdown code fence, with or without a language tag
pub fn strip_code_fence(reply: &str) -> &str {
    let mut body = reply.trim();

    if let Some(rest) = body.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        body = &rest[tag_len..];
    }

    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// Decode a grammar reply into suggestions
///
/// Fails on invalid JSON, a non-object document, or any suggestion missing
/// one of its text fields.
pub fn parse_grammar_reply(reply: &str) -> std::result::Result<GrammarCheckResponse, String> {
    let document: Value =
        serde_json::from_str(strip_code_fence(reply)).map_err(|e| e.to_string())?;

    if !document.is_object() {
        return Err(format!("expected a JSON object, got {}", kind_of(&document)));
    }

    serde_json::from_value(document).map_err(|e| e.to_string())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// At most `max` characters of `text`, for logs
fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DEFAULT_CONFIDENCE, Suggestion};

    const REPLY: &str = r#"{
        "suggestions": [
            {"original_text": "This are", "corrected_text": "This is", "explanation": "Subject-verb agreement", "confidence": 0.97}
        ],
        "has_errors": true
    }"#;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```JSON{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_fenced_and_plain_decode_identically() {
        let plain = parse_grammar_reply(REPLY).unwrap();
        let tagged = parse_grammar_reply(&format!("```json\n{REPLY}\n```")).unwrap();
        let bare = parse_grammar_reply(&format!("```\n{REPLY}\n```")).unwrap();

        assert_eq!(plain, tagged);
        assert_eq!(plain, bare);
        assert!(plain.has_errors);
        assert_eq!(
            plain.suggestions,
            vec![Suggestion {
                original_text: "This are".to_string(),
                corrected_text: "This is".to_string(),
                explanation: "Subject-verb agreement".to_string(),
                confidence: 0.97,
            }]
        );
    }

    #[test]
    fn test_defaults_when_fields_absent() {
        let parsed = parse_grammar_reply(
            r#"{"suggestions": [{"original_text": "a", "corrected_text": "b", "explanation": "c"}]}"#,
        )
        .unwrap();
        assert!(!parsed.has_errors);
        assert_eq!(parsed.suggestions[0].confidence, DEFAULT_CONFIDENCE);

        let empty = parse_grammar_reply("{}").unwrap();
        assert_eq!(empty, GrammarCheckResponse::no_issues());
    }

    #[test]
    fn test_malformed_replies_fail() {
        assert!(parse_grammar_reply("Looks fine to me!").is_err());
        assert!(parse_grammar_reply("[1, 2, 3]").is_err());
        assert!(parse_grammar_reply(r#"{"suggestions": [{"original_text": "a"}]}"#).is_err());
        assert!(parse_grammar_reply(r#"{"suggestions": "none", "has_errors": false}"#).is_err());
        assert!(parse_grammar_reply(r#"{"has_errors": "yes"}"#).is_err());
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo wörld", 5), "héllo...");
        assert_eq!(preview("short", 100), "short");
    }
}
