//! Request and response records exchanged with the extension

use serde::{Deserialize, Serialize};

use crate::prompts::PromptKind;

/// Confidence assumed when the model leaves it out
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

fn default_feature() -> String {
    PromptKind::GrammarCheck.id().to_string()
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarCheckRequest {
    pub text: String,
    /// Grammar-family template id; unknown ids use grammar_check
    #[serde(default = "default_feature")]
    pub feature: String,
}

/// One proposed correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub original_text: String,
    pub corrected_text: String,
    pub explanation: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarCheckResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub has_errors: bool,
}

impl GrammarCheckResponse {
    /// What a malformed model reply degrades to
    pub fn no_issues() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInsightRequest {
    pub text: String,
    /// Kept as a string so unknown actions get a 400 listing the valid ones
    pub action: String,
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInsightResponse {
    pub original_text: String,
    pub action: String,
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// A model the API key can generate content with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub input_token_limit: Option<u32>,
    pub output_token_limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub current_model: String,
    pub count: usize,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_defaults_to_grammar_check() {
        let request: GrammarCheckRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(request.feature, "grammar_check");
    }

    #[test]
    fn test_suggestion_confidence_default() {
        let suggestion: Suggestion = serde_json::from_str(
            r#"{"original_text": "are", "corrected_text": "is", "explanation": "agreement"}"#,
        )
        .unwrap();
        assert_eq!(suggestion.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_insight_response_omits_missing_custom_prompt() {
        let response = TextInsightResponse {
            original_text: "x".to_string(),
            action: "explain".to_string(),
            result: "y".to_string(),
            custom_prompt: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("custom_prompt").is_none());
    }
}
