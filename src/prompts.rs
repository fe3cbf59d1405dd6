//! Prompt templates and composition
//!
//! Each [`PromptKind`] owns a fixed template with a `{text}` slot and, for
//! [`PromptKind::Custom`], a `{custom_prompt}` slot.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const TEXT_SLOT: &str = "text";
const CUSTOM_PROMPT_SLOT: &str = "custom_prompt";

const GRAMMAR_CHECK_TEMPLATE: &str = r#"You are a professional grammar and spelling checker. Analyze the following text and provide corrections.

Text: "{text}"

Please respond in the following JSON format:
{
    "suggestions": [
        {
            "original_text": "exact portion that needs correction",
            "corrected_text": "corrected version",
            "explanation": "brief explanation of the error",
            "confidence": 0.95
        }
    ],
    "has_errors": true/false
}

IMPORTANT RULES:
1. Only suggest corrections for actual grammar, spelling, case or punctuation errors
2. If the text is already correct, return "has_errors": false with an empty suggestions array
3. Keep explanations concise and helpful
4. CRITICAL: When correcting punctuation, be precise and do not add redundant punctuation and NEVER remove all punctuation unless it's truly wrong.
5. Focus on fixing the actual error, preserve correct punctuation
6. When in doubt, preserve existing punctuation rather than removing it
7. IMPORTANT: The "corrected_text" will be used EXACTLY to replace the "original_text" in the user's document. Make sure "corrected_text" contains exactly what should appear in the final text, including all necessary punctuation.
8. If the change is small just try to keep the necessary word(s) which needs to be changed. for example if only one word is wrong, then just give the correct word. If the change is to add a punctuation, then give it with the last word as needed.
9. When there is no lack of context for a sentence, then don't return any suggestion for that.
"#;

const SPELL_CHECK_TEMPLATE: &str = r#"You are a spell checker. Focus only on spelling errors in the following text:

Text: "{text}"

Respond in JSON format with spelling corrections only.
"#;

const IMPROVE_SENTENCE_TEMPLATE: &str = r#"You are a writing assistant. Improve the clarity and flow of this sentence while maintaining its original meaning:

Text: "{text}"

Provide an improved version with explanation.
"#;

const CHANGE_TONE_TEMPLATE: &str = r#"You are a tone adjustment assistant. Modify the tone of this text to be more professional:

Text: "{text}"

Provide the text with adjusted tone.
"#;

const EXPLAIN_TEMPLATE: &str = r#"You are a helpful text explanation assistant. Your task is to explain the given text in a clear, easy-to-understand way.
Break down difficult words, jargon, concepts, or sentences. Provide context where helpful.

Text to explain: "{text}"

Please provide a clear explanation that helps the reader understand:
1. Any difficult or technical words and their meanings
2. The overall meaning of the text
3. Any relevant context that would help understanding

Keep your explanation concise but comprehensive. Aim for clarity over brevity.
"#;

const SUMMARIZE_TEMPLATE: &str = r#"You are a text summarization expert. Your task is to create a concise summary of the given text.
Reduce the text to approximately 10% of its original length while preserving the key information and main ideas.

Text to summarize: "{text}"

Please provide a summary that:
1. Captures the main points and key information
2. Is significantly shorter than the original (aim for ~10% of original length)
3. Maintains the essential meaning and context
4. Is written in clear, accessible language

Focus on the most important information and omit unnecessary details.
"#;

const CUSTOM_TEMPLATE: &str = r#"You are a helpful AI assistant. The user has selected some text and wants you to perform a specific action on it.

Selected text: "{text}"
User's request: "{custom_prompt}"

Please respond to the user's request regarding the selected text. Be helpful, accurate, and concise.
"#;

/// Every template the service knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    GrammarCheck,
    SpellCheck,
    ImproveSentence,
    ChangeTone,
    Explain,
    Summarize,
    Custom,
}

impl PromptKind {
    pub fn id(&self) -> &'static str {
        match self {
            Self::GrammarCheck => "grammar_check",
            Self::SpellCheck => "spell_check",
            Self::ImproveSentence => "improve_sentence",
            Self::ChangeTone => "change_tone",
            Self::Explain => "explain",
            Self::Summarize => "summarize",
            Self::Custom => "custom",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Self::GrammarCheck => GRAMMAR_CHECK_TEMPLATE,
            Self::SpellCheck => SPELL_CHECK_TEMPLATE,
            Self::ImproveSentence => IMPROVE_SENTENCE_TEMPLATE,
            Self::ChangeTone => CHANGE_TONE_TEMPLATE,
            Self::Explain => EXPLAIN_TEMPLATE,
            Self::Summarize => SUMMARIZE_TEMPLATE,
            Self::Custom => CUSTOM_TEMPLATE,
        }
    }

    pub fn all() -> &'static [PromptKind] {
        &[
            PromptKind::GrammarCheck,
            PromptKind::SpellCheck,
            PromptKind::ImproveSentence,
            PromptKind::ChangeTone,
            PromptKind::Explain,
            PromptKind::Summarize,
            PromptKind::Custom,
        ]
    }

    /// Templates that answer with a suggestions document
    pub fn is_grammar_family(&self) -> bool {
        matches!(
            self,
            Self::GrammarCheck | Self::SpellCheck | Self::ImproveSentence | Self::ChangeTone
        )
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.id() == id)
    }

    /// Grammar endpoint lookup: anything outside the grammar family means grammar_check
    pub fn grammar_feature_or_default(id: &str) -> Self {
        Self::from_id(id)
            .filter(PromptKind::is_grammar_family)
            .unwrap_or(Self::GrammarCheck)
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Text-insight actions accepted by `/text-insights`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightAction {
    Explain,
    Summarize,
    Custom,
}

impl InsightAction {
    pub fn all() -> &'static [InsightAction] {
        &[
            InsightAction::Explain,
            InsightAction::Summarize,
            InsightAction::Custom,
        ]
    }

    pub fn id(&self) -> &'static str {
        self.prompt_kind().id()
    }

    pub fn prompt_kind(&self) -> PromptKind {
        match self {
            Self::Explain => PromptKind::Explain,
            Self::Summarize => PromptKind::Summarize,
            Self::Custom => PromptKind::Custom,
        }
    }

    fn allowed_list() -> String {
        let ids: Vec<String> = Self::all().iter().map(|a| format!("'{}'", a.id())).collect();
        format!("[{}]", ids.join(", "))
    }
}

impl FromStr for InsightAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.id() == s)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "Invalid action. Must be one of: {}",
                    Self::allowed_list()
                ))
            })
    }
}

impl fmt::Display for InsightAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Build the prompt for `action_id`, validating the inputs first
pub fn compose(action_id: &str, text: &str, custom_prompt: Option<&str>) -> Result<String> {
    let kind = PromptKind::from_id(action_id)
        .ok_or_else(|| Error::invalid_input(format!("No prompt found for action: {action_id}")))?;
    compose_kind(kind, text, custom_prompt)
}

/// Build a grammar-family prompt, falling back to grammar_check for unknown features
pub fn compose_grammar(feature: &str, text: &str) -> Result<String> {
    compose_kind(PromptKind::grammar_feature_or_default(feature), text, None)
}

fn compose_kind(kind: PromptKind, text: &str, custom_prompt: Option<&str>) -> Result<String> {
    ensure_text(text)?;

    if kind == PromptKind::Custom {
        // any non-empty instruction counts, even blank-looking ones
        let custom_prompt = custom_prompt.filter(|p| !p.is_empty()).ok_or_else(|| {
            Error::invalid_input("custom_prompt is required when action is 'custom'")
        })?;
        return Ok(fill(
            kind.template(),
            &[(TEXT_SLOT, text), (CUSTOM_PROMPT_SLOT, custom_prompt)],
        ));
    }

    Ok(fill(kind.template(), &[(TEXT_SLOT, text)]))
}

/// Reject text that is empty once surrounding whitespace is removed
pub fn ensure_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::invalid_input("Text cannot be empty"));
    }
    Ok(())
}

/// Single-pass slot substitution; values are never rescanned for slots
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let capacity = template.len() + slots.iter().map(|(_, v)| v.len()).sum::<usize>();
    let mut out = String::with_capacity(capacity);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let slot = after.find('}').and_then(|close| {
            let name = &after[..close];
            slots
                .iter()
                .find(|(slot_name, _)| *slot_name == name)
                .map(|(_, value)| (*value, close))
        });

        match slot {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                // literal brace (the JSON example in the grammar template)
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
