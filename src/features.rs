//! Static feature catalog shown by the extension popup

use serde::Serialize;

/// A feature tile in the extension UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<FeatureAction>>,
}

/// A sub-action of a feature (text insights only, for now)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureAction {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturesResponse {
    pub features: Vec<Feature>,
}

/// Every feature, enabled or not, in display order
pub fn catalog() -> Vec<Feature> {
    vec![
        Feature {
            id: "grammar_check",
            name: "Grammar Check",
            description: "Check for grammar and spelling errors",
            icon: "✓",
            enabled: true,
            actions: None,
        },
        Feature {
            id: "text_insights",
            name: "Smart Text Assistant",
            description: "Explain, summarize, or perform custom actions on selected text",
            icon: "🧠",
            enabled: true,
            actions: Some(vec![
                FeatureAction {
                    id: "explain",
                    name: "Explain",
                    description: "Understand difficult words, jargon, or sentences",
                    icon: "💡",
                },
                FeatureAction {
                    id: "summarize",
                    name: "Summarize",
                    description: "Get a concise summary (~10% of original length)",
                    icon: "📋",
                },
                FeatureAction {
                    id: "custom",
                    name: "Custom Action",
                    description: "Write your own prompt for custom text analysis",
                    icon: "✏️",
                },
            ]),
        },
        Feature {
            id: "spell_check",
            name: "Spell Check",
            description: "Check for spelling errors only",
            icon: "📝",
            enabled: false,
            actions: None,
        },
        Feature {
            id: "improve_sentence",
            name: "Improve Sentence",
            description: "Enhance sentence clarity and flow",
            icon: "✨",
            enabled: false,
            actions: None,
        },
        Feature {
            id: "change_tone",
            name: "Change Tone",
            description: "Adjust the tone of your text",
            icon: "🎭",
            enabled: false,
            actions: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::{InsightAction, PromptKind};

    #[test]
    fn test_catalog_is_stable() {
        let ids: Vec<&str> = catalog().iter().map(|f| f.id).collect();
        assert_eq!(
            ids,
            [
                "grammar_check",
                "text_insights",
                "spell_check",
                "improve_sentence",
                "change_tone"
            ]
        );
        assert_eq!(catalog(), catalog());
    }

    #[test]
    fn test_insight_actions_match_accepted_actions() {
        let insights = catalog()
            .into_iter()
            .find(|f| f.id == "text_insights")
            .unwrap();
        let action_ids: Vec<&str> = insights.actions.unwrap().iter().map(|a| a.id).collect();
        let accepted: Vec<&str> = InsightAction::all().iter().map(|a| a.id()).collect();
        assert_eq!(action_ids, accepted);
    }

    #[test]
    fn test_grammar_features_have_templates() {
        for feature in catalog().iter().filter(|f| f.id != "text_insights") {
            let kind = PromptKind::from_id(feature.id).unwrap();
            assert!(kind.is_grammar_family());
        }
    }
}
