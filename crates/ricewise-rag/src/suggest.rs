//! Follow-up question suggestions.
//!
//! A fixed keyword table, checked in order against the lowercased question.
//! The first category with a matching keyword wins.

use serde::Serialize;

/// Topic a question is about, as far as suggestions are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Disease,
    Treatment,
    Cultivation,
    General,
}

/// Checked top to bottom; `General` is the fallback.
const RULES: &[(SuggestionCategory, &[&str])] = &[
    (
        SuggestionCategory::Disease,
        &["disease", "infection", "pest", "problem", "symptoms"],
    ),
    (
        SuggestionCategory::Treatment,
        &["treatment", "cure", "control", "manage"],
    ),
    (
        SuggestionCategory::Cultivation,
        &["farming", "cultivation", "growing", "plant"],
    ),
];

impl SuggestionCategory {
    /// Pick the category for a question.
    pub fn classify(question: &str) -> Self {
        let question = question.to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| question.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Self::General)
    }

    /// The fixed follow-ups for this category.
    pub fn suggestions(self) -> [&'static str; 4] {
        match self {
            Self::Disease => [
                "How can I prevent this disease?",
                "What are the most effective treatments?",
                "How do I identify early symptoms?",
                "What causes this disease?",
            ],
            Self::Treatment => [
                "What are organic treatment options?",
                "How long does treatment take?",
                "What are the prevention methods?",
                "Are there resistant rice varieties?",
            ],
            Self::Cultivation => [
                "What are optimal growing conditions?",
                "How often should I irrigate?",
                "What fertilizers work best?",
                "When is the best planting time?",
            ],
            Self::General => [
                "Tell me about rice disease prevention",
                "What are best farming practices?",
                "How can I improve rice yield?",
                "Common rice cultivation problems?",
            ],
        }
    }
}

/// Four follow-up questions for the given question.
pub fn follow_up_questions(question: &str) -> Vec<String> {
    SuggestionCategory::classify(question)
        .suggestions()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
