//! Review input model.
//!
//! A review is a list of answers to a service's feedback questions. The
//! input arrives from an LLM tool call or from IPFS, so every constructor
//! accepts whatever it is given and degrades to an empty review instead of
//! failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Question used when a review is plain free text.
pub const FREE_TEXT_QUESTION: &str = "review";

/// A single answer to a feedback question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAnswer {
    pub question: String,
    pub answer: String,
}

/// Ordered answers making up one review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub answers: Vec<ReviewAnswer>,
}

impl Review {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an answer (builder style).
    pub fn with_answer(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers.push(ReviewAnswer {
            question: question.into(),
            answer: answer.into(),
        });
        self
    }

    /// A free-text review becomes a single answer.
    pub fn from_text(text: &str) -> Self {
        Self::new().with_answer(FREE_TEXT_QUESTION, text)
    }

    /// Build a review from any JSON value.
    ///
    /// Accepted shapes:
    /// - `{"question": "answer", ...}`
    /// - `[{"question": "...", "answer": "..."}, ...]`
    /// - `"free text"`
    ///
    /// Anything else yields an empty review.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::from_text(text),
            Value::Object(map) => {
                // Wrapped form: {"review": <anything>} or {"answers": [...]}
                if map.len() == 1 {
                    if let Some(inner) = map.get("answers").or_else(|| map.get("review")) {
                        if inner.is_array() || inner.is_object() {
                            return Self::from_json(inner);
                        }
                    }
                }
                let answers = map
                    .iter()
                    .map(|(question, answer)| ReviewAnswer {
                        question: question.clone(),
                        answer: stringify(answer),
                    })
                    .collect();
                Self { answers }
            }
            Value::Array(items) => {
                let answers = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::Object(obj) => Some(ReviewAnswer {
                            question: obj
                                .get("question")
                                .map(stringify)
                                .unwrap_or_default(),
                            answer: obj.get("answer").map(stringify).unwrap_or_default(),
                        }),
                        Value::String(text) => Some(ReviewAnswer {
                            question: FREE_TEXT_QUESTION.to_string(),
                            answer: text.clone(),
                        }),
                        _ => None,
                    })
                    .collect();
                Self { answers }
            }
            _ => Self::default(),
        }
    }

    /// Parse raw input: JSON when it is JSON, free text otherwise.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('[') || trimmed.starts_with('"') {
            if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
                return Self::from_json(&value);
            }
        }
        Self::from_text(input)
    }

    /// True when no answer carries any non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.answers.iter().all(|a| a.answer.trim().is_empty())
    }

    /// Non-blank answers joined by newlines.
    pub fn text(&self) -> String {
        self.non_blank_answers().collect::<Vec<_>>().join("\n")
    }

    pub(crate) fn non_blank_answers(&self) -> impl Iterator<Item = &str> {
        self.answers
            .iter()
            .map(|a| a.answer.trim())
            .filter(|a| !a.is_empty())
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_free_text() {
        let review = Review::parse("Great coffee, slow service");
        assert_eq!(review.answers.len(), 1);
        assert_eq!(review.answers[0].question, FREE_TEXT_QUESTION);
    }

    #[test]
    fn test_parse_object() {
        let review = Review::parse(r#"{"How was it?": "Fine", "Rating": 4}"#);
        assert_eq!(review.answers.len(), 2);
        assert!(review.answers.iter().any(|a| a.answer == "4"));
    }

    #[test]
    fn test_parse_array_of_pairs() {
        let review = Review::from_json(&json!([
            {"question": "Speed?", "answer": "Quick"},
            {"question": "Price?"},
            42
        ]));
        assert_eq!(review.answers.len(), 2);
        assert_eq!(review.answers[1].answer, "");
    }

    #[test]
    fn test_wrapped_review() {
        let review = Review::from_json(&json!({"review": {"Q1": "A1"}}));
        assert_eq!(review.answers, vec![ReviewAnswer {
            question: "Q1".into(),
            answer: "A1".into()
        }]);
    }

    #[test]
    fn test_malformed_json_is_free_text() {
        let review = Review::parse("{not json");
        assert_eq!(review.text(), "{not json");
    }

    #[test]
    fn test_unsupported_shape_is_empty() {
        assert!(Review::from_json(&json!(12)).is_empty());
        assert!(Review::from_json(&Value::Null).is_empty());
        assert!(Review::parse("   ").is_empty());
    }
}
