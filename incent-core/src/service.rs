//! Service and feedback entities.
//!
//! Services live on-chain as a content hash pointing at a
//! [`ServiceMetadata`] document in IPFS. Feedback entries are free-form JSON
//! documents, also referenced by content hash.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IncentError, Result};
use crate::review::Review;

/// The IPFS document describing a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub feedback_questions: Vec<String>,
}

impl ServiceMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        feedback_questions: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            feedback_questions,
        }
    }

    /// Trim fields, drop blank questions, and check what remains.
    pub fn normalized(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(IncentError::InvalidMetadata("service name is required".to_string()));
        }

        let feedback_questions: Vec<String> = self
            .feedback_questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        if feedback_questions.is_empty() {
            return Err(IncentError::InvalidMetadata(
                "at least one feedback question is required".to_string(),
            ));
        }

        Ok(Self {
            name,
            description: self.description.trim().to_string(),
            feedback_questions,
        })
    }
}

/// A registered service as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: u64,
    pub metadata_cid: String,
    pub gateway_url: String,
    pub name: String,
    pub description: String,
    pub interactions: u64,
    pub feedbacks: u64,
    pub feedback_questions: Vec<String>,
}

impl Service {
    pub fn from_metadata(
        id: u64,
        metadata_cid: String,
        gateway_url: String,
        metadata: ServiceMetadata,
        interactions: u64,
        feedbacks: u64,
    ) -> Self {
        Self {
            id,
            metadata_cid,
            gateway_url,
            name: metadata.name,
            description: metadata.description,
            interactions,
            feedbacks,
            feedback_questions: metadata.feedback_questions,
        }
    }
}

/// A feedback document fetched from IPFS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub cid: String,
    pub content: Value,
}

impl Feedback {
    /// Interpret the document as a review for scoring.
    pub fn as_review(&self) -> Review {
        Review::from_json(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_camel_case() {
        let meta: ServiceMetadata = serde_json::from_value(json!({
            "name": "Cafe",
            "description": "Coffee",
            "feedbackQuestions": ["How was the coffee?"]
        }))
        .unwrap();
        assert_eq!(meta.feedback_questions.len(), 1);
    }

    #[test]
    fn test_normalized_drops_blank_questions() {
        let meta = ServiceMetadata::new(" Cafe ", "", vec!["".into(), " Taste? ".into()])
            .normalized()
            .unwrap();
        assert_eq!(meta.name, "Cafe");
        assert_eq!(meta.feedback_questions, vec!["Taste?".to_string()]);
    }

    #[test]
    fn test_normalized_requires_name_and_question() {
        assert!(ServiceMetadata::new("", "d", vec!["q".into()]).normalized().is_err());
        assert!(ServiceMetadata::new("n", "d", vec!["  ".into()]).normalized().is_err());
    }

    #[test]
    fn test_feedback_as_review() {
        let feedback = Feedback {
            cid: "bafy".into(),
            content: json!({"How was the coffee?": "Too bitter, add a lighter roast"}),
        };
        let review = feedback.as_review();
        assert_eq!(review.answers.len(), 1);
        assert!(!review.is_empty());
    }
}
