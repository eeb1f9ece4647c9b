// src/models/question.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Question kind. Choice questions are scored locally by exact set match;
/// open questions are judged by the external scoring capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Single,
    Multiple,
    Open,
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

/// A quiz question, immutable once the session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// The text content of the question.
    pub text: String,

    /// Options for choice questions; empty for open questions.
    pub options: Vec<ChoiceOption>,

    /// Optional multimedia reference shown alongside the question.
    pub media_url: Option<String>,
}

impl Question {
    pub fn correct_option_ids(&self) -> BTreeSet<&str> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id.as_str())
            .collect()
    }

    /// Exact-match correctness for choice questions.
    ///
    /// Single choice: exactly one id selected and it is the correct one.
    /// Multiple choice: the selected set equals the correct set,
    /// order-independent. Open questions always return false here; they
    /// go through the external judge instead.
    pub fn evaluate_choice(&self, selected: &[String]) -> bool {
        let chosen: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
        let correct = self.correct_option_ids();
        match self.question_type {
            QuestionType::Single => selected.len() == 1 && chosen == correct,
            QuestionType::Multiple => !correct.is_empty() && chosen == correct,
            QuestionType::Open => false,
        }
    }
}

/// DTO for sending a question to the learner (excludes correctness flags).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    pub options: Vec<PublicOption>,
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicOption {
    pub id: String,
    pub text: String,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        PublicQuestion {
            id: q.id.clone(),
            question_type: q.question_type,
            text: q.text.clone(),
            options: q
                .options
                .iter()
                .map(|o| PublicOption {
                    id: o.id.clone(),
                    text: o.text.clone(),
                })
                .collect(),
            media_url: q.media_url.clone(),
        }
    }
}

/// DTO for one question in a session-creation payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionPayload {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    pub media_url: Option<String>,
}

impl QuestionPayload {
    /// Shape checks that the `validator` derive cannot express per-type.
    pub fn check_shape(&self) -> Result<(), String> {
        let correct = self.options.iter().filter(|o| o.is_correct).count();
        match self.question_type {
            QuestionType::Single => {
                if self.options.len() < 2 {
                    return Err(format!("question {}: single choice needs >= 2 options", self.id));
                }
                if correct != 1 {
                    return Err(format!(
                        "question {}: single choice needs exactly 1 correct option",
                        self.id
                    ));
                }
            }
            QuestionType::Multiple => {
                if self.options.len() < 2 {
                    return Err(format!(
                        "question {}: multiple choice needs >= 2 options",
                        self.id
                    ));
                }
                if correct == 0 {
                    return Err(format!(
                        "question {}: multiple choice needs >= 1 correct option",
                        self.id
                    ));
                }
            }
            QuestionType::Open => {
                if !self.options.is_empty() {
                    return Err(format!("question {}: open question cannot have options", self.id));
                }
            }
        }
        Ok(())
    }

    pub fn into_question(self) -> Question {
        Question {
            id: self.id,
            question_type: self.question_type,
            text: self.text,
            options: self.options,
            media_url: self.media_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(correct: &str) -> Question {
        Question {
            id: "q1".into(),
            question_type: QuestionType::Single,
            text: "?".into(),
            options: ["a", "b", "c"]
                .iter()
                .map(|id| ChoiceOption {
                    id: (*id).into(),
                    text: format!("option {id}"),
                    is_correct: *id == correct,
                })
                .collect(),
            media_url: None,
        }
    }

    fn multiple(correct: &[&str]) -> Question {
        Question {
            id: "q2".into(),
            question_type: QuestionType::Multiple,
            text: "?".into(),
            options: ["a", "b", "c"]
                .iter()
                .map(|id| ChoiceOption {
                    id: (*id).into(),
                    text: format!("option {id}"),
                    is_correct: correct.contains(id),
                })
                .collect(),
            media_url: None,
        }
    }

    #[test]
    fn single_choice_exact_match() {
        let q = single("b");
        assert!(q.evaluate_choice(&["b".into()]));
        assert!(!q.evaluate_choice(&["a".into()]));
        assert!(!q.evaluate_choice(&["a".into(), "b".into()]));
        assert!(!q.evaluate_choice(&[]));
    }

    #[test]
    fn multiple_choice_requires_full_set() {
        let q = multiple(&["a", "c"]);
        // Subset is not enough.
        assert!(!q.evaluate_choice(&["a".into()]));
        // Superset is not correct either.
        assert!(!q.evaluate_choice(&["a".into(), "b".into(), "c".into()]));
        // Order does not matter.
        assert!(q.evaluate_choice(&["c".into(), "a".into()]));
    }

    #[test]
    fn payload_shape_checks() {
        let p = QuestionPayload {
            id: "q".into(),
            question_type: QuestionType::Open,
            text: "explain".into(),
            options: vec![],
            media_url: None,
        };
        assert!(p.check_shape().is_ok());

        let p = QuestionPayload {
            id: "q".into(),
            question_type: QuestionType::Single,
            text: "pick".into(),
            options: vec![ChoiceOption {
                id: "a".into(),
                text: "only".into(),
                is_correct: true,
            }],
            media_url: None,
        };
        assert!(p.check_shape().is_err());
    }
}
