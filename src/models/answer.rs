// src/models/answer.rs

use serde::Serialize;

use crate::models::question::QuestionType;

/// One recorded answer. Appended exactly once per question and immutable
/// afterwards; the question text and type are echoed for later review.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerRecord {
    pub question_id: String,
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// Selected option ids (empty for open questions and skips).
    pub selected: Vec<String>,

    /// Free-text response for open questions.
    pub text: Option<String>,

    pub is_correct: bool,
    pub points: u32,

    /// Wall-clock seconds between question start and submission.
    pub time_taken: u32,
}
