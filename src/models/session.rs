// src/models/session.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::QuestionPayload;

/// DTO for creating a proctored session. Quiz content arrives fully
/// formed here; the engine never fetches or persists it.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 64))]
    pub quiz_id: String,

    /// The learner being proctored.
    #[validate(length(min = 1, max = 64))]
    pub subject_id: String,

    /// Per-question time budget in seconds; server default when omitted.
    #[validate(range(min = 5, max = 3600))]
    pub time_limit: Option<u32>,

    /// Minimum total score to pass; server default when omitted.
    pub passing_score: Option<u32>,

    #[validate(length(min = 1, max = 200), nested)]
    pub questions: Vec<QuestionPayload>,
}

/// DTO returned on session creation.
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub id: String,
    pub total_questions: usize,
    pub time_limit: u32,
    pub passing_score: u32,
}
