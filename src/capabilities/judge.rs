// src/capabilities/judge.rs

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{capabilities::CapabilityError, models::question::Question};

/// External scoring capability for open-answer questions.
///
/// Given the question and the learner's trimmed answer text, returns a
/// pass/fail judgment. Reached over the network; treated as opaque.
#[async_trait]
pub trait AnswerJudge: Send + Sync {
    async fn judge(&self, question: &Question, answer: &str) -> Result<bool, CapabilityError>;
}

#[derive(Debug, Deserialize)]
struct JudgeResponse {
    correct: bool,
}

/// HTTP implementation posting `{question, answer}` to the judge service.
pub struct HttpJudge {
    client: reqwest::Client,
    url: String,
}

impl HttpJudge {
    pub fn new(url: String) -> Self {
        HttpJudge {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl AnswerJudge for HttpJudge {
    async fn judge(&self, question: &Question, answer: &str) -> Result<bool, CapabilityError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({
                "question_id": question.id,
                "question": question.text,
                "answer": answer,
            }))
            .send()
            .await?
            .error_for_status()?;

        let body: JudgeResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::Malformed(e.to_string()))?;
        Ok(body.correct)
    }
}
