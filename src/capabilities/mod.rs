// src/capabilities/mod.rs

pub mod face;
pub mod judge;

use std::fmt;

pub use face::{Face, FaceDetector, HttpFaceDetector};
pub use judge::{AnswerJudge, HttpJudge};

/// Error from an external capability (judge or face detection service).
/// Never fatal: callers degrade the specific feature and carry on.
#[derive(Debug)]
pub enum CapabilityError {
    Transport(String),
    Malformed(String),
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityError::Transport(msg) => write!(f, "capability transport error: {msg}"),
            CapabilityError::Malformed(msg) => write!(f, "capability returned malformed data: {msg}"),
        }
    }
}

impl std::error::Error for CapabilityError {}

impl From<reqwest::Error> for CapabilityError {
    fn from(err: reqwest::Error) -> Self {
        CapabilityError::Transport(err.to_string())
    }
}
