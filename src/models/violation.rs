// src/models/violation.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Integrity violation category. One category per detector signal class,
/// plus the face-presence sampler's miss-streak violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    TabSwitch,
    RightClick,
    SuspiciousKeypress,
    CopyAttempt,
    PasteAttempt,
    FaceNotDetected,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::TabSwitch => "tab_switch",
            ViolationKind::RightClick => "right_click",
            ViolationKind::SuspiciousKeypress => "suspicious_keypress",
            ViolationKind::CopyAttempt => "copy_attempt",
            ViolationKind::PasteAttempt => "paste_attempt",
            ViolationKind::FaceNotDetected => "face_not_detected",
        }
    }
}

/// A write-once violation record. Never deleted or corrected; the running
/// total captures the session tally at the moment of emission.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub at: DateTime<Utc>,
    pub running_total: u32,
}
