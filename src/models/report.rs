// src/models/report.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::violation::ViolationKind;

/// Common fields carried by every monitor event: who, which session, when,
/// and the running violation total at the moment of emission.
#[derive(Debug, Clone, Serialize)]
pub struct EventMeta {
    pub session_id: String,
    pub quiz_id: String,
    pub subject_id: String,
    pub at: DateTime<Utc>,
    pub violations: u32,
}

/// Events published to the remote monitor. Fire-and-forget: delivery is
/// best-effort and the local session state stays the source of truth.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum MonitorEvent {
    ExamStarted {
        #[serde(flatten)]
        meta: EventMeta,
        total_questions: usize,
        time_limit: u32,
    },
    TabSwitch {
        #[serde(flatten)]
        meta: EventMeta,
    },
    RightClickViolation {
        #[serde(flatten)]
        meta: EventMeta,
    },
    KeyboardViolation {
        #[serde(flatten)]
        meta: EventMeta,
    },
    CopyViolation {
        #[serde(flatten)]
        meta: EventMeta,
    },
    PasteViolation {
        #[serde(flatten)]
        meta: EventMeta,
    },
    FaceViolation {
        #[serde(flatten)]
        meta: EventMeta,
        face_violations: u32,
    },
    SubmitAnswer {
        #[serde(flatten)]
        meta: EventMeta,
        question_id: String,
        is_correct: bool,
        points: u32,
        score: u32,
        face_violations: u32,
    },
    ExamCompleted {
        #[serde(flatten)]
        meta: EventMeta,
        score: u32,
        face_violations: u32,
        passed: bool,
    },
}

impl MonitorEvent {
    /// Builds the violation event matching a detector/sampler category.
    pub fn for_violation(kind: ViolationKind, meta: EventMeta, face_violations: u32) -> Self {
        match kind {
            ViolationKind::TabSwitch => MonitorEvent::TabSwitch { meta },
            ViolationKind::RightClick => MonitorEvent::RightClickViolation { meta },
            ViolationKind::SuspiciousKeypress => MonitorEvent::KeyboardViolation { meta },
            ViolationKind::CopyAttempt => MonitorEvent::CopyViolation { meta },
            ViolationKind::PasteAttempt => MonitorEvent::PasteViolation { meta },
            ViolationKind::FaceNotDetected => MonitorEvent::FaceViolation {
                meta,
                face_violations,
            },
        }
    }

    pub fn meta(&self) -> &EventMeta {
        match self {
            MonitorEvent::ExamStarted { meta, .. }
            | MonitorEvent::TabSwitch { meta }
            | MonitorEvent::RightClickViolation { meta }
            | MonitorEvent::KeyboardViolation { meta }
            | MonitorEvent::CopyViolation { meta }
            | MonitorEvent::PasteViolation { meta }
            | MonitorEvent::FaceViolation { meta, .. }
            | MonitorEvent::SubmitAnswer { meta, .. }
            | MonitorEvent::ExamCompleted { meta, .. } => meta,
        }
    }

    pub fn is_violation(&self) -> bool {
        matches!(
            self,
            MonitorEvent::TabSwitch { .. }
                | MonitorEvent::RightClickViolation { .. }
                | MonitorEvent::KeyboardViolation { .. }
                | MonitorEvent::CopyViolation { .. }
                | MonitorEvent::PasteViolation { .. }
                | MonitorEvent::FaceViolation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> EventMeta {
        EventMeta {
            session_id: "s1".into(),
            quiz_id: "quiz".into(),
            subject_id: "learner".into(),
            at: Utc::now(),
            violations: 3,
        }
    }

    #[test]
    fn events_serialize_with_kebab_case_tags() {
        let ev = MonitorEvent::TabSwitch { meta: meta() };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "tab-switch");
        assert_eq!(json["violations"], 3);
        assert_eq!(json["session_id"], "s1");

        let ev = MonitorEvent::for_violation(ViolationKind::FaceNotDetected, meta(), 1);
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event"], "face-violation");
        assert_eq!(json["face_violations"], 1);
    }
}
