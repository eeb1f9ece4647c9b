// src/models/signal.rs

use serde::{Deserialize, Serialize};

/// Raw browser events streamed by the learner tab over its WebSocket.
///
/// These are untrusted environment signals; classification into violations
/// happens server-side in the detector.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientSignal {
    /// Learner pressed start. Requires a prior `camera_granted`.
    Start,
    CameraGranted,
    CameraDenied,
    Fullscreen {
        active: bool,
    },
    Visibility {
        hidden: bool,
    },
    ContextMenu,
    KeyPress {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        meta: bool,
    },
    Copy,
    Paste,
    /// Replaces the current answer buffer; not a submission.
    Draft {
        #[serde(default)]
        selected: Vec<String>,
        text: Option<String>,
    },
    Submit,
    /// A camera frame (base64-encoded) for the face-presence sampler.
    Frame {
        data: String,
    },
}

impl ClientSignal {
    /// Short tag used for logging and suppress-default echoes.
    pub fn tag(&self) -> &'static str {
        match self {
            ClientSignal::Start => "start",
            ClientSignal::CameraGranted => "camera_granted",
            ClientSignal::CameraDenied => "camera_denied",
            ClientSignal::Fullscreen { .. } => "fullscreen",
            ClientSignal::Visibility { .. } => "visibility",
            ClientSignal::ContextMenu => "context_menu",
            ClientSignal::KeyPress { .. } => "key_press",
            ClientSignal::Copy => "copy",
            ClientSignal::Paste => "paste",
            ClientSignal::Draft { .. } => "draft",
            ClientSignal::Submit => "submit",
            ClientSignal::Frame { .. } => "frame",
        }
    }
}

/// Instructions pushed back to the learner tab.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    /// Issued on the start transition; the tab must enter fullscreen.
    RequestFullscreen,
    /// Issued on completion.
    ExitFullscreen,
    /// Issued on completion and teardown; the tab must stop camera tracks.
    StopCamera,
    /// The default browser action for this signal must be suppressed.
    SuppressDefault { signal: String },
    /// Transient warning for the learner (violations, permission problems).
    Warning { message: String },
    QuestionAdvanced { index: usize, remaining: u32 },
    Completed { score: u32, passed: bool },
    Error { message: String },
}
