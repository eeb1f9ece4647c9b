// src/engine/mod.rs

pub mod clock;
pub mod detector;
pub mod sampler;
pub mod session;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, Duration, MissedTickBehavior};

use crate::{
    capabilities::{AnswerJudge, FaceDetector, face},
    models::{
        question::QuestionType,
        report::MonitorEvent,
        signal::{ClientSignal, Directive},
    },
};
use session::{Effect, ExamSession, SessionSnapshot};

/// Commands accepted by a session task.
pub enum SessionCommand {
    /// A raw browser signal from the learner tab.
    Signal(ClientSignal),
    /// Read-only projection request.
    Snapshot(oneshot::Sender<SessionSnapshot>),
}

/// Cheap clone-able handle to a running session task. Dropping the last
/// command sender (registry teardown) ends the task.
#[derive(Clone)]
pub struct SessionHandle {
    pub commands: mpsc::Sender<SessionCommand>,
    pub events: broadcast::Sender<MonitorEvent>,
    pub directives: broadcast::Sender<Directive>,
}

impl SessionHandle {
    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(SessionCommand::Snapshot(tx)).await.ok()?;
        rx.await.ok()
    }

    pub async fn signal(&self, signal: ClientSignal) -> bool {
        self.commands
            .send(SessionCommand::Signal(signal))
            .await
            .is_ok()
    }
}

/// Spawns the per-session task and returns its handle.
///
/// Absent capabilities degrade silently: without a face detector the
/// sampler never activates, without a judge open answers cannot be scored
/// on explicit submission (expiry still records them as incorrect).
pub fn spawn_session(
    session: ExamSession,
    judge: Option<Arc<dyn AnswerJudge>>,
    detector: Option<Arc<dyn FaceDetector>>,
) -> SessionHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (event_tx, _) = broadcast::channel(256);
    let (directive_tx, _) = broadcast::channel(256);

    let runtime = SessionRuntime {
        session,
        judge,
        detector,
        events: event_tx.clone(),
        directives: directive_tx.clone(),
        latest_frame: None,
    };
    tokio::spawn(runtime.run(cmd_rx));

    SessionHandle {
        commands: cmd_tx,
        events: event_tx,
        directives: directive_tx,
    }
}

struct SessionRuntime {
    session: ExamSession,
    judge: Option<Arc<dyn AnswerJudge>>,
    detector: Option<Arc<dyn FaceDetector>>,
    events: broadcast::Sender<MonitorEvent>,
    directives: broadcast::Sender<Directive>,
    latest_frame: Option<String>,
}

impl SessionRuntime {
    /// The session event loop. Everything that mutates the session runs
    /// here, to completion, one message at a time; the clock, the
    /// auto-advance countdown and the face sampler all share one 1 Hz
    /// interval, each gated by its own active-guard. The interval branch
    /// is disabled permanently once the session completes, and the whole
    /// task ends when the registry drops the command sender.
    async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        let mut interval = time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick completes immediately; swallow it so the
        // countdown starts a full second after spawn.
        interval.tick().await;

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(SessionCommand::Signal(signal)) => self.handle_signal(signal).await,
                    Some(SessionCommand::Snapshot(reply)) => {
                        let _ = reply.send(self.session.snapshot(Utc::now()));
                    }
                    None => break,
                },
                _ = interval.tick(), if !self.session.is_completed() => {
                    self.handle_tick().await;
                }
            }
        }
        tracing::debug!("session task ended");
    }

    async fn handle_signal(&mut self, signal: ClientSignal) {
        let now = Utc::now();
        match signal {
            ClientSignal::Start => match self.session.start(now) {
                Ok(effects) => self.emit(effects),
                Err(refusal) => self.direct(Directive::Warning {
                    message: refusal.message().to_string(),
                }),
            },
            ClientSignal::CameraGranted => {
                let effects = self.session.set_camera(true);
                self.emit(effects);
            }
            ClientSignal::CameraDenied => {
                let effects = self.session.set_camera(false);
                self.emit(effects);
            }
            ClientSignal::Fullscreen { active } => {
                let effects = self.session.set_fullscreen(active, now);
                self.emit(effects);
            }
            ClientSignal::Draft { selected, text } => {
                self.session.update_draft(selected, text);
            }
            ClientSignal::Submit => self.submit_current(false).await,
            ClientSignal::Frame { data } => {
                self.latest_frame = Some(data);
            }
            other => {
                if let Some(c) = detector::classify(&other) {
                    let effects = self.session.record_violation(c.kind, now);
                    let recorded = !effects.is_empty();
                    self.emit(effects);
                    if recorded && c.suppress_default {
                        self.direct(Directive::SuppressDefault {
                            signal: other.tag().to_string(),
                        });
                    }
                }
            }
        }
    }

    async fn handle_tick(&mut self) {
        let tick = self.session.clock_tick(Utc::now());
        self.emit(tick.effects);
        if tick.expired {
            self.submit_current(true).await;
        }
        self.sample_face().await;
    }

    /// Scores the current answer buffer. `forced` marks the clock-expiry
    /// path, which must record exactly one answer no matter what: an empty
    /// buffer becomes a zero-score skip and a judge failure is recorded as
    /// incorrect. Explicit submissions refuse an empty buffer, and a judge
    /// failure leaves the question open so the learner can retry.
    async fn submit_current(&mut self, forced: bool) {
        let now = Utc::now();
        let Some(pending) = self.session.prepare_submission(now) else {
            if !forced {
                self.direct(Directive::Error {
                    message: "nothing to submit for the current question".to_string(),
                });
            }
            return;
        };
        if !forced && pending.is_empty() {
            self.direct(Directive::Error {
                message: "answer something before submitting".to_string(),
            });
            return;
        }
        let question = match self.session.current_question() {
            Some(q) => q.clone(),
            None => return,
        };

        let is_correct = if pending.is_empty() {
            false
        } else {
            match question.question_type {
                QuestionType::Single | QuestionType::Multiple => {
                    question.evaluate_choice(&pending.selected)
                }
                QuestionType::Open => {
                    let text = pending.text.clone().unwrap_or_default();
                    match &self.judge {
                        Some(judge) => match judge.judge(&question, text.trim()).await {
                            Ok(verdict) => verdict,
                            Err(err) if forced => {
                                tracing::warn!(
                                    "answer judge failed on expiry, recording as incorrect: {err}"
                                );
                                false
                            }
                            Err(err) => {
                                tracing::warn!("answer judge failed: {err}");
                                self.direct(Directive::Error {
                                    message: "scoring service unavailable, submit again"
                                        .to_string(),
                                });
                                return;
                            }
                        },
                        None if forced => false,
                        None => {
                            self.direct(Directive::Error {
                                message: "open-answer scoring is not configured".to_string(),
                            });
                            return;
                        }
                    }
                }
            }
        };

        let effects = self.session.score_submission(pending, is_correct, now);
        self.emit(effects);
    }

    /// One sampler tick: run the newest frame through the detection
    /// capability. Without a configured detector the sampler never
    /// activates; a failed detection call degrades this tick only and is
    /// never counted as a miss.
    async fn sample_face(&mut self) {
        let Some(detector) = self.detector.clone() else {
            return;
        };
        if !self.session.sampler_active() {
            return;
        }
        let Some(frame) = self.latest_frame.clone() else {
            return;
        };
        match detector.detect_faces(&frame).await {
            Ok(faces) => {
                let present = face::any_usable_face(&faces);
                let effects = self.session.face_sample(present, Utc::now());
                self.emit(effects);
            }
            Err(err) => {
                tracing::warn!("face detection failed: {err}");
            }
        }
    }

    /// Fire-and-forget dispatch. A send error just means nobody is
    /// listening on that stream right now; local state stays the source
    /// of truth either way.
    fn emit(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Report(event) => {
                    if self.events.send(event).is_err() {
                        tracing::debug!("no monitor attached, report dropped");
                    }
                }
                Effect::Direct(directive) => {
                    let _ = self.directives.send(directive);
                }
            }
        }
    }

    fn direct(&self, directive: Directive) {
        let _ = self.directives.send(directive);
    }
}
