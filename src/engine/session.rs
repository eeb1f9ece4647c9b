// src/engine/session.rs

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::{
    engine::{clock::Countdown, sampler::FacePresence},
    models::{
        answer::AnswerRecord,
        question::{PublicQuestion, Question, QuestionType},
        report::{EventMeta, MonitorEvent},
        signal::Directive,
        violation::{Violation, ViolationKind},
    },
};

/// Points for a correct open answer, flat regardless of time.
pub const OPEN_ANSWER_POINTS: u32 = 50;
/// Base points for a correct choice answer, before the time bonus.
pub const CHOICE_POINTS: u32 = 100;
/// Seconds the transient learner warning stays visible.
pub const WARNING_SECONDS: i64 = 3;

/// Exam lifecycle. `Completed` is terminal; a session never runs twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Running,
    Completed,
}

/// Side effects produced by a state transition. The session task splits
/// them into the monitor stream and the learner directive stream; the core
/// itself never talks to a socket.
#[derive(Debug, Clone)]
pub enum Effect {
    Report(MonitorEvent),
    Direct(Directive),
}

/// Engine knobs, fixed at session creation.
#[derive(Debug, Clone)]
pub struct Tuning {
    /// Per-question time budget in seconds.
    pub time_limit: u32,
    /// Minimum total score to pass.
    pub passing_score: u32,
    /// Auto-advance countdown length in ticks.
    pub auto_advance_ticks: u32,
    /// Consecutive face misses before a violation fires.
    pub face_miss_threshold: u32,
}

/// Why a start attempt was refused. All refusals are retryable and leave
/// the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRefusal {
    CameraNotGranted,
    AlreadyStarted,
}

impl StartRefusal {
    pub fn message(&self) -> &'static str {
        match self {
            StartRefusal::CameraNotGranted => "camera permission is required to start the exam",
            StartRefusal::AlreadyStarted => "the exam has already been started",
        }
    }
}

/// The answer buffer for the current question.
#[derive(Debug, Clone, Default)]
struct Draft {
    selected: Vec<String>,
    text: Option<String>,
}

/// A submission captured from the answer buffer, waiting to be scored.
/// Open answers go through the external judge between capture and scoring.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub selected: Vec<String>,
    pub text: Option<String>,
    pub time_taken: u32,
}

impl PendingSubmission {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }
}

/// Result of one clock tick. `expired` means the per-question countdown
/// just hit zero and the current question must be force-submitted.
#[derive(Debug)]
pub struct TickOutcome {
    pub effects: Vec<Effect>,
    pub expired: bool,
}

/// Read-only projection served to HTTP clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub quiz_id: String,
    pub subject_id: String,
    pub phase: Phase,
    pub current_index: usize,
    pub total_questions: usize,
    pub answered: usize,
    pub remaining_seconds: u32,
    pub score: u32,
    pub passed: Option<bool>,
    pub violations: u32,
    pub face_violations: u32,
    pub fullscreen: bool,
    pub camera_granted: bool,
    pub warning_active: bool,
    pub current_question: Option<PublicQuestion>,
}

/// The exam session state machine.
///
/// Owns every mutable session field exclusively; detectors and the sampler
/// feed it events and never mutate it directly. All methods are synchronous
/// read-modify-write steps, called from a single task, so transitions are
/// effectively serialized without locking.
#[derive(Debug)]
pub struct ExamSession {
    id: String,
    quiz_id: String,
    subject_id: String,
    questions: Vec<Question>,

    time_limit: u32,
    passing_score: u32,
    auto_advance_ticks: u32,

    phase: Phase,
    current_index: usize,
    countdown: Countdown,
    question_started_at: Option<DateTime<Utc>>,
    auto_advance: Option<Countdown>,

    draft: Draft,
    answers: Vec<AnswerRecord>,
    score: u32,

    violation_total: u32,
    face_violation_total: u32,
    violation_log: Vec<Violation>,
    presence: FacePresence,
    warning_until: Option<DateTime<Utc>>,

    fullscreen: bool,
    camera_granted: bool,
}

impl ExamSession {
    pub fn new(
        id: String,
        quiz_id: String,
        subject_id: String,
        questions: Vec<Question>,
        tuning: Tuning,
    ) -> Self {
        ExamSession {
            id,
            quiz_id,
            subject_id,
            questions,
            time_limit: tuning.time_limit,
            passing_score: tuning.passing_score,
            auto_advance_ticks: tuning.auto_advance_ticks,
            phase: Phase::NotStarted,
            current_index: 0,
            countdown: Countdown::new(tuning.time_limit),
            question_started_at: None,
            auto_advance: None,
            draft: Draft::default(),
            answers: Vec::new(),
            score: 0,
            violation_total: 0,
            face_violation_total: 0,
            violation_log: Vec::new(),
            presence: FacePresence::new(tuning.face_miss_threshold),
            warning_until: None,
            fullscreen: false,
            camera_granted: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn violation_total(&self) -> u32 {
        self.violation_total
    }

    pub fn face_violation_total(&self) -> u32 {
        self.face_violation_total
    }

    pub fn violation_log(&self) -> &[Violation] {
        &self.violation_log
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Whether the face sampler should consume frames right now. The
    /// detector-readiness half of the guard lives in the session task.
    pub fn sampler_active(&self) -> bool {
        self.phase == Phase::Running && self.fullscreen
    }

    fn answered_current(&self) -> bool {
        self.answers.len() > self.current_index
    }

    fn meta(&self, now: DateTime<Utc>) -> EventMeta {
        EventMeta {
            session_id: self.id.clone(),
            quiz_id: self.quiz_id.clone(),
            subject_id: self.subject_id.clone(),
            at: now,
            violations: self.violation_total,
        }
    }

    /// `NotStarted -> Running`. Requires prior camera grant; issues the
    /// fullscreen directive and the exam-started report. Refusals leave
    /// the session untouched so the learner can retry.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<Vec<Effect>, StartRefusal> {
        if self.phase != Phase::NotStarted {
            return Err(StartRefusal::AlreadyStarted);
        }
        if !self.camera_granted {
            return Err(StartRefusal::CameraNotGranted);
        }
        self.phase = Phase::Running;
        self.countdown.reset(self.time_limit);
        self.question_started_at = Some(now);
        Ok(vec![
            Effect::Direct(Directive::RequestFullscreen),
            Effect::Report(MonitorEvent::ExamStarted {
                meta: self.meta(now),
                total_questions: self.questions.len(),
                time_limit: self.time_limit,
            }),
        ])
    }

    pub fn set_camera(&mut self, granted: bool) -> Vec<Effect> {
        self.camera_granted = granted;
        if granted {
            Vec::new()
        } else {
            vec![Effect::Direct(Directive::Warning {
                message: "camera access was denied; grant it and retry".to_string(),
            })]
        }
    }

    /// Fullscreen is the required display mode: losing it mid-session
    /// freezes the clock and pauses the sampler, nothing more.
    pub fn set_fullscreen(&mut self, active: bool, _now: DateTime<Utc>) -> Vec<Effect> {
        self.fullscreen = active;
        if !active && self.phase == Phase::Running {
            vec![Effect::Direct(Directive::Warning {
                message: "return to fullscreen to resume the exam".to_string(),
            })]
        } else {
            Vec::new()
        }
    }

    /// Records one violation: tally first, then the write-once record and
    /// the outbound report, all in the same invocation so the monitor's
    /// reconstructed total always matches the authoritative tally.
    pub fn record_violation(&mut self, kind: ViolationKind, now: DateTime<Utc>) -> Vec<Effect> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        self.violation_total += 1;
        if kind == ViolationKind::FaceNotDetected {
            self.face_violation_total += 1;
        }
        self.violation_log.push(Violation {
            kind,
            at: now,
            running_total: self.violation_total,
        });
        self.warning_until = Some(now + Duration::seconds(WARNING_SECONDS));
        vec![
            Effect::Report(MonitorEvent::for_violation(
                kind,
                self.meta(now),
                self.face_violation_total,
            )),
            Effect::Direct(Directive::Warning {
                message: format!("integrity violation recorded: {}", kind.as_str()),
            }),
        ]
    }

    /// Consumes one detection sample. Fires a `face_not_detected`
    /// violation when the miss streak reaches the threshold exactly.
    pub fn face_sample(&mut self, face_present: bool, now: DateTime<Utc>) -> Vec<Effect> {
        if !self.sampler_active() {
            return Vec::new();
        }
        if self.presence.observe(face_present) {
            self.record_violation(ViolationKind::FaceNotDetected, now)
        } else {
            Vec::new()
        }
    }

    /// Replaces the answer buffer for the current question. Ignored once
    /// the question is answered or the session is not running.
    pub fn update_draft(&mut self, selected: Vec<String>, text: Option<String>) {
        if self.phase != Phase::Running || self.answered_current() || self.auto_advance.is_some() {
            return;
        }
        self.draft = Draft { selected, text };
    }

    /// Captures the answer buffer for scoring. Returns None when there is
    /// nothing to submit: not running, or the current question already has
    /// its answer (double submissions are dropped here).
    pub fn prepare_submission(&self, now: DateTime<Utc>) -> Option<PendingSubmission> {
        if self.phase != Phase::Running || self.answered_current() {
            return None;
        }
        let started = self.question_started_at?;
        let time_taken = (now - started).num_seconds().max(0) as u32;
        Some(PendingSubmission {
            selected: self.draft.selected.clone(),
            text: self.draft.text.clone(),
            time_taken,
        })
    }

    /// Appends the answer record, awards points and arms the auto-advance
    /// countdown. Correct choice answers earn the base points plus
    /// `max(0, (budget - taken) * 2)`; correct open answers earn a flat
    /// amount; everything incorrect earns zero.
    pub fn score_submission(
        &mut self,
        submission: PendingSubmission,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Vec<Effect> {
        if self.phase != Phase::Running || self.answered_current() {
            return Vec::new();
        }
        let question = match self.questions.get(self.current_index) {
            Some(q) => q.clone(),
            None => return Vec::new(),
        };
        let points = if !is_correct {
            0
        } else {
            match question.question_type {
                QuestionType::Open => OPEN_ANSWER_POINTS,
                QuestionType::Single | QuestionType::Multiple => {
                    let bonus =
                        (self.time_limit as i64 - submission.time_taken as i64).max(0) as u32 * 2;
                    CHOICE_POINTS + bonus
                }
            }
        };
        self.answers.push(AnswerRecord {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            question_type: question.question_type,
            selected: submission.selected,
            text: submission.text,
            is_correct,
            points,
            time_taken: submission.time_taken,
        });
        self.score += points;
        self.auto_advance = Some(Countdown::new(self.auto_advance_ticks));
        vec![Effect::Report(MonitorEvent::SubmitAnswer {
            meta: self.meta(now),
            question_id: question.id,
            is_correct,
            points,
            score: self.score,
            face_violations: self.face_violation_total,
        })]
    }

    /// One 1 Hz tick. The auto-advance countdown is decoupled from the
    /// display-mode guard; the per-question countdown only runs while the
    /// session is in fullscreen and the current question is unanswered, so
    /// a fullscreen gap freezes the remaining time instead of resetting it.
    pub fn clock_tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let mut effects = Vec::new();
        let mut expired = false;
        if self.phase != Phase::Running {
            return TickOutcome { effects, expired };
        }
        let auto_fired = self.auto_advance.as_mut().map(Countdown::tick);
        match auto_fired {
            Some(true) => effects.extend(self.advance(now)),
            Some(false) => {}
            None => {
                if self.fullscreen && !self.answered_current() && self.countdown.tick() {
                    expired = true;
                }
            }
        }
        TickOutcome { effects, expired }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Moves to the next question, or completes the session after the last
    /// one. A no-op unless the current question has its answer, so calling
    /// it twice without a new answer in between cannot skip a question or
    /// append anything.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if self.phase != Phase::Running || !self.answered_current() {
            return Vec::new();
        }
        self.auto_advance = None;
        if self.current_index + 1 >= self.questions.len() {
            return self.complete(now);
        }
        self.current_index += 1;
        self.countdown.reset(self.time_limit);
        self.question_started_at = Some(now);
        self.draft = Draft::default();
        vec![Effect::Direct(Directive::QuestionAdvanced {
            index: self.current_index,
            remaining: self.countdown.remaining(),
        })]
    }

    /// `Running -> Completed`, exactly once. The session task tears down
    /// its timers on seeing this; the directives ask the tab to leave
    /// fullscreen and stop camera tracks.
    fn complete(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        self.phase = Phase::Completed;
        let passed = self.score >= self.passing_score;
        vec![
            Effect::Direct(Directive::ExitFullscreen),
            Effect::Direct(Directive::StopCamera),
            Effect::Report(MonitorEvent::ExamCompleted {
                meta: self.meta(now),
                score: self.score,
                face_violations: self.face_violation_total,
                passed,
            }),
            Effect::Direct(Directive::Completed {
                score: self.score,
                passed,
            }),
        ]
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            quiz_id: self.quiz_id.clone(),
            subject_id: self.subject_id.clone(),
            phase: self.phase,
            current_index: self.current_index,
            total_questions: self.questions.len(),
            answered: self.answers.len(),
            remaining_seconds: self.countdown.remaining(),
            score: self.score,
            passed: match self.phase {
                Phase::Completed => Some(self.score >= self.passing_score),
                _ => None,
            },
            violations: self.violation_total,
            face_violations: self.face_violation_total,
            fullscreen: self.fullscreen,
            camera_granted: self.camera_granted,
            warning_active: self.warning_until.is_some_and(|until| now < until),
            current_question: match self.phase {
                Phase::Running => self.current_question().map(PublicQuestion::from),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::ChoiceOption;

    fn tuning() -> Tuning {
        Tuning {
            time_limit: 10,
            passing_score: 100,
            auto_advance_ticks: 2,
            face_miss_threshold: 5,
        }
    }

    fn single_choice(id: &str, correct: &str) -> Question {
        Question {
            id: id.into(),
            question_type: QuestionType::Single,
            text: format!("question {id}"),
            options: ["a", "b", "c"]
                .iter()
                .map(|o| ChoiceOption {
                    id: (*o).into(),
                    text: format!("option {o}"),
                    is_correct: *o == correct,
                })
                .collect(),
            media_url: None,
        }
    }

    fn open_question(id: &str) -> Question {
        Question {
            id: id.into(),
            question_type: QuestionType::Open,
            text: format!("explain {id}"),
            options: vec![],
            media_url: None,
        }
    }

    fn running_session(questions: Vec<Question>) -> (ExamSession, DateTime<Utc>) {
        let mut s = ExamSession::new(
            "s1".into(),
            "quiz".into(),
            "learner".into(),
            questions,
            tuning(),
        );
        let t0 = Utc::now();
        s.set_camera(true);
        s.start(t0).unwrap();
        s.set_fullscreen(true, t0);
        (s, t0)
    }

    fn count_reports(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::Report(_)))
            .count()
    }

    #[test]
    fn start_requires_camera_grant() {
        let mut s = ExamSession::new(
            "s1".into(),
            "quiz".into(),
            "learner".into(),
            vec![single_choice("q1", "a")],
            tuning(),
        );
        assert!(matches!(
            s.start(Utc::now()),
            Err(StartRefusal::CameraNotGranted)
        ));
        assert_eq!(s.phase(), Phase::NotStarted);

        s.set_camera(true);
        let effects = s.start(Utc::now()).unwrap();
        assert_eq!(s.phase(), Phase::Running);
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::Direct(Directive::RequestFullscreen))));
        assert!(matches!(
            s.start(Utc::now()),
            Err(StartRefusal::AlreadyStarted)
        ));
    }

    #[test]
    fn correct_single_choice_scores_base_plus_time_bonus() {
        // 3 s of a 10 s budget: 100 + (10 - 3) * 2 = 114.
        let (mut s, t0) = running_session(vec![single_choice("q1", "b")]);
        s.update_draft(vec!["b".into()], None);
        let at = t0 + Duration::seconds(3);
        let pending = s.prepare_submission(at).unwrap();
        assert_eq!(pending.time_taken, 3);
        let correct = s.current_question().unwrap().evaluate_choice(&pending.selected);
        s.score_submission(pending, correct, at);
        assert_eq!(s.score(), 114);
        assert!(s.answers()[0].is_correct);
    }

    #[test]
    fn overrun_earns_no_negative_bonus() {
        let (mut s, t0) = running_session(vec![single_choice("q1", "b")]);
        s.update_draft(vec!["b".into()], None);
        let at = t0 + Duration::seconds(25);
        let pending = s.prepare_submission(at).unwrap();
        s.score_submission(pending, true, at);
        assert_eq!(s.score(), 100);
    }

    #[test]
    fn correct_open_answer_scores_flat() {
        let (mut s, t0) = running_session(vec![open_question("q1")]);
        s.update_draft(vec![], Some("because entropy".into()));
        let at = t0 + Duration::seconds(9);
        let pending = s.prepare_submission(at).unwrap();
        s.score_submission(pending, true, at);
        assert_eq!(s.score(), OPEN_ANSWER_POINTS);
    }

    #[test]
    fn incorrect_answers_score_zero() {
        let (mut s, t0) = running_session(vec![single_choice("q1", "b")]);
        s.update_draft(vec!["a".into()], None);
        let pending = s.prepare_submission(t0 + Duration::seconds(2)).unwrap();
        let correct = s.current_question().unwrap().evaluate_choice(&pending.selected);
        assert!(!correct);
        s.score_submission(pending, correct, t0 + Duration::seconds(2));
        assert_eq!(s.score(), 0);
        assert_eq!(s.answers().len(), 1);
    }

    #[test]
    fn expiry_with_empty_buffer_records_a_skip() {
        let (mut s, t0) = running_session(vec![
            single_choice("q1", "a"),
            single_choice("q2", "a"),
        ]);
        // Burn the full 10 s budget.
        let mut expired = false;
        for i in 1..=10 {
            let tick = s.clock_tick(t0 + Duration::seconds(i));
            expired = tick.expired;
        }
        assert!(expired, "countdown must expire on the tenth tick");

        let at = t0 + Duration::seconds(10);
        let pending = s.prepare_submission(at).unwrap();
        assert!(pending.is_empty());
        s.score_submission(pending, false, at);
        assert_eq!(s.answers().len(), 1);
        assert!(!s.answers()[0].is_correct);
        assert_eq!(s.answers()[0].points, 0);

        // Two auto-advance ticks later the next question is live.
        s.clock_tick(at + Duration::seconds(1));
        s.clock_tick(at + Duration::seconds(2));
        assert_eq!(s.snapshot(at).current_index + 1, 2);
    }

    #[test]
    fn fullscreen_gap_freezes_the_countdown() {
        let (mut s, t0) = running_session(vec![single_choice("q1", "a")]);
        s.clock_tick(t0 + Duration::seconds(1));
        s.clock_tick(t0 + Duration::seconds(2));
        assert_eq!(s.remaining_seconds(), 8);

        // 4 s outside fullscreen: the clock is suspended, not reset.
        s.set_fullscreen(false, t0 + Duration::seconds(2));
        for i in 3..=6 {
            s.clock_tick(t0 + Duration::seconds(i));
        }
        assert_eq!(s.remaining_seconds(), 8);

        s.set_fullscreen(true, t0 + Duration::seconds(6));
        s.clock_tick(t0 + Duration::seconds(7));
        assert_eq!(s.remaining_seconds(), 7);
    }

    #[test]
    fn advance_is_idempotent_without_a_new_answer() {
        let (mut s, t0) = running_session(vec![
            single_choice("q1", "a"),
            single_choice("q2", "a"),
        ]);
        s.update_draft(vec!["a".into()], None);
        let pending = s.prepare_submission(t0 + Duration::seconds(1)).unwrap();
        s.score_submission(pending, true, t0 + Duration::seconds(1));
        assert_eq!(s.answers().len(), 1);

        s.advance(t0 + Duration::seconds(2));
        let before = s.answers().len();
        s.advance(t0 + Duration::seconds(3));
        s.advance(t0 + Duration::seconds(4));
        assert_eq!(s.answers().len(), before);
        assert_eq!(s.snapshot(t0).current_index, 1);
    }

    #[test]
    fn double_submission_is_dropped() {
        let (mut s, t0) = running_session(vec![single_choice("q1", "a")]);
        s.update_draft(vec!["a".into()], None);
        let at = t0 + Duration::seconds(1);
        let pending = s.prepare_submission(at).unwrap();
        s.score_submission(pending, true, at);
        assert!(s.prepare_submission(at + Duration::seconds(1)).is_none());
        assert_eq!(s.answers().len(), 1);
    }

    #[test]
    fn violation_tally_matches_emitted_reports() {
        let (mut s, t0) = running_session(vec![single_choice("q1", "a")]);
        let mut reports = 0;
        reports += count_reports(&s.record_violation(ViolationKind::TabSwitch, t0));
        reports += count_reports(&s.record_violation(ViolationKind::CopyAttempt, t0));
        reports += count_reports(&s.record_violation(ViolationKind::TabSwitch, t0));
        assert_eq!(s.violation_total(), 3);
        assert_eq!(reports, 3);
        assert_eq!(s.violation_log().len(), 3);
        assert_eq!(s.violation_log()[2].running_total, 3);
        assert!(s.face_violation_total() <= s.violation_total());
        // Rapid repeats are not deduplicated.
        assert_eq!(
            s.violation_log()
                .iter()
                .filter(|v| v.kind == ViolationKind::TabSwitch)
                .count(),
            2
        );
    }

    #[test]
    fn five_consecutive_misses_fire_one_face_violation() {
        let (mut s, t0) = running_session(vec![single_choice("q1", "a")]);
        for i in 0..4 {
            let effects = s.face_sample(false, t0 + Duration::seconds(i));
            assert!(effects.is_empty(), "no violation before the fifth miss");
        }
        let effects = s.face_sample(false, t0 + Duration::seconds(4));
        assert_eq!(count_reports(&effects), 1);
        assert_eq!(s.face_violation_total(), 1);
        assert_eq!(s.violation_total(), 1);

        // The streak keeps climbing without firing again.
        assert!(s.face_sample(false, t0 + Duration::seconds(5)).is_empty());
        assert_eq!(s.face_violation_total(), 1);

        // Reset, then a fresh streak fires once more.
        s.face_sample(true, t0 + Duration::seconds(6));
        for i in 7..11 {
            assert!(s.face_sample(false, t0 + Duration::seconds(i)).is_empty());
        }
        assert_eq!(count_reports(&s.face_sample(false, t0 + Duration::seconds(11))), 1);
        assert_eq!(s.face_violation_total(), 2);
    }

    #[test]
    fn sampler_pauses_outside_fullscreen() {
        let (mut s, t0) = running_session(vec![single_choice("q1", "a")]);
        s.set_fullscreen(false, t0);
        for i in 0..10 {
            assert!(s.face_sample(false, t0 + Duration::seconds(i)).is_empty());
        }
        assert_eq!(s.face_violation_total(), 0);
    }

    #[test]
    fn last_answer_completes_the_session() {
        let (mut s, t0) = running_session(vec![single_choice("q1", "b")]);
        s.update_draft(vec!["b".into()], None);
        let at = t0 + Duration::seconds(2);
        let pending = s.prepare_submission(at).unwrap();
        s.score_submission(pending, true, at);

        let effects = s.advance(at + Duration::seconds(2));
        assert_eq!(s.phase(), Phase::Completed);
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::Direct(Directive::ExitFullscreen))));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::Direct(Directive::StopCamera))));
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Report(MonitorEvent::ExamCompleted { passed: true, .. })
        )));
        assert_eq!(s.answers().len(), 1);

        // Terminal: no further mutation sticks.
        let score_before = s.score();
        assert!(s.record_violation(ViolationKind::TabSwitch, at).is_empty());
        assert!(s.prepare_submission(at).is_none());
        assert!(s.clock_tick(at).effects.is_empty());
        assert_eq!(s.score(), score_before);
    }

    #[test]
    fn warning_flag_expires_after_three_seconds() {
        let (mut s, t0) = running_session(vec![single_choice("q1", "a")]);
        s.record_violation(ViolationKind::RightClick, t0);
        assert!(s.snapshot(t0 + Duration::seconds(2)).warning_active);
        assert!(!s.snapshot(t0 + Duration::seconds(3)).warning_active);
    }
}
