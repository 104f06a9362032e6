//! Client-side orchestration of the interview Q&A loop.
//!
//! `InterviewFlow` is the single source of truth for one visit to the
//! interview screen: which question is active, whether a follow-up round is
//! running, what the user has typed or said so far, and which collaborators
//! are live. It consumes `Input` events, talks to the remote API through the
//! injected `InterviewApi`, and emits `Command`s over an mpsc channel for
//! every side effect. All timers are scheduled through the runtime and keyed
//! by `TimerKind`, so tearing the flow down cancels everything it started.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::mpsc::Sender;

use crate::api::{AnswerRequest, ApiError, CompleteRequest, InterviewApi};
use crate::model::{Feedback, Session, SessionStatus};
use crate::{Command, Input, InputMode, TimerKind};

/// Reveal speed of the prompt typing effect.
pub const REVEAL_MS_PER_CHAR: u64 = 30;
/// Pause between reveal completion and input enablement.
pub const INPUT_GRACE: Duration = Duration::from_millis(1500);
/// Silence watchdog timeout while listening.
pub const SILENCE_TIMEOUT: Duration = Duration::from_secs(4);
/// Minimum hold on the analyzing interstitial. A UX pacing device; never
/// tied to actual work.
pub const ANALYSIS_HOLD: Duration = Duration::from_millis(2500);
/// Upper bound on automatic recognition restarts before giving up.
pub const MAX_RECOGNITION_RESTARTS: u32 = 5;

/// Cosmetic status messages cycled on the analyzing interstitial.
pub const ANALYSIS_STAGES: [&str; 5] = [
    "Analyzing intent patterns...",
    "Cross-referencing financial telemetry...",
    "Validating home-country ties...",
    "Checking itinerary coherence...",
    "Generating final logic pulse...",
];

/// The phase of the interview screen. Exactly one phase is active at a time;
/// transitions are handled exhaustively in `InterviewFlow::handle`.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Session fetch in flight.
    Loading,
    /// Session fetch failed; a retry affordance is showing.
    LoadFailed,
    /// Prompt reveal (and the post-reveal grace period) running.
    PresentingQuestion,
    /// Input enabled, response timer running.
    AwaitingInput,
    /// Answer submission in flight.
    Submitting,
    /// Feedback received; analyzing interstitial holding.
    Analyzing,
    /// Feedback panel showing; waiting for the next action.
    ShowingFeedback,
    /// Termination confirmation modal showing; resumes the boxed phase on
    /// cancel.
    ConfirmingTermination(Box<Phase>),
    /// Completion request in flight (or failed and awaiting retry).
    Completing,
    /// Completion acknowledged; navigation issued.
    Done,
}

pub struct InterviewFlow {
    session_id: i64,
    phase: Phase,
    mode: InputMode,
    session: Option<Session>,
    current_index: usize,
    /// Pending follow-up text from the latest feedback, if any.
    follow_up: Option<String>,
    /// The active round is a follow-up (same question id as the parent).
    follow_up_active: bool,
    /// A follow-up was already asked for the current question.
    follow_up_asked: bool,
    answer_text: String,
    interim_transcript: String,
    edit_count: u32,
    pending_feedback: Option<Feedback>,
    /// Status to (re)send while `Completing`.
    pending_completion: Option<SessionStatus>,
    /// Timer fires held back while the termination modal is open; replayed
    /// in order if the user cancels.
    deferred_timers: Vec<TimerKind>,
    listening: bool,
    mic_enabled: bool,
    camera_enabled: bool,
    input_enabled: bool,
    silence_warning: bool,
    recognition_restarts: u32,
    question_started_at: Option<Instant>,
    session_started_at: Option<Instant>,
}

impl InterviewFlow {
    pub fn new(session_id: i64, mode: InputMode) -> Self {
        Self {
            session_id,
            phase: Phase::Loading,
            mode,
            session: None,
            current_index: 0,
            follow_up: None,
            follow_up_active: false,
            follow_up_asked: false,
            answer_text: String::new(),
            interim_transcript: String::new(),
            edit_count: 0,
            pending_feedback: None,
            pending_completion: None,
            deferred_timers: Vec::new(),
            listening: false,
            mic_enabled: true,
            camera_enabled: true,
            input_enabled: false,
            silence_warning: false,
            recognition_restarts: 0,
            question_started_at: None,
            session_started_at: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn edit_count(&self) -> u32 {
        self.edit_count
    }

    pub fn answer_text(&self) -> &str {
        &self.answer_text
    }

    /// Fetch the session and present the first question. Failures land in
    /// `LoadFailed` with a retryable error instead of an indefinite spinner.
    pub async fn start<A: InterviewApi + Send + Sync>(
        &mut self,
        api: &A,
        tx: &Sender<Command>,
    ) -> Result<()> {
        self.phase = Phase::Loading;
        match api.fetch_session(self.session_id).await {
            Ok(session) => {
                let empty = session.questions.is_empty();
                self.session = Some(session);
                self.session_started_at = Some(Instant::now());
                if empty {
                    // Nothing to ask; finalize so a report stays reachable.
                    tracing::warn!(session_id = self.session_id, "session has no questions");
                    self.complete(api, tx, SessionStatus::Completed).await
                } else {
                    self.current_index = 0;
                    self.present_current(tx).await
                }
            }
            Err(e) => {
                tracing::error!(session_id = self.session_id, error = %e, "session fetch failed");
                self.phase = Phase::LoadFailed;
                self.show_api_error(tx, &e, "Could not load the interview session")
                    .await
            }
        }
    }

    /// Single dispatch point for everything the runtime feeds back in.
    pub async fn handle<A: InterviewApi + Send + Sync>(
        &mut self,
        api: &A,
        input: Input,
        tx: &Sender<Command>,
    ) -> Result<()> {
        match input {
            Input::TimerFired(kind) => self.timer_fired(tx, kind).await,
            Input::TextEdited(text) => self.text_edited(text),
            Input::TranscriptInterim(text) => self.transcript_interim(tx, text).await,
            Input::TranscriptFinal(text) => self.transcript_final(tx, text).await,
            Input::SpeechEnded => self.speech_ended(tx).await,
            Input::RecognitionEnded => self.recognition_ended(tx).await,
            Input::RecognitionUnavailable => self.recognition_unavailable(tx).await,
            Input::CameraDenied => self.camera_denied(tx).await,
            Input::Submit => self.submit(api, tx).await,
            Input::Next => self.next(api, tx).await,
            Input::Retry => self.retry(api, tx).await,
            Input::SwitchMode(mode) => self.switch_mode(tx, mode).await,
            Input::ToggleCamera => self.toggle_camera(tx).await,
            Input::ToggleMic => self.toggle_mic(tx).await,
            Input::TerminateRequested => self.terminate_requested(tx).await,
            Input::TerminateConfirmed => self.terminate_confirmed(api, tx).await,
            Input::TerminateCancelled => self.terminate_cancelled(tx).await,
        }
    }

    /// Cancel every outstanding side effect. Must be called when the
    /// interview view goes away, whatever the phase.
    pub async fn shutdown(&mut self, tx: &Sender<Command>) -> Result<()> {
        emit(tx, Command::StopSpeaking).await?;
        if self.listening {
            self.stop_listening(tx).await?;
        }
        if self.mode == InputMode::Video {
            emit(tx, Command::ReleaseCapture).await?;
        }
        for kind in TimerKind::ALL {
            emit(tx, Command::CancelTimer(kind)).await?;
        }
        Ok(())
    }

    fn active_prompt(&self) -> Option<String> {
        if self.follow_up_active {
            return self.follow_up.clone();
        }
        self.session
            .as_ref()
            .and_then(|s| s.questions.get(self.current_index))
            .map(|q| q.text.clone())
    }

    /// Id to submit under. A follow-up round reuses the parent question's id.
    fn active_question_id(&self) -> Option<i64> {
        self.session
            .as_ref()
            .and_then(|s| s.questions.get(self.current_index))
            .map(|q| q.id)
    }

    async fn present_current(&mut self, tx: &Sender<Command>) -> Result<()> {
        let Some(text) = self.active_prompt() else {
            return Ok(());
        };
        self.phase = Phase::PresentingQuestion;
        self.answer_text.clear();
        self.interim_transcript.clear();
        self.input_enabled = false;
        self.silence_warning = false;
        emit(tx, Command::SetInputEnabled(false)).await?;
        emit(tx, Command::ClearSilenceWarning).await?;
        emit(
            tx,
            Command::RevealPrompt {
                text: text.clone(),
                follow_up: self.follow_up_active,
            },
        )
        .await?;
        if self.mode != InputMode::Text {
            emit(tx, Command::Speak(text.clone())).await?;
        }
        let reveal = Duration::from_millis(text.chars().count() as u64 * REVEAL_MS_PER_CHAR);
        emit(
            tx,
            Command::StartTimer {
                kind: TimerKind::Reveal,
                duration: reveal,
            },
        )
        .await
    }

    async fn timer_fired(&mut self, tx: &Sender<Command>, kind: TimerKind) -> Result<()> {
        // The confirmation modal pauses the interview. A fire that lands now
        // must not be lost: the prior phase is waiting on it, so hold it and
        // replay on cancel.
        if matches!(self.phase, Phase::ConfirmingTermination(_)) {
            self.deferred_timers.push(kind);
            return Ok(());
        }
        match kind {
            TimerKind::Reveal => {
                if self.phase == Phase::PresentingQuestion {
                    emit(
                        tx,
                        Command::StartTimer {
                            kind: TimerKind::InputGrace,
                            duration: INPUT_GRACE,
                        },
                    )
                    .await?;
                }
                Ok(())
            }
            TimerKind::InputGrace => {
                if self.phase != Phase::PresentingQuestion {
                    return Ok(());
                }
                self.phase = Phase::AwaitingInput;
                self.input_enabled = true;
                self.edit_count = 0;
                self.question_started_at = Some(Instant::now());
                emit(tx, Command::SetInputEnabled(true)).await?;
                if self.mode != InputMode::Text && self.mic_enabled && !self.listening {
                    self.start_listening(tx).await?;
                }
                Ok(())
            }
            TimerKind::Silence => {
                if self.listening && self.phase == Phase::AwaitingInput {
                    self.silence_warning = true;
                    emit(tx, Command::ShowSilenceWarning).await?;
                }
                Ok(())
            }
            TimerKind::Analysis => {
                if self.phase != Phase::Analyzing {
                    return Ok(());
                }
                self.phase = Phase::ShowingFeedback;
                let feedback = self.pending_feedback.clone().unwrap_or_default();
                emit(tx, Command::ShowFeedback(feedback)).await
            }
        }
    }

    fn text_edited(&mut self, text: String) -> Result<()> {
        if !self.input_enabled || self.phase != Phase::AwaitingInput {
            return Ok(());
        }
        // A shrinking edit is a hesitation signal the server scores on.
        if text.len() < self.answer_text.len() {
            self.edit_count += 1;
        }
        self.answer_text = text;
        Ok(())
    }

    async fn transcript_interim(&mut self, tx: &Sender<Command>, text: String) -> Result<()> {
        if !self.listening {
            return Ok(());
        }
        self.interim_transcript = text;
        self.reset_silence_timer(tx).await
    }

    async fn transcript_final(&mut self, tx: &Sender<Command>, text: String) -> Result<()> {
        if !self.listening {
            return Ok(());
        }
        if !text.is_empty() {
            if !self.answer_text.is_empty() {
                self.answer_text.push(' ');
            }
            self.answer_text.push_str(&text);
        }
        self.interim_transcript.clear();
        self.recognition_restarts = 0;
        self.reset_silence_timer(tx).await
    }

    async fn reset_silence_timer(&mut self, tx: &Sender<Command>) -> Result<()> {
        if self.silence_warning {
            self.silence_warning = false;
            emit(tx, Command::ClearSilenceWarning).await?;
        }
        emit(tx, Command::CancelTimer(TimerKind::Silence)).await?;
        emit(
            tx,
            Command::StartTimer {
                kind: TimerKind::Silence,
                duration: SILENCE_TIMEOUT,
            },
        )
        .await
    }

    async fn speech_ended(&mut self, tx: &Sender<Command>) -> Result<()> {
        // Synthesis finished reading the question; resume listening so the
        // spoken answer can start immediately.
        if self.mode != InputMode::Text
            && self.phase == Phase::AwaitingInput
            && self.mic_enabled
            && !self.listening
        {
            self.start_listening(tx).await?;
        }
        Ok(())
    }

    async fn recognition_ended(&mut self, tx: &Sender<Command>) -> Result<()> {
        if !self.listening {
            return Ok(());
        }
        if self.recognition_restarts < MAX_RECOGNITION_RESTARTS {
            self.recognition_restarts += 1;
            tracing::debug!(attempt = self.recognition_restarts, "restarting recognition");
            emit(tx, Command::StartListening).await
        } else {
            // Persistent failure; stop pretending to listen.
            tracing::warn!("recognition keeps stopping; giving up on continuous listening");
            self.stop_listening(tx).await?;
            emit(
                tx,
                Command::Notice("Speech capture keeps stopping. You can continue by typing.".into()),
            )
            .await
        }
    }

    async fn recognition_unavailable(&mut self, tx: &Sender<Command>) -> Result<()> {
        if self.mode == InputMode::Text {
            return Ok(());
        }
        tracing::warn!("speech recognition unsupported; falling back to text input");
        if self.listening {
            self.stop_listening(tx).await?;
        }
        if self.mode == InputMode::Video {
            emit(tx, Command::ReleaseCapture).await?;
        }
        self.mode = InputMode::Text;
        emit(tx, Command::StopSpeaking).await?;
        emit(
            tx,
            Command::Notice("Speech recognition is not available. Switched to text input.".into()),
        )
        .await
    }

    async fn camera_denied(&mut self, tx: &Sender<Command>) -> Result<()> {
        if self.mode != InputMode::Video {
            return Ok(());
        }
        tracing::warn!("camera access denied; falling back to voice mode");
        self.mode = InputMode::Voice;
        emit(tx, Command::ReleaseCapture).await?;
        emit(
            tx,
            Command::Notice("Camera access required for video mode. Falling back to voice.".into()),
        )
        .await
    }

    /// Submit the combined typed + interim answer. Ignored outside
    /// `AwaitingInput`, which is what guards against duplicate submissions
    /// while a previous one is in flight or analyzing.
    async fn submit<A: InterviewApi + Send + Sync>(
        &mut self,
        api: &A,
        tx: &Sender<Command>,
    ) -> Result<()> {
        if self.phase != Phase::AwaitingInput || !self.input_enabled {
            return Ok(());
        }
        let mut combined = self.answer_text.clone();
        if !self.interim_transcript.is_empty() {
            if !combined.is_empty() {
                combined.push(' ');
            }
            combined.push_str(&self.interim_transcript);
        }
        if combined.trim().is_empty() {
            return Ok(());
        }
        let Some(question_id) = self.active_question_id() else {
            return Ok(());
        };

        if self.listening {
            self.stop_listening(tx).await?;
        }
        emit(tx, Command::StopSpeaking).await?;

        self.phase = Phase::Submitting;
        self.input_enabled = false;
        emit(tx, Command::SetInputEnabled(false)).await?;

        let response_time_ms = self
            .question_started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        let request = AnswerRequest {
            question_id,
            user_audio_text: combined.clone(),
            response_time_ms,
            edit_count: self.edit_count,
        };

        match api.submit_answer(request).await {
            Ok(answer) => {
                self.answer_text = combined;
                self.interim_transcript.clear();
                let feedback = answer.feedback.unwrap_or_default();
                // A follow-up is asked at most once per question, and a
                // follow-up answer cannot spawn another one.
                if !self.follow_up_active && !self.follow_up_asked {
                    self.follow_up = feedback.follow_up.clone();
                }
                self.pending_feedback = Some(feedback);
                self.phase = Phase::Analyzing;
                emit(
                    tx,
                    Command::ShowAnalyzing {
                        stages: ANALYSIS_STAGES.iter().map(|s| s.to_string()).collect(),
                    },
                )
                .await?;
                emit(
                    tx,
                    Command::StartTimer {
                        kind: TimerKind::Analysis,
                        duration: ANALYSIS_HOLD,
                    },
                )
                .await
            }
            Err(e) => {
                tracing::error!(question_id, error = %e, "answer submission failed");
                self.phase = Phase::AwaitingInput;
                self.input_enabled = true;
                emit(tx, Command::SetInputEnabled(true)).await?;
                self.show_api_error(tx, &e, "Could not submit your answer").await
            }
        }
    }

    /// Advance past the feedback panel: follow-up round, next question, or
    /// completion after the last one.
    async fn next<A: InterviewApi + Send + Sync>(
        &mut self,
        api: &A,
        tx: &Sender<Command>,
    ) -> Result<()> {
        if self.phase != Phase::ShowingFeedback {
            return Ok(());
        }
        self.pending_feedback = None;
        self.answer_text.clear();
        self.interim_transcript.clear();

        if self.follow_up.is_some() && !self.follow_up_active {
            self.follow_up_active = true;
            self.follow_up_asked = true;
            return self.present_current(tx).await;
        }

        if self.follow_up_active {
            self.follow_up_active = false;
            self.follow_up = None;
        }

        let total = self.session.as_ref().map(|s| s.questions.len()).unwrap_or(0);
        if self.current_index + 1 < total {
            self.current_index += 1;
            self.follow_up_asked = false;
            self.present_current(tx).await
        } else {
            self.complete(api, tx, SessionStatus::Completed).await
        }
    }

    async fn retry<A: InterviewApi + Send + Sync>(
        &mut self,
        api: &A,
        tx: &Sender<Command>,
    ) -> Result<()> {
        match self.phase {
            Phase::LoadFailed => self.start(api, tx).await,
            Phase::Completing => {
                if let Some(status) = self.pending_completion {
                    self.complete(api, tx, status).await
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    async fn complete<A: InterviewApi + Send + Sync>(
        &mut self,
        api: &A,
        tx: &Sender<Command>,
        status: SessionStatus,
    ) -> Result<()> {
        self.phase = Phase::Completing;
        self.pending_completion = Some(status);
        let total_duration = self
            .session_started_at
            .map(|t| t.elapsed().as_secs() as i64)
            .unwrap_or(0);
        let request = CompleteRequest {
            status,
            total_duration,
        };
        match api.complete_session(self.session_id, request).await {
            Ok(ack) => {
                tracing::info!(
                    session_id = self.session_id,
                    final_score = ?ack.final_score,
                    "session completed"
                );
                self.pending_completion = None;
                self.phase = Phase::Done;
                self.shutdown(tx).await?;
                emit(tx, Command::NavigateToReport(self.session_id)).await
            }
            Err(e) => {
                tracing::error!(session_id = self.session_id, error = %e, "completion failed");
                self.show_api_error(tx, &e, "Could not finalize the session")
                    .await
            }
        }
    }

    async fn switch_mode(&mut self, tx: &Sender<Command>, mode: InputMode) -> Result<()> {
        // Mode is locked while the question is being revealed and while a
        // submission is in flight.
        if !matches!(self.phase, Phase::AwaitingInput | Phase::ShowingFeedback) {
            return Ok(());
        }
        if mode == self.mode {
            return Ok(());
        }

        // Tear down the old mode's collaborators before attaching the new
        // one, so recognition sessions never overlap.
        emit(tx, Command::StopSpeaking).await?;
        if self.listening {
            self.stop_listening(tx).await?;
        }
        if self.mode == InputMode::Video {
            emit(tx, Command::ReleaseCapture).await?;
        }

        self.mode = mode;
        match mode {
            InputMode::Text => Ok(()),
            InputMode::Voice => {
                if self.phase == Phase::AwaitingInput && self.mic_enabled {
                    self.start_listening(tx).await?;
                }
                Ok(())
            }
            InputMode::Video => {
                self.camera_enabled = true;
                self.mic_enabled = true;
                emit(tx, Command::AcquireCapture).await?;
                if self.phase == Phase::AwaitingInput {
                    self.start_listening(tx).await?;
                }
                Ok(())
            }
        }
    }

    async fn toggle_camera(&mut self, tx: &Sender<Command>) -> Result<()> {
        if self.mode != InputMode::Video {
            return Ok(());
        }
        self.camera_enabled = !self.camera_enabled;
        emit(tx, Command::SetCameraEnabled(self.camera_enabled)).await?;
        if self.camera_enabled
            && self.mic_enabled
            && self.phase == Phase::AwaitingInput
            && !self.listening
        {
            self.start_listening(tx).await?;
        }
        Ok(())
    }

    /// Microphone toggle. In video mode the media track and the recognition
    /// collaborator move in lockstep; in voice mode this is a plain
    /// listen/stop toggle.
    async fn toggle_mic(&mut self, tx: &Sender<Command>) -> Result<()> {
        match self.mode {
            InputMode::Text => Ok(()),
            InputMode::Voice => {
                // The mute intent outlives the current recognition session,
                // so auto-listen at the next question honors it.
                self.mic_enabled = !self.mic_enabled;
                if self.mic_enabled {
                    if self.phase == Phase::AwaitingInput && !self.listening {
                        self.start_listening(tx).await?;
                    }
                } else if self.listening {
                    self.stop_listening(tx).await?;
                }
                Ok(())
            }
            InputMode::Video => {
                self.mic_enabled = !self.mic_enabled;
                emit(tx, Command::SetMicEnabled(self.mic_enabled)).await?;
                if self.mic_enabled {
                    if self.phase == Phase::AwaitingInput && !self.listening {
                        self.start_listening(tx).await?;
                    }
                } else if self.listening {
                    self.stop_listening(tx).await?;
                }
                Ok(())
            }
        }
    }

    async fn terminate_requested(&mut self, tx: &Sender<Command>) -> Result<()> {
        if matches!(
            self.phase,
            Phase::Loading
                | Phase::LoadFailed
                | Phase::Completing
                | Phase::Done
                | Phase::ConfirmingTermination(_)
        ) {
            return Ok(());
        }
        let prior = std::mem::replace(&mut self.phase, Phase::Loading);
        self.phase = Phase::ConfirmingTermination(Box::new(prior));
        emit(tx, Command::ConfirmTermination).await
    }

    async fn terminate_confirmed<A: InterviewApi + Send + Sync>(
        &mut self,
        api: &A,
        tx: &Sender<Command>,
    ) -> Result<()> {
        if !matches!(self.phase, Phase::ConfirmingTermination(_)) {
            return Ok(());
        }
        self.deferred_timers.clear();
        if self.listening {
            self.stop_listening(tx).await?;
        }
        emit(tx, Command::StopSpeaking).await?;
        for kind in TimerKind::ALL {
            emit(tx, Command::CancelTimer(kind)).await?;
        }
        self.complete(api, tx, SessionStatus::EndedByUser).await
    }

    async fn terminate_cancelled(&mut self, tx: &Sender<Command>) -> Result<()> {
        if matches!(self.phase, Phase::ConfirmingTermination(_)) {
            if let Phase::ConfirmingTermination(prior) =
                std::mem::replace(&mut self.phase, Phase::Loading)
            {
                self.phase = *prior;
            }
            // Replay the fires the modal held back so the restored phase
            // picks up exactly where it left off.
            for kind in std::mem::take(&mut self.deferred_timers) {
                self.timer_fired(tx, kind).await?;
            }
        }
        Ok(())
    }

    async fn start_listening(&mut self, tx: &Sender<Command>) -> Result<()> {
        self.listening = true;
        self.recognition_restarts = 0;
        emit(tx, Command::StartListening).await?;
        emit(
            tx,
            Command::StartTimer {
                kind: TimerKind::Silence,
                duration: SILENCE_TIMEOUT,
            },
        )
        .await
    }

    async fn stop_listening(&mut self, tx: &Sender<Command>) -> Result<()> {
        self.listening = false;
        self.interim_transcript.clear();
        emit(tx, Command::StopListening).await?;
        emit(tx, Command::CancelTimer(TimerKind::Silence)).await?;
        if self.silence_warning {
            self.silence_warning = false;
            emit(tx, Command::ClearSilenceWarning).await?;
        }
        Ok(())
    }

    async fn show_api_error(
        &self,
        tx: &Sender<Command>,
        error: &ApiError,
        what: &str,
    ) -> Result<()> {
        emit(
            tx,
            Command::ShowError {
                message: format!("{what}: {error}"),
                retryable: error.is_retryable(),
            },
        )
        .await
    }
}

async fn emit(tx: &Sender<Command>, command: Command) -> Result<()> {
    tx.send(command)
        .await
        .context("runtime command channel closed")
}
