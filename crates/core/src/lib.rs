pub mod api;
pub mod capabilities;
pub mod dashboard;
pub mod flow;
pub mod model;
pub mod report;

use std::time::Duration;

use crate::model::Feedback;

/// Timers the flow schedules through the runtime. Each kind has at most one
/// live timer; starting a kind again restarts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Character-by-character prompt reveal is running.
    Reveal,
    /// Grace period between reveal completion and input enablement.
    InputGrace,
    /// Silence watchdog while the recognition collaborator is listening.
    Silence,
    /// Minimum hold on the analyzing interstitial.
    Analysis,
}

impl TimerKind {
    pub const ALL: [TimerKind; 4] = [
        TimerKind::Reveal,
        TimerKind::InputGrace,
        TimerKind::Silence,
        TimerKind::Analysis,
    ];
}

/// Mutually exclusive input modes for answering questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Text,
    Voice,
    Video,
}

/// Represents commands that the core logic (`InterviewFlow`) issues to the
/// runtime.
///
/// This enum is the primary API for decoupling the flow's decision-making
/// from the runtime's execution of side effects (speaking text, timers,
/// device handling, presentation).
#[derive(Debug, Clone)]
pub enum Command {
    /// Reveal the active prompt with the typing effect. `follow_up` marks a
    /// follow-up round so the runtime can badge it.
    RevealPrompt { text: String, follow_up: bool },
    /// Hand the prompt to the speech-synthesis collaborator.
    Speak(String),
    /// Cancel any in-flight speech synthesis.
    StopSpeaking,
    /// Start the speech-recognition collaborator.
    StartListening,
    /// Stop the speech-recognition collaborator.
    StopListening,
    /// Acquire the camera+microphone media stream (video mode).
    AcquireCapture,
    /// Release all media tracks.
    ReleaseCapture,
    /// Enable or disable the camera track.
    SetCameraEnabled(bool),
    /// Enable or disable the microphone track.
    SetMicEnabled(bool),
    /// Enable or disable answer input in the UI.
    SetInputEnabled(bool),
    /// Schedule a timer; the runtime fires it back as `Input::TimerFired`.
    StartTimer { kind: TimerKind, duration: Duration },
    /// Cancel a scheduled timer if it is still pending.
    CancelTimer(TimerKind),
    /// Show the analyzing interstitial, cycling the cosmetic stage messages.
    ShowAnalyzing { stages: Vec<String> },
    /// Render the feedback returned by the server.
    ShowFeedback(Feedback),
    /// Non-blocking warning that no speech has been detected.
    ShowSilenceWarning,
    ClearSilenceWarning,
    /// Dismissible informational notice (capability fallbacks and the like).
    Notice(String),
    /// Error surfaced to the user; retryable errors offer a retry affordance.
    ShowError { message: String, retryable: bool },
    /// Ask the user to confirm early termination.
    ConfirmTermination,
    /// The session is finished; move to the report view.
    NavigateToReport(i64),
}

/// Events the runtime feeds into the flow: timer fires, user actions and
/// collaborator callbacks.
#[derive(Debug, Clone)]
pub enum Input {
    TimerFired(TimerKind),
    /// Full replacement of the typed answer text.
    TextEdited(String),
    /// Not-yet-final transcript fragment; displayed but volatile.
    TranscriptInterim(String),
    /// Finalized transcript fragment; appended to the answer.
    TranscriptFinal(String),
    /// Speech synthesis finished the current utterance.
    SpeechEnded,
    /// The recognition collaborator stopped on its own.
    RecognitionEnded,
    /// No recognition support on this platform.
    RecognitionUnavailable,
    /// Camera permission was denied or the stream was lost.
    CameraDenied,
    Submit,
    Next,
    Retry,
    SwitchMode(InputMode),
    ToggleCamera,
    ToggleMic,
    TerminateRequested,
    TerminateConfirmed,
    TerminateCancelled,
}
