//! Capability contracts for the browser-ish collaborators the flow steers:
//! speech synthesis, speech recognition and media capture.
//!
//! The flow itself never calls these; it emits `Command`s and the runtime
//! maps them onto whichever implementation is injected.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("capability not supported on this platform")]
    Unsupported,
    #[error("permission denied")]
    PermissionDenied,
    #[error("{0}")]
    Failed(String),
}

/// Text-to-speech collaborator. One utterance at a time; starting a new one
/// implies cancelling the previous.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), CapabilityError>;
    async fn cancel(&self);
}

/// Speech-to-text collaborator. Implementations deliver transcript fragments
/// back through the runtime's input channel.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    async fn start(&self) -> Result<(), CapabilityError>;
    async fn stop(&self);
}

/// Camera+microphone stream for video mode. Track toggles must stay in
/// lockstep with the flow's single source of truth for mic/camera state.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    async fn acquire(&self) -> Result<(), CapabilityError>;
    async fn set_camera_enabled(&self, enabled: bool);
    async fn set_mic_enabled(&self, enabled: bool);
    async fn release(&self);
}
