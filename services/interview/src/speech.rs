//! Console stand-ins for the browser speech and media capabilities.
//!
//! `ConsoleSpeech` renders utterances as log lines and reports completion
//! through the event channel, so the flow's speak-then-listen sequencing
//! runs unchanged. Recognition and media capture are genuinely unavailable
//! on a terminal, and saying so exercises the flow's fallback paths.

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use neurovisa_core::capabilities::{CapabilityError, MediaCapture, SpeechInput, SpeechOutput};
use neurovisa_core::Input;

pub struct ConsoleSpeech {
    events: Sender<Input>,
}

impl ConsoleSpeech {
    pub fn new(events: Sender<Input>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl SpeechOutput for ConsoleSpeech {
    async fn speak(&self, text: &str) -> Result<(), CapabilityError> {
        tracing::info!("[voice] {text}");
        // The utterance is instantaneous on a console.
        self.events
            .send(Input::SpeechEnded)
            .await
            .map_err(|e| CapabilityError::Failed(e.to_string()))
    }

    async fn cancel(&self) {}
}

/// A platform without speech recognition. `start` always refuses, which the
/// runtime reports as `Input::RecognitionUnavailable`.
pub struct UnsupportedRecognition;

#[async_trait]
impl SpeechInput for UnsupportedRecognition {
    async fn start(&self) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unsupported)
    }

    async fn stop(&self) {}
}

/// A platform without camera access. `acquire` always refuses, which the
/// runtime reports as `Input::CameraDenied`.
pub struct NoMediaCapture;

#[async_trait]
impl MediaCapture for NoMediaCapture {
    async fn acquire(&self) -> Result<(), CapabilityError> {
        Err(CapabilityError::PermissionDenied)
    }

    async fn set_camera_enabled(&self, _enabled: bool) {}

    async fn set_mic_enabled(&self, _enabled: bool) {}

    async fn release(&self) {}
}
