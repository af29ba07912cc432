//! Spoken queries.
//!
//! A [`CaptureSource`] turns speech into text and reports back through
//! session events tagged with the capture number it was started with. The
//! [`VoiceController`] makes sure only one capture runs at a time and drops
//! events from captures it has already stopped.

/// Why a capture failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    #[error("no speech was detected")]
    NoSpeech,
    #[error("no microphone was found")]
    NoMicrophone,
    #[error("microphone permission was denied")]
    PermissionDenied,
    #[error("network error during speech recognition")]
    Network,
    #[error("voice recognition is not supported here")]
    Unsupported,
    #[error("speech recognition failed: {0}")]
    Unknown(String),
}

impl VoiceError {
    /// Map a recognizer error code to a kind.
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "audio-capture" => Self::NoMicrophone,
            "not-allowed" | "service-not-allowed" => Self::PermissionDenied,
            "network" => Self::Network,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Short message suitable for a transient notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoSpeech => "Didn't catch that. Try speaking again.".into(),
            Self::NoMicrophone => "No microphone found.".into(),
            Self::PermissionDenied => {
                "Microphone access was denied.".into()
            }
            Self::Network => {
                "Speech recognition needs a network connection.".into()
            }
            Self::Unsupported => {
                "Voice recognition is not supported here. Type your search instead."
                    .into()
            }
            Self::Unknown(code) => format!("Voice search failed ({code})."),
        }
    }
}

/// One recognized utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    /// Interim results may still change; a final one ends the capture.
    pub is_final: bool,
}

/// A speech-to-text backend.
pub trait CaptureSource: Send {
    /// Begin listening. Results must be reported with `capture`.
    fn start(&mut self, capture: u64) -> Result<(), VoiceError>;
    /// Stop listening. Calling this when idle does nothing.
    fn stop(&mut self);
}

/// The capture backend chosen at startup.
pub enum Capture {
    Available(Box<dyn CaptureSource>),
    Unavailable,
}

impl Capture {
    /// Pick a backend. No speech engine ships with the terminal front end.
    pub fn detect() -> Self {
        tracing::debug!("no speech capture backend available");
        Self::Unavailable
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl std::fmt::Debug for Capture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Capture::Available"),
            Self::Unavailable => f.write_str("Capture::Unavailable"),
        }
    }
}

#[derive(Debug)]
pub struct VoiceController {
    capture: Capture,
    current: u64,
    listening: bool,
}

impl VoiceController {
    pub fn new(capture: Capture) -> Self {
        Self {
            capture,
            current: 0,
            listening: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Microphone button: stop if listening, otherwise start.
    pub fn toggle(&mut self) -> Result<(), VoiceError> {
        if self.listening {
            self.stop();
            Ok(())
        } else {
            self.start().map(|_| ())
        }
    }

    /// Start a new capture, stopping any active one first.
    pub fn start(&mut self) -> Result<u64, VoiceError> {
        self.stop();
        let Capture::Available(source) = &mut self.capture else {
            return Err(VoiceError::Unsupported);
        };

        self.current += 1;
        source.start(self.current)?;
        self.listening = true;
        tracing::debug!(capture = self.current, "voice capture started");
        Ok(self.current)
    }

    pub fn stop(&mut self) {
        if !self.listening {
            return;
        }
        if let Capture::Available(source) = &mut self.capture {
            source.stop();
        }
        self.listening = false;
        tracing::debug!(capture = self.current, "voice capture stopped");
    }

    /// Accept a transcript. Returns the text to use as the query, or `None`
    /// for a capture that is no longer active.
    pub fn on_result(
        &mut self,
        capture: u64,
        transcript: Transcript,
    ) -> Option<String> {
        if !self.is_current(capture) {
            return None;
        }
        if transcript.is_final {
            self.listening = false;
        }
        Some(transcript.text)
    }

    /// Accept a capture failure. Returns the error if it concerns the active
    /// capture.
    pub fn on_error(
        &mut self,
        capture: u64,
        error: VoiceError,
    ) -> Option<VoiceError> {
        if !self.is_current(capture) {
            return None;
        }
        tracing::warn!(error = %error, "speech recognition error");
        self.listening = false;
        Some(error)
    }

    pub fn on_end(&mut self, capture: u64) {
        if self.is_current(capture) {
            self.listening = false;
        }
    }

    fn is_current(&self, capture: u64) -> bool {
        self.listening && capture == self.current
    }
}
