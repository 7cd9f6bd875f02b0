//! Text-to-speech collaborator.

use thiserror::Error;
use tracing::info;

/// Errors a speech backend can report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpeechError {
    #[error("speech synthesis unavailable")]
    Unavailable,
    #[error("language `{0}` is not supported")]
    UnsupportedLanguage(String),
}

/// Speaks short cues. `speak` is expected to be preceded by `cancel` so
/// a new cue never queues behind a stale one.
pub trait SpeechSynth {
    /// Stop any in-flight utterance.
    fn cancel(&mut self);

    fn speak(&mut self, text: &str, lang: &str) -> Result<(), SpeechError>;
}

/// Writes utterances to the log instead of an audio device.
#[derive(Debug, Clone, Default)]
pub struct LogSpeech {
    spoken: Vec<String>,
}

impl LogSpeech {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every utterance spoken so far.
    #[must_use]
    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }
}

impl SpeechSynth for LogSpeech {
    fn cancel(&mut self) {}

    fn speak(&mut self, text: &str, lang: &str) -> Result<(), SpeechError> {
        info!(lang, text, "speaking");
        self.spoken.push(text.to_string());
        Ok(())
    }
}
