//! Voice loop error types.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum VoiceError {
    #[error("Microphone unavailable: {message}")]
    #[diagnostic(code(gyanrich::voice::microphone))]
    Microphone { message: String },

    #[error("Failed to transcribe audio: {message}")]
    #[diagnostic(code(gyanrich::voice::transcription))]
    Transcription { message: String },

    #[error("No speech detected")]
    #[diagnostic(
        code(gyanrich::voice::no_speech),
        help("Speak after the prompt and pause briefly when finished")
    )]
    NoSpeech,

    #[error("Failed to generate speech: {message}")]
    #[diagnostic(code(gyanrich::voice::synthesis))]
    Synthesis { message: String },

    #[error("Audio playback failed: {message}")]
    #[diagnostic(code(gyanrich::voice::playback))]
    Playback { message: String },

    #[error("Voice service not configured: {message}")]
    #[diagnostic(
        code(gyanrich::voice::not_configured),
        help("Set DEEPGRAM_ACCESS_TOKEN or pass --token")
    )]
    NotConfigured { message: String },

    #[error("Audio I/O error: {0}")]
    #[diagnostic(code(gyanrich::voice::io))]
    Io(#[from] std::io::Error),
}

pub type VoiceResult<T> = Result<T, VoiceError>;
