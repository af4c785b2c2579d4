//! Voice agent: turn detection, canned replies and the dialogue loop.

pub mod deepgram;
pub mod detector;
pub mod error;
pub mod file_audio;
pub mod responder;
pub mod rules;
pub mod session;

pub use deepgram::DeepgramClient;
pub use detector::{Activity, SilenceDetector, TurnDetector};
pub use error::{VoiceError, VoiceResult};
pub use file_audio::{FileMicrophone, FilePlayer};
pub use responder::{Language, Reply, Responder, speech_text};
pub use rules::Topic;
pub use session::{
    AudioPlayer, Conversation, Microphone, Recording, Services, SessionState, SpeechToText,
    TextToSpeech, Transcript, Turn, VoiceSession,
};

#[cfg(test)]
mod session_test;
