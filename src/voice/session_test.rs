//! Tests for the voice session state machine and conversation loop.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::voice::detector::SilenceDetector;
use crate::voice::error::{VoiceError, VoiceResult};
use crate::voice::responder::Language;
use crate::voice::rules::Topic;
use crate::voice::session::*;

const LOUD: u8 = 200;
const QUIET: u8 = 128;

/// Speaks for `loud_frames` frames after each start, then goes quiet.
struct ScriptedMic {
    loud_frames: usize,
    remaining: usize,
    starts: usize,
    max_starts: usize,
    releases: Arc<Mutex<usize>>,
}

impl ScriptedMic {
    fn new(loud_frames: usize) -> Self {
        Self {
            loud_frames,
            remaining: 0,
            starts: 0,
            max_starts: usize::MAX,
            releases: Arc::new(Mutex::new(0)),
        }
    }

    fn with_max_starts(mut self, max_starts: usize) -> Self {
        self.max_starts = max_starts;
        self
    }
}

impl Microphone for ScriptedMic {
    fn start(&mut self) -> VoiceResult<()> {
        if self.starts >= self.max_starts {
            return Err(VoiceError::Microphone {
                message: "device busy".to_string(),
            });
        }
        self.starts += 1;
        self.remaining = self.loud_frames;
        Ok(())
    }

    fn sample(&mut self) -> Vec<u8> {
        if self.remaining > 0 {
            self.remaining -= 1;
            vec![LOUD; 64]
        } else {
            vec![QUIET; 64]
        }
    }

    fn stop(&mut self) -> Recording {
        Recording {
            data: vec![1, 2, 3],
            mime_type: "audio/wav".to_string(),
        }
    }

    fn release(&mut self) {
        *self.releases.lock().unwrap() += 1;
    }
}

struct FakeStt {
    result: Result<(&'static str, &'static str), &'static str>,
}

impl FakeStt {
    fn hearing(text: &'static str) -> Self {
        Self {
            result: Ok((text, "en")),
        }
    }
}

impl SpeechToText for FakeStt {
    async fn transcribe(&self, _recording: &Recording) -> VoiceResult<Transcript> {
        match self.result {
            Ok((text, language)) => Ok(Transcript {
                text: text.to_string(),
                detected_language: language.to_string(),
            }),
            Err(message) => Err(VoiceError::Transcription {
                message: message.to_string(),
            }),
        }
    }
}

#[derive(Default)]
struct FakeTts {
    fail: bool,
    empty: bool,
    texts: Arc<Mutex<Vec<String>>>,
}

impl TextToSpeech for FakeTts {
    async fn synthesize(&self, text: &str) -> VoiceResult<Vec<u8>> {
        self.texts.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(VoiceError::Synthesis {
                message: "quota exceeded".to_string(),
            });
        }
        if self.empty {
            return Ok(Vec::new());
        }
        Ok(b"ID3audio".to_vec())
    }
}

#[derive(Default)]
struct FakePlayer {
    fail: bool,
    played: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl AudioPlayer for FakePlayer {
    async fn play(&self, audio: &[u8]) -> VoiceResult<()> {
        if self.fail {
            return Err(VoiceError::Playback {
                message: "no output device".to_string(),
            });
        }
        self.played.lock().unwrap().push(audio.to_vec());
        Ok(())
    }
}

fn services(stt: FakeStt) -> Services<FakeStt, FakeTts, FakePlayer> {
    Services {
        stt,
        tts: FakeTts::default(),
        player: FakePlayer::default(),
    }
}

fn recording() -> Recording {
    Recording {
        data: vec![0; 16],
        mime_type: "audio/webm".to_string(),
    }
}

fn fast_detector() -> SilenceDetector {
    SilenceDetector::new(5.0, Duration::from_millis(5))
}

// =============================================================================
// VoiceSession
// =============================================================================

#[test]
fn detector_ends_turn_exactly_once() {
    let mut session = VoiceSession::new(
        ScriptedMic::new(2),
        SilenceDetector::new(5.0, Duration::from_millis(100)),
    );
    session.start_listening().unwrap();
    assert!(session.is_listening());

    let t0 = Instant::now();
    assert!(session.on_frame(t0).is_none());
    assert!(session.on_frame(t0 + Duration::from_millis(10)).is_none());
    // Quiet but still inside the silence window.
    assert!(session.on_frame(t0 + Duration::from_millis(60)).is_none());
    assert!(session.is_listening());

    let recording = session.on_frame(t0 + Duration::from_millis(200));
    assert!(recording.is_some());
    assert!(session.is_processing());

    assert!(session.on_frame(t0 + Duration::from_millis(400)).is_none());
    assert!(!session.is_stopped());
}

#[test]
fn turn_end_releases_microphone() {
    let mic = ScriptedMic::new(1);
    let releases = Arc::clone(&mic.releases);
    let mut session = VoiceSession::new(mic, SilenceDetector::new(5.0, Duration::from_millis(1)));
    session.start_listening().unwrap();

    let t0 = Instant::now();
    session.on_frame(t0);
    session.on_frame(t0 + Duration::from_millis(50)).unwrap();
    assert_eq!(*releases.lock().unwrap(), 1);
}

#[test]
fn stop_while_idle_is_noop() {
    let mut session = VoiceSession::new(ScriptedMic::new(0), SilenceDetector::default());
    assert!(session.stop().is_none());
    assert_eq!(session.state(), SessionState::Idle);
    assert!(!session.is_stopped());
}

#[test]
fn stop_while_listening_returns_partial_recording() {
    let mut session = VoiceSession::new(ScriptedMic::new(10), SilenceDetector::default());
    session.start_listening().unwrap();
    session.on_frame(Instant::now());

    let recording = session.stop().unwrap();
    assert_eq!(recording.mime_type, "audio/wav");
    assert!(session.is_processing());
    assert!(session.is_stopped());
}

#[test]
fn start_listening_is_ignored_unless_idle() {
    let mut session = VoiceSession::new(ScriptedMic::new(0).with_max_starts(1), SilenceDetector::default());
    session.start_listening().unwrap();
    // A second start would fail if it reached the microphone.
    session.start_listening().unwrap();
    assert!(session.is_listening());
}

#[test]
fn microphone_failure_sets_error_and_stays_idle() {
    let mut mic = MockMicrophone::new();
    mic.expect_start().times(1).returning(|| {
        Err(VoiceError::Microphone {
            message: "permission denied".to_string(),
        })
    });
    mic.expect_sample().never();

    let mut session = VoiceSession::new(mic, SilenceDetector::default());
    let err = session.start_listening().unwrap_err();

    assert!(matches!(err, VoiceError::Microphone { .. }));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.error().unwrap().contains("permission denied"));
    assert!(session.on_frame(Instant::now()).is_none());
}

#[test]
fn mocked_microphone_is_stopped_then_released() {
    let mut seq = mockall::Sequence::new();
    let mut mic = MockMicrophone::new();
    mic.expect_start().times(1).returning(|| Ok(()));
    mic.expect_stop()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Recording {
            data: b"RIFF".to_vec(),
            mime_type: "audio/wav".to_string(),
        });
    mic.expect_release().times(1).in_sequence(&mut seq).return_const(());

    let mut session = VoiceSession::new(mic, SilenceDetector::default());
    session.start_listening().unwrap();
    let recording = session.stop().unwrap();
    assert_eq!(recording.data, b"RIFF");
}

#[test]
fn reset_clears_session() {
    let mut session = VoiceSession::new(ScriptedMic::new(5), SilenceDetector::default());
    session.start_listening().unwrap();
    session.reset();

    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.error().is_none());
    assert_eq!(session.transcript(), "");
    assert_eq!(session.response(), "");
}

#[tokio::test]
async fn process_turn_replies_and_speaks() {
    let services = services(FakeStt::hearing("  What services do you provide?  "));
    let texts = Arc::clone(&services.tts.texts);
    let played = Arc::clone(&services.player.played);

    let mut session = VoiceSession::new(ScriptedMic::new(0), SilenceDetector::default());
    let turn = session.process_turn(recording(), &services).await.unwrap();

    assert_eq!(turn.transcript, "What services do you provide?");
    assert_eq!(turn.reply.topic, Topic::Services);
    assert_eq!(turn.reply.language, Language::English);
    assert!(turn.spoken);
    assert_eq!(session.transcript(), "What services do you provide?");
    assert_eq!(session.response(), turn.reply.text);
    assert_eq!(session.state(), SessionState::Idle);

    assert_eq!(texts.lock().unwrap().len(), 1);
    assert_eq!(played.lock().unwrap().as_slice(), &[b"ID3audio".to_vec()]);
}

#[tokio::test]
async fn hindi_detection_selects_hindi_reply() {
    let services = services(FakeStt {
        result: Ok(("नमस्ते", "hi")),
    });
    let mut session = VoiceSession::new(ScriptedMic::new(0), SilenceDetector::default());
    let turn = session.process_turn(recording(), &services).await.unwrap();
    assert_eq!(turn.reply.language, Language::Hindi);
}

#[tokio::test]
async fn empty_transcript_is_no_speech() {
    let services = services(FakeStt::hearing("   "));
    let texts = Arc::clone(&services.tts.texts);
    let mut session = VoiceSession::new(ScriptedMic::new(0), SilenceDetector::default());

    let err = session.process_turn(recording(), &services).await.unwrap_err();
    assert!(matches!(err, VoiceError::NoSpeech));
    assert_eq!(session.error(), Some("No speech detected"));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(texts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn transcription_failure_aborts_turn() {
    let services = services(FakeStt {
        result: Err("HTTP 401"),
    });
    let mut session = VoiceSession::new(ScriptedMic::new(0), SilenceDetector::default());

    let err = session.process_turn(recording(), &services).await.unwrap_err();
    assert!(matches!(err, VoiceError::Transcription { .. }));
    assert!(session.error().unwrap().contains("HTTP 401"));
    assert_eq!(session.response(), "");
}

#[tokio::test]
async fn synthesis_failure_keeps_text_reply() {
    let services = Services {
        stt: FakeStt::hearing("hello"),
        tts: FakeTts {
            fail: true,
            ..Default::default()
        },
        player: FakePlayer::default(),
    };
    let played = Arc::clone(&services.player.played);
    let mut session = VoiceSession::new(ScriptedMic::new(0), SilenceDetector::default());

    let turn = session.process_turn(recording(), &services).await.unwrap();
    assert_eq!(turn.reply.topic, Topic::Greeting);
    assert!(!turn.spoken);
    assert!(!session.response().is_empty());
    let error = session.error().expect("synthesis failure is reported");
    assert!(error.starts_with("Failed to generate speech"));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(played.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_audio_is_not_played() {
    let services = Services {
        stt: FakeStt::hearing("hello"),
        tts: FakeTts {
            empty: true,
            ..Default::default()
        },
        player: FakePlayer::default(),
    };
    let played = Arc::clone(&services.player.played);
    let mut session = VoiceSession::new(ScriptedMic::new(0), SilenceDetector::default());

    let turn = session.process_turn(recording(), &services).await.unwrap();
    assert!(!turn.spoken);
    assert_eq!(
        session.error(),
        Some("Failed to generate speech: received empty audio")
    );
    assert!(played.lock().unwrap().is_empty());
}

#[tokio::test]
async fn playback_failure_is_not_fatal() {
    let services = Services {
        stt: FakeStt::hearing("hello"),
        tts: FakeTts::default(),
        player: FakePlayer {
            fail: true,
            ..Default::default()
        },
    };
    let mut session = VoiceSession::new(ScriptedMic::new(0), SilenceDetector::default());

    let turn = session.process_turn(recording(), &services).await.unwrap();
    assert!(!turn.spoken);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn synthesis_receives_speech_text() {
    let services = services(FakeStt::hearing("what is gyaan rich about"));
    let texts = Arc::clone(&services.tts.texts);
    let mut session = VoiceSession::new(ScriptedMic::new(0), SilenceDetector::default());

    let turn = session.process_turn(recording(), &services).await.unwrap();
    let spoken = texts.lock().unwrap()[0].clone();
    assert_eq!(spoken, crate::voice::responder::speech_text(&turn.reply.text));
    assert!(!spoken.to_lowercase().contains("gyaan"));
}

// =============================================================================
// Conversation
// =============================================================================

fn conversation(
    mic: ScriptedMic,
    stt: FakeStt,
) -> Conversation<ScriptedMic, SilenceDetector, FakeStt, FakeTts, FakePlayer> {
    Conversation::new(VoiceSession::new(mic, fast_detector()), services(stt))
        .with_frame_interval(Duration::from_millis(1))
        .with_relisten_delay(Duration::from_millis(1))
}

#[tokio::test(flavor = "multi_thread")]
async fn conversation_relistens_until_max_turns() {
    let mut convo = conversation(ScriptedMic::new(3), FakeStt::hearing("hello")).with_max_turns(2);

    let turns = convo.run(CancellationToken::new()).await.unwrap();
    assert_eq!(turns.len(), 2);
    assert!(turns.iter().all(|t| t.reply.topic == Topic::Greeting));
    assert_eq!(convo.session().state(), SessionState::Idle);
}

#[tokio::test(flavor = "multi_thread")]
async fn conversation_ends_when_microphone_closes() {
    let mic = ScriptedMic::new(3).with_max_starts(1);
    let mut convo = conversation(mic, FakeStt::hearing("hello"));

    let turns = convo.run(CancellationToken::new()).await.unwrap();
    assert_eq!(turns.len(), 1);
    assert!(convo.session().error().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn conversation_fails_when_first_start_fails() {
    let mic = ScriptedMic::new(3).with_max_starts(0);
    let mut convo = conversation(mic, FakeStt::hearing("hello"));

    let err = convo.run(CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, VoiceError::Microphone { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn conversation_stops_after_failed_turn() {
    let mut convo = conversation(ScriptedMic::new(3), FakeStt { result: Err("boom") });

    let turns = convo.run(CancellationToken::new()).await.unwrap();
    assert!(turns.is_empty());
    assert!(convo.session().error().unwrap().contains("boom"));
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_answers_captured_audio_then_ends() {
    // Never goes quiet, so only the cancel can end the turn.
    let mut convo = conversation(ScriptedMic::new(usize::MAX), FakeStt::hearing("hello"));
    let cancel = CancellationToken::new();

    let stopper = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        stopper.cancel();
    });

    let turns = convo.run(cancel).await.unwrap();
    assert_eq!(turns.len(), 1);
    assert!(convo.session().is_stopped());
    assert_eq!(convo.session().state(), SessionState::Idle);
}
