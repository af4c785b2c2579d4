//! The listen → transcribe → reply → speak loop.
//!
//! [`VoiceSession`] is a synchronous state machine driven one frame at a
//! time; [`Conversation`] ticks it on a timer and runs each finished turn
//! through the speech services.

use std::future::Future;
use std::time::{Duration, Instant};

#[cfg(test)]
use mockall::automock;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::detector::{Activity, TurnDetector};
use super::error::{VoiceError, VoiceResult};
use super::responder::{Language, Reply, Responder, speech_text};

/// Interval between level checks, roughly one display frame.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Pause after a spoken reply before listening again.
pub const DEFAULT_RELISTEN_DELAY: Duration = Duration::from_millis(500);

/// Audio captured during one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Result of speech recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    /// Language code reported by the recognizer, e.g. `en` or `hi`.
    pub detected_language: String,
}

/// Audio input: a level-metering stream plus a recorder.
#[cfg_attr(test, automock)]
pub trait Microphone: Send {
    /// Open the stream and start recording. Fails when access is denied.
    fn start(&mut self) -> VoiceResult<()>;

    /// Latest time-domain frame (unsigned 8-bit, centred on 128).
    fn sample(&mut self) -> Vec<u8>;

    /// Stop the recorder and hand back everything captured since `start`.
    fn stop(&mut self) -> Recording;

    /// Close the stream.
    fn release(&mut self);
}

pub trait SpeechToText: Send + Sync {
    fn transcribe(
        &self,
        recording: &Recording,
    ) -> impl Future<Output = VoiceResult<Transcript>> + Send;
}

pub trait TextToSpeech: Send + Sync {
    fn synthesize(&self, text: &str) -> impl Future<Output = VoiceResult<Vec<u8>>> + Send;
}

pub trait AudioPlayer: Send + Sync {
    fn play(&self, audio: &[u8]) -> impl Future<Output = VoiceResult<()>> + Send;
}

/// The remote and output services a turn needs.
pub struct Services<S, T, P> {
    pub stt: S,
    pub tts: T,
    pub player: P,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
    Processing,
}

/// One completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub transcript: String,
    pub reply: Reply,
    /// Whether synthesized audio was played. False when synthesis or
    /// playback failed and the reply is text-only.
    pub spoken: bool,
}

pub struct VoiceSession<M, D> {
    mic: M,
    detector: D,
    responder: Responder,
    state: SessionState,
    transcript: String,
    response: String,
    error: Option<String>,
    stopped: bool,
}

impl<M: Microphone, D: TurnDetector> VoiceSession<M, D> {
    pub fn new(mic: M, detector: D) -> Self {
        Self::with_responder(mic, detector, Responder::default())
    }

    pub fn with_responder(mic: M, detector: D, responder: Responder) -> Self {
        Self {
            mic,
            detector,
            responder,
            state: SessionState::Idle,
            transcript: String::new(),
            response: String::new(),
            error: None,
            stopped: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == SessionState::Listening
    }

    pub fn is_processing(&self) -> bool {
        self.state == SessionState::Processing
    }

    /// Last recognized utterance.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Last reply text.
    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the user ended the conversation with [`stop`](Self::stop).
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Open the microphone and begin a turn.
    pub fn start_listening(&mut self) -> VoiceResult<()> {
        if self.state != SessionState::Idle {
            debug!(state = ?self.state, "start_listening ignored");
            return Ok(());
        }

        self.error = None;
        if let Err(e) = self.mic.start() {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.detector.reset();
        self.stopped = false;
        self.state = SessionState::Listening;
        debug!("listening");
        Ok(())
    }

    /// Feed one frame to the detector. Returns the recording when the turn
    /// just ended; at most once per turn.
    pub fn on_frame(&mut self, now: Instant) -> Option<Recording> {
        if self.state != SessionState::Listening {
            return None;
        }

        let frame = self.mic.sample();
        match self.detector.observe(&frame, now) {
            Activity::EndOfTurn => {
                debug!("silence detected, processing audio");
                Some(self.end_recording())
            }
            _ => None,
        }
    }

    /// Stop listening at the user's request.
    ///
    /// While listening, returns what was recorded so far and moves to
    /// `Processing`. A no-op returning `None` when idle.
    pub fn stop(&mut self) -> Option<Recording> {
        match self.state {
            SessionState::Idle => None,
            SessionState::Listening => {
                self.stopped = true;
                Some(self.end_recording())
            }
            SessionState::Processing => {
                self.stopped = true;
                None
            }
        }
    }

    /// Stop any recording and clear transcript, response and error.
    pub fn reset(&mut self) {
        // The partial recording is discarded.
        let _ = self.stop();
        self.transcript.clear();
        self.response.clear();
        self.error = None;
        self.state = SessionState::Idle;
    }

    fn end_recording(&mut self) -> Recording {
        let recording = self.mic.stop();
        self.mic.release();
        self.state = SessionState::Processing;
        recording
    }

    fn fail(&mut self, error: VoiceError) -> VoiceError {
        warn!(error = %error, "voice turn failed");
        self.error = Some(error.to_string());
        self.state = SessionState::Idle;
        error
    }

    /// Transcribe, reply and speak. Synthesis and playback failures leave a
    /// text-only reply; transcription failures abort the turn.
    #[instrument(skip_all, fields(bytes = recording.data.len()))]
    pub async fn process_turn<S, T, P>(
        &mut self,
        recording: Recording,
        services: &Services<S, T, P>,
    ) -> VoiceResult<Turn>
    where
        S: SpeechToText,
        T: TextToSpeech,
        P: AudioPlayer,
    {
        self.state = SessionState::Processing;

        let heard = match services.stt.transcribe(&recording).await {
            Ok(heard) => heard,
            Err(e) => return Err(self.fail(e)),
        };
        let text = heard.text.trim().to_string();
        if text.is_empty() {
            return Err(self.fail(VoiceError::NoSpeech));
        }
        self.transcript = text.clone();

        let language = Language::detect(&heard.detected_language, &text);
        let reply = self.responder.respond(&text, language);
        self.response = reply.text.clone();
        info!(topic = ?reply.topic, ?language, "replying");

        let synthesized = match services.tts.synthesize(&speech_text(&reply.text)).await {
            Ok(audio) if audio.is_empty() => Err(VoiceError::Synthesis {
                message: "received empty audio".to_string(),
            }),
            other => other,
        };
        // The text reply stands even when speech cannot be produced.
        let audio = match synthesized {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!(error = %e, "speech synthesis failed, replying with text only");
                self.error = Some(e.to_string());
                None
            }
        };

        let spoken = match audio {
            Some(audio) => match services.player.play(&audio).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "audio playback failed");
                    false
                }
            },
            None => false,
        };

        self.state = SessionState::Idle;
        Ok(Turn {
            transcript: text,
            reply,
            spoken,
        })
    }
}

enum Tick {
    Cancelled,
    Frame(Option<Recording>),
}

/// Drives a [`VoiceSession`] until the user stops, a turn fails, or the
/// microphone can no longer be opened.
pub struct Conversation<M, D, S, T, P> {
    session: VoiceSession<M, D>,
    services: Services<S, T, P>,
    frame_interval: Duration,
    relisten_delay: Duration,
    max_turns: Option<usize>,
}

impl<M, D, S, T, P> Conversation<M, D, S, T, P>
where
    M: Microphone,
    D: TurnDetector,
    S: SpeechToText,
    T: TextToSpeech,
    P: AudioPlayer,
{
    pub fn new(session: VoiceSession<M, D>, services: Services<S, T, P>) -> Self {
        Self {
            session,
            services,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            relisten_delay: DEFAULT_RELISTEN_DELAY,
            max_turns: None,
        }
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn with_relisten_delay(mut self, delay: Duration) -> Self {
        self.relisten_delay = delay;
        self
    }

    /// End the conversation after this many completed turns.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn session(&self) -> &VoiceSession<M, D> {
        &self.session
    }

    /// Run turns back to back. Cancelling the token acts as a user stop:
    /// audio captured so far is still answered, then the loop ends.
    ///
    /// Only a microphone failure on the first turn is returned as an error;
    /// later failures end the loop and remain visible via
    /// [`VoiceSession::error`].
    pub async fn run(&mut self, cancel: CancellationToken) -> VoiceResult<Vec<Turn>> {
        let mut turns = Vec::new();
        self.session.start_listening()?;

        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let tick = tokio::select! {
                _ = cancel.cancelled() => Tick::Cancelled,
                _ = ticker.tick() => Tick::Frame(self.session.on_frame(Instant::now())),
            };

            let recording = match tick {
                Tick::Cancelled => {
                    if let Some(recording) = self.session.stop() {
                        self.answer(recording, &mut turns).await;
                    }
                    break;
                }
                Tick::Frame(Some(recording)) => recording,
                Tick::Frame(None) => continue,
            };

            if !self.answer(recording, &mut turns).await
                || self.session.is_stopped()
                || self.max_turns.is_some_and(|max| turns.len() >= max)
            {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.relisten_delay) => {}
            }

            if let Err(e) = self.session.start_listening() {
                info!(error = %e, "microphone closed, ending conversation");
                break;
            }
        }

        Ok(turns)
    }

    async fn answer(&mut self, recording: Recording, turns: &mut Vec<Turn>) -> bool {
        match self.session.process_turn(recording, &self.services).await {
            Ok(turn) => {
                turns.push(turn);
                true
            }
            Err(_) => false,
        }
    }
}
