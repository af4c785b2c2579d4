//! Turn detection over time-domain audio frames.
//!
//! Frames are unsigned 8-bit samples centred on 128, as produced by an
//! analyser's byte time-domain readout.

use std::time::{Duration, Instant};

/// Default mean deviation (out of 128) above which a frame counts as speech.
pub const DEFAULT_THRESHOLD: f32 = 5.0;

/// Default quiet period after speech that ends a turn.
pub const DEFAULT_SILENCE_DURATION: Duration = Duration::from_millis(1500);

/// Mean of `|sample - 128|` over the frame. Empty frames are silent.
pub fn mean_deviation(frame: &[u8]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: u64 = frame
        .iter()
        .map(|&s| u64::from((i16::from(s) - 128).unsigned_abs()))
        .sum();
    sum as f32 / frame.len() as f32
}

/// What a detector concluded from one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// No speech heard yet this turn.
    Quiet,
    Speaking,
    /// Quiet after speech, not yet long enough to end the turn.
    Pausing,
    /// The turn just ended. Reported once per turn.
    EndOfTurn,
    /// The turn already ended; waiting for `reset`.
    Waiting,
}

/// Decides when a spoken turn is over.
pub trait TurnDetector: Send {
    fn observe(&mut self, frame: &[u8], now: Instant) -> Activity;

    /// Start a fresh turn.
    fn reset(&mut self);
}

/// Level-crossing latch: speech above `threshold`, then more than
/// `silence_duration` below it, ends the turn.
///
/// There is no noise-floor calibration, so a noisy room can keep a turn open.
#[derive(Debug, Clone)]
pub struct SilenceDetector {
    threshold: f32,
    silence_duration: Duration,
    last_voice: Option<Instant>,
    ended: bool,
}

impl Default for SilenceDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_SILENCE_DURATION)
    }
}

impl SilenceDetector {
    pub fn new(threshold: f32, silence_duration: Duration) -> Self {
        Self {
            threshold,
            silence_duration,
            last_voice: None,
            ended: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn silence_duration(&self) -> Duration {
        self.silence_duration
    }
}

impl TurnDetector for SilenceDetector {
    fn observe(&mut self, frame: &[u8], now: Instant) -> Activity {
        if self.ended {
            return Activity::Waiting;
        }

        if mean_deviation(frame) > self.threshold {
            self.last_voice = Some(now);
            return Activity::Speaking;
        }

        match self.last_voice {
            None => Activity::Quiet,
            Some(last) if now.saturating_duration_since(last) > self.silence_duration => {
                self.ended = true;
                Activity::EndOfTurn
            }
            Some(_) => Activity::Pausing,
        }
    }

    fn reset(&mut self) {
        self.last_voice = None;
        self.ended = false;
    }
}
