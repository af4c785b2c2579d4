//! File-backed microphone and player for running the dialogue loop
//! without audio hardware.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use super::error::{VoiceError, VoiceResult};
use super::session::{AudioPlayer, Microphone, Recording};

/// Sample rate assumed for headerless PCM input.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

const WAV_MIME: &str = "audio/wav";
const WAV_HEADER_LEN: usize = 44;

fn unsupported(message: impl Into<String>) -> VoiceError {
    VoiceError::Microphone {
        message: message.into(),
    }
}

fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    bytes
        .get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Extract sample rate and samples from an 8-bit mono PCM WAV file.
fn parse_wav(bytes: &[u8]) -> VoiceResult<(u32, Vec<u8>)> {
    let mut sample_rate = None;
    let mut offset = 12;

    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = read_u32(bytes, offset + 4).unwrap_or(0) as usize;
        let body_start = offset + 8;
        let body_end = body_start.saturating_add(size).min(bytes.len());
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => {
                let format = read_u16(body, 0);
                let channels = read_u16(body, 2);
                let bits = read_u16(body, 14);
                if format != Some(1) || channels != Some(1) || bits != Some(8) {
                    return Err(unsupported(format!(
                        "unsupported WAV format (format {format:?}, channels {channels:?}, bits {bits:?}); need 8-bit mono PCM"
                    )));
                }
                sample_rate = read_u32(body, 4);
            }
            b"data" => {
                let rate = sample_rate.ok_or_else(|| unsupported("WAV data before fmt chunk"))?;
                return Ok((rate, body.to_vec()));
            }
            _ => {}
        }

        // Chunks are word aligned.
        offset = body_start + size + (size & 1);
    }

    Err(unsupported("WAV file has no data chunk"))
}

/// Wrap 8-bit mono PCM samples in a WAV container.
pub fn encode_wav(samples: &[u8], sample_rate: u32) -> Vec<u8> {
    let data_len = samples.len() as u32;
    let mut out = Vec::with_capacity(WAV_HEADER_LEN + samples.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes()); // byte rate
    out.extend_from_slice(&1u16.to_le_bytes()); // block align
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(samples);
    out
}

/// Replays recorded audio as if it were arriving live.
///
/// Each `sample` call consumes one tick's worth of samples. Once the input
/// runs out, frames are empty (silent) and the next `start` fails.
#[derive(Debug)]
pub struct FileMicrophone {
    samples: Vec<u8>,
    sample_rate: u32,
    samples_per_tick: usize,
    position: usize,
    turn_start: usize,
    open: bool,
}

impl FileMicrophone {
    /// Load a WAV file (8-bit mono PCM) or raw unsigned 8-bit PCM.
    pub fn open(path: &Path) -> VoiceResult<Self> {
        let bytes = std::fs::read(path)?;
        let is_wav = bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE";
        let (sample_rate, samples) = if is_wav {
            parse_wav(&bytes)?
        } else {
            (DEFAULT_SAMPLE_RATE, bytes)
        };
        debug!(path = %path.display(), sample_rate, samples = samples.len(), "loaded audio input");
        Ok(Self::from_pcm(samples, sample_rate))
    }

    pub fn from_pcm(samples: Vec<u8>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            samples_per_tick: 0,
            position: 0,
            turn_start: 0,
            open: false,
        }
        .with_tick(super::session::DEFAULT_FRAME_INTERVAL)
    }

    /// Set how much audio one `sample` call consumes. Match this to the
    /// conversation's frame interval to replay in real time.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        let per_tick = (u128::from(self.sample_rate) * tick.as_micros()) / 1_000_000;
        self.samples_per_tick = usize::try_from(per_tick).unwrap_or(usize::MAX).max(1);
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples_per_tick(&self) -> usize {
        self.samples_per_tick
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.samples.len()
    }
}

impl Microphone for FileMicrophone {
    fn start(&mut self) -> VoiceResult<()> {
        if self.is_exhausted() {
            return Err(unsupported("audio input exhausted"));
        }
        self.open = true;
        self.turn_start = self.position;
        Ok(())
    }

    fn sample(&mut self) -> Vec<u8> {
        if !self.open {
            return Vec::new();
        }
        let end = self
            .position
            .saturating_add(self.samples_per_tick)
            .min(self.samples.len());
        let frame = self.samples[self.position..end].to_vec();
        self.position = end;
        frame
    }

    fn stop(&mut self) -> Recording {
        self.open = false;
        Recording {
            data: encode_wav(&self.samples[self.turn_start..self.position], self.sample_rate),
            mime_type: WAV_MIME.to_string(),
        }
    }

    fn release(&mut self) {
        self.open = false;
    }
}

/// Writes each reply to `reply-<n>.mp3` in a directory, counting from 1.
#[derive(Debug)]
pub struct FilePlayer {
    dir: PathBuf,
    written: AtomicUsize,
}

impl FilePlayer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: AtomicUsize::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of replies written so far.
    pub fn written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }
}

impl AudioPlayer for FilePlayer {
    async fn play(&self, audio: &[u8]) -> VoiceResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let n = self.written.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.dir.join(format!("reply-{n}.mp3"));
        tokio::fs::write(&path, audio).await?;
        info!(path = %path.display(), bytes = audio.len(), "wrote reply audio");
        Ok(())
    }
}
