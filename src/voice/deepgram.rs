//! Deepgram speech-to-text and text-to-speech over HTTPS.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::{VoiceError, VoiceResult};
use super::session::{Recording, SpeechToText, TextToSpeech, Transcript};

pub const DEFAULT_BASE_URL: &str = "https://api.deepgram.com";
pub const LISTEN_MODEL: &str = "nova-2";
pub const SPEAK_MODEL: &str = "aura-asteria-en";

/// Language assumed when the recognizer does not report one.
const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Default, Deserialize)]
struct ListenResponse {
    #[serde(default)]
    results: ListenResults,
}

#[derive(Debug, Default, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
    detected_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

#[derive(Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
}

impl From<ListenResponse> for Transcript {
    fn from(response: ListenResponse) -> Self {
        let channel = response.results.channels.into_iter().next();
        let detected_language = channel
            .as_ref()
            .and_then(|c| c.detected_language.clone())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let text = channel
            .and_then(|c| c.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .unwrap_or_default();

        Transcript {
            text,
            detected_language,
        }
    }
}

/// Client for the Deepgram listen and speak endpoints.
#[derive(Clone)]
pub struct DeepgramClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl DeepgramClient {
    /// Requires a rustls crypto provider to be installed.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorization(&self) -> String {
        format!("Token {}", self.api_key)
    }
}

/// Body text of a failed response, prefixed with its status.
async fn failure_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    }
}

impl SpeechToText for DeepgramClient {
    #[instrument(skip_all, fields(bytes = recording.data.len(), mime = %recording.mime_type))]
    async fn transcribe(&self, recording: &Recording) -> VoiceResult<Transcript> {
        let transcription = |message: String| VoiceError::Transcription { message };

        let response = self
            .http
            .post(format!("{}/v1/listen", self.base_url))
            .query(&[
                ("model", LISTEN_MODEL),
                ("smart_format", "true"),
                ("detect_language", "true"),
            ])
            .header(AUTHORIZATION, self.authorization())
            .header(CONTENT_TYPE, recording.mime_type.as_str())
            .body(recording.data.clone())
            .send()
            .await
            .map_err(|e| transcription(e.to_string()))?;

        if !response.status().is_success() {
            return Err(transcription(failure_message(response).await));
        }

        let parsed: ListenResponse = response
            .json()
            .await
            .map_err(|e| transcription(e.to_string()))?;
        let transcript = Transcript::from(parsed);
        debug!(
            chars = transcript.text.len(),
            language = %transcript.detected_language,
            "transcribed"
        );
        Ok(transcript)
    }
}

impl TextToSpeech for DeepgramClient {
    #[instrument(skip_all, fields(chars = text.len()))]
    async fn synthesize(&self, text: &str) -> VoiceResult<Vec<u8>> {
        let synthesis = |message: String| VoiceError::Synthesis { message };

        let response = self
            .http
            .post(format!("{}/v1/speak", self.base_url))
            .query(&[("model", SPEAK_MODEL)])
            .header(AUTHORIZATION, self.authorization())
            .json(&SpeakRequest { text })
            .send()
            .await
            .map_err(|e| synthesis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(synthesis(failure_message(response).await));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| synthesis(e.to_string()))?;
        if audio.is_empty() {
            return Err(synthesis("received empty audio".to_string()));
        }
        Ok(audio.to_vec())
    }
}
