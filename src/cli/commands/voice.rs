//! Voice agent commands: offline reply lookup and file-driven conversations.

use std::path::Path;

use serde::Serialize;
use tabled::{Table, Tabled};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::error::CliResult;
use crate::cli::utils::{apply_table_style, truncate_with_ellipsis, yes_no};
use crate::voice::{
    Conversation, DeepgramClient, FileMicrophone, FilePlayer, Language, Reply, Responder,
    Services, SilenceDetector, Turn, VoiceError, VoiceSession,
};

#[derive(Tabled)]
struct TurnDisplay {
    #[tabled(rename = "#")]
    n: usize,
    #[tabled(rename = "Heard")]
    heard: String,
    #[tabled(rename = "Topic")]
    topic: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Spoken")]
    spoken: String,
}

#[derive(Serialize)]
struct TurnJson<'a> {
    transcript: &'a str,
    #[serde(flatten)]
    reply: &'a Reply,
    spoken: bool,
}

fn language_name(language: Language) -> &'static str {
    match language {
        Language::English => "English",
        Language::Hindi => "Hindi",
    }
}

/// Answer a typed utterance with the canned reply the agent would speak.
///
/// `language` is a recognizer code such as `en` or `hi`; when absent the
/// text itself decides (Devanagari means Hindi).
pub fn reply(text: &str, language: Option<&str>, format: &str) -> CliResult<String> {
    let language = Language::detect(language.unwrap_or(""), text);
    let reply = Responder::default().respond(text, language);

    match format {
        "json" => Ok(serde_json::to_string_pretty(&reply)?),
        _ => Ok(reply.text),
    }
}

/// Options for a recorded conversation
#[derive(Debug)]
pub struct ConverseOptions<'a> {
    pub input: &'a Path,
    pub out_dir: &'a Path,
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub max_turns: Option<usize>,
}

/// Run the dialogue loop over a recorded audio file, writing spoken replies
/// to `out_dir`. Ctrl-C ends the conversation after the current turn.
pub async fn converse(options: ConverseOptions<'_>, format: &str) -> CliResult<String> {
    let token = options
        .token
        .or_else(|| std::env::var("DEEPGRAM_ACCESS_TOKEN").ok())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| VoiceError::NotConfigured {
            message: "no Deepgram access token".to_string(),
        })?;

    let mut client = DeepgramClient::new(token);
    if let Some(url) = options.base_url {
        client = client.with_base_url(url);
    }

    let mic = FileMicrophone::open(options.input)?;
    let session = VoiceSession::new(mic, SilenceDetector::default());
    let services = Services {
        stt: client.clone(),
        tts: client,
        player: FilePlayer::new(options.out_dir),
    };

    let mut conversation = Conversation::new(session, services);
    if let Some(max) = options.max_turns {
        conversation = conversation.with_max_turns(max);
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, finishing current turn");
            on_interrupt.cancel();
        }
    });

    let turns = conversation.run(cancel).await?;
    let mut output = format_turns(&turns, format)?;
    if let Some(error) = conversation.session().error() {
        output.push_str(&format!("\nLast error: {error}"));
    }
    Ok(output)
}

pub(crate) fn format_turns(turns: &[Turn], format: &str) -> CliResult<String> {
    if format == "json" {
        let rows: Vec<TurnJson<'_>> = turns
            .iter()
            .map(|t| TurnJson {
                transcript: &t.transcript,
                reply: &t.reply,
                spoken: t.spoken,
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&rows)?);
    }

    if turns.is_empty() {
        return Ok("No turns completed.".to_string());
    }

    let rows: Vec<TurnDisplay> = turns
        .iter()
        .enumerate()
        .map(|(i, t)| TurnDisplay {
            n: i + 1,
            heard: truncate_with_ellipsis(&t.transcript, 40),
            topic: format!("{:?}", t.reply.topic),
            language: language_name(t.reply.language).to_string(),
            spoken: yes_no(t.spoken).to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    Ok(table.to_string())
}
