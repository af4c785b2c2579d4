//! Language detection and reply selection.

use serde::Serialize;

use super::rules::{
    ENGLISH_FALLBACK, ENGLISH_RULES, HINDI_FALLBACK, HINDI_RULES, Rule, Topic, first_match,
};

/// Language a reply is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
}

impl Language {
    /// Hindi when the transcriber reported `hi` or the text contains any
    /// Devanagari, otherwise English.
    pub fn detect(detected: &str, transcript: &str) -> Self {
        let devanagari = transcript
            .chars()
            .any(|c| ('\u{0900}'..='\u{097F}').contains(&c));
        if detected.eq_ignore_ascii_case("hi") || devanagari {
            Language::Hindi
        } else {
            Language::English
        }
    }
}

/// A selected canned reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub topic: Topic,
    pub language: Language,
    pub text: String,
}

/// Picks replies from per-language rule tables.
#[derive(Debug, Clone, Copy)]
pub struct Responder {
    english: &'static [Rule],
    hindi: &'static [Rule],
}

impl Default for Responder {
    fn default() -> Self {
        Self {
            english: ENGLISH_RULES,
            hindi: HINDI_RULES,
        }
    }
}

impl Responder {
    pub fn with_rules(english: &'static [Rule], hindi: &'static [Rule]) -> Self {
        Self { english, hindi }
    }

    pub fn respond(&self, transcript: &str, language: Language) -> Reply {
        let rules = match language {
            Language::English => self.english,
            Language::Hindi => self.hindi,
        };

        let (topic, text) = match first_match(rules, transcript) {
            Some(rule) => (rule.topic, rule.reply.to_string()),
            None => match language {
                Language::English => (
                    Topic::General,
                    ENGLISH_FALLBACK.replace("{transcript}", transcript.trim()),
                ),
                Language::Hindi => (Topic::General, HINDI_FALLBACK.to_string()),
            },
        };

        Reply {
            topic,
            language,
            text,
        }
    }
}

/// Text handed to speech synthesis: every casing of "Gyaan" becomes "Gyan"
/// so the brand name is pronounced correctly.
pub fn speech_text(text: &str) -> String {
    const FROM: &str = "gyaan";
    const TO: &str = "Gyan";

    // ASCII lowering keeps byte offsets aligned with the original.
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, _) in lower.match_indices(FROM) {
        out.push_str(&text[cursor..start]);
        out.push_str(TO);
        cursor = start + FROM.len();
    }
    out.push_str(&text[cursor..]);
    out
}
