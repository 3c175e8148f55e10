//! Prompt construction and response parsing for the LLM-backed services.

use anyhow::{anyhow, Context, Result};
use llm::ChatMessage;
use serde::Deserialize;
use serde_json::Value;

use lingo_core::language::LanguageSet;
use lingo_core::ports::{Detection, LanguagePair, SummarizeOptions};

const DETECT_SYSTEM: &str = r#"You identify the language of a text.
Reply ONLY as JSON: {"candidates": [{"language": "<ISO 639-1 code>", "confidence": <0..1>}]}
Order candidates by descending confidence. Use "und" when the language cannot be determined."#;

fn name_of<'a>(languages: &'a LanguageSet, tag: &'a str) -> &'a str {
    languages.display_name(tag).unwrap_or(tag)
}

pub fn detect(text: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(DETECT_SYSTEM), ChatMessage::user(text)]
}

pub fn translate(languages: &LanguageSet, pair: &LanguagePair, text: &str) -> Vec<ChatMessage> {
    let system = format!(
        "Translate the user's text from {} to {}. Reply with the translation only, without quotes or notes.",
        name_of(languages, pair.source.as_str()),
        name_of(languages, pair.target.as_str()),
    );
    vec![ChatMessage::system(system), ChatMessage::user(text)]
}

pub fn summarize(languages: &LanguageSet, options: &SummarizeOptions, text: &str) -> Vec<ChatMessage> {
    let mut system = String::from("Summarize the user's text as a few concise key points.");
    if let Some(source) = &options.source_language {
        system.push_str(&format!(" The text is written in {}.", name_of(languages, source.as_str())));
    }
    if let Some(target) = &options.target_language {
        system.push_str(&format!(" Write the summary in {}.", name_of(languages, target.as_str())));
    }
    system.push_str(" Reply with the summary only.");
    vec![ChatMessage::system(system), ChatMessage::user(text)]
}

#[derive(Deserialize)]
struct Candidate {
    language: String,
    #[serde(default)]
    confidence: f32,
}

/// Accepts `{"candidates": [...]}`, a bare array, or a single candidate
/// object. The result is sorted by descending confidence.
pub fn parse_detections(raw: &str) -> Result<Vec<Detection>> {
    let value: Value = serde_json::from_str(raw.trim()).context("detector reply is not JSON")?;
    let list = match &value {
        Value::Array(_) => value.clone(),
        Value::Object(map) if map.contains_key("candidates") => map["candidates"].clone(),
        Value::Object(map) if map.contains_key("language") => Value::Array(vec![value.clone()]),
        _ => return Err(anyhow!("unexpected detector reply: {}", raw)),
    };
    let candidates: Vec<Candidate> = serde_json::from_value(list).context("malformed detection candidates")?;

    let mut detections: Vec<Detection> = candidates
        .into_iter()
        .map(|c| Detection::new(c.language.trim().to_lowercase(), c.confidence))
        .collect();
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Ok(detections)
}

/// Strips whitespace and a pair of wrapping quotes the model sometimes adds.
pub fn clean_reply(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::LanguageTag;

    #[test]
    fn translate_prompt_names_both_languages() {
        let messages = translate(&LanguageSet::default(), &LanguagePair::new("fr", "en"), "Bonjour");
        assert!(messages[0].content.contains("from French to English"));
        assert_eq!(messages[1].content, "Bonjour");
    }

    #[test]
    fn summarize_prompt_includes_only_given_hints() {
        let languages = LanguageSet::default();
        let messages = summarize(&languages, &SummarizeOptions::within(LanguageTag::new("pt")), "texto");
        assert!(messages[0].content.contains("written in Portuguese"));
        assert!(messages[0].content.contains("summary in Portuguese"));

        let messages = summarize(&languages, &SummarizeOptions::new(None, Some("es".into())), "text");
        assert!(!messages[0].content.contains("written in"));
        assert!(messages[0].content.contains("summary in Spanish"));
    }

    #[test]
    fn unknown_tags_fall_back_to_the_tag() {
        let messages = translate(&LanguageSet::default(), &LanguagePair::new("de", "en"), "Hallo");
        assert!(messages[0].content.contains("from de to English"));
    }

    #[test]
    fn detections_parse_in_every_shape() {
        let wrapped = parse_detections(
            r#"{"candidates": [{"language": "en", "confidence": 0.2}, {"language": "FR", "confidence": 0.7}]}"#,
        )
        .unwrap();
        assert_eq!(wrapped[0], Detection::new("fr", 0.7));
        assert_eq!(wrapped.len(), 2);

        let bare = parse_detections(r#"[{"language": "ru", "confidence": 0.9}]"#).unwrap();
        assert_eq!(bare, vec![Detection::new("ru", 0.9)]);

        let single = parse_detections(r#" {"language": "es"} "#).unwrap();
        assert_eq!(single, vec![Detection::new("es", 0.0)]);

        assert!(parse_detections("{\"candidates\": []}").unwrap().is_empty());
    }

    #[test]
    fn garbage_detection_reply_is_an_error() {
        assert!(parse_detections("french, probably").is_err());
        assert!(parse_detections(r#"{"lang": "fr"}"#).is_err());
    }

    #[test]
    fn replies_are_unquoted() {
        assert_eq!(clean_reply("  \"Hello world\"\n"), "Hello world");
        assert_eq!(clean_reply("plain"), "plain");
        assert_eq!(clean_reply("\""), "\"");
    }
}
