//! Per-session dispatch metadata and the prompts derived from it.
//!
//! ```rust
//! use voicelane::{SessionMetadata, TtsVoice};
//!
//! let metadata = SessionMetadata::from_json_str(r#"{"session_id":"s-1","language":"es-MX"}"#);
//! assert_eq!(metadata.language_label, "Spanish (Mexico)");
//! assert_eq!(metadata.stt_descriptor(), "deepgram/nova-3:es-MX");
//! assert!(matches!(metadata.tts_voice(false), TtsVoice::Inference(_)));
//! ```

use serde_json::{Map, Value};
use vcommon::SessionId;

pub const DEFAULT_VOICE: &str = "cartesia/sonic-3:9626c31c-bec5-4cca-baa8-f8ba9e84c8bc";
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const STT_MODEL: &str = "deepgram/nova-3";

const CARTESIA_PREFIX: &str = "cartesia/";

pub const LANGUAGE_DISPLAY_NAMES: [(&str, &str); 4] = [
    ("en-US", "English (US)"),
    ("en-GB", "English (UK)"),
    ("en-AU", "English (Australia)"),
    ("es-MX", "Spanish (Mexico)"),
];

pub fn language_display_name(code: &str) -> Option<&'static str> {
    LANGUAGE_DISPLAY_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// How speech is produced for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Speech-to-speech through a realtime model.
    Realtime,
    /// Separate STT, chat model, and TTS stages.
    Pipeline,
}

/// Text-to-speech voice selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtsVoice {
    /// Direct Cartesia synthesis with a model and voice id.
    Cartesia { model: String, voice_id: String },
    /// Any descriptor handed to the hosted inference gateway unchanged.
    Inference(String),
}

/// Classifies a `provider/model:voice` descriptor.
///
/// `cartesia/...` is only used directly when a Cartesia key is configured;
/// malformed Cartesia descriptors and every other provider pass through.
pub fn classify_voice(descriptor: &str, cartesia_configured: bool) -> TtsVoice {
    if !descriptor.starts_with(CARTESIA_PREFIX) {
        return TtsVoice::Inference(descriptor.to_string());
    }

    let Some((model_part, voice_id)) = descriptor.split_once(':') else {
        tracing::warn!(voice = descriptor, "invalid cartesia voice descriptor; using inference");
        return TtsVoice::Inference(descriptor.to_string());
    };

    if !cartesia_configured {
        tracing::warn!(voice = descriptor, "cartesia key not configured; using inference");
        return TtsVoice::Inference(descriptor.to_string());
    }

    let model = model_part
        .rsplit_once('/')
        .map_or(model_part, |(_, model)| model);
    TtsVoice::Cartesia {
        model: model.to_string(),
        voice_id: voice_id.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMetadata {
    pub session_id: Option<SessionId>,
    pub realtime: bool,
    pub voice: String,
    pub model: String,
    pub tool_calling_enabled: bool,
    pub web_search_enabled: bool,
    pub language: String,
    pub language_label: String,
}

impl Default for SessionMetadata {
    fn default() -> Self {
        Self::from_object(&Map::new())
    }
}

impl SessionMetadata {
    /// Parses raw dispatch metadata; anything unparseable yields the defaults.
    pub fn from_json_str(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_json(&value),
            Err(error) => {
                tracing::warn!(error = %error, "failed to parse session metadata");
                Self::default()
            }
        }
    }

    pub fn from_json(value: &Value) -> Self {
        match value.as_object() {
            Some(object) => Self::from_object(object),
            None => {
                tracing::warn!("session metadata is not a JSON object");
                Self::default()
            }
        }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let string = |key: &str| object.get(key).and_then(Value::as_str);
        let flag = |key: &str, default: bool| object.get(key).and_then(Value::as_bool).unwrap_or(default);

        let language = string("language")
            .filter(|language| !language.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string();

        let language_label = match string("language_label").map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => language_display_name(&language)
                .map(str::to_string)
                .unwrap_or_else(|| language.clone()),
        };

        Self {
            session_id: string("session_id").and_then(SessionId::parse),
            realtime: flag("realtime", false),
            voice: string("voice").unwrap_or(DEFAULT_VOICE).to_string(),
            model: string("model").unwrap_or(DEFAULT_MODEL).to_string(),
            tool_calling_enabled: flag("tool_calling_enabled", true),
            web_search_enabled: flag("web_search_enabled", true),
            language,
            language_label,
        }
    }

    pub fn mode(&self) -> SessionMode {
        if self.realtime {
            SessionMode::Realtime
        } else {
            SessionMode::Pipeline
        }
    }

    /// Web search is offered only when tool calling is also enabled.
    pub fn web_search_active(&self) -> bool {
        self.tool_calling_enabled && self.web_search_enabled
    }

    pub fn instructions(&self) -> String {
        let label = &self.language_label;
        let mut instructions = format!(
            "You are a helpful voice AI assistant for CarPlay. Keep responses concise, clear, and in {label} for safe driving. Default to {label} unless the driver explicitly asks for another language."
        );

        if self.web_search_active() {
            instructions.push_str(
                " When users ask questions requiring current information (news, weather, traffic, events, facts), use the web_search tool.",
            );
        } else {
            instructions.push_str(" Rely on your built-in knowledge to answer questions.");
        }

        instructions
    }

    pub fn greeting_instructions(&self) -> String {
        format!(
            "Greet the driver briefly in {} and ask how you can help them.",
            self.language_label
        )
    }

    pub fn stt_descriptor(&self) -> String {
        format!("{STT_MODEL}:{}", self.language)
    }

    pub fn tts_voice(&self, cartesia_configured: bool) -> TtsVoice {
        classify_voice(&self.voice, cartesia_configured)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_metadata_uses_defaults() {
        let metadata = SessionMetadata::from_json_str("");

        assert_eq!(metadata.session_id, None);
        assert!(!metadata.realtime);
        assert_eq!(metadata.voice, DEFAULT_VOICE);
        assert_eq!(metadata.model, DEFAULT_MODEL);
        assert!(metadata.tool_calling_enabled);
        assert!(metadata.web_search_enabled);
        assert_eq!(metadata.language, "en-US");
        assert_eq!(metadata.language_label, "English (US)");
        assert_eq!(metadata.mode(), SessionMode::Pipeline);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        assert_eq!(
            SessionMetadata::from_json_str("{not json"),
            SessionMetadata::default()
        );
        assert_eq!(
            SessionMetadata::from_json(&json!(["a", "b"])),
            SessionMetadata::default()
        );
    }

    #[test]
    fn language_fields_fall_back_sensibly() {
        let non_string = SessionMetadata::from_json(&json!({"language": 7}));
        assert_eq!(non_string.language, "en-US");

        let unknown = SessionMetadata::from_json(&json!({"language": "fr-CA"}));
        assert_eq!(unknown.language_label, "fr-CA");

        let explicit = SessionMetadata::from_json(&json!({
            "language": "en-GB",
            "language_label": "  British English "
        }));
        assert_eq!(explicit.language_label, "British English");

        let blank_label = SessionMetadata::from_json(&json!({
            "language": "en-AU",
            "language_label": "   "
        }));
        assert_eq!(blank_label.language_label, "English (Australia)");
    }

    #[test]
    fn instructions_follow_tool_settings() {
        let with_search = SessionMetadata::default();
        assert!(with_search.instructions().ends_with("use the web_search tool."));
        assert!(with_search.instructions().contains("in English (US) for safe driving"));

        let no_tools = SessionMetadata::from_json(&json!({"tool_calling_enabled": false}));
        assert!(!no_tools.web_search_active());
        assert!(
            no_tools
                .instructions()
                .ends_with("Rely on your built-in knowledge to answer questions.")
        );

        let no_search = SessionMetadata::from_json(&json!({"web_search_enabled": false}));
        assert!(no_search.instructions().ends_with("built-in knowledge to answer questions."));
    }

    #[test]
    fn greeting_and_stt_use_language() {
        let metadata = SessionMetadata::from_json(&json!({"language": "es-MX", "realtime": true}));

        assert_eq!(
            metadata.greeting_instructions(),
            "Greet the driver briefly in Spanish (Mexico) and ask how you can help them."
        );
        assert_eq!(metadata.stt_descriptor(), "deepgram/nova-3:es-MX");
        assert_eq!(metadata.mode(), SessionMode::Realtime);
    }

    #[test]
    fn cartesia_voice_requires_key_and_valid_format() {
        assert_eq!(
            classify_voice(DEFAULT_VOICE, true),
            TtsVoice::Cartesia {
                model: "sonic-3".to_string(),
                voice_id: "9626c31c-bec5-4cca-baa8-f8ba9e84c8bc".to_string(),
            }
        );
        assert_eq!(
            classify_voice(DEFAULT_VOICE, false),
            TtsVoice::Inference(DEFAULT_VOICE.to_string())
        );
        assert_eq!(
            classify_voice("cartesia/sonic-3", true),
            TtsVoice::Inference("cartesia/sonic-3".to_string())
        );
        assert_eq!(
            classify_voice("elevenlabs/eleven_turbo_v2_5:voice", true),
            TtsVoice::Inference("elevenlabs/eleven_turbo_v2_5:voice".to_string())
        );
    }
}
