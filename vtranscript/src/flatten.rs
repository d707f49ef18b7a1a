//! Reduction of loosely-shaped transcript payloads to plain, normalized text.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use vtranscript::{TextValue, flatten_text, normalize_text};
//!
//! let mut map = BTreeMap::new();
//! map.insert("transcript".to_string(), TextValue::from(""));
//! map.insert("text".to_string(), TextValue::from("hello"));
//!
//! assert_eq!(flatten_text(&TextValue::Map(map)), "hello");
//! assert_eq!(normalize_text(&TextValue::from(" turn   left\n")), "turn left");
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

/// Keys consulted on a mapping, in priority order.
pub const MAP_KEY_ORDER: [&str; 4] = ["text", "transcript", "content", "value"];

/// Attributes consulted on a structured message, in priority order.
pub const MESSAGE_ATTRIBUTE_ORDER: [&str; 4] = ["text", "transcript", "value", "content"];

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TextValue {
    #[default]
    Absent,
    Message(MessageValue),
    Bytes(Vec<u8>),
    /// Ordered sequence; unordered sets are passed in caller order.
    List(Vec<TextValue>),
    Map(BTreeMap<String, TextValue>),
    Text(String),
    /// Any other value already rendered to its string form.
    Scalar(String),
}

/// A structured chat message as delivered by the session host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageValue {
    /// Pre-rendered text; used verbatim when non-empty.
    pub text_content: Option<String>,
    pub text: Option<Box<TextValue>>,
    pub transcript: Option<Box<TextValue>>,
    pub value: Option<Box<TextValue>>,
    pub content: Option<Box<TextValue>>,
}

impl MessageValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_content(mut self, text_content: impl Into<String>) -> Self {
        self.text_content = Some(text_content.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<TextValue>) -> Self {
        self.text = Some(Box::new(text.into()));
        self
    }

    pub fn with_transcript(mut self, transcript: impl Into<TextValue>) -> Self {
        self.transcript = Some(Box::new(transcript.into()));
        self
    }

    pub fn with_value(mut self, value: impl Into<TextValue>) -> Self {
        self.value = Some(Box::new(value.into()));
        self
    }

    pub fn with_content(mut self, content: impl Into<TextValue>) -> Self {
        self.content = Some(Box::new(content.into()));
        self
    }

    fn attribute(&self, name: &str) -> Option<&TextValue> {
        let attribute = match name {
            "text" => &self.text,
            "transcript" => &self.transcript,
            "value" => &self.value,
            "content" => &self.content,
            _ => return None,
        };

        attribute.as_deref()
    }
}

impl TextValue {
    /// Whether the value carries anything at all (non-empty string, bytes, or container).
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::Message(_) => true,
            Self::Bytes(bytes) => !bytes.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Map(entries) => !entries.is_empty(),
            Self::Text(text) | Self::Scalar(text) => !text.is_empty(),
        }
    }
}

impl From<&str> for TextValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TextValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for TextValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Vec<u8>> for TextValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for TextValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<TextValue>> for TextValue {
    fn from(value: Vec<TextValue>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for TextValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(TextValue::from).collect())
    }
}

impl From<Vec<String>> for TextValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value.into_iter().map(TextValue::from).collect())
    }
}

impl<T> From<Option<T>> for TextValue
where
    T: Into<TextValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Absent)
    }
}

impl From<MessageValue> for TextValue {
    fn from(value: MessageValue) -> Self {
        Self::Message(value)
    }
}

impl From<Value> for TextValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Bool(flag) => Self::Scalar(flag.to_string()),
            Value::Number(number) => Self::Scalar(number.to_string()),
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for TextValue {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

/// Reduces `value` to plain text; the first matching rule wins.
///
/// Never fails: undecodable bytes are dropped and unknown shapes yield `""`.
pub fn flatten_text(value: &TextValue) -> String {
    match value {
        TextValue::Absent => String::new(),
        TextValue::Message(message) => {
            if let Some(rendered) = message.text_content.as_deref()
                && !rendered.is_empty()
            {
                return rendered.to_string();
            }

            MESSAGE_ATTRIBUTE_ORDER
                .iter()
                .filter_map(|name| message.attribute(name))
                .map(flatten_text)
                .find(|flattened| !flattened.is_empty())
                .unwrap_or_default()
        }
        TextValue::Bytes(bytes) => decode_lossless_parts(bytes),
        TextValue::List(items) => items
            .iter()
            .map(flatten_text)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        TextValue::Map(entries) => MAP_KEY_ORDER
            .iter()
            .filter_map(|key| entries.get(*key))
            .filter(|entry| entry.is_truthy())
            .map(flatten_text)
            .find(|flattened| !flattened.is_empty())
            .unwrap_or_default(),
        TextValue::Text(text) | TextValue::Scalar(text) => text.clone(),
    }
}

/// Collapses every whitespace run to a single space and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_text(value: &TextValue) -> String {
    normalize_whitespace(&flatten_text(value))
}

/// UTF-8 decode keeping every valid run and silently dropping invalid bytes.
fn decode_lossless_parts(bytes: &[u8]) -> String {
    bytes
        .utf8_chunks()
        .map(|chunk| chunk.valid())
        .collect::<String>()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rendered_text_content_short_circuits() {
        let message = MessageValue::new()
            .with_text_content("rendered")
            .with_text("attribute");
        assert_eq!(flatten_text(&message.into()), "rendered");

        let empty_rendered = MessageValue::new()
            .with_text_content("")
            .with_content(vec!["from", "content"]);
        assert_eq!(flatten_text(&empty_rendered.into()), "from content");
    }

    #[test]
    fn message_attributes_follow_fixed_order() {
        let message = MessageValue::new()
            .with_content("content wins last")
            .with_value("value before content")
            .with_transcript("");
        assert_eq!(flatten_text(&message.into()), "value before content");

        assert_eq!(flatten_text(&MessageValue::new().into()), "");
    }

    #[test]
    fn map_keys_follow_fixed_order_independent_of_insertion() {
        let value = TextValue::from(json!({"transcript": "", "text": "hello"}));
        assert_eq!(flatten_text(&value), "hello");

        let value = TextValue::from(json!({"value": "v", "content": "c"}));
        assert_eq!(flatten_text(&value), "c");

        let value = TextValue::from(json!({"other": "ignored"}));
        assert_eq!(flatten_text(&value), "");

        let nested = TextValue::from(json!({"content": [{"text": "a"}, {"transcript": "b"}]}));
        assert_eq!(flatten_text(&nested), "a b");
    }

    #[test]
    fn bytes_drop_invalid_sequences() {
        let bytes = vec![b'h', b'i', 0xff, b' ', 0xe2, 0x82, b't', b'h', b'e', b'r', b'e'];
        assert_eq!(flatten_text(&TextValue::from(bytes)), "hi there");
        assert_eq!(flatten_text(&TextValue::from("caf\u{e9}".as_bytes())), "caf\u{e9}");
    }

    #[test]
    fn lists_skip_empty_elements() {
        let value = TextValue::from(vec![
            TextValue::from("turn"),
            TextValue::Absent,
            TextValue::from(""),
            TextValue::from("left"),
        ]);
        assert_eq!(flatten_text(&value), "turn left");
    }

    #[test]
    fn scalars_render_as_strings() {
        assert_eq!(flatten_text(&TextValue::from(json!(42))), "42");
        assert_eq!(flatten_text(&TextValue::from(json!(true))), "true");
        assert_eq!(flatten_text(&TextValue::from(json!(null))), "");
        assert_eq!(flatten_text(&TextValue::from(None::<String>)), "");
    }

    #[test]
    fn normalization_collapses_whitespace_and_is_idempotent() {
        assert_eq!(normalize_whitespace(" a   b\n"), "a b");
        assert_eq!(normalize_whitespace("a b"), "a b");
        assert_eq!(normalize_whitespace("\t\n  "), "");

        let once = normalize_text(&TextValue::from("  Take\tthe  next\n exit "));
        assert_eq!(once, "Take the next exit");
        assert_eq!(normalize_whitespace(&once), once);
    }
}
