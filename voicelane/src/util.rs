//! Small conversions between persisted turns and chat history.

use vtranscript::{Speaker, TurnRecord};

use crate::{Message, ProviderId};

pub fn speaker_message(speaker: Speaker, content: impl Into<String>) -> Message {
    match speaker {
        Speaker::User => Message::user(content),
        Speaker::Assistant => Message::assistant(content),
    }
}

/// Replays saved turns as chat history, oldest first.
pub fn history_from_turns(turns: &[TurnRecord]) -> Vec<Message> {
    turns
        .iter()
        .map(|turn| speaker_message(turn.speaker, turn.text.as_str()))
        .collect()
}

/// Provider named by the namespace of a `namespace/model` identifier.
pub fn parse_provider_id(identifier: &str) -> Option<ProviderId> {
    let namespace = identifier
        .split_once('/')
        .map_or(identifier, |(namespace, _)| namespace);
    ProviderId::from_namespace(namespace)
}

#[cfg(test)]
mod tests {
    use vcommon::SessionId;

    use super::*;
    use crate::Role;

    #[test]
    fn parse_provider_id_supports_aliases() {
        assert_eq!(parse_provider_id("openai/gpt-4.1-mini"), Some(ProviderId::OpenAi));
        assert_eq!(parse_provider_id("Claude"), Some(ProviderId::Anthropic));
        assert_eq!(parse_provider_id("google/gemini-2.5-pro"), Some(ProviderId::Gemini));
        assert_eq!(parse_provider_id("mistral/large"), None);
    }

    #[test]
    fn turns_replay_as_alternating_history() {
        let session = SessionId::from("sess-1");
        let turns = vec![
            TurnRecord::new(session.clone(), Speaker::User, "Where am I?"),
            TurnRecord::new(session, Speaker::Assistant, "On Main Street."),
        ];

        let history = history_from_turns(&turns);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].content, "On Main Street.");
    }

    #[test]
    fn message_macros_build_history() {
        let history = crate::vl_messages![
            system => "Be brief.",
            user => "Hi",
        ];
        assert_eq!(history[0].role, Role::System);
        assert_eq!(crate::vl_msg!(user => "Hi"), history[1]);
    }
}
