//! The core models for keeping track of a conversation in memory.
use chrono::{DateTime, Local};

use crate::openai::{Message, Role};

/// Timestamp format used in every transcript line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One role-tagged, timestamped unit of conversation. Immutable once
/// created.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    role: Role,
    content: String,
    timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(role: Role, content: &str) -> Self {
        Self::new_at(role, content, Local::now())
    }

    pub fn new_at(role: Role, content: &str, timestamp: DateTime<Local>) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// Formats a transcript line as `<Label> [<timestamp>]: <content>`.
pub fn format_line(label: &str, timestamp: &DateTime<Local>, content: &str) -> String {
    format!(
        "{} [{}]: {}",
        label,
        timestamp.format(TIMESTAMP_FORMAT),
        content
    )
}

/// The on-screen and on-disk representation of a message.
pub fn to_display_line(msg: &ChatMessage) -> String {
    format_line(msg.role.display_name(), &msg.timestamp, &msg.content)
}

/// The ordered conversation for the open session. Grows by appends
/// only and is replayed in full to the model on every turn.
#[derive(Default, Debug)]
pub struct Transcript(Vec<ChatMessage>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Stamps a new message with the current time and appends it.
    pub fn append(&mut self, role: Role, content: &str) -> ChatMessage {
        let msg = ChatMessage::new(role, content);
        self.0.push(msg.clone());
        msg
    }

    /// Role/content pairs in order with timestamps stripped.
    pub fn to_ai_history(&self) -> Vec<Message> {
        self.0
            .iter()
            .map(|m| Message::new(m.role, &m.content))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn it_appends_in_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());

        transcript.append(Role::User, "first");
        transcript.append(Role::Assistant, "second");
        transcript.append(Role::User, "third");

        let contents: Vec<&str> = transcript.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn it_strips_timestamps_for_ai_history() {
        let mut transcript = Transcript::new();
        transcript.append(Role::User, "hi");
        transcript.append(Role::Assistant, "hello");

        let history = transcript.to_ai_history();
        assert_eq!(
            history,
            vec![
                Message::new(Role::User, "hi"),
                Message::new(Role::Assistant, "hello"),
            ]
        );
        assert_eq!(
            serde_json::to_string(&history).unwrap(),
            r#"[{"role":"user","content":"hi"},{"role":"assistant","content":"hello"}]"#
        );
    }

    #[test]
    fn it_formats_display_lines() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        let user = ChatMessage::new_at(Role::User, "How do I add a layer?", ts);
        assert_eq!(
            to_display_line(&user),
            "User [2024-03-09 14:05:07]: How do I add a layer?"
        );

        let assistant = ChatMessage::new_at(Role::Assistant, "Use the layer panel.", ts);
        assert_eq!(
            to_display_line(&assistant),
            "Assistant [2024-03-09 14:05:07]: Use the layer panel."
        );
    }

    #[test]
    fn it_returns_the_appended_message() {
        let mut transcript = Transcript::new();
        let msg = transcript.append(Role::User, "hi");
        assert_eq!(transcript.iter().next(), Some(&msg));
    }
}
