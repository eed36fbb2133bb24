//! JSON Lines export of a session's history.
//!
//! One `{"role": ..., "content": ...}` object per message, in log order,
//! written with `": "` / `", "` separators and raw UTF-8. Lines are joined by
//! `\n` with no trailing newline.

use std::io;

use chatstudio_types::chat::{ChatMessage, MessageRole};
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// Content type used when serving an export over HTTP.
pub const JSONL_CONTENT_TYPE: &str = "application/jsonl";

#[derive(Serialize)]
struct ExportLine<'a> {
    role: MessageRole,
    content: &'a str,
}

/// Compact JSON with a space after every `:` and `,`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize messages to JSON Lines bytes.
pub fn to_jsonl(messages: &[ChatMessage]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        let line = ExportLine {
            role: message.role,
            content: &message.content,
        };
        let mut serializer = Serializer::with_formatter(&mut out, SpacedFormatter);
        line.serialize(&mut serializer)?;
    }
    Ok(out)
}

/// Default download name for a session export.
pub fn export_file_name(session_id: i64) -> String {
    format!("session_{session_id}.jsonl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatstudio_types::chat::MessageMetadata;
    use chrono::Utc;

    fn message(id: i64, role: MessageRole, content: &str) -> ChatMessage {
        ChatMessage {
            id,
            session_id: 1,
            role,
            content: content.to_string(),
            metadata: MessageMetadata::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_export_two_messages() {
        let messages = vec![
            message(1, MessageRole::User, "hi"),
            message(2, MessageRole::Assistant, "hello"),
        ];
        let out = String::from_utf8(to_jsonl(&messages).unwrap()).unwrap();
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(
            lines,
            vec![
                r#"{"role": "user", "content": "hi"}"#,
                r#"{"role": "assistant", "content": "hello"}"#,
            ]
        );
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn test_export_keeps_unicode_and_escapes_newlines() {
        let messages = vec![message(1, MessageRole::System, "Sé breve.\nSin emojis 🤖")];
        let out = String::from_utf8(to_jsonl(&messages).unwrap()).unwrap();
        assert_eq!(
            out,
            r#"{"role": "system", "content": "Sé breve.\nSin emojis 🤖"}"#
        );
    }

    #[test]
    fn test_export_empty_session() {
        assert!(to_jsonl(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(12), "session_12.jsonl");
    }
}
