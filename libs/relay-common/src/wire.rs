//! Text-frame wire format shared by the relay and its clients.
//!
//! Every frame is a single UTF-8 string in one of three shapes:
//!
//! - `"<sender>: <body>"` for chat text,
//! - `"file:<mime type>:<encoded content>"` for inline files (the content is
//!   usually a data URI and may itself contain colons),
//! - a bare string for server notices such as `"Client alice left the chat"`.

use std::fmt;

/// Prefix that marks a frame as an inline file.
pub const FILE_PREFIX: &str = "file:";

/// Separator between the sender name and the body of a text frame.
pub const SENDER_SEPARATOR: &str = ": ";

/// A message broadcast to every connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    Text { sender: String, body: String },
    File { mime_type: String, encoded_content: String },
    Notice { text: String },
}

impl ChatMessage {
    pub fn text(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Text {
            sender: sender.into(),
            body: body.into(),
        }
    }

    pub fn file(mime_type: impl Into<String>, encoded_content: impl Into<String>) -> Self {
        Self::File {
            mime_type: mime_type.into(),
            encoded_content: encoded_content.into(),
        }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::Notice { text: text.into() }
    }

    /// Notice announcing that `display_name` connected.
    pub fn joined(display_name: &str) -> Self {
        Self::notice(format!("Client {display_name} joined the chat"))
    }

    /// Notice announcing that `display_name` disconnected.
    pub fn departed(display_name: &str) -> Self {
        Self::notice(format!("Client {display_name} left the chat"))
    }

    /// Decode one inbound frame sent by the connection named `display_name`.
    ///
    /// Only the first two colons of a file frame are significant. A `file:`
    /// frame without a second colon is not an error; it is relayed as text.
    /// Text that already carries the sender's own name is kept as is, any
    /// other text is attributed to `display_name`.
    pub fn decode(frame: &str, display_name: &str) -> Self {
        if let Some((mime_type, encoded_content)) = frame
            .strip_prefix(FILE_PREFIX)
            .and_then(|rest| rest.split_once(':'))
        {
            return Self::file(mime_type, encoded_content);
        }

        let body = frame
            .strip_prefix(display_name)
            .and_then(|rest| rest.strip_prefix(SENDER_SEPARATOR))
            .unwrap_or(frame);

        Self::text(display_name, body)
    }

    /// Render the outbound text frame.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { sender, body } => write!(f, "{sender}{SENDER_SEPARATOR}{body}"),
            Self::File {
                mime_type,
                encoded_content,
            } => write!(f, "{FILE_PREFIX}{mime_type}:{encoded_content}"),
            Self::Notice { text } => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_renders_sender_and_body() {
        assert_eq!(ChatMessage::text("alice", "hello").render(), "alice: hello");
    }

    #[test]
    fn notices_render_bare() {
        assert_eq!(
            ChatMessage::departed("alice").render(),
            "Client alice left the chat"
        );
        assert_eq!(
            ChatMessage::joined("bob").render(),
            "Client bob joined the chat"
        );
    }

    #[test]
    fn decode_file_splits_on_first_two_colons() {
        let frame = "file:image/png:data:image/png;base64,AAAA";
        let msg = ChatMessage::decode(frame, "alice");
        assert_eq!(
            msg,
            ChatMessage::file("image/png", "data:image/png;base64,AAAA")
        );
        assert_eq!(msg.render(), frame);
    }

    #[test]
    fn decode_file_with_empty_mime_type() {
        let msg = ChatMessage::decode("file::data:,x", "alice");
        assert_eq!(msg, ChatMessage::file("", "data:,x"));
    }

    #[test]
    fn decode_malformed_file_falls_back_to_text() {
        let msg = ChatMessage::decode("file:nocolon", "alice");
        assert_eq!(msg, ChatMessage::text("alice", "file:nocolon"));
        assert_eq!(msg.render(), "alice: file:nocolon");
    }

    #[test]
    fn decode_keeps_own_name_prefix() {
        let msg = ChatMessage::decode("alice: hello: world", "alice");
        assert_eq!(msg, ChatMessage::text("alice", "hello: world"));
        assert_eq!(msg.render(), "alice: hello: world");
    }

    #[test]
    fn decode_attributes_bare_text_to_sender() {
        assert_eq!(
            ChatMessage::decode("hello", "alice").render(),
            "alice: hello"
        );
    }

    #[test]
    fn decode_does_not_trust_foreign_name_prefix() {
        assert_eq!(
            ChatMessage::decode("bob: hi", "alice").render(),
            "alice: bob: hi"
        );
        // A longer name that merely starts with the sender's name is foreign too.
        assert_eq!(
            ChatMessage::decode("alicex: hi", "alice").render(),
            "alice: alicex: hi"
        );
    }

    #[test]
    fn decode_empty_frame() {
        assert_eq!(ChatMessage::decode("", "alice").render(), "alice: ");
    }
}
