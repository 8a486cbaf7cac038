//! UI message stream frames and their wire encoding.
//!
//! Every frame is written as one `data: <payload>\n\n` record. Payloads are
//! compact JSON objects tagged by `type`; the stream ends with the literal
//! `data: [DONE]` record.

use chrono::Utc;
use serde::Serialize;
use std::fmt;

/// Payload of the record that closes a stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Identifier shared by the text frames of one response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// `msg_<unix millis>` for the current instant.
    pub fn now() -> Self {
        Self::from_millis(Utc::now().timestamp_millis())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(format!("msg_{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One event of the response stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Frame {
    Start,
    StartStep,
    TextStart { id: MessageId },
    TextDelta { id: MessageId, delta: String },
    TextEnd { id: MessageId },
    FinishStep,
    Finish,
    /// Stream terminator. Encoded as a bare marker, not JSON.
    #[serde(skip)]
    Done,
}

impl Frame {
    /// Wire name of the frame (`text-delta`, ...). The terminator reports `[DONE]`.
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Start => "start",
            Frame::StartStep => "start-step",
            Frame::TextStart { .. } => "text-start",
            Frame::TextDelta { .. } => "text-delta",
            Frame::TextEnd { .. } => "text-end",
            Frame::FinishStep => "finish-step",
            Frame::Finish => "finish",
            Frame::Done => DONE_MARKER,
        }
    }

    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            Frame::TextStart { id } | Frame::TextDelta { id, .. } | Frame::TextEnd { id } => {
                Some(id)
            }
            _ => None,
        }
    }

    /// Serialize into a complete `data: ...\n\n` record.
    pub fn encode(&self) -> String {
        let payload = match self {
            Frame::Done => DONE_MARKER.to_string(),
            // Frames hold only strings and unit variants.
            frame => serde_json::to_string(frame).expect("frame serializes to JSON"),
        };
        format!("data: {payload}\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> MessageId {
        MessageId::from_millis(1_700_000_000_000)
    }

    #[test]
    fn test_message_id_format() {
        assert_eq!(id().as_str(), "msg_1700000000000");
        assert!(MessageId::now().as_str().starts_with("msg_"));
    }

    #[test]
    fn test_lifecycle_frames_encode() {
        assert_eq!(Frame::Start.encode(), "data: {\"type\":\"start\"}\n\n");
        assert_eq!(Frame::StartStep.encode(), "data: {\"type\":\"start-step\"}\n\n");
        assert_eq!(Frame::FinishStep.encode(), "data: {\"type\":\"finish-step\"}\n\n");
        assert_eq!(Frame::Finish.encode(), "data: {\"type\":\"finish\"}\n\n");
        assert_eq!(Frame::Done.encode(), "data: [DONE]\n\n");
    }

    #[test]
    fn test_text_frames_carry_id() {
        assert_eq!(
            Frame::TextStart { id: id() }.encode(),
            "data: {\"type\":\"text-start\",\"id\":\"msg_1700000000000\"}\n\n"
        );
        assert_eq!(
            Frame::TextEnd { id: id() }.encode(),
            "data: {\"type\":\"text-end\",\"id\":\"msg_1700000000000\"}\n\n"
        );
    }

    #[test]
    fn test_delta_is_json_escaped() {
        let frame = Frame::TextDelta {
            id: id(),
            delta: "\n\"quoted\"\t".to_string(),
        };
        let encoded = frame.encode();
        assert_eq!(
            encoded,
            "data: {\"type\":\"text-delta\",\"id\":\"msg_1700000000000\",\"delta\":\"\\n\\\"quoted\\\"\\t\"}\n\n"
        );

        let payload = encoded
            .strip_prefix("data: ")
            .and_then(|rest| rest.strip_suffix("\n\n"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["delta"], "\n\"quoted\"\t");
    }

    #[test]
    fn test_kind_and_message_id() {
        assert_eq!(Frame::Done.kind(), "[DONE]");
        assert_eq!(Frame::TextEnd { id: id() }.kind(), "text-end");
        assert_eq!(Frame::TextStart { id: id() }.message_id(), Some(&id()));
        assert_eq!(Frame::Finish.message_id(), None);
    }

    #[test]
    fn test_every_json_frame_names_its_kind() {
        let frames = [
            Frame::Start,
            Frame::StartStep,
            Frame::TextStart { id: id() },
            Frame::TextDelta {
                id: id(),
                delta: String::new(),
            },
            Frame::TextEnd { id: id() },
            Frame::FinishStep,
            Frame::Finish,
        ];
        for frame in frames {
            let encoded = frame.encode();
            let payload = encoded
                .strip_prefix("data: ")
                .and_then(|rest| rest.strip_suffix("\n\n"))
                .unwrap();
            let value: serde_json::Value = serde_json::from_str(payload).unwrap();
            assert_eq!(value["type"], frame.kind());
        }
    }
}
