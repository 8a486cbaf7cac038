//! Frame sequencing for one streamed response.
//!
//! [`FrameStream`] walks a fixed lifecycle and yields exactly one frame per
//! transition:
//!
//! ```text
//! Init ─ start ─▶ StepStarted ─ start-step ─▶ TextOpen ─ text-start ─▶
//!     (TextDelta ─ text-delta)* ─▶ TextClosed ─ text-end ─▶
//!     StepFinished ─ finish-step ─▶ Finished ─ finish ─▶ Terminated ─ [DONE]
//! ```
//!
//! Frames are produced on demand, so a consumer that stops pulling (for
//! example because the client went away) stops all further work.

use crate::models::ChatRequest;
use crate::protocol::{Frame, MessageId};
use crate::responder::{Reply, respond};
use crate::tokenizer::tokenize;

/// Position in the response lifecycle; names the next frame to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmitterState {
    Init,
    StepStarted,
    TextOpen,
    TextDelta,
    TextClosed,
    StepFinished,
    Finished,
    Terminated,
    /// Nothing left to emit.
    Closed,
}

/// Lazy, ordered frame sequence for a single reply.
///
/// Owns the reply text so it can be moved into a response body.
#[derive(Debug, Clone)]
pub struct FrameStream {
    id: MessageId,
    text: String,
    /// Byte offset of the next token in `text`.
    offset: usize,
    state: EmitterState,
}

impl FrameStream {
    /// Frames streaming `text` under message `id`.
    pub fn new(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            offset: 0,
            state: EmitterState::Init,
        }
    }

    /// A sequence that yields no frames at all.
    pub fn empty(id: MessageId) -> Self {
        Self {
            id,
            text: String::new(),
            offset: 0,
            state: EmitterState::Closed,
        }
    }

    pub fn for_reply(id: MessageId, reply: Reply) -> Self {
        Self::new(id, reply.into_string())
    }

    /// Answer `request`, tagging text frames with `id`.
    ///
    /// An empty conversation yields no frames.
    pub fn for_request(request: &ChatRequest, id: MessageId) -> Self {
        match request.last_message_text() {
            Some(text) => Self::for_reply(id, respond(text)),
            None => Self::empty(id),
        }
    }

    pub fn message_id(&self) -> &MessageId {
        &self.id
    }

    /// Full reply text being streamed.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn next_token(&mut self) -> Option<String> {
        // The delimiter pattern has no anchors, so tokenizing the remainder
        // from a token boundary yields the same fragments as the full text.
        let token = tokenize(&self.text[self.offset..]).next()?.to_string();
        self.offset += token.len();
        Some(token)
    }

    fn text_frame_id(&self) -> MessageId {
        self.id.clone()
    }
}

impl Iterator for FrameStream {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        use EmitterState::*;

        let (frame, next) = match self.state {
            Init => (Frame::Start, StepStarted),
            StepStarted => (Frame::StartStep, TextOpen),
            TextOpen => (
                Frame::TextStart {
                    id: self.text_frame_id(),
                },
                TextDelta,
            ),
            TextDelta => match self.next_token() {
                Some(delta) => (
                    Frame::TextDelta {
                        id: self.text_frame_id(),
                        delta,
                    },
                    TextDelta,
                ),
                None => {
                    self.state = TextClosed;
                    return self.next();
                }
            },
            TextClosed => (
                Frame::TextEnd {
                    id: self.text_frame_id(),
                },
                StepFinished,
            ),
            StepFinished => (Frame::FinishStep, Finished),
            Finished => (Frame::Finish, Terminated),
            Terminated => (Frame::Done, Closed),
            Closed => return None,
        };

        self.state = next;
        Some(frame)
    }
}

impl std::iter::FusedIterator for FrameStream {}
