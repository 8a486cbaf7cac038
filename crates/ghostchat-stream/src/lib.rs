//! GhostChat stream core.
//!
//! Turns a chat conversation into the frame sequence a streaming chat
//! backend would send:
//!
//! - [`responder`] picks a canned reply for the last message
//! - [`tokenizer`] splits the reply into display fragments
//! - [`emitter`] sequences the protocol frames for those fragments
//! - [`protocol`] defines the frames and their `data:` wire encoding
//!
//! Everything here is pure and allocation-local; no state is shared between
//! requests.

pub mod emitter;
pub mod models;
pub mod protocol;
pub mod responder;
pub mod tokenizer;

pub use emitter::FrameStream;
pub use models::{ChatMessage, ChatRequest, MessagePart};
pub use protocol::{DONE_MARKER, Frame, MessageId};
pub use responder::{Reply, ReplyRule, respond};
pub use tokenizer::{Tokens, tokenize};
