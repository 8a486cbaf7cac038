//! Streaming chat endpoint.
//!
//! The reply is written as a `text/plain` body of `data: ...` records, one
//! body chunk per frame. Frames are generated only when the connection asks
//! for more data, so a slow client applies backpressure and a closed one
//! stops generation.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{State, rejection::JsonRejection},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::Stream;
use ghostchat_stream::{ChatRequest, Frame, FrameStream, MessageId};
use tracing::{debug, info, trace};

use crate::api::{response::ApiError, state::AppState};

/// Protocol marker header expected by AI SDK clients.
pub const DATA_STREAM_HEADER: &str = "x-vercel-ai-data-stream";

// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    let message_id = MessageId::now();
    info!(
        message_id = %message_id,
        model = %request.model,
        web_search = request.web_search,
        messages = request.messages.len(),
        text = ?request.last_message_text(),
        "Chat request received"
    );

    let frames = FrameStream::for_request(&request, message_id.clone());
    let body = Body::from_stream(frame_records(message_id, frames, state.token_delay));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache, no-transform"),
            (header::CONNECTION, "keep-alive"),
            (HeaderName::from_static(DATA_STREAM_HEADER), "v1"),
        ],
        body,
    )
        .into_response())
}

/// Encode `frames` as body chunks, one complete record per chunk.
///
/// The next frame is pulled only after the previous chunk was taken, so
/// dropping the stream leaves the rest of `frames` ungenerated.
pub fn frame_records<I>(
    message_id: MessageId,
    frames: I,
    token_delay: Option<Duration>,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static
where
    I: IntoIterator<Item = Frame>,
    I::IntoIter: Send + 'static,
{
    let frames = frames.into_iter();
    async_stream::stream! {
        let mut delivery = Delivery::new(message_id);

        for frame in frames {
            let pause = match &frame {
                Frame::TextDelta { delta, .. } => {
                    trace!(message_id = %delivery.message_id, delta = %delta, "Streaming token");
                    token_delay
                }
                _ => None,
            };

            let record = Bytes::from(frame.encode());
            delivery.sent += 1;
            yield Ok(record);

            if let Some(delay) = pause {
                tokio::time::sleep(delay).await;
            }
        }

        delivery.complete = true;
    }
}

/// Tracks one response body so an early drop can be reported.
struct Delivery {
    message_id: MessageId,
    sent: usize,
    complete: bool,
}

impl Delivery {
    fn new(message_id: MessageId) -> Self {
        Self {
            message_id,
            sent: 0,
            complete: false,
        }
    }
}

impl Drop for Delivery {
    fn drop(&mut self) {
        if self.complete {
            debug!(message_id = %self.message_id, frames = self.sent, "Chat stream finished");
        } else {
            debug!(
                message_id = %self.message_id,
                frames = self.sent,
                "Client disconnected, chat stream dropped"
            );
        }
    }
}
