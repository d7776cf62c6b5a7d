//! Result broadcast stream
//!
//! Delivers classification results to any open popup over SSE, so the
//! popup that did not originate a request can still render its outcome.
//! Fire-and-forget: subscribers that lag simply drop events.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use serde::Serialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::logic::classifier::ClassifierResponse;
use crate::models::Scan;
use crate::AppState;

/// Payload of one `ml_result` event: the raw classifier response, the
/// original message, the normalized scan and its dashboard deep link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    pub result: ClassifierResponse,
    pub message: String,
    pub scan: Scan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

pub async fn subscribe(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.events.subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(|msg| match msg {
        Ok(event) => match Event::default().event("ml_result").json_data(&event) {
            Ok(sse_event) => Some(Ok::<_, Infallible>(sse_event)),
            Err(e) => {
                tracing::warn!("failed to serialize result event: {}", e);
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!("result subscriber lagged, dropped {} events", skipped);
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
