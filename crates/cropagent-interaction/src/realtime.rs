//! Real-time channel over a websocket.
//!
//! The client publishes analysis requests as JSON text frames; the server
//! answers each one with the full pipeline result. Inbound results are
//! handed to the caller through an mpsc receiver so the session can feed
//! them to the coordinator as push updates.

use cropagent_core::error::{CropAgentError, Result};
use cropagent_core::report::{AnalysisRequest, AnalysisResponse};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Inbound side of the channel: one item per server frame.
pub type RealtimeReceiver = mpsc::UnboundedReceiver<Result<AnalysisResponse>>;

/// Handle to an open websocket connection.
///
/// Dropping the handle closes the connection.
pub struct RealtimeChannel {
    outbound: mpsc::UnboundedSender<AnalysisRequest>,
    task: JoinHandle<()>,
}

impl RealtimeChannel {
    /// Connects to `url` (e.g. `ws://localhost:8000/ws`).
    ///
    /// # Returns
    ///
    /// The channel handle and the receiver of inbound results. The receiver
    /// yields an `Err(Realtime)` once when the connection drops, then ends.
    pub async fn connect(url: &str) -> Result<(Self, RealtimeReceiver)> {
        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| CropAgentError::realtime(format!("connect to {} failed: {}", url, e)))?;
        tracing::info!("[RealtimeChannel] Connected to {}", url);

        let (mut sink, mut stream) = ws.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<AnalysisRequest>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    request = outbound_rx.recv() => {
                        let Some(request) = request else {
                            let _ = sink.close().await;
                            break;
                        };
                        let frame = match serde_json::to_string(&request) {
                            Ok(text) => Message::Text(text),
                            Err(e) => {
                                let _ = inbound_tx.send(Err(e.into()));
                                continue;
                            }
                        };
                        if let Err(e) = sink.send(frame).await {
                            let _ = inbound_tx.send(Err(CropAgentError::realtime(format!("send failed: {}", e))));
                            break;
                        }
                    }
                    frame = stream.next() => {
                        match frame {
                            Some(Ok(message)) => {
                                if let Some(item) = decode_frame(message)
                                    && inbound_tx.send(item).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(e)) => {
                                let _ = inbound_tx.send(Err(CropAgentError::realtime(format!("receive failed: {}", e))));
                                break;
                            }
                            None => {
                                let _ = inbound_tx.send(Err(CropAgentError::realtime("connection closed")));
                                break;
                            }
                        }
                    }
                }
            }
            tracing::debug!("[RealtimeChannel] Connection task finished");
        });

        Ok((Self { outbound, task }, inbound_rx))
    }

    /// Queues a request for the server.
    ///
    /// # Errors
    ///
    /// Returns a `Realtime` error if the connection is already closed.
    pub fn publish(&self, request: AnalysisRequest) -> Result<()> {
        self.outbound
            .send(request)
            .map_err(|_| CropAgentError::realtime("channel is closed"))
    }

    pub fn is_open(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for RealtimeChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Decodes one server frame. Control frames yield nothing; a close frame is
/// followed by the end of the stream, which reports the disconnect.
fn decode_frame(message: Message) -> Option<Result<AnalysisResponse>> {
    let text = match message {
        Message::Text(text) => text,
        Message::Binary(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => return Some(Err(CropAgentError::Decode(e.to_string()))),
        },
        _ => return None,
    };
    Some(serde_json::from_str(&text).map_err(CropAgentError::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_frame() {
        let frame = Message::Text(
            r#"{"success": true, "state": "Punjab", "crop": "Wheat",
                "response": {"summary": {"text": "Good season"}}, "metadata": {}}"#
                .to_string(),
        );
        let response = decode_frame(frame).unwrap().unwrap();
        assert_eq!(response.state.as_deref(), Some("Punjab"));
        assert_eq!(response.response.summary_text(), Some("Good season"));
    }

    #[test]
    fn test_control_frames_are_skipped() {
        assert!(decode_frame(Message::Ping(vec![1])).is_none());
        assert!(decode_frame(Message::Pong(vec![])).is_none());
        assert!(decode_frame(Message::Close(None)).is_none());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = decode_frame(Message::Text("not json".into())).unwrap().unwrap_err();
        assert!(matches!(err, CropAgentError::Decode(_)));
    }
}
