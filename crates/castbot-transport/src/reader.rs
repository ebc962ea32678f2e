//! Read loop — decodes inbound frames and routes them by message kind.

use std::sync::Arc;

use castbot_protocol::{Message, Route};
use futures_util::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tracing::{debug, error, warn};

use crate::session::{SessionState, mark_closing};

/// Why the read side stopped.
enum Termination {
    EndOfStream,
    Transport(WsError),
    Decode(castbot_protocol::DecodeError),
}

pub(crate) struct ReadLoop<S> {
    pub(crate) stream: S,
    pub(crate) keepalive: mpsc::UnboundedSender<Message>,
    pub(crate) content: mpsc::UnboundedSender<Message>,
    pub(crate) state: Arc<watch::Sender<SessionState>>,
}

impl<S> ReadLoop<S>
where
    S: Stream<Item = Result<WsMessage, WsError>> + Unpin,
{
    pub(crate) async fn run(mut self) {
        // Close frame received from the peer, if any. `Some(None)` is a
        // close frame without a status code.
        let mut peer_close: Option<Option<CloseFrame>> = None;

        let termination = loop {
            let decoded = match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => Message::decode(text.as_bytes()),
                Some(Ok(WsMessage::Binary(data))) => Message::decode(&data),
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!("close frame received: {frame:?}");
                    mark_closing(&self.state);
                    peer_close = Some(frame);
                    // Keep polling so the close handshake can complete.
                    continue;
                }
                Some(Ok(_)) => continue,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    break Termination::EndOfStream;
                }
                Some(Err(e)) => break Termination::Transport(e),
            };

            match decoded {
                Ok(message) => self.route(message),
                Err(e) => break Termination::Decode(e),
            }
        };

        let normal = matches!(
            &peer_close,
            Some(Some(frame)) if frame.code == CloseCode::Normal
        );
        if !normal {
            report(termination, peer_close);
        }

        self.state.send_replace(SessionState::Closed);
        debug!("read loop finished");
    }

    fn route(&self, message: Message) {
        debug!("Received {} request", message.kind);

        let queue = match message.kind.route() {
            Route::Keepalive => &self.keepalive,
            Route::Content => &self.content,
            Route::Discard => return,
            Route::Unrecognized => {
                warn!("unknown message type received: {message}");
                return;
            }
        };

        if queue.send(message).is_err() {
            debug!("write loop is gone, dropping inbound message");
        }
    }
}

fn report(termination: Termination, peer_close: Option<Option<CloseFrame>>) {
    match (termination, peer_close) {
        (Termination::Decode(e), _) => {
            error!(body = %e.body, "type" = %e.kind, "{e}");
        }
        (Termination::Transport(e), _) => {
            error!("websocket read failed: {e}");
        }
        (Termination::EndOfStream, Some(Some(frame))) => {
            error!(
                code = u16::from(frame.code),
                reason = frame.reason.as_str(),
                "websocket closed abnormally"
            );
        }
        (Termination::EndOfStream, Some(None)) => {
            error!("websocket closed without a status code");
        }
        (Termination::EndOfStream, None) => {
            error!("websocket stream ended without a close frame");
        }
    }
}
