//! Write loop — the single owner of the outbound half of the socket.
//!
//! Keepalive answers, processor replies, caller sends, and the close frame
//! all reach the socket through this task, so writes never interleave.

use std::sync::Arc;

use castbot_protocol::Message;
use futures_util::{Sink, SinkExt};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tracing::{debug, error};

use crate::processor::MessageProcessor;
use crate::session::SessionState;

/// Work posted to the write loop by other tasks.
#[derive(Debug)]
pub(crate) enum Outbound {
    /// Serialize and send a message.
    Message(Message),
    /// Send a normal-closure frame and report the write result.
    Close(oneshot::Sender<Result<(), WsError>>),
}

pub(crate) struct WriteLoop<K, P> {
    pub(crate) sink: K,
    pub(crate) processor: Arc<P>,
    pub(crate) keepalive: mpsc::UnboundedReceiver<Message>,
    pub(crate) content: mpsc::UnboundedReceiver<Message>,
    pub(crate) outbound: mpsc::UnboundedReceiver<Outbound>,
    /// Handed to each processing task so replies come back here.
    pub(crate) replies: mpsc::UnboundedSender<Outbound>,
    pub(crate) state: watch::Receiver<SessionState>,
}

impl<K, P> WriteLoop<K, P>
where
    K: Sink<WsMessage, Error = WsError> + Unpin,
    P: MessageProcessor,
{
    pub(crate) async fn run(self) {
        let Self {
            mut sink,
            processor,
            mut keepalive,
            mut content,
            mut outbound,
            replies,
            mut state,
        } = self;

        loop {
            tokio::select! {
                // Replies and caller sends go ahead of new chat work so a
                // busy chat cannot starve them.
                biased;

                _ = async { let _ = state.wait_for(|s| *s == SessionState::Closed).await; } => {
                    debug!("write loop finished");
                    return;
                }

                Some(_ping) = keepalive.recv() => {
                    send_message(&mut sink, Message::pong()).await;
                }

                Some(out) = outbound.recv() => match out {
                    Outbound::Message(message) => send_message(&mut sink, message).await,
                    Outbound::Close(ack) => {
                        let frame = CloseFrame {
                            code: CloseCode::Normal,
                            reason: "".into(),
                        };
                        let _ = ack.send(sink.send(WsMessage::Close(Some(frame))).await);
                    }
                },

                Some(input) = content.recv() => {
                    dispatch(&processor, &replies, input);
                }

                else => return,
            }
        }
    }
}

/// Process one chat message on its own task. Replies may come back in any
/// order relative to other chat messages.
fn dispatch<P: MessageProcessor>(
    processor: &Arc<P>,
    replies: &mpsc::UnboundedSender<Outbound>,
    input: Message,
) {
    let processor = processor.clone();
    let replies = replies.clone();
    tokio::spawn(async move {
        if let Some(reply) = processor.process(input).await {
            if replies.send(Outbound::Message(reply)).is_err() {
                debug!("session closed before reply could be sent");
            }
        }
    });
}

async fn send_message<K>(sink: &mut K, message: Message)
where
    K: Sink<WsMessage, Error = WsError> + Unpin,
{
    let result = match message.encode() {
        Ok(json) => sink.send(WsMessage::Text(json.into())).await,
        Err(e) => {
            error!(
                author = message.author_str(),
                body = message.body_str(),
                "type" = %message.kind,
                "failed to encode message: {e}"
            );
            return;
        }
    };

    if let Err(e) = result {
        error!(
            author = message.author_str(),
            body = message.body_str(),
            "type" = %message.kind,
            "{e}"
        );
    }
}
