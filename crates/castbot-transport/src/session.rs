//! Chat session — connect, listen, send, and the close handshake.

use std::sync::Arc;
use std::time::Duration;

use castbot_protocol::Message;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{ChatConfig, REQUEST_ORIGIN};
use crate::dialer::{Dialer, Transport, WsDialer};
use crate::error::ChatError;
use crate::processor::MessageProcessor;
use crate::reader::ReadLoop;
use crate::writer::{Outbound, WriteLoop};

/// Lifecycle of a session.
///
/// `Connecting → Open` on a successful dial, `Open → Closing` on a local
/// close or a close frame from the peer, `Closing → Closed` once the read
/// loop stops. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// A live websocket session with the chat server.
pub struct ChatService {
    /// Shared with the read loop, which fires `Closed` exactly once.
    state: Arc<watch::Sender<SessionState>>,
    /// Posts work to the write loop
    outbound: mpsc::UnboundedSender<Outbound>,
    /// Read and write loops, until `listen` spawns them
    loops: Option<(BoxFuture<'static, ()>, BoxFuture<'static, ()>)>,
    /// Spawned loop tasks
    handles: Vec<JoinHandle<()>>,
}

impl ChatService {
    /// Validate `config` and dial the chat server.
    pub async fn connect<P: MessageProcessor>(config: ChatConfig<P>) -> Result<Self, ChatError> {
        Self::connect_with(config, &WsDialer).await
    }

    /// Like [`ChatService::connect`], dialing through `dialer`.
    ///
    /// The dialer is never called when the configuration is invalid.
    pub async fn connect_with<P, D>(config: ChatConfig<P>, dialer: &D) -> Result<Self, ChatError>
    where
        P: MessageProcessor,
        D: Dialer,
    {
        let (url, processor) = config.into_parts()?;

        debug!("connecting to {url}");
        let transport = dialer
            .dial(&url, REQUEST_ORIGIN)
            .await
            .map_err(|source| ChatError::Dial {
                url: url.to_string(),
                source,
            })?;

        info!("connected to {url}");
        Ok(Self::from_transport(transport, processor))
    }

    fn from_transport<T, P>(transport: T, processor: Arc<P>) -> Self
    where
        T: Transport,
        P: MessageProcessor,
    {
        let (sink, stream) = transport.split();
        let (state_tx, state_rx) = watch::channel(SessionState::Open);
        let state = Arc::new(state_tx);

        let (keepalive_tx, keepalive_rx) = mpsc::unbounded_channel();
        let (content_tx, content_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let reader = ReadLoop {
            stream,
            keepalive: keepalive_tx,
            content: content_tx,
            state: state.clone(),
        };
        let writer = WriteLoop {
            sink,
            processor,
            keepalive: keepalive_rx,
            content: content_rx,
            outbound: outbound_rx,
            replies: outbound_tx.clone(),
            state: state_rx,
        };

        Self {
            state,
            outbound: outbound_tx,
            loops: Some((reader.run().boxed(), writer.run().boxed())),
            handles: Vec::new(),
        }
    }

    /// Start the read and write loops. Calling it twice is a no-op.
    pub fn listen(&mut self) {
        let Some((reader, writer)) = self.loops.take() else {
            warn!("ChatService::listen called more than once");
            return;
        };
        self.handles.push(tokio::spawn(reader));
        self.handles.push(tokio::spawn(writer));
    }

    pub fn is_listening(&self) -> bool {
        !self.handles.is_empty()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Wait until the read side has terminated.
    pub async fn closed(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|s| *s == SessionState::Closed).await;
    }

    /// Queue a message for the write loop.
    ///
    /// Write failures are logged by the write loop; this only fails once the
    /// session is closed.
    pub fn send(&self, message: Message) -> Result<(), ChatError> {
        if self.state() == SessionState::Closed {
            return Err(ChatError::Closed);
        }
        self.outbound
            .send(Outbound::Message(message))
            .map_err(|_| ChatError::Closed)
    }

    /// Send a normal-closure frame and wait up to `deadline` for the server
    /// to close the connection.
    ///
    /// On timeout the session is left as is; dropping the service tears it
    /// down.
    pub async fn close(&self, deadline: Duration) -> Result<(), ChatError> {
        if self.state() == SessionState::Closed {
            return Err(ChatError::Closed);
        }

        let (ack_tx, ack_rx) = oneshot::channel();
        self.outbound
            .send(Outbound::Close(ack_tx))
            .map_err(|_| ChatError::Closed)?;

        let handshake = async {
            ack_rx.await.map_err(|_| ChatError::Closed)??;
            mark_closing(&self.state);
            self.closed().await;
            Ok::<(), ChatError>(())
        };

        match tokio::time::timeout(deadline, handshake).await {
            Ok(result) => result,
            Err(_) => Err(ChatError::CloseTimeout),
        }
    }
}

/// `Open → Closing`; a no-op in any other state.
pub(crate) fn mark_closing(state: &watch::Sender<SessionState>) {
    state.send_if_modified(|s| {
        if *s == SessionState::Open {
            *s = SessionState::Closing;
            true
        } else {
            false
        }
    });
}

impl Drop for ChatService {
    /// Abort the loop tasks. The socket is dropped with the write loop.
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("state", &self.state())
            .field("listening", &self.is_listening())
            .finish()
    }
}
