//! Dialing and the transport seam.
//!
//! A session only needs a sink and a stream of websocket frames. Production
//! code dials with tokio-tungstenite; anything else that can hand over the
//! two halves (an in-memory pipe, for instance) can stand in for it.

use std::future::Future;

use futures_util::{Sink, Stream, StreamExt};
use futures_util::stream::{SplitSink, SplitStream};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;
use url::Url;

/// A full-duplex frame transport that can be split into its two halves.
pub trait Transport: Send + 'static {
    type Sink: Sink<WsMessage, Error = WsError> + Send + Unpin + 'static;
    type Stream: Stream<Item = Result<WsMessage, WsError>> + Send + Unpin + 'static;

    fn split(self) -> (Self::Sink, Self::Stream);
}

impl<S> Transport for WebSocketStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    type Sink = SplitSink<WebSocketStream<S>, WsMessage>;
    type Stream = SplitStream<WebSocketStream<S>>;

    fn split(self) -> (Self::Sink, Self::Stream) {
        StreamExt::split(self)
    }
}

/// Opens a transport to a validated URL.
pub trait Dialer: Send + Sync {
    type Transport: Transport;

    fn dial(
        &self,
        url: &Url,
        origin: &'static str,
    ) -> impl Future<Output = Result<Self::Transport, WsError>> + Send;
}

/// Dials real websocket endpoints (`ws` and `wss`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WsDialer;

impl Dialer for WsDialer {
    type Transport = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn dial(&self, url: &Url, origin: &'static str) -> Result<Self::Transport, WsError> {
        let mut request = url.as_str().into_client_request()?;
        request
            .headers_mut()
            .insert(ORIGIN, HeaderValue::from_static(origin));

        let (ws, response) = tokio_tungstenite::connect_async(request).await?;
        debug!("websocket handshake complete ({})", response.status());
        Ok(ws)
    }
}
