//! WebSocket transport for the client.
//!
//! Provides [`ConnectedClient`] which handles socket I/O for a room. A
//! spawned task performs the handshake, then owns the socket and bridges it
//! to two channels: outbound text in, [`TransportEvent`]s out.
//!
//! # Event order
//!
//! The first event of a successful handshake is always
//! [`TransportEvent::Open`]. The last event is always
//! [`TransportEvent::Close`], preceded by [`TransportEvent::Error`] when the
//! handshake or the socket failed.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use partyline_proto::{Endpoint, Frame, TransportEvent};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest, handshake::client::Request},
};

use crate::TransportError;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Upper bound on the WebSocket handshake.
    pub connect_timeout: Duration,
    /// Capacity of the inbound and outbound channels.
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { connect_timeout: Duration::from_secs(10), channel_capacity: 256 }
    }
}

/// Handle to a room socket.
///
/// Provides channels for text transport. Text is sent/received via the
/// channels, and an internal task handles the handshake and socket I/O.
/// Dropping the handle closes the socket with a normal close frame.
pub struct ConnectedClient {
    /// Send text to the room.
    pub to_server: mpsc::Sender<String>,
    /// Receive socket lifecycle events and frames.
    pub from_server: mpsc::Receiver<TransportEvent>,
    /// The socket task.
    task: tokio::task::JoinHandle<()>,
}

impl ConnectedClient {
    /// Queue text for the room, verbatim.
    ///
    /// # Errors
    ///
    /// - [`TransportError::ChannelClosed`] if the socket task has exited.
    pub async fn send(&self, text: impl Into<String>) -> Result<(), TransportError> {
        self.to_server.send(text.into()).await.map_err(|_| TransportError::ChannelClosed)
    }

    /// Close the socket with a normal close frame.
    ///
    /// Waits up to `grace` for the close frame to be flushed, then aborts the
    /// socket task.
    pub async fn close(self, grace: Duration) {
        let Self { to_server, from_server, mut task } = self;
        drop(to_server);
        drop(from_server);

        if tokio::time::timeout(grace, &mut task).await.is_err() {
            tracing::debug!("socket task did not finish in {grace:?}, aborting");
            task.abort();
        }
    }
}

/// Start connecting to the room at `endpoint`.
///
/// Returns at once with a [`ConnectedClient`]. The handshake runs in the
/// socket task, which reports [`TransportEvent::Open`] on success. A failed
/// or timed out handshake is reported as [`TransportEvent::Error`] followed
/// by [`TransportEvent::Close`].
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// - [`TransportError::InvalidEndpoint`] if the endpoint URL is malformed.
pub fn connect(
    endpoint: &Endpoint,
    config: &TransportConfig,
) -> Result<ConnectedClient, TransportError> {
    let url = endpoint.url();
    let request = url
        .as_str()
        .into_client_request()
        .map_err(|e| TransportError::InvalidEndpoint { url: url.clone(), reason: e.to_string() })?;

    let capacity = config.channel_capacity.max(1);
    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(capacity);
    let (from_server_tx, from_server_rx) = mpsc::channel::<TransportEvent>(capacity);

    tracing::debug!(%url, "opening socket");
    let task = tokio::spawn(run_connection(
        request,
        config.connect_timeout,
        to_server_rx,
        from_server_tx,
    ));

    Ok(ConnectedClient { to_server: to_server_tx, from_server: from_server_rx, task })
}

/// Perform the WebSocket handshake within `connect_timeout`.
async fn handshake(request: Request, connect_timeout: Duration) -> Result<Socket, TransportError> {
    let (socket, _response) = tokio::time::timeout(connect_timeout, connect_async(request))
        .await
        .map_err(|_| TransportError::Timeout(connect_timeout))?
        .map_err(|e| TransportError::Connection(e.to_string()))?;
    Ok(socket)
}

/// Run the connection: handshake, then bridge between channels and socket.
async fn run_connection(
    request: Request,
    connect_timeout: Duration,
    to_server: mpsc::Receiver<String>,
    from_server: mpsc::Sender<TransportEvent>,
) {
    match handshake(request, connect_timeout).await {
        Ok(socket) => {
            if from_server.send(TransportEvent::Open).await.is_ok() {
                pump(socket, to_server, &from_server).await;
            }
        },
        Err(e) => {
            tracing::warn!("connect failed: {e}");
            let _ = from_server.send(TransportEvent::Error { message: e.to_string() }).await;
        },
    }

    let _ = from_server.send(TransportEvent::Close).await;
}

/// Move text and frames until either side closes.
///
/// Always ends by closing the sink, which also flushes the reply to a close
/// frame sent by the server.
async fn pump(
    socket: Socket,
    mut to_server: mpsc::Receiver<String>,
    from_server: &mpsc::Sender<TransportEvent>,
) {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outgoing = to_server.recv() => match outgoing {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        tracing::warn!("socket send failed: {e}");
                        let error = TransportEvent::Error { message: e.to_string() };
                        let _ = from_server.send(error).await;
                        break;
                    }
                },
                None => break,
            },
            incoming = stream.next() => {
                let event = match incoming {
                    Some(Ok(Message::Text(text))) => TransportEvent::Message(Frame::new(text)),
                    Some(Ok(Message::Binary(bytes))) => {
                        TransportEvent::Message(Frame::new(String::from_utf8_lossy(&bytes)))
                    },
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!(?frame, "server closed socket");
                        break;
                    },
                    Some(Err(e)) => {
                        tracing::warn!("socket error: {e}");
                        let error = TransportEvent::Error { message: e.to_string() };
                        let _ = from_server.send(error).await;
                        break;
                    },
                    None => break,
                };

                if from_server.send(event).await.is_err() {
                    break;
                }
            },
        }
    }

    if let Err(e) = sink.close().await {
        tracing::debug!("socket close: {e}");
    }
}
