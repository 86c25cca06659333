//! Persistent WebSocket channel.
//!
//! The connection is opened when the dispatcher initializes and watched by
//! a supervisor task. Every unexpected close schedules exactly one
//! reconnect attempt after a fixed delay; a failed attempt schedules the
//! next one the same way, forever, until [`AlertChannel::close`] is called.
//!
//! Sends never wait for a connection: while disconnected they are skipped.
//! A send that cannot finish within the send timeout drops the connection
//! and the supervisor reconnects as if the server had closed it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::port::{AlertChannel, DeliveryOutcome};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsReader = SplitStream<WsStream>;

pub struct StreamChannel {
    url: String,
    reconnect_delay: Duration,
    send_timeout: Duration,
    sink: Arc<Mutex<Option<WsSink>>>,
    attempts: Arc<AtomicU64>,
    reset: Arc<Notify>,
    shutdown: watch::Sender<bool>,
    supervisor: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl StreamChannel {
    #[allow(clippy::result_large_err)]
    pub fn new(url: &str, reconnect_delay: Duration, send_timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(url)?;
        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(Error::Startup(format!(
                "stream url must use ws or wss, got '{}'",
                parsed.scheme()
            )));
        }

        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            url: url.to_string(),
            reconnect_delay,
            send_timeout,
            sink: Arc::new(Mutex::new(None)),
            attempts: Arc::new(AtomicU64::new(0)),
            reset: Arc::new(Notify::new()),
            shutdown,
            supervisor: parking_lot::Mutex::new(None),
        })
    }

    /// Number of connection attempts made so far, including the first.
    pub fn connect_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub async fn is_connected(&self) -> bool {
        self.sink.lock().await.is_some()
    }
}

#[async_trait]
impl AlertChannel for StreamChannel {
    fn name(&self) -> &'static str {
        "stream"
    }

    async fn open(&self) -> Result<()> {
        if self.supervisor.lock().is_some() {
            return Ok(());
        }

        let reader = connect_once(&self.url, &self.sink, &self.attempts).await;

        let supervisor = Supervisor {
            url: self.url.clone(),
            delay: self.reconnect_delay,
            sink: Arc::clone(&self.sink),
            attempts: Arc::clone(&self.attempts),
            reset: Arc::clone(&self.reset),
            shutdown: self.shutdown.subscribe(),
        };
        let handle = tokio::spawn(supervisor.run(reader));
        *self.supervisor.lock() = Some(handle);
        Ok(())
    }

    async fn send(&self, body: &str) -> DeliveryOutcome {
        let mut guard = self.sink.lock().await;
        let Some(sink) = guard.as_mut() else {
            return DeliveryOutcome::Skipped("not connected".into());
        };

        let sent = tokio::time::timeout(
            self.send_timeout,
            sink.send(Message::Text(body.to_owned())),
        )
        .await;

        match sent {
            Ok(Ok(())) => DeliveryOutcome::Delivered,
            Ok(Err(e)) => DeliveryOutcome::Failed(e.to_string()),
            Err(_) => {
                let timeout_ms = self.send_timeout.as_millis() as u64;
                warn!(timeout_ms, "Stream send stalled, dropping connection");
                guard.take();
                self.reset.notify_waiters();
                DeliveryOutcome::Failed(format!("send timed out after {timeout_ms}ms"))
            }
        }
    }

    async fn close(&self) {
        let _ = self.shutdown.send(true);

        if let Some(mut sink) = self.sink.lock().await.take() {
            if let Err(e) = sink.close().await {
                debug!(error = %e, "Error closing stream connection");
            }
        }

        let handle = self.supervisor.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Stream supervisor ended abnormally");
            }
        }
        info!(url = %self.url, "Stream channel closed");
    }
}

/// Owns the read half and re-arms one reconnect per close.
struct Supervisor {
    url: String,
    delay: Duration,
    sink: Arc<Mutex<Option<WsSink>>>,
    attempts: Arc<AtomicU64>,
    reset: Arc<Notify>,
    shutdown: watch::Receiver<bool>,
}

impl Supervisor {
    async fn run(mut self, mut reader: Option<WsReader>) {
        loop {
            if let Some(r) = reader.take() {
                self.watch_until_closed(r).await;
                self.sink.lock().await.take();
            }

            if self.stopping() {
                break;
            }

            info!(
                delay_ms = self.delay.as_millis() as u64,
                "Stream disconnected, scheduling reconnect"
            );
            tokio::select! {
                _ = tokio::time::sleep(self.delay) => {}
                _ = self.shutdown.changed() => {}
            }
            if self.stopping() {
                break;
            }

            reader = connect_once(&self.url, &self.sink, &self.attempts).await;
        }
        debug!("Stream supervisor stopped");
    }

    fn stopping(&self) -> bool {
        *self.shutdown.borrow() || self.shutdown.has_changed().is_err()
    }

    async fn watch_until_closed(&mut self, mut reader: WsReader) {
        let reset = Arc::clone(&self.reset);
        let dropped = reset.notified();
        tokio::pin!(dropped);

        loop {
            tokio::select! {
                msg = reader.next() => match msg {
                    Some(Ok(Message::Close(frame))) => {
                        info!(frame = ?frame, "Stream closed by server");
                        return;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Stream error");
                        return;
                    }
                    None => {
                        info!("Stream ended");
                        return;
                    }
                },
                _ = &mut dropped => {
                    info!("Stream dropped after a stalled send");
                    return;
                }
                _ = self.shutdown.changed() => return,
            }
        }
    }
}

async fn connect_once(
    url: &str,
    sink: &Mutex<Option<WsSink>>,
    attempts: &AtomicU64,
) -> Option<WsReader> {
    let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
    match connect_async(url).await {
        Ok((ws, response)) => {
            info!(url = %url, attempt, status = %response.status(), "Stream connected");
            let (writer, reader) = ws.split();
            *sink.lock().await = Some(writer);
            Some(reader)
        }
        Err(e) => {
            warn!(url = %url, attempt, error = %e, "Stream connection failed");
            None
        }
    }
}
