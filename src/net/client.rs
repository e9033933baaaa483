//! TCP transport for the client.
//!
//! Runs on the tokio runtime and reports everything back to the game loop
//! as [`NetEvent`]s over a crossbeam channel, so the loop handles network
//! input on the same timeline as console input and world events.

use crate::net::protocol::{encode, Message};
use crate::utils::error::NetError;
use crossbeam_channel::Sender;
use log::{debug, error};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
pub enum NetEvent {
    /// Connection is usable; messages sent here go out on the wire.
    Opened(UnboundedSender<Message>),
    Line(String),
    Closed,
    Error(String),
    ConnectFailed(String),
}

#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub addr: String,
    pub delay: Duration,
    pub timeout: Option<Duration>,
}

/// One connection attempt, no retry. Returns once the connection is gone.
///
/// Each attempt reports at most one terminal event (`ConnectFailed`,
/// `Closed` or `Error`), and nothing after it, so a later attempt never
/// sees leftovers from this one.
pub async fn run_connection(options: ConnectOptions, events: Sender<NetEvent>) {
    if !options.delay.is_zero() {
        tokio::time::sleep(options.delay).await;
    }

    let stream = match connect(&options.addr, options.timeout).await {
        Ok(stream) => stream,
        Err(e) => {
            let _ = events.send(NetEvent::ConnectFailed(e.to_string()));
            return;
        }
    };
    let _ = stream.set_nodelay(true);
    debug!("TCP connection to {} established", options.addr);

    let (reader, writer) = stream.into_split();
    let (outbound_tx, outbound_rx) = unbounded_channel();
    if events.send(NetEvent::Opened(outbound_tx)).is_err() {
        return;
    }

    // Whichever half finishes first ends the attempt; the other is dropped.
    let terminal = tokio::select! {
        ended = read_loop(reader, &events) => ended,
        written = write_loop(writer, outbound_rx) => match written {
            Ok(()) => None,
            Err(e) => Some(NetEvent::Error(format!("write failed: {e}"))),
        },
    };
    if let Some(event) = terminal {
        let _ = events.send(event);
    }
}

async fn connect(addr: &str, timeout: Option<Duration>) -> Result<TcpStream, NetError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, TcpStream::connect(addr))
            .await
            .map_err(|_| NetError::Timeout(addr.to_string()))?
            .map_err(NetError::from),
        None => Ok(TcpStream::connect(addr).await?),
    }
}

/// Ends with `Ok` when the session drops its sender, which it only does
/// after it has already disconnected.
async fn write_loop(
    mut writer: OwnedWriteHalf,
    mut outbound: UnboundedReceiver<Message>,
) -> std::io::Result<()> {
    while let Some(message) = outbound.recv().await {
        let mut line = match encode(&message) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to encode {} message: {}", message.kind(), e);
                continue;
            }
        };
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
    }
    let _ = writer.shutdown().await;
    Ok(())
}

/// Forwards lines until the peer goes away. Returns the terminal event, or
/// `None` when nobody is listening anymore.
async fn read_loop(reader: OwnedReadHalf, events: &Sender<NetEvent>) -> Option<NetEvent> {
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                if events.send(NetEvent::Line(line)).is_err() {
                    return None;
                }
            }
            Ok(None) => return Some(NetEvent::Closed),
            Err(e) => return Some(NetEvent::Error(format!("read failed: {e}"))),
        }
    }
}
