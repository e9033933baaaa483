//! Peer relay. Holds no world state: every well-formed line from one client
//! is forwarded verbatim to all the others, and joins/leaves are announced
//! with `player_count`.

use crate::net::protocol::{decode, encode, Inbound, Message};
use crate::utils::error::NetError;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

#[derive(Debug, Default)]
struct RelayState {
    next_client_id: u64,
    clients: HashMap<u64, UnboundedSender<String>>,
}

type SharedState = Arc<Mutex<RelayState>>;

/// Longest line a client may send, newline excluded. Longer lines get the
/// client dropped.
pub const MAX_LINE_LEN: usize = 64 * 1024;

pub async fn run_relay(listener: TcpListener) -> Result<(), NetError> {
    let state = SharedState::default();
    info!("Relay listening on {}", listener.local_addr()?);

    loop {
        let (stream, addr) = listener.accept().await?;
        let state = state.clone();
        tokio::spawn(async move {
            handle_client(state, stream, addr).await;
        });
    }
}

fn register(state: &SharedState, tx: UnboundedSender<String>) -> u64 {
    let mut guard = state.lock();
    let client_id = guard.next_client_id;
    guard.next_client_id += 1;
    guard.clients.insert(client_id, tx);
    client_id
}

fn unregister(state: &SharedState, client_id: u64) {
    state.lock().clients.remove(&client_id);
}

fn broadcast_except(state: &SharedState, source: Option<u64>, line: &str) {
    let mut stale = Vec::new();
    let mut guard = state.lock();
    for (&client_id, tx) in guard.clients.iter() {
        if Some(client_id) == source {
            continue;
        }
        if tx.send(line.to_string()).is_err() {
            stale.push(client_id);
        }
    }
    for client_id in stale {
        guard.clients.remove(&client_id);
    }
}

fn broadcast_player_count(state: &SharedState) {
    let count = state.lock().clients.len() as u32;
    match encode(&Message::PlayerCount { count }) {
        Ok(line) => broadcast_except(state, None, &line),
        Err(e) => error!("Failed to encode player_count: {}", e),
    }
}

fn relay_line(state: &SharedState, client_id: u64, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match decode(line) {
        Ok(Inbound::Message(message)) => {
            debug!("Client {} sent {}", client_id, message.kind());
            broadcast_except(state, Some(client_id), line);
        }
        Ok(Inbound::Unrecognized(kind)) => {
            debug!("Client {} sent unknown type {:?}, forwarding", client_id, kind);
            broadcast_except(state, Some(client_id), line);
        }
        Err(e) => warn!("Dropping malformed line from client {}: {}", client_id, e),
    }
}

enum LineRead {
    Line,
    TooLong,
    Eof,
}

/// Reads one line into `buf` without the trailing newline. Never buffers
/// more than `MAX_LINE_LEN + 1` bytes.
async fn read_bounded_line(
    reader: &mut BufReader<OwnedReadHalf>,
    buf: &mut Vec<u8>,
) -> std::io::Result<LineRead> {
    buf.clear();
    let limit = MAX_LINE_LEN as u64 + 1;
    let read = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
    if read == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    } else if buf.len() > MAX_LINE_LEN {
        return Ok(LineRead::TooLong);
    }
    Ok(LineRead::Line)
}

async fn handle_client(state: SharedState, stream: TcpStream, addr: SocketAddr) {
    let _ = stream.set_nodelay(true);
    let (reader, mut writer) = stream.into_split();
    let (tx, mut rx) = unbounded_channel::<String>();
    let client_id = register(&state, tx);
    info!("Client {} connected from {}", client_id, addr);
    broadcast_player_count(&state);

    let writer_task = tokio::spawn(async move {
        while let Some(mut line) = rx.recv().await {
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        match read_bounded_line(&mut reader, &mut buf).await {
            Ok(LineRead::Line) => match std::str::from_utf8(&buf) {
                Ok(line) => relay_line(&state, client_id, line),
                Err(_) => warn!("Dropping non-UTF-8 line from client {}", client_id),
            },
            Ok(LineRead::TooLong) => {
                warn!(
                    "Client {} sent a line over {} bytes, disconnecting",
                    client_id, MAX_LINE_LEN
                );
                break;
            }
            Ok(LineRead::Eof) => break,
            Err(e) => {
                warn!("Read error from client {}: {}", client_id, e);
                break;
            }
        }
    }

    unregister(&state, client_id);
    writer_task.abort();
    info!("Client {} disconnected", client_id);
    broadcast_player_count(&state);
}
