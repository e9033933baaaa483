use crate::net::protocol::{decode, Inbound, Message};
use crate::world::block_id::BlockId;
use crate::world::storage::{EditOrigin, WorldEvent, WorldStore};
use glam::{IVec3, Vec3};
use log::{debug, error, info, warn};
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// What the status indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Offline,
    Connecting,
    Online,
    Error,
    ServerOffline,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Offline => "Offline",
            ConnectionStatus::Connecting => "Connecting",
            ConnectionStatus::Online => "Online",
            ConnectionStatus::Error => "Error",
            ConnectionStatus::ServerOffline => "Server Offline",
        };
        f.write_str(label)
    }
}

/// Client side of the relay protocol.
///
/// Owns the connection state machine and decides what crosses the wire:
/// local edits go out as `block_update`, inbound `block_update`s are written
/// into the store as remote edits and are never sent back.
pub struct SyncSession {
    state: ConnectionState,
    status: ConnectionStatus,
    outbound: Option<UnboundedSender<Message>>,
    player_count: Option<u32>,
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncSession {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            status: ConnectionStatus::Offline,
            outbound: None,
            player_count: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn player_count(&self) -> Option<u32> {
        self.player_count
    }

    /// Returns false when a connection is already up or in flight.
    pub fn begin_connect(&mut self) -> bool {
        if self.state != ConnectionState::Disconnected {
            return false;
        }
        self.state = ConnectionState::Connecting;
        self.status = ConnectionStatus::Connecting;
        true
    }

    /// The transport is usable. Announces the player once.
    pub fn on_open(&mut self, outbound: UnboundedSender<Message>, position: Vec3) {
        self.state = ConnectionState::Connected;
        self.status = ConnectionStatus::Online;
        self.outbound = Some(outbound);
        info!("Connected to server");
        self.send(Message::PlayerJoin {
            position: position.into(),
        });
    }

    pub fn on_closed(&mut self) {
        self.disconnect(ConnectionStatus::Offline);
        info!("Disconnected from server");
    }

    pub fn on_error(&mut self, reason: &str) {
        self.disconnect(ConnectionStatus::Error);
        warn!("Connection error: {}", reason);
    }

    /// The connection attempt itself failed (refused, timed out).
    pub fn on_connect_failed(&mut self, reason: &str) {
        self.disconnect(ConnectionStatus::ServerOffline);
        warn!("Failed to connect to server: {}", reason);
    }

    fn disconnect(&mut self, status: ConnectionStatus) {
        self.state = ConnectionState::Disconnected;
        self.status = status;
        self.outbound = None;
    }

    /// Sends only while connected; otherwise the message is dropped.
    pub fn send(&mut self, message: Message) -> bool {
        if !self.is_connected() {
            return false;
        }
        let Some(outbound) = &self.outbound else {
            return false;
        };
        if outbound.send(message).is_err() {
            self.on_error("outbound channel closed");
            return false;
        }
        true
    }

    pub fn send_block_update(&mut self, pos: IVec3, block: BlockId) -> bool {
        self.send(Message::block_update(pos, block))
    }

    /// Forwards local edits. Remote edits are ignored here, which is what
    /// keeps a received update from bouncing back to the relay.
    pub fn on_world_event(&mut self, event: &WorldEvent) -> bool {
        match *event {
            WorldEvent::BlockChanged {
                pos,
                block,
                origin: EditOrigin::Local,
                ..
            } => self.send_block_update(pos, block),
            WorldEvent::BlockChanged {
                origin: EditOrigin::Remote,
                ..
            } => false,
        }
    }

    /// Parses and applies one line from the wire. Malformed input is logged
    /// and discarded. Returns true when the world changed.
    pub fn handle_text(&mut self, text: &str, world: &WorldStore) -> bool {
        match decode(text) {
            Ok(Inbound::Message(message)) => self.handle_message(message, world),
            Ok(Inbound::Unrecognized(kind)) => {
                info!("Unknown message type: {}", kind);
                false
            }
            Err(e) => {
                error!("Failed to parse server message: {}", e);
                false
            }
        }
    }

    pub fn handle_message(&mut self, message: Message, world: &WorldStore) -> bool {
        match message {
            Message::BlockUpdate {
                x,
                y,
                z,
                block_type,
            } => {
                let pos = IVec3::new(x, y, z);
                debug!("Remote block update at {} -> {}", pos, block_type);
                world
                    .set_block(pos, block_type, EditOrigin::Remote)
                    .is_some()
            }
            Message::PlayerCount { count } => {
                self.player_count = Some(count);
                false
            }
            Message::PlayerJoin { .. } => {
                debug!("Ignoring player_join from server");
                false
            }
        }
    }
}
