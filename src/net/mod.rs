pub mod client;
pub mod protocol;
pub mod relay;
pub mod session;

pub use client::{run_connection, ConnectOptions, NetEvent};
pub use protocol::{decode, encode, Inbound, Message, Position, ProtocolError};
pub use relay::run_relay;
pub use session::{ConnectionState, ConnectionStatus, SyncSession};
