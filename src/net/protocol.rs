//! Wire format: one JSON object per line, discriminated by `type`.
//!
//! There is no version field. Unknown `type`s are surfaced as
//! [`Inbound::Unrecognized`] instead of failing the decode.

use crate::world::block_id::BlockId;
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Message has no string `type` field")]
    MissingType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Position> for Vec3 {
    fn from(p: Position) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    PlayerJoin {
        position: Position,
    },
    BlockUpdate {
        x: i32,
        y: i32,
        z: i32,
        block_type: BlockId,
    },
    PlayerCount {
        #[serde(default)]
        count: u32,
    },
}

impl Message {
    pub fn block_update(pos: IVec3, block: BlockId) -> Self {
        Message::BlockUpdate {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            block_type: block,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::PlayerJoin { .. } => "player_join",
            Message::BlockUpdate { .. } => "block_update",
            Message::PlayerCount { .. } => "player_count",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Message(Message),
    Unrecognized(String),
}

const KNOWN_TYPES: [&str; 3] = ["player_join", "block_update", "player_count"];

pub fn encode(message: &Message) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

pub fn decode(text: &str) -> Result<Inbound, ProtocolError> {
    let value: Value = serde_json::from_str(text.trim())?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?;

    if !KNOWN_TYPES.contains(&kind) {
        return Ok(Inbound::Unrecognized(kind.to_string()));
    }
    Ok(Inbound::Message(serde_json::from_value(value)?))
}
