use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Numeric material id stored in every chunk cell and sent on the wire as
/// `block_type`. Ids outside the registry are carried as-is and described
/// as Air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
    pub const GRASS: BlockId = BlockId(1);
    pub const DIRT: BlockId = BlockId(2);
    pub const STONE: BlockId = BlockId(3);
    pub const WATER: BlockId = BlockId(4);

    pub fn get_id(&self) -> u16 {
        self.0
    }

    pub fn is_air(&self) -> bool {
        *self == Self::AIR
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::AIR
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for BlockId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl From<BlockId> for u16 {
    fn from(id: BlockId) -> u16 {
        id.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockIdError {
    #[error("Invalid block id: {0}")]
    InvalidIdFormat(String),
}

/// Accepts either the numeric id or a registered name (case-insensitive).
impl FromStr for BlockId {
    type Err = BlockIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(raw) = s.parse::<u16>() {
            return Ok(Self(raw));
        }
        crate::world::blocks_data::by_name(s)
            .map(|def| def.id)
            .ok_or_else(|| BlockIdError::InvalidIdFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_names() {
        assert_eq!("3".parse::<BlockId>().unwrap(), BlockId::STONE);
        assert_eq!("grass".parse::<BlockId>().unwrap(), BlockId::GRASS);
        assert_eq!("Water".parse::<BlockId>().unwrap(), BlockId::WATER);
        assert!("obsidian".parse::<BlockId>().is_err());
    }

    #[test]
    fn serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&BlockId::DIRT).unwrap(), "2");
        let id: BlockId = serde_json::from_str("42").unwrap();
        assert_eq!(id, BlockId(42));
    }
}
