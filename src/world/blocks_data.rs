// blocks_data.rs - Block definitions for the sandbox

use crate::world::block_id::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDefinition {
    pub id: BlockId,
    /// 0xRRGGBB display colour.
    pub color: u32,
    pub name: &'static str,
    pub solid: bool,
}

impl BlockDefinition {
    pub fn rgb(&self) -> [u8; 3] {
        [
            ((self.color >> 16) & 0xFF) as u8,
            ((self.color >> 8) & 0xFF) as u8,
            (self.color & 0xFF) as u8,
        ]
    }
}

pub const BLOCKS: [BlockDefinition; 5] = [
    BlockDefinition {
        id: BlockId::AIR,
        color: 0x000000,
        name: "Air",
        solid: false,
    },
    BlockDefinition {
        id: BlockId::GRASS,
        color: 0x4CAF50,
        name: "Grass",
        solid: true,
    },
    BlockDefinition {
        id: BlockId::DIRT,
        color: 0x8D6E63,
        name: "Dirt",
        solid: true,
    },
    BlockDefinition {
        id: BlockId::STONE,
        color: 0x9E9E9E,
        name: "Stone",
        solid: true,
    },
    BlockDefinition {
        id: BlockId::WATER,
        color: 0x2196F3,
        name: "Water",
        solid: false,
    },
];

/// Registry lookup. Anything unregistered is described as Air.
pub fn describe(id: BlockId) -> &'static BlockDefinition {
    BLOCKS
        .iter()
        .find(|def| def.id == id)
        .unwrap_or(&BLOCKS[0])
}

pub fn is_registered(id: BlockId) -> bool {
    BLOCKS.iter().any(|def| def.id == id)
}

pub fn by_name(name: &str) -> Option<&'static BlockDefinition> {
    BLOCKS.iter().find(|def| def.name.eq_ignore_ascii_case(name))
}

/// Hotbar digits 1-4 map straight onto the block ids.
pub fn for_hotbar_digit(digit: u8) -> Option<BlockId> {
    match digit {
        1..=4 => Some(BlockId(digit as u16)),
        _ => None,
    }
}
