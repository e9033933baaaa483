use crate::world::block_id::BlockId;
use crate::world::blocks_data::{for_hotbar_digit, is_registered};
use crate::world::chunk_coord::offset_pos;
use crate::world::storage::{EditOrigin, WorldStore};
use glam::{IVec3, Vec3};
use log::debug;

/// The local player as far as the world is concerned: where it stands and
/// which block it places. Movement and collision live elsewhere.
#[derive(Debug, Clone)]
pub struct Player {
    position: Vec3,
    selected: BlockId,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 40.0, 0.0), BlockId::GRASS)
    }
}

impl Player {
    pub fn new(position: Vec3, selected: BlockId) -> Self {
        Self { position, selected }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn block_position(&self) -> IVec3 {
        self.position.floor().as_ivec3()
    }

    pub fn selected(&self) -> BlockId {
        self.selected
    }

    /// Only registered block types can be selected.
    pub fn select(&mut self, block: BlockId) -> bool {
        if !is_registered(block) {
            return false;
        }
        self.selected = block;
        true
    }

    pub fn select_hotbar(&mut self, digit: u8) -> bool {
        match for_hotbar_digit(digit) {
            Some(block) => self.select(block),
            None => false,
        }
    }

    /// Clears the targeted block. Returns what was there.
    pub fn mine(&self, world: &WorldStore, target: IVec3) -> Option<BlockId> {
        debug!("Mining {}", target);
        world.set_block(target, BlockId::AIR, EditOrigin::Local)
    }

    /// Places the selected block against `face_normal` of the target.
    /// Nothing happens when that cell lies outside the world.
    pub fn place(&self, world: &WorldStore, target: IVec3, face_normal: IVec3) -> Option<BlockId> {
        let pos = offset_pos(target, face_normal)?;
        debug!("Placing {} at {}", self.selected, pos);
        world.set_block(pos, self.selected, EditOrigin::Local)
    }
}
