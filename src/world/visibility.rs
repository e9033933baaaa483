//! Hidden-block culling for the renderer.
//!
//! A block counts as exposed when at least one axis neighbour is Air. Only
//! Air opens a face: Water and unregistered ids occlude like solid blocks.
//! Faces pointing past the end of the `i32` coordinate space are open.

use crate::world::block_id::BlockId;
use crate::world::blocks_data::describe;
use crate::world::chunk::WORLD_HEIGHT;
use crate::world::chunk_coord::offset_pos;
use crate::world::storage::WorldStore;
use glam::IVec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    East,
    West,
    Up,
    Down,
    South,
    North,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::East,
        Face::West,
        Face::Up,
        Face::Down,
        Face::South,
        Face::North,
    ];

    pub fn normal(&self) -> IVec3 {
        match self {
            Face::East => IVec3::X,
            Face::West => IVec3::NEG_X,
            Face::Up => IVec3::Y,
            Face::Down => IVec3::NEG_Y,
            Face::South => IVec3::Z,
            Face::North => IVec3::NEG_Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleBlock {
    pub pos: IVec3,
    pub block: BlockId,
}

fn face_is_open(world: &WorldStore, pos: IVec3, face: Face) -> bool {
    match offset_pos(pos, face.normal()) {
        Some(neighbour) => world.get_block(neighbour).is_air(),
        None => true,
    }
}

/// Neighbour lookups go through the store, so a block on a chunk edge pulls
/// the adjacent chunk in.
pub fn is_exposed(world: &WorldStore, pos: IVec3) -> bool {
    Face::ALL.iter().any(|&face| face_is_open(world, pos, face))
}

pub fn exposed_faces(world: &WorldStore, pos: IVec3) -> Vec<Face> {
    Face::ALL
        .iter()
        .copied()
        .filter(|&face| face_is_open(world, pos, face))
        .collect()
}

/// Everything a redraw around `center` would draw: blocks in the columns
/// `[center - radius, center + radius)` that are solid and exposed.
pub fn visible_blocks(world: &WorldStore, center: IVec3, radius: i32) -> Vec<VisibleBlock> {
    let mut visible = Vec::new();
    let (min_x, max_x) = (center.x.saturating_sub(radius), center.x.saturating_add(radius));
    let (min_z, max_z) = (center.z.saturating_sub(radius), center.z.saturating_add(radius));
    for x in min_x..max_x {
        for z in min_z..max_z {
            for y in 0..WORLD_HEIGHT {
                let pos = IVec3::new(x, y, z);
                let block = world.get_block(pos);
                if block.is_air() || !describe(block).solid {
                    continue;
                }
                if is_exposed(world, pos) {
                    visible.push(VisibleBlock { pos, block });
                }
            }
        }
    }
    visible
}
