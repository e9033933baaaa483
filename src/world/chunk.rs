use crate::world::block_id::BlockId;
use crate::world::chunk_coord::ChunkCoord;
use glam::IVec3;

pub const CHUNK_SIZE: i32 = 16;
pub const WORLD_HEIGHT: i32 = 64;
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * WORLD_HEIGHT) as usize;

/// Dense column group of `CHUNK_SIZE x WORLD_HEIGHT x CHUNK_SIZE` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub position: ChunkCoord,
    blocks: Vec<BlockId>,
}

impl Chunk {
    /// All-Air chunk.
    pub fn new(position: ChunkCoord) -> Self {
        Self::filled(position, BlockId::AIR)
    }

    pub fn filled(position: ChunkCoord, block: BlockId) -> Self {
        Self {
            position,
            blocks: vec![block; CHUNK_VOLUME],
        }
    }

    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_SIZE).contains(&x) && (0..WORLD_HEIGHT).contains(&y) && (0..CHUNK_SIZE).contains(&z)
    }

    fn get_index(x: i32, y: i32, z: i32) -> Option<usize> {
        if !Self::in_bounds(x, y, z) {
            return None;
        }
        Some((x + z * CHUNK_SIZE + y * CHUNK_SIZE * CHUNK_SIZE) as usize)
    }

    /// Local lookup; anything outside the grid reads as Air.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        Self::get_index(x, y, z)
            .map(|index| self.blocks[index])
            .unwrap_or(BlockId::AIR)
    }

    pub fn get_local(&self, local: IVec3) -> BlockId {
        self.get_block(local.x, local.y, local.z)
    }

    /// Returns the previous id, or `None` when the position is outside the
    /// grid and nothing was written.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> Option<BlockId> {
        let index = Self::get_index(x, y, z)?;
        Some(std::mem::replace(&mut self.blocks[index], block))
    }

    pub fn set_local(&mut self, local: IVec3, block: BlockId) -> Option<BlockId> {
        self.set_block(local.x, local.y, local.z, block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(BlockId::is_air)
    }

    pub fn count(&self, block: BlockId) -> usize {
        self.blocks.iter().filter(|&&b| b == block).count()
    }

    /// Highest non-Air `y` in the column, if any.
    pub fn get_height(&self, x: i32, z: i32) -> Option<i32> {
        (0..WORLD_HEIGHT)
            .rev()
            .find(|&y| !self.get_block(x, y, z).is_air())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_operations() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        assert_eq!(chunk.len(), CHUNK_VOLUME);
        assert!(chunk.is_empty());

        assert_eq!(chunk.set_block(0, 0, 0, BlockId::STONE), Some(BlockId::AIR));
        assert_eq!(chunk.get_block(0, 0, 0), BlockId::STONE);
        assert_eq!(chunk.count(BlockId::STONE), 1);

        assert_eq!(chunk.set_block(15, 63, 15, BlockId::DIRT), Some(BlockId::AIR));
        assert_eq!(chunk.get_block(15, 63, 15), BlockId::DIRT);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut chunk = Chunk::filled(ChunkCoord::new(1, 1), BlockId::STONE);
        assert_eq!(chunk.get_block(-1, 0, 0), BlockId::AIR);
        assert_eq!(chunk.get_block(0, WORLD_HEIGHT, 0), BlockId::AIR);
        assert_eq!(chunk.get_block(0, 0, CHUNK_SIZE), BlockId::AIR);
        assert_eq!(chunk.set_block(0, -1, 0, BlockId::DIRT), None);
        assert_eq!(chunk.count(BlockId::DIRT), 0);
    }

    #[test]
    fn test_heightmap() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        assert_eq!(chunk.get_height(5, 5), None);
        chunk.set_block(5, 10, 5, BlockId::GRASS);
        assert_eq!(chunk.get_height(5, 5), Some(10));
        chunk.set_block(5, 10, 5, BlockId::AIR);
        assert_eq!(chunk.get_height(5, 5), None);
    }
}
