pub mod terrain;

pub use terrain::TerrainGenerator;

use crate::world::block_id::BlockId;
use crate::world::chunk::Chunk;
use crate::world::chunk_coord::ChunkCoord;

/// Produces the initial contents of a chunk. Implementations must be pure:
/// the same coordinate always yields the same grid.
pub trait WorldGenerator: Send + Sync {
    fn generate_chunk(&self, coord: ChunkCoord) -> Chunk;
}

/// Fills every cell with one block. Handy for void worlds and for tests
/// that need a known neighbourhood.
#[derive(Debug, Clone, Copy)]
pub struct FlatGenerator {
    pub block: BlockId,
}

impl FlatGenerator {
    pub fn new(block: BlockId) -> Self {
        Self { block }
    }
}

impl WorldGenerator for FlatGenerator {
    fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        Chunk::filled(coord, self.block)
    }
}
