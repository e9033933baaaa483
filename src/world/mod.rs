pub mod block_id;
pub mod blocks_data;
pub mod chunk;
pub mod chunk_coord;
pub mod generator;
pub mod storage;
pub mod visibility;

// Re-export commonly used types
pub use block_id::BlockId;
pub use blocks_data::{describe, BlockDefinition, BLOCKS};
pub use chunk::{Chunk, CHUNK_SIZE, WORLD_HEIGHT};
pub use chunk_coord::{chunk_to_world_pos, offset_pos, world_to_chunk_pos, ChunkCoord};
pub use generator::{FlatGenerator, TerrainGenerator, WorldGenerator};
pub use storage::{EditOrigin, WorldEvent, WorldStore};
pub use visibility::{exposed_faces, is_exposed, visible_blocks, Face, VisibleBlock};
