use crate::config::worldgen::WorldGenConfig;
use crate::world::block_id::BlockId;
use crate::world::chunk::{Chunk, CHUNK_SIZE, WORLD_HEIGHT};
use crate::world::chunk_coord::ChunkCoord;
use crate::world::generator::WorldGenerator;

/// Smooth pseudo-terrain from summed sine/cosine waves. No randomness: the
/// height of a column depends only on its absolute coordinates.
#[derive(Debug, Clone, Default)]
pub struct TerrainGenerator {
    config: WorldGenConfig,
}

impl TerrainGenerator {
    pub fn new(config: WorldGenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    pub fn calculate_height(&self, world_x: i32, world_z: i32) -> i32 {
        let (x, z) = (world_x as f64, world_z as f64);
        let n: f64 = self
            .config
            .waves
            .iter()
            .map(|wave| (x * wave.frequency).sin() * (z * wave.frequency).cos() * wave.amplitude)
            .sum();
        (n.floor() as i32).saturating_add(self.config.base_height)
    }

    /// Column fill rule: stone, then dirt, then a grass cap, then air.
    pub fn get_block_for_depth(&self, y: i32, height: i32) -> BlockId {
        if y < height.saturating_sub(self.config.soil_depth) {
            BlockId::STONE
        } else if y < height.saturating_sub(self.config.grass_depth) {
            BlockId::DIRT
        } else if y < height {
            BlockId::GRASS
        } else {
            BlockId::AIR
        }
    }
}

impl WorldGenerator for TerrainGenerator {
    fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);
        let origin = coord.origin();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let height = self.calculate_height(origin.x + x, origin.z + z);
                for y in 0..WORLD_HEIGHT {
                    let block = self.get_block_for_depth(y, height);
                    if !block.is_air() {
                        chunk.set_block(x, y, z, block);
                    }
                }
            }
        }

        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_calculation() {
        let generator = TerrainGenerator::default();
        assert_eq!(generator.calculate_height(0, 0), 32);
        for x in (-500..500).step_by(37) {
            for z in (-500..500).step_by(41) {
                let h = generator.calculate_height(x, z);
                assert!((32 - 17..=32 + 17).contains(&h), "height {h} at {x},{z}");
            }
        }
    }

    #[test]
    fn test_origin_column_layers() {
        let generator = TerrainGenerator::default();
        let chunk = generator.generate_chunk(ChunkCoord::new(0, 0));
        for y in 0..WORLD_HEIGHT {
            let expected = match y {
                0..=28 => BlockId::STONE,
                29..=30 => BlockId::DIRT,
                31 => BlockId::GRASS,
                _ => BlockId::AIR,
            };
            assert_eq!(chunk.get_block(0, y, 0), expected, "y = {y}");
        }
    }

    #[test]
    fn test_chunk_generation_is_deterministic() {
        let generator = TerrainGenerator::default();
        for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-3, 7), ChunkCoord::new(12, -9)] {
            assert_eq!(generator.generate_chunk(coord), generator.generate_chunk(coord));
        }
        let other = TerrainGenerator::new(WorldGenConfig::default());
        assert_eq!(
            generator.generate_chunk(ChunkCoord::new(5, 5)),
            other.generate_chunk(ChunkCoord::new(5, 5))
        );
    }

    #[test]
    fn test_columns_follow_height() {
        let generator = TerrainGenerator::default();
        let coord = ChunkCoord::new(-2, 3);
        let chunk = generator.generate_chunk(coord);
        let origin = coord.origin();
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let h = generator.calculate_height(origin.x + x, origin.z + z);
                assert_eq!(chunk.get_height(x, z), Some(h - 1));
                assert_eq!(chunk.get_block(x, h - 1, z), BlockId::GRASS);
                assert_eq!(chunk.get_block(x, h, z), BlockId::AIR);
            }
        }
    }

    #[test]
    fn test_generates_at_coordinate_extremes() {
        let generator = TerrainGenerator::default();
        for coord in [
            ChunkCoord::containing(i32::MAX, i32::MAX),
            ChunkCoord::containing(i32::MIN, i32::MIN),
        ] {
            let chunk = generator.generate_chunk(coord);
            let origin = coord.origin();
            let h = generator.calculate_height(origin.x + CHUNK_SIZE - 1, origin.z);
            assert_eq!(chunk.get_block(CHUNK_SIZE - 1, h - 1, 0), BlockId::GRASS);
        }
    }
}
