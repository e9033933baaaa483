use crate::world::block_id::BlockId;
use crate::world::chunk::{Chunk, WORLD_HEIGHT};
use crate::world::chunk_coord::{world_to_chunk_pos, ChunkCoord};
use crate::world::generator::WorldGenerator;
use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::IVec3;
use log::{debug, trace};
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Who asked for an edit. Only local edits are broadcast to peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    BlockChanged {
        pos: IVec3,
        block: BlockId,
        previous: BlockId,
        origin: EditOrigin,
    },
}

/// Session-lifetime block storage. Chunks are generated on first touch and
/// never evicted.
///
/// The chunk map and each chunk have their own lock, so concurrent readers
/// and writers only serialize on the chunk they touch.
pub struct WorldStore {
    chunks: RwLock<HashMap<ChunkCoord, Arc<RwLock<Chunk>>>>,
    generator: Arc<dyn WorldGenerator>,
    subscribers: Mutex<Vec<Sender<WorldEvent>>>,
}

impl WorldStore {
    pub fn new(generator: Arc<dyn WorldGenerator>) -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
            generator,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Returns the chunk for `coord`, generating it if this is the first
    /// touch. Generation happens outside the map lock; if two callers race,
    /// the first insert wins and the other result is dropped, so edits made
    /// to the winner are never overwritten.
    pub fn get_or_generate_chunk(&self, coord: ChunkCoord) -> Arc<RwLock<Chunk>> {
        if let Some(chunk) = self.chunks.read().get(&coord) {
            return chunk.clone();
        }

        let generated = self.generator.generate_chunk(coord);
        let mut chunks = self.chunks.write();
        chunks
            .entry(coord)
            .or_insert_with(|| {
                trace!("Generated chunk {:?}", coord);
                Arc::new(RwLock::new(generated))
            })
            .clone()
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.read().contains_key(&coord)
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Block at an absolute position. Materializes the owning chunk even
    /// when `y` is outside the world, which then reads as Air.
    pub fn get_block(&self, pos: IVec3) -> BlockId {
        let (coord, local) = world_to_chunk_pos(pos);
        let chunk = self.get_or_generate_chunk(coord);
        let block = chunk.read().get_local(local);
        block
    }

    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.get_block(IVec3::new(x, y, z))
    }

    /// The single mutation entry point. Writes the cell and notifies every
    /// subscriber. Writes with `y` outside the world are dropped after the
    /// chunk has been materialized; nothing is signalled for them.
    ///
    /// Returns the previous block when the write happened.
    pub fn set_block(&self, pos: IVec3, block: BlockId, origin: EditOrigin) -> Option<BlockId> {
        let (coord, local) = world_to_chunk_pos(pos);
        let chunk = self.get_or_generate_chunk(coord);
        let previous = chunk.write().set_local(local, block);

        match previous {
            Some(previous) => {
                self.notify(WorldEvent::BlockChanged {
                    pos,
                    block,
                    previous,
                    origin,
                });
                Some(previous)
            }
            None => {
                debug!(
                    "Ignoring {:?} edit at {} outside world height 0..{}",
                    origin, pos, WORLD_HEIGHT
                );
                None
            }
        }
    }

    /// Registers a listener for world changes. Dropped receivers are pruned
    /// on the next notification.
    pub fn subscribe(&self) -> Receiver<WorldEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    fn notify(&self, event: WorldEvent) {
        self.subscribers
            .lock()
            .retain(|subscriber| subscriber.send(event).is_ok());
    }

    /// Generates every missing chunk within `chunk_radius` of `center` in
    /// parallel. Returns how many chunks were created.
    pub fn preload_around(&self, center: IVec3, chunk_radius: i32) -> usize {
        let center = ChunkCoord::containing(center.x, center.z);
        let missing: Vec<ChunkCoord> = center
            .square_around(chunk_radius)
            .into_iter()
            .filter(|coord| !self.is_loaded(*coord))
            .collect();

        let generated: Vec<(ChunkCoord, Chunk)> = missing
            .par_iter()
            .map(|&coord| (coord, self.generator.generate_chunk(coord)))
            .collect();

        let mut chunks = self.chunks.write();
        let mut created = 0;
        for (coord, chunk) in generated {
            chunks.entry(coord).or_insert_with(|| {
                created += 1;
                Arc::new(RwLock::new(chunk))
            });
        }
        debug!("Preloaded {} chunks around {:?}", created, center);
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generator::{FlatGenerator, TerrainGenerator};
    use std::thread;

    fn test_world() -> WorldStore {
        WorldStore::new(Arc::new(TerrainGenerator::default()))
    }

    #[test]
    fn test_lazy_materialization() {
        let world = test_world();
        assert_eq!(world.loaded_chunk_count(), 0);

        let block = world.block_at(-20, 10, 40);
        let coord = ChunkCoord::new(-2, 2);
        assert!(world.is_loaded(coord));
        assert_eq!(world.loaded_chunk_count(), 1);

        let expected = TerrainGenerator::default().generate_chunk(coord);
        assert_eq!(block, expected.get_block(12, 10, 8));
    }

    #[test]
    fn test_out_of_range_height_reads_air() {
        let world = WorldStore::new(Arc::new(FlatGenerator::new(BlockId::STONE)));
        assert_eq!(world.block_at(3, -1, 3), BlockId::AIR);
        assert_eq!(world.block_at(3, WORLD_HEIGHT, 3), BlockId::AIR);
        assert_eq!(world.block_at(3, 0, 3), BlockId::STONE);
        assert!(world.is_loaded(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn test_block_placement() {
        let world = test_world();
        let pos = IVec3::new(5, 60, -5);
        assert_eq!(world.set_block(pos, BlockId::STONE, EditOrigin::Local), Some(BlockId::AIR));
        assert_eq!(world.get_block(pos), BlockId::STONE);

        assert_eq!(world.set_block(pos, BlockId::STONE, EditOrigin::Local), Some(BlockId::STONE));
        assert_eq!(world.get_block(pos), BlockId::STONE);
    }

    #[test]
    fn test_set_materializes_and_keeps_generated_terrain() {
        let world = test_world();
        world.set_block(IVec3::new(100, 50, 100), BlockId::DIRT, EditOrigin::Remote);
        assert!(world.is_loaded(ChunkCoord::new(6, 6)));
        // The rest of the chunk is still the generated terrain.
        let generated = TerrainGenerator::default().generate_chunk(ChunkCoord::new(6, 6));
        assert_eq!(world.block_at(96, 0, 96), generated.get_block(0, 0, 0));
    }

    #[test]
    fn test_out_of_range_write_is_dropped() {
        let world = test_world();
        let events = world.subscribe();
        assert_eq!(world.set_block(IVec3::new(0, 64, 0), BlockId::STONE, EditOrigin::Local), None);
        assert_eq!(world.set_block(IVec3::new(0, -3, 0), BlockId::STONE, EditOrigin::Local), None);
        assert!(events.try_recv().is_err());
        assert_eq!(world.block_at(0, 64, 0), BlockId::AIR);
    }

    #[test]
    fn test_events_carry_origin() {
        let world = test_world();
        let events = world.subscribe();
        let pos = IVec3::new(1, 40, 1);

        world.set_block(pos, BlockId::WATER, EditOrigin::Local);
        world.set_block(pos, BlockId::GRASS, EditOrigin::Remote);

        assert_eq!(
            events.try_recv().unwrap(),
            WorldEvent::BlockChanged {
                pos,
                block: BlockId::WATER,
                previous: BlockId::AIR,
                origin: EditOrigin::Local,
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            WorldEvent::BlockChanged {
                pos,
                block: BlockId::GRASS,
                previous: BlockId::WATER,
                origin: EditOrigin::Remote,
            }
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let world = test_world();
        let kept = world.subscribe();
        drop(world.subscribe());
        world.set_block(IVec3::new(0, 50, 0), BlockId::STONE, EditOrigin::Local);
        assert_eq!(world.subscribers.lock().len(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_preload_around() {
        let world = test_world();
        world.block_at(0, 0, 0);
        let created = world.preload_around(IVec3::new(8, 40, 8), 1);
        assert_eq!(created, 8);
        assert_eq!(world.loaded_chunk_count(), 9);
        assert_eq!(world.preload_around(IVec3::new(8, 40, 8), 1), 0);
    }

    #[test]
    fn test_concurrent_writes_to_fresh_chunk_are_kept() {
        let world = Arc::new(test_world());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let world = world.clone();
                thread::spawn(move || {
                    world.set_block(IVec3::new(i, 60, 0), BlockId::STONE, EditOrigin::Local);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(world.loaded_chunk_count(), 1);
        for i in 0..8 {
            assert_eq!(world.block_at(i, 60, 0), BlockId::STONE);
        }
    }
}
