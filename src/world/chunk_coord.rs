use crate::world::chunk::CHUNK_SIZE;
use glam::{IVec2, IVec3, Vec3};

/// Horizontal chunk key. Chunks are not split vertically, so only X and Z
/// take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord(pub IVec2);

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self(IVec2::new(x, z))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn z(&self) -> i32 {
        self.0.y
    }

    /// Chunk owning the given block column. Floor division, so `-1` lands
    /// in chunk `-1`, not `0`.
    pub fn containing(world_x: i32, world_z: i32) -> Self {
        Self::new(
            world_x.div_euclid(CHUNK_SIZE),
            world_z.div_euclid(CHUNK_SIZE),
        )
    }

    pub fn from_world_pos(pos: Vec3) -> Self {
        Self::containing(pos.x.floor() as i32, pos.z.floor() as i32)
    }

    /// World position of local cell (0, 0, 0).
    pub fn origin(&self) -> IVec3 {
        IVec3::new(self.0.x * CHUNK_SIZE, 0, self.0.y * CHUNK_SIZE)
    }

    /// All chunks in the square of the given radius around `self`, nearest
    /// rings first.
    pub fn square_around(&self, radius: i32) -> Vec<Self> {
        let mut coords = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)).max(0) as usize);
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                coords.push(Self(self.0 + IVec2::new(dx, dz)));
            }
        }
        coords.sort_by_key(|c| c.chebyshev_distance(self));
        coords
    }

    pub fn chebyshev_distance(&self, other: &Self) -> i32 {
        (self.0.x - other.0.x).abs().max((self.0.y - other.0.y).abs())
    }
}

impl From<IVec2> for ChunkCoord {
    fn from(vec: IVec2) -> Self {
        Self(vec)
    }
}

impl From<ChunkCoord> for IVec2 {
    fn from(coord: ChunkCoord) -> Self {
        coord.0
    }
}

/// Splits an absolute block position into its chunk key and the position
/// inside that chunk. `y` passes through untouched.
pub fn world_to_chunk_pos(pos: IVec3) -> (ChunkCoord, IVec3) {
    let chunk = ChunkCoord::containing(pos.x, pos.z);
    let local = IVec3::new(
        pos.x.rem_euclid(CHUNK_SIZE),
        pos.y,
        pos.z.rem_euclid(CHUNK_SIZE),
    );
    (chunk, local)
}

/// `pos + delta`, or `None` when the result leaves the `i32` range. Cells
/// past the end of the coordinate space do not exist.
pub fn offset_pos(pos: IVec3, delta: IVec3) -> Option<IVec3> {
    Some(IVec3::new(
        pos.x.checked_add(delta.x)?,
        pos.y.checked_add(delta.y)?,
        pos.z.checked_add(delta.z)?,
    ))
}

pub fn chunk_to_world_pos(chunk: ChunkCoord, local: IVec3) -> IVec3 {
    chunk.origin() + local
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_conversion() {
        let (chunk, local) = world_to_chunk_pos(IVec3::new(35, 60, -12));
        assert_eq!(chunk, ChunkCoord::new(2, -1));
        assert_eq!(local, IVec3::new(3, 60, 4));
        assert_eq!(chunk_to_world_pos(chunk, local), IVec3::new(35, 60, -12));
    }

    #[test]
    fn test_negative_coordinates_use_floor() {
        let (chunk, local) = world_to_chunk_pos(IVec3::new(-1, 0, -16));
        assert_eq!(chunk, ChunkCoord::new(-1, -1));
        assert_eq!(local, IVec3::new(15, 0, 0));

        let (chunk, local) = world_to_chunk_pos(IVec3::new(-17, 5, 16));
        assert_eq!(chunk, ChunkCoord::new(-2, 1));
        assert_eq!(local, IVec3::new(15, 5, 0));
    }

    #[test]
    fn test_round_trip() {
        for x in -100..100 {
            let pos = IVec3::new(x, 7, -x * 3);
            let (chunk, local) = world_to_chunk_pos(pos);
            assert!((0..CHUNK_SIZE).contains(&local.x));
            assert!((0..CHUNK_SIZE).contains(&local.z));
            assert_eq!(chunk.x() * CHUNK_SIZE + local.x, pos.x);
            assert_eq!(chunk_to_world_pos(chunk, local), pos);
        }
    }

    #[test]
    fn test_offset_pos_at_the_edges() {
        assert_eq!(offset_pos(IVec3::ZERO, IVec3::NEG_X), Some(IVec3::new(-1, 0, 0)));
        assert_eq!(offset_pos(IVec3::new(i32::MAX, 5, 0), IVec3::X), None);
        assert_eq!(offset_pos(IVec3::new(0, 5, i32::MIN), IVec3::NEG_Z), None);
        assert_eq!(
            offset_pos(IVec3::new(i32::MAX, 5, 0), IVec3::NEG_X),
            Some(IVec3::new(i32::MAX - 1, 5, 0))
        );
    }

    #[test]
    fn test_extreme_positions_split_cleanly() {
        let (chunk, local) = world_to_chunk_pos(IVec3::new(i32::MIN, 0, i32::MAX));
        assert_eq!(chunk, ChunkCoord::new(i32::MIN / CHUNK_SIZE, i32::MAX / CHUNK_SIZE));
        assert_eq!(local, IVec3::new(0, 0, CHUNK_SIZE - 1));
    }

    #[test]
    fn test_square_around() {
        let center = ChunkCoord::new(-3, 4);
        let square = center.square_around(1);
        assert_eq!(square.len(), 9);
        assert_eq!(square[0], center);
        assert!(square.contains(&ChunkCoord::new(-4, 5)));
        assert!(center.square_around(0) == vec![center]);
    }

    #[test]
    fn test_from_world_pos() {
        assert_eq!(
            ChunkCoord::from_world_pos(Vec3::new(-0.5, 40.0, 16.2)),
            ChunkCoord::new(-1, 1)
        );
    }
}
