pub mod core;
pub mod worldgen;

pub use self::core::{ClientConfig, NetworkConfig, PlayerConfig, RenderConfig};
pub use worldgen::{TerrainWave, WorldGenConfig};
