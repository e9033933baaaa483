pub mod config;
pub mod console;
pub mod net;
pub mod player;
pub mod utils;
pub mod world;

// Re-export commonly used types
pub use config::core::ClientConfig;
pub use config::worldgen::WorldGenConfig;
pub use net::protocol::Message;
pub use net::session::SyncSession;
pub use player::Player;
pub use utils::error::{ConfigError, NetError};
pub use world::block_id::BlockId;
pub use world::chunk::Chunk;
pub use world::chunk_coord::ChunkCoord;
pub use world::generator::terrain::TerrainGenerator;
pub use world::storage::WorldStore;
