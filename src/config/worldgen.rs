use serde::{Deserialize, Serialize};

/// One `sin(f*x) * cos(f*z) * amplitude` term of the height function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainWave {
    pub frequency: f64,
    pub amplitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    pub base_height: i32,
    /// Cells below `height - soil_depth` are stone.
    pub soil_depth: i32,
    /// Cells in `height - grass_depth .. height` are grass.
    pub grass_depth: i32,
    pub waves: Vec<TerrainWave>,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            base_height: 32,
            soil_depth: 3,
            grass_depth: 1,
            waves: vec![
                TerrainWave {
                    frequency: 0.02,
                    amplitude: 10.0,
                },
                TerrainWave {
                    frequency: 0.05,
                    amplitude: 5.0,
                },
                TerrainWave {
                    frequency: 0.1,
                    amplitude: 2.0,
                },
            ],
        }
    }
}
