use crate::models::color::{Color, WHITE};

pub const MAX_IMAGE_WIDTH: usize = 384;
pub const MAX_IMAGE_HEIGHT: usize = 384;

pub const TILE_SIZE: usize = 50; // px, edge tiles are smaller when the image isn't divisible
pub const BACKGROUND: Color = WHITE;

pub const MAX_CHANNEL_DIFF: u32 = 255 * 3; // |dR| + |dG| + |dB| for black vs white

pub const DEFAULT_POLYGON_COUNT: usize = 50;
pub const DEFAULT_VERTEX_COUNT: usize = 6;
pub const MIN_VERTEX_COUNT: usize = 3;
pub const MIN_POLYGON_COUNT: usize = 1;

pub const DEFAULT_SAVE_EVERY: u64 = 100;
pub const SNAPSHOT_PAD: usize = 6; // zero padding of the counter in snapshot file names
pub const LOG_EVERY_ITERATIONS: u64 = 10_000;

/// Runtime knobs for a single engine run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub tile_size: usize,
    pub background: Color,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tile_size: TILE_SIZE,
            background: BACKGROUND,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn seeded(seed: u64) -> Self {
        EngineConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }
}
