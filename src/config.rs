use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::body::Cell;
use crate::input::Direction;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Cells per side of the default square grid.
pub const DEFAULT_GRID_CELLS: u16 = 40;

/// Pixel edge of one cell. Only renderers care about this.
pub const DEFAULT_CELL_PIXELS: u16 = 20;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Score granted per captured food.
pub const DEFAULT_FOOD_REWARD: u32 = 10;

/// Number of entries kept in the high-score table.
pub const DEFAULT_HIGH_SCORE_CAPACITY: usize = 10;

/// Head cell of a fresh one-cell body.
pub const DEFAULT_ORIGIN: Cell = Cell { x: 10, y: 10 };

/// Largest accepted high-score table.
pub const MAX_HIGH_SCORE_CAPACITY: usize = 1_000;

/// Player name used when the caller supplies an empty one.
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

/// Logical dimensions of the square play grid.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridSize {
    pub cells: u16,
}

impl GridSize {
    #[must_use]
    pub fn new(cells: u16) -> Self {
        Self { cells }
    }

    /// Returns true when `cell` lies inside `[0, cells)` on both axes.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        let upper = i32::from(self.cells);
        (0..upper).contains(&cell.x) && (0..upper).contains(&cell.y)
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.cells) * usize::from(self.cells)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_CELLS)
    }
}

/// Tunables for a game and every session it starts.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: GridSize,
    /// Carried through for renderers; the simulation never reads it.
    pub cell_pixels: u16,
    pub tick_interval_ms: u64,
    pub food_reward: u32,
    pub high_score_capacity: usize,
    pub origin: Cell,
    pub initial_heading: Direction,
    /// Upper bound on pending direction requests. `None` keeps the buffer unbounded.
    pub input_capacity: Option<usize>,
    pub default_player_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::default(),
            cell_pixels: DEFAULT_CELL_PIXELS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            food_reward: DEFAULT_FOOD_REWARD,
            high_score_capacity: DEFAULT_HIGH_SCORE_CAPACITY,
            origin: DEFAULT_ORIGIN,
            initial_heading: Direction::Right,
            input_capacity: None,
            default_player_name: DEFAULT_PLAYER_NAME.to_owned(),
        }
    }
}

impl GameConfig {
    /// Checks the invariants every session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size.cells == 0 {
            return Err(ConfigError::Invalid("grid_size must be at least 1".into()));
        }
        if !self.grid_size.contains(self.origin) {
            return Err(ConfigError::Invalid(format!(
                "origin ({}, {}) lies outside the {n}x{n} grid",
                self.origin.x,
                self.origin.y,
                n = self.grid_size.cells,
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be positive".into(),
            ));
        }
        if self.high_score_capacity == 0 {
            return Err(ConfigError::Invalid(
                "high_score_capacity must be at least 1".into(),
            ));
        }
        if self.high_score_capacity > MAX_HIGH_SCORE_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "high_score_capacity must be at most {MAX_HIGH_SCORE_CAPACITY}"
            )));
        }
        match self.input_capacity {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "input_capacity must be at least 1 when set".into(),
                ));
            }
            Some(capacity) if capacity > self.grid_size.total_cells() => {
                return Err(ConfigError::Invalid(format!(
                    "input_capacity must be at most {} (one per grid cell)",
                    self.grid_size.total_cells(),
                )));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Failure to produce a usable [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Loads and validates the config at `path`.
///
/// A missing file is not an error and yields [`GameConfig::default`].
pub fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(GameConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config: GameConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
