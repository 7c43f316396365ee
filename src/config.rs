use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GRID_SIZE, MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::error::ConfigError;
use crate::types::FormationKind;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(rename = "gridSize", default = "default_grid_size")]
    pub grid_size: i32,
    pub metabolism: f32,
    #[serde(rename = "goalSize")]
    pub goal_size: usize,
    #[serde(default)]
    pub formation: FormationKind,
}

fn default_grid_size() -> i32 {
    DEFAULT_GRID_SIZE
}

impl PlayerConfig {
    pub fn new(metabolism: f32, goal_size: usize) -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            metabolism,
            goal_size,
            formation: FormationKind::default(),
        }
    }

    pub fn with_formation(mut self, formation: FormationKind) -> Self {
        self.formation = formation;
        self
    }

    pub fn with_grid_size(mut self, grid_size: i32) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.metabolism.is_finite() || self.metabolism <= 0.0 || self.metabolism > 1.0 {
            return Err(ConfigError::Metabolism(self.metabolism));
        }
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize {
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
                got: self.grid_size,
            });
        }
        if self.goal_size == 0 {
            return Err(ConfigError::GoalSize);
        }
        Ok(())
    }
}
