use thiserror::Error;

use crate::types::Cell;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("metabolism must be in (0, 1], got {0}")]
    Metabolism(f32),
    #[error("grid size must be between {min} and {max}, got {got}")]
    GridSize { min: i32, max: i32, got: i32 },
    #[error("goal size must be positive")]
    GoalSize,
    #[error("bacteria density must be in [0, 1], got {0}")]
    BacteriaDensity(f32),
}

#[derive(Debug, Error)]
pub enum FormationError {
    #[error("failed to parse {table} table: {source}")]
    Table {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} table is empty")]
    EmptyTable(&'static str),
    #[error("{0} has no target shape")]
    Unshaped(&'static str),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("retract list has {retract} cells but move list has {moves}")]
    LengthMismatch { retract: usize, moves: usize },
    #[error("{count} moves exceed the budget of {budget}")]
    OverBudget { count: usize, budget: usize },
    #[error("cell {0:?} appears more than once")]
    Duplicate(Cell),
    #[error("retracted cell {0:?} is not on the periphery")]
    NotPeriphery(Cell),
    #[error("move target {0:?} is already occupied")]
    Occupied(Cell),
    #[error("move target {0:?} does not touch the amoeba")]
    Detached(Cell),
    #[error("amoeba would split into several pieces")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Formation(#[from] FormationError),
}
