use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::PlayerConfig;
use crate::constants::{n_cells_can_move, BACTERIA_RATIO};
use crate::error::PlayerError;
use crate::formation::{build_formation, first_cells, Formation};
use crate::grid::Grid;
use crate::info::InfoByte;
use crate::march::ColumnMarch;
use crate::types::{AmoebaState, Cell, FormationKind, TurnOutcome};

#[derive(Debug)]
enum Strategy {
    Shaped(Box<dyn Formation>),
    March(ColumnMarch),
}

#[derive(Debug)]
pub struct Player {
    config: PlayerConfig,
    strategy: Strategy,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Result<Self, PlayerError> {
        config.validate()?;
        let strategy = match config.formation {
            FormationKind::ColumnMarch => Strategy::March(ColumnMarch),
            kind => Strategy::Shaped(build_formation(kind, config.grid_size)?),
        };
        Ok(Self { config, strategy })
    }

    pub fn play_turn(&mut self, state: &mut AmoebaState, info: u8) -> TurnOutcome {
        let budget = n_cells_can_move(self.config.metabolism, state.current_size);

        for &cell in &state.bacteria {
            state.amoeba_map.set(cell, true);
        }

        let outcome = match &mut self.strategy {
            Strategy::Shaped(formation) => shaped_turn(formation.as_mut(), state, info, budget),
            Strategy::March(march) => march.play(state, info, budget),
        };
        if outcome.is_pass() {
            info!(size = state.current_size, "no moves");
        }
        outcome
    }
}

fn shaped_turn(
    formation: &mut dyn Formation,
    state: &AmoebaState,
    info: u8,
    budget: usize,
) -> TurnOutcome {
    let mut byte = InfoByte::decode(info);
    let density_ratio = if state.periphery.is_empty() {
        0.0
    } else {
        state.bacteria.len() as f32 / state.periphery.len() as f32
    };
    byte.bump_density(density_ratio > BACTERIA_RATIO);

    formation.update(byte.phase);
    let goal_points = formation.next_formation_points(state);
    let goal: HashSet<Cell> = first_cells(&goal_points, state.amoeba_map.count())
        .into_iter()
        .collect();

    let retractable = formation.retractable_points(&goal, state);
    let mut candidates = find_movable_cells(
        &retractable,
        &state.periphery,
        &state.amoeba_map,
        &state.bacteria,
    );
    candidates.extend_from_slice(&retractable);
    let to_move = formation.moveable_points(&candidates, &goal, state);
    let (retract, moves) = formation.n_moves(&retractable, &to_move, state, budget);

    byte.phase = formation.next_phase(byte.phase, state, &retract, &moves);
    byte.reserved = 0;

    debug!(
        formation = formation.kind().as_str(),
        phase = byte.phase,
        density = byte.density,
        budget,
        retractable = retractable.len(),
        candidates = to_move.len(),
        moves = moves.len(),
        "turn computed"
    );

    TurnOutcome {
        retract,
        moves,
        info: byte.encode(),
    }
}

pub fn find_movable_cells(
    retract: &[Cell],
    periphery: &[Cell],
    grid: &Grid,
    bacteria: &[Cell],
) -> Vec<Cell> {
    let retracting: HashSet<Cell> = retract.iter().copied().collect();
    let bacteria: HashSet<Cell> = bacteria.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut movable = Vec::new();
    for &(x, y) in periphery {
        if retracting.contains(&(x, y)) || bacteria.contains(&(x, y)) {
            continue;
        }
        for cell in [
            grid.wrap(x, y - 1),
            grid.wrap(x, y + 1),
            grid.wrap(x - 1, y),
            grid.wrap(x + 1, y),
        ] {
            if !grid.get(cell) && seen.insert(cell) {
                movable.push(cell);
            }
        }
    }
    movable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::is_connected;
    use crate::error::ConfigError;

    fn block_state() -> AmoebaState {
        AmoebaState::from_map(Grid::with_block(100, (45, 45), 10))
    }

    fn apply(grid: &Grid, outcome: &TurnOutcome) -> Grid {
        let mut next = grid.clone();
        for &cell in &outcome.retract {
            next.set(cell, false);
        }
        for &cell in &outcome.moves {
            next.set(cell, true);
        }
        next
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = Player::new(PlayerConfig::new(1.5, 400)).unwrap_err();
        assert!(matches!(err, PlayerError::Config(ConfigError::Metabolism(_))));

        let huge = PlayerConfig::new(0.5, 400)
            .with_grid_size(50_000)
            .with_formation(FormationKind::Growth);
        let err = Player::new(huge).unwrap_err();
        assert!(matches!(
            err,
            PlayerError::Config(ConfigError::GridSize { got: 50_000, .. })
        ));
    }

    #[test]
    fn block_turn_with_quadrants_moves_along_the_arc() {
        let mut player = Player::new(PlayerConfig::new(0.5, 400)).unwrap();
        let mut state = block_state();
        let before = state.amoeba_map.clone();
        let outcome = player.play_turn(&mut state, 0);

        assert!(!outcome.retract.is_empty());
        assert_eq!(outcome.retract.len(), outcome.moves.len());
        assert!(outcome.retract.len() <= 50);
        assert_eq!(outcome.retract, vec![(45, 47)]);
        assert_eq!(outcome.moves, vec![(44, 45)]);

        let periphery: HashSet<Cell> = before.periphery().into_iter().collect();
        assert!(outcome.retract.iter().all(|cell| periphery.contains(cell)));
        assert!(is_connected(&apply(&before, &outcome)));
    }

    #[test]
    fn every_formation_keeps_the_block_connected() {
        for kind in [
            FormationKind::Growth,
            FormationKind::SpaceCurve,
            FormationKind::Quadratic,
            FormationKind::Quadrants,
        ] {
            let config = PlayerConfig::new(0.5, 400).with_formation(kind);
            let mut player = Player::new(config).unwrap();
            let mut state = block_state();
            let before = state.amoeba_map.clone();
            let outcome = player.play_turn(&mut state, 0);

            assert_eq!(outcome.retract.len(), outcome.moves.len(), "{kind:?}");
            let retract: HashSet<Cell> = outcome.retract.iter().copied().collect();
            let moves: HashSet<Cell> = outcome.moves.iter().copied().collect();
            assert_eq!(retract.len(), outcome.retract.len(), "{kind:?}");
            assert_eq!(moves.len(), outcome.moves.len(), "{kind:?}");
            assert!(is_connected(&apply(&before, &outcome)), "{kind:?}");
        }
    }

    #[test]
    fn bacteria_are_absorbed_and_raise_the_density_counter() {
        let mut player = Player::new(PlayerConfig::new(0.5, 400)).unwrap();
        let mut state = block_state();
        state.bacteria = vec![(55, 50), (44, 52)];
        let outcome = player.play_turn(&mut state, 0);

        assert!(state.amoeba_map.get((55, 50)));
        assert!(state.amoeba_map.get((44, 52)));
        assert_eq!(InfoByte::decode(outcome.info).density, 1);
    }

    #[test]
    fn quiet_turn_lowers_the_density_counter_and_clears_reserved_bits() {
        let mut player = Player::new(PlayerConfig::new(0.5, 400)).unwrap();
        let mut state = block_state();
        let info = InfoByte::decode(0b0001_1011).encode();
        let outcome = player.play_turn(&mut state, info);
        let decoded = InfoByte::decode(outcome.info);
        assert_eq!(decoded.density, 2);
        assert_eq!(decoded.reserved, 0);
        assert_eq!(decoded.phase, 0);
    }

    #[test]
    fn empty_periphery_is_a_pass() {
        let mut player = Player::new(PlayerConfig::new(0.5, 400)).unwrap();
        let mut state = AmoebaState::from_map(Grid::new(100));
        let outcome = player.play_turn(&mut state, 0);
        assert!(outcome.is_pass());
    }

    #[test]
    fn column_march_widens_the_block_while_reorganizing() {
        let config = PlayerConfig::new(0.5, 400).with_formation(FormationKind::ColumnMarch);
        let mut player = Player::new(config).unwrap();
        let mut state = block_state();
        let before = state.amoeba_map.clone();
        let outcome = player.play_turn(&mut state, 0);

        assert_eq!(outcome.retract, vec![(45, 45), (46, 45), (47, 45), (48, 45)]);
        assert_eq!(outcome.moves, vec![(44, 53), (44, 54), (55, 53), (55, 54)]);
        assert_eq!(outcome.info, 1);
        assert!(is_connected(&apply(&before, &outcome)));
    }

    #[test]
    fn column_march_moves_the_top_row_under_the_body() {
        let config = PlayerConfig::new(0.5, 400).with_formation(FormationKind::ColumnMarch);
        let mut player = Player::new(config).unwrap();
        let mut state = block_state();
        let before = state.amoeba_map.clone();
        let outcome = player.play_turn(&mut state, 10);

        let top: Vec<Cell> = (45..55).map(|x| (x, 45)).collect();
        let under: Vec<Cell> = (45..55).map(|x| (x, 55)).collect();
        assert_eq!(outcome.retract, top);
        assert_eq!(outcome.moves, under);
        assert_eq!(outcome.info, 11);
        assert!(is_connected(&apply(&before, &outcome)));

        let outcome = player.play_turn(&mut block_state(), 255);
        assert_eq!(outcome.info, 255);
    }

    #[test]
    fn movable_cells_skip_retracted_and_bacteria_cells() {
        let grid = Grid::from_cells(10, &[(4, 4), (5, 4), (6, 4)]);
        let periphery = grid.periphery();
        let movable = find_movable_cells(&[(6, 4)], &periphery, &grid, &[(5, 4)]);
        assert_eq!(movable, vec![(4, 3), (4, 5), (3, 4)]);
    }
}
