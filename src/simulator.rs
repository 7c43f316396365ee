use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::PlayerConfig;
use crate::connectivity::is_connected;
use crate::constants::{n_cells_can_move, DEFAULT_GRID_SIZE};
use crate::error::{ConfigError, MoveError};
use crate::grid::Grid;
use crate::player::Player;
use crate::rng::Rng;
use crate::types::{AmoebaState, Cell, FormationKind};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationOptions {
    #[serde(rename = "gridSize")]
    pub grid_size: i32,
    #[serde(rename = "goalSize")]
    pub goal_size: usize,
    pub metabolism: f32,
    #[serde(rename = "bacteriaDensity")]
    pub bacteria_density: f32,
    pub seed: u32,
    #[serde(rename = "maxTurns")]
    pub max_turns: usize,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            goal_size: 400,
            metabolism: 0.3,
            bacteria_density: 0.02,
            seed: 0,
            max_turns: 500,
        }
    }
}

impl SimulationOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.bacteria_density) {
            return Err(ConfigError::BacteriaDensity(self.bacteria_density));
        }
        self.player_config(FormationKind::default()).validate()
    }

    pub fn player_config(&self, formation: FormationKind) -> PlayerConfig {
        PlayerConfig::new(self.metabolism, self.goal_size)
            .with_grid_size(self.grid_size)
            .with_formation(formation)
    }

    pub fn initial_side(&self) -> i32 {
        let side = ((self.goal_size / 4) as f64).sqrt().floor() as i32;
        side.clamp(1, self.grid_size)
    }
}

#[derive(Clone, Debug)]
pub struct TurnReport {
    pub turn: usize,
    pub retracted: usize,
    pub moved: usize,
    pub absorbed: usize,
    pub size: usize,
    pub info: u8,
    pub rejected: Option<MoveError>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RejectedTurn {
    pub turn: usize,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationSummary {
    pub turns: usize,
    #[serde(rename = "initialSize")]
    pub initial_size: usize,
    #[serde(rename = "finalSize")]
    pub final_size: usize,
    #[serde(rename = "goalSize")]
    pub goal_size: usize,
    #[serde(rename = "reachedGoal")]
    pub reached_goal: bool,
    pub absorbed: usize,
    #[serde(rename = "passTurns")]
    pub pass_turns: usize,
    pub connected: bool,
    pub info: u8,
    pub rejections: Vec<RejectedTurn>,
}

#[derive(Clone, Debug)]
pub struct Simulation {
    options: SimulationOptions,
    grid: Grid,
    bacteria: Vec<Cell>,
    rng: Rng,
    info: u8,
    turn: usize,
    initial_size: usize,
}

impl Simulation {
    pub fn new(options: SimulationOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let size = options.grid_size;
        let side = options.initial_side();
        let origin = size / 2 - side / 2;
        let grid = Grid::with_block(size, (origin, origin), side);

        let mut rng = Rng::new(options.seed);
        let mut bacteria = Vec::new();
        for x in 0..size {
            for y in 0..size {
                if !grid.get((x, y)) && rng.chance(options.bacteria_density) {
                    bacteria.push((x, y));
                }
            }
        }

        Ok(Self {
            initial_size: grid.count(),
            options,
            grid,
            bacteria,
            rng,
            info: 0,
            turn: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn bacteria(&self) -> &[Cell] {
        &self.bacteria
    }

    pub fn percept(&self) -> AmoebaState {
        let mut state = AmoebaState::from_map(self.grid.clone());
        state.bacteria = self
            .bacteria
            .iter()
            .copied()
            .filter(|&cell| !self.grid.occupied_neighbors(cell).is_empty())
            .collect();
        state
    }

    pub fn step(&mut self, player: &mut Player) -> TurnReport {
        self.turn += 1;
        let mut state = self.percept();
        let periphery = state.periphery.clone();
        let touching: HashSet<Cell> = state.bacteria.iter().copied().collect();
        let budget = n_cells_can_move(self.options.metabolism, state.current_size);

        let outcome = player.play_turn(&mut state, self.info);

        for &cell in &touching {
            self.grid.set(cell, true);
        }
        self.bacteria.retain(|cell| !touching.contains(cell));

        let rejected = match validate_move(
            &self.grid,
            &periphery,
            &outcome.retract,
            &outcome.moves,
            budget,
        ) {
            Ok(next) => {
                self.grid = next;
                None
            }
            Err(error) => {
                warn!(turn = self.turn, %error, "move rejected");
                Some(error)
            }
        };
        self.info = outcome.info;

        let grid = &self.grid;
        self.bacteria.retain(|&cell| !grid.get(cell));
        self.move_bacteria();

        TurnReport {
            turn: self.turn,
            retracted: outcome.retract.len(),
            moved: outcome.moves.len(),
            absorbed: touching.len(),
            size: self.grid.count(),
            info: self.info,
            rejected,
        }
    }

    pub fn run(&mut self, player: &mut Player) -> SimulationSummary {
        let mut absorbed = 0;
        let mut pass_turns = 0;
        let mut rejections = Vec::new();
        while self.turn < self.options.max_turns && self.grid.count() < self.options.goal_size {
            let report = self.step(player);
            absorbed += report.absorbed;
            if report.moved == 0 {
                pass_turns += 1;
            }
            if let Some(error) = report.rejected {
                rejections.push(RejectedTurn {
                    turn: report.turn,
                    reason: error.to_string(),
                });
            }
        }

        let final_size = self.grid.count();
        info!(
            turns = self.turn,
            final_size,
            goal = self.options.goal_size,
            rejected = rejections.len(),
            "simulation finished"
        );
        SimulationSummary {
            turns: self.turn,
            initial_size: self.initial_size,
            final_size,
            goal_size: self.options.goal_size,
            reached_goal: final_size >= self.options.goal_size,
            absorbed,
            pass_turns,
            connected: is_connected(&self.grid),
            info: self.info,
            rejections,
        }
    }

    fn move_bacteria(&mut self) {
        let mut taken: HashSet<Cell> = self.bacteria.iter().copied().collect();
        for idx in 0..self.bacteria.len() {
            let cell = self.bacteria[idx];
            if !self.grid.occupied_neighbors(cell).is_empty() {
                continue;
            }
            let mut options = vec![cell];
            options.extend(
                self.grid
                    .neighbors4(cell)
                    .into_iter()
                    .filter(|next| !self.grid.get(*next) && !taken.contains(next)),
            );
            let Some(next) = self.rng.pick(&options) else {
                continue;
            };
            if next != cell {
                taken.remove(&cell);
                taken.insert(next);
                self.bacteria[idx] = next;
            }
        }
    }
}

pub fn validate_move(
    grid: &Grid,
    periphery: &[Cell],
    retract: &[Cell],
    moves: &[Cell],
    budget: usize,
) -> Result<Grid, MoveError> {
    if retract.len() != moves.len() {
        return Err(MoveError::LengthMismatch {
            retract: retract.len(),
            moves: moves.len(),
        });
    }
    if retract.len() > budget {
        return Err(MoveError::OverBudget {
            count: retract.len(),
            budget,
        });
    }

    let periphery: HashSet<Cell> = periphery.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut next = grid.clone();
    for &cell in retract {
        if !seen.insert(cell) {
            return Err(MoveError::Duplicate(cell));
        }
        if !periphery.contains(&cell) {
            return Err(MoveError::NotPeriphery(cell));
        }
        next.set(cell, false);
    }

    let remaining = next.clone();
    let mut seen = HashSet::new();
    for &cell in moves {
        if !seen.insert(cell) {
            return Err(MoveError::Duplicate(cell));
        }
        if remaining.get(cell) {
            return Err(MoveError::Occupied(cell));
        }
        if remaining.occupied_neighbors(cell).is_empty() {
            return Err(MoveError::Detached(cell));
        }
        next.set(cell, true);
    }

    if !is_connected(&next) {
        return Err(MoveError::Disconnected);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::InfoByte;

    fn line_grid() -> Grid {
        Grid::from_cells(10, &[(2, 2), (3, 2), (4, 2)])
    }

    #[test]
    fn starts_with_a_centred_quarter_goal_square() {
        let sim = Simulation::new(SimulationOptions {
            bacteria_density: 0.0,
            ..SimulationOptions::default()
        })
        .unwrap();
        assert_eq!(sim.grid().count(), 100);
        assert!(sim.grid().get((45, 45)));
        assert!(sim.grid().get((54, 54)));
        assert!(!sim.grid().get((55, 54)));
        assert!(sim.bacteria().is_empty());
    }

    #[test]
    fn invalid_options_are_rejected() {
        let density = SimulationOptions {
            bacteria_density: 1.5,
            ..SimulationOptions::default()
        };
        assert!(matches!(
            Simulation::new(density),
            Err(ConfigError::BacteriaDensity(_))
        ));
        let metabolism = SimulationOptions {
            metabolism: 0.0,
            ..SimulationOptions::default()
        };
        assert!(matches!(
            Simulation::new(metabolism),
            Err(ConfigError::Metabolism(_))
        ));
        let huge = SimulationOptions {
            grid_size: 50_000,
            ..SimulationOptions::default()
        };
        assert!(matches!(
            Simulation::new(huge),
            Err(ConfigError::GridSize { got: 50_000, .. })
        ));
    }

    #[test]
    fn same_seed_places_the_same_bacteria() {
        let options = SimulationOptions {
            seed: 11,
            bacteria_density: 0.05,
            ..SimulationOptions::default()
        };
        let a = Simulation::new(options.clone()).unwrap();
        let b = Simulation::new(options).unwrap();
        assert!(!a.bacteria().is_empty());
        assert_eq!(a.bacteria(), b.bacteria());
    }

    #[test]
    fn percept_lists_only_touching_bacteria() {
        let mut sim = Simulation::new(SimulationOptions {
            bacteria_density: 0.0,
            ..SimulationOptions::default()
        })
        .unwrap();
        sim.bacteria = vec![(44, 50), (10, 10)];
        let state = sim.percept();
        assert_eq!(state.bacteria, vec![(44, 50)]);
        assert_eq!(state.current_size, 100);
        assert_eq!(state.periphery.len(), 36);
    }

    #[test]
    fn players_keep_the_body_connected_across_seeds() {
        for kind in [
            FormationKind::Quadrants,
            FormationKind::Growth,
            FormationKind::ColumnMarch,
        ] {
            for seed in 0..3 {
                let options = SimulationOptions {
                    seed,
                    bacteria_density: 0.05,
                    max_turns: 25,
                    ..SimulationOptions::default()
                };
                let mut player = Player::new(options.player_config(kind)).unwrap();
                let mut sim = Simulation::new(options).unwrap();
                for _ in 0..25 {
                    let report = sim.step(&mut player);
                    assert_eq!(report.rejected, None, "{kind:?} seed {seed}");
                    assert!(is_connected(sim.grid()), "{kind:?} seed {seed}");
                    if kind == FormationKind::ColumnMarch {
                        assert_eq!(usize::from(report.info), report.turn);
                    } else {
                        assert_eq!(InfoByte::decode(report.info).reserved, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn run_stops_at_the_turn_limit_and_counts_absorption() {
        let options = SimulationOptions {
            seed: 3,
            bacteria_density: 0.1,
            max_turns: 10,
            ..SimulationOptions::default()
        };
        let mut player = Player::new(options.player_config(FormationKind::Quadrants)).unwrap();
        let mut sim = Simulation::new(options).unwrap();
        let summary = sim.run(&mut player);
        assert_eq!(summary.turns, 10);
        assert!(summary.absorbed > 0);
        assert_eq!(summary.final_size, summary.initial_size + summary.absorbed);
        assert!(summary.connected);
        assert!(summary.rejections.is_empty());
    }

    #[test]
    fn validate_move_applies_a_legal_turn() {
        let grid = line_grid();
        let next = validate_move(&grid, &grid.periphery(), &[(4, 2)], &[(2, 3)], 1).unwrap();
        assert!(!next.get((4, 2)));
        assert!(next.get((2, 3)));
        assert_eq!(next.count(), 3);
    }

    #[test]
    fn validate_move_rejections() {
        let grid = line_grid();
        let periphery = grid.periphery();
        let check = |retract: &[Cell], moves: &[Cell], budget| {
            validate_move(&grid, &periphery, retract, moves, budget).unwrap_err()
        };

        assert_eq!(
            check(&[(4, 2)], &[], 3),
            MoveError::LengthMismatch {
                retract: 1,
                moves: 0
            }
        );
        assert_eq!(
            check(&[(4, 2), (2, 2)], &[(3, 1), (3, 3)], 1),
            MoveError::OverBudget {
                count: 2,
                budget: 1
            }
        );
        assert_eq!(
            check(&[(4, 2), (4, 2)], &[(3, 1), (3, 3)], 3),
            MoveError::Duplicate((4, 2))
        );
        assert_eq!(check(&[(7, 7)], &[(3, 1)], 3), MoveError::NotPeriphery((7, 7)));
        assert_eq!(check(&[(4, 2)], &[(3, 2)], 3), MoveError::Occupied((3, 2)));
        assert_eq!(check(&[(4, 2)], &[(8, 8)], 3), MoveError::Detached((8, 8)));
        assert_eq!(check(&[(3, 2)], &[(2, 3)], 3), MoveError::Disconnected);
    }
}
