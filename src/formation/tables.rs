use crate::error::FormationError;
use crate::types::{AmoebaState, Cell, FormationKind};

use super::quadrants::quadrant_points;
use super::Formation;

const SPACE_CURVE_TABLE: &str = include_str!("data/space_curve.json");
const QUADRATIC_TABLE: &str = include_str!("data/quadratic_spiral.json");

#[derive(Clone, Debug)]
pub struct StaticFormation {
    kind: FormationKind,
    points: Vec<Cell>,
}

impl StaticFormation {
    pub fn space_curve(grid_size: i32) -> Result<Self, FormationError> {
        let points = parse_table("space curve", SPACE_CURVE_TABLE)?;
        Ok(Self::from_points(FormationKind::SpaceCurve, &points, grid_size))
    }

    pub fn quadratic(grid_size: i32) -> Result<Self, FormationError> {
        let points = parse_table("quadratic spiral", QUADRATIC_TABLE)?;
        Ok(Self::from_points(FormationKind::Quadratic, &points, grid_size))
    }

    pub fn quadrants(grid_size: i32) -> Self {
        Self::from_points(
            FormationKind::Quadrants,
            &quadrant_points(grid_size),
            grid_size,
        )
    }

    pub fn from_points(kind: FormationKind, points: &[Cell], grid_size: i32) -> Self {
        let size = grid_size.max(1);
        Self {
            kind,
            points: points
                .iter()
                .map(|&(x, y)| (x.rem_euclid(size), y.rem_euclid(size)))
                .collect(),
        }
    }

    pub fn points(&self) -> &[Cell] {
        &self.points
    }
}

fn parse_table(table: &'static str, text: &str) -> Result<Vec<Cell>, FormationError> {
    let points: Vec<Cell> =
        serde_json::from_str(text).map_err(|source| FormationError::Table { table, source })?;
    if points.is_empty() {
        return Err(FormationError::EmptyTable(table));
    }
    Ok(points)
}

impl Formation for StaticFormation {
    fn kind(&self) -> FormationKind {
        self.kind
    }

    fn next_formation_points(&self, _state: &AmoebaState) -> Vec<Cell> {
        self.points.clone()
    }

    fn next_phase(
        &self,
        _phase: u8,
        _state: &AmoebaState,
        _retract: &[Cell],
        _moves: &[Cell],
    ) -> u8 {
        0
    }
}
