use serde::{Deserialize, Serialize};

use crate::grid::Grid;

pub type Cell = (i32, i32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormationKind {
    Growth,
    SpaceCurve,
    Quadratic,
    #[default]
    Quadrants,
    ColumnMarch,
}

impl FormationKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "growth" | "rake" => Some(Self::Growth),
            "space-curve" | "curve" => Some(Self::SpaceCurve),
            "quadratic" | "spiral" => Some(Self::Quadratic),
            "quadrants" => Some(Self::Quadrants),
            "column-march" | "march" => Some(Self::ColumnMarch),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::SpaceCurve => "space-curve",
            Self::Quadratic => "quadratic",
            Self::Quadrants => "quadrants",
            Self::ColumnMarch => "column-march",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AmoebaState {
    pub amoeba_map: Grid,
    pub periphery: Vec<Cell>,
    pub bacteria: Vec<Cell>,
    pub current_size: usize,
}

impl AmoebaState {
    pub fn from_map(amoeba_map: Grid) -> Self {
        let periphery = amoeba_map.periphery();
        let current_size = amoeba_map.count();
        Self {
            amoeba_map,
            periphery,
            bacteria: Vec::new(),
            current_size,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    pub retract: Vec<Cell>,
    #[serde(rename = "move")]
    pub moves: Vec<Cell>,
    pub info: u8,
}

impl TurnOutcome {
    pub fn is_pass(&self) -> bool {
        self.retract.is_empty() && self.moves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formation_kind_parse_accepts_names_and_aliases() {
        assert_eq!(FormationKind::parse("growth"), Some(FormationKind::Growth));
        assert_eq!(FormationKind::parse("rake"), Some(FormationKind::Growth));
        assert_eq!(
            FormationKind::parse("space-curve"),
            Some(FormationKind::SpaceCurve)
        );
        assert_eq!(FormationKind::parse("spiral"), Some(FormationKind::Quadratic));
        assert_eq!(FormationKind::parse("quadrants"), Some(FormationKind::Quadrants));
        assert_eq!(FormationKind::parse("march"), Some(FormationKind::ColumnMarch));
        assert_eq!(FormationKind::parse("snake"), None);
    }

    #[test]
    fn formation_kind_names_round_trip() {
        for kind in [
            FormationKind::Growth,
            FormationKind::SpaceCurve,
            FormationKind::Quadratic,
            FormationKind::Quadrants,
            FormationKind::ColumnMarch,
        ] {
            assert_eq!(FormationKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn outcome_serializes_move_field_name() {
        let outcome = TurnOutcome {
            retract: vec![(1, 2)],
            moves: vec![(3, 4)],
            info: 9,
        };
        let text = serde_json::to_string(&outcome).unwrap_or_default();
        assert_eq!(text, r#"{"retract":[[1,2]],"move":[[3,4]],"info":9}"#);
        assert!(!outcome.is_pass());
    }
}
