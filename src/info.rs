use crate::constants::{DENSITY_COUNTER_MAX, PHASE_COUNT};

const PHASE_SHIFT: u8 = 6;
const DENSITY_SHIFT: u8 = 3;
const MOVING_SHIFT: u8 = 2;

/// Layout, most significant bit first: `phase:2 | density:3 | is_moving:1 | reserved:2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InfoByte {
    pub phase: u8,
    pub density: u8,
    pub is_moving: bool,
    pub reserved: u8,
}

impl InfoByte {
    pub fn new(phase: u8, density: u8, is_moving: bool) -> Self {
        Self {
            phase: phase.min(PHASE_COUNT - 1),
            density: density.min(DENSITY_COUNTER_MAX),
            is_moving,
            reserved: 0,
        }
    }

    pub fn decode(info: u8) -> Self {
        Self {
            phase: info >> PHASE_SHIFT,
            density: (info >> DENSITY_SHIFT) & 0b111,
            is_moving: (info >> MOVING_SHIFT) & 0b1 == 1,
            reserved: info & 0b11,
        }
    }

    pub fn encode(self) -> u8 {
        ((self.phase & 0b11) << PHASE_SHIFT)
            | ((self.density & 0b111) << DENSITY_SHIFT)
            | (u8::from(self.is_moving) << MOVING_SHIFT)
            | (self.reserved & 0b11)
    }

    pub fn bump_density(&mut self, pressured: bool) {
        self.density = if pressured {
            (self.density + 1).min(DENSITY_COUNTER_MAX)
        } else {
            self.density.saturating_sub(1)
        };
    }
}
