//! Modal machine state
//!
//! Tracks the running position, coordinate mode and deposition state across
//! the lines of one parse. A fresh [`MachineState`] is created for every
//! parse; nothing carries over between files.

use serde::Serialize;

use crate::parser::{Letter, TokenizedLine};

/// Switches to absolute coordinates
pub const ABSOLUTE_MODE: &str = "G90";
/// Switches to relative coordinates
pub const RELATIVE_MODE: &str = "G91";
/// Rapid and linear moves
pub const MOVE_CODES: [&str; 2] = ["G0", "G1"];

/// A point in the viewer frame (Y is flipped relative to the machine frame)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateMode {
    #[default]
    Absolute,
    Relative,
}

/// Whether a move lays down material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Deposition {
    Printing,
    #[default]
    Traveling,
}

impl Deposition {
    /// Deposition implied by a move line's E value
    pub fn from_extrusion(e: f64) -> Self {
        if e > 0.0 {
            Deposition::Printing
        } else {
            Deposition::Traveling
        }
    }

    pub fn is_printing(self) -> bool {
        self == Deposition::Printing
    }
}

/// What interpreting one line did to the machine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineEffect {
    /// New deposition state, when the line flipped it
    pub transition: Option<Deposition>,
    /// New position, when the line moved the machine
    pub moved_to: Option<Position>,
}

/// Position plus modal flags for one parse pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MachineState {
    position: Position,
    mode: CoordinateMode,
    deposition: Deposition,
}

impl MachineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn mode(&self) -> CoordinateMode {
        self.mode
    }

    pub fn deposition(&self) -> Deposition {
        self.deposition
    }

    /// Interpret one line against the current state
    ///
    /// Order within a line: mode directives, then the deposition state of a
    /// move line carrying `E`, then its position change. A move line without
    /// `E` keeps the current deposition state.
    pub fn apply(&mut self, line: &TokenizedLine) -> LineEffect {
        let mut effect = LineEffect::default();

        if line.has_code(ABSOLUTE_MODE) {
            self.mode = CoordinateMode::Absolute;
        }
        if line.has_code(RELATIVE_MODE) {
            self.mode = CoordinateMode::Relative;
        }

        if !line.has_any_code(&MOVE_CODES) {
            return effect;
        }

        if let Some(e) = line.params.get(Letter::E) {
            let deposition = Deposition::from_extrusion(e);
            if deposition != self.deposition {
                self.deposition = deposition;
                effect.transition = Some(deposition);
            }
        }

        if let Some(next) = self.target(line) {
            self.position = next;
            effect.moved_to = Some(next);
        }

        effect
    }

    /// Position a move line reaches, `None` when it names no axis
    fn target(&self, line: &TokenizedLine) -> Option<Position> {
        let mut next = self.position;
        let mut moved = false;

        for axis in Letter::AXES {
            let Some(value) = line.params.get(axis) else {
                continue;
            };
            moved = true;
            // The viewer frame flips Y, for absolute values and deltas alike.
            let value = if axis == Letter::Y { -value } else { value };
            let coordinate = match axis {
                Letter::X => &mut next.x,
                Letter::Y => &mut next.y,
                _ => &mut next.z,
            };
            match self.mode {
                CoordinateMode::Absolute => *coordinate = value,
                CoordinateMode::Relative => *coordinate += value,
            }
        }

        moved.then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParsedLine, parse_line};

    fn apply(state: &mut MachineState, text: &str) -> LineEffect {
        match parse_line(text) {
            ParsedLine::Instruction(line) => state.apply(&line),
            ParsedLine::Skip => panic!("Expected instruction: {text}"),
        }
    }

    #[test]
    fn test_absolute_move_flips_y() {
        let mut state = MachineState::new();
        let effect = apply(&mut state, "G1 X10 Y20 Z0.3");

        assert_eq!(effect.moved_to, Some(Position::new(10.0, -20.0, 0.3)));
        assert_eq!(state.position(), Position::new(10.0, -20.0, 0.3));
    }

    #[test]
    fn test_absolute_keeps_missing_axes() {
        let mut state = MachineState::new();
        apply(&mut state, "G1 X10 Y20 Z1");
        apply(&mut state, "G0 Z5");

        assert_eq!(state.position(), Position::new(10.0, -20.0, 5.0));
    }

    #[test]
    fn test_relative_deltas_flip_y() {
        let mut state = MachineState::new();
        apply(&mut state, "G91");
        apply(&mut state, "G1 X1");
        apply(&mut state, "G1 Y1");

        assert_eq!(state.mode(), CoordinateMode::Relative);
        assert_eq!(state.position(), Position::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn test_mode_applies_before_move_on_same_line() {
        let mut state = MachineState::new();
        apply(&mut state, "G1 X5");
        apply(&mut state, "G91 G1 X5");

        assert_eq!(state.position().x, 10.0);
    }

    #[test]
    fn test_mode_persists_until_changed() {
        let mut state = MachineState::new();
        apply(&mut state, "G91");
        apply(&mut state, "M104 S200");
        apply(&mut state, "G1 X2");
        apply(&mut state, "G1 X2");
        apply(&mut state, "G90");
        apply(&mut state, "G1 X1");

        assert_eq!(state.mode(), CoordinateMode::Absolute);
        assert_eq!(state.position().x, 1.0);
    }

    #[test]
    fn test_move_without_axes_records_nothing() {
        let mut state = MachineState::new();
        let effect = apply(&mut state, "G1 F1500");

        assert_eq!(effect.moved_to, None);
        assert_eq!(state.position(), Position::ORIGIN);
    }

    #[test]
    fn test_deposition_threshold() {
        assert_eq!(Deposition::from_extrusion(0.01), Deposition::Printing);
        assert_eq!(Deposition::from_extrusion(0.0), Deposition::Traveling);
        assert_eq!(Deposition::from_extrusion(-1.0), Deposition::Traveling);
    }

    #[test]
    fn test_move_without_e_keeps_deposition() {
        let mut state = MachineState::new();
        apply(&mut state, "G1 X10 E1");
        let effect = apply(&mut state, "G1 X20");

        assert_eq!(effect.transition, None);
        assert_eq!(effect.moved_to, Some(Position::new(20.0, 0.0, 0.0)));
        assert_eq!(state.deposition(), Deposition::Printing);

        apply(&mut state, "G1 E-0.5");
        apply(&mut state, "G0 X0 F3000");
        assert_eq!(state.deposition(), Deposition::Traveling);
    }

    #[test]
    fn test_restated_position_is_recorded() {
        let mut state = MachineState::new();
        apply(&mut state, "G1 X10 Y10");
        let effect = apply(&mut state, "G1 X10 Y10");

        assert_eq!(effect.moved_to, Some(Position::new(10.0, -10.0, 0.0)));
    }

    #[test]
    fn test_deposition_changes_without_axes() {
        let mut state = MachineState::new();
        let effect = apply(&mut state, "G1 E2");

        assert_eq!(effect.transition, Some(Deposition::Printing));
        assert_eq!(effect.moved_to, None);

        let effect = apply(&mut state, "G1 E-0.8");
        assert_eq!(effect.transition, Some(Deposition::Traveling));
    }

    #[test]
    fn test_non_move_lines_leave_deposition_alone() {
        let mut state = MachineState::new();
        apply(&mut state, "G1 X1 E1");
        let effect = apply(&mut state, "G92 E0");

        assert_eq!(effect, LineEffect::default());
        assert_eq!(state.deposition(), Deposition::Printing);
    }

    #[test]
    fn test_malformed_axis_is_skipped() {
        let mut state = MachineState::new();
        apply(&mut state, "G1 X3 Y--2");

        assert_eq!(state.position(), Position::new(3.0, 0.0, 0.0));
    }
}
