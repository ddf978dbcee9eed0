//! Command Classifier
//!
//! Maps each tokenized line to a typed, described and colored record.
//! Independent of machine state: descriptions show the raw values written on
//! the line, relative moves are not resolved.

use std::fmt;

use serde::Serialize;

use crate::parser::{Letter, ParsedLine, Parameters, TokenizedLine, parse_line};

/// Record categories, in the order the node graph knows them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Movement,
    Temperature,
    BedTemp,
    Fan,
    Home,
    Other,
}

impl CommandKind {
    /// Display color as a `#rrggbb` string
    pub fn color(self) -> &'static str {
        match self {
            CommandKind::Movement => "#4444ff",
            CommandKind::Temperature => "#ff4444",
            CommandKind::BedTemp => "#ff8800",
            CommandKind::Fan => "#44ff44",
            CommandKind::Home => "#aa44ff",
            CommandKind::Other => "#888888",
        }
    }

    /// Node title shown above the description
    pub fn title(self) -> &'static str {
        match self {
            CommandKind::Movement => "Movement",
            CommandKind::Temperature => "Temperature",
            CommandKind::BedTemp => "Bed Temperature",
            CommandKind::Fan => "Fan",
            CommandKind::Home => "Home",
            CommandKind::Other => "Other",
        }
    }
}

/// The set of positional axes (X, Y, Z) a line specifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AxisSet(u8);

impl AxisSet {
    pub fn of(params: &Parameters) -> Self {
        Letter::AXES
            .iter()
            .enumerate()
            .filter(|(_, axis)| params.contains(**axis))
            .fold(AxisSet(0), |set, (bit, _)| AxisSet(set.0 | 1 << bit))
    }

    pub fn contains(self, axis: Letter) -> bool {
        Letter::AXES
            .iter()
            .position(|a| *a == axis)
            .is_some_and(|bit| self.0 & (1 << bit) != 0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AxisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in Letter::AXES {
            if self.contains(axis) {
                write!(f, "{}", axis.as_char())?;
            }
        }
        Ok(())
    }
}

/// One classified instruction line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRecord {
    pub kind: CommandKind,
    pub description: String,
    pub color: &'static str,
    /// Normalized (uppercased, trimmed) source text
    pub original: String,
    /// 1-based line number in the source text
    pub line: usize,
    #[serde(skip)]
    pub axes: AxisSet,
}

impl CommandRecord {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn is_movement(&self) -> bool {
        self.kind == CommandKind::Movement
    }
}

/// A classification rule: the first rule whose predicate holds wins
struct Rule {
    kind: CommandKind,
    matches: fn(&TokenizedLine) -> bool,
    describe: fn(&TokenizedLine) -> String,
}

/// Precedence table. Order matters; `Other` must stay last.
const RULES: &[Rule] = &[
    Rule {
        kind: CommandKind::Temperature,
        matches: is_hotend,
        describe: describe_hotend,
    },
    Rule {
        kind: CommandKind::BedTemp,
        matches: is_bed,
        describe: describe_bed,
    },
    Rule {
        kind: CommandKind::Movement,
        matches: is_move,
        describe: describe_move,
    },
    Rule {
        kind: CommandKind::Fan,
        matches: is_fan,
        describe: describe_fan,
    },
    Rule {
        kind: CommandKind::Home,
        matches: is_home,
        describe: describe_home,
    },
    Rule {
        kind: CommandKind::Other,
        matches: always,
        describe: describe_other,
    },
];

fn is_hotend(line: &TokenizedLine) -> bool {
    line.has_any_code(&["M104", "M109"])
}

fn is_bed(line: &TokenizedLine) -> bool {
    line.has_any_code(&["M140", "M190"])
}

fn is_move(line: &TokenizedLine) -> bool {
    line.has_any_code(&crate::machine::MOVE_CODES)
}

fn is_fan(line: &TokenizedLine) -> bool {
    line.has_any_code(&["M106", "M107"])
}

fn is_home(line: &TokenizedLine) -> bool {
    line.has_code("G28")
}

fn always(_: &TokenizedLine) -> bool {
    true
}

fn describe_hotend(line: &TokenizedLine) -> String {
    format!("Set Hotend to {}°C", line.params.raw(Letter::S).unwrap_or("0"))
}

fn describe_bed(line: &TokenizedLine) -> String {
    format!("Set Bed to {}°C", line.params.raw(Letter::S).unwrap_or("0"))
}

fn describe_move(line: &TokenizedLine) -> String {
    let mut description = String::from("Move to");
    for letter in [Letter::X, Letter::Y, Letter::Z, Letter::E] {
        if let Some(raw) = line.params.raw(letter) {
            description.push_str(&format!(" {}:{}", letter.as_char(), raw));
        }
    }
    description
}

fn describe_fan(line: &TokenizedLine) -> String {
    if line.has_code("M107") {
        "Fan Off".to_string()
    } else {
        format!("Fan Speed: {}", line.params.raw(Letter::S).unwrap_or("255"))
    }
}

fn describe_home(_: &TokenizedLine) -> String {
    "Home Axes".to_string()
}

fn describe_other(line: &TokenizedLine) -> String {
    line.text.clone()
}

/// Classify one tokenized line
pub fn classify(line_number: usize, line: &TokenizedLine) -> CommandRecord {
    let rule = RULES
        .iter()
        .find(|rule| (rule.matches)(line))
        .unwrap_or(&RULES[RULES.len() - 1]);

    CommandRecord {
        kind: rule.kind,
        description: (rule.describe)(line),
        color: rule.kind.color(),
        original: line.text.clone(),
        line: line_number,
        axes: AxisSet::of(&line.params),
    }
}

/// Classify every instruction line of a program, in file order
pub fn classify_text(text: &str) -> Vec<CommandRecord> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| match parse_line(raw) {
            ParsedLine::Instruction(line) => Some(classify(idx + 1, &line)),
            ParsedLine::Skip => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_one(text: &str) -> CommandRecord {
        match parse_line(text) {
            ParsedLine::Instruction(line) => classify(1, &line),
            ParsedLine::Skip => panic!("Expected instruction: {text}"),
        }
    }

    #[test]
    fn test_hotend_temperature() {
        let record = classify_one("M104 S210");
        assert_eq!(record.kind, CommandKind::Temperature);
        assert_eq!(record.description, "Set Hotend to 210°C");
        assert_eq!(record.color, "#ff4444");

        let record = classify_one("M109");
        assert_eq!(record.description, "Set Hotend to 0°C");
    }

    #[test]
    fn test_bed_temperature() {
        let record = classify_one("M190 S60");
        assert_eq!(record.kind, CommandKind::BedTemp);
        assert_eq!(record.description, "Set Bed to 60°C");
        assert_eq!(record.title(), "Bed Temperature");
    }

    #[test]
    fn test_movement_lists_present_axes_in_order() {
        let record = classify_one("G1 E0.5 Y-2 X10.50 F1500");
        assert_eq!(record.kind, CommandKind::Movement);
        assert_eq!(record.description, "Move to X:10.50 Y:-2 E:0.5");
        assert_eq!(record.axes.to_string(), "XY");
    }

    #[test]
    fn test_movement_leading_zero_code() {
        let record = classify_one("G01 Z0.2");
        assert_eq!(record.kind, CommandKind::Movement);
        assert_eq!(record.description, "Move to Z:0.2");
    }

    #[test]
    fn test_move_prefix_is_not_a_move() {
        assert_eq!(classify_one("G10").kind, CommandKind::Other);
        assert_eq!(classify_one("G17").kind, CommandKind::Other);
    }

    #[test]
    fn test_fan() {
        assert_eq!(classify_one("M106 S128").description, "Fan Speed: 128");
        assert_eq!(classify_one("M106").description, "Fan Speed: 255");
        assert_eq!(classify_one("M107").description, "Fan Off");
    }

    #[test]
    fn test_home() {
        let record = classify_one("G28 X Y");
        assert_eq!(record.kind, CommandKind::Home);
        assert_eq!(record.description, "Home Axes");
        assert_eq!(record.color, "#aa44ff");
    }

    #[test]
    fn test_other_keeps_text() {
        let record = classify_one("m82 ; absolute extrusion");
        assert_eq!(record.kind, CommandKind::Other);
        assert_eq!(record.description, "M82 ; ABSOLUTE EXTRUSION");
        assert_eq!(record.original, "M82 ; ABSOLUTE EXTRUSION");
    }

    #[test]
    fn test_precedence_temperature_before_move() {
        let record = classify_one("G1 X10 M104 S200");
        assert_eq!(record.kind, CommandKind::Temperature);
    }

    #[test]
    fn test_precedence_move_before_home() {
        let record = classify_one("G28 G1 X0");
        assert_eq!(record.kind, CommandKind::Movement);
    }

    #[test]
    fn test_rule_table_ends_with_catch_all() {
        let last = RULES.last().expect("rules");
        assert_eq!(last.kind, CommandKind::Other);
    }

    #[test]
    fn test_classify_text_line_numbers() {
        let records = classify_text("; header\nG28\n\nM104 S200\n");
        let lines: Vec<_> = records.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_axis_set() {
        let record = classify_one("G1 Z1 X1");
        assert!(record.axes.contains(Letter::X));
        assert!(!record.axes.contains(Letter::Y));
        assert!(record.axes.contains(Letter::Z));
        assert!(classify_one("G1 E1").axes.is_empty());
    }
}
