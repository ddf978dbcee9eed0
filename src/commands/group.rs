//! Sequential-Movement Grouper
//!
//! Collapses each maximal run of adjacent movement records that specify the
//! same axes into one group. Grouping is all-or-nothing: in grouped mode a
//! lone movement still becomes a group of one.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::commands::classify::{CommandKind, CommandRecord};

/// A run of consecutive movements sharing one axis set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementGroup {
    description: String,
    color: &'static str,
    count: usize,
    members: Vec<CommandRecord>,
}

impl MovementGroup {
    /// `members` is never empty; the grouper only flushes non-empty runs.
    fn new(members: Vec<CommandRecord>) -> Self {
        let count = members.len();
        Self {
            description: format!("Group of {count} movements"),
            color: members[0].color,
            count,
            members,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn color(&self) -> &'static str {
        self.color
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn members(&self) -> &[CommandRecord] {
        &self.members
    }

    pub fn first(&self) -> &CommandRecord {
        &self.members[0]
    }

    pub fn last(&self) -> &CommandRecord {
        &self.members[self.count - 1]
    }

    /// Source lines spanned by the group, first to last member
    pub fn line_range(&self) -> RangeInclusive<usize> {
        self.first().line..=self.last().line
    }
}

/// What the node graph displays: a single record or a movement group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayRecord {
    Command(CommandRecord),
    MovementGroup(MovementGroup),
}

impl DisplayRecord {
    pub fn description(&self) -> &str {
        match self {
            DisplayRecord::Command(record) => &record.description,
            DisplayRecord::MovementGroup(group) => group.description(),
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            DisplayRecord::Command(record) => record.color,
            DisplayRecord::MovementGroup(group) => group.color(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DisplayRecord::Command(record) => record.title(),
            DisplayRecord::MovementGroup(_) => CommandKind::Movement.title(),
        }
    }

    /// Number of source records behind this entry
    pub fn record_count(&self) -> usize {
        match self {
            DisplayRecord::Command(_) => 1,
            DisplayRecord::MovementGroup(group) => group.count(),
        }
    }
}

/// Wrap every record as-is, for ungrouped display
pub fn ungrouped(records: Vec<CommandRecord>) -> Vec<DisplayRecord> {
    records.into_iter().map(DisplayRecord::Command).collect()
}

/// Replace each run of same-axis movements with a group
pub fn group_movements(records: Vec<CommandRecord>) -> Vec<DisplayRecord> {
    let mut output = Vec::with_capacity(records.len());
    let mut run: Vec<CommandRecord> = Vec::new();

    for record in records {
        if record.is_movement() {
            if run.last().is_some_and(|last| last.axes != record.axes) {
                flush_run(&mut run, &mut output);
            }
            run.push(record);
        } else {
            flush_run(&mut run, &mut output);
            output.push(DisplayRecord::Command(record));
        }
    }
    flush_run(&mut run, &mut output);

    output
}

fn flush_run(run: &mut Vec<CommandRecord>, output: &mut Vec<DisplayRecord>) {
    if !run.is_empty() {
        output.push(DisplayRecord::MovementGroup(MovementGroup::new(
            std::mem::take(run),
        )));
    }
}
