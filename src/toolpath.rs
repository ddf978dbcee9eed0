//! Toolpath segmentation
//!
//! Turns interpreted moves into polylines, one per run of constant
//! deposition state. Consecutive segments share their boundary point so a
//! viewer draws no gap where printing starts or stops.

use serde::Serialize;

use crate::machine::{Deposition, MachineState, Position};
use crate::parser::{ParsedLine, TokenizedLine, parse_line};

/// A polyline of at least two points sharing one deposition state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub deposition: Deposition,
    pub points: Vec<Position>,
}

impl Segment {
    pub fn first(&self) -> Option<Position> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Position> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_printing(&self) -> bool {
        self.deposition.is_printing()
    }
}

/// Accumulates points and closes a segment on every deposition flip
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    points: Vec<Position>,
    state: Deposition,
    closed: Vec<Segment>,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposition state of the open point list
    pub fn state(&self) -> Deposition {
        self.state
    }

    /// Segments closed so far, in file order
    pub fn segments(&self) -> &[Segment] {
        &self.closed
    }

    /// Points of the segment still being built
    pub fn open_points(&self) -> &[Position] {
        &self.points
    }

    pub fn push(&mut self, point: Position) {
        self.points.push(point);
    }

    /// Switch to a new deposition state
    ///
    /// Two or more open points are closed under the prior state and the last
    /// one seeds the next segment. A single open point is kept as that seed.
    pub fn transition(&mut self, next: Deposition) {
        if next == self.state {
            return;
        }

        if self.points.len() >= 2 {
            self.close();
        }
        self.state = next;
    }

    /// Close the open list if it forms a segment and return everything
    pub fn finish(mut self) -> Vec<Segment> {
        if self.points.len() >= 2 {
            self.close();
        }
        self.closed
    }

    fn close(&mut self) {
        let seed = self.points.last().copied().into_iter().collect();
        let points = std::mem::replace(&mut self.points, seed);

        log::trace!(
            "closing {:?} segment #{} with {} points",
            self.state,
            self.closed.len(),
            points.len()
        );

        self.closed.push(Segment {
            deposition: self.state,
            points,
        });
    }
}

/// Axis-aligned box around every toolpath point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    fn from_point(point: Position) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    fn include(&mut self, point: Position) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    pub fn size(&self) -> Position {
        Position::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }
}

/// Finished toolpath of one parse
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Toolpath {
    pub segments: Vec<Segment>,
    /// Number of move lines that named at least one axis
    pub move_count: usize,
}

impl Toolpath {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn printing(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_printing())
    }

    pub fn traveling(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| !s.is_printing())
    }

    /// Bounding box of all segment points, `None` for an empty toolpath
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.segments.iter().flat_map(|s| s.points.iter().copied());
        let mut bounds = Bounds::from_point(points.next()?);
        points.for_each(|p| bounds.include(p));
        Some(bounds)
    }
}

/// Machine state plus segmenter, fed one tokenized line at a time
#[derive(Debug, Clone, Default)]
pub struct ToolpathBuilder {
    machine: MachineState,
    segmenter: Segmenter,
    move_count: usize,
}

impl ToolpathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &TokenizedLine) {
        let effect = self.machine.apply(line);

        if let Some(next) = effect.transition {
            self.segmenter.transition(next);
        }
        if let Some(point) = effect.moved_to {
            self.move_count += 1;
            self.segmenter.push(point);
        }
    }

    pub fn machine(&self) -> &MachineState {
        &self.machine
    }

    pub fn segments(&self) -> &[Segment] {
        self.segmenter.segments()
    }

    pub fn finish(self) -> Toolpath {
        Toolpath {
            segments: self.segmenter.finish(),
            move_count: self.move_count,
        }
    }
}

/// Build the toolpath of a whole program in one go
pub fn build_toolpath(text: &str) -> Toolpath {
    let mut builder = ToolpathBuilder::new();
    for raw in text.lines() {
        if let ParsedLine::Instruction(line) = parse_line(raw) {
            builder.feed(&line);
        }
    }
    builder.finish()
}
