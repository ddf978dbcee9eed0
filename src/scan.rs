//! Resumable parse pass
//!
//! One ordered scan over the source lines feeds both the toolpath builder and
//! the classifier. The scan can be advanced in batches so a host can yield to
//! its own event loop between them; however it is split, the result equals an
//! uninterrupted pass. Dropping an unfinished [`Scan`] discards its output.

use serde::{Deserialize, Serialize};

use crate::commands::{CommandRecord, DisplayRecord, classify, group_movements, ungrouped};
use crate::machine::MachineState;
use crate::parser::{ParsedLine, parse_line};
use crate::toolpath::{Bounds, Segment, Toolpath, ToolpathBuilder};

/// Lines processed per batch when the host does not choose
pub const DEFAULT_BATCH_SIZE: usize = 2000;

/// Options for one parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Collapse adjacent same-axis movements into groups
    pub grouped: bool,
}

/// Where a scan stands after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    InProgress { processed: usize, total: usize },
    Finished,
}

/// Both views of a parsed program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    pub toolpath: Toolpath,
    pub records: Vec<DisplayRecord>,
    /// Raw lines read, blank and comment lines included
    pub lines_scanned: usize,
}

/// Counts describing a parse, for hosts that report them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub lines_scanned: usize,
    pub records: usize,
    pub display_records: usize,
    pub segments: usize,
    pub printing_segments: usize,
    pub travel_segments: usize,
    pub move_count: usize,
    pub bounds: Option<Bounds>,
}

impl ParseOutput {
    pub fn summary(&self) -> Summary {
        Summary {
            lines_scanned: self.lines_scanned,
            records: self.records.iter().map(DisplayRecord::record_count).sum(),
            display_records: self.records.len(),
            segments: self.toolpath.segments.len(),
            printing_segments: self.toolpath.printing().count(),
            travel_segments: self.toolpath.traveling().count(),
            move_count: self.toolpath.move_count,
            bounds: self.toolpath.bounds(),
        }
    }
}

/// An in-progress parse over one program text
///
/// Iterating a scan processes one raw line per item and yields its 1-based
/// line number.
#[derive(Debug)]
pub struct Scan<'a> {
    lines: std::str::Lines<'a>,
    total_lines: usize,
    processed: usize,
    options: ParseOptions,
    toolpath: ToolpathBuilder,
    records: Vec<CommandRecord>,
}

impl<'a> Scan<'a> {
    /// Start a scan with fresh machine state
    pub fn new(text: &'a str, options: ParseOptions) -> Self {
        Self {
            lines: text.lines(),
            total_lines: text.lines().count(),
            processed: 0,
            options,
            toolpath: ToolpathBuilder::new(),
            records: Vec::new(),
        }
    }

    /// Process up to `max_lines` further lines
    pub fn step(&mut self, max_lines: usize) -> ScanStatus {
        let advanced = self.by_ref().take(max_lines).count();

        log::debug!(
            "scanned {} lines ({}/{}, {}%)",
            advanced,
            self.processed,
            self.total_lines,
            self.progress_percent()
        );

        self.status()
    }

    pub fn status(&self) -> ScanStatus {
        if self.is_finished() {
            ScanStatus::Finished
        } else {
            ScanStatus::InProgress {
                processed: self.processed,
                total: self.total_lines,
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.processed >= self.total_lines
    }

    pub fn lines_processed(&self) -> usize {
        self.processed
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Share of lines processed, rounded to a whole percent
    pub fn progress_percent(&self) -> u8 {
        if self.total_lines == 0 {
            return 100;
        }
        ((self.processed as f64 / self.total_lines as f64) * 100.0).round() as u8
    }

    /// Machine state as left by the last processed line
    pub fn machine(&self) -> &MachineState {
        self.toolpath.machine()
    }

    /// Segments closed so far
    pub fn segments(&self) -> &[Segment] {
        self.toolpath.segments()
    }

    /// Records classified so far, always ungrouped
    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    /// Process the remaining lines and produce the final output
    pub fn finish(mut self) -> ParseOutput {
        if !self.is_finished() {
            self.step(usize::MAX);
        }

        let toolpath = self.toolpath.finish();
        let records = if self.options.grouped {
            group_movements(self.records)
        } else {
            ungrouped(self.records)
        };

        log::debug!(
            "parse finished: {} lines, {} segments, {} display records",
            self.total_lines,
            toolpath.segments.len(),
            records.len()
        );

        ParseOutput {
            toolpath,
            records,
            lines_scanned: self.total_lines,
        }
    }
}

impl Iterator for Scan<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let raw = self.lines.next()?;
        self.processed += 1;

        if let ParsedLine::Instruction(line) = parse_line(raw) {
            self.toolpath.feed(&line);
            self.records.push(classify(self.processed, &line));
        }

        Some(self.processed)
    }
}

/// Parse a whole program in one uninterrupted pass
pub fn parse(text: &str, options: &ParseOptions) -> ParseOutput {
    Scan::new(text, *options).finish()
}
