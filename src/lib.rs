//! G-code Toolpath
//!
//! Interprets G-code programs into the two structures a viewer needs.
//!
//! This library provides:
//! - Line tokenization and per-letter parameter extraction
//! - Modal machine state (coordinate mode, deposition)
//! - Toolpath segments split by deposition state
//! - Classified command records with movement grouping
//! - A resumable, batchable parse pass driving all of the above

pub mod commands;
pub mod config;
pub mod machine;
pub mod parser;
pub mod scan;
pub mod toolpath;

// Re-exports for clean public API
pub use commands::{CommandKind, CommandRecord, DisplayRecord, MovementGroup};
pub use config::Config;
pub use machine::{CoordinateMode, Deposition, MachineState, Position};
pub use parser::{ParsedLine, TokenizedLine, parse_line};
pub use scan::{ParseOptions, ParseOutput, Scan, ScanStatus, parse};
pub use toolpath::{Segment, Toolpath};
