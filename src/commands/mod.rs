//! Command records for the node-graph view
//!
//! Classification of instruction lines and grouping of adjacent movements.

pub mod classify;
pub mod group;

pub use classify::{AxisSet, CommandKind, CommandRecord, classify, classify_text};
pub use group::{DisplayRecord, MovementGroup, group_movements, ungrouped};
