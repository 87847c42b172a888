#![warn(clippy::uninlined_format_args)]

pub mod snapshot_parser;

pub use snapshot_parser::{SnapshotError, TripSnapshot, TripSnapshotParser};
