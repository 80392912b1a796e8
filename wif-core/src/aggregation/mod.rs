//! Bit-flag and counter records indexed by slot, for per-flow aggregation state.

pub mod record;
pub mod table;

pub use record::{AggregationRecord, AggregationValue};
pub use table::AggregationTable;
