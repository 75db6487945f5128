//! Core data models for the segment engine.
//!
//! Packets come in, rows and a run result go out, and hand-off records carry
//! the parts external writers need.

mod audit;
mod clock;
mod handoff;
mod packet;
mod row;
mod run_result;
mod segment;

pub use audit::AuditStep;
pub use clock::{ClockTime, MINUTES_PER_DAY};
pub use handoff::{ExportLine, LedgerEntry, WorklogEntry};
pub use packet::{ExclusionTag, Packet};
pub use row::{Bucket, Row, RowStatus, Shape};
pub use run_result::{RunResult, RunSummary};
pub use segment::{LpiPayType, PayType, Segment, SegmentLabel};
