//! Core domain for the choreboard sync: the wire-level record model, row
//! validation, the recurrence vocabulary, and the sequential sync driver.
//!
//! Network I/O lives behind the [`RecordStore`] trait so cycles can run
//! against an in-memory store in tests.

pub mod engine;
pub mod errors;
pub mod model;
pub mod record;
pub mod store;

pub use engine::{decide, run_cycle, today, Decision, RunSummary};
pub use errors::{ParseError, StoreError, SyncError};
pub use model::{Frequency, Row, SelectValue};
pub use record::{PropertyPatch, PropertyWrite, RawProperty, RawRow, SelectOption};
pub use store::RecordStore;
