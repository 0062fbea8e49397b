//! Row state machine and the sequential sync driver.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::errors::SyncError;
use crate::model::{
    Row, PROP_LAST_DONE, PROP_NEXT_DUE, PROP_STATUS, STATUS_DONE, STATUS_PENDING, STATUS_TODO,
    ZONE,
};
use crate::record::{PropertyPatch, PropertyWrite};
use crate::store::RecordStore;

/// Action selected for one row this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Row was completed: reset it to pending and reschedule.
    Completed {
        last_done: NaiveDate,
        next_due: NaiveDate,
    },
    /// Pending row has reached its due date: surface it as to-do.
    Due,
    /// Nothing to do this cycle.
    Inert,
}

/// Decide what to do with one row.
///
/// Completion treats the row's last-edited date as the completion moment,
/// not wall-clock now. A pending row with no recorded due date is always
/// due, and the due comparison is inclusive of the due date itself.
pub fn decide(row: &Row, today: NaiveDate) -> Decision {
    match row.status.name() {
        Some(STATUS_DONE) => {
            let last_done = row.last_edited;
            Decision::Completed {
                last_done,
                next_due: row.frequency.advance(last_done),
            }
        }
        Some(STATUS_PENDING) => match row.next_due {
            Some(due) if today < due => Decision::Inert,
            _ => Decision::Due,
        },
        _ => Decision::Inert,
    }
}

/// Today's calendar date in the fixed zone.
pub fn today() -> NaiveDate {
    Utc::now().with_timezone(&ZONE).date_naive()
}

/// Outcome counts for one sync cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows fetched and validated.
    pub rows: usize,
    /// Rows reset from done back to pending.
    pub completed: usize,
    /// Pending rows surfaced as to-do.
    pub activated: usize,
    /// Write-backs that failed and were skipped over.
    pub update_failures: usize,
}

/// Run one sync cycle against the store.
///
/// Every row is fetched and validated up front; the first parse failure
/// aborts the run before any write-back is attempted. Write-back failures
/// are isolated per row: logged, counted, and skipped over. Rows are
/// updated strictly sequentially, in fetch order.
pub async fn run_cycle<S: RecordStore + ?Sized>(store: &S) -> Result<RunSummary, SyncError> {
    let raw_rows = store.fetch_all_rows().await?;
    let rows = raw_rows
        .iter()
        .map(Row::parse)
        .collect::<Result<Vec<_>, _>>()?;

    let today = today();
    let mut summary = RunSummary {
        rows: rows.len(),
        ..RunSummary::default()
    };

    for row in &rows {
        let decision = decide(row, today);
        debug!("decision for {}: {:?}", row.id, decision);

        match decision {
            Decision::Completed {
                last_done,
                next_due,
            } => {
                info!("updating {} as completed, next due {}", row.id, next_due);
                match store
                    .update_row_properties(&row.id, completed_patch(last_done, next_due))
                    .await
                {
                    Ok(()) => summary.completed += 1,
                    Err(err) => {
                        warn!("failed to update row {}: {}", row.id, err);
                        summary.update_failures += 1;
                    }
                }
            }
            Decision::Due => {
                info!("updating {} as to-do", row.id);
                match store.update_row_properties(&row.id, due_patch()).await {
                    Ok(()) => summary.activated += 1,
                    Err(err) => {
                        warn!("failed to update row {}: {}", row.id, err);
                        summary.update_failures += 1;
                    }
                }
            }
            Decision::Inert => {}
        }
    }

    Ok(summary)
}

/// Patch resetting a completed row to pending with fresh dates.
fn completed_patch(last_done: NaiveDate, next_due: NaiveDate) -> PropertyPatch {
    PropertyPatch::from([
        (PROP_STATUS.to_string(), PropertyWrite::select(STATUS_PENDING)),
        (PROP_LAST_DONE.to_string(), PropertyWrite::date(last_done)),
        (PROP_NEXT_DUE.to_string(), PropertyWrite::date(next_due)),
    ])
}

/// Patch surfacing a due row as to-do. Date fields stay untouched.
fn due_patch() -> PropertyPatch {
    PropertyPatch::from([(PROP_STATUS.to_string(), PropertyWrite::select(STATUS_TODO))])
}
