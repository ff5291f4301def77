//! Date span covered by the task list

use flagchart_core::{DateRange, LayoutError, Task};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_MONTH: i64 = 30 * SECONDS_PER_DAY;

/// Earliest start, latest finish and the span between them in 30-day months
///
/// The month count is rounded up and may be negative when every task
/// finishes before the earliest start.
pub fn analyze(tasks: &[Task]) -> Result<DateRange, LayoutError> {
    let min_start = tasks.iter().map(|task| task.start).min();
    let max_finish = tasks.iter().map(|task| task.finish).max();
    let (Some(min_start), Some(max_finish)) = (min_start, max_finish) else {
        return Err(LayoutError::EmptyInput("tasks".into()));
    };

    let seconds = (max_finish - min_start).num_days() * SECONDS_PER_DAY;
    let span_months = (seconds as f64 / SECONDS_PER_MONTH as f64).ceil() as i64;

    Ok(DateRange {
        min_start,
        max_finish,
        span_months,
    })
}
