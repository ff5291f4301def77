//! Per-session rendering state
//!
//! A session owns the current upload and the flag heights the user has set
//! for it. Renders for the same session are serialized behind one lock, so
//! the most recently finished render always owns the flag state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use flagchart_core::{ChartConfig, ChartSpec, LayoutError, Workbook};
use tracing::debug;

use crate::builder::TimelineLayoutBuilder;
use crate::flags::{FlagPositionState, FlagSlot};
use crate::schema;

/// Result of asking a session for a chart
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    /// Nothing has been uploaded yet
    NoInputYet,
    Rendered(ChartSpec),
}

impl RenderOutcome {
    pub fn into_spec(self) -> Option<ChartSpec> {
        match self {
            RenderOutcome::NoInputYet => None,
            RenderOutcome::Rendered(spec) => Some(spec),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    workbook: Option<Workbook>,
    flags: FlagPositionState,
}

/// One user's upload plus remembered flag moves
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the upload and forget all flag moves
    pub fn load(&self, workbook: Workbook) {
        let mut state = self.lock();
        debug!(name = ?workbook.name, "loaded workbook");
        state.workbook = Some(workbook);
        state.flags.reset();
    }

    /// Drop the upload, back to waiting for input
    pub fn clear(&self) {
        let mut state = self.lock();
        state.workbook = None;
        state.flags.reset();
    }

    pub fn has_input(&self) -> bool {
        self.lock().workbook.is_some()
    }

    /// Lay out the current upload with `config`
    ///
    /// A failed render reports its error and leaves the flag state as it was.
    pub fn render(&self, config: &ChartConfig) -> Result<RenderOutcome, LayoutError> {
        let mut guard = self.lock();
        let SessionState { workbook, flags } = &mut *guard;
        let Some(workbook) = workbook.as_ref() else {
            return Ok(RenderOutcome::NoInputYet);
        };

        TimelineLayoutBuilder::new(config.clone())
            .build_workbook(workbook, flags)
            .map(RenderOutcome::Rendered)
    }

    /// Milestone labels of the current upload, for a selection control
    pub fn milestone_labels(&self) -> Result<Vec<String>, LayoutError> {
        match &self.lock().workbook {
            Some(workbook) => Ok(schema::milestone_labels(&workbook.milestones)?),
            None => Ok(Vec::new()),
        }
    }

    /// Snapshot of the assigned flag heights
    pub fn flag_positions(&self) -> Vec<FlagSlot> {
        self.lock().flags.slots().to_vec()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // State is only mutated after every fallible step, so it stays
        // consistent even if a render panicked while holding the lock.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
