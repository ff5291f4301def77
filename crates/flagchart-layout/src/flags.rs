//! Vertical placement of milestone flags
//!
//! A fresh upload gets a deterministic zig-zag of flag heights taken from a
//! short repeating cycle, so neighboring flags do not collide. After that the
//! user can move one flag at a time; the move is remembered in a
//! [`FlagPositionState`] so later re-renders keep it while leaving every other
//! flag where it was.

use std::collections::HashMap;

use flagchart_core::{FlagOverride, FlagOverrideNotFound};
use tracing::debug;

/// Heights assigned to flags before any user override
pub const DEFAULT_CYCLE: [f64; 4] = [0.5, 1.0, 0.2, 1.2];

/// One flag's assigned height
#[derive(Clone, Debug, PartialEq)]
pub struct FlagSlot {
    pub label: String,
    pub position: f64,
}

/// Flag heights remembered across re-renders of the same upload
///
/// Slots are kept in milestone order. Labels may repeat; lookups and
/// overrides address the first slot carrying a label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlagPositionState {
    slots: Vec<FlagSlot>,
}

impl FlagPositionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Forget every assignment, as on a new upload
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Assigned height of the first flag with this label
    pub fn get(&self, label: &str) -> Option<f64> {
        self.slots
            .iter()
            .find(|slot| slot.label == label)
            .map(|slot| slot.position)
    }

    pub fn slots(&self) -> &[FlagSlot] {
        &self.slots
    }

    /// Heights in slot order
    pub fn positions(&self) -> Vec<f64> {
        self.slots.iter().map(|slot| slot.position).collect()
    }

    fn set(&mut self, label: &str, position: f64) {
        match self.slots.iter_mut().find(|slot| slot.label == label) {
            Some(slot) => slot.position = position,
            None => self.slots.push(FlagSlot {
                label: label.to_string(),
                position,
            }),
        }
    }
}

/// Assigns and overrides flag heights
#[derive(Clone, Debug)]
pub struct FlagPositioner {
    cycle: Vec<f64>,
}

impl FlagPositioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different repeating cycle for fresh assignments
    ///
    /// An empty cycle falls back to [`DEFAULT_CYCLE`].
    pub fn with_cycle(cycle: impl Into<Vec<f64>>) -> Self {
        let cycle = cycle.into();
        if cycle.is_empty() {
            Self::default()
        } else {
            Self { cycle }
        }
    }

    /// Current flag heights for `labels`, applying an optional override
    ///
    /// An empty `state` is first seeded from the cycle, one slot per label.
    /// An override whose label is among `labels` replaces that flag's height
    /// and nothing else. An override for an unknown label changes nothing and
    /// comes back as `Err`, carrying the unchanged heights.
    ///
    /// The result always has one height per label, in label order: the k-th
    /// occurrence of a label reads the k-th slot carrying it, and a label
    /// without a slot gets the cycle value for its index.
    pub fn positions<S: AsRef<str>>(
        &self,
        labels: &[S],
        state: &mut FlagPositionState,
        flag_override: Option<&FlagOverride>,
    ) -> Result<Vec<f64>, FlagOverrideNotFound> {
        if state.is_empty() {
            state.slots = labels
                .iter()
                .enumerate()
                .map(|(i, label)| FlagSlot {
                    label: label.as_ref().to_string(),
                    position: self.cycle[i % self.cycle.len()],
                })
                .collect();
            debug!(flags = state.len(), "seeded flag positions from default cycle");
        }

        if let Some(request) = flag_override {
            if !labels.iter().any(|label| label.as_ref() == request.label) {
                return Err(FlagOverrideNotFound {
                    label: request.label.clone(),
                    positions: self.aligned(labels, state),
                });
            }
            state.set(&request.label, request.position);
            debug!(label = %request.label, position = request.position, "moved flag");
        }

        Ok(self.aligned(labels, state))
    }

    fn aligned<S: AsRef<str>>(&self, labels: &[S], state: &FlagPositionState) -> Vec<f64> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let label = label.as_ref();
                let occurrence = seen.entry(label).or_insert(0);
                let position = state
                    .slots
                    .iter()
                    .filter(|slot| slot.label == label)
                    .nth(*occurrence)
                    .map_or(self.cycle[i % self.cycle.len()], |slot| slot.position);
                *occurrence += 1;
                position
            })
            .collect()
    }
}

impl Default for FlagPositioner {
    fn default() -> Self {
        Self {
            cycle: DEFAULT_CYCLE.to_vec(),
        }
    }
}
