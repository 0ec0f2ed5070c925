//! Observed-state records and resource state snapshots

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::mode::Mode;

/// A point-in-time snapshot of a resource, current or desired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceState {
    /// Entry exists with the given permission bits
    Present { mode: Mode },
    /// Entry does not exist
    Absent,
}

impl ResourceState {
    /// Check if the state represents presence
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    /// Check if the state represents absence
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// What was last seen on the filesystem for one managed resource.
///
/// The orchestrator owns one record per resource instance and threads it
/// through every lifecycle call. An empty id means the entry did not
/// exist when last observed and must be (re)created. File content is
/// never part of the record; only permission drift is observable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedState {
    id: Option<PathBuf>,
    permission: Option<Mode>,
}

impl ObservedState {
    /// Fresh record for a resource that has never been observed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the entry, set iff it existed at last observation.
    pub fn id(&self) -> Option<&Path> {
        self.id.as_deref()
    }

    /// Effective permission bits at last observation.
    pub fn permission(&self) -> Option<Mode> {
        self.permission
    }

    pub fn is_present(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_none()
    }

    /// Record the entry as present with the given observed bits.
    pub(crate) fn record(&mut self, path: &Path, mode: Mode) {
        self.id = Some(path.to_path_buf());
        self.permission = Some(mode.perm());
    }

    /// Forget the entry; the next plan will schedule a create.
    pub(crate) fn clear(&mut self) {
        self.id = None;
        self.permission = None;
    }

    /// Reflect a live snapshot into the record. This never causes a
    /// transition of the real resource, it only mirrors one.
    pub(crate) fn sync(&mut self, path: &Path, state: ResourceState) {
        match state {
            ResourceState::Present { mode } => self.record(path, mode),
            ResourceState::Absent => self.clear(),
        }
    }
}
