//! Resource trait for managed filesystem entries
//!
//! A resource pairs an immutable desired record with the four lifecycle
//! operations an orchestrator drives it through. Each call is a function
//! of (desired record, filesystem) that leaves its outcome in the
//! threaded [`ObservedState`].

use std::fmt;

use crate::error::Result;
use crate::state::{ObservedState, ResourceState};

/// Core trait for managed filesystem resources
///
/// Implementations are leaf components with no dependency on one
/// another; the orchestrator serializes lifecycle calls per instance.
pub trait Resource: Send + Sync + fmt::Debug {
    /// Unique identifier, the managed path.
    fn id(&self) -> String;

    /// Human-readable description of what this resource ensures.
    fn description(&self) -> String;

    /// Resource type category ("directory", "file").
    fn resource_type(&self) -> &'static str;

    /// Detect the current state of the entry on disk.
    ///
    /// Absence is a state, not an error; any other stat failure is.
    fn current_state(&self) -> Result<ResourceState>;

    /// The configured target state.
    fn desired_state(&self) -> ResourceState;

    /// Converge from absent: materialize the entry, then record what was
    /// actually observed on disk.
    fn create(&self, observed: &mut ObservedState) -> Result<()>;

    /// Re-synchronize the record with reality. A vanished entry clears
    /// the record and succeeds; absence is the signal to recreate, not
    /// an error.
    fn read(&self, observed: &mut ObservedState) -> Result<()>;

    /// Converge mutable attributes (permissions) in place. The target is
    /// expected to exist; a missing entry surfaces the stat error.
    fn update(&self, observed: &mut ObservedState) -> Result<()>;

    /// Remove the entry, tolerating it being already gone.
    fn delete(&self, observed: &mut ObservedState) -> Result<()>;

    /// Whether switching from `prior` to this desired record requires
    /// destroy-then-create instead of an in-place update.
    fn forces_replacement(&self, prior: &Self) -> bool
    where
        Self: Sized;

    /// Check if the resource needs changes to reach the desired state.
    fn needs_apply(&self) -> Result<bool> {
        let current = self.current_state()?;
        let desired = self.desired_state();
        Ok(current != desired)
    }
}
