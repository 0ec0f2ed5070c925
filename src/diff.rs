//! Drift planning - deciding which operation reconciles a resource
//!
//! Planning is pure: it looks at the desired record, the previously
//! applied desired record and the observed record, never at the
//! filesystem.

use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::state::{ObservedState, ResourceState};

/// Operation the orchestrator must run next for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Observed state already matches the desired record
    NoChange,
    /// Entry is absent and must be created
    Create,
    /// Only the permission differs; change it in place
    Chmod,
    /// An identity attribute changed; destroy then create
    Replace,
    /// Entry still exists but is no longer wanted
    Remove,
}

impl Action {
    /// Check if the action mutates the filesystem.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Decide the operation for a declared resource.
///
/// `prior` is the desired record the observed state was last converged
/// to, if any; replacement-triggering attributes are compared against
/// it.
pub fn plan<R: Resource>(desired: &R, prior: Option<&R>, observed: &ObservedState) -> Action {
    if observed.is_absent() {
        return Action::Create;
    }
    if let Some(prior) = prior
        && desired.forces_replacement(prior)
    {
        return Action::Replace;
    }
    match desired.desired_state() {
        ResourceState::Absent => Action::Remove,
        ResourceState::Present { mode } => match observed.permission() {
            Some(current) if current == mode.perm() => Action::NoChange,
            _ => Action::Chmod,
        },
    }
}

/// Decide the operation for a resource that is no longer declared.
pub fn plan_removal(observed: &ObservedState) -> Action {
    if observed.is_present() {
        Action::Remove
    } else {
        Action::NoChange
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::LocalDirectory;
    use crate::mode::Mode;
    use std::path::Path;

    fn observed_at(path: &str, mode: &str) -> ObservedState {
        let mut observed = ObservedState::new();
        observed.record(Path::new(path), Mode::parse(mode).unwrap());
        observed
    }

    #[test]
    fn absent_record_plans_create() {
        let dir = LocalDirectory::new("/srv/data");
        assert_eq!(plan(&dir, None, &ObservedState::new()), Action::Create);
    }

    #[test]
    fn converged_record_plans_no_change() {
        let dir =
            LocalDirectory::new("/srv/data").with_permission(Mode::parse("0750").unwrap());
        let observed = observed_at("/srv/data", "0750");
        assert_eq!(plan(&dir, Some(&dir), &observed), Action::NoChange);
    }

    #[test]
    fn permission_drift_plans_chmod() {
        let dir =
            LocalDirectory::new("/srv/data").with_permission(Mode::parse("0750").unwrap());
        let observed = observed_at("/srv/data", "0777");
        assert_eq!(plan(&dir, Some(&dir), &observed), Action::Chmod);
    }

    #[test]
    fn path_change_plans_replace() {
        let prior = LocalDirectory::new("/srv/data");
        let desired = LocalDirectory::new("/srv/other");
        let observed = observed_at("/srv/data", "0777");
        assert_eq!(plan(&desired, Some(&prior), &observed), Action::Replace);
    }

    #[test]
    fn removal_depends_on_presence() {
        assert_eq!(plan_removal(&observed_at("/srv/data", "0750")), Action::Remove);
        assert_eq!(plan_removal(&ObservedState::new()), Action::NoChange);
    }
}
