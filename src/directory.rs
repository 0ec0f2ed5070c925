//! Directory resource - keep a directory present with a target mode

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::mode::Mode;
use crate::resource::Resource;
use crate::state::{ObservedState, ResourceState};

/// A directory to keep present with a target permission mode.
///
/// The path is the resource identity: pointing the resource elsewhere
/// replaces it. The permission converges in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDirectory {
    path: PathBuf,
    permission: Mode,
}

impl LocalDirectory {
    /// New directory resource with the default `0777` mode.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            permission: Mode::DIR_DEFAULT,
        }
    }

    /// Set the target permission mode.
    pub fn with_permission(mut self, permission: Mode) -> Self {
        self.permission = permission;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn permission(&self) -> Mode {
        self.permission
    }

    /// Stat the managed path, treating not-found as a state.
    fn stat(&self) -> Result<Option<fs::Metadata>> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::fs("stat", &self.path, e)),
        }
    }
}

impl Resource for LocalDirectory {
    fn id(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    fn description(&self) -> String {
        format!("Directory {} mode {}", self.path.display(), self.permission)
    }

    fn resource_type(&self) -> &'static str {
        "directory"
    }

    fn current_state(&self) -> Result<ResourceState> {
        Ok(match self.stat()? {
            Some(meta) => ResourceState::Present {
                mode: Mode::from_metadata(&meta),
            },
            None => ResourceState::Absent,
        })
    }

    fn desired_state(&self) -> ResourceState {
        ResourceState::Present {
            mode: self.permission.perm(),
        }
    }

    fn create(&self, observed: &mut ObservedState) -> Result<()> {
        match self.stat()? {
            None => {
                self.permission
                    .mkdir_all(&self.path)
                    .map_err(|e| Error::fs("create", &self.path, e))?;
            }
            Some(meta) => {
                if Mode::from_metadata(&meta) != self.permission.perm() {
                    self.permission
                        .apply_to(&self.path)
                        .map_err(|e| Error::fs("chmod", &self.path, e))?;
                }
            }
        }

        // Record what actually landed on disk; the umask may have masked
        // bits off a freshly created chain.
        let meta = fs::metadata(&self.path).map_err(|e| Error::fs("stat", &self.path, e))?;
        observed.record(&self.path, Mode::from_metadata(&meta));
        Ok(())
    }

    fn read(&self, observed: &mut ObservedState) -> Result<()> {
        match self.stat()? {
            None => observed.sync(&self.path, ResourceState::Absent),
            Some(meta) => {
                let current = Mode::from_metadata(&meta);
                log::debug!(
                    "directory {}: wanted {}, current {}",
                    self.path.display(),
                    self.permission.perm(),
                    current
                );
                observed.sync(&self.path, ResourceState::Present { mode: current });
            }
        }
        Ok(())
    }

    fn update(&self, observed: &mut ObservedState) -> Result<()> {
        // A missing target here is an upstream invariant violation; the
        // stat error surfaces as-is.
        let meta = fs::metadata(&self.path).map_err(|e| Error::fs("stat", &self.path, e))?;
        if Mode::from_metadata(&meta) != self.permission.perm() {
            self.permission
                .apply_to(&self.path)
                .map_err(|e| Error::fs("chmod", &self.path, e))?;
        }
        observed.record(&self.path, self.permission.perm());
        Ok(())
    }

    fn delete(&self, observed: &mut ObservedState) -> Result<()> {
        // Single removal of the expected-empty directory.
        match fs::remove_dir(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("directory {} already gone", self.path.display());
            }
            Err(e) => return Err(Error::fs("remove", &self.path, e)),
        }
        observed.clear();
        Ok(())
    }

    fn forces_replacement(&self, prior: &Self) -> bool {
        self.path != prior.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mode(s: &str) -> Mode {
        Mode::parse(s).unwrap()
    }

    #[test]
    fn create_sets_identity_and_mode() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("local_directory");
        let dir = LocalDirectory::new(&path).with_permission(mode("0750"));
        let mut observed = ObservedState::new();

        dir.create(&mut observed).unwrap();

        assert_eq!(observed.id(), Some(path.as_path()));
        assert!(path.is_dir());
        #[cfg(unix)]
        {
            let meta = fs::metadata(&path).unwrap();
            assert_eq!(Mode::from_metadata(&meta), mode("0750"));
            assert_eq!(observed.permission(), Some(mode("0750")));
        }
    }

    #[test]
    fn create_builds_the_full_chain() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a").join("b").join("c");
        let dir = LocalDirectory::new(&path).with_permission(mode("0755"));
        let mut observed = ObservedState::new();

        dir.create(&mut observed).unwrap();

        assert!(path.is_dir());
        assert!(observed.is_present());
    }

    #[test]
    fn create_is_idempotent_against_its_own_output() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("d");
        let dir = LocalDirectory::new(&path).with_permission(mode("0750"));
        let mut observed = ObservedState::new();

        dir.create(&mut observed).unwrap();
        dir.create(&mut observed).unwrap();

        #[cfg(unix)]
        assert_eq!(observed.permission(), Some(mode("0750")));
        assert!(observed.is_present());
    }

    #[cfg(unix)]
    #[test]
    fn create_reconciles_an_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("existing");
        fs::create_dir(&path).unwrap();
        mode("0700").apply_to(&path).unwrap();

        let dir = LocalDirectory::new(&path).with_permission(mode("0755"));
        let mut observed = ObservedState::new();
        dir.create(&mut observed).unwrap();

        let meta = fs::metadata(&path).unwrap();
        assert_eq!(Mode::from_metadata(&meta), mode("0755"));
    }

    #[test]
    fn read_clears_identity_when_entry_vanished() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gone");
        let dir = LocalDirectory::new(&path);

        let mut observed = ObservedState::new();
        observed.record(&path, mode("0777"));

        dir.read(&mut observed).unwrap();
        assert!(observed.is_absent());
    }

    #[cfg(unix)]
    #[test]
    fn read_picks_up_external_permission_drift() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("drifting");
        let dir = LocalDirectory::new(&path).with_permission(mode("0750"));
        let mut observed = ObservedState::new();
        dir.create(&mut observed).unwrap();

        // Someone chmods behind our back.
        mode("0700").apply_to(&path).unwrap();

        dir.read(&mut observed).unwrap();
        assert_eq!(observed.permission(), Some(mode("0700")));
    }

    #[cfg(unix)]
    #[test]
    fn update_changes_permission_in_place() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("u");
        LocalDirectory::new(&path)
            .with_permission(mode("0750"))
            .create(&mut ObservedState::new())
            .unwrap();

        let dir = LocalDirectory::new(&path).with_permission(mode("0700"));
        let mut observed = ObservedState::new();
        dir.update(&mut observed).unwrap();

        let meta = fs::metadata(&path).unwrap();
        assert_eq!(Mode::from_metadata(&meta), mode("0700"));
        assert_eq!(observed.permission(), Some(mode("0700")));
    }

    #[test]
    fn update_with_unchanged_permission_still_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("same");
        let dir = LocalDirectory::new(&path).with_permission(mode("0750"));
        dir.create(&mut ObservedState::new()).unwrap();

        let mut observed = ObservedState::new();
        dir.update(&mut observed).unwrap();
        assert_eq!(observed.permission(), Some(mode("0750")));
    }

    #[test]
    fn update_on_a_missing_target_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let dir = LocalDirectory::new(tmp.path().join("missing"));
        let err = dir.update(&mut ObservedState::new()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_then_read_yields_absent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("local_directory");
        let dir = LocalDirectory::new(&path).with_permission(mode("0750"));
        let mut observed = ObservedState::new();

        dir.create(&mut observed).unwrap();
        dir.delete(&mut observed).unwrap();

        assert!(!path.exists());
        dir.read(&mut observed).unwrap();
        assert!(observed.is_absent());
    }

    #[test]
    fn delete_tolerates_already_gone() {
        let tmp = TempDir::new().unwrap();
        let dir = LocalDirectory::new(tmp.path().join("never_created"));
        let mut observed = ObservedState::new();
        dir.delete(&mut observed).unwrap();
        assert!(observed.is_absent());
    }

    #[test]
    fn delete_surfaces_non_notfound_failures() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("tenant"), "x").unwrap();

        let dir = LocalDirectory::new(&path);
        let err = dir.delete(&mut ObservedState::new()).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn needs_apply_tracks_current_against_desired() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("n");
        let dir = LocalDirectory::new(&path).with_permission(mode("0750"));

        // Absent entry always needs converging.
        assert!(dir.needs_apply().unwrap());

        dir.create(&mut ObservedState::new()).unwrap();
        #[cfg(unix)]
        assert!(!dir.needs_apply().unwrap());
    }

    #[test]
    fn replacement_is_forced_by_path_only() {
        let a = LocalDirectory::new("/srv/a").with_permission(mode("0750"));
        let a_other_mode = LocalDirectory::new("/srv/a").with_permission(mode("0777"));
        let b = LocalDirectory::new("/srv/b").with_permission(mode("0750"));

        assert!(!a.forces_replacement(&a_other_mode));
        assert!(a.forces_replacement(&b));
    }
}
