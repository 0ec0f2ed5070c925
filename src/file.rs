//! File resource - keep a file present with target content and mode

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::content::ContentSource;
use crate::error::{Error, Result};
use crate::mode::Mode;
use crate::resource::Resource;
use crate::state::{ObservedState, ResourceState};

/// A file to keep present with target content and permission mode.
///
/// Path and content source are the file's identity: changing either
/// replaces the file. Only the permission converges in place. Missing
/// parent directories are created with their own mode at creation time
/// only, never reconciled afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    path: PathBuf,
    content: ContentSource,
    permission: Mode,
    directory_permission: Mode,
}

impl LocalFile {
    /// New file resource with default `0644` file and `0777` parent modes.
    pub fn new(path: impl Into<PathBuf>, content: ContentSource) -> Self {
        Self {
            path: path.into(),
            content,
            permission: Mode::FILE_DEFAULT,
            directory_permission: Mode::DIR_DEFAULT,
        }
    }

    /// Set the target file permission mode.
    pub fn with_permission(mut self, permission: Mode) -> Self {
        self.permission = permission;
        self
    }

    /// Set the mode for parent directories created at creation time.
    pub fn with_directory_permission(mut self, permission: Mode) -> Self {
        self.directory_permission = permission;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &ContentSource {
        &self.content
    }

    pub fn permission(&self) -> Mode {
        self.permission
    }

    pub fn directory_permission(&self) -> Mode {
        self.directory_permission
    }

    /// Stat the managed path, treating not-found as a state.
    fn stat(&self) -> Result<Option<fs::Metadata>> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::fs("stat", &self.path, e)),
        }
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Truncating write with the file mode set at open time.
    fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.permission.bits());
        }
        let mut file = options
            .open(&self.path)
            .map_err(|e| Error::fs("create", &self.path, e))?;
        file.write_all(bytes)
            .map_err(|e| Error::fs("write", &self.path, e))?;
        Ok(())
    }
}

impl Resource for LocalFile {
    fn id(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    fn description(&self) -> String {
        format!("File {} mode {}", self.path.display(), self.permission)
    }

    fn resource_type(&self) -> &'static str {
        "file"
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
        // Resolve content before touching the filesystem, so a malformed
        // payload leaves no partial state behind.
        let bytes = self.content.resolve()?;

        if let Some(parent) = self.parent_dir()
            && !parent.exists()
        {
            self.directory_permission
                .mkdir_all(parent)
                .map_err(|e| Error::fs("create", parent, e))?;
        }

        // Always rewrite, truncating whatever is there. Create does not
        // try to be idempotent against external content edits.
        self.write_bytes(&bytes)?;

        let meta = fs::metadata(&self.path).map_err(|e| Error::fs("stat", &self.path, e))?;
        observed.record(&self.path, Mode::from_metadata(&meta));
        Ok(())
    }

    fn read(&self, observed: &mut ObservedState) -> Result<()> {
        // Content is deliberately not re-read; only permission drift is
        // observable here.
        match self.stat()? {
            None => observed.sync(&self.path, ResourceState::Absent),
            Some(meta) => {
                let current = Mode::from_metadata(&meta);
                log::debug!(
                    "file {}: wanted {}, current {}",
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
        // Directory permission is not re-applied here; it only matters
        // when create materializes missing parents.
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
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("file {} already gone", self.path.display());
            }
            Err(e) => return Err(Error::fs("remove", &self.path, e)),
        }
        observed.clear();
        Ok(())
    }

    fn forces_replacement(&self, prior: &Self) -> bool {
        self.path != prior.path || self.content != prior.content
    }
}
