//! Octal permission modes
//!
//! Permissions cross the configuration boundary as octal strings
//! ("0750"), are parsed once into a numeric [`Mode`], and only become
//! strings again for external display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Permission bits for a filesystem entry.
///
/// Holds at most the low mode bits; entry-type bits never participate in
/// comparison or storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mode(u32);

impl Mode {
    /// Default mode for created directories (the process umask applies
    /// at creation time).
    pub const DIR_DEFAULT: Self = Self(0o777);

    /// Default mode for created files.
    pub const FILE_DEFAULT: Self = Self(0o644);

    /// Parse a 3-4 digit octal permission string such as "755" or "0640".
    pub fn parse(s: &str) -> Result<Self> {
        if !(3..=4).contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit() && b < b'8') {
            return Err(Error::InvalidMode(s.to_string()));
        }
        let bits =
            u32::from_str_radix(s, 8).map_err(|_| Error::InvalidMode(s.to_string()))?;
        Ok(Self(bits))
    }

    /// Raw mode bits as handed to mkdir/chmod.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Only the low rwx permission bits, the value compared and stored.
    pub fn perm(self) -> Self {
        Self(self.0 & 0o777)
    }

    /// Effective permission bits observed on a filesystem entry.
    pub fn from_metadata(meta: &fs::Metadata) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            Self(meta.permissions().mode() & 0o777)
        }
        #[cfg(not(unix))]
        {
            // Windows only models a readonly bit; report the closest mapping.
            if meta.permissions().readonly() {
                Self(0o444)
            } else {
                Self(0o666)
            }
        }
    }

    /// Apply these bits to the entry at `path`.
    #[cfg(unix)]
    pub(crate) fn apply_to(self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(self.bits()))
    }

    /// Windows has no Unix permission bits to apply.
    #[cfg(not(unix))]
    pub(crate) fn apply_to(self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    /// Create `path` and any missing parents as directories with these
    /// bits, subject to the process umask.
    pub(crate) fn mkdir_all(self, path: &Path) -> io::Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.bits());
        }
        builder.create(path)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Mode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.to_string()
    }
}
