//! # localfs
//!
//! Declarative management of local files and directories.
//!
//! This crate reconciles declared filesystem state (a file or directory
//! with target content and permissions) against what is actually on
//! disk. An external orchestrator owns one desired-state record per
//! resource and drives it through four lifecycle operations; this crate
//! decides what must run (nothing, create, chmod, remove), runs it, and
//! records what it observed for the next comparison.
//!
//! ## Core Concepts
//!
//! - **Resource**: a managed filesystem entry ([`LocalDirectory`], [`LocalFile`])
//! - **ObservedState**: what was last seen on disk, used for drift comparison
//! - **Action**: the operation that converges a resource (see [`plan`])
//!
//! ## Example
//!
//! ```ignore
//! use localfs::{LocalDirectory, Mode, ObservedState, Resource};
//!
//! let dir = LocalDirectory::new("/tmp/managed")
//!     .with_permission(Mode::parse("0750")?);
//! let mut observed = ObservedState::new();
//!
//! dir.create(&mut observed)?;   // mkdir chain with mode
//! dir.read(&mut observed)?;     // re-sync record with disk
//! assert!(observed.is_present());
//! dir.delete(&mut observed)?;   // rmdir, tolerant of already-gone
//! ```
//!
//! All lifecycle calls are synchronous and blocking; the orchestrator is
//! expected to serialize calls per resource instance. There is no
//! locking or atomic-rename discipline around writes.

pub mod content;
pub mod diff;
pub mod directory;
pub mod error;
pub mod file;
pub mod mode;
pub mod resource;
pub mod state;

// Re-export main types at crate root
pub use content::ContentSource;
pub use diff::{Action, plan, plan_removal};
pub use directory::LocalDirectory;
pub use error::{Error, Result};
pub use file::LocalFile;
pub use mode::Mode;
pub use resource::Resource;
pub use state::{ObservedState, ResourceState};
