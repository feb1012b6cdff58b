//! Infrastructure layer - External systems integration
//!
//! This module handles the filesystem side effects of loading settings.

pub mod fs;

pub use fs::{Filesystem, NoopFilesystem, StdFilesystem};

#[cfg(any(test, feature = "test-utils"))]
pub use fs::MockFilesystem;
