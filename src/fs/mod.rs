//! File system operations abstraction for testing
//!
//! This module provides a trait-based abstraction over the file system checks
//! the publish workflow performs, so they can be mocked in tests using the
//! `mockall` crate.
//!
//! # Examples
//!
//! ```rust,no_run
//! use gh_publish::fs::{FileSystemOperations, StandardFileSystem};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let fs_ops: Arc<dyn FileSystemOperations> = Arc::new(StandardFileSystem);
//!
//! if fs_ops.exists(Path::new("my-project/.git")) {
//!     println!("my-project is a git repository");
//! }
//! ```
//!
//! # Testing with Mocks
//!
//! ```rust
//! #[cfg(test)]
//! mod tests {
//!     use crate::fs::{FileSystemOperations, MockFileSystemOperations};
//!     use std::path::Path;
//!
//!     #[test]
//!     fn test_with_mocked_filesystem() {
//!         let mut mock_fs = MockFileSystemOperations::new();
//!         mock_fs
//!             .expect_exists()
//!             .withf(|path| path.ends_with(".git"))
//!             .return_const(true);
//!
//!         assert!(mock_fs.exists(Path::new("repo/.git")));
//!     }
//! }
//! ```

use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Trait for file system operations that can be mocked in tests
#[cfg_attr(test, automock)]
pub trait FileSystemOperations: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;
}

/// Standard implementation that uses actual file system operations
///
/// This is the production implementation of `FileSystemOperations`. Use this
/// in production code and switch to `MockFileSystemOperations` in tests.
pub struct StandardFileSystem;

impl FileSystemOperations for StandardFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
