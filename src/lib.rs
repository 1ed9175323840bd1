//! # SuperClean
//!
//! Deletes build output files (`*.dll`, `*.pdb`, `*.exe`, ...) from `bin` and
//! `obj` directories across a source tree.
//!
//! ## Features
//!
//! - Find build output directories by name, skipping `.git`, `node_modules`
//!   and other ignored trees
//! - Delete files matching glob masks, tolerating files that are locked or
//!   read-only
//! - Report per-directory totals, failures and inaccessible directories
//!
//! ## Usage
//!
//! ### Command Line
//!
//! ```bash
//! # Clean the current directory with the default names and masks
//! superclean
//!
//! # Only delete .pdb files below ./src
//! superclean src --mask '*.pdb'
//!
//! # Print the summary as JSON
//! superclean --json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use superclean::{CleanConfig, CleanEvent, FileCleaner, MemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new();
//! fs.add_file("/work/app/bin/app.dll")
//!     .add_file("/work/app/src/main.cs");
//!
//! let cleaner = FileCleaner::new(CleanConfig::default(), &fs)?;
//! let summary = cleaner.clean(Path::new("/work"), |event| {
//!     if let CleanEvent::DirectoryCleaned(report) = event {
//!         println!("{} file(s) in {}", report.deleted_count(), report.directory.display());
//!     }
//! })?;
//!
//! assert_eq!(summary.files_deleted(), 1);
//! assert!(fs.contains_file("/work/app/src/main.cs"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export core functionality
pub use superclean_core::*;

// Re-export commonly used types
pub use superclean_core::{
    CleanConfig, CleanEvent, CleanSummary, DirectoryLocator, FileCleaner, OperationResult,
    OsFileSystem,
};
