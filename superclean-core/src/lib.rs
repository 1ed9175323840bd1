use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod cleaner;
pub mod error;
pub mod filter;
pub mod fs;
pub mod locator;
pub mod memory;
pub mod operation;

pub use cleaner::{
    CleanConfig, CleanEvent, DirectoryErrorPolicy, DirectoryReport, FileCleaner,
};
pub use error::{CleanError, Result};
pub use filter::{DirectoryCriteria, FileMask, NameFilter};
pub use fs::{FileSystem, OsFileSystem};
pub use locator::DirectoryLocator;
pub use memory::MemoryFileSystem;
pub use operation::{OperationKind, OperationResult};

/// 清理结果统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanSummary {
    /// 至少删除了一个文件的目录数
    pub directories_cleaned: usize,
    pub deleted_files: Vec<String>,
    pub failures: Vec<String>,
    pub skipped_directories: Vec<PathBuf>,
    pub duration_ms: u64,
}

impl CleanSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_report(&mut self, report: &DirectoryReport) {
        let before = self.deleted_files.len();
        self.deleted_files
            .extend(report.deleted_files().map(str::to_string));
        if self.deleted_files.len() > before {
            self.directories_cleaned += 1;
        }
        self.failures
            .extend(report.failure_messages().map(str::to_string));
    }

    pub fn add_skipped(&mut self, directory: PathBuf) {
        self.skipped_directories.push(directory);
    }

    pub fn record(&mut self, event: &CleanEvent<'_>) {
        match event {
            CleanEvent::DirectoryCleaned(report) => self.add_report(report),
            CleanEvent::DirectorySkipped { directory, .. } => {
                self.add_skipped(directory.to_path_buf())
            }
        }
    }

    pub fn files_deleted(&self) -> usize {
        self.deleted_files.len()
    }

    /// 整个运行是否删除过文件
    pub fn has_deletions(&self) -> bool {
        !self.deleted_files.is_empty()
    }
}
