use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::CleanSummary;
use crate::error::{CleanError, Result, is_permission_denied};
use crate::filter::{DirectoryCriteria, FileMask, NameFilter};
use crate::fs::FileSystem;
use crate::locator::{DirectoryLocator, sort_shallowest_first};
use crate::operation::OperationResult;

pub const DEFAULT_SEARCH_DIRECTORIES: &[&str] = &["bin", "obj"];
pub const DEFAULT_IGNORE_DIRECTORIES: &[&str] = &[
    ".git",
    ".vs",
    ".build",
    ".nuget",
    "node_modules",
    "packages",
];
pub const DEFAULT_FILE_MASKS: &[&str] = &["*.dll", "*.pdb", "*.exe", ".cache"];

/// 目录无法访问时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DirectoryErrorPolicy {
    /// 跳过该目录及其子树，继续处理其它目录
    #[default]
    Skip,
    /// 中止整个运行
    Abort,
}

/// 清理器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanConfig {
    /// 目标目录名称（如 bin、obj）
    pub search_directories: Vec<String>,
    /// 忽略的目录名称，整个子树都不会被访问
    pub ignore_directories: Vec<String>,
    /// 要删除的文件掩码
    pub file_masks: Vec<String>,
    pub on_directory_error: DirectoryErrorPolicy,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            search_directories: to_strings(DEFAULT_SEARCH_DIRECTORIES),
            ignore_directories: to_strings(DEFAULT_IGNORE_DIRECTORIES),
            file_masks: to_strings(DEFAULT_FILE_MASKS),
            on_directory_error: DirectoryErrorPolicy::default(),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Results of cleaning the files directly inside one directory.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryReport {
    pub directory: PathBuf,
    pub results: Vec<OperationResult>,
}

impl DirectoryReport {
    pub fn deleted_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn deleted_files(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.is_success())
            .flat_map(|r| r.messages().iter().map(String::as_str))
    }

    pub fn failure_messages(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.is_failure())
            .flat_map(|r| r.messages().iter().map(String::as_str))
    }
}

/// 清理进度事件，每处理完一个目录发送一次
#[derive(Debug, Clone, Copy)]
pub enum CleanEvent<'a> {
    DirectoryCleaned(&'a DirectoryReport),
    DirectorySkipped {
        directory: &'a Path,
        error: &'a CleanError,
    },
}

/// Deletes files matching the configured masks inside build output
/// directories.
pub struct FileCleaner<F> {
    config: CleanConfig,
    fs: F,
    masks: Vec<FileMask>,
    search: DirectoryCriteria,
    ignore: DirectoryCriteria,
}

impl<F: FileSystem> FileCleaner<F> {
    /// 创建新的清理器，掩码无效时返回错误
    pub fn new(config: CleanConfig, fs: F) -> Result<Self> {
        let masks = FileMask::parse_all(&config.file_masks)?;
        let ignore = NameFilter::new(&config.ignore_directories);
        let search = DirectoryCriteria::new(
            Some(NameFilter::new(&config.search_directories)),
            Some(ignore.clone()),
        );

        Ok(Self {
            config,
            fs,
            masks,
            search,
            ignore: DirectoryCriteria::excluding(ignore),
        })
    }

    fn locator(&self) -> DirectoryLocator<&F> {
        DirectoryLocator::new(&self.fs)
    }

    /// Runs the whole pipeline below `root`: locate target directories,
    /// then clean each one and its non-ignored subdirectories.
    pub fn clean<E>(&self, root: &Path, on_event: E) -> Result<CleanSummary>
    where
        E: FnMut(CleanEvent<'_>),
    {
        let start_time = Instant::now();

        if !self.fs.is_dir(root) {
            return Err(CleanError::InvalidRoot(root.to_path_buf()));
        }

        info!("开始扫描路径: {:?}", root);

        let mut summary = CleanSummary::new();
        let mut observe = recording(&mut summary, on_event);

        let targets = self
            .locator()
            .find_directories_with(root, &self.search, |dir, err| {
                self.skip_or_abort(dir, err, &mut observe)
            })?;
        let targets = outermost_only(targets);
        info!("找到 {} 个目标目录", targets.len());

        self.descend(&targets, &self.masks, &self.ignore, &mut observe, &mut None)?;
        drop(observe);

        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "清理完成: 删除 {} 个文件，失败 {} 个，跳过目录 {} 个，耗时 {}ms",
            summary.files_deleted(),
            summary.failures.len(),
            summary.skipped_directories.len(),
            summary.duration_ms
        );

        Ok(summary)
    }

    /// Deletes files matching `mask` directly inside `directory`, one
    /// result per file, lazily.
    ///
    /// Permission errors become failure results and iteration continues.
    /// Any other deletion error is yielded as `Err` and should end the run.
    pub fn delete_matching<'a>(
        &'a self,
        directory: &Path,
        mask: &FileMask,
    ) -> Result<impl Iterator<Item = Result<OperationResult>> + 'a> {
        let files = self
            .fs
            .list_files(directory, mask)
            .map_err(|source| CleanError::directory_access(directory, source))?;

        Ok(files.into_iter().map(move |file| self.delete_one(&file)))
    }

    fn delete_one(&self, file: &Path) -> Result<OperationResult> {
        match self.fs.delete_file(file) {
            Ok(()) => {
                debug!("删除文件: {:?}", file);
                Ok(OperationResult::deleted(file))
            }
            Err(err) if is_permission_denied(&err) => {
                debug!("删除文件权限不足: {:?}", file);
                Ok(OperationResult::access_denied(file))
            }
            Err(err) => Err(CleanError::io(file, err)),
        }
    }

    /// Applies every mask to `directory` in order and reports the totals
    /// once all masks are done.
    pub fn delete_files(&self, directory: &Path, masks: &[FileMask]) -> Result<DirectoryReport> {
        let mut results = Vec::new();

        for mask in masks {
            for result in self.delete_matching(directory, mask)? {
                results.push(result?);
            }
        }

        let report = DirectoryReport {
            directory: directory.to_path_buf(),
            results,
        };

        let deleted = report.deleted_count();
        if deleted > 0 {
            info!(
                "Deleted {} File(s) in Directory {}",
                deleted,
                directory.display()
            );
        }
        for message in report.failure_messages() {
            info!("{}", message);
        }

        Ok(report)
    }

    /// Cleans each directory in order, then its immediate non-ignored
    /// subdirectories, depth first. A directory's own files are always
    /// handled before anything below it.
    pub fn delete_files_in_directories<E>(
        &self,
        directories: &[PathBuf],
        masks: &[FileMask],
        ignore: &NameFilter,
        mut on_event: E,
    ) -> Result<Vec<OperationResult>>
    where
        E: FnMut(CleanEvent<'_>),
    {
        let criteria = DirectoryCriteria::excluding(ignore.clone());
        let mut results = Some(Vec::new());
        self.descend(directories, masks, &criteria, &mut on_event, &mut results)?;
        Ok(results.unwrap_or_default())
    }

    fn descend<E>(
        &self,
        directories: &[PathBuf],
        masks: &[FileMask],
        ignore: &DirectoryCriteria,
        on_event: &mut E,
        results: &mut Option<Vec<OperationResult>>,
    ) -> Result<()>
    where
        E: FnMut(CleanEvent<'_>),
    {
        for directory in directories {
            let report = match self.delete_files(directory, masks) {
                Ok(report) => report,
                Err(err) => {
                    self.skip_or_abort(directory, err, on_event)?;
                    continue;
                }
            };
            on_event(CleanEvent::DirectoryCleaned(&report));
            if let Some(results) = results {
                results.extend(report.results);
            }

            let children = match self.locator().find_child_directories(directory, ignore) {
                Ok(children) => children,
                Err(err) => {
                    self.skip_or_abort(directory, err, on_event)?;
                    continue;
                }
            };

            self.descend(&children, masks, ignore, on_event, results)?;
        }

        Ok(())
    }

    fn skip_or_abort<E>(&self, directory: &Path, err: CleanError, on_event: &mut E) -> Result<()>
    where
        E: FnMut(CleanEvent<'_>),
    {
        match err {
            CleanError::DirectoryAccess { .. }
                if self.config.on_directory_error == DirectoryErrorPolicy::Skip =>
            {
                info!("{}", err);
                on_event(CleanEvent::DirectorySkipped {
                    directory,
                    error: &err,
                });
                Ok(())
            }
            err => Err(err),
        }
    }
}

/// 汇总事件后再转发；同一目录的跳过事件只转发一次
fn recording<'s, E>(
    summary: &'s mut CleanSummary,
    mut on_event: E,
) -> impl FnMut(CleanEvent<'_>) + 's
where
    E: FnMut(CleanEvent<'_>) + 's,
{
    let mut skipped = HashSet::new();
    move |event| {
        if let CleanEvent::DirectorySkipped { directory, .. } = event
            && !skipped.insert(directory.to_path_buf())
        {
            return;
        }
        summary.record(&event);
        on_event(event);
    }
}

/// 去掉位于其它目标目录之下的目标，它们会在上层目录的递归中处理
fn outermost_only(mut targets: Vec<PathBuf>) -> Vec<PathBuf> {
    sort_shallowest_first(&mut targets);

    let mut kept: Vec<PathBuf> = Vec::with_capacity(targets.len());
    for target in targets {
        if kept.iter().any(|parent| target.starts_with(parent)) {
            debug!("目录已被上层目标覆盖: {:?}", target);
            continue;
        }
        kept.push(target);
    }
    kept
}
