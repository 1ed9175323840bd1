use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CleanError, Result};
use crate::filter::DirectoryCriteria;
use crate::fs::FileSystem;

/// 目录定位器：按包含/排除名单递归查找目录
pub struct DirectoryLocator<F> {
    fs: F,
}

impl<F: FileSystem> DirectoryLocator<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Finds every directory below `root` (excluding `root`) that satisfies
    /// `criteria`, sorted shortest path first.
    ///
    /// An excluded directory is pruned together with its whole subtree. A
    /// directory that is not included is still descended into. The first
    /// directory that cannot be enumerated aborts the search.
    pub fn find_directories(
        &self,
        root: &Path,
        criteria: &DirectoryCriteria,
    ) -> Result<Vec<PathBuf>> {
        self.find_directories_with(root, criteria, |_, err| Err(err))
    }

    /// Like [`find_directories`](Self::find_directories), but hands every
    /// enumeration failure to `on_error`. Returning `Ok(())` abandons only
    /// that branch; returning an error aborts the search.
    pub fn find_directories_with<H>(
        &self,
        root: &Path,
        criteria: &DirectoryCriteria,
        mut on_error: H,
    ) -> Result<Vec<PathBuf>>
    where
        H: FnMut(&Path, CleanError) -> Result<()>,
    {
        let mut found = Vec::new();
        self.walk(root, criteria, &mut found, &mut on_error)?;
        sort_shallowest_first(&mut found);

        debug!("在 {:?} 下找到 {} 个目录", root, found.len());
        Ok(found)
    }

    /// 仅查找 `dir` 的直接子目录
    pub fn find_child_directories(
        &self,
        dir: &Path,
        criteria: &DirectoryCriteria,
    ) -> Result<Vec<PathBuf>> {
        let mut children: Vec<PathBuf> = self
            .fs
            .list_directories(dir)
            .map_err(|source| CleanError::directory_access(dir, source))?
            .into_iter()
            .filter(|child| !criteria.is_excluded(child) && criteria.is_included(child))
            .collect();

        sort_shallowest_first(&mut children);
        Ok(children)
    }

    fn walk(
        &self,
        dir: &Path,
        criteria: &DirectoryCriteria,
        found: &mut Vec<PathBuf>,
        on_error: &mut dyn FnMut(&Path, CleanError) -> Result<()>,
    ) -> Result<()> {
        let children = match self.fs.list_directories(dir) {
            Ok(children) => children,
            Err(source) => return on_error(dir, CleanError::directory_access(dir, source)),
        };

        for child in children {
            if criteria.is_excluded(&child) {
                debug!("跳过排除目录: {:?}", child);
                continue;
            }

            if criteria.is_included(&child) {
                debug!("匹配目录: {:?}", child);
                found.push(child.clone());
            }

            self.walk(&child, criteria, found, on_error)?;
        }

        Ok(())
    }
}

/// 按路径长度升序排列（稳定排序，同长度保持遍历顺序）
pub fn sort_shallowest_first(paths: &mut [PathBuf]) {
    paths.sort_by_key(|path| path.as_os_str().len());
}
