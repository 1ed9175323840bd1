//! In-memory filesystem for tests and benchmarks.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::filter::FileMask;
use crate::fs::FileSystem;

#[derive(Debug, Default)]
struct State {
    directories: BTreeSet<PathBuf>,
    files: BTreeSet<PathBuf>,
    locked: HashSet<PathBuf>,
    unreadable: HashSet<PathBuf>,
    broken: HashSet<PathBuf>,
    deleted: Vec<PathBuf>,
}

/// A directory tree held in memory, with fault injection.
///
/// Locked files fail deletion with `PermissionDenied`, unreadable
/// directories fail listing with `PermissionDenied`, and broken files fail
/// deletion with an unclassified error.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: RefCell<State>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加目录及其所有父目录
    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        let mut state = self.state.borrow_mut();
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            state.directories.insert(ancestor.to_path_buf());
        }
        self
    }

    /// 添加文件，自动创建父目录
    pub fn add_file(&self, path: impl AsRef<Path>) -> &Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.state.borrow_mut().files.insert(path.to_path_buf());
        self
    }

    pub fn lock_file(&self, path: impl AsRef<Path>) -> &Self {
        self.add_file(path.as_ref());
        self.state
            .borrow_mut()
            .locked
            .insert(path.as_ref().to_path_buf());
        self
    }

    pub fn break_file(&self, path: impl AsRef<Path>) -> &Self {
        self.add_file(path.as_ref());
        self.state
            .borrow_mut()
            .broken
            .insert(path.as_ref().to_path_buf());
        self
    }

    pub fn make_unreadable(&self, path: impl AsRef<Path>) -> &Self {
        self.add_dir(path.as_ref());
        self.state
            .borrow_mut()
            .unreadable
            .insert(path.as_ref().to_path_buf());
        self
    }

    pub fn contains_file(&self, path: impl AsRef<Path>) -> bool {
        self.state.borrow().files.contains(path.as_ref())
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.state.borrow().files.iter().cloned().collect()
    }

    /// 已删除的文件，按删除顺序
    pub fn deleted(&self) -> Vec<PathBuf> {
        self.state.borrow().deleted.clone()
    }

    fn check_readable(state: &State, dir: &Path) -> io::Result<()> {
        if state.unreadable.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", dir.display()),
            ));
        }
        if !state.directories.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }
        Ok(())
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_directories(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.borrow();
        Self::check_readable(&state, dir)?;

        Ok(state
            .directories
            .iter()
            .filter(|path| path.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn list_files(&self, dir: &Path, mask: &FileMask) -> io::Result<Vec<PathBuf>> {
        let state = self.state.borrow();
        Self::check_readable(&state, dir)?;

        Ok(state
            .files
            .iter()
            .filter(|path| path.parent() == Some(dir) && mask.matches(path))
            .cloned()
            .collect())
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.borrow_mut();

        if state.locked.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("file is locked: {}", path.display()),
            ));
        }
        if state.broken.contains(path) {
            return Err(io::Error::other(format!(
                "device error: {}",
                path.display()
            )));
        }
        if !state.files.remove(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            ));
        }

        state.deleted.push(path.to_path_buf());
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state.borrow().directories.contains(path)
    }
}
