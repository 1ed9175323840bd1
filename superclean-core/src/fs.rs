use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::filter::FileMask;

/// Filesystem capability used by the locator and the deletion engine.
///
/// Listings only cover the immediate children of `dir` and return full
/// paths sorted by file name.
pub trait FileSystem {
    fn list_directories(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    fn list_files(&self, dir: &Path, mask: &FileMask) -> io::Result<Vec<PathBuf>>;

    fn delete_file(&self, path: &Path) -> io::Result<()>;

    fn is_dir(&self, path: &Path) -> bool;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn list_directories(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).list_directories(dir)
    }

    fn list_files(&self, dir: &Path, mask: &FileMask) -> io::Result<Vec<PathBuf>> {
        (**self).list_files(dir, mask)
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        (**self).delete_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }
}

/// 基于真实文件系统的实现
///
/// 不跟随符号链接：指向目录的链接既不算目录也不算文件。
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn children(dir: &Path) -> impl Iterator<Item = io::Result<walkdir::DirEntry>> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| entry.map_err(io::Error::from))
    }
}

impl FileSystem for OsFileSystem {
    fn list_directories(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut directories = Vec::new();
        for entry in Self::children(dir) {
            let entry = entry?;
            if entry.file_type().is_dir() {
                directories.push(entry.into_path());
            }
        }
        Ok(directories)
    }

    fn list_files(&self, dir: &Path, mask: &FileMask) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in Self::children(dir) {
            let entry = entry?;
            if entry.file_type().is_file() && mask.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_directories_is_shallow_and_sorted() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b/nested"))?;
        fs::create_dir_all(root.join("a"))?;
        fs::write(root.join("file.txt"), "x")?;

        let dirs = OsFileSystem.list_directories(root)?;
        assert_eq!(dirs, vec![root.join("a"), root.join("b")]);
        Ok(())
    }

    #[test]
    fn test_list_files_applies_mask() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join("sub.dll"))?;
        fs::write(root.join("a.dll"), "x")?;
        fs::write(root.join("b.pdb"), "x")?;

        let mask = FileMask::new("*.dll")?;
        let files = OsFileSystem.list_files(root, &mask)?;
        assert_eq!(files, vec![root.join("a.dll")]);
        Ok(())
    }

    #[test]
    fn test_list_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let err = OsFileSystem.list_directories(&missing).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("app.exe");
        fs::write(&file, "x")?;

        OsFileSystem.delete_file(&file)?;
        assert!(!file.exists());
        assert!(OsFileSystem.delete_file(&file).is_err());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_not_listed() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join("real"))?;
        std::os::unix::fs::symlink(root.join("real"), root.join("link"))?;

        let dirs = OsFileSystem.list_directories(root)?;
        assert_eq!(dirs, vec![root.join("real")]);
        Ok(())
    }
}
