use std::io;
use std::path::PathBuf;

/// 清理过程中可能出现的错误
#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    /// 无法列出目录内容（子目录或文件）
    #[error("Unable to access directory: {}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 其它文件系统错误，整个运行将中止
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid file mask '{mask}': {source}")]
    InvalidMask {
        mask: String,
        #[source]
        source: globset::Error,
    },

    #[error("Root is not an existing directory: {}", .0.display())]
    InvalidRoot(PathBuf),
}

impl CleanError {
    pub fn directory_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DirectoryAccess {
            path: path.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 底层错误是否为权限不足
    pub fn is_access_denied(&self) -> bool {
        match self {
            Self::DirectoryAccess { source, .. } | Self::Io { source, .. } => {
                is_permission_denied(source)
            }
            _ => false,
        }
    }

    /// 出错的路径（如果有）
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::DirectoryAccess { path, .. } | Self::Io { path, .. } | Self::InvalidRoot(path) => {
                Some(path)
            }
            Self::InvalidMask { .. } => None,
        }
    }
}

pub(crate) fn is_permission_denied(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}

pub type Result<T> = std::result::Result<T, CleanError>;
