use serde::{Deserialize, Serialize};
use std::path::Path;

/// 单次文件操作的结果分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Success,
    Failure,
}

/// The outcome of a single file-deletion attempt.
///
/// A success carries the deleted file's full path, a failure carries a
/// human-readable reason. Instances are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    kind: OperationKind,
    messages: Vec<String>,
}

impl OperationResult {
    pub fn success<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: OperationKind::Success,
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn failure<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: OperationKind::Failure,
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// 文件已删除
    pub fn deleted(path: &Path) -> Self {
        Self::success([path.display().to_string()])
    }

    /// 权限不足，删除失败
    pub fn access_denied(path: &Path) -> Self {
        Self::failure([format!("Access denied deleting file: {}", path.display())])
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn is_success(&self) -> bool {
        self.kind == OperationKind::Success
    }

    pub fn is_failure(&self) -> bool {
        self.kind == OperationKind::Failure
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}
