use globset::{GlobBuilder, GlobMatcher};
use std::fmt;
use std::path::{MAIN_SEPARATOR, Path};

use crate::error::{CleanError, Result};

/// Directory names matched case-insensitively against the end of a path.
///
/// Every name is anchored to a path separator, so `bin` matches `/src/app/bin`
/// but not `/src/app/mybin`. A name such as `obj/Debug` matches the last two
/// segments of a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    names: Vec<String>,
    suffixes: Vec<String>,
}

impl NameFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();

        for name in names {
            let name = name.as_ref();
            let trimmed = normalize(name).trim_matches('/').to_string();
            // 空名称会匹配任意路径，直接忽略
            if trimmed.is_empty() {
                continue;
            }
            filter.names.push(name.to_string());
            filter.suffixes.push(format!("/{trimmed}"));
        }

        filter
    }

    /// 路径是否以任一名称结尾
    pub fn matches(&self, path: &Path) -> bool {
        if self.suffixes.is_empty() {
            return false;
        }

        let path = normalize(&path.to_string_lossy());
        let path = path.trim_end_matches('/');
        self.suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

fn normalize(value: &str) -> String {
    let lowered = value.to_lowercase();
    if MAIN_SEPARATOR == '/' {
        lowered
    } else {
        lowered.replace(MAIN_SEPARATOR, "/")
    }
}

/// 目录匹配条件：包含名单与排除名单
///
/// `include` 为 `None` 时所有未被排除的目录都满足条件。
#[derive(Debug, Clone, Default)]
pub struct DirectoryCriteria {
    pub include: Option<NameFilter>,
    pub exclude: Option<NameFilter>,
}

impl DirectoryCriteria {
    pub fn new(include: Option<NameFilter>, exclude: Option<NameFilter>) -> Self {
        Self { include, exclude }
    }

    /// 不设包含名单，仅排除指定名称
    pub fn excluding(exclude: NameFilter) -> Self {
        Self {
            include: None,
            exclude: Some(exclude),
        }
    }

    /// 被排除的目录连同其子树一起跳过
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.as_ref().is_some_and(|f| f.matches(path))
    }

    pub fn is_included(&self, path: &Path) -> bool {
        match &self.include {
            Some(filter) => filter.matches(path),
            None => true,
        }
    }
}

/// A glob pattern selecting files by name within a single directory.
///
/// Matching is case-insensitive and applies to the file name only.
#[derive(Debug, Clone)]
pub struct FileMask {
    pattern: String,
    matcher: GlobMatcher,
}

impl FileMask {
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|source| CleanError::InvalidMask {
                mask: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    /// 解析一组掩码，任一无效即返回错误
    pub fn parse_all<I, S>(patterns: I) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns
            .into_iter()
            .map(|pattern| Self::new(pattern.as_ref()))
            .collect()
    }

    pub fn matches_name(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }

    /// 仅比较路径的文件名部分
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.matcher.is_match(Path::new(name)))
    }
}

impl fmt::Display for FileMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_name_filter_matches_basename() {
        let filter = NameFilter::new(["bin", "obj"]);

        assert!(filter.matches(&PathBuf::from("/repo/app/bin")));
        assert!(filter.matches(&PathBuf::from("/repo/app/OBJ")));
        assert!(!filter.matches(&PathBuf::from("/repo/app/mybin")));
        assert!(!filter.matches(&PathBuf::from("/repo/app/bin/debug")));
    }

    #[test]
    fn test_name_filter_multi_segment() {
        let filter = NameFilter::new(["obj/Debug"]);

        assert!(filter.matches(&PathBuf::from("/repo/app/obj/debug")));
        assert!(!filter.matches(&PathBuf::from("/repo/app/debug")));
    }

    #[test]
    fn test_name_filter_ignores_blank_names() {
        let filter = NameFilter::new(["", "/", "bin"]);

        assert_eq!(filter.names(), ["bin"]);
        assert!(!filter.matches(&PathBuf::from("/repo/src")));
        assert!(NameFilter::new(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_criteria_without_include_accepts_everything_not_excluded() {
        let criteria = DirectoryCriteria::excluding(NameFilter::new([".git"]));

        assert!(criteria.is_included(&PathBuf::from("/repo/src")));
        assert!(criteria.is_excluded(&PathBuf::from("/repo/.GIT")));
        assert!(!criteria.is_excluded(&PathBuf::from("/repo/.github")));
    }

    #[test]
    fn test_file_mask_case_insensitive() -> Result<()> {
        let mask = FileMask::new("*.dll")?;

        assert!(mask.matches(&PathBuf::from("/repo/bin/App.DLL")));
        assert!(mask.matches_name(".hidden.dll"));
        assert!(!mask.matches(&PathBuf::from("/repo/bin/app.dll.config")));
        assert!(!mask.matches_name("app.pdb"));
        Ok(())
    }

    #[test]
    fn test_literal_mask_matches_exact_name() -> Result<()> {
        let mask = FileMask::new(".cache")?;

        assert!(mask.matches_name(".cache"));
        assert!(!mask.matches_name("temp.cache"));
        assert_eq!(mask.to_string(), ".cache");
        Ok(())
    }

    #[test]
    fn test_invalid_mask() {
        let err = FileMask::parse_all(["*.dll", "[unclosed"]).unwrap_err();
        assert!(matches!(err, CleanError::InvalidMask { ref mask, .. } if mask == "[unclosed"));
    }
}
