use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use filetime::{FileTime, set_file_times};
use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::spec::{EnumCopyPatternMode, StageError};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeCopyPatternSeq {
    Literal(Vec<String>),
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

impl TypeCopyPatternSeq {
    pub(crate) fn from_raw(
        patterns: Option<&[String]>,
        rule_pattern: EnumCopyPatternMode,
    ) -> Result<Option<Self>, StageError> {
        let Some(patterns) = patterns else {
            return Ok(None);
        };
        if patterns.is_empty() {
            return Ok(None);
        }

        match rule_pattern {
            EnumCopyPatternMode::Literal => Ok(Some(Self::Literal(patterns.to_vec()))),
            EnumCopyPatternMode::Glob => {
                let mut l_glob = Vec::with_capacity(patterns.len());
                for pattern in patterns {
                    let matcher = Glob::new(pattern)
                        .map_err(|e| {
                            StageError::InvalidPattern(format!("Invalid exclude pattern: {e}"))
                        })?
                        .compile_matcher();
                    l_glob.push(matcher);
                }
                Ok(Some(Self::Glob(l_glob)))
            }
            EnumCopyPatternMode::Regex => {
                let mut l_regex = Vec::with_capacity(patterns.len());
                for pattern in patterns {
                    let regex = Regex::new(pattern).map_err(|e| {
                        StageError::InvalidPattern(format!("Invalid exclude pattern: {e}"))
                    })?;
                    l_regex.push(regex);
                }
                Ok(Some(Self::Regex(l_regex)))
            }
        }
    }

    pub(crate) fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Literal(v) => v.iter().any(|p| value.contains(p.as_str())),
            Self::Glob(v) => v.iter().any(|p| p.is_match(value)),
            Self::Regex(v) => v.iter().any(|p| p.is_match(value)),
        }
    }
}

pub(crate) fn should_exclude_by_patterns(
    value: &str,
    patterns_exclude: Option<&TypeCopyPatternSeq>,
) -> bool {
    patterns_exclude.is_some_and(|p| p.is_match(value))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Join `path` onto `path_dir_base` unless absolute, then fold `.` and `..`
/// without touching the filesystem.
///
/// `..` above the root stays at the root.
pub fn resolve_path(path_dir_base: &Path, path: &Path) -> PathBuf {
    let path_joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        path_dir_base.join(path)
    };

    let mut path_resolved = PathBuf::new();
    for component in path_joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match path_resolved.components().next_back() {
                Some(Component::Normal(_)) => {
                    path_resolved.pop();
                }
                Some(Component::Prefix(_) | Component::RootDir) => {}
                Some(Component::CurDir | Component::ParentDir) | None => {
                    path_resolved.push(component.as_os_str());
                }
            },
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                path_resolved.push(component.as_os_str());
            }
        }
    }
    path_resolved
}

/// Canonicalize the longest existing ancestor of `path` and re-append the
/// missing tail, so that not-yet-created paths still see through symlinks.
fn normalize_path(path: &Path) -> PathBuf {
    let mut path_existing = path;
    let mut l_tail = Vec::new();
    loop {
        if let Ok(path_canonical) = fs::canonicalize(path_existing) {
            return l_tail
                .iter()
                .rev()
                .fold(path_canonical, |acc, name| acc.join(name));
        }
        match (path_existing.parent(), path_existing.file_name()) {
            (Some(parent), Some(name)) => {
                l_tail.push(name);
                path_existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// True when `path_inner` equals `path_outer` or lies below it.
///
/// Both paths must already be absolute and lexically resolved.
pub(crate) fn is_within(path_inner: &Path, path_outer: &Path) -> bool {
    path_inner.starts_with(path_outer)
        || normalize_path(path_inner).starts_with(normalize_path(path_outer))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Metadata

pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), StageError> {
    fs::copy(path_file_src, path_file_dst).map_err(|e| StageError::CopyFile {
        from: path_file_src.to_path_buf(),
        to: path_file_dst.to_path_buf(),
        source: e,
    })?;
    copy_metadata(path_file_src, path_file_dst)
}

/// Apply xattrs, permission bits and access/modification times of
/// `path_src` onto `path_dst`.
///
/// Times go last so that the xattr and chmod calls do not bump them.
pub(crate) fn copy_metadata(path_src: &Path, path_dst: &Path) -> Result<(), StageError> {
    apply_metadata(path_src, path_dst).map_err(|e| StageError::CopyMetadata {
        from: path_src.to_path_buf(),
        to: path_dst.to_path_buf(),
        source: e,
    })
}

fn apply_metadata(path_src: &Path, path_dst: &Path) -> Result<(), io::Error> {
    let stat_src = fs::metadata(path_src)?;

    #[cfg(target_os = "linux")]
    copy_xattrs_linux(path_src, path_dst);

    fs::set_permissions(path_dst, stat_src.permissions())?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_dst, file_time_access, file_time_modify)?;
    Ok(())
}

// Best-effort: filesystems without xattr support just drop them.
#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_src: &Path, path_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_src) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("Listing xattrs of {} failed ({e})", path_src.display());
            return;
        }
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_src, &name).ok().flatten() else {
            continue;
        };
        if let Err(e) = xattr::set(path_dst, &name, &raw_value) {
            log::debug!(
                "Setting xattr {} on {} failed ({e})",
                name.to_string_lossy(),
                path_dst.display()
            );
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
