//! Staging configuration models and top-level error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Constants

/// Source directory used when the caller does not name one.
pub const C_DIR_SOURCE_DEFAULT: &str = "./data";
/// Name of the directory appended to the ascended working directory.
pub const C_NAME_DIR_DESTINATION_DEFAULT: &str = "data";
/// Number of parent levels between the working directory and the destination.
pub const N_LEVELS_UP_DEFAULT: usize = 4;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for exclude lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern.
    Regex,
    /// Substring match.
    Literal,
}

/// What the caller does with a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumFailureMode {
    /// Report the failure and still exit successfully. Never breaks a build.
    #[default]
    BestEffort,
    /// Report the failure and exit with a failure code.
    Strict,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `copy_tree`.
#[derive(Debug, Clone)]
pub struct SpecStageOptions {
    /// Exclude patterns applied to file and directory basenames at every depth.
    pub patterns_exclude: Option<Vec<String>>,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumCopyPatternMode,
}

impl Default for SpecStageOptions {
    fn default() -> Self {
        Self {
            patterns_exclude: None,
            rule_pattern: EnumCopyPatternMode::Glob,
        }
    }
}

/// Source/destination pair plus the failure policy for one staging run.
#[derive(Debug, Clone)]
pub struct SpecStageConfig {
    /// Source root, relative to the working directory unless absolute.
    pub path_dir_src: PathBuf,
    /// Destination root, created if missing and never cleared.
    pub path_dir_dst: PathBuf,
    /// How the caller reacts to a failed run.
    pub rule_failure: EnumFailureMode,
    /// Copy options forwarded to `copy_tree`.
    pub spec_stage_options: SpecStageOptions,
}

/// Relative default destination: `n_levels_up` parent steps, then `data`.
pub fn default_destination(n_levels_up: usize) -> PathBuf {
    let mut path_dir_dst = PathBuf::new();
    for _ in 0..n_levels_up {
        path_dir_dst.push("..");
    }
    path_dir_dst.push(C_NAME_DIR_DESTINATION_DEFAULT);
    path_dir_dst
}

impl Default for SpecStageConfig {
    fn default() -> Self {
        Self {
            path_dir_src: PathBuf::from(C_DIR_SOURCE_DEFAULT),
            path_dir_dst: default_destination(N_LEVELS_UP_DEFAULT),
            rule_failure: EnumFailureMode::default(),
            spec_stage_options: SpecStageOptions::default(),
        }
    }
}

/// Errors that abort a staging run.
///
/// Anything already written before the error stays in place.
#[derive(Debug, Error)]
pub enum StageError {
    /// Current working directory could not be determined.
    #[error("Failed to read current working directory: {0}")]
    WorkingDirectory(#[source] io::Error),
    /// Resolved source path does not exist.
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Source path exists but is not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    /// Destination is the source itself or lies inside it.
    #[error(
        "Source and destination directories overlap: {} -> {}",
        source_dir.display(),
        destination_dir.display()
    )]
    SourceDestinationOverlap {
        source_dir: PathBuf,
        destination_dir: PathBuf,
    },
    /// Destination root could not be created.
    #[error("Failed to initialize destination {}: {source}", path.display())]
    DestinationInitFailed {
        /// Destination root.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A source directory could not be listed.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A destination subdirectory could not be created.
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// File bytes could not be copied.
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Permissions, timestamps or xattrs could not be applied.
    #[error("Failed to copy metadata from {} to {}: {source}", from.display(), to.display())]
    CopyMetadata {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Invalid exclude pattern.
    #[error("{0}")]
    InvalidPattern(String),
    /// Status line could not be written.
    #[error("Failed to write status output: {0}")]
    StatusOutput(#[source] io::Error),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
