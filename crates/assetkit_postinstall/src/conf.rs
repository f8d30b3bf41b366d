//! Command-line surface and configuration resolution.
//!
//! Every flag defaults to the historical hardcoded value, so running the
//! binary without arguments stages `./data` into `<cwd>/../../../../data`.

use std::path::{Path, PathBuf};

use assetkit_io_fs::{
    C_DIR_SOURCE_DEFAULT, EnumCopyPatternMode, EnumFailureMode, N_LEVELS_UP_DEFAULT,
    SpecStageConfig, SpecStageOptions, default_destination, resolve_path,
};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliPatternMode {
    Glob,
    Regex,
    Literal,
}

impl From<CliPatternMode> for EnumCopyPatternMode {
    fn from(value: CliPatternMode) -> Self {
        match value {
            CliPatternMode::Glob => Self::Glob,
            CliPatternMode::Regex => Self::Regex,
            CliPatternMode::Literal => Self::Literal,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Stage the local data directory into the project data directory after install"
)]
pub struct Cli {
    /// Directory whose direct children are staged.
    #[arg(long, value_name = "PATH", default_value = C_DIR_SOURCE_DEFAULT)]
    pub source: PathBuf,
    /// Destination root. Defaults to the working directory ascended
    /// `--levels-up` times, plus `data`.
    #[arg(long, value_name = "PATH")]
    pub destination: Option<PathBuf>,
    /// Parent levels used for the default destination.
    #[arg(long, value_name = "N", default_value_t = N_LEVELS_UP_DEFAULT)]
    pub levels_up: usize,
    /// Exit with a failure code when staging fails.
    #[arg(long)]
    pub strict: bool,
    /// Basename pattern to leave out (repeatable).
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub patterns_exclude: Vec<String>,
    /// How `--exclude` patterns are interpreted.
    #[arg(long, value_enum, default_value_t = CliPatternMode::Glob)]
    pub pattern_mode: CliPatternMode,
}

impl Cli {
    pub fn rule_failure(&self) -> EnumFailureMode {
        if self.strict {
            EnumFailureMode::Strict
        } else {
            EnumFailureMode::BestEffort
        }
    }

    /// Build the staging configuration relative to `path_dir_cwd`.
    ///
    /// The source stays as given; `copy_tree` resolves it itself so that
    /// its not-found message carries the absolute path.
    pub fn into_config(self, path_dir_cwd: &Path) -> SpecStageConfig {
        let rule_failure = self.rule_failure();
        let path_dir_dst = match self.destination {
            Some(path) => resolve_path(path_dir_cwd, &path),
            None => resolve_path(path_dir_cwd, &default_destination(self.levels_up)),
        };
        let patterns_exclude = if self.patterns_exclude.is_empty() {
            None
        } else {
            Some(self.patterns_exclude)
        };

        SpecStageConfig {
            path_dir_src: self.source,
            path_dir_dst,
            rule_failure,
            spec_stage_options: SpecStageOptions {
                patterns_exclude,
                rule_pattern: self.pattern_mode.into(),
            },
        }
    }
}
