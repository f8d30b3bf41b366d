//! `assetkit_io_fs`:
//! Post-install asset staging engine.
//!
//! Modules:
//! - `copy`   : source-root traversal and merge-copy
//! - `spec`   : enums/options/config/errors
//! - `report` : run-time report model
//! - `util`   : pattern, path and metadata helpers

pub mod copy;
pub mod report;
pub mod spec;
mod util;

pub use copy::{copy_tree, copy_tree_with_status, stage_with_config};
pub use report::{ReportStage, ReportStageBuilder};
pub use spec::{
    C_DIR_SOURCE_DEFAULT, C_NAME_DIR_DESTINATION_DEFAULT, EnumCopyPatternMode, EnumFailureMode,
    N_LEVELS_UP_DEFAULT, SpecStageConfig, SpecStageOptions, StageError, default_destination,
};
pub use util::resolve_path;
