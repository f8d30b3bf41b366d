//! Source-root traversal and merge-copy orchestration.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::report::{ReportStage, ReportStageBuilder};
use crate::spec::{SpecStageConfig, SpecStageOptions, StageError};
use crate::util::{
    TypeCopyPatternSeq, copy_file_with_metadata, copy_metadata, is_within, resolve_path,
    should_exclude_by_patterns,
};

#[derive(Debug)]
struct SpecSourceEntry {
    path_src_item: PathBuf,
    name_item: OsString,
    enum_kind: EnumEntryKind,
}

impl SpecSourceEntry {
    /// Lossy name for pattern matching and status lines only.
    fn display_name(&self) -> String {
        self.name_item.to_string_lossy().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumEntryKind {
    File,
    Dir,
    Other,
}

#[derive(Debug)]
struct SpecStageContext {
    spec_stage_pats: Option<TypeCopyPatternSeq>,
    builder_stage_report: ReportStageBuilder,
}

/// Copy every direct child of `dir_source` into `dir_destination`, writing
/// status lines to stdout.
///
/// See [`copy_tree_with_status`].
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_stage_options: &SpecStageOptions,
) -> Result<ReportStage, StageError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    copy_tree_with_status(dir_source, dir_destination, spec_stage_options, &mut writer)
}

/// Run [`copy_tree_with_status`] with the paths and options of a
/// [`SpecStageConfig`].
pub fn stage_with_config<W: Write>(
    spec_stage_config: &SpecStageConfig,
    writer: &mut W,
) -> Result<ReportStage, StageError> {
    copy_tree_with_status(
        &spec_stage_config.path_dir_src,
        &spec_stage_config.path_dir_dst,
        &spec_stage_config.spec_stage_options,
        writer,
    )
}

/// Copy every direct child of `dir_source` into `dir_destination`.
///
/// Steps, in order:
/// 0. Fail with [`StageError::SourceDestinationOverlap`] if the destination
///    is the source or lies inside it.
/// 1. Create `dir_destination` with all missing ancestors.
/// 2. Resolve `dir_source` against the current working directory.
/// 3. Fail with [`StageError::SourceNotFound`] if it does not exist.
/// 4. Copy regular files with their metadata and merge-copy directories,
///    overwriting same-named destination files. Symlinks and special files
///    are skipped at every depth. One status line per direct child.
/// 5. Write the summary line.
///
/// The destination is never cleared and nothing is rolled back on error.
pub fn copy_tree_with_status<P, Q, W>(
    dir_source: P,
    dir_destination: Q,
    spec_stage_options: &SpecStageOptions,
    writer: &mut W,
) -> Result<ReportStage, StageError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    W: Write,
{
    let path_dir_cwd = std::env::current_dir().map_err(StageError::WorkingDirectory)?;
    stage_tree(
        &path_dir_cwd,
        dir_source.as_ref(),
        dir_destination.as_ref(),
        spec_stage_options,
        writer,
    )
}

fn stage_tree<W: Write>(
    path_dir_cwd: &Path,
    path_dir_src: &Path,
    path_dir_dst: &Path,
    spec_stage_options: &SpecStageOptions,
    writer: &mut W,
) -> Result<ReportStage, StageError> {
    let path_dir_dst_abs = resolve_path(path_dir_cwd, path_dir_dst);
    let path_dir_src_abs = resolve_path(path_dir_cwd, path_dir_src);
    if is_within(&path_dir_dst_abs, &path_dir_src_abs) {
        return Err(StageError::SourceDestinationOverlap {
            source_dir: path_dir_src_abs,
            destination_dir: path_dir_dst_abs,
        });
    }
    fs::create_dir_all(&path_dir_dst_abs).map_err(|e| StageError::DestinationInitFailed {
        path: path_dir_dst_abs.clone(),
        source: e,
    })?;

    if !path_dir_src_abs.exists() {
        return Err(StageError::SourceNotFound(path_dir_src_abs));
    }
    if !path_dir_src_abs.is_dir() {
        return Err(StageError::SourceNotDirectory(path_dir_src_abs));
    }
    log::info!(
        "Staging {} -> {}",
        path_dir_src_abs.display(),
        path_dir_dst_abs.display()
    );

    let spec_stage_pats = TypeCopyPatternSeq::from_raw(
        spec_stage_options.patterns_exclude.as_deref(),
        spec_stage_options.rule_pattern,
    )?;
    let mut spec_stage_ctx = SpecStageContext {
        spec_stage_pats,
        builder_stage_report: ReportStageBuilder::default(),
    };

    for spec_entry in list_entries(&path_dir_src_abs)? {
        if should_skip_entry(&spec_entry, &mut spec_stage_ctx) {
            continue;
        }

        let name_item = spec_entry.display_name();
        let path_dst_item = path_dir_dst_abs.join(&spec_entry.name_item);
        if spec_entry.enum_kind == EnumEntryKind::File {
            copy_file_with_metadata(&spec_entry.path_src_item, &path_dst_item)?;
            spec_stage_ctx.builder_stage_report.add_file_written();
            spec_stage_ctx.builder_stage_report.add_file_staged();
            writeln!(writer, "Copied: {name_item}").map_err(StageError::StatusOutput)?;
        } else {
            merge_directory(&spec_entry.path_src_item, &path_dst_item, &mut spec_stage_ctx)?;
            spec_stage_ctx.builder_stage_report.add_dir_staged();
            writeln!(writer, "Copied directory: {name_item}")
                .map_err(StageError::StatusOutput)?;
        }
    }

    writeln!(
        writer,
        "\nAll files were copied successfully to: {}",
        path_dir_dst.display()
    )
    .map_err(StageError::StatusOutput)?;

    let report_stage = spec_stage_ctx.builder_stage_report.build();
    log::info!("{report_stage}");
    Ok(report_stage)
}

/// Recursively copy `path_dir_src` into `path_dir_dst`, creating it if
/// needed. Same-path files are overwritten; destination-only files stay.
fn merge_directory(
    path_dir_src: &Path,
    path_dir_dst: &Path,
    spec_stage_ctx: &mut SpecStageContext,
) -> Result<(), StageError> {
    if !path_dir_dst.is_dir() {
        fs::create_dir_all(path_dir_dst).map_err(|e| StageError::CreateDir {
            path: path_dir_dst.to_path_buf(),
            source: e,
        })?;
        spec_stage_ctx.builder_stage_report.add_dir_created();
    }

    for spec_entry in list_entries(path_dir_src)? {
        if should_skip_entry(&spec_entry, spec_stage_ctx) {
            continue;
        }

        let path_src_item = &spec_entry.path_src_item;
        let path_dst_item = path_dir_dst.join(&spec_entry.name_item);
        if spec_entry.enum_kind == EnumEntryKind::File {
            log::debug!(
                "Copy {} -> {}",
                path_src_item.display(),
                path_dst_item.display()
            );
            copy_file_with_metadata(path_src_item, &path_dst_item)?;
            spec_stage_ctx.builder_stage_report.add_file_written();
        } else {
            merge_directory(path_src_item, &path_dst_item, spec_stage_ctx)?;
        }
    }

    copy_metadata(path_dir_src, path_dir_dst)
}

fn list_entries(path_dir: &Path) -> Result<Vec<SpecSourceEntry>, StageError> {
    let map_read_err = |e: io::Error| StageError::ReadDir {
        path: path_dir.to_path_buf(),
        source: e,
    };

    let mut l_entries = Vec::new();
    for entry_res in fs::read_dir(path_dir).map_err(map_read_err)? {
        let entry = entry_res.map_err(map_read_err)?;
        // `DirEntry::file_type` does not follow symlinks.
        let cfg_file_type = entry.file_type().map_err(map_read_err)?;
        let enum_kind = if cfg_file_type.is_file() {
            EnumEntryKind::File
        } else if cfg_file_type.is_dir() {
            EnumEntryKind::Dir
        } else {
            EnumEntryKind::Other
        };
        l_entries.push(SpecSourceEntry {
            path_src_item: entry.path(),
            name_item: entry.file_name(),
            enum_kind,
        });
    }
    Ok(l_entries)
}

fn should_skip_entry(spec_entry: &SpecSourceEntry, spec_stage_ctx: &mut SpecStageContext) -> bool {
    let path_src_item = &spec_entry.path_src_item;
    if spec_entry.enum_kind == EnumEntryKind::Other {
        log::debug!("Skipping special entry: {}", path_src_item.display());
        spec_stage_ctx
            .builder_stage_report
            .add_warning(format!("Special entry skipped: {}", path_src_item.display()));
        spec_stage_ctx.builder_stage_report.add_skipped();
        return true;
    }
    if should_exclude_by_patterns(
        &spec_entry.display_name(),
        spec_stage_ctx.spec_stage_pats.as_ref(),
    ) {
        log::debug!("Excluded: {}", path_src_item.display());
        spec_stage_ctx.builder_stage_report.add_skipped();
        return true;
    }
    false
}
