//! Staging report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and diagnostics for one `copy_tree` run.
#[derive(Debug, Default, Clone)]
pub struct ReportStage {
    /// Direct children of the source root copied as files.
    pub cnt_files_staged: u64,
    /// Direct children of the source root merge-copied as directories.
    pub cnt_dirs_staged: u64,
    /// Files written at any depth.
    pub cnt_files_written: u64,
    /// Destination directories that did not exist before the run.
    pub cnt_dirs_created: u64,
    /// Entries skipped by exclude patterns or because of their kind.
    pub cnt_skipped: u64,
    /// Non-fatal notes collected during traversal.
    pub warnings: Vec<String>,
}

impl ReportStage {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_files_staged".to_string(), self.cnt_files_staged);
        dict_counts.insert("cnt_dirs_staged".to_string(), self.cnt_dirs_staged);
        dict_counts.insert("cnt_files_written".to_string(), self.cnt_files_written);
        dict_counts.insert("cnt_dirs_created".to_string(), self.cnt_dirs_created);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} files={} dirs={} written={} created={} skipped={} warnings={}",
            dict_counts["cnt_files_staged"],
            dict_counts["cnt_dirs_staged"],
            dict_counts["cnt_files_written"],
            dict_counts["cnt_dirs_created"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[STAGE]"))
    }
}

/// Mutable accumulator for staging statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportStageBuilder {
    report: ReportStage,
}

impl ReportStageBuilder {
    pub fn add_file_staged(&mut self) {
        self.report.cnt_files_staged += 1;
    }

    pub fn add_dir_staged(&mut self) {
        self.report.cnt_dirs_staged += 1;
    }

    pub fn add_file_written(&mut self) {
        self.report.cnt_files_written += 1;
    }

    pub fn add_dir_created(&mut self) {
        self.report.cnt_dirs_created += 1;
    }

    pub fn add_skipped(&mut self) {
        self.report.cnt_skipped += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.report.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportStage {
        self.report
    }
}
