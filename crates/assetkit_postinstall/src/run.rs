//! Top-level runner: one staging pass, one outcome line, one exit status.

use std::io::Write;

use assetkit_io_fs::{EnumFailureMode, SpecStageConfig, StageError, stage_with_config};

use crate::conf::Cli;

pub const N_EXIT_SUCCESS: u8 = 0;
pub const N_EXIT_FAILURE: u8 = 1;

/// Resolve `cli` against the current directory and stage once.
pub fn run_cli<W: Write>(cli: Cli, writer: &mut W) -> u8 {
    let rule_failure = cli.rule_failure();
    let path_dir_cwd = match std::env::current_dir() {
        Ok(v) => v,
        Err(e) => {
            return report_failure(&StageError::WorkingDirectory(e), rule_failure, writer);
        }
    };

    let spec_stage_config = cli.into_config(&path_dir_cwd);
    log::info!("Resolved configuration: {spec_stage_config:?}");
    run(&spec_stage_config, writer)
}

/// Stage with `spec_stage_config`, writing status lines to `writer`.
///
/// Returns the process exit status. In best-effort mode this is always
/// success, even when the copy failed.
pub fn run<W: Write>(spec_stage_config: &SpecStageConfig, writer: &mut W) -> u8 {
    match stage_with_config(spec_stage_config, writer) {
        Ok(_) => N_EXIT_SUCCESS,
        Err(err) => report_failure(&err, spec_stage_config.rule_failure, writer),
    }
}

fn report_failure<W: Write>(
    err: &StageError,
    rule_failure: EnumFailureMode,
    writer: &mut W,
) -> u8 {
    log::debug!("Staging failed: {err:?}");
    if let Err(e) = writeln!(writer, "Error while copying: {err}") {
        log::error!("Failed to write error line ({e}): {err}");
    }

    match rule_failure {
        EnumFailureMode::BestEffort => N_EXIT_SUCCESS,
        EnumFailureMode::Strict => N_EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use assetkit_io_fs::{EnumFailureMode, SpecStageConfig};

    use super::{N_EXIT_FAILURE, N_EXIT_SUCCESS, run};

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            static N_COUNTER: AtomicUsize = AtomicUsize::new(0);
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let n_seq = N_COUNTER.fetch_add(1, Ordering::Relaxed);
            let path = std::env::temp_dir().join(format!(
                "assetkit_postinstall_test_{}_{n}_{n_seq}",
                std::process::id()
            ));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    fn config(src: &Path, dst: &Path, rule_failure: EnumFailureMode) -> SpecStageConfig {
        SpecStageConfig {
            path_dir_src: src.to_path_buf(),
            path_dir_dst: dst.to_path_buf(),
            rule_failure,
            ..SpecStageConfig::default()
        }
    }

    fn run_to_string(spec_stage_config: &SpecStageConfig) -> (u8, String) {
        let mut out = Vec::new();
        let n_exit = run(spec_stage_config, &mut out);
        (n_exit, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn success_prints_status_and_summary() {
        let tmp = TestDir::new();
        let src = tmp.path().join("data");
        let dst = tmp.path().join("out");
        std::fs::create_dir_all(&src).expect("mkdir src");
        std::fs::write(src.join("framework.js"), "class Framework {}").expect("write");

        let (n_exit, out) = run_to_string(&config(&src, &dst, EnumFailureMode::BestEffort));

        assert_eq!(n_exit, N_EXIT_SUCCESS);
        assert_eq!(
            out,
            format!(
                "Copied: framework.js\n\nAll files were copied successfully to: {}\n",
                dst.display()
            )
        );
        assert_eq!(
            std::fs::read_to_string(dst.join("framework.js")).expect("read"),
            "class Framework {}"
        );
    }

    #[test]
    fn missing_source_is_success_in_best_effort_mode() {
        let tmp = TestDir::new();
        let src = tmp.path().join("data");
        let dst = tmp.path().join("out");

        let (n_exit, out) = run_to_string(&config(&src, &dst, EnumFailureMode::BestEffort));

        assert_eq!(n_exit, N_EXIT_SUCCESS);
        assert!(out.starts_with("Error while copying: Source directory not found: "));
        assert!(out.contains(&src.display().to_string()));
        assert_eq!(out.lines().count(), 1);
        assert!(dst.is_dir());
    }

    #[test]
    fn missing_source_fails_in_strict_mode() {
        let tmp = TestDir::new();
        let src = tmp.path().join("data");
        let dst = tmp.path().join("out");

        let (n_exit, out) = run_to_string(&config(&src, &dst, EnumFailureMode::Strict));

        assert_eq!(n_exit, N_EXIT_FAILURE);
        assert!(out.starts_with("Error while copying: "));
    }

    #[test]
    fn failure_mid_copy_reports_error_without_summary() {
        let tmp = TestDir::new();
        let src = tmp.path().join("data");
        let dst = tmp.path().join("out");
        std::fs::create_dir_all(src.join("clash")).expect("mkdir clash");
        std::fs::create_dir_all(&dst).expect("mkdir dst");
        std::fs::write(dst.join("clash"), "file in the way").expect("write");

        let (n_exit, out) = run_to_string(&config(&src, &dst, EnumFailureMode::BestEffort));

        assert_eq!(n_exit, N_EXIT_SUCCESS);
        assert!(out.ends_with('\n'));
        assert!(out.contains("Error while copying: Failed to create directory"));
        assert!(!out.contains("All files were copied successfully"));
    }
}
