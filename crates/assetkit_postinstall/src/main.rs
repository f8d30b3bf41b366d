use std::io;
use std::process::ExitCode;

use assetkit_postinstall::conf::Cli;
use assetkit_postinstall::run::run_cli;
use clap::Parser;

fn main() -> ExitCode {
    const LOG_FILTER_VAR: &str = "ASSETKIT_LOG";
    const LOG_WRITE_STYLE_VAR: &str = "ASSETKIT_LOG_STYLE";
    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or(LOG_FILTER_VAR, "warn")
            .write_style(LOG_WRITE_STYLE_VAR),
    )
    .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    ExitCode::from(run_cli(cli, &mut writer))
}
