use std::io::Write;

use clap::Parser;

use stockroom_cli::{AppConfig, Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?.with_overrides(cli.file, cli.threshold);

    stockroom_observability::init_with(config.log_format);
    tracing::debug!(file = %config.data_file.display(), "using inventory file");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    stockroom_cli::run(cli.command.unwrap_or(Command::Demo), &config, &mut out)?;
    out.flush()?;
    Ok(())
}
