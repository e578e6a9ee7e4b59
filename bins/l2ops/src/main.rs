use clap::Parser;
use color_eyre::eyre::Result;
use l2ops::cmd::Cli;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    cli.logging.init()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(cli.command.run())?;
    Ok(code)
}
