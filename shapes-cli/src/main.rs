use clap::Parser;

mod commands;
mod outcome;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shapes_core::logging::init_logging("warn");

    let cli = commands::Cli::parse();
    cli.handle().await
}
