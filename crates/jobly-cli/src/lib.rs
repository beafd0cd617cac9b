mod cli;
mod commands;
mod logger;

use tracing::level_filters::LevelFilter;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    if let cli::Command::Help(topic) = cmd {
        cli::print_help(topic);
        return Ok(());
    }

    logger::setup_logger(LevelFilter::INFO);
    match cmd {
        cli::Command::Help(_) => Ok(()),
        cli::Command::Migrate(args) => commands::migrate(args).await,
        cli::Command::Token(args) => commands::token(args),
        cli::Command::Jobs(args) => commands::list_jobs(args).await,
        cli::Command::Companies(args) => commands::list_companies(args).await,
    }
}
