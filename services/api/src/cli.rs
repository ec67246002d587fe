use crate::infra::{build_service, print_queues};
use crate::review::{run_review, ReviewArgs};
use crate::server;
use bidflow::config::AppConfig;
use bidflow::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bidflow",
    about = "Track solicitations through matching, qualification, and proposal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the matching, qualification, and proposal queues
    Queues(SeedArgs),
    /// Review one company's matching queue a solicitation at a time
    Review(ReviewArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct SeedArgs {
    /// CSV export used to seed the store (overrides BIDFLOW_SEED_CSV)
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
}

impl SeedArgs {
    pub(crate) fn resolve(&self, config: &AppConfig) -> Option<PathBuf> {
        self.seed_csv
            .clone()
            .or_else(|| config.pipeline.seed_csv.clone())
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) seed: SeedArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Queues(args) => {
            let config = AppConfig::load()?;
            let (service, _) = build_service(args.resolve(&config))?;
            print_queues(&service);
            Ok(())
        }
        Command::Review(args) => run_review(args),
    }
}
