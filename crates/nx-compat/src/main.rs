use clap::{Parser, Subcommand};
use moon_nx_compat::env::AdapterEnv;
use moon_nx_compat::logging::init_logging;
use moon_nx_compat::{NxCompat, NxCompatError};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nx-compat", version, about = "Run Nx executors within moon tasks.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute an Nx executor for the currently running moon task.
    Execute {
        /// Executor in the format of package:executor.
        executor: String,

        /// Arguments passed to the executor as options.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging();

    match cli.command {
        Commands::Execute { executor, args } => {
            let working_dir = std::env::current_dir().map_err(|error| NxCompatError::Io {
                path: ".".into(),
                error,
            })?;

            let nx_compat = NxCompat::new(AdapterEnv::from_env()?, &working_dir);
            let code = nx_compat.execute(&executor, &args).await?;

            Ok(ExitCode::from(code))
        }
    }
}
