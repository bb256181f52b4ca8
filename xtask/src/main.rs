//! Task table tooling, run as `cargo xtask <command>`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod output;
mod table;

use output::Output;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Provision and seed the taskdeck DynamoDB table")]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    /// Only print errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Table that holds the tasks
    #[arg(long, global = true, default_value = "tasks", env = "TABLE_NAME")]
    table_name: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the table if it is missing and wait until it is ACTIVE
    ///
    /// Honors AWS_ENDPOINT_URL (e.g. http://localhost:8000 for DynamoDB Local),
    /// AWS_REGION and AWS_PROFILE.
    Up,
    /// Delete the table along with every task in it
    Down,
    /// Insert randomly generated tasks into an existing table
    Seed {
        /// Number of tasks to insert
        #[arg(long, default_value_t = 15)]
        count: u32,

        /// Print every generated task, not just the first few
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let out = Output::new(cli.quiet, cli.yes);

    let result = match cli.command {
        Command::Up => table::up(&cli.table_name, &out).await,
        Command::Down => table::down(&cli.table_name, &out).await,
        Command::Seed { count, all } => table::seed(&cli.table_name, count, all, &out).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            out.failure(&err);
            ExitCode::FAILURE
        }
    }
}
