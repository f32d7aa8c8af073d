use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;
mod reporter;

/// Correctness oracle for array clone and copy.
///
/// Runs a fixed catalogue of clone/copy scenarios many times each and checks
/// every result against the canonical source buffers, including the runtime
/// checks (bounds, store type) a copy must never skip.
///
/// EXAMPLES:
///     copycheck run                      Run every scenario
///     copycheck run --filter overlap     Run only overlapping-copy scenarios
///     copycheck run -n 100 --json        Short run, JSON report
///     copycheck list                     Show the scenario catalogue
///
/// ENVIRONMENT VARIABLES:
///     COPYCHECK_ITERATIONS  Invocations per scenario
///     COPYCHECK_WARMUP      Calls per warm-up hook
///     COPYCHECK_ATTEMPTS    Calls per expected-violation hook
///     COPYCHECK_VERBOSE     Set to '1' to list passing scenarios too
///     COPYCHECK_JSON        Set to '1' for JSON output by default
///     COPYCHECK_LOG         Log filter (e.g. 'copycheck_harness=debug')
///     NO_COLOR              Set to disable colored output
#[derive(Parser)]
#[command(name = "copycheck")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario plan
    ///
    /// Exits with status 1 when any scenario produced a wrong result or an
    /// expected violation was never raised, and with status 2 when the run
    /// was aborted by an unexpected violation.
    ///
    /// EXAMPLES:
    ///     copycheck run                        Full run with configured budgets
    ///     copycheck run --iterations 100       Fewer invocations per scenario
    ///     copycheck run --filter copy_of       Only copy_of scenarios and their hooks
    ///     copycheck run --config ci.toml       Use an explicit config file
    #[command(visible_alias = "r")]
    Run {
        /// Invocations per scenario
        #[arg(long, short = 'n')]
        iterations: Option<u32>,
        /// Calls per warm-up hook
        #[arg(long)]
        warmup: Option<u32>,
        /// Calls per expected-violation hook
        #[arg(long)]
        attempts: Option<u32>,
        /// Only run scenarios whose name contains this pattern
        #[arg(long, short = 'f')]
        filter: Option<String>,
        /// Config file (defaults to the nearest copycheck.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
        /// Output the report in JSON format
        #[arg(long, env = "COPYCHECK_JSON")]
        json: bool,
        /// List passing scenarios too
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List the scenario catalogue
    ///
    /// EXAMPLES:
    ///     copycheck list           Names, shapes and summaries
    ///     copycheck list --json    Machine-readable listing
    #[command(visible_alias = "ls")]
    List {
        /// Output in JSON format
        #[arg(long, env = "COPYCHECK_JSON")]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     copycheck completions bash > ~/.bash_completions/copycheck.bash
    ///     copycheck completions zsh > ~/.zfunc/_copycheck
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();
    cli_config.init_tracing();

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Run {
            iterations,
            warmup,
            attempts,
            filter,
            config,
            json,
            verbose,
            no_color,
        } => {
            let args = commands::run::RunArgs {
                iterations,
                warmup,
                attempts,
                filter,
                config,
                json,
                verbose,
                no_color,
            };
            let passed = commands::run::run(args)?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::List { json } => {
            commands::list::run(json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}
