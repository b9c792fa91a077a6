use std::path::PathBuf;

use clap::Parser;

mod cli;
mod logger;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "scanplc", about = "Checks, compiles and runs PLC logic programs")]
struct Args {
    /// Turn on verbose logging. Repeat to increase verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Sets the logging to write to a file.
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Selects the subcommand.
    #[command(subcommand)]
    action: Action,
}

#[derive(clap::Subcommand, Debug)]
enum Action {
    /// Checks that program files compile and reports any problems.
    Check {
        /// Paths of program files (one statement per line).
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Suppress diagnostic output.
        #[arg(long)]
        quiet: bool,
    },
    /// Compiles a program file and prints the postfix program.
    Compile {
        /// Path of the program file.
        file: PathBuf,

        /// Print the compiled program as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Compiles a program file and executes it in scan cycles.
    Run {
        /// Path of the program file.
        file: PathBuf,

        /// JSON file with timer and counter presets.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Raw input values, first input first, for example 10100000.
        #[arg(long)]
        inputs: Option<String>,

        /// Run N scan cycles then stop (default: continuous until Ctrl+C).
        #[arg(long)]
        scans: Option<u64>,

        /// Milliseconds between scan cycles.
        #[arg(long, default_value_t = 100)]
        period_ms: u64,

        /// Write the controller state as JSON to the specified file after
        /// execution.
        #[arg(long)]
        dump_state: Option<PathBuf>,

        /// Print the outputs after every scan cycle.
        #[arg(long)]
        trace: bool,
    },
    /// Prints the version number of the program.
    Version,
}

pub fn main() -> Result<(), String> {
    let args = Args::parse();

    logger::configure(args.verbose, args.log_file)?;

    match args.action {
        Action::Check { files, quiet } => cli::check(&files, quiet),
        Action::Compile { file, json } => cli::compile(&file, json),
        Action::Run {
            file,
            config,
            inputs,
            scans,
            period_ms,
            dump_state,
            trace,
        } => cli::run(&cli::RunOptions {
            file,
            config,
            inputs,
            scans,
            period_ms,
            dump_state,
            trace,
        }),
        Action::Version => {
            println!("scanplc version {VERSION}");
            Ok(())
        }
    }
}
