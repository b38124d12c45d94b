// Licensed under MIT. See LICENSE for details.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dl2kyx::config::Config;
use dl2kyx::error::{ConfigError, PipelineError};
use dl2kyx::pipeline::run_job;
use dl2kyx::{Dialect, JobType, Pipeline};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "dl2kyx", version)]
#[command(about = "Translates DL and RelDL programs into KeYmaeraX archives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a job on every input, writing results to the output directory
    Run {
        /// DLASTGENERATION, DLTOKEYMAERAXOUTPUT, RELDLASTGENERATION or RELDLTOKEYMAERAXOUTPUT
        #[arg(value_name = "JOB")]
        job: String,

        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Print the AST of one input
    Ast {
        #[arg(short, long, value_enum, default_value_t = DialectArg::Dl)]
        dialect: DialectArg,

        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Print the KeYmaeraX archive of one input
    Convert {
        #[arg(short, long, value_enum, default_value_t = DialectArg::Dl)]
        dialect: DialectArg,

        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DialectArg {
    Dl,
    Reldl,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Dl => Dialect::Dl,
            DialectArg::Reldl => Dialect::RelDl,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured by the file, so it cannot report on loading it.
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_filter, cli.verbose);
    info!("dl2kyx v{}", VERSION);

    let pipeline = Pipeline::new();
    let ok = match cli.command {
        Commands::Run { job, inputs } => run(&config, &pipeline, &job, &inputs),
        Commands::Ast { dialect, input } => print_output(&input, |source| {
            pipeline.generate_ast(dialect.into(), source).map(Some)
        }),
        Commands::Convert { dialect, input } => {
            print_output(&input, |source| pipeline.convert(dialect.into(), source))
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_logging(filter: &str, verbose: bool) {
    let directive = if verbose { "debug" } else { filter };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    }
}

// Every input is processed on its own; one failure does not stop the rest.
fn run(config: &Config, pipeline: &Pipeline, job: &str, inputs: &[PathBuf]) -> bool {
    let job: JobType = match job.parse() {
        Ok(job) => job,
        Err(err) => {
            error!("{}", err);
            return false;
        }
    };

    let mut failures = 0;
    for input in inputs {
        match run_job(config, pipeline, job, input) {
            Ok(Some(path)) => println!("{}", path.display()),
            Ok(None) => warn!("{:?}: nothing to write", input),
            Err(err) => {
                error!("{:?}: {}", input, err);
                failures += 1;
            }
        }
    }

    info!(
        "{} finished, {} of {} input(s) failed",
        job,
        failures,
        inputs.len()
    );
    failures == 0
}

fn print_output<F>(input: &Path, produce: F) -> bool
where
    F: FnOnce(&str) -> Result<Option<String>, PipelineError>,
{
    let source = match fs::read_to_string(input) {
        Ok(source) => source,
        Err(err) => {
            error!("failed to read {:?}: {}", input, err);
            return false;
        }
    };

    match produce(&source) {
        Ok(Some(output)) => {
            println!("{}", output);
            true
        }
        Ok(None) => {
            warn!("{:?}: nothing to print", input);
            true
        }
        Err(err) => {
            error!("{}", err);
            false
        }
    }
}
