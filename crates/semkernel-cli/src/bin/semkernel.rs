//! CLI for semkernel

use std::path::PathBuf;

use clap::Parser;
use semkernel::SemkernelApp;
use semkernel_cli::{ResultKind, commands, error::CliError, init_tracing, load_config};
use tracing::debug;

#[derive(Parser)]
#[command(name = "semkernel")]
#[command(about = "Invoke kernel functions and chat from the command line", long_about = None)]
struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(long, short = 'c', env = "SEMKERNEL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `semkernel_core=trace`
    #[arg(long, env = "SEMKERNEL_LOG", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Invoke a kernel function by fully qualified name
    Invoke {
        /// Function name, e.g. `math.add`
        function: String,
        /// Value of the `input` argument
        #[arg(long, short)]
        input: Option<String>,
        /// Additional arguments as name=value (can be specified multiple times)
        #[arg(long = "arg", short = 'a', action = clap::ArgAction::Append)]
        arguments: Vec<String>,
        /// Coerce the result to this type before printing
        #[arg(long, value_enum, default_value_t = ResultKind::Raw)]
        result_type: ResultKind,
    },
    /// Chat with the configured completion service
    Chat {
        /// Optional initial message
        #[arg(long, short)]
        message: Option<String>,
        /// Run once and exit (non-interactive mode)
        #[arg(long)]
        once: bool,
    },
    /// List registered functions
    Functions {
        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// List registered context variable types
    Types,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(cli.log_level.as_deref(), &config.log_level);
    debug!(config = ?cli.config, "Configuration loaded");

    let app = SemkernelApp::builder("semkernel")
        .config(config)
        .with_sample_functions()
        .with_echo_service()
        .build()?;

    match cli.command {
        Some(Commands::Invoke {
            function,
            input,
            arguments,
            result_type,
        }) => {
            commands::run_invoke(&app, &function, input, &arguments, result_type).await?;
        }
        Some(Commands::Chat { message, once }) => {
            commands::run_chat(&app, message, once).await?;
        }
        Some(Commands::Functions { json }) => {
            commands::run_functions(&app, json).await?;
        }
        Some(Commands::Types) => {
            commands::run_types(&app).await?;
        }
        None => {
            println!("semkernel {}", app.metadata().version);
            println!("Use --help for more information");
        }
    }

    Ok(())
}
