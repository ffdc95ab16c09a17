use clap::{Parser, Subcommand};
use tracing::{subscriber, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;

#[derive(Parser)]
#[command(name = "tickdown", version, about = "Suspension-safe countdown timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control (foreground entry point)
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Wake delivery (invoked by the host when the scheduled wake fires)
    Wake {
        #[command(subcommand)]
        action: commands::wake::WakeAction,
    },
    /// Remote actions (acting on the background status presentation)
    Remote {
        #[command(subcommand)]
        action: commands::remote::RemoteCommand,
    },
}

fn main() {
    let fmt = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    let _ = subscriber::set_global_default(fmt);

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Wake { action } => commands::wake::run(action),
        Commands::Remote { action } => commands::remote::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
