use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod prep;

#[derive(Parser)]
#[command(name = "craft-prep")]
#[command(about = "Prepare a Craft 5 project for Craft 6", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a project's layout and configuration in place
    #[command(alias = "p")]
    Prep(prep::PrepArgs),
}

fn main() {
    if let Err(e) = run() {
        if let Some(partial) = e.downcast_ref::<prep::StepsFailed>() {
            eprintln!("{} {partial}", "Error:".red());
            std::process::exit(2);
        }
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Prep(args) => prep::execute(args),
    }
}
