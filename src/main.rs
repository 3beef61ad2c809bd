use std::path::PathBuf;

use clap::Parser;

use jotter::io::config_io::read_config;

/// Quick-capture notes and todos in a terminal popup
#[derive(Parser)]
#[command(name = "jot", version)]
struct Cli {
    /// Path to the config file
    #[arg(long, default_value = "jotter.toml")]
    config: PathBuf,

    /// Start with sample data
    #[arg(long)]
    demo: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match read_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = jotter::tui::run(config, cli.demo) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
