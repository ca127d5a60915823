mod cli;
mod commands;

use clap::Parser;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    let config = ConfigBuilder::new().set_time_level(log::LevelFilter::Off).build();
    if let Err(e) = TermLogger::init(
        cli.log_level.into(),
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger init failed: {}", e);
    }

    let result = match cli.command {
        Command::Generate(args) => commands::generate(args),
        Command::Overview(args) => commands::overview(args),
        Command::Bench(args) => commands::bench(args),
    };
    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
