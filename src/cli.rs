use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Seeded voxel world generator")]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk a tracked area across the world, generating and saving chunks
    Generate(GenerateArgs),
    /// Render a biome or height map to a PPM image
    Overview(OverviewArgs),
    /// Measure parallel column generation throughput
    Bench(BenchArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(long, default_value_t = 0)]
    pub seed: i64,
    /// Chunks provided around the tracked center each step
    #[arg(long, default_value_t = 4)]
    pub radius: i32,
    /// Ticks to run; the center moves one chunk along +x per tick
    #[arg(long, default_value_t = 16)]
    pub steps: u32,
    /// Directory for chunk files; in-memory only when omitted
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// Worldgen TOML
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Block table TOML replacing the builtin one
    #[arg(long)]
    pub blocks: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OverviewArgs {
    #[arg(long, default_value_t = 0)]
    pub seed: i64,
    /// Edge length in blocks, centred on the origin
    #[arg(long, default_value_t = 512)]
    pub size: u32,
    #[arg(long, value_enum, default_value_t = OverviewKind::Biome)]
    pub mode: OverviewKind,
    #[arg(long, default_value = "overview.ppm")]
    pub out: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct BenchArgs {
    #[arg(long, default_value_t = 0)]
    pub seed: i64,
    /// Columns to generate
    #[arg(long, default_value_t = 256)]
    pub count: u32,
    /// Worker threads; defaults to available parallelism
    #[arg(long)]
    pub threads: Option<usize>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OverviewKind {
    Biome,
    Height,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "strata", "generate", "--seed=-5", "--radius", "2", "--steps", "3",
        ])
        .unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!((args.seed, args.radius, args.steps), (-5, 2, 3));
                assert!(args.store.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn overview_mode_is_an_enum() {
        let cli = Cli::try_parse_from(["strata", "overview", "--mode", "height"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Overview(OverviewArgs {
                mode: OverviewKind::Height,
                ..
            })
        ));
        assert!(Cli::try_parse_from(["strata", "overview", "--mode", "rivers"]).is_err());
    }
}
