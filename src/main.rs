//! circloO level tool
//!
//! Inspect, normalize and edit circloO level files from the command line

use anyhow::{Context, Result};
use circloo_level::{
    catalog::{BallGenerator, Circle, Collectable, Player, Rectangle, Rope, SoundGroup, Timing},
    level::parse_level_logged,
    Color, Level, LevelConfig, LevelLogger, Number, VerbosityLevel,
};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Verbosity level (accepts both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "circloo")]
#[command(about = "circloO level tool", long_about = None)]
struct Cli {
    /// Verbosity level (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, short = 'v', global = true, default_value = "normal")]
    verbosity: VerbosityArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a level: header settings and object counts per tag
    Inspect {
        #[arg(value_name = "LEVEL_FILE")]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse and rewrite a level, renumbering its footers
    Normalize {
        #[arg(value_name = "LEVEL_FILE")]
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove every object with the given tag
    RemoveTag {
        #[arg(value_name = "LEVEL_FILE")]
        file: PathBuf,

        /// Object tag, e.g. "tmc"
        tag: String,

        /// Also drop connections that lose an endpoint
        #[arg(long)]
        with_connections: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an empty level
    New {
        /// Header settings as JSON; missing fields take their defaults
        #[arg(long, value_name = "HEADER_JSON")]
        config: Option<PathBuf>,

        /// Pick a random color from this seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a small sample level
    Demo {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct Summary<'a> {
    config: &'a LevelConfig,
    objects: usize,
    connections: usize,
    tags: BTreeMap<String, usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let logger = LevelLogger::with_verbosity(cli.verbosity.into());

    match cli.command {
        Commands::Inspect { file, json } => run_inspect(&file, json, &logger)?,
        Commands::Normalize { file, output } => {
            let level = load(&file, &logger)?;
            emit(&level, output.as_deref(), &logger)?;
        }
        Commands::RemoveTag {
            file,
            tag,
            with_connections,
            output,
        } => {
            let mut level = load(&file, &logger)?;
            let removed = level.remove_all(&tag);
            logger.normal(&format!("removed {} '{}' objects", removed.len(), tag));
            if with_connections {
                let dropped = level.remove_broken_connections();
                logger.normal(&format!("removed {} dangling connections", dropped.len()));
            } else {
                let dangling = dangling_connections(&level);
                if dangling > 0 {
                    anyhow::bail!(
                        "removing '{}' leaves {} connections without an endpoint; \
                         rerun with --with-connections to drop them as well",
                        tag,
                        dangling
                    );
                }
            }
            emit(&level, output.as_deref(), &logger)?;
        }
        Commands::New {
            config,
            seed,
            output,
        } => {
            let mut header = match config {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    LevelConfig::from_json(&json)
                        .with_context(|| format!("parsing {}", path.display()))?
                }
                None => LevelConfig::default(),
            };
            if let Some(seed) = seed {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                header.color = Color::random(&mut rng);
                logger.verbose(&format!("seed {} picked color {}", seed, header.color));
            }
            emit(&Level::new(header), output.as_deref(), &logger)?;
        }
        Commands::Demo { output } => emit(&demo_level()?, output.as_deref(), &logger)?,
    }

    Ok(())
}

fn dangling_connections(level: &Level) -> usize {
    level
        .iter()
        .filter_map(|obj| obj.connections())
        .filter(|ends| ends.iter().any(|key| !level.contains(*key)))
        .count()
}

fn load(path: &Path, logger: &LevelLogger) -> Result<Level> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let level = parse_level_logged(&text, logger)
        .with_context(|| format!("parsing {}", path.display()))?;
    logger.verbose(&format!("loaded {} objects from {}", level.len(), path.display()));
    Ok(level)
}

/// Write a level to `output`, or print it when no output is given
fn emit(level: &Level, output: Option<&Path>, logger: &LevelLogger) -> Result<()> {
    match output {
        Some(path) => {
            level
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
            logger.minimal(&format!("wrote {} objects to {}", level.len(), path.display()));
        }
        None => println!("{}", level.serialize()?),
    }
    Ok(())
}

fn run_inspect(path: &Path, json: bool, logger: &LevelLogger) -> Result<()> {
    let level = load(path, logger)?;

    let mut tags = BTreeMap::new();
    for obj in &level {
        *tags.entry(obj.tag()).or_insert(0) += 1;
    }
    let summary = Summary {
        config: level.config(),
        objects: level.len(),
        connections: level.iter().filter(|obj| obj.is_connection()).count(),
        tags,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let config = summary.config;
    println!("segments:   {} (start full: {})", config.segments, config.start_full);
    println!("color:      {}", config.color);
    println!("gravity:    {} at {}", config.gravity_scale, config.gravity_direction);
    if !config.music.is_none() {
        println!("music:      {} {}", config.music.0, config.music.1);
    }
    println!("objects:    {} ({} connections)", summary.objects, summary.connections);
    for (tag, count) in &summary.tags {
        println!("  {:<24} {}", tag, count);
    }
    Ok(())
}

/// Player on a ledge, a circle hanging from two generators, and a trigger
fn demo_level() -> Result<Level> {
    let mut level = Level::new(LevelConfig {
        segments: Number::Int(2),
        start_full: true,
        color: Color::new(185),
        ..LevelConfig::default()
    });

    level.add(Player::new(1500.0, 1500.0))?;
    level.add(Rectangle::new(1500.0, 1575.0, 100.0, 25.0))?;
    let circle = level.add(Circle::new(1500.0, 1275.0, 25.0))?;

    let left = level.add(BallGenerator {
        timing: Timing::new(1.0, 3.0, 0.0),
        ..BallGenerator::new(1350.0, 1300.0, 25.0)
    })?;
    let right = level.add(BallGenerator {
        timing: Timing::new(1.0, 3.0, 2.0),
        ..BallGenerator::new(1650.0, 1300.0, 25.0)
    })?;
    level.add(Rope::new(circle, left))?;
    level.add(Rope::new(circle, right))?;

    let mut collectable = Collectable {
        from_object: true,
        is_trigger: true,
        ..Collectable::new(1500.0, 1400.0)
    };
    collectable.set_sound(SoundGroup::House, 0);
    level.add(collectable)?;

    Ok(level)
}
