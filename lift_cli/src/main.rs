use clap::{Parser, Subcommand};
use lift_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Workout performance analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the plates to load for a target bar weight
    Plates {
        /// Total weight including the bar
        weight: f64,

        /// Weight unit (lbs or kg); defaults to the configured unit
        #[arg(long)]
        unit: Option<String>,

        /// Bar weight; defaults to the configured bar for the unit
        #[arg(long)]
        bar: Option<f64>,

        /// Include the bar in the output
        #[arg(long)]
        per_side: bool,
    },

    /// Check whether an exercise is a barbell lift
    Classify {
        /// Exercise name
        name: String,

        /// Equipment type as recorded in the plan
        #[arg(long)]
        equipment: Option<String>,
    },

    /// Print the set execution order of a session, interleaving supersets
    Superset {
        /// Session JSON file
        session: PathBuf,
    },

    /// Show highlights for a session against the logged history
    Highlights {
        /// Session JSON file
        session: PathBuf,
    },

    /// Show highlights for a completed session, then add it to the history
    Log {
        /// Session JSON file
        session: PathBuf,

        /// Do not print highlights
        #[arg(long)]
        quiet: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    lift_core::logging::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Commands::Plates {
            weight,
            unit,
            bar,
            per_side,
        } => cmd_plates(&config, weight, unit.as_deref(), bar, per_side),
        Commands::Classify { name, equipment } => {
            cmd_classify(&config, &name, equipment.as_deref());
            Ok(())
        }
        Commands::Superset { session } => cmd_superset(&session),
        Commands::Highlights { session } => cmd_highlights(&config, &session).await,
        Commands::Log { session, quiet } => cmd_log(&config, &session, quiet).await,
    }
}

fn cmd_plates(
    config: &Config,
    weight: f64,
    unit: Option<&str>,
    bar: Option<f64>,
    per_side: bool,
) -> Result<()> {
    let unit = match unit {
        Some(unit) => unit.parse::<WeightUnit>()?,
        None => config.plates.default_unit,
    };

    let resolver = PlateResolver::from_config(&config.plates);
    let breakdown = resolver.calculate(weight, unit, bar);

    if per_side {
        println!("{}", format_plates_per_side(&breakdown));
    } else {
        println!("{}", format_plate_breakdown(&breakdown));
    }

    Ok(())
}

fn cmd_classify(config: &Config, name: &str, equipment: Option<&str>) {
    let classifier = KeywordClassifier::from_config(&config.classifier);
    if classifier.is_barbell(name, equipment) {
        println!("{}: barbell", name);
    } else {
        println!("{}: not a barbell lift", name);
    }
}

fn cmd_superset(path: &Path) -> Result<()> {
    let session = load_session(path)?;

    for block in group_exercises(&session.exercises) {
        match block {
            ExerciseBlock::Standalone(exercise) => {
                println!("{}", exercise.name);
            }
            ExerciseBlock::Superset {
                group_id,
                exercises,
            } => {
                let names: Vec<_> = exercises.iter().map(|e| e.name.as_str()).collect();
                println!("Superset {}: {}", group_id, names.join(" / "));
            }
        }

        for step in block.execution_order() {
            println!("  {} set {}", step.exercise.name, step.set_index + 1);
        }
    }

    Ok(())
}

async fn cmd_highlights(config: &Config, path: &Path) -> Result<()> {
    let session = load_session(path)?;
    let highlights = compute_highlights(config, &session).await?;
    print_highlights(&highlights);
    Ok(())
}

async fn cmd_log(config: &Config, path: &Path, quiet: bool) -> Result<()> {
    let session = load_session(path)?;

    // Highlights compare against history, so compute them before this
    // session becomes part of it
    if session.status == SessionStatus::Completed && !quiet {
        let highlights = compute_highlights(config, &session).await?;
        print_highlights(&highlights);
    }

    let journal = SessionJournal::new(config.journal_path());
    if journal.append(&session)? {
        println!("✓ Session logged: {} ({})", session.name, session.date);
    } else {
        println!("Session already logged: {} ({})", session.name, session.date);
    }
    Ok(())
}

async fn compute_highlights(
    config: &Config,
    session: &WorkoutSession,
) -> Result<Vec<WorkoutHighlight>> {
    let provider = JsonlHistory::new(config.journal_path());
    let settings = HighlightSettings::from(&config.highlights);
    let engine = HighlightEngine::with_settings(provider, settings);
    engine.calculate_workout_highlights(session).await
}

fn load_session(path: &Path) -> Result<WorkoutSession> {
    let contents = std::fs::read_to_string(path)?;
    let session = WorkoutSession::from_json(&contents)?;
    tracing::debug!("Loaded session {} from {:?}", session.id, path);
    Ok(session)
}

fn print_highlights(highlights: &[WorkoutHighlight]) {
    if highlights.is_empty() {
        println!("No highlights this time.");
        return;
    }

    for highlight in highlights {
        println!("★ {}: {}", highlight.label, highlight.message);
    }
}
