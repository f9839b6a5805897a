mod output;
mod shell;

use clap::{Parser, Subcommand};
use liftbook_core::*;
use shell::Shell;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "liftbook")]
#[command(about = "Exercise and workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive numbered menu (default)
    Menu,

    /// Create, edit and delete exercises
    #[command(subcommand)]
    Exercise(ExerciseCommand),

    /// Create workouts and manage the exercises in them
    #[command(subcommand)]
    Workout(WorkoutCommand),

    /// Load exercises from a JSON file, skipping names that already exist
    Import {
        /// JSON array of {"name": ..., "muscleCategory": ...} objects
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ExerciseCommand {
    /// Create an exercise
    Create { name: String, category: String },

    /// Set one attribute (name or muscleCategory)
    Update {
        name: String,
        field: String,
        value: String,
    },

    /// Replace every attribute of an exercise
    Replace {
        name: String,
        #[arg(long)]
        new_name: String,
        #[arg(long)]
        category: String,
    },

    /// Delete every exercise with this name
    Delete { name: String },

    /// Show one exercise
    Show { name: String },

    /// List all exercises
    List,
}

#[derive(Subcommand)]
enum WorkoutCommand {
    /// Create an empty workout
    Create { name: String },

    /// Show a workout and its exercises
    Show { name: String },

    /// List all workouts
    List,

    /// Add an exercise to a workout
    Add { workout: String, exercise: String },

    /// Remove an exercise from a workout
    Remove { workout: String, exercise: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        liftbook_core::logging::init_with_level("debug");
    } else {
        liftbook_core::logging::init();
    }

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.database.data_dir = data_dir;
    }

    let db = Database::connect(&config.database)?;
    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cmd_menu(&db),
        Commands::Exercise(command) => cmd_exercise(&db, command),
        Commands::Workout(command) => cmd_workout(&db, command),
        Commands::Import { file } => cmd_import(&db, &file),
    };
    db.close();
    result
}

fn cmd_menu(db: &Database) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(db, stdin.lock(), stdout.lock()).run()
}

fn cmd_exercise(db: &Database, command: ExerciseCommand) -> Result<()> {
    let store = ExerciseStore::new(db);

    let outcome = match command {
        ExerciseCommand::Create { name, category } => store
            .create(&name, &category)
            .map(|e| output::exercise_created(&e)),
        ExerciseCommand::Update { name, field, value } => store
            .update_field(&name, &field, &value)
            .map(|_| output::exercise_updated(&name)),
        ExerciseCommand::Replace {
            name,
            new_name,
            category,
        } => store
            .replace(&name, ExerciseDraft::new(new_name, category))
            .map(|_| output::exercise_replaced(&name)),
        ExerciseCommand::Delete { name } => store
            .delete_by_name(&name)
            .map(|count| output::exercises_deleted(&name, count)),
        ExerciseCommand::Show { name } => store
            .find_by_name(&name)
            .map(|e| output::exercise_line(&e)),
        ExerciseCommand::List => store.list().map(|exercises| {
            if exercises.is_empty() {
                return "No exercises.".to_string();
            }
            exercises
                .iter()
                .map(output::exercise_line)
                .collect::<Vec<_>>()
                .join("\n")
        }),
    };

    output::report(&mut io::stdout(), outcome)
}

fn cmd_workout(db: &Database, command: WorkoutCommand) -> Result<()> {
    let workouts = WorkoutStore::new(db);
    let linker = Linker::new(db);

    let outcome = match command {
        WorkoutCommand::Create { name } => workouts
            .create(&name)
            .map(|w| output::workout_created(&w)),
        WorkoutCommand::Show { name } => workouts
            .find_by_name(&name)
            .map(|w| output::workout_detail(&w)),
        WorkoutCommand::List => workouts.list().map(|all| {
            if all.is_empty() {
                return "No workouts.".to_string();
            }
            all.iter()
                .map(|w| format!("{} ({} exercises)", w.name, w.exercises.len()))
                .collect::<Vec<_>>()
                .join("\n")
        }),
        WorkoutCommand::Add { workout, exercise } => linker
            .insert(&workout, &exercise)
            .map(|_| output::exercise_added(&workout, &exercise)),
        WorkoutCommand::Remove { workout, exercise } => linker
            .remove(&workout, &exercise)
            .map(|_| output::exercise_removed(&workout, &exercise)),
    };

    output::report(&mut io::stdout(), outcome)
}

fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    let store = ExerciseStore::new(db);
    let report = import_exercises(&store, file)?;

    for name in &report.skipped {
        println!(
            "Document {} already exists in the collection, skipping...",
            name
        );
    }
    for failure in &report.failed {
        println!(
            "Failed to insert document {}: {}",
            failure.record, failure.reason
        );
    }
    println!("{}", report);
    Ok(())
}
