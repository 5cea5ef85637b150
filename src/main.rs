//! dosette - a minimal, local medication reminder.
//!
//! Usage:
//!   dosette signup <username> <password>   Create an account
//!   dosette add <username> ...             Schedule a medication
//!   dosette list <username>                Show scheduled medications
//!   dosette remove <username> <index>      Remove a scheduled medication
//!   dosette run <username> <password>      Run the reminder loop until Ctrl+C
//!   dosette check <username>               Check reminders once, right now

use clap::{Parser, Subcommand, ValueEnum};
use dosette::{
    parse_time_of_day, AlertSink, Clock, ConsoleSink, CsvStore, DesktopSink, ReminderDriver,
    ReminderEngine, ScheduleEntry, ScheduleStore, SpeechSink, SystemClock, UserStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// dosette - a minimal, local medication reminder
#[derive(Parser)]
#[command(name = "dosette")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the user and medication files
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Alert sink selected at startup; the engine never knows which one runs.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SinkKind {
    /// Print reminders to the console
    Console,
    /// Speak reminders aloud
    Speech,
    /// Raise a native desktop notification
    Desktop,
}

impl SinkKind {
    fn build(self) -> Arc<dyn AlertSink> {
        match self {
            SinkKind::Console => Arc::new(ConsoleSink),
            SinkKind::Speech => Arc::new(SpeechSink),
            SinkKind::Desktop => Arc::new(DesktopSink::default()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        username: String,
        password: String,
    },

    /// Schedule a medication
    Add {
        username: String,

        /// Medication name
        #[arg(long)]
        name: String,

        /// Dosage text (e.g., "500 mg")
        #[arg(long, default_value = "")]
        dosage: String,

        /// Frequency text (e.g., "Once daily")
        #[arg(long, default_value = "")]
        frequency: String,

        /// Time of day, like "14:30" or "9:00 AM"
        #[arg(long)]
        time: String,
    },

    /// Show scheduled medications
    List { username: String },

    /// Remove a scheduled medication by its list index
    Remove { username: String, index: usize },

    /// Run the reminder loop until Ctrl+C
    Run {
        username: String,
        password: String,

        /// Where reminder alerts go
        #[arg(long, value_enum, default_value_t = SinkKind::Console)]
        sink: SinkKind,

        /// Seconds between automatic reminder checks
        #[arg(long, default_value = "30")]
        cadence_secs: u64,

        /// Seconds before the first automatic check
        #[arg(long, default_value = "5")]
        warmup_secs: u64,
    },

    /// Check reminders once, right now
    Check { username: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Signup { username, password } => {
            signup(&cli.data_dir, &username, &password)?;
        }
        Commands::Add {
            username,
            name,
            dosage,
            frequency,
            time,
        } => {
            add_entry(&cli.data_dir, &username, &name, &dosage, &frequency, &time).await?;
        }
        Commands::List { username } => {
            list_entries(&cli.data_dir, &username).await?;
        }
        Commands::Remove { username, index } => {
            remove_entry(&cli.data_dir, &username, index).await?;
        }
        Commands::Run {
            username,
            password,
            sink,
            cadence_secs,
            warmup_secs,
        } => {
            run_session(
                &cli.data_dir,
                &username,
                &password,
                sink,
                cadence_secs,
                warmup_secs,
            )
            .await?;
        }
        Commands::Check { username } => {
            check_once(&cli.data_dir, &username).await?;
        }
    }

    Ok(())
}

/// Create an account and its empty medication file.
fn signup(
    data_dir: &PathBuf,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let users = UserStore::in_dir(data_dir)?;
    users.signup(username, password)?;
    CsvStore::for_user(data_dir, username)?;
    println!("Account created for {}. You can now run reminders.", username);
    Ok(())
}

/// Validate and store a new schedule entry.
///
/// The time text is normalized before anything is written; bad input is
/// rejected here and never reaches the store.
async fn add_entry(
    data_dir: &PathBuf,
    username: &str,
    name: &str,
    dosage: &str,
    frequency: &str,
    time: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let minute = match parse_time_of_day(time) {
        Ok(minute) => minute,
        Err(e) => {
            error!("Time must be like 14:30 or 9:00 AM/PM: {}", e);
            return Err(e.into());
        }
    };

    let entry = ScheduleEntry::new(name, dosage, frequency, minute)?;
    let store = CsvStore::for_user(data_dir, username)?;
    store.append(entry).await?;

    println!("{} saved for {}.", name, minute);
    Ok(())
}

/// Print the scheduled medications with their removal indexes.
async fn list_entries(
    data_dir: &PathBuf,
    username: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = CsvStore::for_user(data_dir, username)?;
    let entries = store.list().await?;

    if entries.is_empty() {
        println!("No medications scheduled for {}.", username);
        return Ok(());
    }

    println!("Scheduled medications for {}:", username);
    for (index, entry) in entries.iter().enumerate() {
        println!(
            "  {}. {} | {} | {} | {}",
            index,
            entry.name(),
            entry.dosage(),
            entry.frequency(),
            entry.trigger_minute()
        );
    }
    Ok(())
}

/// Remove one entry by its list index.
async fn remove_entry(
    data_dir: &PathBuf,
    username: &str,
    index: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = CsvStore::for_user(data_dir, username)?;
    match store.remove_at(index).await {
        Ok(removed) => {
            println!("Removed {}.", removed.name());
            Ok(())
        }
        Err(e) => {
            error!("Could not remove entry {}: {}", index, e);
            Err(e.into())
        }
    }
}

/// Validate the login, then run the reminder driver until Ctrl+C.
async fn run_session(
    data_dir: &PathBuf,
    username: &str,
    password: &str,
    sink: SinkKind,
    cadence_secs: u64,
    warmup_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let users = UserStore::in_dir(data_dir)?;
    if !users.validate(username, password)? {
        error!("Invalid username or password");
        return Err("invalid username or password".into());
    }

    let store: Arc<dyn ScheduleStore> = Arc::new(CsvStore::for_user(data_dir, username)?);
    let scheduled = store.list().await?.len();
    info!(
        "Logged in as {}; {} medication(s) scheduled",
        username, scheduled
    );

    let driver = ReminderDriver::new(store, sink.build(), Arc::new(SystemClock))
        .with_cadence(Duration::from_secs(cadence_secs))
        .with_warmup(Duration::from_secs(warmup_secs));

    info!(
        "Starting reminders (first check in {}s, then every {}s). Press Ctrl+C to stop",
        warmup_secs, cadence_secs
    );
    let (handle, driver_task) = driver.start();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Logging out...");
            handle.shutdown().await?;
        }
        _ = driver_task => {
            info!("Reminder driver stopped");
        }
    }

    Ok(())
}

/// One forced check against the current wall clock, no session needed.
async fn check_once(
    data_dir: &PathBuf,
    username: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = CsvStore::for_user(data_dir, username)?;
    let entries = store.list().await?;
    let now = SystemClock.now_minute();

    let mut engine = ReminderEngine::new();
    match engine.poll_forced(now, &entries) {
        Some(event) => println!("{}", event.message()),
        None => println!("No medications due at {}.", now),
    }
    Ok(())
}
