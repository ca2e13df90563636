use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::cli::{handle_expense_command, run_menu, ExpenseCommands};
use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
use expense_tracker::logging::init_logging;
use expense_tracker::storage::Storage;

#[derive(Parser)]
#[command(
    name = "expenses",
    version,
    about = "Terminal-based personal expense tracker",
    long_about = "Records expenses with a description, amount, date and category, \
                  and reports totals overall, per month and per category. Data is \
                  kept in a plain comma-separated file under csv_data/."
)]
struct Cli {
    /// Directory holding expenses.csv and config.json
    #[arg(long, global = true, env = "EXPENSE_TRACKER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive menu (the default)
    Menu,

    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Create the data directory, expenses file and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths, settings and logging
    let paths = TrackerPaths::resolve(cli.data_dir);
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            Storage::new(paths.clone())?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!("Expenses file: {}", paths.expenses_file().display());
            println!("Settings file: {}", paths.settings_file().display());
            return Ok(());
        }
        Some(Commands::Config) => {
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Expenses file:  {}", paths.expenses_file().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!(
                "Initialized:    {}",
                if paths.is_initialized() { "yes" } else { "no" }
            );
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Log level:       {}", settings.log_level);
            return Ok(());
        }
        _ => {}
    }

    // Initialize storage
    let (mut storage, report) = Storage::open(paths)?;
    for skipped in &report.skipped {
        eprintln!(
            "Skipping invalid line {}: {} ({})",
            skipped.line_number, skipped.content, skipped.reason
        );
    }

    match cli.command {
        None | Some(Commands::Menu) => {
            println!(
                "Data read successfully. Total expenses: {}",
                storage.expenses.count()?
            );
            run_menu(&mut storage, &settings)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&mut storage, &settings, cmd)?;
        }
        Some(Commands::Init) | Some(Commands::Config) => {}
    }

    Ok(())
}
