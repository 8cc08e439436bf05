//! # homeboard
//!
//! A household organizer for the terminal: per-person recurring task
//! schedules, one-off tasks and important dates, chore rotation, a weekly
//! media time allowance, and the shared shopping and household lists.
//!
//! ## Usage
//!
//! Run without arguments to open a member's interactive board:
//!
//! ```bash
//! homeboard --member Aiden
//! ```
//!
//! Or use single commands:
//!
//! ```bash
//! # Recurring tasks
//! homeboard -m Aiden recurring add "Feed the cat" --daily mon,wed,fri
//! homeboard -m Aiden recurring add "Take out bins" --weekly tue
//! homeboard -m Aiden recurring add "Pay allowance" --monthly 1,15
//! homeboard -m Aiden today
//! homeboard -m Aiden done <ID>
//!
//! # Chores and media time
//! homeboard -m Liah chore assign
//! homeboard -m Liah media
//!
//! # Shared lists
//! homeboard shopping add DM "Toothpaste" --urgent
//! homeboard summary
//! ```
//!
//! ## Data Storage
//!
//! Records are saved as JSON files in your local data directory:
//! *   Linux: `~/.local/share/homeboard/`
//! *   macOS: `~/Library/Application Support/homeboard/`
//! *   Windows: `%APPDATA%\homeboard\`
//!
//! You can override this by setting the `HOMEBOARD_DB` environment variable.
//! Household members and their features are read from
//! `~/.config/homeboard/config.toml` (or `HOMEBOARD_CONFIG`).

mod tui;

use std::io;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{ArgGroup, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use homeboard::commands::*;
use homeboard::storage::FileStore;
use homeboard::{logging, HouseholdConfig};
use tui::run_tui;

#[derive(Parser)]
#[command(name = "homeboard")]
#[command(about = "Household organizer: recurring chores, tasks and shared lists", long_about = None)]
struct Cli {
    /// Household member whose board to use
    #[arg(short, long, global = true)]
    member: Option<String>,
    /// Act as if today were this date (YYYY-MM-DD)
    #[arg(long = "as-of", global = true, value_name = "YYYY-MM-DD")]
    as_of: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recurring tasks
    Recurring {
        #[command(subcommand)]
        command: RecurringCommands,
    },
    /// Show recurring tasks still due today
    Today,
    /// Mark a recurring task done for today
    Done {
        id: u64,
    },
    /// Manage one-off tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage important dates
    Date {
        #[command(subcommand)]
        command: DateCommands,
    },
    /// Show or assign the rotating chore
    Chore {
        #[command(subcommand)]
        command: Option<ChoreCommands>,
    },
    /// Claim media time (needs today's tasks done)
    Media,
    /// Shared shopping list
    Shopping {
        #[command(subcommand)]
        command: ShoppingCommands,
    },
    /// Shared household task list
    Household {
        #[command(subcommand)]
        command: HouseholdCommands,
    },
    /// Counts for every member and the shared lists
    Summary,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive board
    Ui,
}

#[derive(Subcommand)]
enum RecurringCommands {
    /// Add a recurring task
    #[command(group(ArgGroup::new("frequency").required(true).args(["daily", "weekly", "monthly"])))]
    Add {
        /// Task text (quoted if it has spaces)
        text: String,
        /// Weekdays, e.g. "1,3,5" or "mon,wed,fri"
        #[arg(long)]
        daily: Option<String>,
        /// A single weekday, e.g. "2" or "tue"
        #[arg(long)]
        weekly: Option<String>,
        /// Days of the month, e.g. "1,15,31"
        #[arg(long)]
        monthly: Option<String>,
    },
    /// List recurring tasks
    List,
    /// Remove a recurring task
    Remove {
        id: u64,
    },
    /// Pause a recurring task
    Pause {
        id: u64,
    },
    /// Resume a paused recurring task
    Resume {
        id: u64,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a task
    Add {
        text: String,
    },
    /// List tasks
    List,
    /// Complete (and remove) a task
    Complete {
        id: u64,
    },
}

#[derive(Subcommand)]
enum DateCommands {
    /// Add an important date
    Add {
        /// Event name
        name: String,
        /// Date in YYYY-MM-DD
        date: String,
    },
    /// List important dates
    List,
    /// Remove an important date
    Remove {
        id: u64,
    },
}

#[derive(Subcommand)]
enum ChoreCommands {
    /// Show the current chore
    Show,
    /// Assign a chore (defaults to the next in rotation)
    Assign {
        /// Dishes, Trash or Bathroom
        chore: Option<String>,
    },
}

#[derive(Subcommand)]
enum ShoppingCommands {
    /// Add an item
    Add {
        category: String,
        text: String,
        /// Mark as urgent
        #[arg(short, long)]
        urgent: bool,
    },
    /// List items by category
    List,
    /// Check off an item
    Complete {
        id: u64,
    },
    /// Remove an item
    Remove {
        id: u64,
    },
}

#[derive(Subcommand)]
enum HouseholdCommands {
    /// Add a task
    Add {
        category: String,
        text: String,
    },
    /// List tasks by category
    List,
    /// Complete a task
    Complete {
        id: u64,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, Some(Commands::Ui) | None);

    let mut store = match FileStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open data directory: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if interactive {
        logging::init_file(&store.dir().join("homeboard.log"));
    } else {
        logging::init_stderr();
    }

    let config = match HouseholdConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", HouseholdConfig::path().display(), e);
            return ExitCode::FAILURE;
        }
    };

    let today = match cli.as_of.as_deref() {
        Some(d) => match NaiveDate::parse_from_str(d, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", d, e);
                return ExitCode::FAILURE;
            }
        },
        None => Local::now().date_naive(),
    };

    // Shared lists and completions work without a member.
    let needs_member = !matches!(
        cli.command,
        Some(Commands::Shopping { .. })
            | Some(Commands::Household { .. })
            | Some(Commands::Summary)
            | Some(Commands::Completions { .. })
    );
    let member = cli.member.unwrap_or_default();
    if needs_member {
        if let Err(e) = config.check_member(&member) {
            eprintln!("{}. Pass one with --member.", e);
            return ExitCode::FAILURE;
        }
    }

    let ctx = CommandContext { config, member, today, silent: false };
    let s = &mut store;

    match cli.command {
        Some(Commands::Recurring { command }) => match command {
            RecurringCommands::Add { text, daily, weekly, monthly } => {
                let (frequency, schedule) = match (daily, weekly, monthly) {
                    (Some(days), _, _) => ("daily", days),
                    (_, Some(day), _) => ("weekly", day),
                    (_, _, Some(dates)) => ("monthly", dates),
                    _ => unreachable!("clap requires one frequency"),
                };
                cmd_recurring_add(s, &ctx, &text, frequency, &schedule)
            }
            RecurringCommands::List => cmd_recurring_list(s, &ctx),
            RecurringCommands::Remove { id } => cmd_recurring_remove(s, &ctx, id),
            RecurringCommands::Pause { id } => cmd_pause(s, &ctx, id),
            RecurringCommands::Resume { id } => cmd_resume(s, &ctx, id),
        },
        Some(Commands::Today) => cmd_today(s, &ctx),
        Some(Commands::Done { id }) => cmd_done(s, &ctx, id),
        Some(Commands::Task { command }) => match command {
            TaskCommands::Add { text } => cmd_task_add(s, &ctx, &text),
            TaskCommands::List => cmd_task_list(s, &ctx),
            TaskCommands::Complete { id } => cmd_task_complete(s, &ctx, id),
        },
        Some(Commands::Date { command }) => match command {
            DateCommands::Add { name, date } => cmd_date_add(s, &ctx, &name, &date),
            DateCommands::List => cmd_date_list(s, &ctx),
            DateCommands::Remove { id } => cmd_date_remove(s, &ctx, id),
        },
        Some(Commands::Chore { command }) => match command {
            Some(ChoreCommands::Assign { chore }) => cmd_chore_assign(s, &ctx, chore),
            Some(ChoreCommands::Show) | None => cmd_chore_show(s, &ctx),
        },
        Some(Commands::Media) => cmd_media(s, &ctx),
        Some(Commands::Shopping { command }) => match command {
            ShoppingCommands::Add { category, text, urgent } => cmd_shopping_add(s, &ctx, &category, &text, urgent),
            ShoppingCommands::List => cmd_shopping_list(s, &ctx),
            ShoppingCommands::Complete { id } => cmd_shopping_complete(s, &ctx, id),
            ShoppingCommands::Remove { id } => cmd_shopping_remove(s, &ctx, id),
        },
        Some(Commands::Household { command }) => match command {
            HouseholdCommands::Add { category, text } => cmd_household_add(s, &ctx, &category, &text),
            HouseholdCommands::List => cmd_household_list(s, &ctx),
            HouseholdCommands::Complete { id } => cmd_household_complete(s, &ctx, id),
            HouseholdCommands::Remove { id } => cmd_household_remove(s, &ctx, id),
        },
        Some(Commands::Summary) => cmd_summary(&store, &ctx),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return ExitCode::FAILURE;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "homeboard", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(store, ctx.config, ctx.member) {
                eprintln!("Error running board: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
