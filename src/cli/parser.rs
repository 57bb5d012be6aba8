use clap::{Parser, Subcommand};

/// Command-line interface definition for hivetime
#[derive(Parser)]
#[command(
    name = "hivetime",
    version = env!("CARGO_PKG_VERSION"),
    about = "Team task time tracking: live timers, work sessions and time budgets on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this user instead of the configured default_user
    #[arg(global = true, long = "user", short = 'u')]
    pub user: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage contributors
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage tasks and their time budgets
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Start, pause, resume or stop today's work session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Start or stop your timer on a task
    Timer {
        #[command(subcommand)]
        action: TimerAction,
    },

    /// Show tracked time, contributors and budget state of a task
    Status {
        /// Task id
        task: String,

        #[arg(long = "json", help = "Print the status as JSON")]
        json: bool,
    },

    /// Live view of a task, refreshed every second while a timer runs
    Watch {
        /// Task id
        task: String,

        #[arg(
            long = "for",
            value_name = "SECONDS",
            help = "Stop watching after this many seconds (default: until Ctrl-C)"
        )]
        duration: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a contributor
    Add {
        /// User id (login name)
        id: String,
        /// Display name
        name: String,
    },
    /// List contributors
    List,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task
    Add {
        /// Task id
        id: String,
        /// Title
        title: String,

        #[arg(long = "budget", help = "Time budget: 90m, 2h, 1h30m or seconds")]
        budget: Option<String>,

        #[arg(long = "status", help = "Status option (default: first configured)")]
        status: Option<String>,

        #[arg(long = "urgency", help = "Urgency option (default: normal)")]
        urgency: Option<String>,
    },
    /// Set or clear ("none") the time budget of a task
    Budget {
        /// Task id
        id: String,
        /// Budget: 90m, 2h, 1h30m, seconds, or "none"
        budget: String,
    },
    /// List tasks with their tracked time
    List,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Start (or reopen) today's session
    Start,
    /// Pause the session; running timers are stopped until resume
    Pause,
    /// Resume a paused session and its timers
    Resume,
    /// Close the session and stop all timers
    Stop,
    /// Show today's session
    Show,
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start tracking a task
    Start {
        /// Task id
        task: String,
    },
    /// Stop tracking a task
    Stop {
        /// Task id
        task: String,
    },
}
