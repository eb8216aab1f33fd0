use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for feedback-portal
/// Student feedback portal: class-window feedback over SQLite
#[derive(Parser)]
#[command(
    name = "feedback-portal",
    version = env!("CARGO_PKG_VERSION"),
    about = "Student feedback portal: timetable-gated feedback, admin tools and a REST API over SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", value_name = "N", help = "Only the newest N rows")]
        limit: Option<u32>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show a student's classes for today and which one accepts feedback
    Today {
        #[arg(long = "student", value_name = "EMAIL")]
        student: String,

        #[arg(
            long = "at",
            value_name = "YYYY-MM-DD HH:MM",
            help = "Evaluate at this local time instead of now"
        )]
        at: Option<String>,

        #[arg(
            long = "watch",
            help = "Re-evaluate every minute until interrupted",
            conflicts_with = "at"
        )]
        watch: bool,
    },

    /// Export feedback
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_name = "NAME", help = "Only feedback of this batch")]
        batch: Option<String>,

        #[arg(long, value_name = "N", help = "Only feedback of this semester")]
        semester: Option<i64>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Start the REST API server
    Serve {
        #[arg(long, value_name = "ADDR", help = "Bind address (default from config)")]
        bind: Option<String>,

        #[arg(long, value_name = "PORT", help = "Port (default from config)")]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create an account (student by default)
    Add {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long = "first-name")]
        first_name: Option<String>,

        #[arg(long = "last-name")]
        last_name: Option<String>,

        #[arg(long, help = "Create an administrator")]
        admin: bool,

        #[arg(long, value_name = "NAME", requires = "semester", help = "Batch name (created if missing)")]
        batch: Option<String>,

        #[arg(long, value_name = "N", requires = "batch")]
        semester: Option<i64>,
    },

    /// List all accounts
    List,
}
