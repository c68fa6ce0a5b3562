use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rSetup
/// CLI application to track race car setups with SQLite
#[derive(Parser)]
#[command(
    name = "rsetup",
    version = env!("CARGO_PKG_VERSION"),
    about = "A race car setup tracker: parts, garage setups and trackside sessions stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Car to work on (defaults to the configured car, then the first one)
    #[arg(global = true, long = "car")]
    pub car: Option<i64>,

    /// Run in test mode (no config file update, prompts answer yes)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
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

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
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

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage cars
    Car {
        #[command(subcommand)]
        action: CarAction,
    },

    /// List race tracks
    Track {
        #[command(subcommand)]
        action: TrackAction,
    },

    /// Manage the parts of the active car and their layout
    Part {
        #[command(subcommand)]
        action: PartAction,
    },

    /// Edit the current setup and save it as garage sessions
    Garage {
        #[command(subcommand)]
        action: GarageAction,
    },

    /// Race-day events, sessions and submitted setups
    Trackside {
        #[command(subcommand)]
        action: TracksideAction,
    },

    /// Inspect or change events of the active car
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Rename or delete sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
pub enum CarAction {
    /// Add a new car
    Add { name: String },

    /// List cars
    List,

    /// Rename a car
    Rename { id: i64, name: String },

    /// Delete a car with all its parts, events and sessions
    Delete {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Make a car the default one
    Default { id: i64 },
}

#[derive(Subcommand)]
pub enum TrackAction {
    /// List tracks that have events
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EntryTypeArg {
    Text,
    Number,
    Table,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MoveArg {
    Up,
    Down,
}

#[derive(Subcommand)]
pub enum PartAction {
    /// Add a part (one per corner when several corners are given)
    Add {
        name: String,

        #[arg(long = "type", value_enum, default_value = "number")]
        entry_type: EntryTypeArg,

        #[arg(long, default_value = "", help = "Unit shown next to values")]
        unit: String,

        #[arg(
            long = "loc",
            required = true,
            value_delimiter = ',',
            help = "Display location(s): lf,rf,lr,rr combine; other cells are exclusive"
        )]
        locations: Vec<String>,

        #[arg(long = "sub", help = "Subheading inside the location")]
        subheading: Option<String>,

        #[arg(
            long,
            value_parser = clap::value_parser!(i64).range(1..=1_000_000),
            help = "Position inside the group (default: last)"
        )]
        order: Option<i64>,
    },

    /// List parts grouped by location and subheading
    List,

    /// Move a part up or down inside its group
    Move { id: i64, direction: MoveArg },

    /// Place a part before another one, or into a location/subheading
    Place {
        id: i64,

        #[arg(long, conflicts_with_all = ["location", "subheading"])]
        before: Option<i64>,

        #[arg(long = "loc", required_unless_present = "before")]
        location: Option<String>,

        #[arg(long = "sub")]
        subheading: Option<String>,
    },

    /// Rename a subheading inside a location
    RenameSub {
        #[arg(long = "loc")]
        location: String,

        old: String,
        new: String,
    },

    /// Delete a part, its value and its entries in saved setups
    Delete {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Repair duplicate or missing part orders
    Repair,
}

#[derive(Subcommand)]
pub enum TableAction {
    /// Append an empty row
    AddRow,
    /// Append a column
    AddColumn,
    /// Delete a row (1-based)
    DeleteRow { row: usize },
    /// Delete a column (1-based)
    DeleteColumn { col: usize },
    /// Set a column header (1-based)
    Header { col: usize, text: String },
    /// Set a cell (1-based); the row just after the last one is appended
    Cell { row: usize, col: usize, text: String },
}

#[derive(Subcommand)]
pub enum GarageAction {
    /// Show the current setup
    Show,

    /// Set the current value of a part
    Set { id: i64, value: String },

    /// Increment a number part
    Inc {
        id: i64,
        #[arg(long, default_value_t = 1.0)]
        by: f64,
    },

    /// Decrement a number part
    Dec {
        id: i64,
        #[arg(long, default_value_t = 1.0)]
        by: f64,
    },

    /// Edit the value of a table part
    Table {
        id: i64,
        #[command(subcommand)]
        op: TableAction,
    },

    /// Save the current setup as a garage session
    Save {
        #[arg(long)]
        title: Option<String>,

        #[arg(long, help = "Derive the title from this session (after a load)")]
        from: Option<i64>,

        #[arg(long = "last-event", conflicts_with = "new_event")]
        last_event: bool,

        #[arg(long = "new-event")]
        new_event: bool,
    },

    /// Copy a saved setup into the current values
    Load { session: i64 },

    /// List garage events and their sessions
    History,
}

#[derive(Subcommand)]
pub enum TracksideAction {
    /// Create a race event with its sessions
    New {
        track: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, help = "Event date (YYYY-MM-DD, default: today)")]
        date: Option<String>,

        #[arg(long = "session", help = "Session name replacing the defaults (repeatable)")]
        sessions: Vec<String>,

        #[arg(long = "add-session", help = "Extra session name (repeatable)")]
        extra_sessions: Vec<String>,
    },

    /// List race events
    List,

    /// Show today's race event
    Today,

    /// Show the setup of a session
    Show { session: i64 },

    /// Submit the setup of a session
    Submit {
        session: i64,

        #[arg(long = "set", value_name = "PART_ID=VALUE")]
        set: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// Show an event with its sessions
    Show { id: i64 },

    /// Rename an event
    Rename { id: i64, name: String },

    /// Delete an event with its sessions and saved setups
    Delete {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Add a session to an event
    AddSession { id: i64, name: String },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Rename a session
    Rename { id: i64, name: String },

    /// Delete a session and its saved setup
    Delete {
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}
