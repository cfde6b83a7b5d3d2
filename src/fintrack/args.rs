use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fintrack")]
#[command(version, about = "Track personal spending from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new record
    #[command(alias = "a")]
    Add {
        description: String,

        #[arg(allow_negative_numbers = true)]
        amount: f64,

        category: String,

        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Change fields of an existing record
    #[command(alias = "e")]
    Edit {
        id: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete { id: String },

    /// List records
    #[command(alias = "ls")]
    List {
        /// Regular expression matched against description and category
        #[arg(short, long)]
        search: Option<String>,

        /// date-desc, date-asc, amount-desc, amount-asc,
        /// description-asc, description-desc or category-asc
        #[arg(long)]
        sort: Option<String>,

        /// Only show this category ("all" shows every category)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List categories in use
    Categories,

    /// Show or change settings
    Settings {
        #[arg(long)]
        currency: Option<String>,

        #[arg(long)]
        rate1: Option<f64>,

        #[arg(long)]
        rate2: Option<f64>,

        /// Spending cap (0 disables it)
        #[arg(long)]
        cap: Option<f64>,
    },

    /// Show totals, top category and cap status
    Stats,

    /// Replace all records with the contents of a JSON file
    Import {
        path: PathBuf,

        /// Also validate every field of every record
        #[arg(long)]
        strict: bool,
    },

    /// Write all records as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
