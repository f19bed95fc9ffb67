use clap::{Parser, Subcommand, ValueEnum};
use flatdb::Operator;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "flatdb",
    bin_name = "flatdb",
    version,
    disable_help_subcommand = true,
    after_help = "Configuration is read from ./flatdb.toml and FLATDB_* environment variables.\nSet RUST_LOG (e.g. RUST_LOG=flatdb=debug) for detailed logs."
)]
#[command(about = "Inspect and edit a flat-file JSON document store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store root directory (overrides config)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub root: Option<PathBuf>,

    /// Path to a config file (default: ./flatdb.toml)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a record as JSON
    Get {
        collection: String,
        resource: String,
    },

    /// Create or replace a record
    Put {
        collection: String,
        resource: String,
        /// Record body as JSON
        json: String,
    },

    /// Merge fields into an existing record
    Patch {
        collection: String,
        resource: String,
        /// JSON object whose fields overwrite the record's
        json: String,
    },

    /// Delete a record
    #[command(alias = "delete")]
    Rm {
        collection: String,
        resource: String,
    },

    /// Print every record of a collection, one per line
    Ls { collection: String },

    /// Print records whose field matches a condition
    Query {
        collection: String,
        field: String,
        #[arg(value_enum)]
        op: QueryOp,
        /// JSON value to compare against (bare words are taken as strings)
        value: String,
    },

    /// Show collection statistics
    Stats { collection: String },

    /// List collections
    Collections,

    /// Populate the band catalog with sample data
    Seed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QueryOp {
    Eq,
    Gt,
    Lt,
}

impl From<QueryOp> for Operator {
    fn from(op: QueryOp) -> Self {
        match op {
            QueryOp::Eq => Operator::Eq,
            QueryOp::Gt => Operator::Gt,
            QueryOp::Lt => Operator::Lt,
        }
    }
}
