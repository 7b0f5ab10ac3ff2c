use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use datamanager_core::DataContext;

/// datamgr: inspect and move named datasets across local and partitioned storage
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Configuration file (json, yaml or toml) with `data.local`/`data.hdfs` declarations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base directory of the local backend (overrides `local_path` of the configuration)
    #[arg(long, global = true)]
    pub local_path: Option<PathBuf>,

    /// Base directory of the partitioned backend (overrides `hdfs_path` of the configuration)
    #[arg(long, global = true)]
    pub hdfs_path: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every known dataset with its format and address
    List,
    /// Print the physical address of a dataset
    Resolve {
        key: String,
        #[arg(long)]
        backend: Option<String>,
    },
    /// Whether some backend can serve a dataset
    Has {
        key: String,
        #[arg(long, value_enum)]
        context: Option<Context>,
        #[arg(long)]
        backend: Option<String>,
    },
    /// Whether the data of a dataset is present
    Exists {
        key: String,
        #[arg(long)]
        backend: Option<String>,
    },
    /// Print the first rows of a dataset as JSON lines
    Show {
        key: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        backend: Option<String>,
    },
    /// Load a dataset and save it under another key
    Copy {
        source: String,
        destination: String,
        /// Backend to load from
        #[arg(long)]
        from: Option<String>,
        /// Backend to save to
        #[arg(long)]
        to: Option<String>,
        /// Fail if the destination already exists
        #[arg(long)]
        no_overwrite: bool,
        /// Column to partition by (repeatable)
        #[arg(long = "partition-by")]
        partition_by: Vec<String>,
    },
    /// Delete the data of a dataset
    Delete {
        key: String,
        #[arg(long)]
        backend: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Context {
    Read,
    Write,
}

impl From<Context> for DataContext {
    fn from(context: Context) -> Self {
        match context {
            Context::Read => DataContext::Read,
            Context::Write => DataContext::Write,
        }
    }
}
