mod cli;

use std::process::ExitCode;

use clap::Parser;
use datamanager_core::{CompositeDataManager, ConfigTree, DataManagerFactory, Dataset, Options, Result, SaveOptions};
use log::{debug, info};

use cli::{CliArgs, Commands};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_manager(args: &CliArgs) -> Result<CompositeDataManager> {
    let config = match &args.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Some(ConfigTree::from_file(path)?)
        }
        None => None,
    };

    DataManagerFactory::new().all(config.as_ref(), args.local_path.as_deref(), args.hdfs_path.as_deref())
}

fn run(args: CliArgs) -> Result<()> {
    let mut manager = build_manager(&args)?;
    info!("Using {}", manager.id());

    match args.command {
        Commands::List => {
            for (key, descriptor) in manager.resources() {
                println!(
                    "{}\t{}\t{}",
                    key,
                    descriptor.format.as_deref().unwrap_or("-"),
                    descriptor.path.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Resolve { key, backend } => {
            println!("{}", manager.resolve(&key, backend.as_deref())?);
        }
        Commands::Has { key, context, backend } => {
            println!("{}", manager.has(&key, context.map(Into::into), backend.as_deref())?);
        }
        Commands::Exists { key, backend } => {
            println!("{}", manager.exists(&key, backend.as_deref())?);
        }
        Commands::Show { key, limit, backend } => {
            let dataset = manager.load(&key, &Options::new(), backend.as_deref())?;
            let table = match dataset {
                Dataset::Table(table) => table,
                Dataset::Partitioned(table) => table.into_table(),
            };
            for record in table.records().into_iter().take(limit) {
                println!("{}", serde_json::Value::Object(record));
            }
            if table.num_rows() > limit {
                println!("... {} more row(s)", table.num_rows() - limit);
            }
        }
        Commands::Copy {
            source,
            destination,
            from,
            to,
            no_overwrite,
            partition_by,
        } => {
            let dataset = manager.load(&source, &Options::new(), from.as_deref())?;
            let rows = dataset.num_rows();
            let options = SaveOptions::new().overwrite(!no_overwrite).partition_by(partition_by);
            manager.save(&destination, dataset, &options, to.as_deref())?;
            println!("Copied {} row(s) from '{}' to '{}'", rows, source, destination);
        }
        Commands::Delete { key, backend } => {
            let deleted = manager.delete(&key, backend.as_deref())?;
            println!("{}", deleted);
        }
    }

    Ok(())
}
