#![cfg(test)]

use std::fs;

use pretty_assertions::assert_eq;

use crate::dataset::{Dataset, DatasetKind};
use crate::error::Result;
use crate::format::Options;
use crate::storage::SaveOptions;

use super::common::{read, sample_table, Environment};

#[test]
fn test_parquet_round_trip_through_the_composite() -> Result<()> {
    let env = Environment::new();
    let mut manager = env.manager()?;

    manager.save("scores", sample_table().into(), &SaveOptions::new(), None)?;
    let loaded = manager.load("scores", &Options::new(), None)?;

    assert_eq!(loaded.kind(), DatasetKind::Partitioned);
    assert_eq!(loaded.into_partitioned().map(|t| t.into_table()), Some(sample_table()));
    Ok(())
}

#[test]
fn test_local_round_trip_keeps_a_single_file() -> Result<()> {
    let env = Environment::new();
    let mut manager = env.manager()?;

    manager.save("scores", sample_table().into(), &SaveOptions::new(), Some("local-base_path"))?;
    assert!(env.path("local/scores.parquet").is_file());

    let loaded = manager.load("scores", &Options::new(), Some("local-base_path"))?;
    assert_eq!(loaded, Dataset::Table(sample_table()));
    Ok(())
}

#[test]
fn test_copy_between_backends_converts_the_dataset() -> Result<()> {
    let env = Environment::new();
    let mut manager = env.manager()?;

    let customers = manager.load("customers", &Options::new(), None)?;
    manager.save("customers", customers, &SaveOptions::new(), Some("hdfs-base_path"))?;

    let partitioned = manager.load("customers", &Options::new(), Some("hdfs-base_path"))?;
    assert_eq!(partitioned.kind(), DatasetKind::Partitioned);
    manager.save("customers", partitioned, &SaveOptions::new(), Some("local-base_path"))?;

    let copied = manager.load("customers", &Options::new(), Some("local-base_path"))?;
    assert_eq!(copied.kind(), DatasetKind::Table);
    assert_eq!(copied.columns(), ["id", "name"]);
    assert_eq!(copied.num_rows(), 2);
    Ok(())
}

#[test]
fn test_partitioned_by_column_through_configuration() -> Result<()> {
    let env = Environment::new();
    let mut manager = env.manager()?;

    let options = SaveOptions::new().partition_by(["city"]);
    manager.save("events", sample_table().into(), &options, None)?;

    let mut cities: Vec<String> = fs::read_dir(env.path("events"))
        .expect("Failed to list events")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    cities.sort();
    assert_eq!(cities, vec!["_SUCCESS", "city=lima", "city=lyon", "city=oslo"]);

    let loaded = manager.load("events", &Options::new(), None)?.into_partitioned();
    let table = loaded.map(|t| t.into_table()).unwrap_or_default();
    assert_eq!(table.columns(), ["id", "score", "city"]);
    assert_eq!(table.num_rows(), 3);
    Ok(())
}

#[test]
fn test_overwrite_refusal_keeps_existing_data() -> Result<()> {
    let env = Environment::new();
    let mut manager = env.manager()?;
    let original = read(&env.path("local/orders.json"));

    let err = manager
        .save(
            "orders",
            sample_table().into(),
            &SaveOptions::new().overwrite(false),
            Some("local-base_path"),
        )
        .expect_err("orders exists");
    assert!(err.is_already_exists(), "Unexpected error: {}", err);
    assert_eq!(read(&env.path("local/orders.json")), original);

    manager.save("orders", sample_table().into(), &SaveOptions::new(), Some("local-base_path"))?;
    assert_eq!(manager.load("orders", &Options::new(), None)?.num_rows(), 3);
    Ok(())
}
