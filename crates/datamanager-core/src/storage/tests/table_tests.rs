use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

use crate::config::ConfigTree;
use crate::dataset::{Dataset, DatasetConverter, DatasetKind, PartitionedTable, Table};
use crate::error::Result;
use crate::format::Options;
use crate::logging::Logger;
use crate::resource::{
    BasePathResolver, BasePathResourceManager, ConfiguredPathResolver, ConfiguredResourceManager, ResourceDescriptor,
    ResourceManager,
};
use crate::storage::{ResourceAccess, SaveOptions, StorageManager, TableStorageManager};

fn customers() -> Table {
    Table::from_rows(
        ["id", "name"],
        vec![vec![json!(1), json!("ada")], vec![json!(2), json!("grace")]],
    )
    .expect("rows match the columns")
}

fn base_path_parts(dir: &Path, format: &str) -> (BasePathResourceManager, BasePathResolver) {
    (
        BasePathResourceManager::empty(dir, format, Logger::default()),
        BasePathResolver::new(dir, format),
    )
}

#[test]
fn test_save_then_load_round_trip() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let (mut manager, resolver) = base_path_parts(dir.path(), "csv");
    let converter = DatasetConverter::new();
    let storage = TableStorageManager::local("csv");

    let saved = storage.save(
        "customers",
        customers().into(),
        &ResourceAccess::new(&manager, &resolver, &converter),
        &SaveOptions::new(),
    )?;
    assert!(saved);
    assert!(dir.path().join("customers.csv").is_file());

    // The key has to be known before it can be read
    manager.add("customers", ResourceDescriptor::new())?;
    let access = ResourceAccess::new(&manager, &resolver, &converter);
    assert!(storage.exists("customers", &access)?);

    let loaded = storage.load("customers", &access, &Options::new())?;
    assert_eq!(loaded.kind(), DatasetKind::Table);
    assert_eq!(loaded.into_table(), Some(customers()));
    Ok(())
}

#[test]
fn test_partitioned_input_is_converted() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let (manager, resolver) = base_path_parts(dir.path(), "json");
    let converter = DatasetConverter::new();
    let access = ResourceAccess::new(&manager, &resolver, &converter);
    let storage = TableStorageManager::local("json");

    let partitioned = PartitionedTable::from_table(customers(), 2);
    // partition_by has no meaning for single files and is ignored
    storage.save("customers", partitioned.into(), &access, &SaveOptions::new().partition_by(["id"]))?;

    let written: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("customers.json")).expect("file written"))
            .expect("valid json");
    assert_eq!(written, json!([{"id": 1, "name": "ada"}, {"id": 2, "name": "grace"}]));
    Ok(())
}

#[test]
fn test_missing_converter_fails_the_save() {
    let dir = tempdir().expect("Failed to create temp directory");
    let (manager, resolver) = base_path_parts(dir.path(), "csv");
    let converter = DatasetConverter::empty();
    let access = ResourceAccess::new(&manager, &resolver, &converter);

    let err = TableStorageManager::local("csv")
        .save(
            "customers",
            Dataset::from(PartitionedTable::from_table(customers(), 1)),
            &access,
            &SaveOptions::new(),
        )
        .expect_err("no partitioned -> table converter");
    assert!(err.is_no_converter(), "Unexpected error: {}", err);
    assert!(!dir.path().join("customers.csv").exists());
}

#[test]
fn test_save_without_overwrite_fails_on_existing_file() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let (manager, resolver) = base_path_parts(dir.path(), "csv");
    let converter = DatasetConverter::new();
    let access = ResourceAccess::new(&manager, &resolver, &converter);
    let storage = TableStorageManager::local("csv");

    storage.save("customers", customers().into(), &access, &SaveOptions::new())?;
    let err = storage
        .save("customers", customers().into(), &access, &SaveOptions::new().overwrite(false))
        .expect_err("file exists");
    assert!(err.is_already_exists(), "Unexpected error: {}", err);

    // Overwriting is the default
    assert!(storage.save("customers", customers().into(), &access, &SaveOptions::new())?);
    Ok(())
}

fn configured(dir: &Path) -> ConfiguredResourceManager {
    let config = ConfigTree::from_value(json!({
        "sales": {
            "path": dir.join("sales.csv").to_string_lossy(),
            "type": "CSV",
            "read_only": true,
            "options": { "delimiter": ";" }
        },
        "report": {
            "path": dir.join("report.txt").to_string_lossy(),
            "type": "xlsx"
        },
        "orders": {
            "path": dir.join("orders.csv").to_string_lossy(),
            "type": "csv",
            "save_options": { "delimiter": "|" }
        }
    }))
    .expect("object root");
    ConfiguredResourceManager::new(config, Logger::default())
}

#[test]
fn test_read_only_descriptor_refuses_writes() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("sales.csv"), "region;amount\nnorth;10\n").expect("seed file");
    let manager = configured(dir.path());
    let converter = DatasetConverter::new();
    let access = ResourceAccess::new(&manager, &ConfiguredPathResolver, &converter);
    let storage = TableStorageManager::local("parquet");

    // Reads use the descriptor's format and options
    let sales = storage.load("sales", &access, &Options::new())?.into_table().expect("table");
    assert_eq!(sales.rows(), &[vec![json!("north"), json!(10)]]);

    let err = storage
        .save("sales", customers().into(), &access, &SaveOptions::new())
        .expect_err("read-only");
    assert!(err.is_read_only(), "Unexpected error: {}", err);

    let err = storage.delete("sales", &access).expect_err("read-only");
    assert!(err.is_read_only(), "Unexpected error: {}", err);
    assert!(dir.path().join("sales.csv").is_file());
    Ok(())
}

#[test]
fn test_unknown_format_and_undeclared_keys() {
    let dir = tempdir().expect("Failed to create temp directory");
    let manager = configured(dir.path());
    let converter = DatasetConverter::new();
    let access = ResourceAccess::new(&manager, &ConfiguredPathResolver, &converter);
    let storage = TableStorageManager::local("parquet");

    let err = storage
        .save("report", customers().into(), &access, &SaveOptions::new())
        .expect_err("no xlsx writer");
    assert!(err.is_unsupported_format(), "Unexpected error: {}", err);

    let err = storage.load("missing_key", &access, &Options::new()).expect_err("undeclared");
    assert!(err.is_not_found(), "Unexpected error: {}", err);

    let err = storage.exists("missing_key", &access).expect_err("cannot resolve");
    assert!(err.is_not_found(), "Unexpected error: {}", err);
}

#[test]
fn test_save_options_layer_over_descriptor() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let manager = configured(dir.path());
    let converter = DatasetConverter::new();
    let access = ResourceAccess::new(&manager, &ConfiguredPathResolver, &converter);
    let storage = TableStorageManager::local("parquet");
    let path = dir.path().join("orders.csv");

    storage.save("orders", customers().into(), &access, &SaveOptions::new())?;
    assert_eq!(fs::read_to_string(&path).expect("written"), "id|name\n1|ada\n2|grace\n");

    storage.save("orders", customers().into(), &access, &SaveOptions::new().option("delimiter", "\t"))?;
    assert_eq!(fs::read_to_string(&path).expect("written"), "id\tname\n1\tada\n2\tgrace\n");
    Ok(())
}

#[test]
fn test_delete_removes_the_file() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let manager = configured(dir.path());
    let converter = DatasetConverter::new();
    let access = ResourceAccess::new(&manager, &ConfiguredPathResolver, &converter);
    let storage = TableStorageManager::local("parquet");

    storage.save("orders", customers().into(), &access, &SaveOptions::new())?;
    assert!(storage.exists("orders", &access)?);
    assert!(storage.delete("orders", &access)?);
    assert!(!storage.exists("orders", &access)?);
    assert!(manager.has("orders", None), "Deleting data keeps the declaration");
    Ok(())
}
