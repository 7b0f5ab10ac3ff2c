#![cfg(test)]

use crate::dataset::DatasetKind;
use crate::error::Result;
use crate::format::Options;
use crate::resource::DataContext;
use crate::storage::SaveOptions;

use super::common::{read, sample_table, Environment};

#[test]
fn test_factory_builds_every_backend_from_config() -> Result<()> {
    let env = Environment::new();
    let manager = env.manager()?;

    assert_eq!(
        manager.id(),
        "composite(hdfs-configured,local-configured,hdfs-base_path,local-base_path)"
    );
    let keys: Vec<String> = manager.resources().into_keys().collect();
    assert_eq!(keys, vec!["customers", "events", "orders"]);
    Ok(())
}

#[test]
fn test_reads_go_where_the_key_is_known() -> Result<()> {
    let env = Environment::new();
    let manager = env.manager()?;

    // Declared in data.local, read with the declared delimiter
    let customers = manager.load("customers", &Options::new(), None)?;
    assert_eq!(customers.kind(), DatasetKind::Table);
    assert_eq!(customers.columns(), ["id", "name"]);
    assert_eq!(customers.num_rows(), 2);

    // Discovered by scanning local_path
    assert_eq!(
        manager.resolve("orders", None)?,
        env.path("local/orders.json").to_string_lossy()
    );
    assert_eq!(manager.load("orders", &Options::new(), None)?.num_rows(), 1);
    assert!(manager.exists("orders", None)?);

    // Declared in data.hdfs but never written
    assert_eq!(manager.resolve("events", None)?, env.path("events").to_string_lossy());
    assert!(!manager.exists("events", None)?);
    Ok(())
}

#[test]
fn test_unknown_keys() -> Result<()> {
    let env = Environment::new();
    let manager = env.manager()?;

    assert!(!manager.has("missing_key", Some(DataContext::Read), None)?);
    assert!(!manager.exists("missing_key", None)?);

    let err = manager.load("missing_key", &Options::new(), None).expect_err("unknown key");
    assert!(err.is_no_backend_found(), "Unexpected error: {}", err);

    let err = manager
        .load("missing_key", &Options::new(), Some("local-configured"))
        .expect_err("undeclared key");
    assert!(err.is_not_found(), "Unexpected error: {}", err);
    Ok(())
}

#[test]
fn test_read_only_declaration_redirects_writes() -> Result<()> {
    let env = Environment::new();
    let mut manager = env.manager()?;
    let original = read(&env.path("declared/customers.csv"));

    // Writes skip the read-only declaration and land in the warehouse
    assert_eq!(
        manager.resolve_in("customers", Some(DataContext::Write), None)?,
        env.path("warehouse/customers.parquet").to_string_lossy()
    );
    assert!(manager.save("customers", sample_table().into(), &SaveOptions::new(), None)?);
    assert!(env.path("warehouse/customers.parquet/_SUCCESS").is_file());
    assert_eq!(read(&env.path("declared/customers.csv")), original);

    // Reads still prefer the declaration
    assert_eq!(manager.load("customers", &Options::new(), None)?.num_rows(), 2);
    assert_eq!(
        manager
            .load("customers", &Options::new(), Some("hdfs-base_path"))?
            .num_rows(),
        3
    );

    let err = manager
        .delete("customers", Some("local-configured"))
        .expect_err("read only");
    assert!(err.is_read_only(), "Unexpected error: {}", err);
    Ok(())
}

#[test]
fn test_new_keys_are_written_to_the_warehouse() -> Result<()> {
    let env = Environment::new();
    let mut manager = env.manager()?;

    assert!(manager.has("scores", Some(DataContext::Write), None)?);
    assert!(!manager.has("scores", Some(DataContext::Read), None)?);

    manager.save("scores", sample_table().into(), &SaveOptions::new(), None)?;
    assert!(manager.has("scores", Some(DataContext::Read), None)?);
    assert!(manager.backend("hdfs-base_path").map(|b| b.has("scores", None)).unwrap_or(false));
    assert!(!manager.backend("local-base_path").map(|b| b.has("scores", None)).unwrap_or(true));

    assert!(manager.delete("scores", None)?);
    assert!(!env.path("warehouse/scores.parquet").exists());
    assert!(!manager.has("scores", Some(DataContext::Read), None)?);
    Ok(())
}
