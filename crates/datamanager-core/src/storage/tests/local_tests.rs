use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

use crate::error::Result;
use crate::storage::local::LocalStorageProvider;
use crate::storage::provider::StorageProvider;

fn rooted() -> (TempDir, LocalStorageProvider) {
    let dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(dir.path());
    (dir, provider)
}

#[test]
fn test_part_files_are_written_with_their_directories() -> Result<()> {
    let (_dir, provider) = rooted();

    let part = Path::new("sales/part-00000.csv");
    provider.write_bytes(part, b"region,amount\nnorth,10\n")?;

    assert!(provider.is_dir(Path::new("sales")));
    assert_eq!(provider.read_to_bytes(part)?, b"region,amount\nnorth,10\n".to_vec());
    assert_eq!(provider.read_to_string(part)?, "region,amount\nnorth,10\n");
    Ok(())
}

#[test]
fn test_rewrite_leaves_no_staging_files() -> Result<()> {
    let (_dir, provider) = rooted();

    let target = PathBuf::from("customers.json");
    provider.write_string(&target, "[1]")?;
    provider.write_string(&target, "[2]")?;

    assert_eq!(provider.read_to_string(&target)?, "[2]");
    assert_eq!(provider.read_dir(Path::new(""))?, vec![target]);
    Ok(())
}

#[test]
fn test_remove_all_handles_files_and_trees() -> Result<()> {
    let (_dir, provider) = rooted();

    let file = Path::new("events.csv");
    provider.write_bytes(file, b"id\n1\n")?;
    assert!(provider.remove_all(file)?);
    assert!(!provider.exists(file));

    let tree = Path::new("events.parquet");
    provider.write_bytes(&tree.join("year=2024").join("part-00000.parquet"), b"")?;
    provider.write_bytes(&tree.join("_SUCCESS"), b"")?;
    assert!(provider.remove_all(tree)?);
    assert!(!provider.exists(tree));

    // Nothing left to remove
    assert!(!provider.remove_all(tree)?);
    Ok(())
}

#[test]
fn test_failed_removal_names_the_operation() {
    let (_dir, provider) = rooted();

    let err = provider
        .remove_file(Path::new("missing.csv"))
        .expect_err("nothing to remove");
    assert!(err.to_string().contains("remove_file"), "Unexpected error: {}", err);
    assert!(err.to_string().contains("missing.csv"), "Unexpected error: {}", err);
}

#[test]
fn test_listing_is_sorted_and_relative_to_the_root() -> Result<()> {
    let (_dir, provider) = rooted();

    let orders = Path::new("orders.parquet");
    let parts: Vec<PathBuf> = (0..3).map(|i| orders.join(format!("part-{:05}.parquet", i))).collect();
    for part in parts.iter().rev() {
        provider.write_bytes(part, b"")?;
    }
    provider.create_dir_all(Path::new("archive"))?;

    assert_eq!(
        provider.read_dir(Path::new(""))?,
        vec![PathBuf::from("archive"), orders.to_path_buf()]
    );
    assert_eq!(provider.read_dir(orders)?, parts);
    Ok(())
}

#[test]
fn test_default_provider_keeps_absolute_paths() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::default();

    let nested = dir.path().join("nested");
    let file = nested.join("orders.csv");
    provider.write_bytes(&file, b"id\n")?;

    assert!(provider.is_file(&file));
    assert!(provider.is_dir(&nested));
    assert!(!provider.is_file(&dir.path().join("not_real")));
    assert_eq!(provider.read_dir(&nested)?, vec![file]);
    Ok(())
}
