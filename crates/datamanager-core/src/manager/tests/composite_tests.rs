use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::tempdir;

use crate::config::ConfigTree;
use crate::dataset::{Dataset, Table};
use crate::error::{Error, Result};
use crate::format::Options;
use crate::manager::{Backend, BackendOptions, CompositeDataManager, DataManager, DispatchError};
use crate::resource::{DataContext, ResourceDescriptor, ResourceError};
use crate::storage::SaveOptions;

/// In-memory backend knowing a fixed set of keys
#[derive(Debug)]
struct StaticBackend {
    id: String,
    keys: BTreeMap<String, ResourceDescriptor>,
    writable: bool,
}

impl StaticBackend {
    fn new(id: &str, keys: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            keys: keys
                .iter()
                .map(|key| (key.to_string(), ResourceDescriptor::new().with_path(format!("{}://{}", id, key))))
                .collect(),
            writable: false,
        }
    }

    fn writable(mut self) -> Self {
        self.writable = true;
        self
    }
}

impl DataManager for StaticBackend {
    fn id(&self) -> &str {
        &self.id
    }

    fn resources(&self) -> BTreeMap<String, ResourceDescriptor> {
        self.keys.clone()
    }

    fn resource(&self, key: &str) -> Result<ResourceDescriptor> {
        self.keys
            .get(key)
            .cloned()
            .ok_or_else(|| ResourceError::not_found(key).into())
    }

    fn has(&self, key: &str, context: Option<DataContext>) -> bool {
        (context == Some(DataContext::Write) && self.writable) || self.keys.contains_key(key)
    }

    fn add(&mut self, key: &str, descriptor: ResourceDescriptor) -> Result<()> {
        self.keys.insert(key.to_string(), descriptor);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.keys.remove(key);
        Ok(())
    }

    fn resolve(&self, key: &str) -> Result<String> {
        Ok(format!("{}://{}", self.id, key))
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.keys.contains_key(key))
    }

    fn load(&self, key: &str, _options: &Options) -> Result<Dataset> {
        self.resource(key)?;
        Ok(Table::new(["source"]).into())
    }

    fn save(&mut self, key: &str, _dataset: Dataset, _options: &SaveOptions) -> Result<bool> {
        self.add(key, ResourceDescriptor::new())?;
        Ok(true)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        Ok(self.keys.remove(key).is_some())
    }
}

fn composite(backends: Vec<StaticBackend>, order: Option<&[&str]>) -> Result<CompositeDataManager> {
    CompositeDataManager::new(
        backends
            .into_iter()
            .map(|backend| Box::new(backend) as Box<dyn DataManager>)
            .collect(),
        order.map(|ids| ids.iter().map(|id| id.to_string()).collect()),
    )
}

fn sales() -> Table {
    Table::from_rows(
        ["region", "amount"],
        vec![vec![json!("north"), json!(10)], vec![json!("south"), json!(20)]],
    )
    .expect("rows match the columns")
}

/// `local-configured` declaring a read-only `sales` csv file, then
/// `local-base_path` over `base`
fn local_composite(config_dir: &Path, base: &Path) -> Result<CompositeDataManager> {
    let sales_path = config_dir.join("sales.csv");
    fs::write(&sales_path, "region,amount\neast,5\n").expect("Failed to write sales");

    let config = ConfigTree::from_value(json!({
        "data": { "local": {
            "sales": { "path": sales_path.to_string_lossy(), "type": "csv", "read_only": true }
        }}
    }))?;
    let backends: Vec<Box<dyn DataManager>> = vec![
        Box::new(Backend::local_configured(&config, BackendOptions::new())?),
        Box::new(Backend::local_base_path(base, BackendOptions::new())?),
    ];
    CompositeDataManager::new(backends, None)
}

#[test]
fn test_id_lists_priority_order() -> Result<()> {
    let manager = composite(
        vec![StaticBackend::new("a", &[]), StaticBackend::new("b", &[])],
        Some(&["b", "a"]),
    )?;
    assert_eq!(manager.id(), "composite(b,a)");
    assert_eq!(manager.backend_ids(), vec!["a", "b"]);
    assert_eq!(manager.priority(), ["b".to_string(), "a".to_string()]);
    Ok(())
}

#[test]
fn test_duplicate_backend_ids_are_rejected() {
    let err = composite(vec![StaticBackend::new("a", &[]), StaticBackend::new("a", &[])], None)
        .expect_err("duplicate ids");
    assert!(matches!(err, Error::Dispatch(DispatchError::DuplicateBackend { ref id }) if id == "a"));
}

#[test]
fn test_routes_to_the_highest_priority_backend_with_the_key() -> Result<()> {
    let manager = composite(
        vec![
            StaticBackend::new("first", &["orders"]),
            StaticBackend::new("second", &["orders", "customers"]),
        ],
        None,
    )?;

    assert_eq!(manager.resolve("orders", None)?, "first://orders");
    assert_eq!(manager.resolve("customers", None)?, "second://customers");
    assert_eq!(manager.resolve("orders", Some("second"))?, "second://orders");
    Ok(())
}

#[test]
fn test_priority_order_overrides_registration_order() -> Result<()> {
    let manager = composite(
        vec![StaticBackend::new("first", &["orders"]), StaticBackend::new("second", &["orders"])],
        Some(&["second", "first", "ghost"]),
    )?;
    assert_eq!(manager.resolve("orders", None)?, "second://orders");
    Ok(())
}

#[test]
fn test_backends_outside_the_order_are_only_explicit() -> Result<()> {
    let manager = composite(
        vec![StaticBackend::new("ranked", &[]), StaticBackend::new("hidden", &["orders"])],
        Some(&["ranked"]),
    )?;

    let err = manager.resolve("orders", None).expect_err("not routable");
    assert!(err.is_no_backend_found(), "Unexpected error: {}", err);
    assert_eq!(manager.resolve("orders", Some("hidden"))?, "hidden://orders");
    // Still visible in the merged listing
    assert!(manager.resources().contains_key("orders"));
    Ok(())
}

#[test]
fn test_unknown_explicit_backend() -> Result<()> {
    let manager = composite(vec![StaticBackend::new("a", &["orders"])], None)?;

    let err = manager.load("orders", &Options::new(), Some("b")).expect_err("no backend b");
    assert!(matches!(err, Error::Dispatch(DispatchError::UnknownBackend { ref id }) if id == "b"));

    let err = manager.has("orders", None, Some("b")).expect_err("no backend b");
    assert!(matches!(err, Error::Dispatch(DispatchError::UnknownBackend { .. })));
    Ok(())
}

#[test]
fn test_no_backend_found_names_key_and_context() -> Result<()> {
    let manager = composite(vec![StaticBackend::new("a", &["orders"])], None)?;

    let err = manager.load("customers", &Options::new(), None).expect_err("unknown key");
    assert!(err.is_no_backend_found());
    assert!(
        matches!(err, Error::Dispatch(DispatchError::NoBackendFound { ref key, context: Some(DataContext::Read) }) if key == "customers")
    );
    assert!(err.to_string().contains("customers"), "Unexpected message: {}", err);
    Ok(())
}

#[test]
fn test_has_by_context() -> Result<()> {
    let manager = composite(
        vec![StaticBackend::new("a", &["orders"]), StaticBackend::new("b", &[]).writable()],
        None,
    )?;

    assert!(manager.has("orders", None, None)?);
    assert!(!manager.has("customers", Some(DataContext::Read), None)?);
    assert!(manager.has("customers", Some(DataContext::Write), None)?);
    assert!(!manager.has("customers", Some(DataContext::Write), Some("a"))?);
    Ok(())
}

#[test]
fn test_exists_is_false_for_keys_nobody_knows() -> Result<()> {
    let manager = composite(vec![StaticBackend::new("a", &["orders"])], None)?;
    assert!(!manager.exists("customers", None)?);
    assert!(manager.exists("orders", None)?);
    Ok(())
}

#[test]
fn test_resources_prefer_higher_priority() -> Result<()> {
    let manager = composite(
        vec![
            StaticBackend::new("low", &["orders", "customers"]),
            StaticBackend::new("high", &["orders"]),
        ],
        Some(&["high", "low"]),
    )?;

    let resources = manager.resources();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources["orders"].path.as_deref(), Some("high://orders"));
    assert_eq!(resources["customers"].path.as_deref(), Some("low://customers"));
    Ok(())
}

#[test]
fn test_writes_follow_the_write_context() -> Result<()> {
    let mut manager = composite(
        vec![StaticBackend::new("reader", &["orders"]), StaticBackend::new("writer", &[]).writable()],
        None,
    )?;

    // `reader` knows the key, so it also takes the write
    assert!(manager.save("orders", Table::new(["id"]).into(), &SaveOptions::new(), None)?);
    assert!(!manager.backend("writer").map(|b| b.has("orders", None)).unwrap_or(true));

    assert!(manager.save("customers", Table::new(["id"]).into(), &SaveOptions::new(), None)?);
    assert!(manager.backend("writer").map(|b| b.has("customers", None)).unwrap_or(false));

    assert!(manager.delete("customers", None)?);
    assert!(!manager.delete("customers", Some("reader"))?);
    Ok(())
}

#[test]
fn test_backend_mut_reaches_a_single_backend() -> Result<()> {
    let mut manager = composite(vec![StaticBackend::new("a", &[])], None)?;
    if let Some(backend) = manager.backend_mut("a") {
        backend.add("orders", ResourceDescriptor::new())?;
    }
    assert!(manager.has("orders", None, None)?);
    assert!(manager.backend_mut("b").is_none());
    Ok(())
}

#[test]
fn test_read_only_dataset_is_saved_to_the_base_path() -> Result<()> {
    let config_dir = tempdir().expect("Failed to create temp directory");
    let base = tempdir().expect("Failed to create temp directory");
    let mut manager = local_composite(config_dir.path(), base.path())?;

    // Reads come from the configured file
    let loaded = manager.load("sales", &Options::new(), None)?;
    assert_eq!(loaded.num_rows(), 1);
    assert_eq!(
        manager.resolve_in("sales", Some(DataContext::Read), None)?,
        config_dir.path().join("sales.csv").to_string_lossy()
    );

    // The configured declaration is read-only, so the write falls through
    assert_eq!(
        manager.resolve_in("sales", Some(DataContext::Write), None)?,
        base.path().join("sales.parquet").to_string_lossy()
    );
    assert!(manager.save("sales", sales().into(), &SaveOptions::new(), None)?);
    assert!(base.path().join("sales.parquet").is_file());
    assert_eq!(
        fs::read_to_string(config_dir.path().join("sales.csv")).expect("read sales"),
        "region,amount\neast,5\n"
    );

    let saved = manager.load("sales", &Options::new(), Some("local-base_path"))?;
    assert_eq!(saved.into_table(), Some(sales()));

    // Forcing the read-only backend fails
    let err = manager
        .save("sales", sales().into(), &SaveOptions::new(), Some("local-configured"))
        .expect_err("read only");
    assert!(err.is_read_only(), "Unexpected error: {}", err);
    Ok(())
}

#[test]
fn test_load_missing_key_through_explicit_configured_backend() -> Result<()> {
    let config_dir = tempdir().expect("Failed to create temp directory");
    let base = tempdir().expect("Failed to create temp directory");
    let manager = local_composite(config_dir.path(), base.path())?;

    let err = manager
        .load("missing_key", &Options::new(), Some("local-configured"))
        .expect_err("undeclared");
    assert!(err.is_not_found(), "Unexpected error: {}", err);

    let err = manager.load("missing_key", &Options::new(), None).expect_err("undeclared");
    assert!(err.is_no_backend_found(), "Unexpected error: {}", err);
    Ok(())
}
