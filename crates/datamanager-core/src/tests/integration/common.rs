#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::{tempdir, TempDir};

use crate::config::ConfigTree;
use crate::dataset::Table;
use crate::error::Result;
use crate::manager::{CompositeDataManager, DataManagerFactory};

/// Directory layout of a test deployment:
///
/// ```text
/// <root>/
///   config.yaml
///   declared/customers.csv
///   warehouse/            (hdfs_path)
///   local/orders.json     (local_path)
/// ```
pub struct Environment {
    pub root: TempDir,
    pub config: ConfigTree,
}

impl Environment {
    pub fn new() -> Self {
        let root = tempdir().expect("Failed to create temp directory");
        let declared = root.path().join("declared");
        let local = root.path().join("local");
        fs::create_dir_all(&declared).expect("Failed to create declared dir");
        fs::create_dir_all(&local).expect("Failed to create local dir");
        fs::create_dir_all(root.path().join("warehouse")).expect("Failed to create warehouse dir");

        fs::write(declared.join("customers.csv"), "id;name\n1;ada\n2;grace\n").expect("Failed to write customers");
        fs::write(local.join("orders.json"), r#"[{"id": 1, "total": 9.5}]"#).expect("Failed to write orders");

        let yaml = format!(
            "local_path: {local}
hdfs_path: {warehouse}
data:
  local:
    customers:
      path: {customers}
      type: csv
      read_only: true
      options:
        delimiter: ';'
  hdfs:
    events:
      path: {events}
      type: jsonl
",
            local = local.display(),
            warehouse = root.path().join("warehouse").display(),
            customers = declared.join("customers.csv").display(),
            events = root.path().join("events").display(),
        );
        let config_path = root.path().join("config.yaml");
        fs::write(&config_path, yaml).expect("Failed to write config");
        let config = ConfigTree::from_file(&config_path).expect("Failed to load config");

        Self { root, config }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn manager(&self) -> Result<CompositeDataManager> {
        DataManagerFactory::new().all(Some(&self.config), None, None)
    }
}

pub fn sample_table() -> Table {
    Table::from_rows(
        ["id", "city", "score"],
        vec![
            vec![json!(1), json!("lyon"), json!(0.5)],
            vec![json!(2), json!("oslo"), json!(null)],
            vec![json!(3), json!("lima"), json!(2.25)],
        ],
    )
    .expect("rows match the columns")
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}
