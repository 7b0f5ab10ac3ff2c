/// Default file type used when a descriptor does not declare one
pub const DEFAULT_FILE_TYPE: &str = "parquet";

/// Configuration subtree holding the local (table) resources
pub const LOCAL_CONFIG_ROOT: &str = "data.local";

/// Configuration subtree holding the distributed (partitioned) resources
pub const HDFS_CONFIG_ROOT: &str = "data.hdfs";

/// Configuration key with the base directory of the local base path backend
pub const LOCAL_PATH_KEY: &str = "local_path";

/// Configuration key with the base directory of the partitioned base path backend
pub const HDFS_PATH_KEY: &str = "hdfs_path";

/// Backend identity: table storage, resources from configuration
pub const LOCAL_CONFIGURED_ID: &str = "local-configured";

/// Backend identity: table storage, resources from a base directory
pub const LOCAL_BASE_PATH_ID: &str = "local-base_path";

/// Backend identity: partitioned storage, resources from configuration
pub const HDFS_CONFIGURED_ID: &str = "hdfs-configured";

/// Backend identity: partitioned storage, resources from a base directory
pub const HDFS_BASE_PATH_ID: &str = "hdfs-base_path";

/// Marker file written next to the part files of a partitioned dataset
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Directory value used for null partition column values
pub const DEFAULT_PARTITION_VALUE: &str = "__HIVE_DEFAULT_PARTITION__";

/// Root target for all log records emitted by this crate
pub const LOG_TARGET: &str = "datamanager";
