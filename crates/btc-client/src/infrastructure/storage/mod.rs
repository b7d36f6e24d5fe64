//! Storage infrastructure: the settings file, its bundled default and the
//! legacy server list.
//!
//! - `config_store` – [`ConfigStore`], the load/migrate/save pipeline.
//! - `legacy` – one-time import of `btc_servers.cfg`.
//! - `resource` – where the first-run default comes from.
//! - `status` – where verbose status lines go.

pub mod config_store;
pub mod legacy;
pub mod resource;
pub mod status;

pub use config_store::{
    ConfigStore, LoadOutcome, StoreError, StorePaths, BACKUP_SUFFIX, LEGACY_FILE_NAME,
    SETTINGS_FILE_NAME,
};
pub use resource::{BundledSettings, DefaultResource, NoDefault, BUNDLED_SETTINGS};
pub use status::{RecordingStatus, StatusSink, TracingStatus};
