//! `settings.xml` persistence for the client.
//!
//! [`ConfigStore`] owns the two in-memory collections the rest of the client
//! reads (command shortcuts and known servers) and keeps them in sync with
//! the settings file:
//!
//! ```text
//! load()
//!  ├─ settings.xml missing?  → write the bundled default
//!  ├─ parse settings.xml     → commands, servers   (per-section recovery)
//!  ├─ btc_servers.cfg found? → add legacy servers, rename to .bak
//!  └─ rewrite settings.xml with the merged state
//! ```
//!
//! Nothing in here panics or propagates errors out of [`ConfigStore::load`]
//! or [`ConfigStore::save`]: every failure is logged where it happens and the
//! store carries on with whatever it could recover.  [`ConfigStore::try_save`]
//! is available for callers that want the typed error.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use btc_core::{
    build_settings_document, read_settings_document, Document, DocumentError,
    PlayerCommandEntry, ServerEntry,
};
use thiserror::Error;
use tracing::{debug, error, warn};

use super::legacy::import_legacy_servers;
use super::resource::{BundledSettings, DefaultResource};
use super::status::{StatusSink, TracingStatus};

/// Default settings file name.
pub const SETTINGS_FILE_NAME: &str = "settings.xml";
/// Deprecated line-per-server file imported once and then renamed.
pub const LEGACY_FILE_NAME: &str = "btc_servers.cfg";
/// Appended to the legacy file name after import.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Error type for settings store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings document could not be parsed or written.
    #[error("invalid settings document {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    /// No default settings are available to provision from.
    #[error("no default settings resource available")]
    NoDefaultResource,

    /// The legacy backup already exists and would be overwritten.
    #[error("backup file {path} already exists")]
    BackupExists { path: PathBuf },
}

/// Where the store reads and writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub settings: PathBuf,
    pub legacy: PathBuf,
}

impl StorePaths {
    /// `settings.xml` and `btc_servers.cfg` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            settings: dir.join(SETTINGS_FILE_NAME),
            legacy: dir.join(LEGACY_FILE_NAME),
        }
    }

    /// The legacy file path with [`BACKUP_SUFFIX`] appended.
    pub fn legacy_backup(&self) -> PathBuf {
        let mut backup = self.legacy.clone().into_os_string();
        backup.push(BACKUP_SUFFIX);
        PathBuf::from(backup)
    }

    fn settings_display_name(&self) -> String {
        self.settings
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.settings.display().to_string())
    }
}

/// Coarse result of [`ConfigStore::load_outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every section was read.
    Loaded,
    /// The settings file exists but at least one section (or the whole
    /// document) could not be read; the collections hold what was recovered.
    LoadedWithErrors,
    /// No settings file exists and none could be provisioned.
    Unavailable,
}

impl LoadOutcome {
    /// `true` unless no settings file could be obtained at all.
    pub fn is_available(self) -> bool {
        !matches!(self, LoadOutcome::Unavailable)
    }
}

/// In-memory settings plus the files backing them.
pub struct ConfigStore {
    paths: StorePaths,
    default_resource: Box<dyn DefaultResource>,
    status: Box<dyn StatusSink>,
    commands: Vec<PlayerCommandEntry>,
    servers: HashSet<ServerEntry>,
}

impl ConfigStore {
    /// Creates an empty store using the bundled default and `tracing` status
    /// output.  Nothing is read until [`load`](Self::load).
    pub fn new(paths: StorePaths) -> Self {
        Self {
            paths,
            default_resource: Box::new(BundledSettings),
            status: Box::new(TracingStatus),
            commands: Vec::new(),
            servers: HashSet::new(),
        }
    }

    pub fn with_default_resource(mut self, resource: impl DefaultResource + 'static) -> Self {
        self.default_resource = Box::new(resource);
        self
    }

    pub fn with_status_sink(mut self, sink: impl StatusSink + 'static) -> Self {
        self.status = Box::new(sink);
        self
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Command shortcuts in display order.
    pub fn commands(&self) -> &[PlayerCommandEntry] {
        &self.commands
    }

    /// Mutable access; changes are written by the next [`save`](Self::save).
    pub fn commands_mut(&mut self) -> &mut Vec<PlayerCommandEntry> {
        &mut self.commands
    }

    pub fn servers(&self) -> &HashSet<ServerEntry> {
        &self.servers
    }

    /// Mutable access; changes are written by the next [`save`](Self::save).
    pub fn servers_mut(&mut self) -> &mut HashSet<ServerEntry> {
        &mut self.servers
    }

    /// Loads settings, migrates the legacy server list and rewrites the file.
    ///
    /// Returns `false` only when no settings file exists and none could be
    /// provisioned.  A file that loaded with errors still returns `true`.
    pub fn load(&mut self, verbose: bool) -> bool {
        self.load_outcome(verbose).is_available()
    }

    /// Same as [`load`](Self::load) but reports whether errors occurred.
    pub fn load_outcome(&mut self, verbose: bool) -> LoadOutcome {
        let name = self.paths.settings_display_name();

        if !self.paths.settings.exists() {
            match self.provision_default() {
                Ok(()) => self.report(verbose, &format!("Copied default {name}.")),
                Err(e) => error!(error = %e, "failed to provision default settings"),
            }
        }

        if !self.paths.settings.exists() {
            self.report(verbose, &format!("Can't load {name}."));
            return LoadOutcome::Unavailable;
        }

        let had_errors = self.load_document();

        let legacy = import_legacy_servers(&self.paths.legacy, &self.paths.legacy_backup());
        self.servers.extend(legacy);

        if let Err(e) = self.try_save() {
            error!(error = %e, "failed to rewrite settings");
        }

        if had_errors {
            self.report(verbose, "Settings loaded with errors.");
            LoadOutcome::LoadedWithErrors
        } else {
            self.report(verbose, "Settings loaded.");
            LoadOutcome::Loaded
        }
    }

    /// Writes the current in-memory state to the settings file.
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "failed to save settings");
                false
            }
        }
    }

    /// Writes the current in-memory state, overwriting the settings file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Document`] if the document cannot be serialized
    /// and [`StoreError::Io`] if the file cannot be written.
    pub fn try_save(&self) -> Result<(), StoreError> {
        let path = &self.paths.settings;
        let xml = build_settings_document(&self.commands, &self.servers)
            .to_xml_string()
            .map_err(|source| StoreError::Document {
                path: path.clone(),
                source,
            })?;
        std::fs::write(path, xml).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(
            path = %path.display(),
            commands = self.commands.len(),
            servers = self.servers.len(),
            "wrote settings"
        );
        Ok(())
    }

    /// Parses the settings file into the collections.  Returns `true` if
    /// anything went wrong.
    fn load_document(&mut self) -> bool {
        let mut doc = match read_document(&self.paths.settings) {
            Ok(doc) => doc,
            Err(e) => {
                error!(error = %e, "failed to parse settings");
                return true;
            }
        };

        let report = read_settings_document(&mut doc, &mut self.commands, &mut self.servers);
        for e in report.errors() {
            warn!(error = %e, "failed to load settings section");
        }
        report.had_errors()
    }

    fn provision_default(&self) -> Result<(), StoreError> {
        let contents = self
            .default_resource
            .contents()
            .ok_or(StoreError::NoDefaultResource)?;
        let path = &self.paths.settings;

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, contents).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })
    }

    fn report(&self, verbose: bool, message: &str) {
        if verbose {
            self.status.status(message);
        }
    }
}

fn read_document(path: &Path) -> Result<Document, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Document::parse(&content).map_err(|source| StoreError::Document {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
