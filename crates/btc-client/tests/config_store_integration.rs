//! Integration tests for the settings store.
//!
//! Each test works in its own temporary directory and drives the store only
//! through its public API, checking both the in-memory collections and the
//! files left on disk.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use btc_client::infrastructure::storage::{
    ConfigStore, LoadOutcome, NoDefault, RecordingStatus, StorePaths, LEGACY_FILE_NAME,
    SETTINGS_FILE_NAME,
};
use btc_core::{PlayerCommandEntry, ServerEntry, LEGACY_SERVER_NAME};
use tempfile::TempDir;

const SERVERS_ONLY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<configuration>
    <servers>
        <server>
            <name>Hub</name>
            <address>play.example.com:25565</address>
            <flag>true</flag>
        </server>
    </servers>
</configuration>
"#;

fn settings_path(dir: &Path) -> std::path::PathBuf {
    dir.join(SETTINGS_FILE_NAME)
}

fn quiet_store(dir: &Path) -> ConfigStore {
    ConfigStore::new(StorePaths::in_dir(dir))
}

#[test]
fn test_missing_settings_are_provisioned_from_bundled_default() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let status = RecordingStatus::new();
    let mut store = quiet_store(dir.path()).with_status_sink(status.clone());

    // Act
    let loaded = store.load(true);

    // Assert
    assert!(loaded);
    assert!(settings_path(dir.path()).exists());
    assert!(!store.commands().is_empty(), "bundled default ships commands");
    assert_eq!(
        status.lines(),
        vec![
            "Copied default settings.xml.".to_string(),
            "Settings loaded.".to_string()
        ]
    );
}

#[test]
fn test_missing_settings_without_default_fail_to_load() {
    let dir = TempDir::new().unwrap();
    let mut store = quiet_store(dir.path()).with_default_resource(NoDefault);

    assert!(!store.load(false));
    assert!(store.commands().is_empty());
    assert!(store.servers().is_empty());
    assert!(!settings_path(dir.path()).exists());
}

#[test]
fn test_legacy_servers_are_migrated_once() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(settings_path(dir.path()), SERVERS_ONLY).unwrap();
    fs::write(
        dir.path().join(LEGACY_FILE_NAME),
        "1.2.3.4:25565\n\nplay.example.com\n",
    )
    .unwrap();
    let mut store = quiet_store(dir.path());

    // Act
    let outcome = store.load_outcome(false);

    // Assert – two legacy entries added next to the existing server
    assert_eq!(outcome, LoadOutcome::LoadedWithErrors);
    let legacy: Vec<&ServerEntry> = store
        .servers()
        .iter()
        .filter(|s| s.name == LEGACY_SERVER_NAME)
        .collect();
    assert_eq!(legacy.len(), 2);
    assert!(legacy.iter().all(|s| !s.flag));
    assert!(store
        .servers()
        .contains(&ServerEntry::legacy("1.2.3.4:25565")));
    assert!(store
        .servers()
        .contains(&ServerEntry::legacy("play.example.com")));
    assert_eq!(store.servers().len(), 3);

    assert!(!dir.path().join(LEGACY_FILE_NAME).exists());
    assert!(store.paths().legacy_backup().exists());

    // The migrated entries are now part of settings.xml.
    let written = fs::read_to_string(settings_path(dir.path())).unwrap();
    assert!(written.contains("<address>1.2.3.4:25565</address>"));
}

#[test]
fn test_partial_document_keeps_prior_commands_and_reads_servers() {
    // Arrange: commands set by the application before the (re)load
    let dir = TempDir::new().unwrap();
    fs::write(settings_path(dir.path()), SERVERS_ONLY).unwrap();
    let mut store = quiet_store(dir.path());
    let prior = vec![PlayerCommandEntry::new("Kick", "kick %s")];
    *store.commands_mut() = prior.clone();

    // Act
    let outcome = store.load_outcome(false);

    // Assert
    assert_eq!(outcome, LoadOutcome::LoadedWithErrors);
    assert_eq!(store.commands(), prior.as_slice());
    let expected: HashSet<ServerEntry> =
        [ServerEntry::new("Hub", "play.example.com:25565", true)]
            .into_iter()
            .collect();
    assert_eq!(store.servers(), &expected);
}

#[test]
fn test_broken_entry_empties_its_section_but_load_succeeds() {
    // Arrange: the only command lacks <format>
    let dir = TempDir::new().unwrap();
    fs::write(
        settings_path(dir.path()),
        "<configuration><playerCommands><playerCommand><name>Kick</name></playerCommand>\
         </playerCommands><servers/></configuration>",
    )
    .unwrap();
    let mut store = quiet_store(dir.path());
    store
        .commands_mut()
        .push(PlayerCommandEntry::new("Prior", "prior %s"));

    // Act
    let loaded = store.load(false);

    // Assert – the section was cleared before the broken entry was hit
    assert!(loaded);
    assert!(store.commands().is_empty());
}

#[test]
fn test_save_twice_is_byte_identical() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let mut store = quiet_store(dir.path());
    assert!(store.load(false));
    store
        .servers_mut()
        .insert(ServerEntry::new("Hub", "play.example.com", true));
    store
        .servers_mut()
        .insert(ServerEntry::new("Creative", "creative.example.com", false));

    // Act
    assert!(store.save());
    let first = fs::read(settings_path(dir.path())).unwrap();
    assert!(store.save());
    let second = fs::read(settings_path(dir.path())).unwrap();

    // Assert
    assert_eq!(first, second);
}

#[test]
fn test_saved_state_round_trips_through_a_new_store() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let commands = vec![
        PlayerCommandEntry::new("Kick", "kick %s"),
        PlayerCommandEntry::new("Say", "say <%s> & \"hi\""),
    ];
    let servers: HashSet<ServerEntry> = [
        ServerEntry::new("Hub", "play.example.com", true),
        ServerEntry::legacy("1.2.3.4"),
    ]
    .into_iter()
    .collect();
    let mut writer = quiet_store(dir.path());
    *writer.commands_mut() = commands.clone();
    *writer.servers_mut() = servers.clone();
    assert!(writer.save());

    // Act
    let mut reader = quiet_store(dir.path());
    let outcome = reader.load_outcome(false);

    // Assert
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(reader.commands(), commands.as_slice());
    assert_eq!(reader.servers(), &servers);
}

#[test]
fn test_reload_after_migration_leaves_content_unchanged() {
    // Arrange: first load migrates the legacy file
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(LEGACY_FILE_NAME), "1.2.3.4:25565\n").unwrap();
    let mut first = quiet_store(dir.path());
    assert!(first.load(false));
    let after_first = fs::read_to_string(settings_path(dir.path())).unwrap();
    let backup = first.paths().legacy_backup();
    let backup_contents = fs::read_to_string(&backup).unwrap();

    // Act
    let mut second = quiet_store(dir.path());
    assert_eq!(second.load_outcome(false), LoadOutcome::Loaded);

    // Assert
    let after_second = fs::read_to_string(settings_path(dir.path())).unwrap();
    assert_eq!(after_first, after_second);
    assert_eq!(second.commands(), first.commands());
    assert_eq!(second.servers(), first.servers());
    assert_eq!(fs::read_to_string(&backup).unwrap(), backup_contents);
}

#[test]
fn test_malformed_settings_still_import_legacy_servers() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(settings_path(dir.path()), "this is not markup <<<").unwrap();
    fs::write(dir.path().join(LEGACY_FILE_NAME), "legacy.example.com\n").unwrap();
    let mut store = quiet_store(dir.path());

    // Act
    let outcome = store.load_outcome(false);

    // Assert
    assert_eq!(outcome, LoadOutcome::LoadedWithErrors);
    assert!(store
        .servers()
        .contains(&ServerEntry::legacy("legacy.example.com")));
    let written = fs::read_to_string(settings_path(dir.path())).unwrap();
    assert!(written.contains("<address>legacy.example.com</address>"));
}
