//! One-time import of the deprecated `btc_servers.cfg` server list.
//!
//! The legacy file holds one server address per line.  Each non-blank line
//! (after trimming) becomes a [`ServerEntry::legacy`].  Once read, the file is
//! moved to `btc_servers.cfg.bak`; its absence is the only marker that the
//! migration has already happened.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use btc_core::ServerEntry;
use tracing::{error, info};

use super::StoreError;

/// Imports the legacy server list at `legacy`, if there is one.
///
/// Never fails: I/O problems are logged and whatever was read before the
/// problem is returned.  The file is only moved to `backup` after it has been
/// read completely, so an interrupted import is retried on the next load.
pub fn import_legacy_servers(legacy: &Path, backup: &Path) -> Vec<ServerEntry> {
    if !legacy.exists() {
        return Vec::new();
    }

    let (servers, read_result) = read_legacy_servers(legacy);
    if let Err(e) = read_result {
        error!(error = %e, imported = servers.len(), "failed to read legacy server list");
        return servers;
    }

    match move_to_backup(legacy, backup) {
        Ok(()) => info!(
            imported = servers.len(),
            backup = %backup.display(),
            "migrated legacy server list"
        ),
        Err(e) => error!(error = %e, "failed to move legacy server list aside"),
    }
    servers
}

/// Reads every non-blank trimmed line as a legacy server.
///
/// Returns the servers read so far together with the first I/O error.
fn read_legacy_servers(path: &Path) -> (Vec<ServerEntry>, Result<(), StoreError>) {
    let mut servers = Vec::new();
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(source) => return (servers, Err(io_err(source))),
    };

    for line in BufReader::new(file).lines() {
        match line {
            Ok(line) => {
                let address = line.trim();
                if !address.is_empty() {
                    servers.push(ServerEntry::legacy(address));
                }
            }
            Err(source) => return (servers, Err(io_err(source))),
        }
    }
    (servers, Ok(()))
}

/// Renames `from` to `to`, refusing to overwrite an existing backup.
fn move_to_backup(from: &Path, to: &Path) -> Result<(), StoreError> {
    if to.exists() {
        return Err(StoreError::BackupExists {
            path: to.to_path_buf(),
        });
    }
    std::fs::rename(from, to).map_err(|source| StoreError::Io {
        path: from.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_core::LEGACY_SERVER_NAME;
    use tempfile::TempDir;

    fn paths(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        (
            dir.path().join("btc_servers.cfg"),
            dir.path().join("btc_servers.cfg.bak"),
        )
    }

    #[test]
    fn test_missing_legacy_file_imports_nothing() {
        let dir = TempDir::new().unwrap();
        let (legacy, backup) = paths(&dir);

        let servers = import_legacy_servers(&legacy, &backup);

        assert!(servers.is_empty());
        assert!(!backup.exists());
    }

    #[test]
    fn test_import_trims_lines_skips_blanks_and_moves_file() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let (legacy, backup) = paths(&dir);
        std::fs::write(&legacy, "  1.2.3.4:25565 \n\n   \nplay.example.com\r\n").unwrap();

        // Act
        let servers = import_legacy_servers(&legacy, &backup);

        // Assert
        assert_eq!(
            servers,
            vec![
                ServerEntry::new(LEGACY_SERVER_NAME, "1.2.3.4:25565", false),
                ServerEntry::new(LEGACY_SERVER_NAME, "play.example.com", false),
            ]
        );
        assert!(!legacy.exists());
        assert!(backup.exists());
    }

    #[test]
    fn test_existing_backup_is_not_overwritten() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let (legacy, backup) = paths(&dir);
        std::fs::write(&legacy, "new.example.com\n").unwrap();
        std::fs::write(&backup, "old.example.com\n").unwrap();

        // Act
        let servers = import_legacy_servers(&legacy, &backup);

        // Assert – entries are still imported, the move is refused
        assert_eq!(servers.len(), 1);
        assert!(legacy.exists());
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "old.example.com\n");
    }

    #[test]
    fn test_invalid_utf8_keeps_lines_read_before_the_failure() {
        // Arrange: the second line is not valid UTF-8
        let dir = TempDir::new().unwrap();
        let (legacy, backup) = paths(&dir);
        std::fs::write(&legacy, b"good.example.com\n\xff\xfe\nlater.example.com\n").unwrap();

        // Act
        let servers = import_legacy_servers(&legacy, &backup);

        // Assert – partial import, file left in place for the next attempt
        assert_eq!(servers, vec![ServerEntry::legacy("good.example.com")]);
        assert!(legacy.exists());
        assert!(!backup.exists());
    }
}
