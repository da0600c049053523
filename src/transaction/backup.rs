//! Backup rotation for committed configuration files.
//!
//! After every successful commit the previous on-disk content is copied
//! into the backups directory as `<filename>.<n>` with an increasing
//! sequence number; only the newest `retention` copies are kept.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::TransactionError;

/// Lists existing backup sequence numbers for a configuration filename.
fn existing_sequences(backups_dir: &Path, file_name: &str) -> Vec<u64> {
    let Ok(entries) = fs::read_dir(backups_dir) else {
        return Vec::new();
    };

    let prefix = format!("{file_name}.");
    let mut sequences: Vec<u64> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_prefix(&prefix))
                .and_then(|suffix| suffix.parse().ok())
        })
        .collect();
    sequences.sort_unstable();
    sequences
}

/// Path of the backup with the given sequence number.
fn backup_path(backups_dir: &Path, file_name: &str, sequence: u64) -> PathBuf {
    backups_dir.join(format!("{file_name}.{sequence}"))
}

/// Stores `previous` as the next backup and prunes beyond `retention`.
///
/// With a retention of zero, rotation is disabled entirely.
///
/// # Errors
///
/// Returns [`TransactionError::Backup`] when the backups directory or a
/// backup file cannot be written or pruned.
pub fn rotate(
    config_path: &Path,
    backups_dir: &Path,
    retention: usize,
    previous: &str,
) -> Result<(), TransactionError> {
    if retention == 0 {
        return Ok(());
    }

    let file_name = config_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("config");

    fs::create_dir_all(backups_dir).map_err(|source| TransactionError::Backup {
        path: backups_dir.to_path_buf(),
        source,
    })?;

    let sequences = existing_sequences(backups_dir, file_name);
    let next = sequences.last().map_or(1, |last| last + 1);

    let path = backup_path(backups_dir, file_name, next);
    fs::write(&path, previous).map_err(|source| TransactionError::Backup {
        path: path.clone(),
        source,
    })?;
    debug!(backup = %path.display(), "stored configuration backup");

    // Prune oldest-first down to the retention bound.
    let mut all = sequences;
    all.push(next);
    if all.len() > retention {
        for stale in &all[..all.len() - retention] {
            let stale_path = backup_path(backups_dir, file_name, *stale);
            fs::remove_file(&stale_path).map_err(|source| TransactionError::Backup {
                path: stale_path.clone(),
                source,
            })?;
            debug!(backup = %stale_path.display(), "pruned stale backup");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_bound_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("haproxy.cfg");
        let backups = dir.path().join("backups");

        for i in 1..=4u64 {
            rotate(&config, &backups, 3, &format!("content {i}")).unwrap();
        }

        let seqs = existing_sequences(&backups, "haproxy.cfg");
        assert_eq!(seqs, vec![2, 3, 4]);
        assert!(!backup_path(&backups, "haproxy.cfg", 1).exists());
        assert_eq!(
            fs::read_to_string(backup_path(&backups, "haproxy.cfg", 4)).unwrap(),
            "content 4"
        );
    }

    #[test]
    fn zero_retention_disables_backups() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("haproxy.cfg");
        let backups = dir.path().join("backups");

        rotate(&config, &backups, 0, "content").unwrap();
        assert!(!backups.exists());
    }
}
