//! Tests for the transaction store: staging files, replay, lifecycle.

use crate::directive::TimeFormat;
use crate::document::{Document, FileKind};

use super::{TransactionError, TransactionStatus, TransactionStore};

const TEXT: &str = "\
# _version=4
global
  maxconn 100
";

fn document() -> Document {
    Document::parse(TEXT, FileKind::Haproxy).unwrap()
}

mod lifecycle {
    use super::*;

    #[test]
    fn begin_writes_a_staging_file_named_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(dir.path()).unwrap();

        let id = store.begin(document(), 4).unwrap();
        let staging = dir.path().join(&id);
        assert_eq!(std::fs::read_to_string(&staging).unwrap(), TEXT);
        assert_eq!(store.ids(), vec![id]);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.get("nope").unwrap_err(),
            TransactionError::NotFound { .. }
        ));
    }

    #[test]
    fn remove_deletes_the_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(dir.path()).unwrap();

        let id = store.begin(document(), 4).unwrap();
        store.remove(&id, TransactionStatus::Aborted).unwrap();

        assert!(!dir.path().join(&id).exists());
        assert!(store.ids().is_empty());
        assert!(matches!(
            store.get(&id).unwrap_err(),
            TransactionError::NotFound { .. }
        ));
    }

    #[test]
    fn remove_twice_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(dir.path()).unwrap();

        let id = store.begin(document(), 4).unwrap();
        store.remove(&id, TransactionStatus::Committed).unwrap();
        assert!(matches!(
            store.remove(&id, TransactionStatus::Committed).unwrap_err(),
            TransactionError::NotFound { .. }
        ));
    }

    #[test]
    fn edits_persist_to_the_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(dir.path()).unwrap();

        let id = store.begin(document(), 4).unwrap();
        let handle = store.get(&id).unwrap();
        {
            let mut tx = handle.lock().unwrap();
            tx.document.bump_version();
            tx.persist().unwrap();
        }

        let on_disk = std::fs::read_to_string(dir.path().join(&id)).unwrap();
        assert!(on_disk.starts_with("# _version=5\n"));
    }
}

mod replay {
    use super::*;

    #[test]
    fn interrupted_transactions_are_restored_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tx-abc"), TEXT).unwrap();

        let store = TransactionStore::open(dir.path()).unwrap();
        let restored = store.replay(FileKind::Haproxy);

        assert_eq!(restored, vec!["tx-abc"]);
        let handle = store.get("tx-abc").unwrap();
        let tx = handle.lock().unwrap();
        assert_eq!(tx.base_version, 4);
        assert_eq!(tx.document.render(TimeFormat::None), TEXT);
        assert_eq!(tx.status, TransactionStatus::Active);
    }

    #[test]
    fn unparsable_staging_files_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tx-bad"), "frontend\n").unwrap();

        let store = TransactionStore::open(dir.path()).unwrap();
        let restored = store.replay(FileKind::Haproxy);

        assert!(restored.is_empty());
        assert!(!dir.path().join("tx-bad").exists());
    }

    #[test]
    fn replay_on_an_empty_directory_restores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(dir.path()).unwrap();
        assert!(store.replay(FileKind::Haproxy).is_empty());
    }
}

mod atomic_write {
    use super::super::atomic_write;

    #[test]
    fn writes_and_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg");

        atomic_write(&path, "one").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one");

        atomic_write(&path, "two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg");
        atomic_write(&path, "content").unwrap();
        assert!(!dir.path().join("cfg.tmp").exists());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/cfg");
        atomic_write(&path, "content").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }
}
