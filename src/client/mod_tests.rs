//! End-to-end tests for the client: versioning, transactions, implicit
//! commits, backups, and replay across restarts.

use crate::directive::{Directive, parse_directive};
use crate::document::{DocumentError, SectionKind};
use crate::transaction::TransactionError;

use super::{ClientError, ClientParams, ConfigClient};

const TEXT: &str = "\
# _version=1
global
  maxconn 100

frontend main
  bind *:8080
  default_backend app

backend app
  server app1 127.0.0.1:9000
";

fn workspace(text: &str) -> (tempfile::TempDir, ClientParams) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("haproxy.cfg");
    std::fs::write(&config, text).unwrap();
    let params = ClientParams::new(config)
        .with_transactions_dir(dir.path().join("transactions"))
        .with_backups_dir(dir.path().join("backups"));
    (dir, params)
}

fn client(text: &str) -> (tempfile::TempDir, ConfigClient) {
    let (dir, params) = workspace(text);
    let client = ConfigClient::new(params).unwrap();
    (dir, client)
}

fn directive(line: &str) -> Directive {
    parse_directive(line).unwrap().directive
}

mod setup {
    use super::*;

    #[test]
    fn file_without_pragma_is_bootstrapped() {
        let (dir, params) = workspace("global\n  maxconn 50\n");
        let client = ConfigClient::new(params).unwrap();

        assert_eq!(client.version(None).unwrap(), 1);
        let on_disk = std::fs::read_to_string(dir.path().join("haproxy.cfg")).unwrap();
        assert_eq!(on_disk, "# _version=1\nglobal\n  maxconn 50\n");
    }

    #[test]
    fn corrupt_file_is_fatal() {
        let (_dir, params) = workspace("maxconn 50\n");
        assert!(matches!(
            ConfigClient::new(params).unwrap_err(),
            ClientError::Document(DocumentError::DirectiveOutsideSection { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let params = ClientParams::new(dir.path().join("absent.cfg"));
        assert!(matches!(
            ConfigClient::new(params).unwrap_err(),
            ClientError::Transaction(TransactionError::ReadConfig { .. })
        ));
    }

    #[test]
    fn overlapping_directories_are_rejected() {
        let (dir, params) = workspace(TEXT);
        let params = params.with_backups_dir(dir.path().join("transactions"));
        assert!(matches!(
            ConfigClient::new(params).unwrap_err(),
            ClientError::InvalidParams { name: "transactions_dir", .. }
        ));
    }
}

mod transactions {
    use super::*;

    #[test]
    fn edit_commit_cycle_bumps_the_version_by_one() {
        let (dir, client) = client(TEXT);
        assert_eq!(client.version(None).unwrap(), 1);

        let id = client.start_transaction(1).unwrap();
        client
            .set(
                Some(&id),
                "",
                SectionKind::Backend,
                "app",
                "server app1",
                Some(directive("server app1 127.0.0.1:9100")),
            )
            .unwrap();

        // Staged edits are invisible until commit.
        assert_eq!(client.version(Some(&id)).unwrap(), 1);
        assert_eq!(client.version(None).unwrap(), 1);
        let live = client
            .get(None, "", SectionKind::Backend, "app", "server app1")
            .unwrap();
        assert_eq!(live.directive.to_string(), "server app1 127.0.0.1:9000");

        assert_eq!(client.commit_transaction(&id).unwrap(), 2);
        assert_eq!(client.version(None).unwrap(), 2);
        let live = client
            .get(None, "", SectionKind::Backend, "app", "server app1")
            .unwrap();
        assert_eq!(live.directive.to_string(), "server app1 127.0.0.1:9100");

        let on_disk = std::fs::read_to_string(dir.path().join("haproxy.cfg")).unwrap();
        assert!(on_disk.starts_with("# _version=2\n"));
        assert!(on_disk.contains("  server app1 127.0.0.1:9100\n"));
    }

    #[test]
    fn committed_transaction_is_gone() {
        let (_dir, client) = client(TEXT);
        let id = client.start_transaction(1).unwrap();
        client.commit_transaction(&id).unwrap();

        assert!(matches!(
            client.commit_transaction(&id).unwrap_err(),
            ClientError::Transaction(TransactionError::NotFound { .. })
        ));
    }

    #[test]
    fn stale_transaction_cannot_commit_but_stays_active() {
        let (_dir, client) = client(TEXT);
        let id = client.start_transaction(1).unwrap();

        // A concurrent edit moves the live version forward.
        client
            .set(
                None,
                "",
                SectionKind::Global,
                "",
                "maxconn",
                Some(directive("maxconn 200")),
            )
            .unwrap();
        assert_eq!(client.version(None).unwrap(), 2);

        assert!(matches!(
            client.commit_transaction(&id).unwrap_err(),
            ClientError::Transaction(TransactionError::VersionMismatch { base: 1, live: 2 })
        ));

        // Still inspectable and still discardable.
        assert_eq!(client.version(Some(&id)).unwrap(), 1);
        client.delete_transaction(&id).unwrap();
    }

    #[test]
    fn start_transaction_rejects_a_stale_base() {
        let (_dir, client) = client(TEXT);
        assert!(matches!(
            client.start_transaction(7).unwrap_err(),
            ClientError::Transaction(TransactionError::VersionMismatch { base: 7, live: 1 })
        ));
    }

    #[test]
    fn delete_discards_staged_edits() {
        let (dir, client) = client(TEXT);
        let id = client.start_transaction(1).unwrap();
        client
            .delete_section(Some(&id), "", SectionKind::Backend, "app")
            .unwrap();
        client.delete_transaction(&id).unwrap();

        assert!(client.transactions().is_empty());
        assert!(!dir.path().join("transactions").join(&id).exists());
        assert_eq!(
            client.sections(None, "", SectionKind::Backend).unwrap(),
            vec!["app"]
        );
        assert_eq!(client.version(None).unwrap(), 1);
    }
}

mod implicit {
    use super::*;

    #[test]
    fn edits_without_a_transaction_commit_immediately() {
        let (dir, client) = client(TEXT);
        client
            .set(
                None,
                "",
                SectionKind::Global,
                "",
                "maxconn",
                Some(directive("maxconn 500")),
            )
            .unwrap();

        assert_eq!(client.version(None).unwrap(), 2);
        assert!(client.transactions().is_empty());
        assert!(std::fs::read_dir(dir.path().join("transactions"))
            .unwrap()
            .next()
            .is_none());

        let on_disk = std::fs::read_to_string(dir.path().join("haproxy.cfg")).unwrap();
        assert!(on_disk.starts_with("# _version=2\n"));
        assert!(on_disk.contains("  maxconn 500\n"));
    }

    #[test]
    fn section_lifecycle_without_a_transaction() {
        let (_dir, client) = client(TEXT);

        client
            .create_section(None, "", SectionKind::Backend, "static")
            .unwrap();
        assert_eq!(
            client.sections(None, "", SectionKind::Backend).unwrap(),
            vec!["app", "static"]
        );

        client
            .delete_section(None, "", SectionKind::Backend, "static")
            .unwrap();
        assert_eq!(
            client.sections(None, "", SectionKind::Backend).unwrap(),
            vec!["app"]
        );
        assert_eq!(client.version(None).unwrap(), 3);
    }

    #[test]
    fn failed_edits_change_nothing() {
        let (dir, client) = client(TEXT);
        assert!(matches!(
            client
                .create_section(None, "", SectionKind::Backend, "app")
                .unwrap_err(),
            ClientError::Document(DocumentError::SectionExists { .. })
        ));

        assert_eq!(client.version(None).unwrap(), 1);
        assert!(std::fs::read_dir(dir.path().join("transactions"))
            .unwrap()
            .next()
            .is_none());
    }

    #[test]
    fn removing_an_attribute_renders_without_it() {
        let (_dir, client) = client(TEXT);
        client
            .set(None, "", SectionKind::Frontend, "main", "default_backend", None)
            .unwrap();

        let rendered = client.render(None).unwrap();
        assert!(!rendered.contains("default_backend"));
        assert!(matches!(
            client
                .get(None, "", SectionKind::Frontend, "main", "default_backend")
                .unwrap_err(),
            ClientError::Document(DocumentError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn clearing_a_trailing_comment_is_an_explicit_edit() {
        let (dir, client) = client("# _version=1\nglobal\n  maxconn 100 # tuned\n");

        client
            .set(
                None,
                "",
                SectionKind::Global,
                "",
                "maxconn",
                Some(directive("maxconn 200")),
            )
            .unwrap();
        // Replacing the value keeps the comment.
        assert!(client.render(None).unwrap().contains("  maxconn 200 # tuned\n"));

        client
            .set_comment(None, "", SectionKind::Global, "", "maxconn", None)
            .unwrap();
        assert_eq!(client.version(None).unwrap(), 3);

        let on_disk = std::fs::read_to_string(dir.path().join("haproxy.cfg")).unwrap();
        assert!(on_disk.contains("  maxconn 200\n"));
        assert!(!on_disk.contains("tuned"));
    }
}

mod backups {
    use super::*;

    #[test]
    fn every_commit_stores_the_previous_content() {
        let (dir, client) = client(TEXT);
        client
            .set(
                None,
                "",
                SectionKind::Global,
                "",
                "maxconn",
                Some(directive("maxconn 200")),
            )
            .unwrap();

        let first = dir.path().join("backups").join("haproxy.cfg.1");
        assert_eq!(std::fs::read_to_string(first).unwrap(), TEXT);
    }

    #[test]
    fn retention_bounds_the_backup_count() {
        let (dir, params) = workspace(TEXT);
        let client = ConfigClient::new(params.with_backup_retention(2)).unwrap();

        for limit in [200, 300, 400] {
            client
                .set(
                    None,
                    "",
                    SectionKind::Global,
                    "",
                    "maxconn",
                    Some(directive(&format!("maxconn {limit}"))),
                )
                .unwrap();
        }

        let backups = dir.path().join("backups");
        assert!(!backups.join("haproxy.cfg.1").exists());
        assert!(backups.join("haproxy.cfg.2").exists());
        let newest = std::fs::read_to_string(backups.join("haproxy.cfg.3")).unwrap();
        assert!(newest.contains("  maxconn 300\n"));
    }
}

mod replay {
    use super::*;

    #[test]
    fn interrupted_transactions_survive_a_restart() {
        let (_dir, params) = workspace(TEXT);

        let id = {
            let client = ConfigClient::new(params.clone()).unwrap();
            let id = client.start_transaction(1).unwrap();
            client
                .set(
                    Some(&id),
                    "",
                    SectionKind::Global,
                    "",
                    "maxconn",
                    Some(directive("maxconn 999")),
                )
                .unwrap();
            id
        };

        let client = ConfigClient::new(params).unwrap();
        assert_eq!(client.transactions(), vec![id.clone()]);
        assert_eq!(client.version(Some(&id)).unwrap(), 1);

        assert_eq!(client.commit_transaction(&id).unwrap(), 2);
        let entry = client
            .get(None, "", SectionKind::Global, "", "maxconn")
            .unwrap();
        assert_eq!(entry.directive.to_string(), "maxconn 999");
    }
}
