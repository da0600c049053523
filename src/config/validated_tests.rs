//! Tests for validated settings.

use std::path::PathBuf;

use crate::directive::{TimeFormat, TimeUnit};
use crate::document::FileKind;

use super::cli::Cli;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;
use super::validated::{ValidatedConfig, write_default_config};

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["hacfg"];
    full.extend_from_slice(args);
    Cli::parse_from_iter(full)
}

mod required_fields {
    use super::*;

    #[test]
    fn file_from_cli() {
        let config = ValidatedConfig::from_raw(&cli(&["--file", "haproxy.cfg"]), None).unwrap();
        assert_eq!(config.config_file, PathBuf::from("haproxy.cfg"));
    }

    #[test]
    fn file_from_toml() {
        let toml = TomlConfig::parse("[file]\npath = \"/etc/haproxy/haproxy.cfg\"\n").unwrap();
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();
        assert_eq!(config.config_file, PathBuf::from("/etc/haproxy/haproxy.cfg"));
    }

    #[test]
    fn cli_file_wins_over_toml() {
        let toml = TomlConfig::parse("[file]\npath = \"/from/toml.cfg\"\n").unwrap();
        let config =
            ValidatedConfig::from_raw(&cli(&["--file", "/from/cli.cfg"]), Some(&toml)).unwrap();
        assert_eq!(config.config_file, PathBuf::from("/from/cli.cfg"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ValidatedConfig::from_raw(&cli(&[]), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { field: field::FILE, .. }
        ));
    }
}

mod merging {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ValidatedConfig::from_raw(&cli(&["--file", "haproxy.cfg"]), None).unwrap();

        assert_eq!(config.file_kind, FileKind::Haproxy);
        assert_eq!(config.backup_retention, super::super::defaults::BACKUP_RETENTION);
        assert_eq!(config.time_format, TimeFormat::None);
        assert!(config.transactions_dir.is_none());
        assert!(config.backups_dir.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn toml_values_fill_in_gaps() {
        let toml = TomlConfig::parse(
            r#"
            [file]
            path = "haproxy.cfg"
            kind = "spoe"

            [backups]
            retention = 2

            [format]
            time = "s"
        "#,
        )
        .unwrap();

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();
        assert_eq!(config.file_kind, FileKind::Spoe);
        assert_eq!(config.backup_retention, 2);
        assert_eq!(config.time_format, TimeFormat::Unit(TimeUnit::S));
    }

    #[test]
    fn cli_values_win_over_toml() {
        let toml = TomlConfig::parse(
            r#"
            [file]
            path = "haproxy.cfg"

            [backups]
            retention = 2

            [format]
            time = "s"
        "#,
        )
        .unwrap();

        let config = ValidatedConfig::from_raw(
            &cli(&["--backup-retention", "9", "--time-format", "nearest"]),
            Some(&toml),
        )
        .unwrap();
        assert_eq!(config.backup_retention, 9);
        assert_eq!(config.time_format, TimeFormat::Nearest);
    }

    #[test]
    fn invalid_time_format_is_rejected() {
        let err =
            ValidatedConfig::from_raw(&cli(&["--file", "a.cfg", "--time-format", "weeks"]), None)
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeFormat { .. }));
    }

    #[test]
    fn invalid_file_kind_in_toml_is_rejected() {
        let toml =
            TomlConfig::parse("[file]\npath = \"a.cfg\"\nkind = \"nginx\"\n").unwrap();
        let err = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFileKind { .. }));
    }
}

mod client_params {
    use super::*;

    #[test]
    fn directories_default_to_siblings_of_the_file() {
        let config =
            ValidatedConfig::from_raw(&cli(&["--file", "/etc/haproxy/haproxy.cfg"]), None).unwrap();
        let params = config.client_params();

        assert_eq!(params.config_file, PathBuf::from("/etc/haproxy/haproxy.cfg"));
        assert_eq!(
            params.transactions_dir,
            PathBuf::from("/etc/haproxy/transactions")
        );
        assert_eq!(params.backups_dir, PathBuf::from("/etc/haproxy/backups"));
    }

    #[test]
    fn explicit_directories_are_passed_through() {
        let config = ValidatedConfig::from_raw(
            &cli(&[
                "--file",
                "haproxy.cfg",
                "--transactions-dir",
                "/tmp/tx",
                "--backups-dir",
                "/tmp/bk",
                "--backup-retention",
                "0",
            ]),
            None,
        )
        .unwrap();
        let params = config.client_params();

        assert_eq!(params.transactions_dir, PathBuf::from("/tmp/tx"));
        assert_eq!(params.backups_dir, PathBuf::from("/tmp/bk"));
        assert_eq!(params.backup_retention, 0);
    }
}

mod init {
    use super::*;

    #[test]
    fn written_template_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hacfg.toml");

        write_default_config(&path).unwrap();
        let toml = TomlConfig::load(&path).unwrap();
        assert_eq!(toml.backups.retention, Some(5));
    }

    #[test]
    fn write_to_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("hacfg.toml");
        assert!(matches!(
            write_default_config(&path).unwrap_err(),
            ConfigError::FileWrite { .. }
        ));
    }
}
