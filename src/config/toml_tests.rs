//! Tests for TOML settings parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_settings() {
        let toml = r#"
            [file]
            path = "/etc/haproxy/haproxy.cfg"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(
            config.file.path.as_deref(),
            Some("/etc/haproxy/haproxy.cfg")
        );
        assert!(config.file.kind.is_none());
    }

    #[test]
    fn parse_full_settings() {
        let toml = r#"
            [file]
            path = "/etc/haproxy/spoe-iprep.conf"
            kind = "spoe"

            [transactions]
            dir = "/var/lib/hacfg/transactions"

            [backups]
            dir = "/var/lib/hacfg/backups"
            retention = 10

            [format]
            time = "nearest"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(config.file.kind.as_deref(), Some("spoe"));
        assert_eq!(
            config.transactions.dir.as_deref(),
            Some("/var/lib/hacfg/transactions")
        );
        assert_eq!(config.backups.dir.as_deref(), Some("/var/lib/hacfg/backups"));
        assert_eq!(config.backups.retention, Some(10));
        assert_eq!(config.format.time.as_deref(), Some("nearest"));
    }

    #[test]
    fn parse_empty_settings() {
        let config = TomlConfig::parse("").unwrap();
        assert!(config.file.path.is_none());
        assert!(config.transactions.dir.is_none());
        assert!(config.backups.retention.is_none());
        assert!(config.format.time.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let toml = r#"
            [file]
            path = "haproxy.cfg"
            unknown_option = true
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let toml = r#"
            [nonsense]
            value = 1
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(TomlConfig::parse("[file\npath=").is_err());
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hacfg.toml");
        std::fs::write(&path, "[backups]\nretention = 3\n").unwrap();

        let config = TomlConfig::load(&path).unwrap();
        assert_eq!(config.backups.retention, Some(3));
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TomlConfig::load(&dir.path().join("absent.toml")).is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn template_parses_as_valid_settings() {
        let template = default_config_template();
        let config = TomlConfig::parse(&template).unwrap();

        // Only non-commented values should be set.
        assert!(config.file.path.is_none());
        assert_eq!(config.backups.retention, Some(5));
    }
}
