//! Tests for whole-file parsing and the round-trip law.

use crate::directive::TimeFormat;

use super::{Document, DocumentError, FileKind, SectionKind};

/// A canonical configuration covering sections, comments, and guards.
const SAMPLE: &str = "\
# _version=3
# Managed by hacfg; do not edit by hand.

global
  maxconn 5000
  log 127.0.0.1:514 local0 notice

defaults
  mode http
  timeout client 30s
  timeout server 30s # keep in sync with client
  timeout connect 5s

frontend web
  bind :80
  bind :8443 ssl crt /etc/cert.pem
  # static assets bypass the app servers
  acl is_static path_beg /static
  use_backend static if is_static
  default_backend app

backend app
  balance roundrobin
  option httpchk
  server app1 10.0.0.1:8080 check weight 10
  server app2 10.0.0.2:8080 check weight 10

backend static
  server files 10.0.1.1:8080
";

fn parse(text: &str) -> Document {
    Document::parse(text, FileKind::Haproxy).unwrap()
}

mod round_trip {
    use super::*;

    #[test]
    fn unmodified_document_reproduces_input_exactly() {
        let doc = parse(SAMPLE);
        assert_eq!(doc.render(TimeFormat::None), SAMPLE);
    }

    #[test]
    fn blank_lines_and_comment_blocks_survive() {
        let text = "\
# _version=1

# two comment lines
# above the only section

global
  maxconn 100
";
        let doc = parse(text);
        assert_eq!(doc.render(TimeFormat::None), text);
    }

    #[test]
    fn trailing_comments_after_last_directive_survive() {
        let text = "\
# _version=1
global
  maxconn 100
# end of file
";
        let doc = parse(text);
        assert_eq!(doc.render(TimeFormat::None), text);
    }

    #[test]
    fn quoted_tokens_survive_parse_and_render() {
        let text = r##"# _version=1
frontend web
  acl is_static path_beg "/a b"
  http-request set-header X-Check "GET /x#frag"

backend app
  option httpchk "GET /health check"
  server app1 10.0.0.1:8080 check
"##;
        let doc = parse(text);
        let rendered = doc.render(TimeFormat::None);
        assert_eq!(rendered, text);

        // A second cycle must see the same structure: the hash stayed
        // inside its token instead of becoming a trailing comment.
        assert_eq!(parse(&rendered), doc);
    }

    #[test]
    fn named_defaults_with_parent_round_trips() {
        let text = "\
# _version=1
defaults base
  mode http

defaults web from base
  timeout client 10s
";
        let doc = parse(text);
        assert_eq!(doc.render(TimeFormat::None), text);
    }

    #[test]
    fn spoe_file_with_scopes_round_trips() {
        let text = "\
# _version=1
[ip-reputation]
spoe-agent iprep-agent
  messages check-client-ip
  option var-prefix iprep
  timeout hello 2s

spoe-message check-client-ip
  args ip=src
  event on-client-session
";
        let doc = Document::parse(text, FileKind::Spoe).unwrap();
        assert_eq!(doc.render(TimeFormat::None), text);
    }
}

mod versions {
    use super::*;

    #[test]
    fn pragma_is_captured() {
        assert_eq!(parse(SAMPLE).version(), 3);
    }

    #[test]
    fn missing_pragma_bootstraps_to_one() {
        let doc = parse("global\n  maxconn 10\n");
        assert_eq!(doc.version(), 1);
        assert!(doc.render(TimeFormat::None).starts_with("# _version=1\n"));
    }

    #[test]
    fn second_pragma_line_is_kept_as_an_ordinary_comment() {
        let text = "\
# _version=2
global
# _version=9
  maxconn 10
";
        let doc = parse(text);
        assert_eq!(doc.version(), 2);
        assert_eq!(doc.render(TimeFormat::None), text);
    }
}

mod classification {
    use super::*;

    #[test]
    fn scope_marker_rejected_in_haproxy_files() {
        let err = Document::parse("# _version=1\n[scope-a]\n", FileKind::Haproxy).unwrap_err();
        assert_eq!(
            err,
            DocumentError::ScopeNotAllowed {
                line_no: 2,
                line: "[scope-a]".to_string(),
            }
        );
    }

    #[test]
    fn spoe_sections_rejected_in_haproxy_files() {
        let err = Document::parse("spoe-agent a\n", FileKind::Haproxy).unwrap_err();
        assert_eq!(
            err,
            DocumentError::SectionNotAllowed {
                kind: SectionKind::SpoeAgent,
                line_no: 1,
            }
        );
    }

    #[test]
    fn haproxy_sections_rejected_in_spoe_files() {
        let err = Document::parse("frontend web\n", FileKind::Spoe).unwrap_err();
        assert!(matches!(err, DocumentError::SectionNotAllowed { .. }));
    }

    #[test]
    fn directive_before_any_section_is_an_error() {
        let err = parse_err("maxconn 10\n");
        assert_eq!(
            err,
            DocumentError::DirectiveOutsideSection {
                line_no: 1,
                line: "maxconn 10".to_string(),
            }
        );
    }

    #[test]
    fn named_section_without_name_is_an_error() {
        let err = parse_err("frontend\n");
        assert_eq!(
            err,
            DocumentError::MissingSectionName {
                keyword: "frontend".to_string(),
                line_no: 1,
            }
        );
    }

    #[test]
    fn malformed_directive_reports_line_number_and_parser() {
        let err = parse_err("global\n  timeout\n");
        let DocumentError::Parse { line_no, source } = err else {
            panic!("expected a parse error");
        };
        assert_eq!(line_no, 2);
        assert_eq!(source.to_string(), "Timeout: not enough params in line 'timeout'");
    }

    #[test]
    fn unknown_directive_reports_the_keyword() {
        let err = parse_err("global\n  zorp 1\n");
        let DocumentError::Parse { source, .. } = err else {
            panic!("expected a parse error");
        };
        assert!(source.to_string().contains("unknown directive 'zorp'"));
    }

    fn parse_err(text: &str) -> DocumentError {
        Document::parse(text, FileKind::Haproxy).unwrap_err()
    }
}
