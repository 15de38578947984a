//! CLI parse and command tests.

use super::input::LocatorLines;
use super::{ensure_piped_input, run_count, Cli, USAGE};
use clap::Parser;
use gocount_core::config::GocountConfig;
use gocount_core::locator::SourceKind;
use gocount_core::scheduler::{PipelineSettings, Record, RecordingSink};
use std::io::Write;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_type_file() {
    let cli = parse(&["gocount", "--type", "file"]);
    assert_eq!(cli.source_kind(), Some(SourceKind::File));
    assert!(cli.jobs.is_none());
    assert!(cli.token.is_none());
}

#[test]
fn cli_parse_type_url_short() {
    let cli = parse(&["gocount", "-t", "url"]);
    assert_eq!(cli.source_kind(), Some(SourceKind::Remote));
}

#[test]
fn cli_invalid_or_missing_type_has_no_kind() {
    assert_eq!(parse(&["gocount", "--type", "ftp"]).source_kind(), None);
    assert_eq!(parse(&["gocount"]).source_kind(), None);
}

#[test]
fn cli_overrides_config() {
    let cli = parse(&["gocount", "--type", "file", "--jobs", "2", "--token", "Rust"]);
    let settings = cli.settings(&GocountConfig::default());
    assert_eq!(settings.max_concurrent, 2);
    assert_eq!(settings.token, b"Rust".to_vec());
}

#[test]
fn cli_defaults_from_config() {
    let cli = parse(&["gocount", "--type", "file"]);
    let cfg = GocountConfig {
        max_concurrent_jobs: 7,
        token: "Go".to_string(),
        ..GocountConfig::default()
    };
    let settings = cli.settings(&cfg);
    assert_eq!(settings.max_concurrent, 7);
    assert_eq!(settings.token, b"Go".to_vec());
}

#[test]
fn cli_rejects_non_numeric_jobs() {
    assert!(Cli::try_parse_from(["gocount", "--type", "file", "--jobs", "many"]).is_err());
}

#[test]
fn terminal_stdin_is_rejected_with_usage() {
    let err = ensure_piped_input(true).unwrap_err().to_string();
    assert!(err.starts_with("gocount accepts data only from stdin"));
    assert!(err.contains(USAGE));
    assert!(ensure_piped_input(false).is_ok());
}

#[tokio::test]
async fn locator_lines_skip_blanks_and_cr() {
    let input: &[u8] = b"a.txt\r\n\n   \nb.txt\nc.txt";
    let mut lines = LocatorLines::new(input);
    let mut seen = Vec::new();
    while let Some(l) = lines.next_locator().await.unwrap() {
        seen.push(l);
    }
    assert_eq!(seen, vec!["a.txt", "b.txt", "c.txt"]);
}

#[tokio::test]
async fn run_count_reports_files_from_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut listing = String::new();
    for (name, body) in [("one.txt", "Go, Go"), ("none.txt", "gopher")] {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        listing.push_str(&format!("{}\n\n", path.display()));
    }
    listing.push_str(&format!("{}\n", dir.path().join("missing.txt").display()));

    let cfg = GocountConfig::default();
    let (summary, sink) = run_count(
        &cfg,
        &PipelineSettings::from_config(&cfg),
        SourceKind::File,
        listing.as_bytes(),
        RecordingSink::new(),
    )
    .await
    .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(sink.errors().count(), 1);
    assert_eq!(sink.records.last(), Some(&Record::Total(2)));
}

#[tokio::test]
async fn locator_lines_keep_reading_past_invalid_utf8() {
    let input: &[u8] = b"a.txt\n/tmp/caf\xe9.txt\nb.txt\n";
    let mut lines = LocatorLines::new(input);
    let mut seen = Vec::new();
    while let Some(l) = lines.next_locator().await.unwrap() {
        seen.push(l);
    }
    assert_eq!(seen, vec!["a.txt", "/tmp/caf\u{FFFD}.txt", "b.txt"]);
}

#[tokio::test]
async fn run_count_invalid_utf8_line_is_one_failed_item() {
    let dir = tempfile::tempdir().unwrap();
    let mut input: Vec<u8> = Vec::new();
    for (name, body) in [("a.txt", "Go"), ("b.txt", "Go Go")] {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        if name == "b.txt" {
            input.extend_from_slice(dir.path().to_string_lossy().as_bytes());
            input.extend_from_slice(b"/caf\xe9.txt\n");
        }
        input.extend_from_slice(path.to_string_lossy().as_bytes());
        input.push(b'\n');
    }

    let cfg = GocountConfig::default();
    let (summary, sink) = run_count(
        &cfg,
        &PipelineSettings::from_config(&cfg),
        SourceKind::File,
        input.as_slice(),
        RecordingSink::new(),
    )
    .await
    .expect("a bad line must not end the run");

    assert_eq!(summary.outcomes(), 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total, 3);
    assert_eq!(sink.errors().count(), 1);
}

#[tokio::test]
async fn run_count_empty_input() {
    let cfg = GocountConfig::default();
    let (summary, sink) = run_count(
        &cfg,
        &PipelineSettings::from_config(&cfg),
        SourceKind::File,
        &b"\n\n"[..],
        RecordingSink::new(),
    )
    .await
    .unwrap();
    assert_eq!(summary.outcomes(), 0);
    assert_eq!(sink.records, vec![Record::Total(0)]);
}
